mod actions;
mod app;

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    sync::Mutex,
};

use spendtrack_core::{
    config::{self, AppConfig},
    error::is_terminated,
    validate::PasswordPolicy,
    Console, UserStore,
};
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

fn main() -> Result<()> {
    init_logging()?;

    let mut tracker = match bootstrap() {
        Ok(tracker) => tracker,
        Err(err) => {
            error!("startup failed: {err:#}");
            Console::stdio().terminate(Some(&format!("{err:#}")));
            return Err(err);
        }
    };

    let Err(err) = tracker.run() else {
        return Ok(());
    };
    if is_terminated(&err) {
        info!("session ended by user");
        return Ok(());
    }
    error!("session aborted: {err:#}");
    tracker.console.terminate(Some(&format!("{err:#}")));
    Err(err)
}

fn bootstrap() -> Result<app::Tracker> {
    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    let store = UserStore::open(&config.data_path)?;
    let passwords = PasswordPolicy::load(config.common_passwords_path.as_deref());
    let console = Console::stdio().with_frame(config.frame());
    Ok(app::Tracker::new(config, store, passwords, console))
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("spendtrack.log"))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout belongs to the interactive session, so logs only go to the file.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
