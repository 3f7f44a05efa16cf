//! Login, registration, logout and the spending limit.

use std::{thread, time::Duration};

use anyhow::Result;
use spendtrack_core::{
    models::User,
    validate::{parse_amount, validate_email, validate_new_username, validate_phone},
};
use tracing::{info, warn};

use crate::app::Tracker;

const LOCKOUT_REASON: &str = "Too many unsuccessful login attempts";

/// Authenticate by username and password.
///
/// Passwords are compared as stored. Running out of attempts ends the
/// process.
pub fn login(app: &mut Tracker, _: ()) -> Result<()> {
    if app.session.is_logged_in() {
        app.notice(["You're already logged in"])?;
        return Ok(());
    }

    let username = app.ask("Please enter your username: ")?;
    let expected = app.store.find(&username).map(|user| user.password.clone());
    let authenticated = match expected {
        Some(expected) => check_password(app, &expected)?,
        None => false,
    };

    if authenticated {
        app.session.login(username.as_str());
        info!("{username} logged in");
        app.notice([format!("Welcome, {username}! Login successful!")])?;
    } else {
        warn!("failed login for {username:?}");
        app.session.logout();
        app.notice(["Incorrect login credentials!"])?;
    }
    Ok(())
}

fn check_password(app: &mut Tracker, expected: &str) -> Result<bool> {
    let attempts = app.config.max_password_attempts;
    let delay = app.config.retry_delay_secs;
    for attempt in 1..=attempts {
        let candidate = app.ask("Please enter your password: ")?;
        if candidate == expected {
            return Ok(true);
        }
        warn!(attempt, attempts, "wrong password");
        if attempt < attempts {
            app.console.line(format_args!("Wait {delay} seconds to retry"))?;
            thread::sleep(Duration::from_secs(delay));
        }
    }
    Err(app.console.terminate(Some(LOCKOUT_REASON)).into())
}

/// Collect and validate a new account, then persist it.
pub fn register(app: &mut Tracker, _: ()) -> Result<()> {
    app.console.line("Register new user")?;
    let username = app.ask_valid("Please enter your desired username: ", |app, raw| {
        validate_new_username(raw, &app.store).map(|_| raw.to_string())
    })?;

    let password = loop {
        let password = app.ask_valid("Please enter your password: ", |app, raw| {
            app.passwords.validate(raw).map(|_| raw.to_string())
        })?;
        let repeated = app.ask("Please enter your password again: ")?;
        if repeated == password {
            break password;
        }
        app.notice(["The passwords do not match. Please try again."])?;
    };

    let email = app.ask_valid("Please enter your e-mail address: ", |app, raw| {
        validate_email(raw, &app.store).map(|_| raw.to_string())
    })?;
    let phone = app.ask_valid(
        "Please enter your phone number in this format: +491234567890 : ",
        |_, raw| validate_phone(raw).map(|_| raw.to_string()),
    )?;
    let spending_limit = app.ask_valid(
        "Please enter a spending limit in €. You can change it later. : ",
        |_, raw| parse_amount(raw),
    )?;

    app.store.add(User {
        username: username.clone(),
        password,
        email,
        phone,
        purchases: Vec::new(),
        spending_limit,
    })?;
    app.confirm_saved()?;
    app.notice([format!("Successfully registered new user {username}!")])?;
    Ok(())
}

/// Forget the logged-in identity.
pub fn logout(app: &mut Tracker, _: ()) -> Result<()> {
    if app.authenticated()?.is_none() {
        return Ok(());
    }
    if let Some(username) = app.session.logout() {
        info!("{username} logged out");
        app.notice([format!("Goodbye, {username}! You are now logged out.")])?;
    }
    Ok(())
}

/// Change the logged-in user's spending limit. Zero disables the limit.
pub fn set_spending_limit(app: &mut Tracker, _: ()) -> Result<()> {
    let Some(username) = app.authenticated()? else {
        return Ok(());
    };
    let limit = app.ask_valid("What do you want your limit to be?: ", |_, raw| {
        parse_amount(raw)
    })?;
    app.update_user(&username, |user| user.spending_limit = limit)?;
    info!(limit, "{username} changed spending limit");
    app.console.line(format_args!("Spending limit set to {limit:.2}€."))?;
    Ok(())
}
