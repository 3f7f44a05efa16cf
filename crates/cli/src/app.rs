use anyhow::{Context, Result};
use spendtrack_core::{
    models::User,
    validate::PasswordPolicy,
    AppConfig, Console, Menu, MenuHost, Session, UserStore, ValidationError,
};
use tracing::debug;

use crate::actions;

const APP_NAME: &str = "Spending Tracker";
const BANNER_WIDTH: usize = 40;
const LOGIN_REQUIRED: &str = "You have to be logged in for that!";

/// Application context handed to every menu action.
pub struct Tracker {
    pub(crate) config: AppConfig,
    pub(crate) store: UserStore,
    pub(crate) session: Session,
    pub(crate) passwords: PasswordPolicy,
    pub(crate) console: Console,
}

impl MenuHost for Tracker {
    fn console(&mut self) -> &mut Console {
        &mut self.console
    }
}

impl Tracker {
    pub fn new(
        config: AppConfig,
        store: UserStore,
        passwords: PasswordPolicy,
        console: Console,
    ) -> Self {
        Self {
            config,
            store,
            session: Session::new(),
            passwords,
            console,
        }
    }

    /// Show the main menu until the user quits or an action fails.
    pub fn run(&mut self) -> Result<()> {
        self.welcome()?;
        loop {
            let menu = self.main_menu();
            menu.run(self)?;
        }
    }

    fn main_menu(&self) -> Menu<Self, (), ()> {
        if self.session.is_logged_in() {
            Menu::new()
                .entry(actions::purchases_menu, "manage your purchases", ())
                .entry(actions::account::logout, "logout", ())
        } else {
            Menu::new()
                .entry(actions::account_menu, "login / register", ())
                .entry(actions::purchases_menu, "manage your purchases", ())
        }
    }

    fn welcome(&mut self) -> Result<()> {
        let border = "-".repeat(BANNER_WIDTH);
        self.console.line(&border)?;
        self.console
            .line(format_args!("|   Welcome to the {APP_NAME}!   |"))?;
        self.console.line(&border)?;
        Ok(())
    }

    /// Prompt once and trim the answer.
    pub(crate) fn ask(&mut self, prompt: &str) -> Result<String> {
        Ok(self.console.prompt(prompt)?.trim().to_string())
    }

    /// Prompt until `parse` accepts the trimmed answer, framing each rejection.
    pub(crate) fn ask_valid<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&Self, &str) -> Result<T, ValidationError>,
    ) -> Result<T> {
        loop {
            let answer = self.ask(prompt)?;
            match parse(self, &answer) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    debug!("rejected input: {err}");
                    self.notice(err.lines())?;
                }
            }
        }
    }

    /// Print `lines` inside a frame.
    pub(crate) fn notice<I>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: std::fmt::Display,
    {
        self.console.encased(lines)?;
        Ok(())
    }

    /// Login guard: the current username, or a framed notice and `None`.
    pub(crate) fn authenticated(&mut self) -> Result<Option<String>> {
        let checked = self.session.require().map(str::to_owned);
        match checked {
            Ok(username) => Ok(Some(username)),
            Err(err) => {
                debug!("guard rejected action: {err}");
                self.notice([LOGIN_REQUIRED])?;
                Ok(None)
            }
        }
    }

    pub(crate) fn user(&self, username: &str) -> Result<&User> {
        self.store
            .find(username)
            .with_context(|| format!("user {username} is missing from the store"))
    }

    /// Change one user's record, write the store and confirm on screen.
    pub(crate) fn update_user(
        &mut self,
        username: &str,
        change: impl FnOnce(&mut User),
    ) -> Result<()> {
        self.store.update(username, change)?;
        self.confirm_saved()
    }

    pub(crate) fn confirm_saved(&mut self) -> Result<()> {
        let message = format!(
            "Successfully saved new data to file {}!",
            self.store.path().display()
        );
        self.notice([message])
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{harness, logged_in, sample_user};
    use super::*;
    use spendtrack_core::error::is_terminated;

    #[test]
    fn quit_from_a_nested_menu_ends_the_run_once() -> Result<()> {
        let mut h = harness(&["1", "quit", ""], Vec::new())?;
        let err = h.tracker.run().unwrap_err();
        assert!(is_terminated(&err));
        assert_eq!(h.exits.count(), 1);
        assert!(h.transcript.contains("Welcome to the Spending Tracker!"));
        assert!(h.transcript.contains("select 1 to login / register"));
        assert!(h.transcript.contains("select 2 to register"));
        Ok(())
    }

    #[test]
    fn back_at_the_top_level_shows_the_main_menu_again() -> Result<()> {
        let mut h = harness(&["b", "0", ""], Vec::new())?;
        let err = h.tracker.run().unwrap_err();
        assert!(is_terminated(&err));
        assert_eq!(h.transcript.count("select 1 to login / register"), 2);
        assert_eq!(h.exits.count(), 1);
        Ok(())
    }

    #[test]
    fn main_menu_depends_on_login_state() -> Result<()> {
        let mut h = logged_in(&["q", ""], sample_user())?;
        assert!(h.tracker.run().is_err());
        assert!(h.transcript.contains("select 1 to manage your purchases"));
        assert!(h.transcript.contains("select 2 to logout"));
        assert!(!h.transcript.contains("login / register"));
        Ok(())
    }

    #[test]
    fn guard_blocks_logged_out_actions() -> Result<()> {
        let mut h = harness(&["2", "1", "b", "q", ""], Vec::new())?;
        assert!(h.tracker.run().is_err());
        assert_eq!(h.transcript.count(LOGIN_REQUIRED), 1);
        Ok(())
    }

    #[test]
    fn closed_input_is_an_ordinary_error() -> Result<()> {
        let mut h = harness(&[], Vec::new())?;
        let err = h.tracker.run().unwrap_err();
        assert!(!is_terminated(&err));
        assert_eq!(h.exits.count(), 0);
        Ok(())
    }
}
