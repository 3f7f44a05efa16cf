//! Menu actions for the spending tracker.
//!
//! Every action has the engine's `fn(&mut Tracker, A) -> Result<R>` shape so
//! it can be bound into a [`Menu`] entry together with its arguments.

pub mod account;
pub mod purchases;
pub mod reports;

use anyhow::Result;
use spendtrack_core::Menu;

use crate::app::Tracker;

/// Sub-menu with login and registration.
pub fn account_menu(app: &mut Tracker, _: ()) -> Result<()> {
    Menu::new()
        .entry(account::login, "login", ())
        .entry(account::register, "register", ())
        .run(app)?;
    Ok(())
}

/// Sub-menu with the purchase-related actions.
pub fn purchases_menu(app: &mut Tracker, _: ()) -> Result<()> {
    Menu::new()
        .entry(purchases::enter_purchase, "enter a new purchase", ())
        .entry(
            reports::generate_report,
            "generate a report of your current spending",
            (),
        )
        .entry(account::set_spending_limit, "set a custom spending limit", ())
        .run(app)?;
    Ok(())
}
