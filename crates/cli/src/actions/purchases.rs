//! Purchase entry with a confirmation step.

use anyhow::Result;
use spendtrack_core::{
    models::Purchase,
    validate::{normalize_date, normalize_text, parse_amount, parse_quantity},
    Menu,
};
use tracing::info;

use crate::app::Tracker;

/// Ask for a purchase, show it and save it once confirmed.
///
/// Choosing "enter data again" or going back starts over; an identical
/// purchase already on record ends the action.
pub fn enter_purchase(app: &mut Tracker, _: ()) -> Result<()> {
    let Some(username) = app.authenticated()? else {
        return Ok(());
    };

    loop {
        let purchase = collect_purchase(app)?;
        if app.user(&username)?.has_purchase(&purchase) {
            app.notice(["This purchase data already exists!"])?;
            return Ok(());
        }

        app.notice([
            "Here's a summary of your purchase:".to_string(),
            purchase.to_string(),
            "Are you sure you want to save this purchase?".to_string(),
        ])?;
        let saved = Menu::new()
            .entry(save_purchase, "save data", purchase.clone())
            .entry(discard_purchase, "enter data again", purchase)
            .run(app)?;
        if saved == Some(true) {
            return Ok(());
        }
    }
}

fn collect_purchase(app: &mut Tracker) -> Result<Purchase> {
    let seller = app.ask_valid(
        "Where did you buy the product? (Amazon, Ebay, Temu, etc...): ",
        |_, raw| normalize_text(raw, "Seller name"),
    )?;
    let date = app.ask_valid(
        "When did you buy the product? (MM/DD/YYYY or MM-DD-YYYY): ",
        |_, raw| normalize_date(raw),
    )?;
    let item = app.ask_valid("What's the name of the item you bought?: ", |_, raw| {
        normalize_text(raw, "Item name")
    })?;
    let cost = app.ask_valid("How much did one unit cost? (in EUR): ", |_, raw| {
        parse_amount(raw)
    })?;
    let delivery_fee = app.ask_valid("How much was the delivery fee? (in EUR): ", |_, raw| {
        parse_amount(raw)
    })?;
    let weight = app.ask_valid("How much does one unit weigh? (in kg): ", |_, raw| {
        parse_amount(raw)
    })?;
    let quantity = app.ask_valid("How many units did you buy?: ", |_, raw| {
        parse_quantity(raw)
    })?;
    Ok(Purchase::new(
        date,
        seller,
        item,
        cost,
        delivery_fee,
        weight,
        quantity,
    ))
}

fn save_purchase(app: &mut Tracker, purchase: Purchase) -> Result<bool> {
    let Some(username) = app.authenticated()? else {
        return Ok(false);
    };
    let date = purchase.date.clone();
    app.update_user(&username, |user| user.purchases.push(purchase))?;
    info!("{username} saved a purchase from {date}");
    app.notice([format!("Saved purchase from {date} successfully!")])?;
    Ok(true)
}

fn discard_purchase(_: &mut Tracker, _: Purchase) -> Result<bool> {
    Ok(false)
}
