//! Full and filtered spending reports.

use anyhow::Result;
use spendtrack_core::{
    models::Purchase,
    report::{self, numbered_lines, ReportFilter},
    validate::normalize_date,
    Menu,
};
use tracing::{debug, info};

use crate::app::Tracker;

/// Ask for the kind of report, show it, then offer the purchase list.
pub fn generate_report(app: &mut Tracker, _: ()) -> Result<()> {
    if app.authenticated()?.is_none() {
        return Ok(());
    }

    app.console.line("What kind of report do you want?")?;
    let covered = Menu::new()
        .entry(full_report, "create full report", ())
        .entry(filter_menu, "create a filtered report", ())
        .run(app)?
        .unwrap_or_default();
    if !covered.is_empty() {
        offer_listing(app, covered)?;
    }
    Ok(())
}

/// Report over every purchase, including the spending-limit status.
///
/// Returns the purchases the report covered.
fn full_report(app: &mut Tracker, _: ()) -> Result<Vec<Purchase>> {
    let Some(username) = app.authenticated()? else {
        return Ok(Vec::new());
    };
    let user = app.user(&username)?;
    let purchases = user.purchases.clone();
    match report::full_report(&purchases, user.spending_limit) {
        Some(lines) => {
            info!("{username} generated a full report");
            app.notice(lines)?;
            Ok(purchases)
        }
        None => {
            app.notice(["You have not recorded any purchases yet."])?;
            Ok(Vec::new())
        }
    }
}

fn filter_menu(app: &mut Tracker, _: ()) -> Result<Vec<Purchase>> {
    let mut menu = Menu::new();
    for filter in ReportFilter::ALL {
        menu = menu.entry(filtered_report, format!("filter for {filter}"), filter);
    }
    Ok(menu.run(app)?.unwrap_or_default())
}

/// Report over the purchases whose `filter` field equals a value the
/// user enters. Dates are entered like purchase dates.
fn filtered_report(app: &mut Tracker, filter: ReportFilter) -> Result<Vec<Purchase>> {
    let Some(username) = app.authenticated()? else {
        return Ok(Vec::new());
    };
    let prompt = format!("Please enter the {filter} you want to filter for: ");
    let value = match filter {
        ReportFilter::Date => app.ask_valid(&prompt, |_, raw| normalize_date(raw))?,
        ReportFilter::Seller | ReportFilter::Item => app.ask(&prompt)?.to_lowercase(),
    };

    let matching = filter.apply(&app.user(&username)?.purchases, &value);
    debug!(filter = filter.key(), %value, matches = matching.len(), "filtered purchases");
    match report::filtered_report(&matching, filter, &value) {
        Some(lines) => {
            app.notice(lines)?;
            Ok(matching)
        }
        None => {
            app.notice([format!("No purchases found matching filter: {filter} = {value}")])?;
            Ok(Vec::new())
        }
    }
}

fn offer_listing(app: &mut Tracker, purchases: Vec<Purchase>) -> Result<()> {
    app.notice(["Do you want a list of all the purchases?"])?;
    let listed = Menu::new()
        .entry(show_list, "show list", purchases)
        .entry(end_report, "end the report", Vec::new())
        .run(app)?
        .unwrap_or_default();
    for line in numbered_lines(&listed) {
        app.console.line(line)?;
    }
    Ok(())
}

fn show_list(_: &mut Tracker, purchases: Vec<Purchase>) -> Result<Vec<Purchase>> {
    Ok(purchases)
}

fn end_report(_: &mut Tracker, _: Vec<Purchase>) -> Result<Vec<Purchase>> {
    Ok(Vec::new())
}
