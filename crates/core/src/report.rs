//! Spending report arithmetic and text.

use std::fmt;

use crate::models::Purchase;

/// Differences smaller than half a cent count as hitting the limit.
const LIMIT_EPSILON: f64 = 0.005;

/// Purchase field a filtered report matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFilter {
    /// Match the seller name.
    Seller,
    /// Match the purchase date.
    Date,
    /// Match the item name.
    Item,
}

impl ReportFilter {
    /// Every filter in menu order.
    pub const ALL: [ReportFilter; 3] = [Self::Seller, Self::Date, Self::Item];

    /// Name of the matched record field.
    pub fn key(self) -> &'static str {
        match self {
            Self::Seller => "seller",
            Self::Date => "date",
            Self::Item => "item_name",
        }
    }

    /// Word used in menus and prompts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Seller => "seller",
            Self::Date => "date",
            Self::Item => "item",
        }
    }

    /// The matched field of `purchase`.
    pub fn value_of(self, purchase: &Purchase) -> &str {
        match self {
            Self::Seller => &purchase.seller,
            Self::Date => &purchase.date,
            Self::Item => &purchase.item_name,
        }
    }

    /// Purchases whose field equals `value`.
    pub fn apply(self, purchases: &[Purchase], value: &str) -> Vec<Purchase> {
        purchases
            .iter()
            .filter(|purchase| self.value_of(purchase) == value)
            .cloned()
            .collect()
    }
}

impl fmt::Display for ReportFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregates over a non-empty set of purchases.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Number of purchases.
    pub purchase_count: usize,
    /// Units bought across all purchases.
    pub total_quantity: u64,
    /// Sum of total costs in euros.
    pub total_spending: f64,
    /// Sum of total weights in kilograms.
    pub total_weight: f64,
    /// Purchase with the highest total cost.
    pub priciest: Purchase,
    /// Purchase with the highest total weight.
    pub heaviest: Purchase,
}

impl Summary {
    /// Summarise `purchases`, or `None` when there are none.
    ///
    /// Ties for priciest and heaviest go to the earliest purchase.
    pub fn of(purchases: &[Purchase]) -> Option<Self> {
        let first = purchases.first()?;
        let mut priciest = first;
        let mut heaviest = first;
        for purchase in &purchases[1..] {
            if purchase.total_cost > priciest.total_cost {
                priciest = purchase;
            }
            if purchase.total_weight > heaviest.total_weight {
                heaviest = purchase;
            }
        }

        Some(Self {
            purchase_count: purchases.len(),
            total_quantity: purchases.iter().map(|p| u64::from(p.quantity)).sum(),
            total_spending: purchases.iter().map(|p| p.total_cost).sum(),
            total_weight: purchases.iter().map(|p| p.total_weight).sum(),
            priciest: priciest.clone(),
            heaviest: heaviest.clone(),
        })
    }

    /// Mean spending per purchase.
    pub fn average_per_purchase(&self) -> f64 {
        self.total_spending / self.purchase_count as f64
    }

    /// Mean spending per unit bought.
    pub fn average_per_item(&self) -> f64 {
        if self.total_quantity == 0 {
            return 0.0;
        }
        self.total_spending / self.total_quantity as f64
    }

    /// Report body without heading or limit line.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!(
                "You bought {} items for a total of: {:.2}€.",
                self.total_quantity, self.total_spending
            ),
            format!("With a total weight of: {:.2} kg.", self.total_weight),
            String::new(),
            format!(
                "Your most expensive purchase was: {} {} at {}",
                self.priciest.quantity, self.priciest.item_name, self.priciest.seller
            ),
            format!("for a total of {:.2}€.", self.priciest.total_cost),
            String::new(),
            format!(
                "Your heaviest purchase was: {} {} at {}",
                self.heaviest.quantity, self.heaviest.item_name, self.heaviest.seller
            ),
            format!("for a total of {:.2} kg.", self.heaviest.total_weight),
            String::new(),
            format!(
                "You did a total of {} purchases for a total of {} items.",
                self.purchase_count, self.total_quantity
            ),
            format!(
                "On average you spent {:.2}€ per purchase and {:.2}€ per item.",
                self.average_per_purchase(),
                self.average_per_item()
            ),
        ]
    }
}

/// Where spending stands relative to the user's limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LimitStatus {
    /// No limit configured.
    Unset,
    /// Spending equals the limit.
    Hit {
        /// Configured limit in euros.
        limit: f64,
    },
    /// Spending is above the limit.
    Exceeded {
        /// Configured limit in euros.
        limit: f64,
        /// Amount spent past the limit.
        by: f64,
    },
    /// Spending is below the limit.
    Remaining {
        /// Configured limit in euros.
        limit: f64,
        /// Amount left before the limit.
        left: f64,
    },
}

impl LimitStatus {
    /// Compare `spent` against `limit`; a zero limit means none is set.
    pub fn evaluate(limit: f64, spent: f64) -> Self {
        if limit <= 0.0 {
            return Self::Unset;
        }
        let diff = limit - spent;
        if diff.abs() < LIMIT_EPSILON {
            Self::Hit { limit }
        } else if diff < 0.0 {
            Self::Exceeded { limit, by: -diff }
        } else {
            Self::Remaining { limit, left: diff }
        }
    }

    /// Sentence shown under the full report, if any.
    pub fn message(self) -> Option<String> {
        match self {
            Self::Unset => None,
            Self::Hit { limit } => Some(format!("You have hit your set limit of {limit:.2}€!")),
            Self::Exceeded { limit, by } => Some(format!(
                "You have exceeded your set limit of {limit:.2}€ by {by:.2}€!"
            )),
            Self::Remaining { limit, left } => Some(format!(
                "You have {left:.2}€ left before reaching your set limit of {limit:.2}€!"
            )),
        }
    }
}

/// Full report over every purchase, including the limit status.
pub fn full_report(purchases: &[Purchase], spending_limit: f64) -> Option<Vec<String>> {
    let summary = Summary::of(purchases)?;
    let mut lines = vec![
        "Here is a summary of your previous purchases:".to_string(),
        String::new(),
    ];
    lines.extend(summary.lines());
    lines.extend(LimitStatus::evaluate(spending_limit, summary.total_spending).message());
    Some(lines)
}

/// Report over purchases already narrowed by `filter = value`.
pub fn filtered_report(
    matching: &[Purchase],
    filter: ReportFilter,
    value: &str,
) -> Option<Vec<String>> {
    let summary = Summary::of(matching)?;
    let mut lines = vec![
        format!(
            "Here is a summary of your previous purchases, filtered for {} = {value}:",
            filter.label()
        ),
        String::new(),
    ];
    lines.extend(summary.lines());
    Some(lines)
}

/// `[i] purchase` lines with indices zero-padded to the widest index.
pub fn numbered_lines(purchases: &[Purchase]) -> Vec<String> {
    let width = purchases.len().saturating_sub(1).to_string().len();
    purchases
        .iter()
        .enumerate()
        .map(|(index, purchase)| format!("[{index:0width$}] {purchase}"))
        .collect()
}
