//! Persisted user and purchase records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique login name.
    pub username: String,
    /// Stored as entered; see the design notes on authentication.
    pub password: String,
    /// Unique contact address.
    pub email: String,
    /// E.164 phone number.
    pub phone: String,
    /// Purchase history in entry order.
    #[serde(default)]
    pub purchases: Vec<Purchase>,
    /// Spending limit in euros; 0 means no limit.
    #[serde(default)]
    pub spending_limit: f64,
}

impl User {
    /// Whether an identical purchase was already recorded.
    pub fn has_purchase(&self, purchase: &Purchase) -> bool {
        self.purchases.iter().any(|existing| existing == purchase)
    }
}

/// A recorded purchase with its derived totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    /// Purchase date as `YYYY/MM/DD`.
    pub date: String,
    /// Lowercased seller name.
    pub seller: String,
    /// Lowercased item name.
    pub item_name: String,
    /// Cost of one unit in euros.
    pub cost: f64,
    /// Units bought.
    pub quantity: u32,
    /// `quantity * unit weight` in kilograms.
    pub total_weight: f64,
    /// `quantity * cost + delivery fee` in euros.
    pub total_cost: f64,
}

impl Purchase {
    /// Build a purchase, deriving its totals.
    pub fn new(
        date: String,
        seller: String,
        item_name: String,
        cost: f64,
        delivery_fee: f64,
        unit_weight: f64,
        quantity: u32,
    ) -> Self {
        let units = f64::from(quantity);
        Self {
            date,
            seller,
            item_name,
            cost,
            quantity,
            total_weight: units * unit_weight,
            total_cost: units * cost + delivery_fee,
        }
    }
}

impl fmt::Display for Purchase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} x {} at {:.2}€ | total {:.2}€ | {:.2} kg",
            self.date,
            self.seller,
            self.quantity,
            self.item_name,
            self.cost,
            self.total_cost,
            self.total_weight
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_include_delivery_fee_once() {
        let purchase = Purchase::new(
            "2024/03/01".into(),
            "amazon".into(),
            "cable".into(),
            2.5,
            4.0,
            0.25,
            4,
        );
        assert_eq!(purchase.total_cost, 14.0);
        assert_eq!(purchase.total_weight, 1.0);
        assert_eq!(
            purchase.to_string(),
            "2024/03/01 | amazon | 4 x cable at 2.50€ | total 14.00€ | 1.00 kg"
        );
    }

    #[test]
    fn missing_optional_fields_default() -> serde_json::Result<()> {
        let user: User = serde_json::from_str(
            r#"{"username":"bob","password":"x","email":"b@x.io","phone":"+4912345678"}"#,
        )?;
        assert!(user.purchases.is_empty());
        assert_eq!(user.spending_limit, 0.0);
        Ok(())
    }
}
