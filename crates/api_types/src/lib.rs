use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A weak reference to another document, carried as `{ "id": ... }`.
///
/// Nothing enforces that the target exists; a dangling reference is
/// tolerated and renders as an empty name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
}

impl EntityRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A calendar month scoping budgets and transactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// `1..=12`.
    pub month: u32,
    pub year: i32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Self {
        Self { month, year }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            year: date.year(),
        }
    }

    /// The preceding calendar month, wrapping December into the prior year.
    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                month: 12,
                year: self.year - 1,
            }
        } else {
            Self {
                month: self.month - 1,
                year: self.year,
            }
        }
    }

    /// The following calendar month, wrapping January into the next year.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                month: 1,
                year: self.year + 1,
            }
        } else {
            Self {
                month: self.month + 1,
                year: self.year,
            }
        }
    }
}

/// A monetary amount.
///
/// Form inputs reach the adapter either as a JSON number or as a numeric
/// string; both deserialize to the same `f64`, and the value always
/// serializes back as a number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Amount(pub f64);

impl Amount {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Ok(Amount(value)),
            Raw::Text(raw) => raw
                .trim()
                .parse::<f64>()
                .map(Amount)
                .map_err(|_| serde::de::Error::custom(format!("invalid amount: {raw}"))),
        }
    }
}

pub mod category {
    use super::*;
    use chrono::{DateTime, Utc};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Category {
        pub id: String,
        pub name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub created_at: Option<DateTime<Utc>>,
    }

    /// Upsert payload: an id selects a rename of the existing document,
    /// no id selects a create.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategorySave {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub id: Option<String>,
        pub name: String,
    }
}

pub mod budget {
    use super::*;
    use chrono::{DateTime, Utc};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Budget {
        pub id: String,
        pub month: u32,
        pub year: i32,
        pub created_at: DateTime<Utc>,
        /// Attached client-side at fetch time (a snapshot of the items whose
        /// `budget_id` matched); never persisted on the budget document.
        #[serde(default, skip_serializing)]
        pub budget_items: Vec<BudgetItem>,
    }

    #[derive(Clone, Copy, Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub month: u32,
        pub year: i32,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct BudgetItem {
        pub id: String,
        pub budget_id: String,
        pub name: String,
        /// Planned allocation.
        pub amount: f64,
        /// Running actual total, maintained externally; this layer never
        /// recomputes it from transactions.
        pub spent: f64,
    }

    /// The parent budget may arrive flat (`budget_id`) or nested
    /// (`budget.id`); the adapter normalizes to the flat field before
    /// persisting.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct BudgetItemNew {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub budget_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub budget: Option<EntityRef>,
        pub name: String,
        pub amount: Amount,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct BudgetItemUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub amount: Option<Amount>,
    }
}

pub mod transaction {
    use super::*;
    use chrono::{DateTime, Utc};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Transaction {
        pub id: String,
        pub description: String,
        pub amount: f64,
        /// Calendar date of the event (`YYYY-MM-DD` in JSON).
        pub date: NaiveDate,
        /// Derived from `date` at creation and stored redundantly so the
        /// store can serve the month scope as a two-field equality query.
        pub month: u32,
        pub year: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub budget_item: Option<EntityRef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category: Option<EntityRef>,
        pub user: EntityRef,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub description: String,
        pub amount: Amount,
        pub date: NaiveDate,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub budget_item: Option<EntityRef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category: Option<EntityRef>,
        pub user: EntityRef,
    }
}

pub mod user {
    use super::*;
    use chrono::{DateTime, Utc};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct User {
        pub id: String,
        pub username: String,
        pub created_at: DateTime<Utc>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_accepts_numbers_and_numeric_strings() {
        let from_number: Amount = serde_json::from_str("12.5").unwrap();
        let from_string: Amount = serde_json::from_str("\"12.5\"").unwrap();
        assert_eq!(from_number.value(), 12.5);
        assert_eq!(from_string.value(), 12.5);
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn amount_rejects_non_numeric_text() {
        assert!(serde_json::from_str::<Amount>("\"abc\"").is_err());
    }

    #[test]
    fn amount_serializes_as_number() {
        let raw = serde_json::to_string(&Amount(7.25)).unwrap();
        assert_eq!(raw, "7.25");
    }

    #[test]
    fn period_previous_wraps_december() {
        assert_eq!(Period::new(1, 2024).previous(), Period::new(12, 2023));
        assert_eq!(Period::new(3, 2024).previous(), Period::new(2, 2024));
    }

    #[test]
    fn period_next_wraps_january() {
        assert_eq!(Period::new(12, 2023).next(), Period::new(1, 2024));
        assert_eq!(Period::new(2, 2024).next(), Period::new(3, 2024));
    }

    #[test]
    fn period_from_date_extracts_calendar_fields() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(Period::from_date(date), Period::new(3, 2024));
    }
}
