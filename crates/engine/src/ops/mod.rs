use api_types::Period;
use docstore::{DocumentStore, FieldFilter};

mod budgets;
mod categories;
mod transactions;
mod users;

pub(crate) const COLLECTION_BUDGETS: &str = "budgets";
pub(crate) const COLLECTION_BUDGET_ITEMS: &str = "budget_items";
pub(crate) const COLLECTION_CATEGORIES: &str = "categories";
pub(crate) const COLLECTION_TRANSACTIONS: &str = "transactions";
pub(crate) const COLLECTION_USERS: &str = "users";

/// The adapter: translates typed operations into document-store round
/// trips. The operation set is closed and resolved at compile time.
#[derive(Debug)]
pub struct Engine<S> {
    store: S,
}

impl<S: DocumentStore> Engine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

/// The two-field equality scope shared by budgets and transactions.
pub(crate) fn period_filters(period: Period) -> Vec<FieldFilter> {
    vec![
        FieldFilter::new("month", period.month),
        FieldFilter::new("year", period.year),
    ]
}
