//! The transactions view-model.
//!
//! Combines fetched transactions, the month's budget items, and the
//! categories into the derived, sorted, filtered list the transactions
//! screen renders. The derivation is recomputed from the fetched list on
//! every request; the only mutable pieces are [`SortState`] and
//! [`TransactionFilters`].

use api_types::budget::BudgetItem;
use api_types::category::Category;
use api_types::transaction::Transaction;

/// Column a sort request addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Description,
    BudgetItem,
    Category,
    Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// The active sort key and its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::Date,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    /// Requesting the active key flips the direction; any other key is
    /// selected and resets to ascending.
    pub fn request(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
        } else {
            self.key = key;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// The three independent filter predicates of the transactions screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilters {
    /// Case-insensitive substring match on the description.
    pub text: String,
    pub category_id: Option<String>,
    pub budget_item_id: Option<String>,
}

impl TransactionFilters {
    /// Resets all three predicates in one transition; no partially cleared
    /// state is observable.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.category_id.is_none() && self.budget_item_id.is_none()
    }

    /// A row passes iff all three predicates pass. A transaction missing a
    /// reference never matches a set relational filter.
    fn matches(&self, row: &TransactionRow) -> bool {
        let matches_text = self.text.is_empty()
            || row
                .transaction
                .description
                .to_lowercase()
                .contains(&self.text.to_lowercase());
        let matches_category = self.category_id.as_deref().is_none_or(|id| {
            row.transaction
                .category
                .as_ref()
                .is_some_and(|category| category.id == id)
        });
        let matches_budget_item = self.budget_item_id.as_deref().is_none_or(|id| {
            row.transaction
                .budget_item
                .as_ref()
                .is_some_and(|item| item.id == id)
        });
        matches_text && matches_category && matches_budget_item
    }
}

/// A transaction joined with the display names of its weak references.
///
/// A missing or dangling reference yields the empty string, which sorts
/// first in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    pub transaction: Transaction,
    pub budget_item_name: String,
    pub category_name: String,
}

/// The client-side join of transactions with their referenced names.
pub fn rows(
    transactions: &[Transaction],
    budget_items: &[BudgetItem],
    categories: &[Category],
) -> Vec<TransactionRow> {
    transactions
        .iter()
        .map(|transaction| {
            let budget_item_name = transaction
                .budget_item
                .as_ref()
                .and_then(|reference| budget_items.iter().find(|item| item.id == reference.id))
                .map(|item| item.name.clone())
                .unwrap_or_default();
            let category_name = transaction
                .category
                .as_ref()
                .and_then(|reference| categories.iter().find(|category| category.id == reference.id))
                .map(|category| category.name.clone())
                .unwrap_or_default();
            TransactionRow {
                transaction: transaction.clone(),
                budget_item_name,
                category_name,
            }
        })
        .collect()
}

/// Stable sort by the chosen key: equal keys keep their input order, in
/// both directions.
pub fn sort_rows(rows: &mut [TransactionRow], sort: SortState) {
    rows.sort_by(|a, b| {
        let ordering = match sort.key {
            SortKey::Date => a.transaction.date.cmp(&b.transaction.date),
            SortKey::Description => a.transaction.description.cmp(&b.transaction.description),
            SortKey::BudgetItem => a.budget_item_name.cmp(&b.budget_item_name),
            SortKey::Category => a.category_name.cmp(&b.category_name),
            SortKey::Amount => a.transaction.amount.total_cmp(&b.transaction.amount),
        };
        match sort.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// The derived list: join, stable sort, then filter.
///
/// Filtering runs after sorting and only drops rows, so two rows that both
/// survive keep their sorted relative order.
pub fn visible_rows(
    transactions: &[Transaction],
    budget_items: &[BudgetItem],
    categories: &[Category],
    sort: SortState,
    filters: &TransactionFilters,
) -> Vec<TransactionRow> {
    let mut rows = rows(transactions, budget_items, categories);
    sort_rows(&mut rows, sort);
    rows.retain(|row| filters.matches(row));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::EntityRef;
    use chrono::{Datelike, NaiveDate, Utc};

    fn tx(
        id: &str,
        description: &str,
        date: (i32, u32, u32),
        amount: f64,
        budget_item: Option<&str>,
        category: Option<&str>,
    ) -> Transaction {
        let date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        Transaction {
            id: id.to_string(),
            description: description.to_string(),
            amount,
            date,
            month: date.month(),
            year: date.year(),
            budget_item: budget_item.map(EntityRef::new),
            category: category.map(EntityRef::new),
            user: EntityRef::new("U1"),
            created_at: Utc::now(),
        }
    }

    fn budget_item(id: &str, name: &str) -> BudgetItem {
        BudgetItem {
            id: id.to_string(),
            budget_id: "B1".to_string(),
            name: name.to_string(),
            amount: 100.0,
            spent: 0.0,
        }
    }

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            created_at: None,
        }
    }

    fn ids(rows: &[TransactionRow]) -> Vec<&str> {
        rows.iter().map(|row| row.transaction.id.as_str()).collect()
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let transactions = vec![
            tx("T1", "Caffè", (2024, 3, 10), 3.0, None, None),
            tx("T2", "Pranzo", (2024, 3, 10), 12.0, None, None),
            tx("T3", "Cena", (2024, 3, 10), 25.0, None, None),
        ];
        let sort = SortState {
            key: SortKey::Date,
            direction: SortDirection::Ascending,
        };

        let sorted = visible_rows(&transactions, &[], &[], sort, &TransactionFilters::default());
        assert_eq!(ids(&sorted), ["T1", "T2", "T3"]);

        let reversed = visible_rows(
            &transactions,
            &[],
            &[],
            SortState {
                key: SortKey::Date,
                direction: SortDirection::Descending,
            },
            &TransactionFilters::default(),
        );
        assert_eq!(ids(&reversed), ["T1", "T2", "T3"]);
    }

    #[test]
    fn toggling_the_same_key_twice_returns_to_the_first_ascending_order() {
        let transactions = vec![
            tx("T1", "Pranzo", (2024, 3, 12), 12.0, None, None),
            tx("T2", "Caffè", (2024, 3, 10), 3.0, None, None),
            tx("T3", "Cena", (2024, 3, 11), 25.0, None, None),
        ];
        let mut sort = SortState::default();

        sort.request(SortKey::Description);
        let first = visible_rows(&transactions, &[], &[], sort, &TransactionFilters::default());
        assert_eq!(ids(&first), ["T2", "T3", "T1"]);

        sort.request(SortKey::Description);
        assert_eq!(sort.direction, SortDirection::Descending);
        let flipped = visible_rows(&transactions, &[], &[], sort, &TransactionFilters::default());
        assert_eq!(ids(&flipped), ["T1", "T3", "T2"]);

        sort.request(SortKey::Description);
        let again = visible_rows(&transactions, &[], &[], sort, &TransactionFilters::default());
        assert_eq!(again, first);
    }

    #[test]
    fn a_different_key_resets_the_direction_to_ascending() {
        let mut sort = SortState::default();
        assert_eq!(sort.direction, SortDirection::Descending);

        sort.request(SortKey::Amount);
        assert_eq!(sort.key, SortKey::Amount);
        assert_eq!(sort.direction, SortDirection::Ascending);
    }

    #[test]
    fn relational_keys_compare_display_names_not_ids() {
        // Id order is the reverse of name order; the sort must follow names.
        let budget_items = vec![budget_item("I1", "Zaino"), budget_item("I2", "Affitto")];
        let transactions = vec![
            tx("T1", "a", (2024, 3, 1), 1.0, Some("I1"), None),
            tx("T2", "b", (2024, 3, 2), 2.0, Some("I2"), None),
        ];
        let sort = SortState {
            key: SortKey::BudgetItem,
            direction: SortDirection::Ascending,
        };

        let sorted = visible_rows(
            &transactions,
            &budget_items,
            &[],
            sort,
            &TransactionFilters::default(),
        );
        assert_eq!(ids(&sorted), ["T2", "T1"]);
    }

    #[test]
    fn missing_and_dangling_refs_sort_first_ascending() {
        let categories = vec![category("C1", "Spesa")];
        let transactions = vec![
            tx("T1", "a", (2024, 3, 1), 1.0, None, Some("C1")),
            tx("T2", "b", (2024, 3, 2), 2.0, None, None),
            tx("T3", "c", (2024, 3, 3), 3.0, None, Some("C-gone")),
        ];
        let sort = SortState {
            key: SortKey::Category,
            direction: SortDirection::Ascending,
        };

        let sorted = visible_rows(&transactions, &[], &categories, sort, &TransactionFilters::default());
        // Empty names (missing and dangling) first, in input order.
        assert_eq!(ids(&sorted), ["T2", "T3", "T1"]);
    }

    #[test]
    fn amount_sorts_numerically() {
        let transactions = vec![
            tx("T1", "a", (2024, 3, 1), 10.0, None, None),
            tx("T2", "b", (2024, 3, 2), 2.5, None, None),
            tx("T3", "c", (2024, 3, 3), 7.25, None, None),
        ];
        let sort = SortState {
            key: SortKey::Amount,
            direction: SortDirection::Ascending,
        };

        let sorted = visible_rows(&transactions, &[], &[], sort, &TransactionFilters::default());
        assert_eq!(ids(&sorted), ["T2", "T3", "T1"]);
    }

    #[test]
    fn the_text_filter_is_a_case_insensitive_substring_match() {
        let transactions = vec![
            tx("T1", "Caffè al banco", (2024, 3, 1), 1.2, None, None),
            tx("T2", "Pranzo", (2024, 3, 2), 12.0, None, None),
        ];
        let filters = TransactionFilters {
            text: "CAFF".to_string(),
            ..Default::default()
        };

        let visible = visible_rows(&transactions, &[], &[], SortState::default(), &filters);
        assert_eq!(ids(&visible), ["T1"]);
    }

    #[test]
    fn filters_combine_intersectively() {
        let transactions = vec![
            tx("T1", "caffè", (2024, 3, 1), 1.2, Some("I1"), Some("C1")),
            tx("T2", "caffè", (2024, 3, 2), 1.2, Some("I2"), Some("C1")),
            tx("T3", "caffè", (2024, 3, 3), 1.2, Some("I1"), Some("C2")),
            tx("T4", "pranzo", (2024, 3, 4), 12.0, Some("I1"), Some("C1")),
        ];
        let filters = TransactionFilters {
            text: "caffè".to_string(),
            category_id: Some("C1".to_string()),
            budget_item_id: Some("I1".to_string()),
        };

        let visible = visible_rows(&transactions, &[], &[], SortState::default(), &filters);
        assert_eq!(ids(&visible), ["T1"]);
    }

    #[test]
    fn a_missing_ref_never_matches_a_set_relational_filter() {
        let transactions = vec![
            tx("T1", "caffè", (2024, 3, 1), 1.2, None, None),
            tx("T2", "caffè", (2024, 3, 2), 1.2, Some("I1"), Some("C1")),
        ];
        let filters = TransactionFilters {
            text: String::new(),
            category_id: Some("C1".to_string()),
            budget_item_id: None,
        };

        let visible = visible_rows(&transactions, &[], &[], SortState::default(), &filters);
        assert_eq!(ids(&visible), ["T2"]);
    }

    #[test]
    fn filtering_is_idempotent_and_keeps_the_sorted_order() {
        let transactions = vec![
            tx("T1", "caffè doppio", (2024, 3, 12), 2.4, None, None),
            tx("T2", "pranzo", (2024, 3, 10), 12.0, None, None),
            tx("T3", "caffè", (2024, 3, 11), 1.2, None, None),
        ];
        let sort = SortState {
            key: SortKey::Date,
            direction: SortDirection::Ascending,
        };
        let filters = TransactionFilters {
            text: "caffè".to_string(),
            ..Default::default()
        };

        let once = visible_rows(&transactions, &[], &[], sort, &filters);
        assert_eq!(ids(&once), ["T3", "T1"]);

        let again: Vec<TransactionRow> = once
            .iter()
            .filter(|row| filters.matches(row))
            .cloned()
            .collect();
        assert_eq!(again, once);
    }

    #[test]
    fn clear_resets_all_three_predicates_at_once() {
        let transactions = vec![
            tx("T1", "caffè", (2024, 3, 12), 2.4, Some("I1"), Some("C1")),
            tx("T2", "pranzo", (2024, 3, 10), 12.0, Some("I2"), Some("C2")),
        ];
        let sort = SortState::default();
        let mut filters = TransactionFilters {
            text: "coffee".to_string(),
            category_id: Some("C1".to_string()),
            budget_item_id: Some("I1".to_string()),
        };

        filters.clear();
        assert!(filters.is_empty());

        let visible = visible_rows(&transactions, &[], &[], sort, &filters);
        let unfiltered = visible_rows(
            &transactions,
            &[],
            &[],
            sort,
            &TransactionFilters::default(),
        );
        assert_eq!(visible, unfiltered);
    }
}
