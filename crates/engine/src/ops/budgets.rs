use api_types::Period;
use api_types::budget::{Budget, BudgetItem, BudgetItemNew, BudgetItemUpdate, BudgetNew};
use chrono::Utc;
use docstore::{DocumentStore, FieldFilter};
use serde_json::{Value, json};

use crate::{EngineError, ResultEngine, docs, util};

use super::{COLLECTION_BUDGET_ITEMS, COLLECTION_BUDGETS, Engine, period_filters};

impl<S: DocumentStore> Engine<S> {
    /// Returns the budget for a month with its items attached, if any.
    ///
    /// Nothing in the store enforces `(month, year)` uniqueness; when more
    /// than one budget matches, the first is returned and the duplicate set
    /// is logged.
    pub async fn budget_for_period(&self, period: Period) -> ResultEngine<Option<Budget>> {
        util::validate_period(&period)?;

        let documents = self
            .store
            .query(COLLECTION_BUDGETS, &period_filters(period))
            .await?;
        if documents.len() > 1 {
            tracing::warn!(
                month = period.month,
                year = period.year,
                count = documents.len(),
                "duplicate budgets for period, returning the first"
            );
        }

        let Some(document) = documents.into_iter().next() else {
            return Ok(None);
        };
        let budget = self.attach_items(docs::decode(document)?).await?;
        Ok(Some(budget))
    }

    /// Returns every budget, each with its items attached.
    pub async fn budgets(&self) -> ResultEngine<Vec<Budget>> {
        let documents = self.store.query(COLLECTION_BUDGETS, &[]).await?;
        let mut budgets = Vec::with_capacity(documents.len());
        for document in documents {
            budgets.push(self.attach_items(docs::decode(document)?).await?);
        }
        Ok(budgets)
    }

    /// Creates the budget for a month, initially without items.
    ///
    /// A `(month, year)` pair that already has a budget is rejected; the
    /// read path still tolerates duplicates written by other clients.
    pub async fn create_budget(&self, payload: BudgetNew) -> ResultEngine<Budget> {
        let period = Period::new(payload.month, payload.year);
        util::validate_period(&period)?;

        let existing = self
            .store
            .query(COLLECTION_BUDGETS, &period_filters(period))
            .await?;
        if !existing.is_empty() {
            return Err(EngineError::ExistingKey(format!(
                "budget {}/{}",
                payload.month, payload.year
            )));
        }

        let fields = docs::object(json!({
            "month": payload.month,
            "year": payload.year,
            "created_at": Utc::now(),
        }))?;
        let document = self.store.insert(COLLECTION_BUDGETS, fields).await?;
        docs::decode(document)
    }

    /// Copies the previous month's items into the budget for `period`,
    /// creating the target budget when missing.
    ///
    /// Items whose name already exists in the target (case-insensitive)
    /// are skipped; copies keep their planned amount and start unspent.
    pub async fn copy_previous_month(&self, period: Period) -> ResultEngine<Budget> {
        util::validate_period(&period)?;

        let previous = period.previous();
        let source = self
            .budget_for_period(previous)
            .await?
            .ok_or_else(|| {
                EngineError::KeyNotFound(format!("budget {}/{}", previous.month, previous.year))
            })?;

        let target = match self.budget_for_period(period).await? {
            Some(budget) => budget,
            None => {
                self.create_budget(BudgetNew {
                    month: period.month,
                    year: period.year,
                })
                .await?
            }
        };

        for item in &source.budget_items {
            let duplicate = target
                .budget_items
                .iter()
                .any(|existing| existing.name.eq_ignore_ascii_case(&item.name));
            if duplicate {
                continue;
            }

            let fields = docs::object(json!({
                "budget_id": target.id,
                "name": item.name,
                "amount": item.amount,
                "spent": 0.0,
            }))?;
            self.store.insert(COLLECTION_BUDGET_ITEMS, fields).await?;
        }

        self.attach_items(Budget {
            budget_items: Vec::new(),
            ..target
        })
        .await
    }

    /// Adds an item to a budget.
    ///
    /// The parent may arrive flat (`budget_id`) or nested (`budget.id`);
    /// it is normalized to the flat back-reference before persisting.
    pub async fn add_budget_item(&self, payload: BudgetItemNew) -> ResultEngine<BudgetItem> {
        let budget_id = payload
            .budget_id
            .clone()
            .or_else(|| payload.budget.as_ref().map(|budget| budget.id.clone()))
            .ok_or_else(|| EngineError::KeyNotFound("missing budget id or reference".to_string()))?;
        let name = util::normalize_required_name(&payload.name, "budget item name")?;

        let mut fields = docs::fields_of(&payload)?;
        fields.remove("budget");
        fields.insert("budget_id".to_string(), Value::String(budget_id));
        fields.insert("name".to_string(), Value::String(name));
        fields.insert("spent".to_string(), json!(0.0));

        let document = self.store.insert(COLLECTION_BUDGET_ITEMS, fields).await?;
        docs::decode(document)
    }

    /// Applies a partial update to an item.
    ///
    /// `spent` tracks external postings only and is never recomputed as a
    /// side effect of an update.
    pub async fn update_budget_item(
        &self,
        id: &str,
        payload: BudgetItemUpdate,
    ) -> ResultEngine<BudgetItem> {
        let mut fields = serde_json::Map::new();
        if let Some(name) = &payload.name {
            let name = util::normalize_required_name(name, "budget item name")?;
            fields.insert("name".to_string(), Value::String(name));
        }
        if let Some(amount) = payload.amount {
            fields.insert("amount".to_string(), json!(amount.value()));
        }

        let document = self.store.update(COLLECTION_BUDGET_ITEMS, id, fields).await?;
        docs::decode(document)
    }

    /// Removes an item unconditionally.
    pub async fn remove_budget_item(&self, id: &str) -> ResultEngine<()> {
        self.store.delete(COLLECTION_BUDGET_ITEMS, id).await?;
        Ok(())
    }

    /// Attaches the item snapshot for one budget.
    ///
    /// One secondary equality query per budget: with every budget fetch
    /// this is an N+1 pattern, accepted only because budgets per account
    /// stay small. Batching would change the snapshot contract, not just
    /// the query plan.
    async fn attach_items(&self, mut budget: Budget) -> ResultEngine<Budget> {
        tracing::debug!(budget = %budget.id, "attaching budget items");
        let documents = self
            .store
            .query(
                COLLECTION_BUDGET_ITEMS,
                &[FieldFilter::new("budget_id", budget.id.clone())],
            )
            .await?;
        budget.budget_items = documents
            .into_iter()
            .map(docs::decode)
            .collect::<ResultEngine<_>>()?;
        Ok(budget)
    }
}
