use api_types::{EntityRef, Period};
use api_types::transaction::TransactionNew;
use chrono::NaiveDate;
use docstore::MemoryStore;
use engine::{Engine, EngineError};
use serde_json::json;

fn engine_with_store() -> (Engine<MemoryStore>, MemoryStore) {
    let store = MemoryStore::new();
    (Engine::new(store.clone()), store)
}

fn transaction(description: &str, date: NaiveDate) -> TransactionNew {
    TransactionNew {
        description: description.to_string(),
        amount: 10.0.into(),
        date,
        budget_item: Some(EntityRef::new("I1")),
        category: Some(EntityRef::new("C1")),
        user: EntityRef::new("U1"),
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[tokio::test]
async fn add_transaction_derives_month_and_year_from_the_date() {
    let (engine, _store) = engine_with_store();

    let recorded = engine
        .add_transaction(transaction("Mercato", date(2024, 3, 15)))
        .await
        .unwrap();

    assert_eq!(recorded.month, 3);
    assert_eq!(recorded.year, 2024);
    assert_eq!(recorded.date, date(2024, 3, 15));
    assert!(!recorded.id.is_empty());
}

#[tokio::test]
async fn add_transaction_coerces_string_amounts() {
    let (engine, _store) = engine_with_store();

    let payload: TransactionNew = serde_json::from_value(json!({
        "description": "Caffè",
        "amount": "12.5",
        "date": "2024-03-15",
        "budget_item": { "id": "I1" },
        "category": { "id": "C1" },
        "user": { "id": "U1" },
    }))
    .unwrap();

    let recorded = engine.add_transaction(payload).await.unwrap();
    assert_eq!(recorded.amount, 12.5);
}

#[tokio::test]
async fn add_transaction_rejects_a_blank_description() {
    let (engine, _store) = engine_with_store();

    let result = engine
        .add_transaction(transaction("   ", date(2024, 3, 15)))
        .await;
    assert!(matches!(result, Err(EngineError::InvalidName(_))));
}

#[tokio::test]
async fn add_transaction_tolerates_missing_refs() {
    let (engine, _store) = engine_with_store();

    let recorded = engine
        .add_transaction(TransactionNew {
            description: "Contanti".to_string(),
            amount: 5.0.into(),
            date: date(2024, 3, 2),
            budget_item: None,
            category: None,
            user: EntityRef::new("U1"),
        })
        .await
        .unwrap();

    assert!(recorded.budget_item.is_none());
    assert!(recorded.category.is_none());

    let listed = engine.transactions(None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].category.is_none());
}

#[tokio::test]
async fn transactions_scope_to_the_requested_period() {
    let (engine, _store) = engine_with_store();

    engine
        .add_transaction(transaction("Mercato", date(2024, 3, 15)))
        .await
        .unwrap();
    engine
        .add_transaction(transaction("Caffè", date(2024, 3, 20)))
        .await
        .unwrap();
    engine
        .add_transaction(transaction("Treno", date(2024, 4, 2)))
        .await
        .unwrap();

    let march = engine
        .transactions(Some(Period::new(3, 2024)))
        .await
        .unwrap();
    let descriptions: Vec<&str> = march.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(descriptions, ["Mercato", "Caffè"]);

    let all = engine.transactions(None).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn transactions_reject_an_invalid_month_scope() {
    let (engine, _store) = engine_with_store();

    let result = engine.transactions(Some(Period::new(0, 2024))).await;
    assert!(matches!(result, Err(EngineError::InvalidDate(_))));
}
