use docstore::{DocumentStore, FieldFilter, MemoryStore, StoreError};
use serde_json::{Map, Value, json};

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

#[tokio::test]
async fn insert_assigns_distinct_ids_and_keeps_insertion_order() {
    let store = MemoryStore::new();

    let first = store
        .insert("categories", fields(json!({ "name": "Spesa" })))
        .await
        .unwrap();
    let second = store
        .insert("categories", fields(json!({ "name": "Affitto" })))
        .await
        .unwrap();
    assert_ne!(first.id, second.id);

    let all = store.query("categories", &[]).await.unwrap();
    let names: Vec<&str> = all
        .iter()
        .filter_map(|doc| doc.fields["name"].as_str())
        .collect();
    assert_eq!(names, ["Spesa", "Affitto"]);
}

#[tokio::test]
async fn query_applies_every_equality_filter() {
    let store = MemoryStore::new();
    store
        .insert("budgets", fields(json!({ "month": 3, "year": 2024 })))
        .await
        .unwrap();
    store
        .insert("budgets", fields(json!({ "month": 3, "year": 2025 })))
        .await
        .unwrap();
    store
        .insert("budgets", fields(json!({ "month": 4, "year": 2024 })))
        .await
        .unwrap();

    let march_2024 = store
        .query(
            "budgets",
            &[FieldFilter::new("month", 3), FieldFilter::new("year", 2024)],
        )
        .await
        .unwrap();
    assert_eq!(march_2024.len(), 1);
    assert_eq!(march_2024[0].fields["year"], json!(2024));
}

#[tokio::test]
async fn query_resolves_dotted_paths_into_nested_refs() {
    let store = MemoryStore::new();
    store
        .insert(
            "transactions",
            fields(json!({ "description": "caffè", "category": { "id": "C1" } })),
        )
        .await
        .unwrap();
    store
        .insert(
            "transactions",
            fields(json!({ "description": "pranzo", "category": { "id": "C2" } })),
        )
        .await
        .unwrap();
    store
        .insert("transactions", fields(json!({ "description": "senza" })))
        .await
        .unwrap();

    let matching = store
        .query("transactions", &[FieldFilter::new("category.id", "C1")])
        .await
        .unwrap();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].fields["description"], json!("caffè"));
}

#[tokio::test]
async fn update_merges_fields_and_leaves_the_rest_untouched() {
    let store = MemoryStore::new();
    let doc = store
        .insert(
            "budget_items",
            fields(json!({ "name": "Spesa", "amount": 100.0, "spent": 40.0 })),
        )
        .await
        .unwrap();

    let updated = store
        .update("budget_items", &doc.id, fields(json!({ "amount": 120.0 })))
        .await
        .unwrap();
    assert_eq!(updated.fields["amount"], json!(120.0));
    assert_eq!(updated.fields["name"], json!("Spesa"));
    assert_eq!(updated.fields["spent"], json!(40.0));
}

#[tokio::test]
async fn update_and_delete_fail_on_missing_ids() {
    let store = MemoryStore::new();
    store
        .insert("categories", fields(json!({ "name": "Spesa" })))
        .await
        .unwrap();

    let update = store
        .update("categories", "missing", fields(json!({ "name": "X" })))
        .await;
    assert!(matches!(update, Err(StoreError::NotFound(_))));

    let delete = store.delete("categories", "missing").await;
    assert!(matches!(delete, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn delete_removes_only_the_addressed_document() {
    let store = MemoryStore::new();
    let first = store
        .insert("categories", fields(json!({ "name": "Spesa" })))
        .await
        .unwrap();
    let second = store
        .insert("categories", fields(json!({ "name": "Affitto" })))
        .await
        .unwrap();

    store.delete("categories", &first.id).await.unwrap();

    let remaining = store.query("categories", &[]).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second.id);
}
