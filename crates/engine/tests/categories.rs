use api_types::EntityRef;
use api_types::category::CategorySave;
use api_types::transaction::TransactionNew;
use chrono::NaiveDate;
use docstore::MemoryStore;
use engine::{Engine, EngineError};

fn engine_with_store() -> (Engine<MemoryStore>, MemoryStore) {
    let store = MemoryStore::new();
    (Engine::new(store.clone()), store)
}

fn save(name: &str) -> CategorySave {
    CategorySave {
        id: None,
        name: name.to_string(),
    }
}

#[tokio::test]
async fn save_creates_and_lists_in_store_order() {
    let (engine, _store) = engine_with_store();

    engine.save_category(save("Spesa")).await.unwrap();
    engine.save_category(save("Affitto")).await.unwrap();

    let categories = engine.categories().await.unwrap();
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Spesa", "Affitto"]);
    assert!(categories.iter().all(|c| !c.id.is_empty()));
}

#[tokio::test]
async fn save_with_id_renames_and_touches_nothing_else() {
    let (engine, _store) = engine_with_store();

    let created = engine.save_category(save("Spessa")).await.unwrap();
    let renamed = engine
        .save_category(CategorySave {
            id: Some(created.id.clone()),
            name: "Spesa".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(renamed.id, created.id);
    assert_eq!(renamed.name, "Spesa");
    assert_eq!(renamed.created_at, created.created_at);

    let categories = engine.categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Spesa");
}

#[tokio::test]
async fn save_trims_and_rejects_blank_names() {
    let (engine, _store) = engine_with_store();

    let trimmed = engine.save_category(save("  Spesa  ")).await.unwrap();
    assert_eq!(trimmed.name, "Spesa");

    let blank = engine.save_category(save("   ")).await;
    assert!(matches!(blank, Err(EngineError::InvalidName(_))));
}

#[tokio::test]
async fn delete_removes_an_unreferenced_category() {
    let (engine, _store) = engine_with_store();

    let category = engine.save_category(save("Spesa")).await.unwrap();
    engine.delete_category(&category.id).await.unwrap();

    assert!(engine.categories().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_fails_while_a_transaction_references_the_category() {
    let (engine, _store) = engine_with_store();

    let category = engine.save_category(save("Spesa")).await.unwrap();
    engine
        .add_transaction(TransactionNew {
            description: "Mercato".to_string(),
            amount: 42.0.into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            budget_item: None,
            category: Some(EntityRef::new(category.id.clone())),
            user: EntityRef::new("U1"),
        })
        .await
        .unwrap();

    let result = engine.delete_category(&category.id).await;
    assert!(matches!(result, Err(EngineError::CategoryInUse(_))));

    // The refused delete must leave the category in place.
    let categories = engine.categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].id, category.id);
}
