//! End-to-end flows through [AppState] against the SQLite store.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use rusqlite::Connection;
use time::macros::{date, datetime};

use wardrobe_rs::{
    AppState,
    category::{CatalogRow, CategorySelection, ExpandedSet, filter_catalog},
    ids::IdGenerator,
    purchase::PurchaseDraft,
    store::{SqliteDocumentStore, create_document_table},
    user::UserId,
};

fn open_store() -> SqliteDocumentStore {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    create_document_table(&connection).expect("Could not create document table");

    SqliteDocumentStore::new(Arc::new(Mutex::new(connection)))
}

fn get_test_state() -> AppState<SqliteDocumentStore> {
    let counter = AtomicUsize::new(0);
    let ids = IdGenerator::from_fn(move || format!("id-{}", counter.fetch_add(1, Ordering::SeqCst)));

    AppState::new(open_store(), UserId::new("alice")).with_id_generator(ids)
}

fn draft(name: &str, paid: &str, selection: CategorySelection) -> PurchaseDraft {
    PurchaseDraft {
        name: name.to_string(),
        category: selection,
        note: String::new(),
        regular_price: String::new(),
        paid_price: paid.to_string(),
        date_purchased: date!(2025 - 06 - 14),
    }
}

fn subcategory_count(state: &AppState<SqliteDocumentStore>, category: &str) -> usize {
    state
        .catalog()
        .category(category)
        .map(|category| category.subcategories.len())
        .unwrap_or(0)
}

#[tokio::test]
async fn adding_a_custom_subcategory_twice_does_not_grow_the_tree() {
    let mut state = get_test_state();
    state.load().await.expect("Could not load state");
    let default_count = subcategory_count(&state, "Footwear");

    let record = state
        .add_custom_category("Footwear", "Sneakers")
        .await
        .expect("Could not add custom category");

    assert_eq!(subcategory_count(&state, "Footwear"), default_count + 1);
    assert_eq!(state.catalog().custom().len(), 1);

    let footwear = state
        .catalog()
        .category("Footwear")
        .expect("Footwear is missing");
    let added = footwear
        .subcategories
        .iter()
        .find(|sub| sub.id == record.id)
        .expect("the new subcategory is missing from the tree");
    assert_eq!(added.name, "Sneakers");
    assert!(added.custom);

    // A second add with the same names stores a second record but leaves
    // the tree's subcategory count unchanged.
    state
        .add_custom_category("Footwear", "Sneakers")
        .await
        .expect("Could not add duplicate custom category");

    assert_eq!(subcategory_count(&state, "Footwear"), default_count + 1);
}

#[tokio::test]
async fn the_catalog_survives_a_reload() {
    let mut state = get_test_state();
    state.load().await.expect("Could not load state");

    state
        .add_custom_category("Footwear", "Sneakers")
        .await
        .expect("Could not add custom category");
    state
        .add_custom_category("Costumes", "Halloween")
        .await
        .expect("Could not add custom category");

    let before = state.catalog().clone();
    state.load().await.expect("Could not reload state");

    assert_eq!(state.catalog(), &before);
}

#[tokio::test]
async fn deleting_a_moved_custom_subcategory_removes_it_everywhere() {
    let mut state = get_test_state();
    state.load().await.expect("Could not load state");

    let record = state
        .add_custom_category("Footwear", "Sneakers")
        .await
        .expect("Could not add custom category");
    state
        .edit_custom_category(&record.id, "Sportswear", "Sneakers")
        .await
        .expect("Could not edit custom category");

    state
        .delete_custom_category(&record.id)
        .await
        .expect("Could not delete custom category");

    assert!(state.catalog().custom().is_empty());
    for category in state.catalog().categories() {
        assert!(
            !category.subcategories.iter().any(|sub| sub.id == record.id),
            "category \"{}\" still holds the deleted subcategory",
            category.name
        );
    }
}

#[tokio::test]
async fn a_rejected_purchase_never_reaches_the_store() {
    let mut state = get_test_state();
    state.load().await.expect("Could not load state");
    let selection = CategorySelection {
        category: "Outerwear".to_string(),
        sub_category: None,
    };
    let mut overpaid = draft("Raincoat", "150", selection);
    overpaid.regular_price = "129.99".to_string();

    let result = state.create_purchase(&overpaid).await;

    let error = result.expect_err("an overpaid purchase should be rejected");
    assert!(error.is_validation());
    assert!(state.purchases().is_empty());

    state.load().await.expect("Could not reload state");
    assert!(state.purchases().is_empty());
}

#[tokio::test]
async fn purchases_keep_stale_category_copies_after_a_category_edit() {
    let mut state = get_test_state();
    state.load().await.expect("Could not load state");

    let record = state
        .add_custom_category("Footwear", "Sneakers")
        .await
        .expect("Could not add custom category");
    let selection = CategorySelection {
        category: record.category.clone(),
        sub_category: state
            .catalog()
            .category(&record.category)
            .and_then(|category| {
                category
                    .subcategories
                    .iter()
                    .find(|sub| sub.id == record.id)
                    .cloned()
            }),
    };
    let purchase = state
        .create_purchase(&draft("Court Trainers", "89", selection))
        .await
        .expect("Could not create purchase");

    state
        .edit_custom_category(&record.id, "Footwear", "Trainers")
        .await
        .expect("Could not edit custom category");

    // The purchase still shows the name it was saved with; only the
    // catalog reflects the edit.
    let stored = state
        .purchases()
        .iter()
        .find(|stored| stored.key == purchase.key)
        .expect("the purchase is missing");
    let copy = stored
        .category
        .sub_category
        .as_ref()
        .expect("the purchase lost its subcategory");
    assert_eq!(copy.name, "Sneakers");
    assert_eq!(state.catalog().custom()[0].name, "Trainers");
}

#[tokio::test]
async fn bulk_delete_clears_store_and_memory_together() {
    let mut state = get_test_state();
    state.load().await.expect("Could not load state");
    let selection = CategorySelection {
        category: "Tops".to_string(),
        sub_category: None,
    };

    for name in ["Shirt", "Sweater", "Hoodie"] {
        state
            .create_purchase(&draft(name, "25", selection.clone()))
            .await
            .expect("Could not create purchase");
    }
    let keys: Vec<String> = state
        .purchases()
        .iter()
        .take(2)
        .map(|purchase| purchase.key.clone())
        .collect();

    state
        .delete_purchases(&keys)
        .await
        .expect("Could not bulk delete purchases");

    assert_eq!(state.purchases().len(), 1);
    state.load().await.expect("Could not reload state");
    assert_eq!(state.purchases().len(), 1);
}

#[tokio::test]
async fn wears_accumulate_and_survive_an_update() {
    let mut state = get_test_state();
    state.load().await.expect("Could not load state");
    let selection = CategorySelection {
        category: "Footwear".to_string(),
        sub_category: None,
    };
    let purchase = state
        .create_purchase(&draft("Boots", "120", selection.clone()))
        .await
        .expect("Could not create purchase");

    for hour in [9, 13, 18] {
        let worn_at = datetime!(2025-07-01 00:00 UTC).replace_hour(hour).expect("Could not build timestamp");
        state
            .record_wear(&purchase.key, worn_at)
            .await
            .expect("Could not record wear");
    }

    state
        .update_purchase(&purchase.key, &draft("Chelsea Boots", "120", selection))
        .await
        .expect("Could not update purchase");

    let updated = &state.purchases()[0];
    assert_eq!(updated.name, "Chelsea Boots");
    assert_eq!(updated.wear_count(), 3);
    assert_eq!(updated.wear_level(), "👟 Lightly Worn");
    assert_eq!(updated.cost_per_wear(), 4000);
}

#[tokio::test]
async fn collections_union_items_across_screens_and_reloads() {
    let mut state = get_test_state();
    state.load().await.expect("Could not load state");
    let selection = CategorySelection {
        category: "Tops".to_string(),
        sub_category: None,
    };
    let shirt = state
        .create_purchase(&draft("Shirt", "25", selection.clone()))
        .await
        .expect("Could not create purchase");
    let sweater = state
        .create_purchase(&draft("Sweater", "40", selection))
        .await
        .expect("Could not create purchase");
    let collection = state
        .create_collection("Work Wardrobe", "office fits")
        .await
        .expect("Could not create collection");

    state
        .add_items_to_collections(
            &[shirt.key.clone(), sweater.key.clone()],
            &[collection.id.clone()],
        )
        .await
        .expect("Could not add items");
    state
        .add_items_to_collections(&[shirt.key.clone()], &[collection.id.clone()])
        .await
        .expect("Could not re-add an item");

    state.load().await.expect("Could not reload state");

    assert_eq!(state.collections()[0].items, [shirt.key, sweater.key]);
}

#[tokio::test]
async fn the_dropdown_finds_custom_subcategories_by_substring() {
    let mut state = get_test_state();
    state.load().await.expect("Could not load state");
    state
        .add_custom_category("Footwear", "Sneakers")
        .await
        .expect("Could not add custom category");

    let rows = filter_catalog(state.catalog(), "sneak", &ExpandedSet::new());

    assert_eq!(
        rows.iter()
            .filter(|row| matches!(row, CatalogRow::Entry { .. }))
            .count(),
        1
    );
    assert!(matches!(
        &rows[0],
        CatalogRow::Header { category } if category == "Footwear"
    ));
}
