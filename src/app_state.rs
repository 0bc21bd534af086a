//! Implements a struct that holds the application's in-memory state.

use time::OffsetDateTime;

use crate::{
    Error,
    category::{self, CategoryCatalog, CustomCategoryRecord},
    collection::{self, Collection, CollectionId},
    ids::IdGenerator,
    purchase::{self, Purchase, PurchaseDraft, PurchaseId},
    store::DocumentStore,
    user::{self, UserId, UserProfile},
};

/// The state of the application for one signed-in user.
///
/// This is the single coordinator the screens act through: it owns the
/// store handle and the authoritative in-memory copies of the catalog,
/// purchase list, collection list and profile, and every action keeps
/// those copies consistent with the store by writing first and
/// reflecting the change only on success.
///
/// Two `AppState` values over the same store make no attempt to stay
/// consistent with each other; each sees the other's writes only after
/// its next [load](AppState::load).
#[derive(Debug)]
pub struct AppState<S: DocumentStore> {
    store: S,
    user: UserId,
    ids: IdGenerator,
    catalog: CategoryCatalog,
    purchases: Vec<Purchase>,
    collections: Vec<Collection>,
    profile: Option<UserProfile>,
}

impl<S: DocumentStore> AppState<S> {
    /// Create an empty state for `user` over `store`.
    ///
    /// The state starts blank; call [load](AppState::load) to populate it.
    pub fn new(store: S, user: UserId) -> Self {
        Self {
            store,
            user,
            ids: IdGenerator::random(),
            catalog: CategoryCatalog::default(),
            purchases: Vec::new(),
            collections: Vec::new(),
            profile: None,
        }
    }

    /// Replace the document ID generator, e.g. with a deterministic
    /// sequence in tests.
    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// Fetch the catalog, purchases, collections and profile from the
    /// store, replacing the in-memory state wholesale.
    pub async fn load(&mut self) -> Result<(), Error> {
        self.catalog = category::load_catalog(&self.store, &self.user).await?;
        self.purchases = purchase::load_purchases(&self.store, &self.user).await?;
        self.collections = collection::load_collections(&self.store, &self.user).await?;
        self.profile = user::load_profile(&self.store, &self.user).await?;

        Ok(())
    }

    /// The merged category catalog.
    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    /// The user's purchases, newest first.
    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    /// The user's collections, newest first.
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    /// The user's profile, if one has been saved.
    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Create a custom subcategory. See [category::add_custom_category].
    pub async fn add_custom_category(
        &mut self,
        category: &str,
        name: &str,
    ) -> Result<CustomCategoryRecord, Error> {
        category::add_custom_category(
            &self.store,
            &self.user,
            &self.ids,
            &mut self.catalog,
            category,
            name,
        )
        .await
    }

    /// Rename or move a custom subcategory. See
    /// [category::edit_custom_category].
    pub async fn edit_custom_category(
        &mut self,
        id: &str,
        new_category: &str,
        new_name: &str,
    ) -> Result<(), Error> {
        category::edit_custom_category(
            &self.store,
            &self.user,
            &mut self.catalog,
            id,
            new_category,
            new_name,
        )
        .await
    }

    /// Delete a custom subcategory. See
    /// [category::delete_custom_category].
    pub async fn delete_custom_category(&mut self, id: &str) -> Result<(), Error> {
        category::delete_custom_category(&self.store, &self.user, &mut self.catalog, id).await
    }

    /// Validate a draft and create a purchase. See
    /// [purchase::create_purchase].
    pub async fn create_purchase(&mut self, draft: &PurchaseDraft) -> Result<Purchase, Error> {
        purchase::create_purchase(
            &self.store,
            &self.user,
            &self.ids,
            &mut self.purchases,
            draft,
        )
        .await
    }

    /// Validate a draft and rewrite an existing purchase. See
    /// [purchase::update_purchase].
    pub async fn update_purchase(
        &mut self,
        key: &str,
        draft: &PurchaseDraft,
    ) -> Result<Purchase, Error> {
        purchase::update_purchase(&self.store, &self.user, &mut self.purchases, key, draft).await
    }

    /// Delete one purchase. See [purchase::delete_purchase].
    pub async fn delete_purchase(&mut self, key: &str) -> Result<(), Error> {
        purchase::delete_purchase(&self.store, &self.user, &mut self.purchases, key).await
    }

    /// Delete several purchases concurrently. See
    /// [purchase::bulk_delete_purchases].
    pub async fn delete_purchases(&mut self, keys: &[PurchaseId]) -> Result<(), Error> {
        purchase::bulk_delete_purchases(&self.store, &self.user, &mut self.purchases, keys).await
    }

    /// Log one wear of a purchase. See [purchase::record_wear].
    pub async fn record_wear(
        &mut self,
        key: &str,
        worn_at: OffsetDateTime,
    ) -> Result<(), Error> {
        purchase::record_wear(&self.store, &self.user, &mut self.purchases, key, worn_at).await
    }

    /// Create an empty collection. See [collection::create_collection].
    pub async fn create_collection(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<Collection, Error> {
        collection::create_collection(
            &self.store,
            &self.user,
            &self.ids,
            &mut self.collections,
            name,
            description,
        )
        .await
    }

    /// Delete a collection. See [collection::delete_collection].
    pub async fn delete_collection(&mut self, id: &str) -> Result<(), Error> {
        collection::delete_collection(&self.store, &self.user, &mut self.collections, id).await
    }

    /// Add purchases to collections with set-union semantics. See
    /// [collection::add_items_to_collections].
    pub async fn add_items_to_collections(
        &mut self,
        item_ids: &[PurchaseId],
        collection_ids: &[CollectionId],
    ) -> Result<(), Error> {
        collection::add_items_to_collections(
            &self.store,
            &self.user,
            &mut self.collections,
            item_ids,
            collection_ids,
        )
        .await
    }

    /// Save the user's profile and keep a copy in memory.
    pub async fn save_profile(&mut self, profile: UserProfile) -> Result<(), Error> {
        user::save_profile(&self.store, &self.user, &profile).await?;
        self.profile = Some(profile);

        Ok(())
    }
}

#[cfg(test)]
mod app_state_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        AppState,
        category::CategorySelection,
        purchase::PurchaseDraft,
        store::{SqliteDocumentStore, create_document_table},
        user::UserId,
    };

    fn get_test_state() -> AppState<SqliteDocumentStore> {
        let connection = Connection::open_in_memory().expect("Could not open in-memory database");
        create_document_table(&connection).expect("Could not create document table");
        let store = SqliteDocumentStore::new(Arc::new(Mutex::new(connection)));

        AppState::new(store, UserId::new("alice"))
    }

    #[tokio::test]
    async fn load_on_an_empty_store_yields_the_default_state() {
        let mut state = get_test_state();

        state.load().await.expect("Could not load state");

        assert!(!state.catalog().categories().is_empty());
        assert!(state.catalog().custom().is_empty());
        assert!(state.purchases().is_empty());
        assert!(state.collections().is_empty());
        assert_eq!(state.profile(), None);
    }

    #[tokio::test]
    async fn created_purchases_are_visible_through_the_accessor() {
        let mut state = get_test_state();
        state.load().await.expect("Could not load state");

        let draft = PurchaseDraft {
            name: "Raincoat".to_string(),
            category: CategorySelection {
                category: "Outerwear".to_string(),
                sub_category: None,
            },
            note: String::new(),
            regular_price: String::new(),
            paid_price: "89.99".to_string(),
            date_purchased: date!(2025 - 06 - 14),
        };

        let purchase = state
            .create_purchase(&draft)
            .await
            .expect("Could not create purchase");

        assert_eq!(state.purchases(), [purchase]);
    }
}
