//! A SQLite-backed document store.
//!
//! Documents are kept as JSON bodies in a single table keyed by
//! `(user_id, collection, id)`. This backend stands in for the cloud
//! store behind the same [DocumentStore] contract and is what the seed
//! binary and the test suite run against.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Row};

use crate::{
    store::{Document, DocumentStore, Fields, Patch, StoreError},
    user::UserId,
};

/// A [DocumentStore] holding JSON document bodies in SQLite.
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteDocumentStore {
    /// Create a store over an existing database connection.
    ///
    /// The caller should ensure the document table exists, e.g. via
    /// [create_document_table].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.connection
            .lock()
            .map_err(|_| StoreError::Backend("the database lock was poisoned".to_string()))
    }
}

/// Initialize the document table and its lookup index.
pub fn create_document_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS document (
            user_id TEXT NOT NULL,
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            body TEXT NOT NULL,
            PRIMARY KEY (user_id, collection, id)
        );

        CREATE INDEX IF NOT EXISTS idx_document_scope ON document(user_id, collection);",
    )?;

    Ok(())
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                StoreError::Backend(error.to_string())
            }
        }
    }
}

#[async_trait::async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn list(&self, user: &UserId, collection: &str) -> Result<Vec<Document>, StoreError> {
        let connection = self.lock()?;

        let mut statement = connection.prepare(
            "SELECT id, body FROM document
            WHERE user_id = ?1 AND collection = ?2
            ORDER BY rowid ASC;",
        )?;
        let rows = statement.query_map((user.as_str(), collection), map_row)?;

        let mut documents = Vec::new();

        for row in rows {
            let (id, body) = row?;
            documents.push(Document {
                id,
                fields: parse_body(&body)?,
            });
        }

        Ok(documents)
    }

    async fn get(
        &self,
        user: &UserId,
        collection: &str,
        id: &str,
    ) -> Result<Document, StoreError> {
        let connection = self.lock()?;

        let body: String = connection.query_row(
            "SELECT body FROM document WHERE user_id = ?1 AND collection = ?2 AND id = ?3;",
            (user.as_str(), collection, id),
            |row| row.get(0),
        )?;

        Ok(Document {
            id: id.to_string(),
            fields: parse_body(&body)?,
        })
    }

    async fn set(
        &self,
        user: &UserId,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        let body = serialize_body(&fields)?;
        let connection = self.lock()?;

        connection.execute(
            "INSERT OR REPLACE INTO document (user_id, collection, id, body)
            VALUES (?1, ?2, ?3, ?4);",
            (user.as_str(), collection, id, body),
        )?;

        Ok(())
    }

    async fn update(
        &self,
        user: &UserId,
        collection: &str,
        id: &str,
        patch: Patch,
    ) -> Result<(), StoreError> {
        let connection = self.lock()?;

        let body: String = connection.query_row(
            "SELECT body FROM document WHERE user_id = ?1 AND collection = ?2 AND id = ?3;",
            (user.as_str(), collection, id),
            |row| row.get(0),
        )?;

        let mut fields = parse_body(&body)?;
        patch.apply(&mut fields);
        let body = serialize_body(&fields)?;

        connection.execute(
            "UPDATE document SET body = ?1 WHERE user_id = ?2 AND collection = ?3 AND id = ?4;",
            (body, user.as_str(), collection, id),
        )?;

        Ok(())
    }

    async fn delete(&self, user: &UserId, collection: &str, id: &str) -> Result<(), StoreError> {
        let connection = self.lock()?;

        connection.execute(
            "DELETE FROM document WHERE user_id = ?1 AND collection = ?2 AND id = ?3;",
            (user.as_str(), collection, id),
        )?;

        Ok(())
    }
}

fn map_row(row: &Row) -> Result<(String, String), rusqlite::Error> {
    let id = row.get(0)?;
    let body = row.get(1)?;

    Ok((id, body))
}

fn parse_body(body: &str) -> Result<Fields, StoreError> {
    serde_json::from_str(body).map_err(|error| StoreError::Serialization(error.to_string()))
}

fn serialize_body(fields: &Fields) -> Result<String, StoreError> {
    serde_json::to_string(fields).map_err(|error| StoreError::Serialization(error.to_string()))
}

#[cfg(test)]
mod sqlite_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        store::{DocumentStore, Fields, Patch, StoreError},
        user::UserId,
    };

    use super::{SqliteDocumentStore, create_document_table};

    fn get_test_store() -> SqliteDocumentStore {
        let connection = Connection::open_in_memory().expect("Could not open in-memory database");
        create_document_table(&connection).expect("Could not create document table");

        SqliteDocumentStore::new(Arc::new(Mutex::new(connection)))
    }

    fn fields(value: serde_json::Value) -> Fields {
        match value {
            serde_json::Value::Object(fields) => fields,
            _ => panic!("expected a JSON object"),
        }
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = get_test_store();
        let user = UserId::new("alice");
        let body = fields(json!({ "name": "Raincoat", "paidPrice": 12999 }));

        store
            .set(&user, "Purchases", "p-1", body.clone())
            .await
            .expect("Could not write document");
        let document = store
            .get(&user, "Purchases", "p-1")
            .await
            .expect("Could not read document");

        assert_eq!(document.id, "p-1");
        assert_eq!(document.fields, body);
    }

    #[tokio::test]
    async fn get_missing_document_returns_not_found() {
        let store = get_test_store();
        let user = UserId::new("alice");

        let result = store.get(&user, "Purchases", "missing").await;

        assert_eq!(result, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn list_returns_documents_in_insertion_order() {
        let store = get_test_store();
        let user = UserId::new("alice");

        for id in ["a", "b", "c"] {
            store
                .set(&user, "Purchases", id, fields(json!({ "id": id })))
                .await
                .expect("Could not write document");
        }

        let documents = store
            .list(&user, "Purchases")
            .await
            .expect("Could not list documents");
        let ids: Vec<&str> = documents.iter().map(|doc| doc.id.as_str()).collect();

        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn list_is_scoped_to_the_user() {
        let store = get_test_store();
        let alice = UserId::new("alice");
        let bob = UserId::new("bob");

        store
            .set(&alice, "Purchases", "p-1", fields(json!({ "name": "Coat" })))
            .await
            .expect("Could not write document");

        let documents = store
            .list(&bob, "Purchases")
            .await
            .expect("Could not list documents");

        assert!(documents.is_empty());
    }

    #[tokio::test]
    async fn update_applies_array_union_without_duplicates() {
        let store = get_test_store();
        let user = UserId::new("alice");

        store
            .set(&user, "Collections", "c-1", fields(json!({ "items": ["a"] })))
            .await
            .expect("Could not write document");
        store
            .update(
                &user,
                "Collections",
                "c-1",
                Patch::new().array_union("items", vec![json!("a"), json!("b")]),
            )
            .await
            .expect("Could not update document");

        let document = store
            .get(&user, "Collections", "c-1")
            .await
            .expect("Could not read document");

        assert_eq!(document.fields.get("items"), Some(&json!(["a", "b"])));
    }

    #[tokio::test]
    async fn update_missing_document_returns_not_found() {
        let store = get_test_store();
        let user = UserId::new("alice");

        let result = store
            .update(
                &user,
                "Collections",
                "missing",
                Patch::new().set("name", json!("x")),
            )
            .await;

        assert_eq!(result, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn delete_removes_the_document() {
        let store = get_test_store();
        let user = UserId::new("alice");

        store
            .set(&user, "Purchases", "p-1", fields(json!({ "name": "Coat" })))
            .await
            .expect("Could not write document");
        store
            .delete(&user, "Purchases", "p-1")
            .await
            .expect("Could not delete document");

        let result = store.get(&user, "Purchases", "p-1").await;

        assert_eq!(result, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn deleting_a_missing_document_is_not_an_error() {
        let store = get_test_store();
        let user = UserId::new("alice");

        let result = store.delete(&user, "Purchases", "missing").await;

        assert_eq!(result, Ok(()));
    }
}
