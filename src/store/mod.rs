//! The contract between the application and its document store.
//!
//! The production application keeps its data in a cloud document store;
//! this crate only depends on the [DocumentStore] trait, which scopes
//! every call to one authenticated user's namespace. A SQLite-backed
//! implementation is provided for local use and the test suite.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::user::UserId;

mod sqlite;

pub use sqlite::{SqliteDocumentStore, create_document_table};

/// The sub-collection names used by the application.
pub mod collections {
    /// The user's purchases.
    pub const PURCHASES: &str = "Purchases";

    /// The user's collections of purchases.
    pub const COLLECTIONS: &str = "Collections";

    /// The user's custom category records.
    pub const CUSTOM_CATEGORIES: &str = "customCategories";

    /// The user's profile document.
    pub const PROFILE: &str = "profile";
}

/// Alias for the string type used for document IDs.
pub type DocumentId = String;

/// The fields of a document as a JSON object.
pub type Fields = serde_json::Map<String, Value>;

/// A document fetched from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The document's ID within its sub-collection.
    pub id: DocumentId,
    /// The document's fields.
    pub fields: Fields,
}

/// Errors originating from operations on the document store.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StoreError {
    /// The document could not be found.
    #[error("the document could not be found")]
    NotFound,

    /// A document body could not be converted to or from JSON.
    #[error("could not convert a document body: {0}")]
    Serialization(String),

    /// Wrapper for backend errors not handled by the other entries.
    #[error("the storage backend failed: {0}")]
    Backend(String),
}

/// A single field mutation inside a [Patch].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    /// Replace the field with the given value.
    Set(Value),

    /// Append to an array field the values that are not already present.
    ///
    /// A field holding something other than an array is replaced by one.
    ArrayUnion(Vec<Value>),
}

/// A partial update to a document, applied field by field in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    ops: Vec<(String, FieldOp)>,
}

impl Patch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `field` with `value`.
    pub fn set(mut self, field: &str, value: Value) -> Self {
        self.ops.push((field.to_string(), FieldOp::Set(value)));
        self
    }

    /// Append the `values` not already present to the array held by `field`.
    pub fn array_union(mut self, field: &str, values: Vec<Value>) -> Self {
        self.ops.push((field.to_string(), FieldOp::ArrayUnion(values)));
        self
    }

    /// Apply the patch to a document's fields.
    pub fn apply(&self, fields: &mut Fields) {
        for (field, op) in &self.ops {
            match op {
                FieldOp::Set(value) => {
                    fields.insert(field.clone(), value.clone());
                }
                FieldOp::ArrayUnion(values) => {
                    let entry = fields
                        .entry(field.clone())
                        .or_insert_with(|| Value::Array(Vec::new()));

                    if !entry.is_array() {
                        *entry = Value::Array(Vec::new());
                    }

                    if let Value::Array(items) = entry {
                        for value in values {
                            if !items.contains(value) {
                                items.push(value.clone());
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Asynchronous document storage scoped to one authenticated user.
///
/// Calls are plain request/response with no internal retry, backoff or
/// timeout; a failed call surfaces immediately as a [StoreError].
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch every document in `collection`, in the store's fetch order.
    async fn list(&self, user: &UserId, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Fetch a single document by ID.
    ///
    /// # Errors
    ///
    /// Returns [StoreError::NotFound] if there is no such document.
    async fn get(&self, user: &UserId, collection: &str, id: &str)
    -> Result<Document, StoreError>;

    /// Write a document, replacing any existing fields entirely.
    async fn set(
        &self,
        user: &UserId,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError>;

    /// Apply a partial update to an existing document.
    ///
    /// # Errors
    ///
    /// Returns [StoreError::NotFound] if there is no such document.
    async fn update(
        &self,
        user: &UserId,
        collection: &str,
        id: &str,
        patch: Patch,
    ) -> Result<(), StoreError>;

    /// Delete a document. Deleting a document that does not exist is not
    /// an error.
    async fn delete(&self, user: &UserId, collection: &str, id: &str) -> Result<(), StoreError>;
}

/// Serialize a document body into its field map.
///
/// # Errors
///
/// Returns [StoreError::Serialization] if the body does not serialize to
/// a JSON object.
pub fn to_document_fields<T: Serialize>(body: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(StoreError::Serialization(
            "document bodies must serialize to JSON objects".to_string(),
        )),
        Err(error) => Err(StoreError::Serialization(error.to_string())),
    }
}

/// Deserialize a document body from its field map.
///
/// # Errors
///
/// Returns [StoreError::Serialization] if the fields do not match the
/// expected shape.
pub fn from_document_fields<T: DeserializeOwned>(fields: Fields) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(fields))
        .map_err(|error| StoreError::Serialization(error.to_string()))
}
