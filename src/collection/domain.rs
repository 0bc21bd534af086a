//! The collection document type.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::purchase::PurchaseId;

/// Alias for the string type used for collection IDs.
pub type CollectionId = String;

/// A named group of purchases, e.g. 'Work Wardrobe' or 'Summer Trip'.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// The collection's ID.
    pub id: CollectionId,
    /// The collection's name.
    pub name: String,
    /// A free-form description.
    #[serde(default)]
    pub description: String,
    /// The keys of the purchases in the collection, in insertion order
    /// and without duplicates.
    #[serde(default)]
    pub items: Vec<PurchaseId>,
    /// When the collection was created.
    #[serde(with = "time::serde::rfc3339")]
    pub date_created: OffsetDateTime,
}
