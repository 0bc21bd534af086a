//! Core category domain types.

use serde::{Deserialize, Serialize};

/// Identifier for a subcategory.
///
/// Default subcategories use a deterministic ID derived from their names
/// (see [default_subcategory_id]); custom subcategories use a generated
/// opaque ID.
pub type SubcategoryId = String;

/// One selectable subcategory, e.g. 'Jeans' under 'Bottoms'.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    /// The subcategory's ID.
    pub id: SubcategoryId,
    /// The display name.
    pub name: String,
    /// Whether the subcategory was created by the user rather than
    /// shipped with the app.
    pub custom: bool,
}

/// A category and its ordered subcategories in the merged tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The category name. Names identify categories, matched exactly and
    /// case-sensitively.
    pub name: String,
    /// The category's subcategories: defaults first in shipped order,
    /// then customs in fetch order.
    pub subcategories: Vec<Subcategory>,
}

/// The persisted form of a user-created subcategory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCategoryRecord {
    /// The record's generated ID.
    pub id: SubcategoryId,
    /// The parent category name.
    pub category: String,
    /// The subcategory's display name.
    pub sub_category: String,
}

/// One row of the custom-category management list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomCategorySummary {
    /// The record's ID.
    pub id: SubcategoryId,
    /// The parent category name.
    pub category: String,
    /// The subcategory's display name.
    pub name: String,
}

/// The category data denormalized onto a purchase.
///
/// This is a value copy, not a reference: editing or deleting the source
/// subcategory later does not update purchases that hold one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySelection {
    /// The category name.
    pub category: String,
    /// The selected subcategory, if any.
    pub sub_category: Option<Subcategory>,
}

/// The deterministic ID of a default subcategory:
/// the lowercased category name, an underscore, then the lowercased
/// subcategory name with spaces replaced by underscores.
pub fn default_subcategory_id(category: &str, name: &str) -> SubcategoryId {
    format!(
        "{}_{}",
        category.to_lowercase(),
        name.to_lowercase().replace(' ', "_")
    )
}
