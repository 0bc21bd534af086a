//! The category taxonomy: a shipped default tree merged with each user's
//! custom subcategories.

mod defaults;
mod domain;
mod merge;
mod search;
mod sync;

pub use defaults::{DefaultCategory, default_categories};
pub use domain::{
    Category, CategorySelection, CustomCategoryRecord, CustomCategorySummary, Subcategory,
    SubcategoryId, default_subcategory_id,
};
pub use merge::{CategoryCatalog, merge_categories};
pub use search::{CatalogRow, ExpandedSet, filter_catalog};
pub use sync::{add_custom_category, delete_custom_category, edit_custom_category, load_catalog};
