//! Collections: user-curated groups of purchases.

mod domain;
mod records;

pub use domain::{Collection, CollectionId};
pub use records::{
    add_items_to_collections, create_collection, delete_collection, load_collections,
};
