//! Wardrobe is the core library of a personal clothing-purchase tracker.
//!
//! It keeps one authoritative in-memory view of a user's purchases,
//! collections and category taxonomy, and reconciles that view with an
//! external document store after every action. The store itself is a
//! collaborator behind the [DocumentStore](store::DocumentStore) trait; a
//! SQLite-backed implementation is provided for local use and testing.

#![warn(missing_docs)]

pub mod category;
pub mod collection;
pub mod ids;
pub mod price;
pub mod purchase;
pub mod store;
pub mod user;
pub mod validation;
pub mod wear;

mod app_state;

pub use app_state::AppState;

use crate::{category::SubcategoryId, price::Cents, store::StoreError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used for a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// An empty string was used for a subcategory name.
    #[error("subcategory name cannot be empty")]
    EmptySubcategoryName,

    /// The subcategory ID did not match any of the user's custom records.
    ///
    /// Only custom subcategories can be edited or deleted, so this error is
    /// also returned when the ID belongs to a default subcategory.
    #[error("the ID \"{0}\" does not refer to a custom subcategory")]
    UnknownCustomCategory(SubcategoryId),

    /// A name was given that does not contain a single letter or digit.
    #[error("\"{0}\" is not a valid name, names must contain at least one letter or digit")]
    InvalidName(String),

    /// A price was entered that is not a plain dollar amount with at most
    /// two decimal places.
    #[error("\"{0}\" is not a valid price")]
    InvalidPrice(String),

    /// The paid price must be strictly less than the regular price when
    /// both are given.
    #[error("the paid price ({paid} cents) must be less than the regular price ({regular} cents)")]
    PaidExceedsRegular {
        /// The price that was actually paid, in cents.
        paid: Cents,
        /// The item's regular price, in cents.
        regular: Cents,
    },

    /// Tried to update a purchase that is not in the in-memory list.
    #[error("tried to update a purchase that is not in the wardrobe")]
    UpdateMissingPurchase,

    /// The requested document could not be found in the store.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A document body could not be serialized or deserialized.
    #[error("could not convert a document body: {0}")]
    Serialization(String),

    /// An unexpected error from the document store.
    #[error("a store operation failed: {0}")]
    Store(StoreError),
}

impl Error {
    /// Whether this error was caught by input validation before any store
    /// call was made.
    ///
    /// Validation errors are rendered inline next to the offending field;
    /// everything else is surfaced as a transient banner.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::EmptyCategoryName
                | Error::EmptySubcategoryName
                | Error::InvalidName(_)
                | Error::InvalidPrice(_)
                | Error::PaidExceedsRegular { .. }
        )
    }
}

impl From<StoreError> for Error {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Error::NotFound,
            StoreError::Serialization(message) => Error::Serialization(message),
            error => {
                tracing::error!("an unhandled store error occurred: {}", error);
                Error::Store(error)
            }
        }
    }
}
