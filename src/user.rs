//! The user's identity and profile document.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    store::{DocumentStore, StoreError, collections, from_document_fields, to_document_fields},
};

/// A newtype wrapper for user IDs.
///
/// The original application read the current user from ambient
/// authentication state; here the user is passed explicitly into every
/// store-touching call, and the newtype keeps user IDs from being mixed
/// up with document IDs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(String);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The user's profile document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// The user's email address.
    pub email: String,
    /// The user's display name.
    pub name: String,
    /// The user's clothing budget in dollars.
    pub budget: f64,
    /// When the user registered.
    #[serde(with = "time::serde::rfc3339")]
    pub registration_date: OffsetDateTime,
}

// The store already namespaces every call by user, so the profile lives
// under a fixed document ID.
const PROFILE_DOC_ID: &str = "profile";

/// Fetch the user's profile, or `None` if one has not been saved yet.
pub async fn load_profile<S: DocumentStore + ?Sized>(
    store: &S,
    user: &UserId,
) -> Result<Option<UserProfile>, Error> {
    match store.get(user, collections::PROFILE, PROFILE_DOC_ID).await {
        Ok(document) => Ok(Some(from_document_fields(document.fields)?)),
        Err(StoreError::NotFound) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// Write the user's profile, replacing any existing one.
pub async fn save_profile<S: DocumentStore + ?Sized>(
    store: &S,
    user: &UserId,
    profile: &UserProfile,
) -> Result<(), Error> {
    store
        .set(
            user,
            collections::PROFILE,
            PROFILE_DOC_ID,
            to_document_fields(profile)?,
        )
        .await?;

    Ok(())
}
