//! Store operations for purchases.
//!
//! Each operation keeps the caller's in-memory purchase list, the single
//! authoritative copy a screen renders from, consistent with the store,
//! writing first and reflecting the change in memory only on success.

use futures::future::join_all;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    Error,
    ids::IdGenerator,
    purchase::{Purchase, PurchaseDraft, PurchaseId},
    store::{DocumentStore, Patch, collections, from_document_fields, to_document_fields},
    user::UserId,
};

/// Fetch all of the user's purchases, newest first.
///
/// The ordering matches the prepend-on-create behavior of
/// [create_purchase], so a reload does not shuffle the list.
pub async fn load_purchases<S: DocumentStore + ?Sized>(
    store: &S,
    user: &UserId,
) -> Result<Vec<Purchase>, Error> {
    let documents = store.list(user, collections::PURCHASES).await?;

    let mut purchases = Vec::with_capacity(documents.len());

    for document in documents {
        purchases.push(from_document_fields::<Purchase>(document.fields)?);
    }

    purchases.sort_by(|a, b| b.date_created.cmp(&a.date_created));

    Ok(purchases)
}

/// Validate a draft and create the purchase.
///
/// The new purchase is written to the store first and prepended to
/// `purchases` on success.
///
/// # Errors
///
/// Returns a validation error without touching the store, or the store's
/// error if the write fails; in both cases `purchases` is unchanged.
pub async fn create_purchase<S: DocumentStore + ?Sized>(
    store: &S,
    user: &UserId,
    ids: &IdGenerator,
    purchases: &mut Vec<Purchase>,
    draft: &PurchaseDraft,
) -> Result<Purchase, Error> {
    let prices = draft.validate()?;

    let purchase = Purchase {
        key: ids.generate(),
        name: draft.name.trim().to_string(),
        category: draft.category.clone(),
        note: draft.note.clone(),
        wears: Vec::new(),
        regular_price: prices.regular,
        paid_price: prices.paid,
        date_purchased: draft.date_purchased,
        date_created: OffsetDateTime::now_utc(),
        edited: None,
    };

    store
        .set(
            user,
            collections::PURCHASES,
            &purchase.key,
            to_document_fields(&purchase)?,
        )
        .await?;

    purchases.insert(0, purchase.clone());

    Ok(purchase)
}

/// Validate a draft and rewrite the purchase with the given key.
///
/// Fields that are not editable in the form (the wear history and the
/// creation timestamp) carry over from the existing purchase, and the
/// edit timestamp is refreshed.
///
/// # Errors
///
/// Returns [Error::UpdateMissingPurchase] if the key is not in
/// `purchases`, a validation error, or the store's error; in every case
/// `purchases` is unchanged on failure.
pub async fn update_purchase<S: DocumentStore + ?Sized>(
    store: &S,
    user: &UserId,
    purchases: &mut [Purchase],
    key: &str,
    draft: &PurchaseDraft,
) -> Result<Purchase, Error> {
    let prices = draft.validate()?;

    let Some(position) = purchases.iter().position(|purchase| purchase.key == key) else {
        return Err(Error::UpdateMissingPurchase);
    };

    let existing = &purchases[position];
    let updated = Purchase {
        key: existing.key.clone(),
        name: draft.name.trim().to_string(),
        category: draft.category.clone(),
        note: draft.note.clone(),
        wears: existing.wears.clone(),
        regular_price: prices.regular,
        paid_price: prices.paid,
        date_purchased: draft.date_purchased,
        date_created: existing.date_created,
        edited: Some(OffsetDateTime::now_utc()),
    };

    store
        .set(
            user,
            collections::PURCHASES,
            key,
            to_document_fields(&updated)?,
        )
        .await?;

    purchases[position] = updated.clone();

    Ok(updated)
}

/// Delete a purchase from the store, then drop it from `purchases`.
pub async fn delete_purchase<S: DocumentStore + ?Sized>(
    store: &S,
    user: &UserId,
    purchases: &mut Vec<Purchase>,
    key: &str,
) -> Result<(), Error> {
    store.delete(user, collections::PURCHASES, key).await?;

    purchases.retain(|purchase| purchase.key != key);

    Ok(())
}

/// Delete several purchases at once.
///
/// The per-item deletes run concurrently and are all awaited before the
/// in-memory list is touched. If any delete fails, the first error is
/// returned and `purchases` is left as it was, even though the other
/// deletes may already have landed. There is no rollback or per-item
/// retry; the caller surfaces one error and the lists stay inconsistent
/// until the next reload.
pub async fn bulk_delete_purchases<S: DocumentStore + ?Sized>(
    store: &S,
    user: &UserId,
    purchases: &mut Vec<Purchase>,
    keys: &[PurchaseId],
) -> Result<(), Error> {
    let deletes = keys
        .iter()
        .map(|key| store.delete(user, collections::PURCHASES, key));

    for result in join_all(deletes).await {
        result?;
    }

    purchases.retain(|purchase| !keys.contains(&purchase.key));

    Ok(())
}

/// Log one wear of a purchase at the given time.
///
/// The timestamp is appended to the purchase's wear list with array-union
/// semantics, so logging the same instant twice records a single wear.
///
/// # Errors
///
/// Returns [Error::UpdateMissingPurchase] if the key is not in
/// `purchases`, or the store's error if the update fails.
pub async fn record_wear<S: DocumentStore + ?Sized>(
    store: &S,
    user: &UserId,
    purchases: &mut [Purchase],
    key: &str,
    worn_at: OffsetDateTime,
) -> Result<(), Error> {
    let Some(purchase) = purchases.iter_mut().find(|purchase| purchase.key == key) else {
        return Err(Error::UpdateMissingPurchase);
    };

    let stamp = worn_at
        .format(&Rfc3339)
        .map_err(|error| Error::Serialization(error.to_string()))?;

    store
        .update(
            user,
            collections::PURCHASES,
            key,
            Patch::new().array_union("wears", vec![stamp.into()]),
        )
        .await?;

    // Mirror the store's union semantics.
    if !purchase.wears.contains(&worn_at) {
        purchase.wears.push(worn_at);
    }

    Ok(())
}
