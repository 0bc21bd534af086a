//! Store operations for collections.

use serde_json::Value;
use time::OffsetDateTime;

use crate::{
    Error,
    collection::Collection,
    ids::IdGenerator,
    purchase::PurchaseId,
    store::{DocumentStore, Patch, collections, from_document_fields, to_document_fields},
    user::UserId,
    validation::validate_name,
};

/// Fetch all of the user's collections, newest first.
pub async fn load_collections<S: DocumentStore + ?Sized>(
    store: &S,
    user: &UserId,
) -> Result<Vec<Collection>, Error> {
    let documents = store.list(user, collections::COLLECTIONS).await?;

    let mut loaded = Vec::with_capacity(documents.len());

    for document in documents {
        loaded.push(from_document_fields::<Collection>(document.fields)?);
    }

    loaded.sort_by(|a, b| b.date_created.cmp(&a.date_created));

    Ok(loaded)
}

/// Create an empty collection and prepend it to `list` once the store
/// write succeeds.
///
/// # Errors
///
/// Returns [Error::InvalidName] without touching the store if the name
/// has no letter or digit, or the store's error if the write fails.
pub async fn create_collection<S: DocumentStore + ?Sized>(
    store: &S,
    user: &UserId,
    ids: &IdGenerator,
    list: &mut Vec<Collection>,
    name: &str,
    description: &str,
) -> Result<Collection, Error> {
    validate_name(name)?;

    let collection = Collection {
        id: ids.generate(),
        name: name.trim().to_string(),
        description: description.trim().to_string(),
        items: Vec::new(),
        date_created: OffsetDateTime::now_utc(),
    };

    store
        .set(
            user,
            collections::COLLECTIONS,
            &collection.id,
            to_document_fields(&collection)?,
        )
        .await?;

    list.insert(0, collection.clone());

    Ok(collection)
}

/// Delete a collection from the store, then drop it from `list`.
///
/// The purchases the collection pointed at are unaffected.
pub async fn delete_collection<S: DocumentStore + ?Sized>(
    store: &S,
    user: &UserId,
    list: &mut Vec<Collection>,
    id: &str,
) -> Result<(), Error> {
    store.delete(user, collections::COLLECTIONS, id).await?;

    list.retain(|collection| collection.id != id);

    Ok(())
}

/// Add purchases to each of the given collections.
///
/// Every target collection receives a store-level array union of
/// `item_ids`, mirrored as the same set union in `list`: keys already
/// present are skipped, new keys append in order. Calling this twice
/// with the same arguments is a no-op the second time.
///
/// # Errors
///
/// Returns the store's error as soon as one update fails; collections
/// updated before the failure keep their new items.
pub async fn add_items_to_collections<S: DocumentStore + ?Sized>(
    store: &S,
    user: &UserId,
    list: &mut [Collection],
    item_ids: &[PurchaseId],
    collection_ids: &[String],
) -> Result<(), Error> {
    let values: Vec<Value> = item_ids
        .iter()
        .map(|item| Value::String(item.clone()))
        .collect();

    for collection_id in collection_ids {
        store
            .update(
                user,
                collections::COLLECTIONS,
                collection_id,
                Patch::new().array_union("items", values.clone()),
            )
            .await?;

        if let Some(collection) = list
            .iter_mut()
            .find(|collection| &collection.id == collection_id)
        {
            for item in item_ids {
                if !collection.items.contains(item) {
                    collection.items.push(item.clone());
                }
            }
        }
    }

    Ok(())
}
