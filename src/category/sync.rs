//! Keeping the merged catalog consistent with the store.
//!
//! Every mutation here follows the same write-then-reflect policy: the
//! store write happens first, and the in-memory catalog is only touched
//! if the write succeeds. A failed call leaves prior state untouched for
//! the caller to surface an error over.

use crate::{
    Error,
    category::{CategoryCatalog, CustomCategoryRecord, default_categories, merge_categories},
    ids::IdGenerator,
    store::{DocumentStore, collections, from_document_fields, to_document_fields},
    user::UserId,
};

/// Fetch the user's custom records and merge them with the shipped
/// defaults.
pub async fn load_catalog<S: DocumentStore + ?Sized>(
    store: &S,
    user: &UserId,
) -> Result<CategoryCatalog, Error> {
    let documents = store.list(user, collections::CUSTOM_CATEGORIES).await?;

    let mut records = Vec::with_capacity(documents.len());

    for document in documents {
        records.push(from_document_fields::<CustomCategoryRecord>(
            document.fields,
        )?);
    }

    Ok(merge_categories(default_categories(), &records))
}

/// Create a custom subcategory under `category`, creating the category
/// node if it does not exist yet.
///
/// Returns the new record so the caller can use it as the just-selected
/// value.
///
/// # Errors
///
/// Returns a validation error if either name is empty, or the store's
/// error if the write fails. In both cases the catalog is unchanged.
pub async fn add_custom_category<S: DocumentStore + ?Sized>(
    store: &S,
    user: &UserId,
    ids: &IdGenerator,
    catalog: &mut CategoryCatalog,
    category: &str,
    name: &str,
) -> Result<CustomCategoryRecord, Error> {
    let category = category.trim();
    let name = name.trim();

    if category.is_empty() {
        return Err(Error::EmptyCategoryName);
    }

    if name.is_empty() {
        return Err(Error::EmptySubcategoryName);
    }

    let record = CustomCategoryRecord {
        id: ids.generate(),
        category: category.to_string(),
        sub_category: name.to_string(),
    };

    store
        .set(
            user,
            collections::CUSTOM_CATEGORIES,
            &record.id,
            to_document_fields(&record)?,
        )
        .await?;

    catalog.insert_custom(&record);

    Ok(record)
}

/// Rename a custom subcategory and, if `new_category` differs from its
/// current parent, move it under the new category node.
///
/// Purchases that hold a value copy of the old pair are not updated;
/// they keep the stale text until they are individually re-saved.
///
/// # Errors
///
/// Returns [Error::UnknownCustomCategory] if `id` is not one of the
/// user's custom records, a validation error if either name is empty,
/// or the store's error if the write fails.
pub async fn edit_custom_category<S: DocumentStore + ?Sized>(
    store: &S,
    user: &UserId,
    catalog: &mut CategoryCatalog,
    id: &str,
    new_category: &str,
    new_name: &str,
) -> Result<(), Error> {
    let new_category = new_category.trim();
    let new_name = new_name.trim();

    if new_category.is_empty() {
        return Err(Error::EmptyCategoryName);
    }

    if new_name.is_empty() {
        return Err(Error::EmptySubcategoryName);
    }

    if !catalog.contains_custom(id) {
        return Err(Error::UnknownCustomCategory(id.to_string()));
    }

    let record = CustomCategoryRecord {
        id: id.to_string(),
        category: new_category.to_string(),
        sub_category: new_name.to_string(),
    };

    store
        .set(
            user,
            collections::CUSTOM_CATEGORIES,
            id,
            to_document_fields(&record)?,
        )
        .await?;

    catalog.apply_edit(id, new_category, new_name);

    Ok(())
}

/// Delete a custom subcategory everywhere: the store, the management
/// list, and every category node that might hold it.
///
/// Purchases that reference the deleted subcategory keep their value
/// copies.
///
/// # Errors
///
/// Returns [Error::UnknownCustomCategory] if `id` is not one of the
/// user's custom records, or the store's error if the delete fails.
pub async fn delete_custom_category<S: DocumentStore + ?Sized>(
    store: &S,
    user: &UserId,
    catalog: &mut CategoryCatalog,
    id: &str,
) -> Result<(), Error> {
    if !catalog.contains_custom(id) {
        return Err(Error::UnknownCustomCategory(id.to_string()));
    }

    store
        .delete(user, collections::CUSTOM_CATEGORIES, id)
        .await?;

    catalog.remove_custom(id);

    Ok(())
}
