//! Merging the default taxonomy with a user's custom records.

use crate::category::{
    Category, CustomCategoryRecord, CustomCategorySummary, DefaultCategory, Subcategory,
    default_subcategory_id,
};

/// The merged view of default and custom categories.
///
/// This is the single source the selection UI is built from: the tree of
/// [categories](CategoryCatalog::categories) for dropdowns and the
/// flattened [custom list](CategoryCatalog::custom) for the management
/// screen. It is a plain value; the sync operations in
/// [crate::category] mutate it only after the matching store write has
/// succeeded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
    custom: Vec<CustomCategorySummary>,
}

impl CategoryCatalog {
    /// The merged tree: default categories first in shipped order, then
    /// any categories created to hold orphaned custom records.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The flattened management list, one row per custom record in fetch
    /// order.
    pub fn custom(&self) -> &[CustomCategorySummary] {
        &self.custom
    }

    /// Look up a category node by exact name.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name == name)
    }

    /// Whether a custom record with the given ID is in the catalog.
    pub fn contains_custom(&self, id: &str) -> bool {
        self.custom.iter().any(|summary| summary.id == id)
    }

    pub(crate) fn insert_custom(&mut self, record: &CustomCategoryRecord) {
        self.custom.push(CustomCategorySummary {
            id: record.id.clone(),
            category: record.category.clone(),
            name: record.sub_category.clone(),
        });

        self.insert_subcategory(
            &record.category,
            Subcategory {
                id: record.id.clone(),
                name: record.sub_category.clone(),
                custom: true,
            },
        );
    }

    fn insert_subcategory(&mut self, category: &str, subcategory: Subcategory) {
        match self
            .categories
            .iter_mut()
            .find(|node| node.name == category)
        {
            Some(node) => {
                // A same-named subcategory counts as already merged.
                if node
                    .subcategories
                    .iter()
                    .any(|sub| sub.name == subcategory.name)
                {
                    return;
                }

                node.subcategories.push(subcategory);
            }
            None => self.categories.push(Category {
                name: category.to_string(),
                subcategories: vec![subcategory],
            }),
        }
    }

    pub(crate) fn apply_edit(&mut self, id: &str, new_category: &str, new_name: &str) {
        let Some(summary) = self.custom.iter_mut().find(|summary| summary.id == id) else {
            return;
        };

        let moved = summary.category != new_category;
        summary.category = new_category.to_string();
        summary.name = new_name.to_string();

        if moved {
            self.strip_subcategory(id);
            self.insert_subcategory(
                new_category,
                Subcategory {
                    id: id.to_string(),
                    name: new_name.to_string(),
                    custom: true,
                },
            );
        } else {
            for category in &mut self.categories {
                if let Some(sub) = category.subcategories.iter_mut().find(|sub| sub.id == id) {
                    sub.name = new_name.to_string();
                }
            }
        }
    }

    pub(crate) fn remove_custom(&mut self, id: &str) {
        self.custom.retain(|summary| summary.id != id);
        self.strip_subcategory(id);
    }

    fn strip_subcategory(&mut self, id: &str) {
        // Search every node, not just the recorded parent, in case an
        // earlier edit moved the subcategory.
        for category in &mut self.categories {
            category.subcategories.retain(|sub| sub.id != id);
        }
    }
}

/// Combine the default taxonomy with a user's custom records.
///
/// The merge is pure and deterministic: default categories appear first
/// in shipped order with deterministic subcategory IDs, then each custom
/// record is appended in fetch order. A record whose parent category is
/// missing from the tree creates a new category node; a record whose name
/// already exists under its parent is skipped silently, though it still
/// appears in the flattened management list.
pub fn merge_categories(
    defaults: &[DefaultCategory],
    records: &[CustomCategoryRecord],
) -> CategoryCatalog {
    let categories = defaults
        .iter()
        .map(|default| Category {
            name: default.name.clone(),
            subcategories: default
                .sub_categories
                .iter()
                .map(|name| Subcategory {
                    id: default_subcategory_id(&default.name, name),
                    name: name.clone(),
                    custom: false,
                })
                .collect(),
        })
        .collect();

    let mut catalog = CategoryCatalog {
        categories,
        custom: Vec::new(),
    };

    for record in records {
        catalog.insert_custom(record);
    }

    catalog
}
