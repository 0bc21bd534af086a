//! Filtering the merged catalog for the category dropdown.

use std::collections::HashSet;

use crate::category::{CategoryCatalog, Subcategory};

/// The set of category names the user has toggled open.
///
/// A plain value type so it can live in any screen's state without
/// depending on a rendering framework.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedSet(HashSet<String>);

impl ExpandedSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a category as expanded.
    pub fn insert(&mut self, category: &str) {
        self.0.insert(category.to_string());
    }

    /// Mark a category as collapsed.
    pub fn remove(&mut self, category: &str) {
        self.0.remove(category);
    }

    /// Flip a category between expanded and collapsed.
    pub fn toggle(&mut self, category: &str) {
        if !self.0.remove(category) {
            self.0.insert(category.to_string());
        }
    }

    /// Whether a category is expanded.
    pub fn contains(&self, category: &str) -> bool {
        self.0.contains(category)
    }
}

/// One row of the rendered dropdown: a category header or a subcategory
/// beneath the preceding header.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogRow {
    /// A category header.
    Header {
        /// The category name.
        category: String,
    },
    /// A selectable subcategory.
    Entry {
        /// The parent category name.
        category: String,
        /// The subcategory.
        subcategory: Subcategory,
    },
}

/// Flatten the catalog into the ordered rows the dropdown shows for a
/// search query.
///
/// Matching is a case-insensitive substring test against category and
/// subcategory names. With an empty query every header is shown and
/// children appear only under categories in `expanded`; with a non-empty
/// query, matching categories are auto-expanded (all children when the
/// category name itself matches, otherwise just the matching ones) and
/// categories without a match are omitted entirely.
pub fn filter_catalog(
    catalog: &CategoryCatalog,
    query: &str,
    expanded: &ExpandedSet,
) -> Vec<CatalogRow> {
    let query = query.trim().to_lowercase();
    let mut rows = Vec::new();

    for category in catalog.categories() {
        if query.is_empty() {
            rows.push(CatalogRow::Header {
                category: category.name.clone(),
            });

            if expanded.contains(&category.name) {
                for subcategory in &category.subcategories {
                    rows.push(CatalogRow::Entry {
                        category: category.name.clone(),
                        subcategory: subcategory.clone(),
                    });
                }
            }

            continue;
        }

        let category_matches = category.name.to_lowercase().contains(&query);
        let matching: Vec<&Subcategory> = category
            .subcategories
            .iter()
            .filter(|sub| sub.name.to_lowercase().contains(&query))
            .collect();

        if !category_matches && matching.is_empty() {
            continue;
        }

        rows.push(CatalogRow::Header {
            category: category.name.clone(),
        });

        let children: Vec<&Subcategory> = if category_matches {
            category.subcategories.iter().collect()
        } else {
            matching
        };

        for subcategory in children {
            rows.push(CatalogRow::Entry {
                category: category.name.clone(),
                subcategory: subcategory.clone(),
            });
        }
    }

    rows
}
