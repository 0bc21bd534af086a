//! The default taxonomy shipped with the application.

use std::sync::OnceLock;

use serde::Deserialize;

/// One category of the shipped taxonomy, as stored in the static asset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultCategory {
    /// The category name.
    pub name: String,
    /// The names of the category's subcategories, in display order.
    pub sub_categories: Vec<String>,
}

const DEFAULT_TAXONOMY: &str = include_str!("../../assets/default_categories.json");

/// The default categories, parsed from the bundled asset on first use.
pub fn default_categories() -> &'static [DefaultCategory] {
    static CATEGORIES: OnceLock<Vec<DefaultCategory>> = OnceLock::new();

    CATEGORIES.get_or_init(|| {
        serde_json::from_str(DEFAULT_TAXONOMY).expect("Could not parse the default category asset")
    })
}
