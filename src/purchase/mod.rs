//! Purchases: the wardrobe items the user has bought.

mod domain;
mod records;

pub use domain::{Purchase, PurchaseDraft, PurchaseId, ValidatedPrices};
pub use records::{
    bulk_delete_purchases, create_purchase, delete_purchase, load_purchases, record_wear,
    update_purchase,
};
