//! The purchase document and its form input.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    category::CategorySelection,
    price::{Cents, cost_per_wear, parse_price},
    validation::validate_name,
    wear::wear_level,
};

/// Alias for the string type used for purchase keys.
pub type PurchaseId = String;

time::serde::format_description!(ymd_date, Date, "[year]-[month]-[day]");

/// RFC 3339 strings for the list of wear timestamps.
mod rfc3339_vec {
    use serde::{Deserialize, Deserializer, Serializer, ser::SerializeSeq};
    use time::{OffsetDateTime, format_description::well_known::Rfc3339};

    pub fn serialize<S: Serializer>(
        wears: &[OffsetDateTime],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut sequence = serializer.serialize_seq(Some(wears.len()))?;

        for wear in wears {
            let text = wear.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
            sequence.serialize_element(&text)?;
        }

        sequence.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<OffsetDateTime>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .into_iter()
            .map(|text| OffsetDateTime::parse(&text, &Rfc3339).map_err(serde::de::Error::custom))
            .collect()
    }
}

/// A purchased item of clothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    /// The purchase's key, which is also its document ID.
    pub key: PurchaseId,
    /// The item's name.
    pub name: String,
    /// The category the item was filed under, copied by value at save
    /// time.
    pub category: CategorySelection,
    /// A free-form note.
    #[serde(default)]
    pub note: String,
    /// Every recorded wear in the order it was logged. The length of
    /// this list is the item's wear count.
    #[serde(with = "rfc3339_vec", default)]
    pub wears: Vec<OffsetDateTime>,
    /// The item's regular price in cents, given when the item was bought
    /// on sale.
    pub regular_price: Option<Cents>,
    /// The price actually paid, in cents.
    pub paid_price: Cents,
    /// The day the item was purchased.
    #[serde(with = "ymd_date")]
    pub date_purchased: Date,
    /// When the purchase record was created.
    #[serde(with = "time::serde::rfc3339")]
    pub date_created: OffsetDateTime,
    /// When the purchase record was last edited, if ever.
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub edited: Option<OffsetDateTime>,
}

impl Purchase {
    /// The number of times the item has been worn.
    pub fn wear_count(&self) -> usize {
        self.wears.len()
    }

    /// The display tier for the item's wear count.
    pub fn wear_level(&self) -> &'static str {
        wear_level(self.wear_count())
    }

    /// The paid price divided by the wear count, rounded to the nearest
    /// cent. An unworn item costs its full price per wear.
    pub fn cost_per_wear(&self) -> Cents {
        cost_per_wear(self.paid_price, self.wear_count())
    }
}

/// The checked price fields of a [PurchaseDraft].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedPrices {
    /// The regular price, when one was entered.
    pub regular: Option<Cents>,
    /// The price actually paid.
    pub paid: Cents,
}

/// The raw form input for creating or editing a purchase.
///
/// Prices arrive as the text typed into the form;
/// [validate](PurchaseDraft::validate) checks the draft and converts
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseDraft {
    /// The item's name.
    pub name: String,
    /// The selected category.
    pub category: CategorySelection,
    /// A free-form note.
    pub note: String,
    /// The regular price as typed. Empty when the item was not bought on
    /// sale.
    pub regular_price: String,
    /// The paid price as typed.
    pub paid_price: String,
    /// The day the item was purchased.
    pub date_purchased: Date,
}

impl PurchaseDraft {
    /// Check the draft's fields and convert its prices to cents.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidName] if the name has no letter or digit,
    /// [Error::InvalidPrice] if a price is not a plain dollar amount,
    /// and [Error::PaidExceedsRegular] if the paid price is not below
    /// the regular price when both are given.
    pub fn validate(&self) -> Result<ValidatedPrices, Error> {
        validate_name(&self.name)?;

        let paid = parse_price(self.paid_price.trim())?;

        let regular = match self.regular_price.trim() {
            "" => None,
            text => Some(parse_price(text)?),
        };

        if let Some(regular) = regular
            && paid >= regular
        {
            return Err(Error::PaidExceedsRegular { paid, regular });
        }

        Ok(ValidatedPrices { regular, paid })
    }
}
