//! Core price template domain types and form parsing.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    billing::{Money, Tariff},
    forms::parse_non_negative,
};

/// Database identifier for a price template.
pub type PriceId = i64;

/// A named set of pricing terms that can be copied onto rooms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    pub id: PriceId,
    pub price_name: String,
    pub tariff: Tariff,
    pub deposit: Money,
}

/// The fields needed to insert or update a price template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPrice {
    pub price_name: String,
    pub tariff: Tariff,
    pub deposit: Money,
}

/// Form data for price template creation and editing.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PriceFormData {
    pub price_name: String,
    #[serde(default)]
    pub room_price: String,
    #[serde(default)]
    pub elect_unit_price: String,
    #[serde(default)]
    pub water_unit_price: String,
    #[serde(default)]
    pub trash_fee: String,
    #[serde(default)]
    pub parking_fee: String,
    #[serde(default)]
    pub washing_machine_fee: String,
    #[serde(default)]
    pub elevator_fee: String,
    #[serde(default)]
    pub deposit: String,
}

impl PriceFormData {
    /// Validate the submitted strings and convert them into a [NewPrice].
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyPriceName] for a blank name and
    /// [Error::InvalidNumber] for numeric fields that are not non-negative
    /// numbers.
    pub fn parse(&self) -> Result<NewPrice, Error> {
        let price_name = self.price_name.trim();

        if price_name.is_empty() {
            return Err(Error::EmptyPriceName);
        }

        let tariff = Tariff {
            room_price: parse_non_negative("room_price", &self.room_price)?,
            elect_unit_price: parse_non_negative("elect_unit_price", &self.elect_unit_price)?,
            water_unit_price: parse_non_negative("water_unit_price", &self.water_unit_price)?,
            trash_fee: parse_non_negative("trash_fee", &self.trash_fee)?,
            parking_fee: parse_non_negative("parking_fee", &self.parking_fee)?,
            washing_machine_fee: parse_non_negative(
                "washing_machine_fee",
                &self.washing_machine_fee,
            )?,
            elevator_fee: parse_non_negative("elevator_fee", &self.elevator_fee)?,
        };

        Ok(NewPrice {
            price_name: price_name.to_string(),
            tariff,
            deposit: parse_non_negative("deposit", &self.deposit)?,
        })
    }
}

impl From<&Price> for PriceFormData {
    fn from(price: &Price) -> Self {
        PriceFormData {
            price_name: price.price_name.clone(),
            room_price: price.tariff.room_price.to_string(),
            elect_unit_price: price.tariff.elect_unit_price.to_string(),
            water_unit_price: price.tariff.water_unit_price.to_string(),
            trash_fee: price.tariff.trash_fee.to_string(),
            parking_fee: price.tariff.parking_fee.to_string(),
            washing_machine_fee: price.tariff.washing_machine_fee.to_string(),
            elevator_fee: price.tariff.elevator_fee.to_string(),
            deposit: price.deposit.to_string(),
        }
    }
}
