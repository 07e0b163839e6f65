//! Core house domain types.

use serde::{Deserialize, Serialize};

/// Database identifier for a house.
pub type HouseId = i64;

/// A rental building containing zero or more rooms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    pub id: HouseId,
    pub address: String,
    pub note: String,
}

/// Form data for house creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct HouseData {
    pub address: String,
    #[serde(default)]
    pub note: String,
}
