//! Core payment domain types and form parsing.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    billing::{MeterReading, Money, Tariff},
    forms::{parse_month, parse_non_negative},
    room::RoomId,
};

/// Database identifier for a payment.
pub type PaymentId = i64;

/// Whether a bill has been settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    /// The bill has been issued but not paid.
    Unpaid,
    /// The bill has been paid in full.
    Paid,
}

impl PaymentStatus {
    /// The string stored in the database and submitted by the status radio group.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Unpaid => write!(f, "Unpaid"),
            PaymentStatus::Paid => write!(f, "Paid"),
        }
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "unpaid" => Ok(PaymentStatus::Unpaid),
            "paid" => Ok(PaymentStatus::Paid),
            other => Err(Error::InvalidStatus(other.to_string())),
        }
    }
}

/// A bill for one room over one month.
///
/// The tariff is the room's pricing at the time the bill was created. It
/// stays frozen afterwards so room edits never rewrite history, and edits to
/// the bill recompute the total against this stored copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: PaymentId,
    pub room_id: RoomId,
    pub month: u8,
    pub year: i32,
    pub elect: MeterReading,
    pub water: MeterReading,
    pub tariff: Tariff,
    pub total_amount: Money,
    pub status: PaymentStatus,
    pub note: String,
    pub created_on: OffsetDateTime,
}

/// The fields needed to insert a payment.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub room_id: RoomId,
    pub month: u8,
    pub year: i32,
    pub elect: MeterReading,
    pub water: MeterReading,
    pub tariff: Tariff,
    pub total_amount: Money,
    pub status: PaymentStatus,
    pub note: String,
}

/// The fields an edit may change. The room and tariff snapshot stay fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentUpdate {
    pub month: u8,
    pub year: i32,
    pub elect: MeterReading,
    pub water: MeterReading,
    pub total_amount: Money,
    pub status: PaymentStatus,
    pub note: String,
}

/// Criteria for filtering the payments listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentFilter {
    pub room_id: Option<RoomId>,
    pub month: Option<u8>,
    pub year: Option<i32>,
    pub status: Option<PaymentStatus>,
}

/// Form data for payment creation and editing.
///
/// Numeric fields are strings here since empty number inputs arrive as empty
/// strings. [PaymentFormData::parse] converts them; reading order (end at or
/// above start) is checked later by the billing computation.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PaymentFormData {
    pub room_id: String,
    pub month: String,
    pub year: String,
    #[serde(default)]
    pub elect_start: String,
    #[serde(default)]
    pub elect_end: String,
    #[serde(default)]
    pub water_start: String,
    #[serde(default)]
    pub water_end: String,
    pub status: String,
    #[serde(default)]
    pub note: String,
}

/// The validated fields of a submitted payment form.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPaymentForm {
    pub room_id: RoomId,
    pub month: u8,
    pub year: i32,
    pub elect: MeterReading,
    pub water: MeterReading,
    pub status: PaymentStatus,
    pub note: String,
}

impl PaymentFormData {
    /// Validate the submitted strings.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidRoom] for an unparseable room ID,
    /// [Error::InvalidMonth] for a month outside 1 to 12,
    /// [Error::InvalidStatus] for an unknown status and
    /// [Error::InvalidNumber] for other numeric fields that are not
    /// non-negative numbers.
    pub fn parse(&self) -> Result<ParsedPaymentForm, Error> {
        let room_id: RoomId = self
            .room_id
            .trim()
            .parse()
            .map_err(|_| Error::InvalidRoom)?;

        let month = parse_month(&self.month)?;
        let year = parse_non_negative("year", &self.year)? as i32;

        let elect = MeterReading {
            start: parse_non_negative("elect_start", &self.elect_start)?,
            end: parse_non_negative("elect_end", &self.elect_end)?,
        };
        let water = MeterReading {
            start: parse_non_negative("water_start", &self.water_start)?,
            end: parse_non_negative("water_end", &self.water_end)?,
        };

        let status = PaymentStatus::try_from(self.status.as_str())?;

        Ok(ParsedPaymentForm {
            room_id,
            month,
            year,
            elect,
            water,
            status,
            note: self.note.trim().to_string(),
        })
    }
}
