//! Core room domain types and form parsing.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    billing::{Money, Tariff},
    forms::{parse_non_negative, parse_non_negative_f64},
    house::HouseId,
};

/// Database identifier for a room.
pub type RoomId = i64;

/// The occupancy state of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    /// The room is empty and can be rented out.
    Available,
    /// The room has a tenant.
    Rented,
    /// The room is temporarily out of service.
    Maintenance,
}

impl RoomStatus {
    /// The string stored in the database and submitted by the status radio group.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Rented => "rented",
            RoomStatus::Maintenance => "maintenance",
        }
    }
}

impl Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomStatus::Available => write!(f, "Available"),
            RoomStatus::Rented => write!(f, "Rented"),
            RoomStatus::Maintenance => write!(f, "Maintenance"),
        }
    }
}

impl TryFrom<&str> for RoomStatus {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "available" => Ok(RoomStatus::Available),
            "rented" => Ok(RoomStatus::Rented),
            "maintenance" => Ok(RoomStatus::Maintenance),
            other => Err(Error::InvalidStatus(other.to_string())),
        }
    }
}

/// A rentable unit inside a house.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub house_id: HouseId,
    pub name: String,
    pub renter: String,
    pub phone: String,
    pub area: f64,
    pub status: RoomStatus,
    /// The pricing terms new bills for this room start from. Payments copy
    /// these at creation time, so editing a room never rewrites past bills.
    pub tariff: Tariff,
    pub deposit: Money,
    pub note: String,
}

/// The fields needed to insert or update a room.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRoom {
    pub house_id: HouseId,
    pub name: String,
    pub renter: String,
    pub phone: String,
    pub area: f64,
    pub status: RoomStatus,
    pub tariff: Tariff,
    pub deposit: Money,
    pub note: String,
}

/// Form data for room creation and editing.
///
/// Numeric fields are strings here since empty optional number inputs arrive
/// as empty strings. [RoomFormData::parse] converts them.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RoomFormData {
    pub house_id: String,
    pub name: String,
    #[serde(default)]
    pub renter: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub area: String,
    pub status: String,
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
    #[serde(default)]
    pub note: String,
}

impl RoomFormData {
    /// Validate the submitted strings and convert them into a [NewRoom].
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyRoomName] for a blank name, [Error::InvalidHouse]
    /// for an unparseable house ID, [Error::InvalidStatus] for an unknown
    /// status and [Error::InvalidNumber] for numeric fields that are not
    /// non-negative numbers.
    pub fn parse(&self) -> Result<NewRoom, Error> {
        let name = self.name.trim();

        if name.is_empty() {
            return Err(Error::EmptyRoomName);
        }

        let house_id: HouseId = self
            .house_id
            .trim()
            .parse()
            .map_err(|_| Error::InvalidHouse)?;

        let status = RoomStatus::try_from(self.status.as_str())?;

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

        Ok(NewRoom {
            house_id,
            name: name.to_string(),
            renter: self.renter.trim().to_string(),
            phone: self.phone.trim().to_string(),
            area: parse_non_negative_f64("area", &self.area)?,
            status,
            tariff,
            deposit: parse_non_negative("deposit", &self.deposit)?,
            note: self.note.trim().to_string(),
        })
    }
}

impl From<&Room> for RoomFormData {
    fn from(room: &Room) -> Self {
        RoomFormData {
            house_id: room.house_id.to_string(),
            name: room.name.clone(),
            renter: room.renter.clone(),
            phone: room.phone.clone(),
            area: room.area.to_string(),
            status: room.status.as_str().to_string(),
            room_price: room.tariff.room_price.to_string(),
            elect_unit_price: room.tariff.elect_unit_price.to_string(),
            water_unit_price: room.tariff.water_unit_price.to_string(),
            trash_fee: room.tariff.trash_fee.to_string(),
            parking_fee: room.tariff.parking_fee.to_string(),
            washing_machine_fee: room.tariff.washing_machine_fee.to_string(),
            elevator_fee: room.tariff.elevator_fee.to_string(),
            deposit: room.deposit.to_string(),
            note: room.note.clone(),
        }
    }
}

#[cfg(test)]
mod room_form_data_tests {
    use crate::{Error, room::RoomStatus};

    use super::RoomFormData;

    fn valid_form() -> RoomFormData {
        RoomFormData {
            house_id: "1".to_string(),
            name: "Room 101".to_string(),
            renter: "Lan".to_string(),
            phone: "0901234567".to_string(),
            area: "22.5".to_string(),
            status: "rented".to_string(),
            room_price: "2000000".to_string(),
            elect_unit_price: "3500".to_string(),
            water_unit_price: "15000".to_string(),
            trash_fee: "20000".to_string(),
            parking_fee: "".to_string(),
            washing_machine_fee: "".to_string(),
            elevator_fee: "".to_string(),
            deposit: "2000000".to_string(),
            note: "".to_string(),
        }
    }

    #[test]
    fn parses_valid_form() {
        let new_room = valid_form().parse().expect("Could not parse valid form");

        assert_eq!(new_room.house_id, 1);
        assert_eq!(new_room.name, "Room 101");
        assert_eq!(new_room.status, RoomStatus::Rented);
        assert_eq!(new_room.tariff.room_price, 2_000_000);
        // Empty optional fees are zero.
        assert_eq!(new_room.tariff.parking_fee, 0);
        assert_eq!(new_room.area, 22.5);
    }

    #[test]
    fn rejects_empty_name() {
        let mut form = valid_form();
        form.name = "  ".to_string();

        assert_eq!(form.parse(), Err(Error::EmptyRoomName));
    }

    #[test]
    fn rejects_unparseable_house_id() {
        let mut form = valid_form();
        form.house_id = "first".to_string();

        assert_eq!(form.parse(), Err(Error::InvalidHouse));
    }

    #[test]
    fn rejects_unknown_status() {
        let mut form = valid_form();
        form.status = "haunted".to_string();

        assert_eq!(
            form.parse(),
            Err(Error::InvalidStatus("haunted".to_string()))
        );
    }

    #[test]
    fn rejects_negative_price() {
        let mut form = valid_form();
        form.room_price = "-1".to_string();

        assert_eq!(form.parse(), Err(Error::InvalidNumber("room_price")));
    }
}
