//! Database operations for rooms.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    billing::Tariff,
    house::HouseId,
    room::{NewRoom, Room, RoomId, RoomStatus},
};

/// Create a room and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::InvalidHouse] if `new_room.house_id` does not refer to an
/// existing house.
pub fn create_room(new_room: NewRoom, connection: &Connection) -> Result<Room, Error> {
    let result = connection.execute(
        "INSERT INTO room (house_id, name, renter, phone, area, status, room_price,
            elect_unit_price, water_unit_price, trash_fee, parking_fee,
            washing_machine_fee, elevator_fee, deposit, note)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15);",
        rusqlite::params![
            new_room.house_id,
            new_room.name,
            new_room.renter,
            new_room.phone,
            new_room.area,
            new_room.status.as_str(),
            new_room.tariff.room_price,
            new_room.tariff.elect_unit_price,
            new_room.tariff.water_unit_price,
            new_room.tariff.trash_fee,
            new_room.tariff.parking_fee,
            new_room.tariff.washing_machine_fee,
            new_room.tariff.elevator_fee,
            new_room.deposit,
            new_room.note,
        ],
    );

    if let Err(error) = result {
        return Err(map_foreign_key_error(error));
    }

    let id = connection.last_insert_rowid();

    Ok(Room {
        id,
        house_id: new_room.house_id,
        name: new_room.name,
        renter: new_room.renter,
        phone: new_room.phone,
        area: new_room.area,
        status: new_room.status,
        tariff: new_room.tariff,
        deposit: new_room.deposit,
        note: new_room.note,
    })
}

/// Retrieve a single room by ID.
pub fn get_room(room_id: RoomId, connection: &Connection) -> Result<Room, Error> {
    connection
        .prepare(&format!(
            "SELECT {ROOM_COLUMNS} FROM room WHERE id = :id;"
        ))?
        .query_row(&[(":id", &room_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve rooms ordered by name, optionally restricted to one house.
pub fn get_all_rooms(
    house_filter: Option<HouseId>,
    connection: &Connection,
) -> Result<Vec<Room>, Error> {
    match house_filter {
        Some(house_id) => connection
            .prepare(&format!(
                "SELECT {ROOM_COLUMNS} FROM room WHERE house_id = :house_id ORDER BY name ASC;"
            ))?
            .query_map(&[(":house_id", &house_id)], map_row)?
            .map(|maybe_room| maybe_room.map_err(|error| error.into()))
            .collect(),
        None => connection
            .prepare(&format!("SELECT {ROOM_COLUMNS} FROM room ORDER BY name ASC;"))?
            .query_map([], map_row)?
            .map(|maybe_room| maybe_room.map_err(|error| error.into()))
            .collect(),
    }
}

/// Overwrite a room's fields. Returns an error if the room doesn't exist.
///
/// Payments hold their own copy of the tariff, so changing a room's pricing
/// here does not touch existing bills.
pub fn update_room(
    room_id: RoomId,
    new_room: NewRoom,
    connection: &Connection,
) -> Result<(), Error> {
    let result = connection.execute(
        "UPDATE room SET house_id = ?1, name = ?2, renter = ?3, phone = ?4, area = ?5,
            status = ?6, room_price = ?7, elect_unit_price = ?8, water_unit_price = ?9,
            trash_fee = ?10, parking_fee = ?11, washing_machine_fee = ?12,
            elevator_fee = ?13, deposit = ?14, note = ?15
        WHERE id = ?16",
        rusqlite::params![
            new_room.house_id,
            new_room.name,
            new_room.renter,
            new_room.phone,
            new_room.area,
            new_room.status.as_str(),
            new_room.tariff.room_price,
            new_room.tariff.elect_unit_price,
            new_room.tariff.water_unit_price,
            new_room.tariff.trash_fee,
            new_room.tariff.parking_fee,
            new_room.tariff.washing_machine_fee,
            new_room.tariff.elevator_fee,
            new_room.deposit,
            new_room.note,
            room_id,
        ],
    );

    match result {
        Ok(0) => Err(Error::UpdateMissingRoom),
        Ok(_) => Ok(()),
        Err(error) => Err(map_foreign_key_error(error)),
    }
}

/// Delete a room by ID. Payments for the room are deleted by cascade.
pub fn delete_room(room_id: RoomId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM room WHERE id = ?1", [room_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingRoom);
    }

    Ok(())
}

/// Initialize the room table.
pub fn create_room_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS room (
            id INTEGER PRIMARY KEY,
            house_id INTEGER NOT NULL REFERENCES house(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            renter TEXT NOT NULL,
            phone TEXT NOT NULL,
            area REAL NOT NULL,
            status TEXT NOT NULL,
            room_price INTEGER NOT NULL,
            elect_unit_price INTEGER NOT NULL,
            water_unit_price INTEGER NOT NULL,
            trash_fee INTEGER NOT NULL,
            parking_fee INTEGER NOT NULL,
            washing_machine_fee INTEGER NOT NULL,
            elevator_fee INTEGER NOT NULL,
            deposit INTEGER NOT NULL,
            note TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_room_house_id ON room(house_id);",
    )?;

    Ok(())
}

const ROOM_COLUMNS: &str = "id, house_id, name, renter, phone, area, status, room_price,
    elect_unit_price, water_unit_price, trash_fee, parking_fee, washing_machine_fee,
    elevator_fee, deposit, note";

// SQLITE_CONSTRAINT_FOREIGNKEY
const FOREIGN_KEY_EXTENDED_CODE: i32 = 787;

fn map_foreign_key_error(error: rusqlite::Error) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(sqlite_error, _)
            if sqlite_error.extended_code == FOREIGN_KEY_EXTENDED_CODE =>
        {
            Error::InvalidHouse
        }
        error => error.into(),
    }
}

fn map_row(row: &Row) -> Result<Room, rusqlite::Error> {
    let raw_status: String = row.get(6)?;
    let status = RoomStatus::try_from(raw_status.as_str()).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            rusqlite::types::Type::Text,
            format!("unknown room status {raw_status:?}").into(),
        )
    })?;

    Ok(Room {
        id: row.get(0)?,
        house_id: row.get(1)?,
        name: row.get(2)?,
        renter: row.get(3)?,
        phone: row.get(4)?,
        area: row.get(5)?,
        status,
        tariff: Tariff {
            room_price: row.get(7)?,
            elect_unit_price: row.get(8)?,
            water_unit_price: row.get(9)?,
            trash_fee: row.get(10)?,
            parking_fee: row.get(11)?,
            washing_machine_fee: row.get(12)?,
            elevator_fee: row.get(13)?,
        },
        deposit: row.get(14)?,
        note: row.get(15)?,
    })
}

#[cfg(test)]
mod room_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        billing::Tariff,
        house::{create_house, create_house_table},
        room::{NewRoom, RoomStatus},
    };

    use super::{create_room, create_room_table, delete_room, get_all_rooms, get_room, update_room};

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        connection
            .pragma_update(None, "foreign_keys", true)
            .unwrap();
        create_house_table(&connection).expect("Could not create house table");
        create_room_table(&connection).expect("Could not create room table");
        connection
    }

    fn sample_room(house_id: i64, name: &str) -> NewRoom {
        NewRoom {
            house_id,
            name: name.to_string(),
            renter: "Lan".to_string(),
            phone: "0901234567".to_string(),
            area: 22.5,
            status: RoomStatus::Rented,
            tariff: Tariff {
                room_price: 2_000_000,
                elect_unit_price: 3_500,
                water_unit_price: 15_000,
                trash_fee: 20_000,
                parking_fee: 0,
                washing_machine_fee: 0,
                elevator_fee: 0,
            },
            deposit: 2_000_000,
            note: String::new(),
        }
    }

    #[test]
    fn create_room_succeeds() {
        let connection = get_test_db_connection();
        let house = create_house("12 Hang Bac", "", &connection).unwrap();

        let room = create_room(sample_room(house.id, "Room 101"), &connection)
            .expect("Could not create room");

        assert!(room.id > 0);
        assert_eq!(room.name, "Room 101");
        assert_eq!(room.tariff.room_price, 2_000_000);
    }

    #[test]
    fn create_room_with_invalid_house_returns_error() {
        let connection = get_test_db_connection();

        let result = create_room(sample_room(999999, "Room 101"), &connection);

        assert_eq!(result, Err(Error::InvalidHouse));
    }

    #[test]
    fn get_room_round_trips() {
        let connection = get_test_db_connection();
        let house = create_house("12 Hang Bac", "", &connection).unwrap();
        let inserted_room = create_room(sample_room(house.id, "Room 101"), &connection).unwrap();

        let selected_room = get_room(inserted_room.id, &connection);

        assert_eq!(Ok(inserted_room), selected_room);
    }

    #[test]
    fn get_room_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();

        assert_eq!(get_room(999999, &connection), Err(Error::NotFound));
    }

    #[test]
    fn get_all_rooms_filters_by_house() {
        let connection = get_test_db_connection();
        let house1 = create_house("12 Hang Bac", "", &connection).unwrap();
        let house2 = create_house("9 Tran Phu", "", &connection).unwrap();
        let room1 = create_room(sample_room(house1.id, "Room 101"), &connection).unwrap();
        let room2 = create_room(sample_room(house2.id, "Room 201"), &connection).unwrap();

        let all_rooms = get_all_rooms(None, &connection).unwrap();
        assert_eq!(all_rooms, vec![room1.clone(), room2]);

        let house1_rooms = get_all_rooms(Some(house1.id), &connection).unwrap();
        assert_eq!(house1_rooms, vec![room1]);
    }

    #[test]
    fn update_room_succeeds() {
        let connection = get_test_db_connection();
        let house = create_house("12 Hang Bac", "", &connection).unwrap();
        let room = create_room(sample_room(house.id, "Room 101"), &connection).unwrap();

        let mut updated = sample_room(house.id, "Room 101A");
        updated.status = RoomStatus::Available;
        updated.renter = String::new();

        update_room(room.id, updated, &connection).expect("Could not update room");

        let got_room = get_room(room.id, &connection).unwrap();
        assert_eq!(got_room.name, "Room 101A");
        assert_eq!(got_room.status, RoomStatus::Available);
    }

    #[test]
    fn update_room_with_invalid_id_returns_error() {
        let connection = get_test_db_connection();
        let house = create_house("12 Hang Bac", "", &connection).unwrap();

        let result = update_room(999999, sample_room(house.id, "Room 101"), &connection);

        assert_eq!(result, Err(Error::UpdateMissingRoom));
    }

    #[test]
    fn delete_room_succeeds() {
        let connection = get_test_db_connection();
        let house = create_house("12 Hang Bac", "", &connection).unwrap();
        let room = create_room(sample_room(house.id, "Room 101"), &connection).unwrap();

        delete_room(room.id, &connection).expect("Could not delete room");

        assert_eq!(get_room(room.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_room_with_invalid_id_returns_error() {
        let connection = get_test_db_connection();

        assert_eq!(delete_room(999999, &connection), Err(Error::DeleteMissingRoom));
    }

    #[test]
    fn deleting_house_cascades_to_rooms() {
        let connection = get_test_db_connection();
        let house = create_house("12 Hang Bac", "", &connection).unwrap();
        let room = create_room(sample_room(house.id, "Room 101"), &connection).unwrap();

        crate::house::delete_house(house.id, &connection).expect("Could not delete house");

        assert_eq!(get_room(room.id, &connection), Err(Error::NotFound));
    }
}
