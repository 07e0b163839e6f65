//! Database operations for houses.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    house::{House, HouseId},
};

/// Create a house and return it with its generated ID.
pub fn create_house(address: &str, note: &str, connection: &Connection) -> Result<House, Error> {
    connection.execute(
        "INSERT INTO house (address, note) VALUES (?1, ?2);",
        (address, note),
    )?;

    let id = connection.last_insert_rowid();

    Ok(House {
        id,
        address: address.to_string(),
        note: note.to_string(),
    })
}

/// Retrieve a single house by ID.
pub fn get_house(house_id: HouseId, connection: &Connection) -> Result<House, Error> {
    connection
        .prepare("SELECT id, address, note FROM house WHERE id = :id;")?
        .query_row(&[(":id", &house_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all houses ordered alphabetically by address.
pub fn get_all_houses(connection: &Connection) -> Result<Vec<House>, Error> {
    connection
        .prepare("SELECT id, address, note FROM house ORDER BY address ASC;")?
        .query_map([], map_row)?
        .map(|maybe_house| maybe_house.map_err(|error| error.into()))
        .collect()
}

/// Update a house's address and note. Returns an error if the house doesn't exist.
pub fn update_house(
    house_id: HouseId,
    address: &str,
    note: &str,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE house SET address = ?1, note = ?2 WHERE id = ?3",
        (address, note, house_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingHouse);
    }

    Ok(())
}

/// Delete a house by ID. Rooms in the house are deleted by cascade.
pub fn delete_house(house_id: HouseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM house WHERE id = ?1", [house_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingHouse);
    }

    Ok(())
}

/// Initialize the house table.
pub fn create_house_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS house (
            id INTEGER PRIMARY KEY,
            address TEXT NOT NULL,
            note TEXT NOT NULL
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<House, rusqlite::Error> {
    Ok(House {
        id: row.get(0)?,
        address: row.get(1)?,
        note: row.get(2)?,
    })
}

#[cfg(test)]
mod house_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        house::{create_house, delete_house, get_all_houses, get_house, update_house},
    };

    use super::create_house_table;

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_house_table(&connection).expect("Could not create house table");
        connection
    }

    #[test]
    fn create_house_succeeds() {
        let connection = get_test_db_connection();

        let house = create_house("12 Hang Bac", "near the lake", &connection)
            .expect("Could not create house");

        assert!(house.id > 0);
        assert_eq!(house.address, "12 Hang Bac");
        assert_eq!(house.note, "near the lake");
    }

    #[test]
    fn get_house_succeeds() {
        let connection = get_test_db_connection();
        let inserted_house =
            create_house("12 Hang Bac", "", &connection).expect("Could not create test house");

        let selected_house = get_house(inserted_house.id, &connection);

        assert_eq!(Ok(inserted_house), selected_house);
    }

    #[test]
    fn get_house_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();
        let inserted_house =
            create_house("12 Hang Bac", "", &connection).expect("Could not create test house");

        let selected_house = get_house(inserted_house.id + 123, &connection);

        assert_eq!(selected_house, Err(Error::NotFound));
    }

    #[test]
    fn get_all_houses_orders_by_address() {
        let connection = get_test_db_connection();
        let second =
            create_house("9 Tran Phu", "", &connection).expect("Could not create test house");
        let first =
            create_house("12 Hang Bac", "", &connection).expect("Could not create test house");

        let houses = get_all_houses(&connection).expect("Could not get all houses");

        assert_eq!(houses, vec![first, second]);
    }

    #[test]
    fn update_house_succeeds() {
        let connection = get_test_db_connection();
        let house =
            create_house("12 Hang Bac", "", &connection).expect("Could not create test house");

        let result = update_house(house.id, "14 Hang Bac", "renovated", &connection);

        assert!(result.is_ok());

        let updated_house = get_house(house.id, &connection).expect("Could not get updated house");
        assert_eq!(updated_house.address, "14 Hang Bac");
        assert_eq!(updated_house.note, "renovated");
    }

    #[test]
    fn update_house_with_invalid_id_returns_error() {
        let connection = get_test_db_connection();

        let result = update_house(999999, "14 Hang Bac", "", &connection);

        assert_eq!(result, Err(Error::UpdateMissingHouse));
    }

    #[test]
    fn delete_house_succeeds() {
        let connection = get_test_db_connection();
        let house =
            create_house("12 Hang Bac", "", &connection).expect("Could not create test house");

        let result = delete_house(house.id, &connection);

        assert!(result.is_ok());
        assert_eq!(get_house(house.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_house_with_invalid_id_returns_error() {
        let connection = get_test_db_connection();

        let result = delete_house(999999, &connection);

        assert_eq!(result, Err(Error::DeleteMissingHouse));
    }
}
