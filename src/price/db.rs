//! Database operations for price templates.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    billing::Tariff,
    price::{NewPrice, Price, PriceId},
};

/// Create a price template and return it with its generated ID.
pub fn create_price(new_price: NewPrice, connection: &Connection) -> Result<Price, Error> {
    connection.execute(
        "INSERT INTO price (price_name, room_price, elect_unit_price, water_unit_price,
            trash_fee, parking_fee, washing_machine_fee, elevator_fee, deposit)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
        rusqlite::params![
            new_price.price_name,
            new_price.tariff.room_price,
            new_price.tariff.elect_unit_price,
            new_price.tariff.water_unit_price,
            new_price.tariff.trash_fee,
            new_price.tariff.parking_fee,
            new_price.tariff.washing_machine_fee,
            new_price.tariff.elevator_fee,
            new_price.deposit,
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Price {
        id,
        price_name: new_price.price_name,
        tariff: new_price.tariff,
        deposit: new_price.deposit,
    })
}

/// Retrieve a single price template by ID.
pub fn get_price(price_id: PriceId, connection: &Connection) -> Result<Price, Error> {
    connection
        .prepare(&format!("SELECT {PRICE_COLUMNS} FROM price WHERE id = :id;"))?
        .query_row(&[(":id", &price_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all price templates ordered alphabetically by name.
pub fn get_all_prices(connection: &Connection) -> Result<Vec<Price>, Error> {
    connection
        .prepare(&format!(
            "SELECT {PRICE_COLUMNS} FROM price ORDER BY price_name ASC;"
        ))?
        .query_map([], map_row)?
        .map(|maybe_price| maybe_price.map_err(|error| error.into()))
        .collect()
}

/// Overwrite a price template's fields. Returns an error if it doesn't exist.
pub fn update_price(
    price_id: PriceId,
    new_price: NewPrice,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE price SET price_name = ?1, room_price = ?2, elect_unit_price = ?3,
            water_unit_price = ?4, trash_fee = ?5, parking_fee = ?6,
            washing_machine_fee = ?7, elevator_fee = ?8, deposit = ?9
        WHERE id = ?10",
        rusqlite::params![
            new_price.price_name,
            new_price.tariff.room_price,
            new_price.tariff.elect_unit_price,
            new_price.tariff.water_unit_price,
            new_price.tariff.trash_fee,
            new_price.tariff.parking_fee,
            new_price.tariff.washing_machine_fee,
            new_price.tariff.elevator_fee,
            new_price.deposit,
            price_id,
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingPrice);
    }

    Ok(())
}

/// Delete a price template by ID. Returns an error if it doesn't exist.
pub fn delete_price(price_id: PriceId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM price WHERE id = ?1", [price_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingPrice);
    }

    Ok(())
}

/// Initialize the price table.
pub fn create_price_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS price (
            id INTEGER PRIMARY KEY,
            price_name TEXT NOT NULL,
            room_price INTEGER NOT NULL,
            elect_unit_price INTEGER NOT NULL,
            water_unit_price INTEGER NOT NULL,
            trash_fee INTEGER NOT NULL,
            parking_fee INTEGER NOT NULL,
            washing_machine_fee INTEGER NOT NULL,
            elevator_fee INTEGER NOT NULL,
            deposit INTEGER NOT NULL
        );",
    )?;

    Ok(())
}

const PRICE_COLUMNS: &str = "id, price_name, room_price, elect_unit_price, water_unit_price,
    trash_fee, parking_fee, washing_machine_fee, elevator_fee, deposit";

fn map_row(row: &Row) -> Result<Price, rusqlite::Error> {
    Ok(Price {
        id: row.get(0)?,
        price_name: row.get(1)?,
        tariff: Tariff {
            room_price: row.get(2)?,
            elect_unit_price: row.get(3)?,
            water_unit_price: row.get(4)?,
            trash_fee: row.get(5)?,
            parking_fee: row.get(6)?,
            washing_machine_fee: row.get(7)?,
            elevator_fee: row.get(8)?,
        },
        deposit: row.get(9)?,
    })
}

#[cfg(test)]
mod price_query_tests {
    use rusqlite::Connection;

    use crate::{Error, billing::Tariff, price::NewPrice};

    use super::{
        create_price, create_price_table, delete_price, get_all_prices, get_price, update_price,
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_price_table(&connection).expect("Could not create price table");
        connection
    }

    fn sample_price(name: &str) -> NewPrice {
        NewPrice {
            price_name: name.to_string(),
            tariff: Tariff {
                room_price: 2_000_000,
                elect_unit_price: 3_500,
                water_unit_price: 15_000,
                trash_fee: 20_000,
                parking_fee: 100_000,
                washing_machine_fee: 0,
                elevator_fee: 0,
            },
            deposit: 2_000_000,
        }
    }

    #[test]
    fn create_price_succeeds() {
        let connection = get_test_db_connection();

        let price =
            create_price(sample_price("Standard"), &connection).expect("Could not create price");

        assert!(price.id > 0);
        assert_eq!(price.price_name, "Standard");
        assert_eq!(price.tariff.parking_fee, 100_000);
    }

    #[test]
    fn get_price_round_trips() {
        let connection = get_test_db_connection();
        let inserted_price = create_price(sample_price("Standard"), &connection).unwrap();

        let selected_price = get_price(inserted_price.id, &connection);

        assert_eq!(Ok(inserted_price), selected_price);
    }

    #[test]
    fn get_price_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();

        assert_eq!(get_price(999999, &connection), Err(Error::NotFound));
    }

    #[test]
    fn get_all_prices_orders_by_name() {
        let connection = get_test_db_connection();
        let second = create_price(sample_price("Premium"), &connection).unwrap();
        let first = create_price(sample_price("Basic"), &connection).unwrap();

        let prices = get_all_prices(&connection).unwrap();

        assert_eq!(prices, vec![first, second]);
    }

    #[test]
    fn update_price_succeeds() {
        let connection = get_test_db_connection();
        let price = create_price(sample_price("Standard"), &connection).unwrap();

        let mut updated = sample_price("Standard Plus");
        updated.tariff.room_price = 2_500_000;

        update_price(price.id, updated, &connection).expect("Could not update price");

        let got_price = get_price(price.id, &connection).unwrap();
        assert_eq!(got_price.price_name, "Standard Plus");
        assert_eq!(got_price.tariff.room_price, 2_500_000);
    }

    #[test]
    fn update_price_with_invalid_id_returns_error() {
        let connection = get_test_db_connection();

        let result = update_price(999999, sample_price("Standard"), &connection);

        assert_eq!(result, Err(Error::UpdateMissingPrice));
    }

    #[test]
    fn delete_price_succeeds() {
        let connection = get_test_db_connection();
        let price = create_price(sample_price("Standard"), &connection).unwrap();

        delete_price(price.id, &connection).expect("Could not delete price");

        assert_eq!(get_price(price.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_price_with_invalid_id_returns_error() {
        let connection = get_test_db_connection();

        assert_eq!(
            delete_price(999999, &connection),
            Err(Error::DeleteMissingPrice)
        );
    }
}
