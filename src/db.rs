//! Sets up the application database.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    house::create_house_table, payment::create_payment_table, price::create_price_table,
    room::create_room_table, user::create_user_table,
};

/// Create the tables for the application's domain models.
///
/// Table creation happens in a single exclusive transaction so that two server
/// processes pointed at the same database file cannot interleave.
///
/// # Errors
///
/// Returns an error if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    // Must be set outside the transaction, SQLite ignores it inside one.
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_house_table(&transaction)?;
    create_room_table(&transaction)?;
    create_price_table(&transaction)?;
    create_payment_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
