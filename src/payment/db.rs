//! Database operations for payments.

use rusqlite::{Connection, Row, ToSql};
use time::OffsetDateTime;

use crate::{
    Error,
    billing::{MeterReading, PastPeriod, Tariff},
    payment::{NewPayment, Payment, PaymentFilter, PaymentId, PaymentStatus, PaymentUpdate},
    room::RoomId,
};

/// How many past periods the new-payment page shows and feeds into the
/// start-reading suggestion.
pub const RECENT_PERIOD_WINDOW: usize = 5;

/// Create a payment and return it with its generated ID and creation time.
///
/// # Errors
///
/// Returns [Error::InvalidRoom] if `new_payment.room_id` does not refer to an
/// existing room.
pub fn create_payment(new_payment: NewPayment, connection: &Connection) -> Result<Payment, Error> {
    let created_on = OffsetDateTime::now_utc();

    let result = connection.execute(
        "INSERT INTO payment (room_id, month, year, elect_start, elect_end, water_start,
            water_end, room_price, elect_unit_price, water_unit_price, trash_fee,
            parking_fee, washing_machine_fee, elevator_fee, total_amount, status, note,
            created_on)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18);",
        rusqlite::params![
            new_payment.room_id,
            new_payment.month,
            new_payment.year,
            new_payment.elect.start,
            new_payment.elect.end,
            new_payment.water.start,
            new_payment.water.end,
            new_payment.tariff.room_price,
            new_payment.tariff.elect_unit_price,
            new_payment.tariff.water_unit_price,
            new_payment.tariff.trash_fee,
            new_payment.tariff.parking_fee,
            new_payment.tariff.washing_machine_fee,
            new_payment.tariff.elevator_fee,
            new_payment.total_amount,
            new_payment.status.as_str(),
            new_payment.note,
            created_on,
        ],
    );

    if let Err(error) = result {
        return Err(map_foreign_key_error(error));
    }

    let id = connection.last_insert_rowid();

    Ok(Payment {
        id,
        room_id: new_payment.room_id,
        month: new_payment.month,
        year: new_payment.year,
        elect: new_payment.elect,
        water: new_payment.water,
        tariff: new_payment.tariff,
        total_amount: new_payment.total_amount,
        status: new_payment.status,
        note: new_payment.note,
        created_on,
    })
}

/// Retrieve a single payment by ID.
pub fn get_payment(payment_id: PaymentId, connection: &Connection) -> Result<Payment, Error> {
    connection
        .prepare(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payment WHERE id = :id;"
        ))?
        .query_row(&[(":id", &payment_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve payments matching `filter`, newest period first.
pub fn get_payments(
    filter: PaymentFilter,
    connection: &Connection,
) -> Result<Vec<Payment>, Error> {
    let mut conditions: Vec<&str> = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(room_id) = filter.room_id {
        conditions.push("room_id = ?");
        params.push(Box::new(room_id));
    }

    if let Some(month) = filter.month {
        conditions.push("month = ?");
        params.push(Box::new(month));
    }

    if let Some(year) = filter.year {
        conditions.push("year = ?");
        params.push(Box::new(year));
    }

    if let Some(status) = filter.status {
        conditions.push("status = ?");
        params.push(Box::new(status.as_str()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    connection
        .prepare(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payment {where_clause}
            ORDER BY year DESC, month DESC, id DESC;"
        ))?
        .query_map(rusqlite::params_from_iter(params), map_row)?
        .map(|maybe_payment| maybe_payment.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the most recently billed periods for a room, newest first.
///
/// Capped at [RECENT_PERIOD_WINDOW] periods. The result feeds the
/// start-reading suggestion on the new-payment page.
pub fn get_recent_periods(
    room_id: RoomId,
    connection: &Connection,
) -> Result<Vec<PastPeriod>, Error> {
    connection
        .prepare(
            "SELECT month, year, elect_end, water_end FROM payment
            WHERE room_id = :room_id
            ORDER BY year DESC, month DESC
            LIMIT :limit;",
        )?
        .query_map(
            rusqlite::named_params! {
                ":room_id": room_id,
                ":limit": RECENT_PERIOD_WINDOW as i64,
            },
            |row| {
                Ok(PastPeriod {
                    month: row.get(0)?,
                    year: row.get(1)?,
                    elect_end: row.get(2)?,
                    water_end: row.get(3)?,
                })
            },
        )?
        .map(|maybe_period| maybe_period.map_err(|error| error.into()))
        .collect()
}

/// Overwrite a payment's editable fields. Returns an error if the payment
/// doesn't exist.
///
/// The room and the tariff snapshot are deliberately not updatable. The
/// caller is expected to have recomputed `update.total_amount` from the
/// submitted readings and the stored snapshot.
pub fn update_payment(
    payment_id: PaymentId,
    update: PaymentUpdate,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE payment SET month = ?1, year = ?2, elect_start = ?3, elect_end = ?4,
            water_start = ?5, water_end = ?6, total_amount = ?7, status = ?8, note = ?9
        WHERE id = ?10",
        rusqlite::params![
            update.month,
            update.year,
            update.elect.start,
            update.elect.end,
            update.water.start,
            update.water.end,
            update.total_amount,
            update.status.as_str(),
            update.note,
            payment_id,
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingPayment);
    }

    Ok(())
}

/// Delete a payment by ID. Returns an error if the payment doesn't exist.
pub fn delete_payment(payment_id: PaymentId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM payment WHERE id = ?1", [payment_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingPayment);
    }

    Ok(())
}

/// Initialize the payment table.
pub fn create_payment_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS payment (
            id INTEGER PRIMARY KEY,
            room_id INTEGER NOT NULL REFERENCES room(id) ON DELETE CASCADE,
            month INTEGER NOT NULL,
            year INTEGER NOT NULL,
            elect_start INTEGER NOT NULL,
            elect_end INTEGER NOT NULL,
            water_start INTEGER NOT NULL,
            water_end INTEGER NOT NULL,
            room_price INTEGER NOT NULL,
            elect_unit_price INTEGER NOT NULL,
            water_unit_price INTEGER NOT NULL,
            trash_fee INTEGER NOT NULL,
            parking_fee INTEGER NOT NULL,
            washing_machine_fee INTEGER NOT NULL,
            elevator_fee INTEGER NOT NULL,
            total_amount INTEGER NOT NULL,
            status TEXT NOT NULL,
            note TEXT NOT NULL,
            created_on TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_payment_room_id ON payment(room_id);
        CREATE INDEX IF NOT EXISTS idx_payment_period ON payment(year, month);",
    )?;

    Ok(())
}

const PAYMENT_COLUMNS: &str = "id, room_id, month, year, elect_start, elect_end, water_start,
    water_end, room_price, elect_unit_price, water_unit_price, trash_fee, parking_fee,
    washing_machine_fee, elevator_fee, total_amount, status, note, created_on";

// SQLITE_CONSTRAINT_FOREIGNKEY
const FOREIGN_KEY_EXTENDED_CODE: i32 = 787;

fn map_foreign_key_error(error: rusqlite::Error) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(sqlite_error, _)
            if sqlite_error.extended_code == FOREIGN_KEY_EXTENDED_CODE =>
        {
            Error::InvalidRoom
        }
        error => error.into(),
    }
}

fn map_row(row: &Row) -> Result<Payment, rusqlite::Error> {
    let raw_status: String = row.get(16)?;
    let status = PaymentStatus::try_from(raw_status.as_str()).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            16,
            rusqlite::types::Type::Text,
            format!("unknown payment status {raw_status:?}").into(),
        )
    })?;

    Ok(Payment {
        id: row.get(0)?,
        room_id: row.get(1)?,
        month: row.get(2)?,
        year: row.get(3)?,
        elect: MeterReading {
            start: row.get(4)?,
            end: row.get(5)?,
        },
        water: MeterReading {
            start: row.get(6)?,
            end: row.get(7)?,
        },
        tariff: Tariff {
            room_price: row.get(8)?,
            elect_unit_price: row.get(9)?,
            water_unit_price: row.get(10)?,
            trash_fee: row.get(11)?,
            parking_fee: row.get(12)?,
            washing_machine_fee: row.get(13)?,
            elevator_fee: row.get(14)?,
        },
        total_amount: row.get(15)?,
        status,
        note: row.get(17)?,
        created_on: row.get(18)?,
    })
}
