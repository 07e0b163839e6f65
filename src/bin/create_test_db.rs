use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use rentroll_rs::{PasswordHash, ValidatedPassword, initialize_db};

/// A utility for creating a test database for the rentroll_rs server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;

    conn.execute(
        "INSERT INTO user (password) VALUES (?1)",
        (password_hash.to_string(),),
    )?;

    println!("Creating test houses, rooms and payments...");

    conn.execute(
        "INSERT INTO house (address, note) VALUES ('12 Hang Bac', 'old town'), ('9 Tran Phu', '')",
        (),
    )?;

    conn.execute(
        "INSERT INTO room (
            house_id, name, renter, phone, area, status, room_price,
            elect_unit_price, water_unit_price, trash_fee, parking_fee,
            washing_machine_fee, elevator_fee, deposit, note
        )
        VALUES
            (1, 'Room 101', 'Nguyen Van A', '0901234567', 20.0, 'rented',
                2000000, 3500, 15000, 20000, 100000, 50000, 0, 2000000, ''),
            (1, 'Room 102', '', '', 18.5, 'available',
                1800000, 3500, 15000, 20000, 0, 0, 0, 1800000, ''),
            (2, 'Room 201', 'Tran Thi B', '0907654321', 25.0, 'rented',
                2500000, 3500, 15000, 20000, 100000, 0, 50000, 2500000, 'corner room')",
        (),
    )?;

    conn.execute(
        "INSERT INTO payment (
            room_id, month, year, elect_start, elect_end, water_start, water_end,
            room_price, elect_unit_price, water_unit_price, trash_fee, parking_fee,
            washing_machine_fee, elevator_fee, total_amount, status, note, created_on
        )
        VALUES
            (1, 4, 2024, 100, 142, 20, 26, 2000000, 3500, 15000, 20000, 100000,
                50000, 0, 2407000, 'paid', '', '2024-05-01T08:00:00Z'),
            (1, 5, 2024, 142, 190, 26, 31, 2000000, 3500, 15000, 20000, 100000,
                50000, 0, 2413000, 'unpaid', '', '2024-06-01T08:00:00Z'),
            (3, 5, 2024, 300, 360, 40, 47, 2500000, 3500, 15000, 20000, 100000,
                0, 50000, 2985000, 'unpaid', '', '2024-06-01T08:10:00Z')",
        (),
    )?;

    println!("Success!");

    Ok(())
}
