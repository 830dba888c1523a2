use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use quarry_billing::{
    PasswordHash, PaymentMethod, PriceList, Role, Transaction, ValidatedPassword, confirm_user,
    create_profile, create_transaction, create_user, initialize_db, mark_transaction_paid,
};

/// A utility for creating a test database for the quarry billing server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Demo accounts as (email, trucker name, role). Every account uses the password "test".
const ACCOUNTS: [(&str, &str, Role); 4] = [
    ("staff@example.com", "Quarry Office", Role::Staff),
    ("juan@example.com", "Juan Dela Cruz", Role::Member),
    ("pedro@example.com", "Pedro Santos", Role::Member),
    ("maria@example.com", "Maria Reyes", Role::Member),
];

const DESTINATIONS: [&str; 3] = ["San Fernando", "Angeles", "Mabalacat"];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'quarry.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test users...");

    for (email, trucker_name, role) in ACCOUNTS {
        let password_hash = PasswordHash::new(
            ValidatedPassword::new_unchecked("test"),
            PasswordHash::DEFAULT_COST,
        )?;
        let user = create_user(email, password_hash, role, &conn)?;
        confirm_user(user.id, &conn)?;
        create_profile(user.id, trucker_name, &conn)?;
    }

    println!("Creating test records...");

    let price_list = PriceList::default();
    let today = OffsetDateTime::now_utc().date();
    let methods = PaymentMethod::ALL;
    let volumes = ["10 cubic meter", "15 cubic meter"];
    let truckers = &ACCOUNTS[1..];

    for index in 0..30_usize {
        let date = today - Duration::days((index % 10) as i64);
        let (_, trucker_name, _) = truckers[index % truckers.len()];
        let payment_method = methods[index % methods.len()];

        let transaction = create_transaction(
            Transaction::build(
                date,
                trucker_name,
                volumes[index % volumes.len()],
                payment_method,
            )
            .time(&format!("{:02}:{:02}", 7 + index % 10, (index * 7) % 60))
            .receipt_number(&format!("R-{:04}", index + 1))
            .plate_number(&format!("ABC {:04}", 1000 + index))
            .destination(DESTINATIONS[index % DESTINATIONS.len()]),
            &price_list,
            &conn,
        )?;

        if payment_method != PaymentMethod::Cash && index % 4 == 0 {
            mark_transaction_paid(transaction.id, &conn)?;
        }
    }

    println!("Success!");

    Ok(())
}
