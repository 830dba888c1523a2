use std::{error::Error, io, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;

use quarry_billing::{
    Error as AppError, PasswordHash, Role, ValidatedPassword, confirm_user, create_profile,
    create_user, get_profile, get_user_by_email, initialize_db, set_user_role,
};

/// A utility for creating a staff account, or promoting an existing account to staff.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The email address the staff member logs in with.
    #[arg(long)]
    email: String,

    /// The name shown for this account in the navigation bar and trucker lists.
    #[arg(long)]
    trucker_name: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);
    validate_db_path(db_path);

    let connection = Connection::open(db_path)?;
    initialize_db(&connection)?;

    match get_user_by_email(&args.email, &connection) {
        Ok(user) => {
            println!("Promoting {} to staff", user.email);
            set_user_role(user.id, Role::Staff, &connection)?;
            confirm_user(user.id, &connection)?;

            match get_profile(user.id, &connection) {
                Ok(_) => {}
                Err(AppError::NotFound) => {
                    create_profile(user.id, &args.trucker_name, &connection)?;
                }
                Err(error) => return Err(error.into()),
            }
        }
        Err(AppError::NotFound) => {
            println!("Creating staff account for {}", args.email);

            let Some(password_hash) = get_new_password_hash(&args.email, &args.trucker_name)
            else {
                return Ok(());
            };

            let user = create_user(&args.email, password_hash, Role::Staff, &connection)?;
            confirm_user(user.id, &connection)?;
            create_profile(user.id, &args.trucker_name, &connection)?;
        }
        Err(error) => return Err(error.into()),
    }

    println!("Success!");

    Ok(())
}

fn validate_db_path(db_path: &Path) {
    match db_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            print_error("Database path must include a file extension (e.g., 'quarry.db').");
            exit(1);
        }
    }
}

fn get_new_password_hash(email: &str, trucker_name: &str) -> Option<PasswordHash> {
    loop {
        println!();

        let first_password = match rpassword::prompt_password("Enter a password: ") {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => return None,
            Err(error) => {
                print_error(format!("Could not read password from stdin: {error}"));
                return None;
            }
        };

        let password = match ValidatedPassword::new(&first_password, &[email, trucker_name]) {
            Ok(password) => password,
            Err(error) => {
                print_error(error);
                continue;
            }
        };

        let second_password = match rpassword::prompt_password("Enter the same password again: ")
        {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => return None,
            Err(error) => {
                print_error(format!("Could not read password from stdin: {error}"));
                return None;
            }
        };

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        match PasswordHash::new(password, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => {
                print_error(format!("Could not hash password: {error}. Try again."));
                continue;
            }
        }
    }
}

fn print_error(error: impl ToString) {
    eprintln!("\x1b[31;1m{}\x1b[0m", error.to_string())
}
