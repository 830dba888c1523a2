use rusqlite::Connection;
use time::Date;

use crate::{
    auth::{PasswordHash, Role, UserID, ValidatedPassword, confirm_user, create_user},
    db::initialize,
    profile::create_profile,
    transaction::{PaymentMethod, PriceList, Transaction, create_transaction},
};

pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// Insert a confirmed user with a profile and the password "hunter2" hashed
/// with the lowest bcrypt cost.
pub(crate) fn insert_user(
    email: &str,
    trucker_name: &str,
    role: Role,
    connection: &Connection,
) -> UserID {
    let password_hash = PasswordHash::new(ValidatedPassword::new_unchecked("hunter2"), 4)
        .expect("Could not hash test password");
    let user = create_user(email, password_hash, role, connection).expect("Could not create user");
    confirm_user(user.id, connection).expect("Could not confirm user");
    create_profile(user.id, trucker_name, connection).expect("Could not create profile");

    user.id
}

pub(crate) fn insert_transaction(
    date: Date,
    trucker_name: &str,
    unit_volume: &str,
    payment_method: PaymentMethod,
    connection: &Connection,
) -> Transaction {
    create_transaction(
        Transaction::build(date, trucker_name, unit_volume, payment_method)
            .time("08:30")
            .receipt_number("R-0001")
            .plate_number("ABC 1234")
            .destination("San Fernando"),
        &PriceList::default(),
        connection,
    )
    .expect("Could not create transaction")
}
