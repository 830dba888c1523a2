//! Defines the core data models and database queries for trucker loads (transactions).

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, params_from_iter,
    types::{Type, Value},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    database_id::TransactionId,
    transaction::price::PriceList,
};

// ============================================================================
// MODELS
// ============================================================================

/// How a load was paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    /// Paid in cash on delivery.
    Cash,
    /// Billed to the trucker's credit account.
    Credit,
    /// Billed against a purchase order.
    Po,
}

impl PaymentMethod {
    /// Every payment method, in the order they are offered in forms.
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Cash,
        PaymentMethod::Credit,
        PaymentMethod::Po,
    ];

    /// The canonical upper case name used in the database and in URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Credit => "CREDIT",
            PaymentMethod::Po => "PO",
        }
    }

    /// The payment status a new transaction starts with.
    ///
    /// Cash is collected on the spot, so cash loads are always paid.
    /// Everything else is pending until it is explicitly marked as paid.
    pub fn initial_status(&self) -> PaymentStatus {
        match self {
            PaymentMethod::Cash => PaymentStatus::Paid,
            PaymentMethod::Credit | PaymentMethod::Po => PaymentStatus::Pending,
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CASH" => Ok(PaymentMethod::Cash),
            "CREDIT" => Ok(PaymentMethod::Credit),
            "PO" => Ok(PaymentMethod::Po),
            other => Err(format!("unknown payment method \"{other}\"")),
        }
    }
}

/// Whether a load has been paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    /// The load has been paid for.
    Paid,
    /// The load is waiting for payment.
    Pending,
}

impl PaymentStatus {
    /// Every payment status, in the order they are offered in forms.
    pub const ALL: [PaymentStatus; 2] = [PaymentStatus::Paid, PaymentStatus::Pending];

    /// The canonical upper case name used in the database and in URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Pending => "PENDING",
        }
    }

    /// Whether a transaction with this status may be changed to `next`.
    ///
    /// Payments only move forward: pending loads can be paid, and paying a
    /// paid load again changes nothing. A paid load never goes back to pending.
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        !matches!((self, next), (PaymentStatus::Paid, PaymentStatus::Pending))
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PAID" => Ok(PaymentStatus::Paid),
            "PENDING" => Ok(PaymentStatus::Pending),
            other => Err(format!("unknown payment status \"{other}\"")),
        }
    }
}

/// A load of fill delivered by a trucker.
///
/// To create a new `Transaction`, use [Transaction::build] and [create_transaction].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The business date of the load.
    pub date: Date,
    /// The local time of day of the load, e.g. "14:30".
    pub time: String,
    /// The number printed on the delivery receipt.
    pub receipt_number: String,
    /// The display name of the trucker who hauled the load.
    pub trucker_name: String,
    /// The plate number of the truck.
    pub plate_number: String,
    /// The load size tier, e.g. "10 cubic meter".
    pub unit_volume: String,
    /// The price of the load, derived from the unit volume.
    pub price: f64,
    /// Where the load was delivered.
    pub destination: String,
    /// How the load is paid for.
    pub payment_method: PaymentMethod,
    /// Whether the load has been paid for.
    pub payment_status: PaymentStatus,
    /// When the record was created.
    pub created_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        date: Date,
        trucker_name: &str,
        unit_volume: &str,
        payment_method: PaymentMethod,
    ) -> TransactionBuilder {
        TransactionBuilder {
            date,
            time: String::new(),
            receipt_number: String::new(),
            trucker_name: trucker_name.to_owned(),
            plate_number: String::new(),
            unit_volume: unit_volume.to_owned(),
            destination: String::new(),
            payment_method,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The price and payment status are not set here. [create_transaction]
/// derives them from the unit volume and payment method so that every form
/// follows the same rules.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The business date of the load.
    pub date: Date,
    /// The local time of day of the load.
    pub time: String,
    /// The number printed on the delivery receipt.
    pub receipt_number: String,
    /// The display name of the trucker who hauled the load.
    pub trucker_name: String,
    /// The plate number of the truck.
    pub plate_number: String,
    /// The load size tier, which must be in the price list.
    pub unit_volume: String,
    /// Where the load was delivered.
    pub destination: String,
    /// How the load is paid for.
    pub payment_method: PaymentMethod,
}

impl TransactionBuilder {
    /// Set the time of day of the load.
    pub fn time(mut self, time: &str) -> Self {
        self.time = time.to_owned();
        self
    }

    /// Set the receipt number.
    pub fn receipt_number(mut self, receipt_number: &str) -> Self {
        self.receipt_number = receipt_number.to_owned();
        self
    }

    /// Set the plate number of the truck.
    pub fn plate_number(mut self, plate_number: &str) -> Self {
        self.plate_number = plate_number.to_owned();
        self
    }

    /// Set the delivery destination.
    pub fn destination(mut self, destination: &str) -> Self {
        self.destination = destination.to_owned();
        self
    }
}

/// The fixed predicate that decides which transactions a page works with.
///
/// This is applied in SQL before any of the user's filters.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionScope {
    /// Every transaction.
    All,
    /// Only transactions paid with the given method.
    PaymentMethod(PaymentMethod),
    /// Only the loads of one trucker.
    Trucker(String),
}

/// The order to list transactions in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransactionOrder {
    /// Most recently created first.
    NewestFirst,
    /// Oldest created first.
    OldestFirst,
    /// Latest business date first.
    DateDescending,
    /// Earliest business date first.
    DateAscending,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str = "id, date, time, receipt_number, trucker_name, plate_number, \
    unit_volume, price, destination, payment_method, payment_status, created_at";

/// Create a new transaction in the database from a builder.
///
/// The price is looked up from `price_list` and the payment status is derived
/// from the payment method, see [PaymentMethod::initial_status].
///
/// # Errors
/// This function will return a:
/// - [Error::MissingField] if the trucker name or receipt number is blank,
/// - [Error::UnknownUnitVolume] if the unit volume has no price,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    price_list: &PriceList,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if builder.trucker_name.trim().is_empty() {
        return Err(Error::MissingField("Trucker name"));
    }

    if builder.receipt_number.trim().is_empty() {
        return Err(Error::MissingField("Receipt number"));
    }

    let price = price_list
        .price_of(&builder.unit_volume)
        .ok_or_else(|| Error::UnknownUnitVolume(builder.unit_volume.clone()))?;
    let payment_status = builder.payment_method.initial_status();

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (date, time, receipt_number, trucker_name, plate_number, \
                unit_volume, price, destination, payment_method, payment_status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                builder.date,
                builder.time.trim(),
                builder.receipt_number.trim(),
                builder.trucker_name.trim(),
                builder.plate_number.trim(),
                builder.unit_volume,
                price,
                builder.destination.trim(),
                builder.payment_method.as_str(),
                payment_status.as_str(),
                OffsetDateTime::now_utc(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// List the transactions in `scope`, sorted by `order`.
///
/// Ties are broken by ID so the order is stable across requests.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn list_transactions(
    scope: &TransactionScope,
    order: TransactionOrder,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let order_clause = match order {
        TransactionOrder::NewestFirst => "ORDER BY created_at DESC, id DESC",
        TransactionOrder::OldestFirst => "ORDER BY created_at ASC, id ASC",
        TransactionOrder::DateDescending => "ORDER BY date DESC, id DESC",
        TransactionOrder::DateAscending => "ORDER BY date ASC, id ASC",
    };

    let (where_clause, parameter) = match scope {
        TransactionScope::All => ("", None),
        TransactionScope::PaymentMethod(method) => {
            ("WHERE payment_method = ?1", Some(method.as_str().to_owned()))
        }
        TransactionScope::Trucker(name) => ("WHERE trucker_name = ?1", Some(name.clone())),
    };

    let query =
        format!("SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" {where_clause} {order_clause}");
    let mut statement = connection.prepare(&query)?;

    let rows = match parameter {
        Some(parameter) => statement
            .query_map([parameter], map_transaction_row)?
            .collect::<Result<Vec<_>, _>>()?,
        None => statement
            .query_map([], map_transaction_row)?
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(rows)
}

/// Change the payment status of the transaction `id` to `status`.
///
/// The check and the update happen in a single statement, so a concurrent
/// request cannot slip a paid transaction back to pending.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - [Error::InvalidStatusTransition] if the change would undo a payment,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction_status(
    id: TransactionId,
    status: PaymentStatus,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let allowed_from: Vec<&str> = PaymentStatus::ALL
        .iter()
        .filter(|from| from.can_transition_to(status))
        .map(PaymentStatus::as_str)
        .collect();
    let placeholders = (0..allowed_from.len())
        .map(|i| format!("?{}", i + 3))
        .collect::<Vec<_>>()
        .join(", ");

    let mut parameters = vec![Value::Text(status.as_str().to_owned()), Value::Integer(id)];
    parameters.extend(
        allowed_from
            .iter()
            .map(|from| Value::Text((*from).to_owned())),
    );

    let updated = connection
        .prepare(&format!(
            "UPDATE \"transaction\" SET payment_status = ?1
             WHERE id = ?2 AND payment_status IN ({placeholders})
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(params_from_iter(parameters.iter()), map_transaction_row);

    match updated {
        Ok(transaction) => Ok(transaction),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            let current = get_transaction(id, connection)?;

            Err(Error::InvalidStatusTransition {
                from: current.payment_status,
                to: status,
            })
        }
        Err(error) => Err(error.into()),
    }
}

/// Mark the transaction `id` as paid.
///
/// Marking an already paid transaction is a no-op that returns the unchanged transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn mark_transaction_paid(
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    update_transaction_status(id, PaymentStatus::Paid, connection)
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                time TEXT NOT NULL,
                receipt_number TEXT NOT NULL,
                trucker_name TEXT NOT NULL,
                plate_number TEXT NOT NULL,
                unit_volume TEXT NOT NULL,
                price REAL NOT NULL,
                destination TEXT NOT NULL,
                payment_method TEXT NOT NULL CHECK (payment_method IN ('CASH', 'CREDIT', 'PO')),
                payment_status TEXT NOT NULL CHECK (payment_status IN ('PAID', 'PENDING')),
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    // Indexes for the scoped page queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_method ON \"transaction\"(payment_method);",
        (),
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_trucker ON \"transaction\"(trucker_name);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a transaction.
///
/// The row must contain the columns in the order of `TRANSACTION_COLUMNS`.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let payment_method: String = row.get(9)?;
    let payment_status: String = row.get(10)?;

    Ok(Transaction {
        id: row.get(0)?,
        date: row.get(1)?,
        time: row.get(2)?,
        receipt_number: row.get(3)?,
        trucker_name: row.get(4)?,
        plate_number: row.get(5)?,
        unit_volume: row.get(6)?,
        price: row.get(7)?,
        destination: row.get(8)?,
        payment_method: payment_method
            .parse()
            .map_err(|error: String| conversion_error(9, error))?,
        payment_status: payment_status
            .parse()
            .map_err(|error: String| conversion_error(10, error))?,
        created_at: row.get(11)?,
    })
}

fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, message.into())
}

// ============================================================================
// TESTS
// ============================================================================
