//! Defines the endpoints for recording a new load.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    auth::CurrentUser,
    endpoints,
    transaction::{PaymentMethod, PriceList, Transaction, TransactionBuilder, create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The unit prices used to derive the price of a load.
    pub price_list: PriceList,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            price_list: state.price_list.clone(),
        }
    }
}

/// The form data for recording a load.
///
/// There is no payment status field. Any status sent by the client is dropped
/// during deserialization and the status is derived from the payment method.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The business date of the load.
    pub date: Date,
    /// The local time of day, e.g. "14:30".
    #[serde(default)]
    pub time: Option<String>,
    pub receipt_number: Option<String>,
    /// Ignored for members, who always record loads under their own name.
    #[serde(default)]
    pub trucker_name: Option<String>,
    #[serde(default)]
    pub plate_number: Option<String>,
    pub unit_volume: String,
    #[serde(default)]
    pub destination: Option<String>,
    pub payment_method: PaymentMethod,
}

impl TransactionForm {
    fn into_builder(self, trucker_name: &str) -> TransactionBuilder {
        Transaction::build(
            self.date,
            trucker_name,
            &self.unit_volume,
            self.payment_method,
        )
        .time(self.time.as_deref().unwrap_or_default())
        .receipt_number(self.receipt_number.as_deref().unwrap_or_default())
        .plate_number(self.plate_number.as_deref().unwrap_or_default())
        .destination(self.destination.as_deref().unwrap_or_default())
    }
}

fn insert_and_redirect(
    state: &CreateTransactionState,
    builder: TransactionBuilder,
    redirect_to: &str,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_transaction(builder, &state.price_list, &connection) {
        Ok(transaction) => {
            tracing::info!(
                "Recorded transaction {} for {} as {}",
                transaction.id,
                transaction.trucker_name,
                transaction.payment_status
            );

            (HxRedirect(redirect_to.to_owned()), StatusCode::SEE_OTHER).into_response()
        }
        Err(error) => {
            tracing::error!("could not create transaction: {error}");
            error.into_alert_response()
        }
    }
}

/// A route handler for staff recording a load for any trucker, redirects to
/// the records view on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let trucker_name = form.trucker_name.clone().unwrap_or_default();
    let builder = form.into_builder(&trucker_name);

    insert_and_redirect(&state, builder, endpoints::RECORDS_VIEW)
}

/// A route handler for members recording their own load, redirects to the
/// member dashboard on success.
pub async fn create_member_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let builder = form.into_builder(&user.trucker_name);

    insert_and_redirect(&state, builder, endpoints::MEMBER_DASHBOARD_VIEW)
}
