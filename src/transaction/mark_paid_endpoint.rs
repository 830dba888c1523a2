use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRefresh;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    transaction::{
        mark_transaction_paid,
        view::{TableOptions, transaction_row},
    },
};

/// The state needed to mark a transaction as paid.
#[derive(Debug, Clone)]
pub struct MarkPaidState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for MarkPaidState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for marking a pending transaction as paid.
///
/// Responds with the updated table row and asks htmx to reload the page, so
/// the totals, the chart and the filtered rows are recomputed from the
/// current URL. Responds with an alert if the transaction could not be updated.
pub async fn mark_paid_endpoint(
    State(state): State<MarkPaidState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match mark_transaction_paid(transaction_id, &connection) {
        Ok(transaction) => {
            tracing::info!("Marked transaction {transaction_id} as paid");

            // The status code has to be 200 OK or htmx will not swap the row.
            (
                StatusCode::OK,
                HxRefresh(true),
                transaction_row(
                    &transaction,
                    TableOptions {
                        can_mark_paid: true,
                        show_payment_columns: true,
                    },
                ),
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not mark transaction {transaction_id} as paid: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod mark_paid_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use scraper::Html;
    use time::macros::date;

    use crate::{
        test_utils::{
            assert_status_ok, get_header, get_test_connection, insert_transaction, select_text,
        },
        transaction::{PaymentMethod, PaymentStatus, core::get_transaction},
    };

    use super::{MarkPaidState, mark_paid_endpoint};

    /// Parse a table row the way the browser sees it after the swap.
    async fn parse_row(response: axum::response::Response) -> Html {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let row = String::from_utf8_lossy(&body);

        Html::parse_fragment(&format!("<table><tbody>{row}</tbody></table>"))
    }

    #[tokio::test]
    async fn marks_pending_transaction_paid() {
        let connection = get_test_connection();
        let transaction = insert_transaction(
            date!(2024 - 01 - 01),
            "Juan",
            "10 cubic meter",
            PaymentMethod::Po,
            &connection,
        );
        let state = MarkPaidState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = mark_paid_endpoint(State(state.clone()), Path(transaction.id)).await;

        assert_status_ok(&response);
        assert_eq!(get_header(&response, "hx-refresh"), "true");
        let html = parse_row(response).await;
        assert_eq!(select_text(&html, "[data-status]"), ["PAID"]);
        assert!(select_text(&html, "button").is_empty());
        let updated =
            get_transaction(transaction.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(updated.payment_status, PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn marking_paid_twice_is_a_no_op() {
        let connection = get_test_connection();
        let transaction = insert_transaction(
            date!(2024 - 01 - 01),
            "Juan",
            "10 cubic meter",
            PaymentMethod::Cash,
            &connection,
        );
        let state = MarkPaidState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = mark_paid_endpoint(State(state), Path(transaction.id)).await;

        assert_status_ok(&response);
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let state = MarkPaidState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = mark_paid_endpoint(State(state), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
