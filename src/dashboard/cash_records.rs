//! The staff page for loads paid in cash.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    Error,
    auth::CurrentUser,
    dashboard::page::{DashboardState, dashboard_layout},
    endpoints,
    transaction::{
        FilterOptions, FilterQuery, PAGE_CONTENT_ID, PaymentMethod, PaymentTotals, TableOptions,
        TransactionFilter, TransactionOrder, TransactionScope, amount_card, distinct_truckers,
        distinct_volumes, filter_form, transactions_table,
    },
};

/// Display the cash records, newest date first, filtered by the query string criteria.
pub async fn get_cash_records_page(
    State(state): State<DashboardState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    // Cash loads are always paid, so only the date, trucker and volume filters apply.
    let query = FilterQuery {
        status: None,
        method: None,
        ..query
    };
    let records = state.load_transactions(
        &TransactionScope::PaymentMethod(PaymentMethod::Cash),
        TransactionOrder::DateDescending,
    )?;

    let filtered = TransactionFilter::from(&query).filter(&records);
    let total_cash = PaymentTotals::from_records(&filtered).paid;
    let truckers = distinct_truckers(&records);
    let volumes = distinct_volumes(&records);

    let content = html! {
        (filter_form(
            endpoints::CASH_RECORDS_VIEW,
            &query,
            FilterOptions {
                truckers: Some(&truckers),
                volumes: &volumes,
                show_status: false,
                show_method: false,
            },
        ))

        div id=(PAGE_CONTENT_ID) class="flex flex-col gap-4 w-full"
        {
            (amount_card("total-cash", "Total Cash", total_cash))
            (transactions_table(&filtered, TableOptions::default()))
        }
    };

    Ok(dashboard_layout(
        "Cash Records",
        endpoints::CASH_RECORDS_VIEW,
        &user,
        &[],
        &content,
    )
    .into_response())
}

#[cfg(test)]
mod cash_records_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Query, State},
    };
    use time::macros::date;

    use crate::{
        auth::{CurrentUser, Role, UserID},
        test_utils::{
            assert_status_ok, assert_valid_html, get_test_connection, insert_transaction,
            parse_html_document, select_text,
        },
        transaction::{FilterQuery, PaymentMethod, PriceList},
    };

    use super::{DashboardState, get_cash_records_page};

    fn staff() -> CurrentUser {
        CurrentUser {
            id: UserID::new(1),
            email: "staff@example.com".to_owned(),
            trucker_name: "Office".to_owned(),
            role: Role::Staff,
        }
    }

    fn get_state() -> DashboardState {
        let connection = get_test_connection();
        insert_transaction(
            date!(2024 - 01 - 01),
            "Juan",
            "10 cubic meter",
            PaymentMethod::Cash,
            &connection,
        );
        insert_transaction(
            date!(2024 - 01 - 03),
            "Pedro",
            "15 cubic meter",
            PaymentMethod::Cash,
            &connection,
        );
        insert_transaction(
            date!(2024 - 01 - 02),
            "Juan",
            "10 cubic meter",
            PaymentMethod::Po,
            &connection,
        );

        DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Asia/Manila".to_owned(),
            price_list: PriceList::default(),
        }
    }

    #[tokio::test]
    async fn lists_cash_records_newest_date_first() {
        let response = get_cash_records_page(
            State(get_state()),
            Extension(staff()),
            Query(FilterQuery::default()),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            select_text(&html, "#transactions-table tbody td:nth-child(1)"),
            ["2024-01-03", "2024-01-01"]
        );
        assert_eq!(select_text(&html, "#total-cash p"), ["₱4,050.00"]);
    }

    #[tokio::test]
    async fn filters_by_trucker() {
        let query = FilterQuery {
            trucker: Some("Juan".to_owned()),
            ..Default::default()
        };

        let response = get_cash_records_page(State(get_state()), Extension(staff()), Query(query))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(select_text(&html, "#total-cash p"), ["₱1,650.00"]);
        assert_eq!(select_text(&html, "select[name=status]").len(), 0);
    }

    #[tokio::test]
    async fn ignores_status_and_method_from_url() {
        let query: FilterQuery = serde_urlencoded::from_str("status=PENDING&method=PO").unwrap();

        let response = get_cash_records_page(State(get_state()), Extension(staff()), Query(query))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(
            select_text(&html, "#transactions-table tbody td:nth-child(4)"),
            ["Pedro", "Juan"]
        );
        assert_eq!(select_text(&html, "#total-cash p"), ["₱4,050.00"]);
        assert!(select_text(&html, "#no-records").is_empty());
    }
}
