//! The trucker's own dashboard: their loads, totals and sales chart, and a
//! form for recording loads under their own name.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    Error,
    auth::CurrentUser,
    dashboard::{
        DashboardState, SALES_CHART_ID, chart_view, dashboard_layout, echarts_script,
        sales_chart, section_heading,
    },
    endpoints,
    transaction::{
        FilterOptions, FilterQuery, PAGE_CONTENT_ID, PaymentMethod, PaymentTotals, TableOptions,
        TransactionFilter, TransactionFormProps, TransactionOrder, TransactionScope, TruckerField,
        daily_sales, distinct_volumes, filter_form, totals_cards, transaction_form,
        transactions_table,
    },
};

/// The payment methods a trucker can record for themself. Credit is staff only.
const MEMBER_PAYMENT_METHODS: [PaymentMethod; 2] = [PaymentMethod::Cash, PaymentMethod::Po];

/// Display the signed-in user's loads, filtered by the query string criteria.
pub async fn get_member_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    // The scope already limits the records to this trucker.
    let query = FilterQuery {
        trucker: None,
        ..query
    };
    let records = state.load_transactions(
        &TransactionScope::Trucker(user.trucker_name.clone()),
        TransactionOrder::NewestFirst,
    )?;
    let today = state.today()?;

    let filtered = TransactionFilter::from(&query).filter(&records);
    let totals = PaymentTotals::from_records(&filtered);
    let sales = daily_sales(&filtered, today);
    let volumes = distinct_volumes(&records);

    let content = html! {
        (section_heading("Add Record"))
        (transaction_form(&TransactionFormProps {
            endpoint: endpoints::MEMBER_TRANSACTIONS_API,
            today,
            trucker: TruckerField::Fixed(&user.trucker_name),
            payment_methods: &MEMBER_PAYMENT_METHODS,
            price_list: &state.price_list,
        }))

        (section_heading("My Records"))
        (filter_form(
            endpoints::MEMBER_DASHBOARD_VIEW,
            &query,
            FilterOptions {
                truckers: None,
                volumes: &volumes,
                show_status: true,
                show_method: true,
            },
        ))

        div id=(PAGE_CONTENT_ID) class="flex flex-col gap-4 w-full"
        {
            (totals_cards(&totals))
            (chart_view(SALES_CHART_ID, &sales_chart(&sales)))
            (transactions_table(
                &filtered,
                TableOptions {
                    can_mark_paid: false,
                    show_payment_columns: true,
                },
            ))
        }
    };

    Ok(dashboard_layout(
        "My Records",
        endpoints::MEMBER_DASHBOARD_VIEW,
        &user,
        &[echarts_script()],
        &content,
    )
    .into_response())
}

#[cfg(test)]
mod member_dashboard_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Query, State},
    };
    use time::macros::date;

    use crate::{
        auth::{CurrentUser, Role},
        dashboard::DashboardState,
        endpoints,
        test_utils::{
            assert_form_select, assert_hx_endpoint, assert_status_ok, assert_valid_html,
            get_test_connection, insert_transaction, insert_user, must_get_form,
            parse_html_document, select_text,
        },
        transaction::{FilterQuery, PaymentMethod, PriceList},
    };

    use super::get_member_dashboard_page;

    fn get_state_and_member() -> (DashboardState, CurrentUser) {
        let connection = get_test_connection();
        let id = insert_user("juan@example.com", "Juan", Role::Member, &connection);
        insert_transaction(
            date!(2024 - 01 - 01),
            "Juan",
            "10 cubic meter",
            PaymentMethod::Cash,
            &connection,
        );
        insert_transaction(
            date!(2024 - 01 - 02),
            "Juan",
            "15 cubic meter",
            PaymentMethod::Po,
            &connection,
        );
        insert_transaction(
            date!(2024 - 01 - 02),
            "Pedro",
            "15 cubic meter",
            PaymentMethod::Po,
            &connection,
        );

        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Asia/Manila".to_owned(),
            price_list: PriceList::default(),
        };
        let member = CurrentUser {
            id,
            email: "juan@example.com".to_owned(),
            trucker_name: "Juan".to_owned(),
            role: Role::Member,
        };

        (state, member)
    }

    #[tokio::test]
    async fn shows_only_own_records() {
        let (state, member) = get_state_and_member();

        let response = get_member_dashboard_page(
            State(state),
            Extension(member),
            Query(FilterQuery::default()),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            select_text(&html, "#transactions-table tbody td:nth-child(4)"),
            ["Juan", "Juan"]
        );
        assert_eq!(select_text(&html, "#total-paid p"), ["₱1,650.00"]);
        assert_eq!(select_text(&html, "#total-pending p"), ["₱2,400.00"]);
        assert!(select_text(&html, "button[hx-post]").is_empty());
        assert!(select_text(&html, "select[name=trucker]").is_empty());
    }

    #[tokio::test]
    async fn trucker_query_cannot_widen_scope() {
        let (state, member) = get_state_and_member();
        let query = FilterQuery {
            trucker: Some("Pedro".to_owned()),
            ..Default::default()
        };

        let response = get_member_dashboard_page(State(state), Extension(member), Query(query))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(select_text(&html, "#transactions-table tbody tr").len(), 2);
    }

    #[tokio::test]
    async fn create_form_posts_to_member_endpoint() {
        let (state, member) = get_state_and_member();

        let response = get_member_dashboard_page(
            State(state),
            Extension(member),
            Query(FilterQuery::default()),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::MEMBER_TRANSACTIONS_API, "hx-post");
        assert_form_select(&form, "payment_method", &["CASH", "PO"]);
        assert_eq!(
            select_text(&html, "#nav-trucker-name"),
            ["Signed in as Juan"]
        );
    }
}
