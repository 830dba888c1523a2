//! The staff page for purchase orders, oldest first so the longest
//! outstanding loads are at the top.

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
        TransactionFilter, TransactionOrder, TransactionScope, distinct_truckers,
        distinct_volumes, filter_form, totals_cards, transactions_table,
    },
};

/// Display the purchase orders, filtered by the query string criteria.
pub async fn get_purchase_orders_page(
    State(state): State<DashboardState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    // Every record on this page is a PO.
    let query = FilterQuery {
        method: None,
        ..query
    };
    let records = state.load_transactions(
        &TransactionScope::PaymentMethod(PaymentMethod::Po),
        TransactionOrder::OldestFirst,
    )?;

    let filtered = TransactionFilter::from(&query).filter(&records);
    let totals = PaymentTotals::from_records(&filtered);
    let truckers = distinct_truckers(&records);
    let volumes = distinct_volumes(&records);

    let content = html! {
        (filter_form(
            endpoints::PURCHASE_ORDERS_VIEW,
            &query,
            FilterOptions {
                truckers: Some(&truckers),
                volumes: &volumes,
                show_status: true,
                show_method: false,
            },
        ))

        div id=(PAGE_CONTENT_ID) class="flex flex-col gap-4 w-full"
        {
            (totals_cards(&totals))
            (transactions_table(
                &filtered,
                TableOptions {
                    can_mark_paid: true,
                    show_payment_columns: true,
                },
            ))
        }
    };

    Ok(dashboard_layout(
        "Purchase Orders",
        endpoints::PURCHASE_ORDERS_VIEW,
        &user,
        &[],
        &content,
    )
    .into_response())
}
