//! The staff records page: every load, with totals, the sales chart and the
//! form for recording loads for any trucker.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    auth::CurrentUser,
    dashboard::{
        charts::{SALES_CHART_ID, chart_view, echarts_script, sales_chart},
        page::{DashboardState, dashboard_layout, section_heading},
    },
    endpoints,
    html::BUTTON_SECONDARY_STYLE,
    transaction::{
        FilterOptions, FilterQuery, PAGE_CONTENT_ID, PaymentMethod, PaymentTotals, TableOptions,
        TransactionFilter, TransactionFormProps, TransactionOrder, TransactionScope, TruckerField,
        daily_sales, distinct_truckers, distinct_volumes, filter_form, totals_cards,
        transaction_form, transactions_table,
    },
};

/// Links to the print views carrying the current filter criteria.
fn print_links(query: &FilterQuery) -> Markup {
    let query_string = query.to_query_string();
    let with_query = |endpoint: &str| {
        if query_string.is_empty() {
            endpoint.to_owned()
        } else {
            format!("{endpoint}?{query_string}")
        }
    };

    html! {
        div class="flex flex-wrap gap-2 self-end no-print"
        {
            a
                id="print-filtered-link"
                href=(with_query(endpoints::PRINT_VIEW))
                target="_blank"
                class=(BUTTON_SECONDARY_STYLE)
            {
                "Print Filtered Results"
            }

            a
                id="print-dashboard-link"
                href=(with_query(endpoints::PRINT_DASHBOARD_VIEW))
                target="_blank"
                class=(BUTTON_SECONDARY_STYLE)
            {
                "Print Dashboard"
            }
        }
    }
}

/// Display every load, filtered by the query string criteria.
pub async fn get_records_page(
    State(state): State<DashboardState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let records =
        state.load_transactions(&TransactionScope::All, TransactionOrder::NewestFirst)?;
    let profiles = state.load_profiles()?;
    let today = state.today()?;

    let filtered = TransactionFilter::from(&query).filter(&records);
    let totals = PaymentTotals::from_records(&filtered);
    let sales = daily_sales(&filtered, today);
    let truckers = distinct_truckers(&records);
    let volumes = distinct_volumes(&records);

    let content = html! {
        (section_heading("Add Record"))
        (transaction_form(&TransactionFormProps {
            endpoint: endpoints::TRANSACTIONS_API,
            today,
            trucker: TruckerField::Choice(&profiles),
            payment_methods: &PaymentMethod::ALL,
            price_list: &state.price_list,
        }))

        (section_heading("Records"))
        (filter_form(
            endpoints::RECORDS_VIEW,
            &query,
            FilterOptions {
                truckers: Some(&truckers),
                volumes: &volumes,
                show_status: true,
                show_method: true,
            },
        ))

        div id=(PAGE_CONTENT_ID) class="flex flex-col gap-4 w-full"
        {
            (totals_cards(&totals))
            (chart_view(SALES_CHART_ID, &sales_chart(&sales)))
            (print_links(&query))
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
        "Records",
        endpoints::RECORDS_VIEW,
        &user,
        &[echarts_script()],
        &content,
    )
    .into_response())
}
