//! Printable views of the filtered records: the billing statement and the
//! sales summary.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    Error,
    dashboard::{DashboardState, SALES_CHART_ID, chart_view, echarts_script, sales_chart},
    html::{BUTTON_PRIMARY_STYLE, COMPANY_NAME, base, format_currency},
    transaction::{
        ALL, BillingSummary, FilterQuery, PaymentTotals, Transaction, TransactionFilter,
        TransactionOrder, TransactionScope, daily_sales,
    },
};

const COMPANY_ADDRESS: &str = "P-5, Rizal, Buenavista, Agusan del Norte";

const PRINT_TABLE_CELL_STYLE: &str = "border border-gray-300 p-2";

/// The print views only take the date, trucker, volume and status criteria.
fn print_query(query: FilterQuery) -> FilterQuery {
    FilterQuery {
        method: None,
        ..query
    }
}

fn active(field: &Option<String>) -> Option<&str> {
    Some(FilterQuery::selected(field)).filter(|value| *value != ALL)
}

fn print_button() -> Markup {
    html! {
        div class="flex justify-end mb-4 no-print"
        {
            button type="button" onclick="window.print()" class=(BUTTON_PRIMARY_STYLE)
            {
                "Print"
            }
        }
    }
}

fn records_table(records: &[Transaction]) -> Markup {
    html! {
        table id="billing-records" class="w-full border-collapse mb-6 text-sm"
        {
            thead
            {
                tr
                {
                    th class={ (PRINT_TABLE_CELL_STYLE) " text-left" } { "No." }
                    th class={ (PRINT_TABLE_CELL_STYLE) " text-left" } { "Date" }
                    th class={ (PRINT_TABLE_CELL_STYLE) " text-left" } { "DR #" }
                    th class={ (PRINT_TABLE_CELL_STYLE) " text-left" } { "Trucker" }
                    th class={ (PRINT_TABLE_CELL_STYLE) " text-left" } { "Plate #" }
                    th class={ (PRINT_TABLE_CELL_STYLE) " text-left" } { "Time" }
                    th class={ (PRINT_TABLE_CELL_STYLE) " text-left" } { "Qty/Unit" }
                }
            }

            tbody
            {
                @for (number, record) in records.iter().enumerate() {
                    tr
                    {
                        td class=(PRINT_TABLE_CELL_STYLE) { (number + 1) }
                        td class=(PRINT_TABLE_CELL_STYLE) { (record.date) }
                        td class=(PRINT_TABLE_CELL_STYLE) { (record.receipt_number) }
                        td class=(PRINT_TABLE_CELL_STYLE) { (record.trucker_name) }
                        td class=(PRINT_TABLE_CELL_STYLE) { (record.plate_number) }
                        td class=(PRINT_TABLE_CELL_STYLE) { (record.time) }
                        td class=(PRINT_TABLE_CELL_STYLE) { (record.unit_volume) }
                    }
                }
            }
        }
    }
}

fn computation(summary: &BillingSummary) -> Markup {
    html! {
        div id="truckload-totals" class="mb-6 border border-gray-300"
        {
            h3 class="font-bold p-2" { "Total Truckloads" }

            @for line in &summary.lines {
                div class="flex justify-between p-2 border-t"
                {
                    span { (line.unit_volume) }
                    span { (line.count) }
                }
            }
        }

        div id="computation" class="mb-6 border border-gray-300"
        {
            h3 class="font-bold p-2" { "Computation" }

            @for line in &summary.lines {
                div class="p-2 border-t"
                {
                    p { "for " (line.unit_volume) }
                    p class="computation-line"
                    {
                        @match line.unit_price {
                            Some(price) => {
                                (format_currency(price)) " x " (line.count) " = "
                                (format_currency(line.subtotal))
                            }
                            None => { "No price for this unit volume" }
                        }
                    }
                }
            }

            div class="p-2 border-t"
            {
                p { "Total = " (format_currency(summary.total)) }
            }
        }

        div class="text-right mb-12"
        {
            p id="total-bill" class="font-bold text-lg"
            {
                "TOTAL BILL: " (format_currency(summary.total))
            }
        }
    }
}

fn signature(label: &str, title: &str) -> Markup {
    html! {
        div class="w-64"
        {
            p class="font-bold" { (label) }
            div class="mt-10 border-b border-gray-900" {}
            p class="text-sm text-gray-600" { (title) }
        }
    }
}

/// Display the billing statement for the records matching the query string criteria.
///
/// The browser's print dialog opens once the page has loaded.
pub async fn get_print_page(
    State(state): State<DashboardState>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let query = print_query(query);
    let records =
        state.load_transactions(&TransactionScope::All, TransactionOrder::DateAscending)?;
    let today = state.today()?;

    let filtered = TransactionFilter::from(&query).filter(&records);
    let summary = BillingSummary::from_records(&filtered, &state.price_list);

    let content = html! {
        div class="min-h-screen bg-white text-gray-900 p-8 print:p-4 max-w-4xl mx-auto"
        {
            (print_button())

            div class="text-center mb-6"
            {
                h1 class="text-xl font-bold uppercase" { (COMPANY_NAME) }
                p class="text-sm" { (COMPANY_ADDRESS) }
                h2 class="mt-2 font-semibold" { "Billing Statement" }
            }

            div class="flex justify-between mb-6"
            {
                div
                {
                    p id="billing-period"
                    {
                        span class="font-bold" { "Billing Period: " }
                        (active(&query.start_date).unwrap_or("Beginning"))
                        " - "
                        (active(&query.end_date).unwrap_or("Present"))
                    }
                    p id="billing-to"
                    {
                        span class="font-bold" { "Billing To: " }
                        (active(&query.trucker).unwrap_or("All truckers"))
                    }
                }

                div
                {
                    p
                    {
                        span class="font-bold" { "Date: " }
                        (today)
                    }
                }
            }

            (records_table(&filtered))

            div class="mb-6 border border-gray-300"
            {
                h3 class="font-bold p-2" { "Price per Truckload" }

                @for (unit_volume, price) in state.price_list.tiers() {
                    div class="flex justify-between p-2 border-t"
                    {
                        span { (unit_volume) }
                        span { (format_currency(*price)) }
                    }
                }
            }

            (computation(&summary))

            div class="flex justify-between mt-16"
            {
                (signature("Prepared by:", "Operation Manager"))
                (signature("Approved by:", "Proprietor"))
            }

            @if !filtered.is_empty() {
                script { (PreEscaped("window.addEventListener('load', () => window.print());")) }
            }
        }
    };

    Ok(base("Billing Statement", &[], &content).into_response())
}

/// Display the sales chart and totals for the records matching the query string criteria.
pub async fn get_print_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let query = print_query(query);
    let records =
        state.load_transactions(&TransactionScope::All, TransactionOrder::NewestFirst)?;
    let today = state.today()?;

    let filtered = TransactionFilter::from(&query).filter(&records);
    let totals = PaymentTotals::from_records(&filtered);
    let sales = daily_sales(&filtered, today);

    let criteria = [
        ("From", active(&query.start_date)),
        ("To", active(&query.end_date)),
        ("Trucker", active(&query.trucker)),
        ("Volume", active(&query.volume)),
        ("Status", active(&query.status)),
    ];

    let content = html! {
        div class="container mx-auto p-8 bg-white text-gray-900"
        {
            (print_button())

            div class="text-center mb-8"
            {
                h1 class="text-2xl font-bold" { "Dashboard Summary" }
                p class="text-gray-600" { "Generated on: " (today) }
                div id="print-criteria" class="text-sm text-gray-500 mt-2 space-x-2"
                {
                    @for (label, value) in criteria {
                        @if let Some(value) = value {
                            span { (label) ": " (value) }
                        }
                    }
                }
            }

            div class="grid grid-cols-2 gap-6 mb-8"
            {
                div class="p-4 border rounded-lg"
                {
                    h2 class="text-lg font-semibold mb-2" { "Total Sales (Paid)" }
                    p id="total-paid" class="text-2xl text-green-600"
                    {
                        (format_currency(totals.paid))
                    }
                }

                div class="p-4 border rounded-lg"
                {
                    h2 class="text-lg font-semibold mb-2" { "Total Pending" }
                    p id="total-pending" class="text-2xl text-yellow-600"
                    {
                        (format_currency(totals.pending))
                    }
                }
            }

            div class="border rounded-lg p-4"
            {
                h2 class="text-lg font-semibold mb-4" { "Daily Sales (Last 7 Days)" }
                (chart_view(SALES_CHART_ID, &sales_chart(&sales)))
            }
        }
    };

    Ok(base("Dashboard Summary", &[echarts_script()], &content).into_response())
}

#[cfg(test)]
mod print_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use time::macros::date;

    use crate::{
        dashboard::DashboardState,
        test_utils::{
            assert_status_ok, assert_valid_html, get_test_connection, insert_transaction,
            parse_html_document, select_text,
        },
        transaction::{FilterQuery, PaymentMethod, PriceList},
    };

    use super::{get_print_dashboard_page, get_print_page};

    fn get_state() -> DashboardState {
        let connection = get_test_connection();
        for (date, volume, method) in [
            (date!(2024 - 01 - 03), "10 cubic meter", PaymentMethod::Cash),
            (date!(2024 - 01 - 01), "10 cubic meter", PaymentMethod::Po),
            (date!(2024 - 01 - 02), "10 cubic meter", PaymentMethod::Po),
            (date!(2024 - 01 - 02), "15 cubic meter", PaymentMethod::Cash),
            (date!(2024 - 01 - 04), "15 cubic meter", PaymentMethod::Credit),
        ] {
            insert_transaction(date, "Juan", volume, method, &connection);
        }
        insert_transaction(
            date!(2024 - 01 - 02),
            "Pedro",
            "15 cubic meter",
            PaymentMethod::Cash,
            &connection,
        );

        DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Asia/Manila".to_owned(),
            price_list: PriceList::default(),
        }
    }

    #[tokio::test]
    async fn billing_statement_totals_by_volume() {
        let query = FilterQuery {
            trucker: Some("Juan".to_owned()),
            ..Default::default()
        };

        let response = get_print_page(State(get_state()), Query(query)).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(select_text(&html, "#billing-records tbody tr").len(), 5);
        assert_eq!(select_text(&html, "#total-bill"), ["TOTAL BILL: ₱9,750.00"]);
        assert_eq!(
            select_text(&html, ".computation-line"),
            [
                "₱1,650.00 x 3 = ₱4,950.00",
                "₱2,400.00 x 2 = ₱4,800.00"
            ]
        );
        assert_eq!(select_text(&html, "#billing-to"), ["Billing To: Juan"]);
    }

    #[tokio::test]
    async fn billing_statement_lists_oldest_first() {
        let query = FilterQuery {
            trucker: Some("Juan".to_owned()),
            ..Default::default()
        };

        let response = get_print_page(State(get_state()), Query(query)).await.unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(
            select_text(&html, "#billing-records tbody td:nth-child(2)"),
            [
                "2024-01-01",
                "2024-01-02",
                "2024-01-02",
                "2024-01-03",
                "2024-01-04"
            ]
        );
    }

    #[tokio::test]
    async fn billing_statement_ignores_method() {
        let query = FilterQuery {
            method: Some("PO".to_owned()),
            status: Some("PAID".to_owned()),
            ..Default::default()
        };

        let response = get_print_page(State(get_state()), Query(query)).await.unwrap();

        let html = parse_html_document(response).await;
        // Every cash record, whichever trucker.
        assert_eq!(select_text(&html, "#billing-records tbody tr").len(), 3);
        assert_eq!(select_text(&html, "#billing-to"), ["Billing To: All truckers"]);
    }

    #[tokio::test]
    async fn print_dashboard_shows_totals_and_chart() {
        let query = FilterQuery {
            end_date: Some("2024-01-02".to_owned()),
            ..Default::default()
        };

        let response = get_print_dashboard_page(State(get_state()), Query(query))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(select_text(&html, "#total-paid"), ["₱4,800.00"]);
        assert_eq!(select_text(&html, "#total-pending"), ["₱3,300.00"]);
        assert_eq!(select_text(&html, "#sales-chart").len(), 1);
        assert_eq!(select_text(&html, "#print-criteria span"), ["To: 2024-01-02"]);
    }
}
