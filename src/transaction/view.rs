//! HTML rendering shared by every page that lists transactions: the records
//! table, the filter form and the totals cards.

use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        BADGE_PAID_STYLE, BADGE_PENDING_STYLE, BUTTON_SMALL_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency,
    },
    transaction::{
        PaymentMethod, PaymentStatus, Transaction,
        filter::{ALL, FilterQuery},
        summary::PaymentTotals,
    },
};

/// The ID of the element that filter forms swap with the filtered page.
pub const PAGE_CONTENT_ID: &str = "page-content";

/// Which columns and actions a records table shows.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableOptions {
    /// Show the "Mark as Paid" button on pending rows.
    pub can_mark_paid: bool,
    /// Show the payment method and status columns.
    pub show_payment_columns: bool,
}

fn status_badge(status: PaymentStatus) -> Markup {
    let style = match status {
        PaymentStatus::Paid => BADGE_PAID_STYLE,
        PaymentStatus::Pending => BADGE_PENDING_STYLE,
    };

    html!( span class=(style) data-status=(status) { (status) } )
}

/// Render one row of the records table.
///
/// The mark as paid endpoint responds with this markup so htmx can replace
/// the row in place.
pub fn transaction_row(transaction: &Transaction, options: TableOptions) -> Markup {
    let mark_paid_url = format_endpoint(endpoints::MARK_TRANSACTION_PAID, transaction.id);

    html! {
        tr
            id={ "transaction-" (transaction.id) }
            class=(TABLE_ROW_STYLE)
            data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) { (transaction.time) }
            td class=(TABLE_CELL_STYLE) { (transaction.receipt_number) }
            td class=(TABLE_CELL_STYLE) { (transaction.trucker_name) }
            td class=(TABLE_CELL_STYLE) { (transaction.plate_number) }
            td class=(TABLE_CELL_STYLE) { (transaction.unit_volume) }
            td class={ (TABLE_CELL_STYLE) " text-right" } { (format_currency(transaction.price)) }
            td class=(TABLE_CELL_STYLE) { (transaction.destination) }

            @if options.show_payment_columns {
                td class=(TABLE_CELL_STYLE) { (transaction.payment_method) }
                td class=(TABLE_CELL_STYLE) { (status_badge(transaction.payment_status)) }
            }

            @if options.can_mark_paid {
                td class={ (TABLE_CELL_STYLE) " no-print" }
                {
                    @if transaction.payment_status == PaymentStatus::Pending {
                        button
                            type="button"
                            hx-post=(mark_paid_url)
                            hx-target="closest tr"
                            hx-swap="outerHTML"
                            hx-target-error="#alert-container"
                            hx-disabled-elt="this"
                            class=(BUTTON_SMALL_STYLE)
                        {
                            "Mark as Paid"
                        }
                    }
                }
            }
        }
    }
}

/// Render the records table, or a message if there are no records.
pub fn transactions_table(transactions: &[Transaction], options: TableOptions) -> Markup {
    if transactions.is_empty() {
        return html! {
            p id="no-records" class="py-6 text-center text-gray-500 dark:text-gray-400"
            {
                "No records match the selected filters."
            }
        };
    }

    html! {
        div class="w-full overflow-x-auto rounded shadow"
        {
            table id="transactions-table" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Time" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Receipt No." }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Trucker" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Plate No." }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Unit Volume" }
                        th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Price" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Destination" }

                        @if options.show_payment_columns {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Method" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                        }

                        @if options.can_mark_paid {
                            th scope="col" class={ (TABLE_CELL_STYLE) " no-print" }
                            {
                                span class="sr-only" { "Actions" }
                            }
                        }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        (transaction_row(transaction, options))
                    }
                }
            }
        }
    }
}

/// The choices offered by a filter form.
///
/// A `None` field hides that filter.
#[derive(Debug, Default)]
pub struct FilterOptions<'a> {
    /// Trucker names to choose from.
    pub truckers: Option<&'a [String]>,
    /// Unit volumes to choose from.
    pub volumes: &'a [String],
    /// Whether to offer the payment status filter.
    pub show_status: bool,
    /// Whether to offer the payment method filter.
    pub show_method: bool,
}

fn filter_select(
    name: &str,
    label: &str,
    selected: &str,
    choices: impl IntoIterator<Item = (String, String)>,
) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            select id=(name) name=(name) class=(FORM_TEXT_INPUT_STYLE)
            {
                option value=(ALL) selected[selected == ALL] { "All" }

                @for (value, text) in choices {
                    option value=(value) selected[selected == value] { (text) }
                }
            }
        }
    }
}

/// Render the filter form for a records page at `page_url`.
///
/// Each change fetches the page again with the new criteria and swaps in the
/// page content. A newer request aborts any request still in flight, so an
/// older response never replaces a newer one.
pub fn filter_form(page_url: &str, query: &FilterQuery, options: FilterOptions<'_>) -> Markup {
    let page_content = format!("#{PAGE_CONTENT_ID}");

    html! {
        form
            id="filter-form"
            method="get"
            action=(page_url)
            hx-get=(page_url)
            hx-trigger="change, submit"
            hx-target=(page_content)
            hx-select=(page_content)
            hx-swap="outerHTML"
            hx-push-url="true"
            hx-sync="this:replace"
            class="grid grid-cols-2 lg:grid-cols-6 gap-4 w-full p-4 rounded bg-white dark:bg-gray-800 no-print"
        {
            div
            {
                label for="startDate" class=(FORM_LABEL_STYLE) { "From" }
                input
                    type="date"
                    id="startDate"
                    name="startDate"
                    value=[query.start_date.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="endDate" class=(FORM_LABEL_STYLE) { "To" }
                input
                    type="date"
                    id="endDate"
                    name="endDate"
                    value=[query.end_date.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if let Some(truckers) = options.truckers {
                (filter_select(
                    "trucker",
                    "Trucker",
                    FilterQuery::selected(&query.trucker),
                    truckers.iter().map(|name| (name.clone(), name.clone())),
                ))
            }

            (filter_select(
                "volume",
                "Unit Volume",
                FilterQuery::selected(&query.volume),
                options.volumes.iter().map(|volume| (volume.clone(), volume.clone())),
            ))

            @if options.show_status {
                (filter_select(
                    "status",
                    "Status",
                    FilterQuery::selected(&query.status),
                    PaymentStatus::ALL
                        .iter()
                        .map(|status| (status.as_str().to_owned(), status.as_str().to_owned())),
                ))
            }

            @if options.show_method {
                (filter_select(
                    "method",
                    "Payment Method",
                    FilterQuery::selected(&query.method),
                    PaymentMethod::ALL
                        .iter()
                        .map(|method| (method.as_str().to_owned(), method.as_str().to_owned())),
                ))
            }

            noscript
            {
                button type="submit" class=(BUTTON_SMALL_STYLE) { "Apply" }
            }
        }
    }
}

/// A card showing a single peso amount.
pub fn amount_card(id: &str, title: &str, amount: f64) -> Markup {
    html! {
        div id=(id) class="p-4 rounded shadow bg-white dark:bg-gray-800"
        {
            h3 class="text-sm font-medium text-gray-500 dark:text-gray-400" { (title) }
            p class="text-2xl font-bold text-gray-900 dark:text-white" data-amount=(amount)
            {
                (format_currency(amount))
            }
        }
    }
}

/// The total sales (paid) and pending balance cards.
pub fn totals_cards(totals: &PaymentTotals) -> Markup {
    html! {
        div class="grid grid-cols-1 sm:grid-cols-2 gap-4 w-full"
        {
            (amount_card("total-paid", "Total Sales (Paid)", totals.paid))
            (amount_card("total-pending", "Pending Balance", totals.pending))
        }
    }
}

#[cfg(test)]
mod view_tests {
    use scraper::{Html, Selector};
    use time::{OffsetDateTime, macros::date};

    use crate::transaction::{
        PaymentMethod, PaymentStatus, Transaction,
        filter::FilterQuery,
        summary::PaymentTotals,
    };

    use super::{
        FilterOptions, TableOptions, filter_form, totals_cards, transaction_row,
        transactions_table,
    };

    fn transaction(id: i64, status: PaymentStatus) -> Transaction {
        Transaction {
            id,
            date: date!(2024 - 01 - 01),
            time: "08:30".to_owned(),
            receipt_number: format!("R-{id}"),
            trucker_name: "Juan".to_owned(),
            plate_number: "ABC 1234".to_owned(),
            unit_volume: "10 cubic meter".to_owned(),
            price: 1650.0,
            destination: "San Fernando".to_owned(),
            payment_method: PaymentMethod::Po,
            payment_status: status,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn render_row(transaction: &Transaction, options: TableOptions) -> Html {
        let markup = maud::html! {
            table { tbody { (transaction_row(transaction, options)) } }
        };

        Html::parse_fragment(&markup.into_string())
    }

    #[test]
    fn pending_row_has_mark_paid_button() {
        let html = render_row(
            &transaction(7, PaymentStatus::Pending),
            TableOptions {
                can_mark_paid: true,
                show_payment_columns: true,
            },
        );

        let button = html
            .select(&Selector::parse("button").unwrap())
            .next()
            .expect("want mark as paid button");
        assert_eq!(
            button.value().attr("hx-post"),
            Some("/api/transactions/7/paid")
        );
        assert_eq!(button.value().attr("hx-swap"), Some("outerHTML"));
    }

    #[test]
    fn paid_row_has_no_button() {
        let html = render_row(
            &transaction(7, PaymentStatus::Paid),
            TableOptions {
                can_mark_paid: true,
                show_payment_columns: true,
            },
        );

        assert_eq!(html.select(&Selector::parse("button").unwrap()).count(), 0);
    }

    #[test]
    fn empty_table_shows_message() {
        let html = Html::parse_fragment(
            &transactions_table(&[], TableOptions::default()).into_string(),
        );

        assert_eq!(html.select(&Selector::parse("#no-records").unwrap()).count(), 1);
    }

    #[test]
    fn filter_form_marks_selected_values() {
        let query = FilterQuery {
            trucker: Some("Pedro".to_owned()),
            status: Some("PENDING".to_owned()),
            ..Default::default()
        };
        let truckers = ["Juan".to_owned(), "Pedro".to_owned()];
        let volumes = ["10 cubic meter".to_owned()];

        let markup = filter_form(
            "/dashboard/records",
            &query,
            FilterOptions {
                truckers: Some(&truckers),
                volumes: &volumes,
                show_status: true,
                show_method: false,
            },
        );
        let html = Html::parse_fragment(&markup.into_string());

        let selected = |name: &str| {
            let selector =
                Selector::parse(&format!("select[name={name}] option[selected]")).unwrap();
            html.select(&selector)
                .next()
                .and_then(|option| option.value().attr("value"))
                .map(str::to_owned)
        };
        assert_eq!(selected("trucker"), Some("Pedro".to_owned()));
        assert_eq!(selected("status"), Some("PENDING".to_owned()));
        assert_eq!(selected("volume"), Some("all".to_owned()));
        assert_eq!(
            html.select(&Selector::parse("select[name=method]").unwrap()).count(),
            0
        );

        let form = html.select(&Selector::parse("form").unwrap()).next().unwrap();
        assert_eq!(form.value().attr("hx-sync"), Some("this:replace"));
        assert_eq!(form.value().attr("hx-push-url"), Some("true"));
    }

    #[test]
    fn totals_cards_show_pesos() {
        let html = Html::parse_fragment(
            &totals_cards(&PaymentTotals {
                paid: 1650.0,
                pending: 2400.0,
            })
            .into_string(),
        );

        let text = |selector: &str| {
            html.select(&Selector::parse(selector).unwrap())
                .next()
                .unwrap()
                .text()
                .collect::<String>()
                .trim()
                .to_owned()
        };
        assert_eq!(text("#total-paid p"), "₱1,650.00");
        assert_eq!(text("#total-pending p"), "₱2,400.00");
    }
}
