use maud::{Markup, html};
use time::Date;

use crate::{
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, format_currency,
        loading_spinner,
    },
    profile::Profile,
    transaction::{PaymentMethod, PaymentStatus, PriceList},
};

/// How the trucker of a new record is chosen.
pub enum TruckerField<'a> {
    /// Staff pick any registered trucker.
    Choice(&'a [Profile]),
    /// Members always record loads under their own name.
    Fixed(&'a str),
}

pub struct TransactionFormProps<'a> {
    /// The endpoint the form posts to.
    pub endpoint: &'a str,
    /// The default date, today in the quarry's timezone.
    pub today: Date,
    pub trucker: TruckerField<'a>,
    /// The payment methods offered, in display order.
    pub payment_methods: &'a [PaymentMethod],
    pub price_list: &'a PriceList,
}

fn text_field(name: &str, label: &str, placeholder: &str) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                name=(name)
                id=(name)
                type="text"
                placeholder=(placeholder)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn trucker_field(trucker: &TruckerField<'_>) -> Markup {
    html! {
        div
        {
            label for="trucker_name" class=(FORM_LABEL_STYLE) { "Trucker" }

            @match trucker {
                TruckerField::Choice(profiles) => {
                    select
                        name="trucker_name"
                        id="trucker_name"
                        required
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" disabled selected { "Select a trucker" }

                        @for profile in profiles.iter() {
                            option value=(profile.trucker_name) { (profile.trucker_name) }
                        }
                    }
                }
                TruckerField::Fixed(name) => {
                    input
                        name="trucker_name"
                        id="trucker_name"
                        type="text"
                        value=(name)
                        readonly
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }
        }
    }
}

fn status_hint(payment_methods: &[PaymentMethod]) -> Markup {
    html! {
        ul id="status-hint" class="text-xs text-gray-500 dark:text-gray-400 space-y-1"
        {
            @for method in payment_methods {
                li
                {
                    (method) " records are saved as "
                    @match method.initial_status() {
                        PaymentStatus::Paid => "PAID",
                        PaymentStatus::Pending => "PENDING until marked as paid",
                    }
                    "."
                }
            }
        }
    }
}

/// Render the form for recording a load.
///
/// The payment status is not an input: it always follows from the payment method.
pub fn transaction_form(props: &TransactionFormProps<'_>) -> Markup {
    html! {
        form
            id="transaction-form"
            hx-post=(props.endpoint)
            hx-target-error="#alert-container"
            hx-disabled-elt="find button[type=submit]"
            class="grid grid-cols-1 md:grid-cols-2 gap-4 w-full p-4 rounded bg-white dark:bg-gray-800 no-print"
        {
            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    value=(props.today)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="time" class=(FORM_LABEL_STYLE) { "Time" }

                input
                    name="time"
                    id="time"
                    type="time"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (text_field("receipt_number", "Receipt No.", "R-0001"))
            (trucker_field(&props.trucker))
            (text_field("plate_number", "Plate No.", "ABC 1234"))

            div
            {
                label for="unit_volume" class=(FORM_LABEL_STYLE) { "Unit Volume" }

                select
                    name="unit_volume"
                    id="unit_volume"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for (unit_volume, price) in props.price_list.tiers() {
                        option value=(unit_volume)
                        {
                            (unit_volume) " (" (format_currency(*price)) ")"
                        }
                    }
                }
            }

            (text_field("destination", "Destination", "San Fernando"))

            div
            {
                label for="payment_method" class=(FORM_LABEL_STYLE) { "Payment Method" }

                select
                    name="payment_method"
                    id="payment_method"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for method in props.payment_methods {
                        option value=(method) { (method) }
                    }
                }
            }

            div class="md:col-span-2" { (status_hint(props.payment_methods)) }

            div class="md:col-span-2"
            {
                button type="submit" id="indicator" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="inline htmx-indicator" { (loading_spinner()) }
                    "Add Record"
                }
            }
        }
    }
}

#[cfg(test)]
mod transaction_form_tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        auth::UserID,
        endpoints,
        profile::Profile,
        test_utils::{
            assert_form_input, assert_form_select, assert_form_submit_button, assert_hx_endpoint,
            must_get_form,
        },
        transaction::{PaymentMethod, PriceList},
    };

    use super::{TransactionFormProps, TruckerField, transaction_form};

    fn render(trucker: TruckerField<'_>, payment_methods: &[PaymentMethod]) -> Html {
        let price_list = PriceList::default();
        let markup = transaction_form(&TransactionFormProps {
            endpoint: endpoints::TRANSACTIONS_API,
            today: date!(2024 - 03 - 15),
            trucker,
            payment_methods,
            price_list: &price_list,
        });

        Html::parse_fragment(&markup.into_string())
    }

    #[test]
    fn staff_form_has_all_fields() {
        let profiles = [
            Profile {
                id: UserID::new(1),
                trucker_name: "Juan".to_owned(),
            },
            Profile {
                id: UserID::new(2),
                trucker_name: "Pedro".to_owned(),
            },
        ];
        let html = render(TruckerField::Choice(&profiles), &PaymentMethod::ALL);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert_form_input(&form, "date", "date");
        assert_form_input(&form, "time", "time");
        assert_form_input(&form, "receipt_number", "text");
        assert_form_input(&form, "plate_number", "text");
        assert_form_input(&form, "destination", "text");
        assert_form_select(&form, "trucker_name", &["", "Juan", "Pedro"]);
        assert_form_select(&form, "unit_volume", &["10 cubic meter", "15 cubic meter"]);
        assert_form_select(&form, "payment_method", &["CASH", "CREDIT", "PO"]);
        assert_form_submit_button(&form);
        assert_eq!(
            form.select(&Selector::parse("[name=payment_status]").unwrap())
                .count(),
            0,
            "payment status must not be an input"
        );
    }

    #[test]
    fn defaults_to_today() {
        let html = render(TruckerField::Fixed("Juan"), &PaymentMethod::ALL);

        let date = html
            .select(&Selector::parse("input[name=date]").unwrap())
            .next()
            .unwrap();
        assert_eq!(date.value().attr("value"), Some("2024-03-15"));
    }

    #[test]
    fn member_form_fixes_trucker_name() {
        let html = render(
            TruckerField::Fixed("Juan"),
            &[PaymentMethod::Cash, PaymentMethod::Po],
        );

        let form = must_get_form(&html);
        assert_form_input(&form, "trucker_name", "text");
        let trucker = form
            .select(&Selector::parse("input[name=trucker_name]").unwrap())
            .next()
            .unwrap();
        assert_eq!(trucker.value().attr("value"), Some("Juan"));
        assert!(trucker.value().attr("readonly").is_some());
        assert_form_select(&form, "payment_method", &["CASH", "PO"]);
    }

    #[test]
    fn unit_volume_options_show_price() {
        let html = render(TruckerField::Fixed("Juan"), &PaymentMethod::ALL);

        let options: Vec<String> = html
            .select(&Selector::parse("select[name=unit_volume] option").unwrap())
            .map(|option| option.text().collect::<String>())
            .collect();
        assert_eq!(
            options,
            ["10 cubic meter (₱1,650.00)", "15 cubic meter (₱2,400.00)"]
        );
    }
}
