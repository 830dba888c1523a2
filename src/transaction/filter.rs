//! Narrows a list of transactions down to the ones matching the user's criteria.
//!
//! Pages load every transaction in their scope and pass the whole list to
//! [TransactionFilter::filter] on every request, so the criteria are always
//! applied to the unfiltered set.

use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::transaction::{PaymentMethod, PaymentStatus, Transaction};

/// The value used by filter dropdowns to mean "no constraint".
pub const ALL: &str = "all";

/// The filter criteria as they arrive in the query string.
///
/// Every field is optional. Empty strings and [ALL] mean no constraint.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterQuery {
    /// The inclusive start date, "YYYY-MM-DD".
    #[serde(rename = "startDate", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// The inclusive end date, "YYYY-MM-DD".
    #[serde(rename = "endDate", default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// The trucker's display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trucker: Option<String>,
    /// The unit volume tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    /// "PAID" or "PENDING".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// "CASH", "CREDIT" or "PO".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl FilterQuery {
    /// Encode the criteria as a query string, e.g. "startDate=2025-10-01&trucker=Juan".
    ///
    /// Unconstrained fields are left out.
    pub fn to_query_string(&self) -> String {
        let active = FilterQuery {
            start_date: active_value(&self.start_date).map(str::to_owned),
            end_date: active_value(&self.end_date).map(str::to_owned),
            trucker: active_value(&self.trucker).map(str::to_owned),
            volume: active_value(&self.volume).map(str::to_owned),
            status: active_value(&self.status).map(str::to_owned),
            method: active_value(&self.method).map(str::to_owned),
        };

        serde_urlencoded::to_string(&active).unwrap_or_else(|error| {
            tracing::error!("Could not encode filter query {self:?}: {error}");
            String::new()
        })
    }

    /// The value of a dropdown field for rendering, [ALL] when unconstrained.
    pub fn selected(field: &Option<String>) -> &str {
        active_value(field).unwrap_or(ALL)
    }
}

/// Returns the trimmed value of a query field if it constrains anything.
fn active_value(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != ALL)
}

/// Criteria a transaction must satisfy to be shown.
///
/// A `None` field places no constraint on the transactions.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionFilter {
    /// Keep transactions dated on or after this date.
    pub date_from: Option<Date>,
    /// Keep transactions dated on or before this date.
    pub date_to: Option<Date>,
    /// Keep the loads of this trucker.
    pub trucker: Option<String>,
    /// Keep loads of this size.
    pub unit_volume: Option<String>,
    /// Keep transactions with this payment status.
    pub payment_status: Option<PaymentStatus>,
    /// Keep transactions paid with this method.
    pub payment_method: Option<PaymentMethod>,
}

impl TransactionFilter {
    /// Whether `transaction` satisfies every active criterion.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.date_from.is_none_or(|from| transaction.date >= from)
            && self.date_to.is_none_or(|to| transaction.date <= to)
            && self
                .trucker
                .as_ref()
                .is_none_or(|trucker| transaction.trucker_name == *trucker)
            && self
                .unit_volume
                .as_ref()
                .is_none_or(|unit_volume| transaction.unit_volume == *unit_volume)
            && self
                .payment_status
                .is_none_or(|status| transaction.payment_status == status)
            && self
                .payment_method
                .is_none_or(|method| transaction.payment_method == method)
    }

    /// The records that satisfy every active criterion, in their original order.
    pub fn filter(&self, records: &[Transaction]) -> Vec<Transaction> {
        records
            .iter()
            .filter(|transaction| self.matches(transaction))
            .cloned()
            .collect()
    }
}

impl From<&FilterQuery> for TransactionFilter {
    /// Parse the query string criteria.
    ///
    /// Values that cannot be parsed are logged and treated as no constraint.
    fn from(query: &FilterQuery) -> Self {
        Self {
            date_from: active_value(&query.start_date)
                .and_then(|value| parse_date(value, "startDate")),
            date_to: active_value(&query.end_date).and_then(|value| parse_date(value, "endDate")),
            trucker: active_value(&query.trucker).map(str::to_owned),
            unit_volume: active_value(&query.volume).map(str::to_owned),
            payment_status: active_value(&query.status).and_then(|value| {
                value
                    .parse::<PaymentStatus>()
                    .inspect_err(|error| tracing::warn!("Ignoring status filter: {error}"))
                    .ok()
            }),
            payment_method: active_value(&query.method).and_then(|value| {
                value
                    .parse::<PaymentMethod>()
                    .inspect_err(|error| tracing::warn!("Ignoring method filter: {error}"))
                    .ok()
            }),
        }
    }
}

fn parse_date(value: &str, field: &str) -> Option<Date> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .inspect_err(|error| {
            tracing::warn!("Ignoring {field} filter, could not parse date \"{value}\": {error}")
        })
        .ok()
}

#[cfg(test)]
mod filter_query_tests {
    use time::macros::date;

    use crate::transaction::{PaymentMethod, PaymentStatus};

    use super::{FilterQuery, TransactionFilter};

    #[test]
    fn empty_and_all_mean_no_constraint() {
        let query = FilterQuery {
            start_date: Some(String::new()),
            end_date: None,
            trucker: Some("all".to_owned()),
            volume: Some("all".to_owned()),
            status: Some(" ".to_owned()),
            method: Some("all".to_owned()),
        };

        assert_eq!(TransactionFilter::from(&query), TransactionFilter::default());
    }

    #[test]
    fn parses_every_field() {
        let query = FilterQuery {
            start_date: Some("2025-10-01".to_owned()),
            end_date: Some("2025-10-31".to_owned()),
            trucker: Some("Juan".to_owned()),
            volume: Some("10 cubic meter".to_owned()),
            status: Some("PENDING".to_owned()),
            method: Some("PO".to_owned()),
        };

        assert_eq!(
            TransactionFilter::from(&query),
            TransactionFilter {
                date_from: Some(date!(2025 - 10 - 01)),
                date_to: Some(date!(2025 - 10 - 31)),
                trucker: Some("Juan".to_owned()),
                unit_volume: Some("10 cubic meter".to_owned()),
                payment_status: Some(PaymentStatus::Pending),
                payment_method: Some(PaymentMethod::Po),
            }
        );
    }

    #[test]
    fn invalid_values_are_ignored() {
        let query = FilterQuery {
            start_date: Some("01/10/2025".to_owned()),
            status: Some("LATE".to_owned()),
            method: Some("GCASH".to_owned()),
            ..Default::default()
        };

        assert_eq!(TransactionFilter::from(&query), TransactionFilter::default());
    }

    #[test]
    fn only_lower_case_all_means_no_constraint() {
        let query = FilterQuery {
            trucker: Some("All".to_owned()),
            volume: Some("ALL".to_owned()),
            ..Default::default()
        };

        let filter = TransactionFilter::from(&query);

        assert_eq!(filter.trucker.as_deref(), Some("All"));
        assert_eq!(filter.unit_volume.as_deref(), Some("ALL"));
    }

    #[test]
    fn deserializes_camel_case_dates() {
        let query: FilterQuery =
            serde_urlencoded::from_str("startDate=2025-10-01&endDate=2025-10-02&trucker=Juan")
                .unwrap();

        assert_eq!(query.start_date.as_deref(), Some("2025-10-01"));
        assert_eq!(query.end_date.as_deref(), Some("2025-10-02"));
        assert_eq!(query.trucker.as_deref(), Some("Juan"));
    }

    #[test]
    fn query_string_skips_unconstrained_fields() {
        let query = FilterQuery {
            start_date: Some("2025-10-01".to_owned()),
            trucker: Some("Juan Dela Cruz".to_owned()),
            volume: Some("all".to_owned()),
            ..Default::default()
        };

        assert_eq!(
            query.to_query_string(),
            "startDate=2025-10-01&trucker=Juan+Dela+Cruz"
        );
    }
}
