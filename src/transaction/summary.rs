//! Totals, the sales series and the billing computation over a set of transactions.
//!
//! These functions are pure and expect the records to already be filtered.

use std::collections::BTreeMap;

use time::{Date, Duration};

use crate::transaction::{PaymentStatus, PriceList, Transaction};

/// The number of days covered by the sales chart.
pub const SALES_WINDOW_DAYS: usize = 7;

/// The amount of money paid and still owed.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PaymentTotals {
    /// The sum of the prices of paid transactions.
    pub paid: f64,
    /// The sum of the prices of pending transactions.
    pub pending: f64,
}

impl PaymentTotals {
    /// Sum the prices of `records` by payment status.
    pub fn from_records(records: &[Transaction]) -> Self {
        records
            .iter()
            .fold(Self::default(), |mut totals, record| {
                match record.payment_status {
                    PaymentStatus::Paid => totals.paid += record.price,
                    PaymentStatus::Pending => totals.pending += record.price,
                }

                totals
            })
    }
}

/// The paid sales for one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailySales {
    /// The business date.
    pub date: Date,
    /// The sum of the prices of paid transactions on `date`.
    pub total: f64,
}

/// The paid sales for the seven days ending on `today`, oldest first.
///
/// Days without paid transactions have a total of zero.
pub fn daily_sales(records: &[Transaction], today: Date) -> [DailySales; SALES_WINDOW_DAYS] {
    let mut sales = std::array::from_fn(|i| DailySales {
        date: today - Duration::days((SALES_WINDOW_DAYS - 1 - i) as i64),
        total: 0.0,
    });

    for record in records
        .iter()
        .filter(|record| record.payment_status == PaymentStatus::Paid)
    {
        if let Some(day) = sales.iter_mut().find(|day| day.date == record.date) {
            day.total += record.price;
        }
    }

    sales
}

/// The trucker names that appear in `records`, sorted and without duplicates.
pub fn distinct_truckers(records: &[Transaction]) -> Vec<String> {
    distinct(records.iter().map(|record| record.trucker_name.as_str()))
}

/// The unit volumes that appear in `records`, sorted and without duplicates.
pub fn distinct_volumes(records: &[Transaction]) -> Vec<String> {
    distinct(records.iter().map(|record| record.unit_volume.as_str()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut values: Vec<String> = values
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .collect();
    values.sort();
    values.dedup();
    values
}

/// One line of the billing computation, e.g. "3 x 10 cubic meter @ ₱1,650.00".
#[derive(Debug, Clone, PartialEq)]
pub struct BillingLine {
    /// The load size tier.
    pub unit_volume: String,
    /// The number of loads of this size.
    pub count: usize,
    /// The price of one load, `None` if the tier is not in the price list.
    pub unit_price: Option<f64>,
    /// `count * unit_price`, zero for unpriced tiers.
    pub subtotal: f64,
}

/// The billing computation for a set of transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingSummary {
    /// One line per unit volume, sorted by unit volume.
    pub lines: Vec<BillingLine>,
    /// The sum of the line subtotals.
    pub total: f64,
}

impl BillingSummary {
    /// Count the loads in `records` by unit volume and price them with `price_list`.
    pub fn from_records(records: &[Transaction], price_list: &PriceList) -> Self {
        Self::from_volume_totals(&volume_totals(records), price_list)
    }

    /// Price the number of loads per unit volume with `price_list`.
    ///
    /// A tier without a price is still listed but adds nothing to the total.
    pub fn from_volume_totals(
        volume_totals: &BTreeMap<String, usize>,
        price_list: &PriceList,
    ) -> Self {
        let lines: Vec<BillingLine> = volume_totals
            .iter()
            .map(|(unit_volume, &count)| {
                let unit_price = price_list.price_of(unit_volume);

                BillingLine {
                    unit_volume: unit_volume.clone(),
                    count,
                    unit_price,
                    subtotal: unit_price.map_or(0.0, |price| price * count as f64),
                }
            })
            .collect();
        let total = lines.iter().map(|line| line.subtotal).sum();

        Self { lines, total }
    }
}

/// The number of loads in `records` per unit volume.
pub fn volume_totals(records: &[Transaction]) -> BTreeMap<String, usize> {
    records.iter().fold(BTreeMap::new(), |mut totals, record| {
        *totals.entry(record.unit_volume.clone()).or_insert(0) += 1;
        totals
    })
}

#[cfg(test)]
mod summary_tests {
    use std::collections::BTreeMap;

    use time::{Date, Duration, OffsetDateTime, macros::date};

    use crate::transaction::{PaymentMethod, PaymentStatus, PriceList, Transaction};

    use super::{
        BillingLine, BillingSummary, PaymentTotals, daily_sales, distinct_truckers,
        distinct_volumes, volume_totals,
    };

    fn record(
        date: Date,
        trucker: &str,
        volume: &str,
        price: f64,
        status: PaymentStatus,
    ) -> Transaction {
        Transaction {
            id: 1,
            date,
            time: "08:00".to_owned(),
            receipt_number: "R-1".to_owned(),
            trucker_name: trucker.to_owned(),
            plate_number: "ABC 123".to_owned(),
            unit_volume: volume.to_owned(),
            price,
            destination: "Site".to_owned(),
            payment_method: PaymentMethod::Po,
            payment_status: status,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn totals_split_paid_and_pending() {
        let records = vec![
            record(date!(2024 - 01 - 01), "Juan", "10 cubic meter", 1650.0, PaymentStatus::Paid),
            record(date!(2024 - 01 - 01), "Juan", "15 cubic meter", 2400.0, PaymentStatus::Pending),
        ];

        let totals = PaymentTotals::from_records(&records);

        assert_eq!(totals, PaymentTotals { paid: 1650.0, pending: 2400.0 });
        assert_eq!(
            totals.paid + totals.pending,
            records.iter().map(|record| record.price).sum::<f64>()
        );
    }

    #[test]
    fn totals_of_nothing_are_zero() {
        assert_eq!(PaymentTotals::from_records(&[]), PaymentTotals::default());
    }

    #[test]
    fn daily_sales_covers_the_last_seven_days_oldest_first() {
        let today = date!(2025 - 10 - 07);

        let sales = daily_sales(&[], today);

        assert_eq!(sales.len(), 7);
        assert_eq!(sales[0].date, date!(2025 - 10 - 01));
        assert_eq!(sales[6].date, today);
        for pair in sales.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
        assert!(sales.iter().all(|day| day.total == 0.0));
    }

    #[test]
    fn daily_sales_only_counts_paid_records_in_the_window() {
        let today = date!(2025 - 10 - 07);
        let records = vec![
            record(date!(2025 - 10 - 07), "Juan", "10 cubic meter", 1650.0, PaymentStatus::Paid),
            record(date!(2025 - 10 - 07), "Pedro", "15 cubic meter", 2400.0, PaymentStatus::Paid),
            record(date!(2025 - 10 - 03), "Juan", "10 cubic meter", 1650.0, PaymentStatus::Pending),
            record(date!(2025 - 10 - 01), "Juan", "15 cubic meter", 2400.0, PaymentStatus::Paid),
            // Outside the window
            record(date!(2025 - 09 - 30), "Juan", "10 cubic meter", 1650.0, PaymentStatus::Paid),
            record(date!(2025 - 10 - 08), "Juan", "10 cubic meter", 1650.0, PaymentStatus::Paid),
        ];

        let sales = daily_sales(&records, today);
        let totals: Vec<f64> = sales.iter().map(|day| day.total).collect();

        assert_eq!(totals, vec![2400.0, 0.0, 0.0, 0.0, 0.0, 0.0, 4050.0]);
        assert_eq!(totals.iter().sum::<f64>(), 6450.0);
    }

    #[test]
    fn distinct_values_are_sorted_and_unique() {
        let records = vec![
            record(date!(2025 - 10 - 01), "Pedro", "15 cubic meter", 2400.0, PaymentStatus::Paid),
            record(date!(2025 - 10 - 01), "Juan", "10 cubic meter", 1650.0, PaymentStatus::Paid),
            record(date!(2025 - 10 - 02), "Pedro", "10 cubic meter", 1650.0, PaymentStatus::Paid),
        ];

        assert_eq!(distinct_truckers(&records), vec!["Juan", "Pedro"]);
        assert_eq!(distinct_volumes(&records), vec!["10 cubic meter", "15 cubic meter"]);
    }

    #[test]
    fn billing_total_from_volume_counts() {
        let volume_totals =
            BTreeMap::from([("10 cubic meter".to_owned(), 3), ("15 cubic meter".to_owned(), 2)]);

        let summary = BillingSummary::from_volume_totals(&volume_totals, &PriceList::default());

        assert_eq!(summary.total, 9750.0);
        assert_eq!(summary.lines[0].subtotal, 4950.0);
        assert_eq!(summary.lines[1].subtotal, 4800.0);
    }

    #[test]
    fn unpriced_volume_is_listed_but_adds_nothing() {
        let records = vec![
            record(date!(2025 - 10 - 01), "Juan", "10 cubic meter", 1650.0, PaymentStatus::Paid),
            record(date!(2025 - 10 - 01), "Juan", "20 cubic meter", 0.0, PaymentStatus::Paid),
        ];

        let summary = BillingSummary::from_records(&records, &PriceList::default());

        assert_eq!(summary.total, 1650.0);
        assert_eq!(
            summary.lines[1],
            BillingLine {
                unit_volume: "20 cubic meter".to_owned(),
                count: 1,
                unit_price: None,
                subtotal: 0.0,
            }
        );
    }

    #[test]
    fn counts_loads_per_volume() {
        let records = vec![
            record(date!(2025 - 10 - 01), "Juan", "10 cubic meter", 1650.0, PaymentStatus::Paid),
            record(date!(2025 - 10 - 02), "Juan", "10 cubic meter", 1650.0, PaymentStatus::Pending),
            record(date!(2025 - 10 - 03), "Juan", "15 cubic meter", 2400.0, PaymentStatus::Paid),
        ];

        assert_eq!(
            volume_totals(&records),
            BTreeMap::from([("10 cubic meter".to_owned(), 2), ("15 cubic meter".to_owned(), 1)])
        );
    }
}
