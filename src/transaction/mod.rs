//! Trucker load records.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model, the payment rules and the record store functions
//! - The price list that every load's price is derived from
//! - The filter and aggregate logic shared by every dashboard
//! - The forms, tables and endpoints for recording loads and marking them paid

mod core;
mod create_endpoint;
mod filter;
mod form;
mod mark_paid_endpoint;
mod price;
mod summary;
mod view;

pub use core::{
    PaymentMethod, PaymentStatus, Transaction, TransactionBuilder, TransactionOrder,
    TransactionScope, create_transaction, create_transaction_table, list_transactions,
    mark_transaction_paid,
};
pub use create_endpoint::{create_member_transaction_endpoint, create_transaction_endpoint};
pub use filter::{ALL, FilterQuery, TransactionFilter};
pub use form::{TransactionFormProps, TruckerField, transaction_form};
pub use mark_paid_endpoint::mark_paid_endpoint;
pub use price::PriceList;
pub use summary::{
    BillingSummary, DailySales, PaymentTotals, daily_sales, distinct_truckers, distinct_volumes,
};
pub use view::{
    FilterOptions, PAGE_CONTENT_ID, TableOptions, amount_card, filter_form, totals_cards,
    transactions_table,
};
