//! Dashboard module
//!
//! Provides the staff pages (records, purchase orders, cash records and
//! users) and the pieces they share with the member dashboard and the print
//! views: the page state, the layout and the sales chart.

mod cash_records;
mod charts;
mod page;
mod purchase_orders;
mod records;
mod users;

pub use cash_records::get_cash_records_page;
pub use charts::{SALES_CHART_ID, chart_view, echarts_script, sales_chart};
pub use page::{DashboardState, dashboard_layout, section_heading};
pub use purchase_orders::get_purchase_orders_page;
pub use records::get_records_page;
pub use users::get_users_page;
