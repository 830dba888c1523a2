//! The state and layout shared by the staff and member dashboards.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    auth::CurrentUser,
    html::{HeadElement, base},
    navigation::NavBar,
    profile::{Profile, list_profiles},
    timezone::get_local_date,
    transaction::{PriceList, Transaction, TransactionOrder, TransactionScope, list_transactions},
};

/// The state needed for displaying the dashboard pages.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Manila".
    pub local_timezone: String,
    /// The unit prices shown in forms and used for billing.
    pub price_list: PriceList,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            price_list: state.price_list.clone(),
        }
    }
}

impl DashboardState {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }

    /// Load every transaction in `scope`.
    ///
    /// The lock is released before returning so filtering and rendering do
    /// not hold up other requests.
    pub fn load_transactions(
        &self,
        scope: &TransactionScope,
        order: TransactionOrder,
    ) -> Result<Vec<Transaction>, Error> {
        let connection = self.lock()?;

        list_transactions(scope, order, &connection)
            .inspect_err(|error| tracing::error!("could not load transactions: {error}"))
    }

    /// Load every trucker profile.
    pub fn load_profiles(&self) -> Result<Vec<Profile>, Error> {
        let connection = self.lock()?;

        list_profiles(&connection)
            .inspect_err(|error| tracing::error!("could not load profiles: {error}"))
    }

    /// Today's date in the quarry's timezone.
    pub fn today(&self) -> Result<Date, Error> {
        get_local_date(&self.local_timezone).ok_or_else(|| {
            tracing::error!("Invalid timezone {}", self.local_timezone);
            Error::InvalidTimezoneError(self.local_timezone.clone())
        })
    }
}

/// Wrap `content` in the base layout with the navigation bar for `user`.
pub fn dashboard_layout(
    title: &str,
    active_endpoint: &str,
    user: &CurrentUser,
    head_elements: &[HeadElement],
    content: &Markup,
) -> Markup {
    let nav_bar = NavBar::new(active_endpoint, user).into_html();

    let content = html! {
        (nav_bar)

        main
            class="flex flex-col items-center gap-4 px-2 lg:px-6 py-4 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white pb-24 lg:pb-8"
        {
            h1 class="self-start text-2xl font-bold" { (title) }

            (content)
        }
    };

    base(title, head_elements, &content)
}

/// A heading for a section of a dashboard page.
pub fn section_heading(text: &str) -> Markup {
    html!( h2 class="self-start text-lg font-semibold" { (text) } )
}
