//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Extension, Router, middleware,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        CurrentUser, auth_guard, auth_guard_hx, get_auth_confirm, get_auth_error_page,
        get_check_email_page, get_log_in_page, get_log_out, get_sign_up_page, post_log_in,
        post_sign_up, staff_guard,
    },
    dashboard::{
        get_cash_records_page, get_purchase_orders_page, get_records_page, get_users_page,
    },
    endpoints,
    internal_server_error::get_internal_server_error_page,
    member_dashboard::get_member_dashboard_page,
    not_found::get_404_not_found,
    print::{get_print_dashboard_page, get_print_page},
    transaction::{
        create_member_transaction_endpoint, create_transaction_endpoint, mark_paid_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::SIGN_UP_VIEW, get(get_sign_up_page))
        .route(endpoints::SIGN_UP_API, post(post_sign_up))
        .route(endpoints::CHECK_EMAIL_VIEW, get(get_check_email_page))
        .route(endpoints::AUTH_CONFIRM, get(get_auth_confirm))
        .route(endpoints::AUTH_ERROR_VIEW, get(get_auth_error_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let staff_pages = Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_index))
        .route(endpoints::RECORDS_VIEW, get(get_records_page))
        .route(endpoints::PURCHASE_ORDERS_VIEW, get(get_purchase_orders_page))
        .route(endpoints::CASH_RECORDS_VIEW, get(get_cash_records_page))
        .route(endpoints::USERS_VIEW, get(get_users_page))
        .route(endpoints::PRINT_VIEW, get(get_print_page))
        .route(endpoints::PRINT_DASHBOARD_VIEW, get(get_print_dashboard_page))
        .layer(middleware::from_fn(staff_guard))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    let member_pages = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::MEMBER_DASHBOARD_VIEW, get(get_member_dashboard_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST routes need to use the HX-REDIRECT header for auth redirects to work properly
    // for HTMX requests.
    let staff_api = Router::new()
        .route(endpoints::TRANSACTIONS_API, post(create_transaction_endpoint))
        .route(endpoints::MARK_TRANSACTION_PAID, post(mark_paid_endpoint))
        .layer(middleware::from_fn(staff_guard))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx));

    let member_api = Router::new()
        .route(
            endpoints::MEMBER_TRANSACTIONS_API,
            post(create_member_transaction_endpoint),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx));

    staff_pages
        .merge(member_pages)
        .merge(staff_api)
        .merge(member_api)
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the home page for the user's role.
async fn get_index_page(Extension(user): Extension<CurrentUser>) -> Redirect {
    Redirect::to(user.role.home_page())
}

/// The staff dashboard opens on the records page.
async fn get_dashboard_index() -> Redirect {
    Redirect::to(endpoints::RECORDS_VIEW)
}
