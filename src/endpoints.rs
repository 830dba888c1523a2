//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}/paid', use [format_endpoint].

/// The root route which redirects to the user's home page or the log in page.
pub const ROOT: &str = "/";
/// The staff landing page, redirects to [RECORDS_VIEW].
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The staff page listing every trucker load.
pub const RECORDS_VIEW: &str = "/dashboard/records";
/// The staff page listing purchase orders.
pub const PURCHASE_ORDERS_VIEW: &str = "/dashboard/purchase-orders";
/// The staff page listing cash payments.
pub const CASH_RECORDS_VIEW: &str = "/dashboard/cash-records";
/// The staff page listing registered truckers.
pub const USERS_VIEW: &str = "/dashboard/users";
/// The printable billing statement for the filtered records.
pub const PRINT_VIEW: &str = "/dashboard/print";
/// The printable sales summary with the sales chart.
pub const PRINT_DASHBOARD_VIEW: &str = "/dashboard/print-dashboard";
/// The landing page for truckers, showing only their own records.
pub const MEMBER_DASHBOARD_VIEW: &str = "/member-dashboard";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The route for getting the sign up page.
pub const SIGN_UP_VIEW: &str = "/sign_up";
/// The page shown after signing up, asking the user to confirm their email.
pub const CHECK_EMAIL_VIEW: &str = "/sign_up/check_email";
/// The link sent to users to confirm their email address.
pub const AUTH_CONFIRM: &str = "/auth/confirm";
/// The page shown when an email confirmation link cannot be verified.
pub const AUTH_ERROR_VIEW: &str = "/auth/error";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for creating a new trucker account.
pub const SIGN_UP_API: &str = "/api/sign_up";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for staff to record a load for any trucker.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route for truckers to record one of their own loads.
pub const MEMBER_TRANSACTIONS_API: &str = "/api/member/transactions";
/// The route to mark a pending transaction as paid.
pub const MARK_TRANSACTION_PAID: &str = "/api/transactions/{transaction_id}/paid";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    #[track_caller]
    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::RECORDS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::PURCHASE_ORDERS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::CASH_RECORDS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::USERS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::PRINT_VIEW);
        assert_endpoint_is_valid_uri(endpoints::PRINT_DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::MEMBER_DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN_VIEW);
        assert_endpoint_is_valid_uri(endpoints::SIGN_UP_VIEW);
        assert_endpoint_is_valid_uri(endpoints::CHECK_EMAIL_VIEW);
        assert_endpoint_is_valid_uri(endpoints::AUTH_CONFIRM);
        assert_endpoint_is_valid_uri(endpoints::AUTH_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::LOG_IN_API);
        assert_endpoint_is_valid_uri(endpoints::SIGN_UP_API);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_API);
        assert_endpoint_is_valid_uri(endpoints::MEMBER_TRANSACTIONS_API);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::MARK_TRANSACTION_PAID, 1));
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint(endpoints::MARK_TRANSACTION_PAID, 42);

        assert_eq!(formatted_path, "/api/transactions/42/paid");
    }
}
