//! User accounts, sessions and the pages for signing up and logging in.

mod confirm;
mod confirmation;
mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod redirect;
mod sign_up;
mod token;
mod user;

pub use confirm::{get_auth_confirm, get_auth_error_page};
pub use confirmation::create_email_confirmation_table;
pub use cookie::DEFAULT_COOKIE_DURATION;
pub(crate) use cookie::{invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{CurrentUser, auth_guard, auth_guard_hx, staff_guard};
pub use password::{PasswordHash, ValidatedPassword};
pub use redirect::normalize_redirect_url;
pub use sign_up::{get_check_email_page, get_sign_up_page, post_sign_up};
pub use user::{
    Role, User, UserID, confirm_user, create_user, create_user_table, get_user_by_email,
    get_user_by_id, set_user_role,
};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
