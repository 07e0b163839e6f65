//! Cookie based authentication for the single landlord account.

pub(crate) mod cookie;
mod middleware;
mod redirect;

pub(crate) use cookie::{REMEMBER_ME_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub(crate) use middleware::{auth_guard, auth_guard_hx};
pub(crate) use redirect::normalize_redirect_url;

#[cfg(test)]
pub(crate) use cookie::{COOKIE_EXPIRY, COOKIE_USER_ID};

#[cfg(test)]
pub(crate) use middleware::AuthState;
