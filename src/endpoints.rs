//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/houses/{house_id}/edit', use [format_endpoint].

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for listing all houses.
pub const HOUSES_VIEW: &str = "/houses";
/// The page for creating a new house.
pub const NEW_HOUSE_VIEW: &str = "/houses/new";
/// The page for editing an existing house.
pub const EDIT_HOUSE_VIEW: &str = "/houses/{house_id}/edit";
/// The page for listing all rooms, optionally filtered by house.
pub const ROOMS_VIEW: &str = "/rooms";
/// The page for creating a new room.
pub const NEW_ROOM_VIEW: &str = "/rooms/new";
/// The page for editing an existing room.
pub const EDIT_ROOM_VIEW: &str = "/rooms/{room_id}/edit";
/// The page for listing all price templates.
pub const PRICES_VIEW: &str = "/prices";
/// The page for creating a new price template.
pub const NEW_PRICE_VIEW: &str = "/prices/new";
/// The page for editing an existing price template.
pub const EDIT_PRICE_VIEW: &str = "/prices/{price_id}/edit";
/// The page for listing payments.
pub const PAYMENTS_VIEW: &str = "/payments";
/// The page for recording a new payment.
pub const NEW_PAYMENT_VIEW: &str = "/payments/new";
/// The page for editing an existing payment.
pub const EDIT_PAYMENT_VIEW: &str = "/payments/{payment_id}/edit";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to access users.
pub const USERS: &str = "/api/users";
/// The route to create a house.
pub const POST_HOUSE: &str = "/api/houses";
/// The route to update a house.
pub const PUT_HOUSE: &str = "/api/houses/{house_id}";
/// The route to delete a house.
pub const DELETE_HOUSE: &str = "/api/houses/{house_id}";
/// The route to create a room.
pub const POST_ROOM: &str = "/api/rooms";
/// The route to update a room.
pub const PUT_ROOM: &str = "/api/rooms/{room_id}";
/// The route to delete a room.
pub const DELETE_ROOM: &str = "/api/rooms/{room_id}";
/// The route to create a price template.
pub const POST_PRICE: &str = "/api/prices";
/// The route to update a price template.
pub const PUT_PRICE: &str = "/api/prices/{price_id}";
/// The route to delete a price template.
pub const DELETE_PRICE: &str = "/api/prices/{price_id}";
/// The route to create a payment.
pub const POST_PAYMENT: &str = "/api/payments";
/// The route to update a payment.
pub const PUT_PAYMENT: &str = "/api/payments/{payment_id}";
/// The route to delete a payment.
pub const DELETE_PAYMENT: &str = "/api/payments/{payment_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/houses/{house_id}/edit', '{house_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
