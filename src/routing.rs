//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    middleware,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{auth_guard, auth_guard_hx},
    dashboard::get_dashboard_page,
    endpoints,
    house::{
        create_house_endpoint, delete_house_endpoint, get_edit_house_page, get_houses_page,
        get_new_house_page, update_house_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    log_in::{get_log_in_page, post_log_in},
    log_out::get_log_out,
    not_found::get_404_not_found,
    payment::{
        create_payment_endpoint, delete_payment_endpoint, get_edit_payment_page,
        get_new_payment_page, get_payments_page, update_payment_endpoint,
    },
    price::{
        create_price_endpoint, delete_price_endpoint, get_edit_price_page, get_new_price_page,
        get_prices_page, update_price_endpoint,
    },
    register_user::{get_register_page, register_user},
    room::{
        create_room_endpoint, delete_room_endpoint, get_edit_room_page, get_new_room_page,
        get_rooms_page, update_room_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::HOUSES_VIEW, get(get_houses_page))
        .route(endpoints::NEW_HOUSE_VIEW, get(get_new_house_page))
        .route(endpoints::EDIT_HOUSE_VIEW, get(get_edit_house_page))
        .route(endpoints::ROOMS_VIEW, get(get_rooms_page))
        .route(endpoints::NEW_ROOM_VIEW, get(get_new_room_page))
        .route(endpoints::EDIT_ROOM_VIEW, get(get_edit_room_page))
        .route(endpoints::PRICES_VIEW, get(get_prices_page))
        .route(endpoints::NEW_PRICE_VIEW, get(get_new_price_page))
        .route(endpoints::EDIT_PRICE_VIEW, get(get_edit_price_page))
        .route(endpoints::PAYMENTS_VIEW, get(get_payments_page))
        .route(endpoints::NEW_PAYMENT_VIEW, get(get_new_payment_page))
        .route(endpoints::EDIT_PAYMENT_VIEW, get(get_edit_payment_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST/PUT/DELETE routes need to use the HX-Redirect header for auth
    // redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::POST_HOUSE, post(create_house_endpoint))
            .route(endpoints::PUT_HOUSE, put(update_house_endpoint))
            .route(endpoints::DELETE_HOUSE, delete(delete_house_endpoint))
            .route(endpoints::POST_ROOM, post(create_room_endpoint))
            .route(endpoints::PUT_ROOM, put(update_room_endpoint))
            .route(endpoints::DELETE_ROOM, delete(delete_room_endpoint))
            .route(endpoints::POST_PRICE, post(create_price_endpoint))
            .route(endpoints::PUT_PRICE, put(update_price_endpoint))
            .route(endpoints::DELETE_PRICE, delete(delete_price_endpoint))
            .route(endpoints::POST_PAYMENT, post(create_payment_endpoint))
            .route(endpoints::PUT_PAYMENT, put(update_payment_endpoint))
            .route(endpoints::DELETE_PAYMENT, delete(delete_payment_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
