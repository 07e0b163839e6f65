//! Price template creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    price::{PriceFormData, create_price, form::price_form_view},
};

/// The state needed for creating a price template.
#[derive(Debug, Clone)]
pub struct CreatePriceEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreatePriceEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the price template creation page.
pub async fn get_new_price_page() -> Response {
    new_price_view(&PriceFormData::default(), "").into_response()
}

/// Handle price template creation form submission.
pub async fn create_price_endpoint(
    State(state): State<CreatePriceEndpointState>,
    Form(form_data): Form<PriceFormData>,
) -> Response {
    let new_price = match form_data.parse() {
        Ok(new_price) => new_price,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_price(new_price, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::PRICES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while creating a price template: {error}"
            );

            error.into_alert_response()
        }
    }
}

fn new_price_view(values: &PriceFormData, error_message: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_PRICE_VIEW).into_html();
    let form = price_form_view(
        Some(endpoints::POST_PRICE),
        None,
        values,
        "Create Price Template",
        error_message,
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create Price Template", &[], &content)
}
