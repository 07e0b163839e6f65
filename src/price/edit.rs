//! Price template editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
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
    price::{PriceFormData, PriceId, form::price_form_view, get_price, update_price},
};

/// The state needed for the edit price template page.
#[derive(Debug, Clone)]
pub struct EditPricePageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditPricePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The state needed for updating a price template.
#[derive(Debug, Clone)]
pub struct UpdatePriceEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdatePriceEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the price template editing page.
pub async fn get_edit_price_page(
    Path(price_id): Path<PriceId>,
    State(state): State<EditPricePageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_PRICE_VIEW, price_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_PRICE, price_id);

    match get_price(price_id, &connection) {
        Ok(price) => Ok(edit_price_view(
            &edit_endpoint,
            &update_endpoint,
            &PriceFormData::from(&price),
            "",
        )
        .into_response()),
        Err(error) => {
            let error_message = match error {
                Error::NotFound => "Price template not found",
                _ => {
                    tracing::error!("Failed to retrieve price template {price_id}: {error}");
                    "Failed to load price template"
                }
            };

            Ok(edit_price_view(
                &edit_endpoint,
                &update_endpoint,
                &PriceFormData::default(),
                error_message,
            )
            .into_response())
        }
    }
}

/// Handle price template update form submission.
pub async fn update_price_endpoint(
    Path(price_id): Path<PriceId>,
    State(state): State<UpdatePriceEndpointState>,
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

    match update_price(price_id, new_price, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::PRICES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingPrice) => Error::UpdateMissingPrice.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating price template {price_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_price_view(
    edit_endpoint: &str,
    update_endpoint: &str,
    values: &PriceFormData,
    error_message: &str,
) -> Markup {
    let nav_bar = NavBar::new(edit_endpoint).into_html();
    let form = price_form_view(
        None,
        Some(update_endpoint),
        values,
        "Update Price Template",
        error_message,
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Price Template", &[], &content)
}
