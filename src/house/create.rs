//! House creation page and endpoint.

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
    house::{HouseData, create_house},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
};

/// The state needed for creating a house.
#[derive(Debug, Clone)]
pub struct CreateHouseEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateHouseEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the house creation page.
pub async fn get_new_house_page() -> Response {
    new_house_view().into_response()
}

/// Handle house creation form submission.
pub async fn create_house_endpoint(
    State(state): State<CreateHouseEndpointState>,
    Form(new_house): Form<HouseData>,
) -> Response {
    let address = new_house.address.trim();

    if address.is_empty() {
        return new_house_form_view(&format!("Error: {}", Error::EmptyHouseAddress))
            .into_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_house(address, new_house.note.trim(), &connection) {
        Ok(_) => (
            HxRedirect(endpoints::HOUSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a house: {error}");

            error.into_alert_response()
        }
    }
}

fn new_house_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_HOUSE_VIEW).into_html();
    let form = new_house_form_view("");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create House", &[], &content)
}

fn new_house_form_view(error_message: &str) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_HOUSE)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label
                    for="address"
                    class=(FORM_LABEL_STYLE)
                {
                    "Address"
                }

                input
                    id="address"
                    type="text"
                    name="address"
                    placeholder="Address"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="note"
                    class=(FORM_LABEL_STYLE)
                {
                    "Note"
                }

                input
                    id="note"
                    type="text"
                    name="note"
                    placeholder="Note (optional)"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create House" }
        }
    }
}
