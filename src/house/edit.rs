//! House editing page and endpoint.

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
    house::{HouseData, HouseId, get_house, update_house},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
};

/// The state needed for the edit house page.
#[derive(Debug, Clone)]
pub struct EditHousePageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditHousePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The state needed for updating a house.
#[derive(Debug, Clone)]
pub struct UpdateHouseEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateHouseEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the house editing page.
pub async fn get_edit_house_page(
    Path(house_id): Path<HouseId>,
    State(state): State<EditHousePageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_HOUSE_VIEW, house_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_HOUSE, house_id);

    match get_house(house_id, &connection) {
        Ok(house) => Ok(edit_house_view(
            &edit_endpoint,
            &update_endpoint,
            &house.address,
            &house.note,
            "",
        )
        .into_response()),
        Err(error) => {
            let error_message = match error {
                Error::NotFound => "House not found",
                _ => {
                    tracing::error!("Failed to retrieve house {house_id}: {error}");
                    "Failed to load house"
                }
            };

            Ok(
                edit_house_view(&edit_endpoint, &update_endpoint, "", "", error_message)
                    .into_response(),
            )
        }
    }
}

/// Handle house update form submission.
pub async fn update_house_endpoint(
    Path(house_id): Path<HouseId>,
    State(state): State<UpdateHouseEndpointState>,
    Form(form_data): Form<HouseData>,
) -> Response {
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_HOUSE, house_id);

    let address = form_data.address.trim();

    if address.is_empty() {
        return edit_house_form_view(
            &update_endpoint,
            address,
            form_data.note.trim(),
            &format!("Error: {}", Error::EmptyHouseAddress),
        )
        .into_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_house(house_id, address, form_data.note.trim(), &connection) {
        Ok(_) => (
            HxRedirect(endpoints::HOUSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingHouse) => Error::UpdateMissingHouse.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating house {house_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_house_view(
    edit_endpoint: &str,
    update_endpoint: &str,
    address: &str,
    note: &str,
    error_message: &str,
) -> Markup {
    let nav_bar = NavBar::new(edit_endpoint).into_html();
    let form = edit_house_form_view(update_endpoint, address, note, error_message);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit House", &[], &content)
}

fn edit_house_form_view(
    update_endpoint: &str,
    address: &str,
    note: &str,
    error_message: &str,
) -> Markup {
    html! {
        form
            hx-put=(update_endpoint)
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
                    value=(address)
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
                    value=(note)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update House" }
        }
    }
}
