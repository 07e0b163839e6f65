//! Room creation page and endpoint.

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
    house::{House, get_all_houses},
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    room::{RoomFormData, RoomStatus, create_room, form::room_form_view},
};

/// The state needed for creating a room.
#[derive(Debug, Clone)]
pub struct CreateRoomEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateRoomEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the room creation page with a house selector.
pub async fn get_new_room_page(
    State(state): State<CreateRoomEndpointState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let houses = get_all_houses(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve houses: {error}"))?;

    let defaults = RoomFormData {
        status: RoomStatus::Available.as_str().to_string(),
        ..RoomFormData::default()
    };

    Ok(new_room_view(&houses, &defaults, "").into_response())
}

/// Handle room creation form submission.
pub async fn create_room_endpoint(
    State(state): State<CreateRoomEndpointState>,
    Form(form_data): Form<RoomFormData>,
) -> Response {
    let new_room = match form_data.parse() {
        Ok(new_room) => new_room,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_room(new_room, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::ROOMS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a room: {error}");

            error.into_alert_response()
        }
    }
}

fn new_room_view(houses: &[House], values: &RoomFormData, error_message: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_ROOM_VIEW).into_html();
    let form = room_form_view(
        Some(endpoints::POST_ROOM),
        None,
        houses,
        values,
        "Create Room",
        error_message,
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create Room", &[], &content)
}
