//! Room editing page and endpoint.

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
    house::{House, get_all_houses},
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    room::{RoomFormData, RoomId, form::room_form_view, get_room, update_room},
};

/// The state needed for the edit room page.
#[derive(Debug, Clone)]
pub struct EditRoomPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditRoomPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The state needed for updating a room.
#[derive(Debug, Clone)]
pub struct UpdateRoomEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateRoomEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the room editing page.
pub async fn get_edit_room_page(
    Path(room_id): Path<RoomId>,
    State(state): State<EditRoomPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let houses = get_all_houses(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve houses: {error}"))?;

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_ROOM_VIEW, room_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_ROOM, room_id);

    match get_room(room_id, &connection) {
        Ok(room) => Ok(edit_room_view(
            &edit_endpoint,
            &update_endpoint,
            &houses,
            &RoomFormData::from(&room),
            "",
        )
        .into_response()),
        Err(error) => {
            let error_message = match error {
                Error::NotFound => "Room not found",
                _ => {
                    tracing::error!("Failed to retrieve room {room_id}: {error}");
                    "Failed to load room"
                }
            };

            Ok(edit_room_view(
                &edit_endpoint,
                &update_endpoint,
                &houses,
                &RoomFormData::default(),
                error_message,
            )
            .into_response())
        }
    }
}

/// Handle room update form submission.
pub async fn update_room_endpoint(
    Path(room_id): Path<RoomId>,
    State(state): State<UpdateRoomEndpointState>,
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

    match update_room(room_id, new_room, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::ROOMS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingRoom) => Error::UpdateMissingRoom.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating room {room_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_room_view(
    edit_endpoint: &str,
    update_endpoint: &str,
    houses: &[House],
    values: &RoomFormData,
    error_message: &str,
) -> Markup {
    let nav_bar = NavBar::new(edit_endpoint).into_html();
    let form = room_form_view(
        None,
        Some(update_endpoint),
        houses,
        values,
        "Update Room",
        error_message,
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Room", &[], &content)
}

#[cfg(test)]
mod edit_room_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;

    use crate::{
        billing::Tariff,
        endpoints,
        house::{create_house, create_house_table},
        room::{
            NewRoom, RoomFormData, RoomStatus, create_room, create_room_table,
            edit::{EditRoomPageState, UpdateRoomEndpointState},
            get_edit_room_page, get_room, update_room_endpoint,
        },
        test_utils::{
            assert_form_input_with_value, assert_form_submit_button_with_text, assert_hx_endpoint,
            assert_hx_redirect, assert_status_ok, assert_valid_html, must_get_form,
            parse_html_document,
        },
    };

    fn get_test_db_connection() -> Connection {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        connection
            .pragma_update(None, "foreign_keys", true)
            .expect("Could not enable foreign keys");
        create_house_table(&connection).expect("Could not create house table");
        create_room_table(&connection).expect("Could not create room table");
        connection
    }

    fn sample_room(house_id: i64) -> NewRoom {
        NewRoom {
            house_id,
            name: "Room 101".to_string(),
            renter: "Lan".to_string(),
            phone: "0901234567".to_string(),
            area: 22.5,
            status: RoomStatus::Rented,
            tariff: Tariff {
                room_price: 2_000_000,
                elect_unit_price: 3_500,
                water_unit_price: 15_000,
                trash_fee: 20_000,
                parking_fee: 0,
                washing_machine_fee: 0,
                elevator_fee: 0,
            },
            deposit: 2_000_000,
            note: String::new(),
        }
    }

    #[tokio::test]
    async fn get_edit_room_page_succeeds() {
        let connection = get_test_db_connection();
        let house = create_house("12 Hang Bac", "", &connection).unwrap();
        let room = create_room(sample_room(house.id), &connection).unwrap();
        let state = EditRoomPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_edit_room_page(Path(room.id), State(state)).await.unwrap();

        assert_status_ok(&response);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &endpoints::format_endpoint(endpoints::PUT_ROOM, room.id),
            "hx-put",
        );
        assert_form_input_with_value(&form, "name", "text", "Room 101");
        assert_form_input_with_value(&form, "room_price", "number", "2000000");
        assert_form_submit_button_with_text(&form, "Update Room");
    }

    #[tokio::test]
    async fn update_room_endpoint_succeeds() {
        let connection = get_test_db_connection();
        let house = create_house("12 Hang Bac", "", &connection).unwrap();
        let room = create_room(sample_room(house.id), &connection).unwrap();
        let state = UpdateRoomEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let mut form = RoomFormData::from(&room);
        form.name = "Room 101A".to_string();
        form.status = "available".to_string();

        let response = update_room_endpoint(Path(room.id), State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::ROOMS_VIEW);

        let updated_room = get_room(room.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(updated_room.name, "Room 101A");
        assert_eq!(updated_room.status, RoomStatus::Available);
    }

    #[tokio::test]
    async fn update_room_endpoint_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();
        let house = create_house("12 Hang Bac", "", &connection).unwrap();
        let room = create_room(sample_room(house.id), &connection).unwrap();
        let state = UpdateRoomEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let form = RoomFormData::from(&room);

        let response = update_room_endpoint(Path(999999), State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_room_endpoint_with_empty_name_returns_error() {
        let connection = get_test_db_connection();
        let house = create_house("12 Hang Bac", "", &connection).unwrap();
        let room = create_room(sample_room(house.id), &connection).unwrap();
        let state = UpdateRoomEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let mut form = RoomFormData::from(&room);
        form.name = String::new();

        let response = update_room_endpoint(Path(room.id), State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
