//! Room deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    room::{RoomId, db::delete_room},
};

/// The state needed for deleting a room.
#[derive(Debug, Clone)]
pub struct DeleteRoomEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteRoomEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle room deletion. Returns success alert or error.
pub async fn delete_room_endpoint(
    Path(room_id): Path<RoomId>,
    State(state): State<DeleteRoomEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_room(room_id, &connection) {
        Ok(_) => Alert::Success {
            message: "Room deleted successfully".to_owned(),
            details: "Its payments were also removed.".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingRoom) => Error::DeleteMissingRoom.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting room {room_id}: {error}");
            error.into_alert_response()
        }
    }
}
