//! House deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    house::{HouseId, db::delete_house},
};

/// The state needed for deleting a house.
#[derive(Debug, Clone)]
pub struct DeleteHouseEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteHouseEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle house deletion. Returns success alert or error.
pub async fn delete_house_endpoint(
    Path(house_id): Path<HouseId>,
    State(state): State<DeleteHouseEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_house(house_id, &connection) {
        Ok(_) => Alert::Success {
            message: "House deleted successfully".to_owned(),
            details: "Its rooms and their payments were also removed.".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingHouse) => Error::DeleteMissingHouse.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting house {house_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
