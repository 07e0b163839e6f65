//! Price template deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    price::{PriceId, db::delete_price},
};

/// The state needed for deleting a price template.
#[derive(Debug, Clone)]
pub struct DeletePriceEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeletePriceEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle price template deletion. Returns success alert or error.
pub async fn delete_price_endpoint(
    Path(price_id): Path<PriceId>,
    State(state): State<DeletePriceEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_price(price_id, &connection) {
        Ok(_) => Alert::SuccessSimple {
            message: "Price template deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingPrice) => Error::DeleteMissingPrice.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting price template {price_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
