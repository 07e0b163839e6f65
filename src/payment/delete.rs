//! Payment deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    payment::{PaymentId, db::delete_payment},
};

/// The state needed for deleting a payment.
#[derive(Debug, Clone)]
pub struct DeletePaymentEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeletePaymentEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle payment deletion. Returns success alert or error.
pub async fn delete_payment_endpoint(
    Path(payment_id): Path<PaymentId>,
    State(state): State<DeletePaymentEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_payment(payment_id, &connection) {
        Ok(_) => Alert::SuccessSimple {
            message: "Payment deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingPayment) => Error::DeleteMissingPayment.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting payment {payment_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
