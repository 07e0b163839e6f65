//! RentRoll is a web app for landlords to manage rental houses, rooms,
//! price templates and monthly utility bills.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod billing;
mod dashboard;
mod db;
mod endpoints;
mod forms;
mod house;
mod html;
mod internal_server_error;
mod log_in;
mod log_out;
mod logging;
mod navigation;
mod not_found;
mod password;
mod payment;
mod price;
mod register_user;
mod room;
mod routing;
#[cfg(test)]
mod test_utils;
mod user;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use user::{User, UserID, get_user_by_id};

use crate::{
    alert::Alert,
    billing::Utility,
    internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid password.
    #[error("invalid password")]
    InvalidCredentials,

    /// Either the user ID or expiry cookie is missing from the cookie jar in
    /// the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// There was an error parsing the date in the cookie or creating the new
    /// expiry date time.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not format expiry cookie date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A meter's end reading was less than its start reading.
    ///
    /// Meters are cumulative counters, so consumption can never be negative.
    /// This is reported to the client before any charge is computed.
    #[error("the end reading for {0} must be greater than or equal to the start reading")]
    InvalidReading(Utility),

    /// A computed cost or bill total does not fit in a 64-bit amount.
    #[error("the computed bill total is too large")]
    AmountOverflow,

    /// A numeric form field could not be parsed as a non-negative integer.
    #[error("the field \"{0}\" must be a non-negative number")]
    InvalidNumber(&'static str),

    /// A month outside the range 1-12 was submitted.
    #[error("{0} is not a valid month, expected a number from 1 to 12")]
    InvalidMonth(i64),

    /// A room or payment status string did not match a known status.
    #[error("\"{0}\" is not a valid status")]
    InvalidStatus(String),

    /// An empty string was used for a house address.
    #[error("House address cannot be empty")]
    EmptyHouseAddress,

    /// An empty string was used for a room name.
    #[error("Room name cannot be empty")]
    EmptyRoomName,

    /// An empty string was used for a price template name.
    #[error("Price template name cannot be empty")]
    EmptyPriceName,

    /// The house ID used to create a room did not match a valid house.
    #[error("the house ID does not refer to a valid house")]
    InvalidHouse,

    /// The room ID used to create a payment did not match a valid room.
    #[error("the room ID does not refer to a valid room")]
    InvalidRoom,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a house that does not exist
    #[error("tried to update a house that is not in the database")]
    UpdateMissingHouse,

    /// Tried to delete a house that does not exist
    #[error("tried to delete a house that is not in the database")]
    DeleteMissingHouse,

    /// Tried to update a room that does not exist
    #[error("tried to update a room that is not in the database")]
    UpdateMissingRoom,

    /// Tried to delete a room that does not exist
    #[error("tried to delete a room that is not in the database")]
    DeleteMissingRoom,

    /// Tried to update a price template that does not exist
    #[error("tried to update a price template that is not in the database")]
    UpdateMissingPrice,

    /// Tried to delete a price template that does not exist
    #[error("tried to delete a price template that is not in the database")]
    DeleteMissingPrice,

    /// Tried to update a payment that does not exist
    #[error("tried to update a payment that is not in the database")]
    UpdateMissingPayment,

    /// Tried to delete a payment that does not exist
    #[error("tried to delete a payment that is not in the database")]
    DeleteMissingPayment,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidReading(utility) => Alert::error(
                StatusCode::BAD_REQUEST,
                "Invalid meter readings",
                &format!(
                    "The end reading for {utility} must be greater than or equal to the \
                    start reading."
                ),
            ),
            Error::AmountOverflow => Alert::error(
                StatusCode::BAD_REQUEST,
                "Amounts too large",
                "The bill total is too large to compute. Check the readings and tariff for typos.",
            ),
            Error::InvalidNumber(field) => Alert::error(
                StatusCode::BAD_REQUEST,
                "Invalid number",
                &format!("The field \"{field}\" must be a non-negative number."),
            ),
            Error::InvalidMonth(month) => Alert::error(
                StatusCode::BAD_REQUEST,
                "Invalid month",
                &format!("{month} is not a valid month. Choose a month from 1 to 12."),
            ),
            Error::InvalidStatus(status) => Alert::error(
                StatusCode::BAD_REQUEST,
                "Invalid status",
                &format!("\"{status}\" is not a valid status."),
            ),
            Error::EmptyHouseAddress => Alert::error(
                StatusCode::BAD_REQUEST,
                "Missing address",
                "House address cannot be empty.",
            ),
            Error::EmptyRoomName => Alert::error(
                StatusCode::BAD_REQUEST,
                "Missing room name",
                "Room name cannot be empty.",
            ),
            Error::EmptyPriceName => Alert::error(
                StatusCode::BAD_REQUEST,
                "Missing price template name",
                "Price template name cannot be empty.",
            ),
            Error::InvalidHouse => Alert::error(
                StatusCode::BAD_REQUEST,
                "Invalid house",
                "Could not find the selected house. Try refreshing the page.",
            ),
            Error::InvalidRoom => Alert::error(
                StatusCode::BAD_REQUEST,
                "Invalid room",
                "Could not find the selected room. Try refreshing the page.",
            ),
            Error::UpdateMissingHouse => Alert::error(
                StatusCode::NOT_FOUND,
                "Could not update house",
                "The house could not be found.",
            ),
            Error::DeleteMissingHouse => Alert::error(
                StatusCode::NOT_FOUND,
                "Could not delete house",
                "The house could not be found. \
                Try refreshing the page to see if the house has already been deleted.",
            ),
            Error::UpdateMissingRoom => Alert::error(
                StatusCode::NOT_FOUND,
                "Could not update room",
                "The room could not be found.",
            ),
            Error::DeleteMissingRoom => Alert::error(
                StatusCode::NOT_FOUND,
                "Could not delete room",
                "The room could not be found. \
                Try refreshing the page to see if the room has already been deleted.",
            ),
            Error::UpdateMissingPrice => Alert::error(
                StatusCode::NOT_FOUND,
                "Could not update price template",
                "The price template could not be found.",
            ),
            Error::DeleteMissingPrice => Alert::error(
                StatusCode::NOT_FOUND,
                "Could not delete price template",
                "The price template could not be found. \
                Try refreshing the page to see if it has already been deleted.",
            ),
            Error::UpdateMissingPayment => Alert::error(
                StatusCode::NOT_FOUND,
                "Could not update payment",
                "The payment could not be found.",
            ),
            Error::DeleteMissingPayment => Alert::error(
                StatusCode::NOT_FOUND,
                "Could not delete payment",
                "The payment could not be found. \
                Try refreshing the page to see if it has already been deleted.",
            ),
            _ => Alert::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.",
            ),
        }
    }
}
