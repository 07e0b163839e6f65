//! Payment editing page and endpoint.
//!
//! Edits recompute the total from the submitted readings against the tariff
//! snapshot stored on the payment, never against the room's current prices.

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
    AppState, Error,
    billing::compute_charges,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        format_currency,
    },
    navigation::NavBar,
    payment::{
        Payment, PaymentFormData, PaymentId, PaymentStatus, PaymentUpdate, get_payment,
        update_payment,
    },
};

/// The state needed for the edit payment page.
#[derive(Debug, Clone)]
pub struct EditPaymentPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditPaymentPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The state needed for updating a payment.
#[derive(Debug, Clone)]
pub struct UpdatePaymentEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdatePaymentEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the payment editing page.
pub async fn get_edit_payment_page(
    Path(payment_id): Path<PaymentId>,
    State(state): State<EditPaymentPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let payment = get_payment(payment_id, &connection).inspect_err(
        |error| tracing::error!("Failed to retrieve payment {payment_id}: {error}"),
    )?;

    Ok(edit_payment_view(&payment).into_response())
}

/// Handle payment update form submission.
pub async fn update_payment_endpoint(
    Path(payment_id): Path<PaymentId>,
    State(state): State<UpdatePaymentEndpointState>,
    Form(form_data): Form<PaymentFormData>,
) -> Response {
    let parsed = match form_data.parse() {
        Ok(parsed) => parsed,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let payment = match get_payment(payment_id, &connection) {
        Ok(payment) => payment,
        Err(Error::NotFound) => return Error::UpdateMissingPayment.into_alert_response(),
        Err(error) => {
            tracing::error!("Failed to retrieve payment {payment_id}: {error}");
            return error.into_alert_response();
        }
    };

    let breakdown = match compute_charges(&payment.tariff, parsed.elect, parsed.water) {
        Ok(breakdown) => breakdown,
        Err(error) => return error.into_alert_response(),
    };

    let update = PaymentUpdate {
        month: parsed.month,
        year: parsed.year,
        elect: parsed.elect,
        water: parsed.water,
        total_amount: breakdown.total_amount,
        status: parsed.status,
        note: parsed.note,
    };

    match update_payment(payment_id, update, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::PAYMENTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingPayment) => Error::UpdateMissingPayment.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating payment {payment_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_payment_view(payment: &Payment) -> Markup {
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_PAYMENT_VIEW, payment.id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_PAYMENT, payment.id);
    let nav_bar = NavBar::new(&edit_endpoint).into_html();

    let number_field = |id: &str, label: &str, value: i64| {
        html! {
            div
            {
                label for=(id) class=(FORM_LABEL_STYLE) { (label) }

                input
                    id=(id)
                    type="number"
                    name=(id)
                    value=(value)
                    min="0"
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    };

    let form = html! {
        form
            hx-put=(update_endpoint)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            input type="hidden" name="room_id" value=(payment.room_id);

            div class="grid grid-cols-2 gap-4"
            {
                div
                {
                    label for="month" class=(FORM_LABEL_STYLE) { "Month" }

                    input
                        id="month"
                        type="number"
                        name="month"
                        value=(payment.month)
                        min="1"
                        max="12"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="year" class=(FORM_LABEL_STYLE) { "Year" }

                    input
                        id="year"
                        type="number"
                        name="year"
                        value=(payment.year)
                        min="2000"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            (number_field("elect_start", "Electricity Start (kWh)", payment.elect.start))
            (number_field("elect_end", "Electricity End (kWh)", payment.elect.end))
            (number_field("water_start", "Water Start (m³)", payment.water.start))
            (number_field("water_end", "Water End (m³)", payment.water.end))

            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Status" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    @for status in [PaymentStatus::Unpaid, PaymentStatus::Paid] {
                        div class="flex items-center gap-2"
                        {
                            input
                                id={ "status_" (status.as_str()) }
                                type="radio"
                                name="status"
                                value=(status.as_str())
                                checked[payment.status == status]
                                class=(FORM_RADIO_INPUT_STYLE);

                            label
                                for={ "status_" (status.as_str()) }
                                class=(FORM_RADIO_LABEL_STYLE)
                            {
                                (status)
                            }
                        }
                    }
                }
            }

            div
            {
                label for="note" class=(FORM_LABEL_STYLE) { "Note" }

                input
                    id="note"
                    type="text"
                    name="note"
                    value=(payment.note)
                    placeholder="Note (optional)"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            p class="text-sm text-gray-500 dark:text-gray-400"
            {
                "Current total: " (format_currency(payment.total_amount))
                ". Saving recomputes it from the readings using the prices this bill was created with."
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Payment" }
        }
    };

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Payment", &[], &content)
}
