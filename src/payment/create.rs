//! Payment creation page and endpoint.
//!
//! The page takes an optional `room_id` query parameter. Once a room is
//! selected the page shows the room's recent bills and pre-fills the start
//! readings from the latest billed period's end readings.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    billing::{PastPeriod, ReadingSuggestion, compute_charges, suggest_next_readings},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    payment::{
        PaymentFormData, PaymentStatus, create_payment, db::get_recent_periods,
        domain::NewPayment,
    },
    room::{Room, RoomId, get_all_rooms, get_room},
};

/// The state needed for creating a payment.
#[derive(Debug, Clone)]
pub struct CreatePaymentEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreatePaymentEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for the payment creation page.
#[derive(Debug, Deserialize)]
pub struct NewPaymentQuery {
    /// The pre-selected room. Garbage values are ignored.
    pub room_id: Option<String>,
}

/// Render the payment creation page.
pub async fn get_new_payment_page(
    Query(query): Query<NewPaymentQuery>,
    State(state): State<CreatePaymentEndpointState>,
) -> Result<Response, Error> {
    let selected_room_id: Option<RoomId> = query
        .room_id
        .as_deref()
        .and_then(|raw| raw.trim().parse().ok());

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let rooms = get_all_rooms(None, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve rooms: {error}"))?;

    let selected_room = match selected_room_id {
        Some(room_id) => match get_room(room_id, &connection) {
            Ok(room) => Some(room),
            Err(Error::NotFound) => None,
            Err(error) => return Err(error),
        },
        None => None,
    };

    let (recent_periods, suggestion) = match &selected_room {
        Some(room) => {
            let periods = get_recent_periods(room.id, &connection).inspect_err(
                |error| tracing::error!("Failed to retrieve recent periods: {error}"),
            )?;
            let suggestion = suggest_next_readings(&periods);

            (periods, suggestion)
        }
        None => (Vec::new(), None),
    };

    Ok(
        new_payment_view(&rooms, selected_room.as_ref(), &recent_periods, suggestion)
            .into_response(),
    )
}

/// Handle payment creation form submission.
///
/// The room's current tariff is copied onto the payment and the total is
/// computed from that copy, so later room edits leave this bill unchanged.
pub async fn create_payment_endpoint(
    State(state): State<CreatePaymentEndpointState>,
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

    let room = match get_room(parsed.room_id, &connection) {
        Ok(room) => room,
        Err(Error::NotFound) => return Error::InvalidRoom.into_alert_response(),
        Err(error) => {
            tracing::error!("Failed to retrieve room {}: {error}", parsed.room_id);
            return error.into_alert_response();
        }
    };

    let breakdown = match compute_charges(&room.tariff, parsed.elect, parsed.water) {
        Ok(breakdown) => breakdown,
        Err(error) => return error.into_alert_response(),
    };

    let new_payment = NewPayment {
        room_id: room.id,
        month: parsed.month,
        year: parsed.year,
        elect: parsed.elect,
        water: parsed.water,
        tariff: room.tariff,
        total_amount: breakdown.total_amount,
        status: parsed.status,
        note: parsed.note,
    };

    match create_payment(new_payment, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::PAYMENTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a payment: {error}");

            error.into_alert_response()
        }
    }
}

fn new_payment_view(
    rooms: &[Room],
    selected_room: Option<&Room>,
    recent_periods: &[PastPeriod],
    suggestion: Option<ReadingSuggestion>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_PAYMENT_VIEW).into_html();

    let now = OffsetDateTime::now_utc();
    let default_month = u8::from(now.month());
    let default_year = now.year();

    let (elect_start, water_start) = match suggestion {
        Some(suggestion) => (
            suggestion.suggested_elect_start.to_string(),
            suggestion.suggested_water_start.to_string(),
        ),
        None => (String::new(), String::new()),
    };

    let number_field = |id: &str, label: &str, value: &str| {
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
            hx-post=(endpoints::POST_PAYMENT)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="room_id" class=(FORM_LABEL_STYLE) { "Room" }

                // Changing the room reloads the page so the suggestion and
                // recent bills match the selection.
                select
                    id="room_id"
                    name="room_id"
                    required
                    hx-get=(endpoints::NEW_PAYMENT_VIEW)
                    hx-target="body"
                    hx-push-url="true"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @if selected_room.is_none() {
                        option value="" selected disabled { "Select a room" }
                    }

                    @for room in rooms {
                        option
                            value=(room.id)
                            selected[selected_room.is_some_and(|selected| selected.id == room.id)]
                        {
                            (room.name)
                        }
                    }
                }
            }

            div class="grid grid-cols-2 gap-4"
            {
                div
                {
                    label for="month" class=(FORM_LABEL_STYLE) { "Month" }

                    input
                        id="month"
                        type="number"
                        name="month"
                        value=(default_month)
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
                        value=(default_year)
                        min="2000"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            (number_field("elect_start", "Electricity Start (kWh)", &elect_start))
            (number_field("elect_end", "Electricity End (kWh)", ""))
            (number_field("water_start", "Water Start (m³)", &water_start))
            (number_field("water_end", "Water End (m³)", ""))

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
                                checked[status == PaymentStatus::Unpaid]
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
                    placeholder="Note (optional)"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Payment" }
        }
    };

    let tariff_summary = selected_room.map(|room| {
        html! {
            section class="w-full space-y-2"
            {
                h2 class="text-lg font-bold" { "Current prices for " (room.name) }

                dl class="grid grid-cols-2 gap-x-4 gap-y-1 text-sm"
                {
                    dt { "Room price" }
                    dd { (format_currency(room.tariff.room_price)) }
                    dt { "Electricity" }
                    dd { (format_currency(room.tariff.elect_unit_price)) " / kWh" }
                    dt { "Water" }
                    dd { (format_currency(room.tariff.water_unit_price)) " / m³" }
                }

                @if let Some(suggestion) = suggestion {
                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Start readings pre-filled from the "
                        (suggestion.last_payment_month) "/" (suggestion.last_payment_year)
                        " bill."
                    }
                }
            }
        }
    });

    let recent_bills = (!recent_periods.is_empty()).then(|| {
        html! {
            section class="w-full space-y-2"
            {
                h2 class="text-lg font-bold" { "Recent bills" }

                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Period" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Electricity End" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Water End" }
                        }
                    }

                    tbody
                    {
                        @for period in recent_periods {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (period.month) "/" (period.year)
                                }
                                td class=(TABLE_CELL_STYLE) { (period.elect_end) }
                                td class=(TABLE_CELL_STYLE) { (period.water_end) }
                            }
                        }
                    }
                }
            }
        }
    });

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            (form)

            @if let Some(tariff_summary) = tariff_summary {
                (tariff_summary)
            }

            @if let Some(recent_bills) = recent_bills {
                (recent_bills)
            }
        }
    };

    base("Create Payment", &[], &content)
}

#[cfg(test)]
mod new_payment_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;

    use crate::{
        billing::{MeterReading, Tariff},
        endpoints,
        house::{create_house, create_house_table},
        payment::{NewPayment, PaymentStatus, create_payment, create_payment_table},
        room::{NewRoom, RoomStatus, create_room, create_room_table},
        test_utils::{
            assert_form_input, assert_form_input_with_value, assert_form_select,
            assert_form_submit_button, assert_hx_endpoint, assert_status_ok, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    use super::{CreatePaymentEndpointState, NewPaymentQuery, get_new_payment_page};

    fn get_payment_state() -> CreatePaymentEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_house_table(&connection).expect("Could not create house table");
        create_room_table(&connection).expect("Could not create room table");
        create_payment_table(&connection).expect("Could not create payment table");

        CreatePaymentEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn create_test_room(connection: &Connection) -> i64 {
        let house = create_house("12 Hang Bac", "", connection).unwrap();
        create_room(
            NewRoom {
                house_id: house.id,
                name: "Room 101".to_string(),
                renter: String::new(),
                phone: String::new(),
                area: 20.0,
                status: RoomStatus::Rented,
                tariff: Tariff {
                    room_price: 2_000_000,
                    elect_unit_price: 3_500,
                    water_unit_price: 15_000,
                    ..Tariff::default()
                },
                deposit: 0,
                note: String::new(),
            },
            connection,
        )
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn render_page_without_room() {
        let state = get_payment_state();
        create_test_room(&state.db_connection.lock().unwrap());

        let response = get_new_payment_page(Query(NewPaymentQuery { room_id: None }), State(state))
            .await
            .expect("Could not get new payment page");

        assert_status_ok(&response);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_PAYMENT, "hx-post");
        assert_form_select(&form, "room_id");
        assert_form_input(&form, "month", "number");
        assert_form_input(&form, "year", "number");
        assert_form_input(&form, "elect_start", "number");
        assert_form_input(&form, "water_end", "number");
        assert_form_input(&form, "status", "radio");
        assert_form_submit_button(&form);
    }

    #[tokio::test]
    async fn prefills_start_readings_from_latest_bill() {
        let state = get_payment_state();
        let room_id = {
            let connection = state.db_connection.lock().unwrap();
            let room_id = create_test_room(&connection);
            create_payment(
                NewPayment {
                    room_id,
                    month: 4,
                    year: 2024,
                    elect: MeterReading {
                        start: 100,
                        end: 142,
                    },
                    water: MeterReading { start: 20, end: 26 },
                    tariff: Tariff::default(),
                    total_amount: 0,
                    status: PaymentStatus::Paid,
                    note: String::new(),
                },
                &connection,
            )
            .unwrap();
            room_id
        };

        let response = get_new_payment_page(
            Query(NewPaymentQuery {
                room_id: Some(room_id.to_string()),
            }),
            State(state),
        )
        .await
        .expect("Could not get new payment page");

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_form_input_with_value(&form, "elect_start", "number", "142");
        assert_form_input_with_value(&form, "water_start", "number", "26");

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Recent bills"));
    }
}
