//! Payments listing page with filters and paid/unpaid totals.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, STATUS_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
    room::{RoomId, get_all_rooms},
};

use super::{Payment, PaymentFilter, PaymentStatus, get_payments};

/// The state needed for the payments listing page.
#[derive(Debug, Clone)]
pub struct PaymentsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PaymentsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for the payments listing page.
///
/// All filters are optional and garbage values are ignored rather than
/// rejected so stale or hand-edited links still render the page.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentsQuery {
    pub room_id: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    pub status: Option<String>,
}

impl PaymentsQuery {
    fn to_filter(&self) -> PaymentFilter {
        PaymentFilter {
            room_id: self.room_id.as_deref().and_then(|raw| raw.trim().parse().ok()),
            month: self
                .month
                .as_deref()
                .and_then(|raw| raw.trim().parse().ok())
                .filter(|month| (1..=12).contains(month)),
            year: self.year.as_deref().and_then(|raw| raw.trim().parse().ok()),
            status: self
                .status
                .as_deref()
                .and_then(|raw| PaymentStatus::try_from(raw.trim()).ok()),
        }
    }
}

/// Render the payments listing page, filtered by the query parameters.
pub async fn get_payments_page(
    Query(query): Query<PaymentsQuery>,
    State(state): State<PaymentsPageState>,
) -> Result<Response, Error> {
    let filter = query.to_filter();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let payments = get_payments(filter, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve payments: {error}"))?;

    let rooms = get_all_rooms(None, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve rooms: {error}"))?;

    let room_names: HashMap<RoomId, String> = rooms
        .iter()
        .map(|room| (room.id, room.name.clone()))
        .collect();

    let room_choices: Vec<(RoomId, String)> = rooms
        .into_iter()
        .map(|room| (room.id, room.name))
        .collect();

    Ok(payments_view(&payments, &room_names, &room_choices, &filter).into_response())
}

fn payments_view(
    payments: &[Payment],
    room_names: &HashMap<RoomId, String>,
    room_choices: &[(RoomId, String)],
    filter: &PaymentFilter,
) -> Markup {
    let new_payment_route = endpoints::NEW_PAYMENT_VIEW;
    let nav_bar = NavBar::new(endpoints::PAYMENTS_VIEW).into_html();

    let paid_total: i64 = payments
        .iter()
        .filter(|payment| payment.status == PaymentStatus::Paid)
        .map(|payment| payment.total_amount)
        .sum();
    let unpaid_total: i64 = payments
        .iter()
        .filter(|payment| payment.status == PaymentStatus::Unpaid)
        .map(|payment| payment.total_amount)
        .sum();

    let table_row = |payment: &Payment| {
        let room_name = room_names
            .get(&payment.room_id)
            .map(String::as_str)
            .unwrap_or("(deleted room)");
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_PAYMENT_VIEW, payment.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_PAYMENT, payment.id);
        let confirm_message = format!(
            "Are you sure you want to delete the {}/{} bill for '{}'?",
            payment.month, payment.year, room_name
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    (room_name)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (payment.month) "/" (payment.year)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (format_currency(payment.total_amount))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    span class=(STATUS_BADGE_STYLE)
                    {
                        (payment.status)
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            &confirm_message,
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    let filter_form = html!(
        form
            method="get"
            action=(endpoints::PAYMENTS_VIEW)
            class="flex flex-wrap items-end gap-4"
        {
            div
            {
                label for="room_id" class=(FORM_LABEL_STYLE) { "Room" }

                select id="room_id" name="room_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All rooms" }

                    @for (room_id, room_name) in room_choices {
                        option
                            value=(room_id)
                            selected[filter.room_id == Some(*room_id)]
                        {
                            (room_name)
                        }
                    }
                }
            }

            div
            {
                label for="month" class=(FORM_LABEL_STYLE) { "Month" }

                input
                    id="month"
                    type="number"
                    name="month"
                    min="1"
                    max="12"
                    value=[filter.month]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="year" class=(FORM_LABEL_STYLE) { "Year" }

                input
                    id="year"
                    type="number"
                    name="year"
                    min="2000"
                    value=[filter.year]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="status" class=(FORM_LABEL_STYLE) { "Status" }

                select id="status" name="status" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Any" }

                    @for status in [PaymentStatus::Unpaid, PaymentStatus::Paid] {
                        option
                            value=(status.as_str())
                            selected[filter.status == Some(status)]
                        {
                            (status)
                        }
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }
        }
    );

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Payments" }

                    a href=(new_payment_route) class=(LINK_STYLE)
                    {
                        "Create Payment"
                    }
                }

                (filter_form)

                section class="flex gap-8 text-sm"
                {
                    p
                    {
                        "Paid: "
                        span class="font-semibold" { (format_currency(paid_total)) }
                    }

                    p
                    {
                        "Unpaid: "
                        span class="font-semibold" { (format_currency(unpaid_total)) }
                    }
                }

                section class="dark:bg-gray-800 lg:max-w-5xl lg:w-full lg:mx-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Room" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Period" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for payment in payments {
                                (table_row(payment))
                            }

                            @if payments.is_empty() {
                                tr
                                {
                                    td
                                        colspan="5"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No payments match. "
                                        a href=(new_payment_route) class=(LINK_STYLE)
                                        {
                                            "Create a payment"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Payments", &[], &content)
}

#[cfg(test)]
mod payments_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;

    use crate::{
        billing::{MeterReading, Tariff},
        house::{create_house, create_house_table},
        payment::{
            NewPayment, PaymentStatus, create_payment, create_payment_table, get_payments_page,
        },
        room::{NewRoom, RoomStatus, create_room, create_room_table},
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
    };

    use super::{PaymentsPageState, PaymentsQuery};

    fn get_payments_state() -> PaymentsPageState {
        let connection = Connection::open_in_memory().unwrap();
        create_house_table(&connection).expect("Could not create house table");
        create_room_table(&connection).expect("Could not create room table");
        create_payment_table(&connection).expect("Could not create payment table");

        PaymentsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn new_payment(room_id: i64, month: u8, status: PaymentStatus, total: i64) -> NewPayment {
        NewPayment {
            room_id,
            month,
            year: 2024,
            elect: MeterReading {
                start: 100,
                end: 150,
            },
            water: MeterReading { start: 20, end: 25 },
            tariff: Tariff::default(),
            total_amount: total,
            status,
            note: String::new(),
        }
    }

    fn seed_room(connection: &Connection, name: &str) -> i64 {
        let house = create_house("12 Hang Bac", "", connection).unwrap();

        create_room(
            NewRoom {
                house_id: house.id,
                name: name.to_string(),
                renter: String::new(),
                phone: String::new(),
                area: 20.0,
                status: RoomStatus::Rented,
                tariff: Tariff::default(),
                deposit: 0,
                note: String::new(),
            },
            connection,
        )
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn renders_payments_with_totals() {
        let state = get_payments_state();
        {
            let connection = state.db_connection.lock().unwrap();
            let room_id = seed_room(&connection, "Room 101");
            create_payment(
                new_payment(room_id, 4, PaymentStatus::Paid, 2_000_000),
                &connection,
            )
            .unwrap();
            create_payment(
                new_payment(room_id, 5, PaymentStatus::Unpaid, 1_500_000),
                &connection,
            )
            .unwrap();
        }

        let response = get_payments_page(Query(PaymentsQuery::default()), State(state))
            .await
            .expect("Could not get payments page");

        assert_status_ok(&response);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Room 101"));
        assert!(text.contains("4/2024"));
        assert!(text.contains("5/2024"));
        assert!(text.contains("2.000.000 ₫"));
        assert!(text.contains("1.500.000 ₫"));
    }

    #[tokio::test]
    async fn filters_by_status() {
        let state = get_payments_state();
        {
            let connection = state.db_connection.lock().unwrap();
            let room_id = seed_room(&connection, "Room 101");
            create_payment(
                new_payment(room_id, 4, PaymentStatus::Paid, 2_000_000),
                &connection,
            )
            .unwrap();
            create_payment(
                new_payment(room_id, 5, PaymentStatus::Unpaid, 1_500_000),
                &connection,
            )
            .unwrap();
        }

        let response = get_payments_page(
            Query(PaymentsQuery {
                status: Some("unpaid".to_string()),
                ..PaymentsQuery::default()
            }),
            State(state),
        )
        .await
        .expect("Could not get payments page");

        let html = parse_html_document(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("5/2024"));
        assert!(!text.contains("4/2024"));
    }

    #[tokio::test]
    async fn ignores_garbage_filters() {
        let state = get_payments_state();
        {
            let connection = state.db_connection.lock().unwrap();
            let room_id = seed_room(&connection, "Room 101");
            create_payment(
                new_payment(room_id, 4, PaymentStatus::Paid, 2_000_000),
                &connection,
            )
            .unwrap();
        }

        let response = get_payments_page(
            Query(PaymentsQuery {
                room_id: Some("abc".to_string()),
                month: Some("0".to_string()),
                year: Some(String::new()),
                status: Some("whenever".to_string()),
            }),
            State(state),
        )
        .await
        .expect("Could not get payments page");

        assert_status_ok(&response);

        let html = parse_html_document(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("4/2024"));
    }
}
