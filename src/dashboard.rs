//! The dashboard page, an overview of occupancy and revenue.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::{Connection, named_params};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    billing::Money,
    endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency,
    },
    navigation::NavBar,
    payment::{Payment, PaymentFilter, PaymentStatus, get_payments},
    room::{RoomId, RoomStatus, get_all_rooms},
};

/// The state needed for the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The headline numbers shown as stat cards.
#[derive(Debug, Clone, PartialEq)]
struct DashboardStats {
    house_count: u32,
    room_count: u32,
    occupied: u32,
    available: u32,
    maintenance: u32,
    /// Rented rooms as a whole percentage of all rooms. Zero when there
    /// are no rooms.
    occupancy_percent: u32,
    paid_revenue: Money,
    unpaid_revenue: Money,
}

/// Paid and unpaid revenue for one month of the current year.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct MonthRevenue {
    paid: Money,
    unpaid: Money,
}

/// Display a page with an overview of the landlord's data.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let current_year = OffsetDateTime::now_utc().year();

    let stats = gather_stats(current_year, &connection)
        .inspect_err(|error| tracing::error!("Failed to gather dashboard stats: {error}"))?;

    let revenue_by_month = get_revenue_by_month(current_year, &connection)
        .inspect_err(|error| tracing::error!("Failed to aggregate monthly revenue: {error}"))?;

    let unpaid_payments = get_payments(
        PaymentFilter {
            status: Some(PaymentStatus::Unpaid),
            ..PaymentFilter::default()
        },
        &connection,
    )
    .inspect_err(|error| tracing::error!("Failed to retrieve unpaid payments: {error}"))?;

    let room_names: HashMap<RoomId, String> = get_all_rooms(None, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve rooms: {error}"))?
        .into_iter()
        .map(|room| (room.id, room.name))
        .collect();

    Ok(
        dashboard_view(current_year, &stats, &revenue_by_month, &unpaid_payments, &room_names)
            .into_response(),
    )
}

fn gather_stats(year: i32, connection: &Connection) -> Result<DashboardStats, Error> {
    let house_count =
        connection.query_row("SELECT COUNT(1) FROM house", (), |row| row.get(0))?;

    let rooms = get_all_rooms(None, connection)?;
    let room_count = rooms.len() as u32;
    let count_status = |status: RoomStatus| -> u32 {
        rooms.iter().filter(|room| room.status == status).count() as u32
    };
    let occupied = count_status(RoomStatus::Rented);
    let available = count_status(RoomStatus::Available);
    let maintenance = count_status(RoomStatus::Maintenance);

    let occupancy_percent = if room_count == 0 {
        0
    } else {
        occupied * 100 / room_count
    };

    let mut revenue_query = connection.prepare(
        "SELECT status, COALESCE(SUM(total_amount), 0)
        FROM payment
        WHERE year = :year
        GROUP BY status",
    )?;
    let mut rows = revenue_query.query(named_params! {":year": year})?;

    let mut paid_revenue = 0;
    let mut unpaid_revenue = 0;

    while let Some(row) = rows.next()? {
        let status: String = row.get(0)?;
        let total: Money = row.get(1)?;

        match status.as_str() {
            "paid" => paid_revenue = total,
            _ => unpaid_revenue = total,
        }
    }

    Ok(DashboardStats {
        house_count,
        room_count,
        occupied,
        available,
        maintenance,
        occupancy_percent,
        paid_revenue,
        unpaid_revenue,
    })
}

/// Aggregate paid and unpaid totals per month, indexed by month 1 to 12.
fn get_revenue_by_month(
    year: i32,
    connection: &Connection,
) -> Result<[MonthRevenue; 12], Error> {
    let mut revenue = [MonthRevenue::default(); 12];

    let mut query = connection.prepare(
        "SELECT month, status, COALESCE(SUM(total_amount), 0)
        FROM payment
        WHERE year = :year
        GROUP BY month, status",
    )?;
    let mut rows = query.query(named_params! {":year": year})?;

    while let Some(row) = rows.next()? {
        let month: u8 = row.get(0)?;
        let status: String = row.get(1)?;
        let total: Money = row.get(2)?;

        if !(1..=12).contains(&month) {
            continue;
        }

        let entry = &mut revenue[month as usize - 1];
        match status.as_str() {
            "paid" => entry.paid = total,
            _ => entry.unpaid = total,
        }
    }

    Ok(revenue)
}

fn dashboard_view(
    year: i32,
    stats: &DashboardStats,
    revenue_by_month: &[MonthRevenue; 12],
    unpaid_payments: &[Payment],
    room_names: &HashMap<RoomId, String>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let card_style = "p-4 bg-white border border-gray-200 rounded-lg shadow-sm
        dark:bg-gray-800 dark:border-gray-700";
    let card_heading_style = "text-sm font-medium text-gray-500 dark:text-gray-400";
    let card_value_style = "mt-1 text-2xl font-semibold text-gray-900 dark:text-white";

    let stat_card = |heading: &str, value: String| {
        html!(
            div class=(card_style)
            {
                h3 class=(card_heading_style) { (heading) }
                p class=(card_value_style) { (value) }
            }
        )
    };

    let unpaid_row = |payment: &Payment| {
        let room_name = room_names
            .get(&payment.room_id)
            .map(String::as_str)
            .unwrap_or("(deleted room)");
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_PAYMENT_VIEW, payment.id);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (room_name) }
                td class=(TABLE_CELL_STYLE) { (payment.month) "/" (payment.year) }
                td class=(TABLE_CELL_STYLE) { (format_currency(payment.total_amount)) }
                td class=(TABLE_CELL_STYLE)
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-8"
            {
                h1 class="text-xl font-bold" { "Dashboard" }

                section class="grid grid-cols-2 gap-4 lg:grid-cols-4"
                {
                    (stat_card("Houses", stats.house_count.to_string()))
                    (stat_card("Rooms", stats.room_count.to_string()))
                    (stat_card(
                        "Occupied / Available / Maintenance",
                        format!("{} / {} / {}", stats.occupied, stats.available, stats.maintenance),
                    ))
                    (stat_card("Occupancy Rate", format!("{}%", stats.occupancy_percent)))
                    (stat_card("Paid Revenue", format_currency(stats.paid_revenue)))
                    (stat_card("Unpaid Revenue", format_currency(stats.unpaid_revenue)))
                }

                section class="space-y-2"
                {
                    h2 class="text-lg font-semibold" { "Revenue in " (year) }

                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Paid" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Unpaid" }
                            }
                        }

                        tbody
                        {
                            @for (index, month_revenue) in revenue_by_month.iter().enumerate() {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td class=(TABLE_CELL_STYLE) { (index + 1) "/" (year) }
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        (format_currency(month_revenue.paid))
                                    }
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        (format_currency(month_revenue.unpaid))
                                    }
                                }
                            }
                        }
                    }
                }

                section class="space-y-2"
                {
                    h2 class="text-lg font-semibold" { "Unpaid Payments" }

                    @if unpaid_payments.is_empty() {
                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            "All bills are settled."
                        }
                    } @else {
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
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                                }
                            }

                            tbody
                            {
                                @for payment in unpaid_payments {
                                    (unpaid_row(payment))
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Dashboard", &[], &content)
}

#[cfg(test)]
mod dashboard_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use time::OffsetDateTime;

    use crate::{
        billing::{MeterReading, Tariff},
        house::{create_house, create_house_table},
        payment::{NewPayment, PaymentStatus, create_payment, create_payment_table},
        room::{NewRoom, RoomStatus, create_room, create_room_table},
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
    };

    use super::{DashboardState, gather_stats, get_dashboard_page, get_revenue_by_month};

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_house_table(&connection).expect("Could not create house table");
        create_room_table(&connection).expect("Could not create room table");
        create_payment_table(&connection).expect("Could not create payment table");
        connection
    }

    fn new_room(house_id: i64, name: &str, status: RoomStatus) -> NewRoom {
        NewRoom {
            house_id,
            name: name.to_string(),
            renter: String::new(),
            phone: String::new(),
            area: 20.0,
            status,
            tariff: Tariff::default(),
            deposit: 0,
            note: String::new(),
        }
    }

    fn new_payment(
        room_id: i64,
        month: u8,
        year: i32,
        status: PaymentStatus,
        total: i64,
    ) -> NewPayment {
        NewPayment {
            room_id,
            month,
            year,
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

    #[test]
    fn gathers_stats() {
        let connection = get_test_db_connection();
        let year = 2024;

        let house = create_house("12 Hang Bac", "", &connection).unwrap();
        create_house("9 Tran Phu", "", &connection).unwrap();

        let rented =
            create_room(new_room(house.id, "Room 101", RoomStatus::Rented), &connection).unwrap();
        create_room(new_room(house.id, "Room 102", RoomStatus::Rented), &connection).unwrap();
        create_room(
            new_room(house.id, "Room 103", RoomStatus::Available),
            &connection,
        )
        .unwrap();
        create_room(
            new_room(house.id, "Room 104", RoomStatus::Maintenance),
            &connection,
        )
        .unwrap();

        create_payment(
            new_payment(rented.id, 4, year, PaymentStatus::Paid, 2_000_000),
            &connection,
        )
        .unwrap();
        create_payment(
            new_payment(rented.id, 5, year, PaymentStatus::Unpaid, 1_500_000),
            &connection,
        )
        .unwrap();
        // A different year must not count towards this year's revenue.
        create_payment(
            new_payment(rented.id, 5, year - 1, PaymentStatus::Paid, 9_000_000),
            &connection,
        )
        .unwrap();

        let stats = gather_stats(year, &connection).unwrap();

        assert_eq!(stats.house_count, 2);
        assert_eq!(stats.room_count, 4);
        assert_eq!(stats.occupied, 2);
        assert_eq!(stats.available, 1);
        assert_eq!(stats.maintenance, 1);
        assert_eq!(stats.occupancy_percent, 50);
        assert_eq!(stats.paid_revenue, 2_000_000);
        assert_eq!(stats.unpaid_revenue, 1_500_000);
    }

    #[test]
    fn occupancy_is_zero_without_rooms() {
        let connection = get_test_db_connection();

        let stats = gather_stats(2024, &connection).unwrap();

        assert_eq!(stats.room_count, 0);
        assert_eq!(stats.occupancy_percent, 0);
    }

    #[test]
    fn aggregates_revenue_by_month() {
        let connection = get_test_db_connection();
        let year = 2024;

        let house = create_house("12 Hang Bac", "", &connection).unwrap();
        let room =
            create_room(new_room(house.id, "Room 101", RoomStatus::Rented), &connection).unwrap();

        create_payment(
            new_payment(room.id, 4, year, PaymentStatus::Paid, 2_000_000),
            &connection,
        )
        .unwrap();
        create_payment(
            new_payment(room.id, 4, year, PaymentStatus::Unpaid, 500_000),
            &connection,
        )
        .unwrap();
        create_payment(
            new_payment(room.id, 11, year, PaymentStatus::Paid, 1_000_000),
            &connection,
        )
        .unwrap();

        let revenue = get_revenue_by_month(year, &connection).unwrap();

        assert_eq!(revenue[3].paid, 2_000_000);
        assert_eq!(revenue[3].unpaid, 500_000);
        assert_eq!(revenue[10].paid, 1_000_000);
        assert_eq!(revenue[0].paid, 0);
    }

    #[tokio::test]
    async fn renders_dashboard_page() {
        let connection = get_test_db_connection();
        let year = OffsetDateTime::now_utc().year();
        {
            let house = create_house("12 Hang Bac", "", &connection).unwrap();
            let room = create_room(
                new_room(house.id, "Room 101", RoomStatus::Rented),
                &connection,
            )
            .unwrap();
            create_payment(
                new_payment(room.id, 5, year, PaymentStatus::Unpaid, 1_500_000),
                &connection,
            )
            .unwrap();
        }
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_dashboard_page(State(state))
            .await
            .expect("Could not get dashboard page");

        assert_status_ok(&response);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Occupancy Rate"));
        assert!(text.contains("100%"));
        assert!(text.contains("Unpaid Payments"));
        assert!(text.contains("Room 101"));
        assert!(text.contains("1.500.000 ₫"));
    }
}
