//! Rooms listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    house::{HouseId, get_house},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, STATUS_BADGE_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
    room::{Room, get_all_rooms},
};

/// The state needed for the rooms listing page.
#[derive(Debug, Clone)]
pub struct RoomsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RoomsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for the rooms listing page.
#[derive(Debug, Deserialize)]
pub struct RoomsQuery {
    /// Restrict the listing to rooms in one house. Garbage values are
    /// ignored rather than rejected so stale links still render the page.
    pub house_id: Option<String>,
}

/// Render the rooms listing page, optionally filtered by house.
pub async fn get_rooms_page(
    Query(query): Query<RoomsQuery>,
    State(state): State<RoomsPageState>,
) -> Result<Response, Error> {
    let house_filter: Option<HouseId> = query
        .house_id
        .as_deref()
        .and_then(|raw| raw.trim().parse().ok());

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let rooms = get_all_rooms(house_filter, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve rooms: {error}"))?;

    let filtered_house_address = match house_filter {
        Some(house_id) => match get_house(house_id, &connection) {
            Ok(house) => Some(house.address),
            Err(Error::NotFound) => None,
            Err(error) => return Err(error),
        },
        None => None,
    };

    Ok(rooms_view(&rooms, filtered_house_address.as_deref()).into_response())
}

fn rooms_view(rooms: &[Room], filtered_house_address: Option<&str>) -> Markup {
    let new_room_route = endpoints::NEW_ROOM_VIEW;
    let nav_bar = NavBar::new(endpoints::ROOMS_VIEW).into_html();

    let heading = match filtered_house_address {
        Some(address) => format!("Rooms at {address}"),
        None => "Rooms".to_string(),
    };

    let table_row = |room: &Room| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_ROOM_VIEW, room.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_ROOM, room.id);
        let new_bill_url = format!("{}?room_id={}", endpoints::NEW_PAYMENT_VIEW, room.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? This will also delete its payments.",
            room.name
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    (room.name)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (room.renter)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    span class=(STATUS_BADGE_STYLE)
                    {
                        (room.status)
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (format_currency(room.tariff.room_price))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (format_currency(room.deposit))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        a href=(new_bill_url) class=(LINK_STYLE)
                        {
                            "New Bill"
                        }

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

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { (heading) }

                    a href=(new_room_route) class=(LINK_STYLE)
                    {
                        "Create Room"
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
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Renter" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Room Price" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Deposit" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for room in rooms {
                                (table_row(room))
                            }

                            @if rooms.is_empty() {
                                tr
                                {
                                    td
                                        colspan="6"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No rooms here yet. "
                                        a href=(new_room_route) class=(LINK_STYLE)
                                        {
                                            "Create your first room"
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

    base("Rooms", &[], &content)
}
