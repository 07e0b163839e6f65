//! Houses listing page.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    house::{House, HouseId, get_all_houses},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links,
    },
    navigation::NavBar,
};

/// The state needed for the houses listing page.
#[derive(Debug, Clone)]
pub struct HousesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for HousesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A house with its formatted URLs for template rendering.
#[derive(Debug, Clone)]
struct HouseRowView {
    pub house: House,
    pub edit_url: String,
    pub rooms_url: String,
    pub room_count: u32,
}

/// Render the houses listing page with room counts.
pub async fn get_houses_page(State(state): State<HousesPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let houses = get_all_houses(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve houses: {error}"))?;

    let rooms_per_house = count_rooms_per_house(&connection)
        .inspect_err(|error| tracing::error!("Could not count rooms per house: {error}"))?;

    let house_rows = houses
        .into_iter()
        .map(|house| {
            let room_count = *rooms_per_house.get(&house.id).unwrap_or(&0);

            HouseRowView {
                edit_url: endpoints::format_endpoint(endpoints::EDIT_HOUSE_VIEW, house.id),
                rooms_url: format!("{}?house_id={}", endpoints::ROOMS_VIEW, house.id),
                house,
                room_count,
            }
        })
        .collect::<Vec<_>>();

    Ok(houses_view(&house_rows).into_response())
}

fn count_rooms_per_house(connection: &Connection) -> Result<HashMap<HouseId, u32>, Error> {
    let result: Result<HashMap<HouseId, u32>, rusqlite::Error> = connection
        .prepare("SELECT house_id, COUNT(1) FROM room GROUP BY house_id")?
        .query_map((), |row| {
            let house_id = row.get(0)?;
            let count = row.get(1)?;

            Ok((house_id, count))
        })?
        .collect();

    result.map_err(Error::from)
}

fn houses_view(houses: &[HouseRowView]) -> Markup {
    let new_house_route = endpoints::NEW_HOUSE_VIEW;
    let nav_bar = NavBar::new(endpoints::HOUSES_VIEW).into_html();

    let table_row = |house_row: &HouseRowView| {
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_HOUSE, house_row.house.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? This will also delete its {} room(s) and their payments.",
            house_row.house.address, house_row.room_count
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    (house_row.house.address)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    a href=(house_row.rooms_url) class=(LINK_STYLE)
                    {
                        (house_row.room_count) " room(s)"
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (house_row.house.note)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &house_row.edit_url,
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
                    h1 class="text-xl font-bold" { "Houses" }

                    a href=(new_house_route) class=(LINK_STYLE)
                    {
                        "Create House"
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
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Address"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Rooms"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Note"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Actions"
                                }
                            }
                        }

                        tbody
                        {
                            @for house_row in houses {
                                (table_row(house_row))
                            }

                            @if houses.is_empty() {
                                tr
                                {
                                    td
                                        colspan="4"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No houses created yet. "
                                        a href=(new_house_route) class=(LINK_STYLE)
                                        {
                                            "Create your first house"
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

    base("Houses", &[], &content)
}
