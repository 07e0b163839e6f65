//! Price templates listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
    price::{Price, get_all_prices},
};

/// The state needed for the price templates listing page.
#[derive(Debug, Clone)]
pub struct PricesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PricesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the price templates listing page.
pub async fn get_prices_page(State(state): State<PricesPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let prices = get_all_prices(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve price templates: {error}"))?;

    Ok(prices_view(&prices).into_response())
}

fn prices_view(prices: &[Price]) -> Markup {
    let new_price_route = endpoints::NEW_PRICE_VIEW;
    let nav_bar = NavBar::new(endpoints::PRICES_VIEW).into_html();

    let table_row = |price: &Price| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_PRICE_VIEW, price.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_PRICE, price.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? Rooms keep their own copy of these prices.",
            price.price_name
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    (price.price_name)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (format_currency(price.tariff.room_price))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (format_currency(price.tariff.elect_unit_price))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (format_currency(price.tariff.water_unit_price))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (format_currency(price.deposit))
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

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Price Templates" }

                    a href=(new_price_route) class=(LINK_STYLE)
                    {
                        "Create Price Template"
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
                                th scope="col" class=(TABLE_CELL_STYLE) { "Room Price" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Electricity" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Water" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Deposit" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for price in prices {
                                (table_row(price))
                            }

                            @if prices.is_empty() {
                                tr
                                {
                                    td
                                        colspan="6"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No price templates created yet. "
                                        a href=(new_price_route) class=(LINK_STYLE)
                                        {
                                            "Create your first price template"
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

    base("Price Templates", &[], &content)
}

#[cfg(test)]
mod prices_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;

    use crate::{
        billing::Tariff,
        price::{NewPrice, create_price, create_price_table, get_prices_page},
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
    };

    use super::PricesPageState;

    #[tokio::test]
    async fn renders_prices_page() {
        let connection = Connection::open_in_memory().unwrap();
        create_price_table(&connection).expect("Could not create price table");
        create_price(
            NewPrice {
                price_name: "Standard".to_string(),
                tariff: Tariff {
                    room_price: 2_000_000,
                    ..Tariff::default()
                },
                deposit: 0,
            },
            &connection,
        )
        .unwrap();
        let state = PricesPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_prices_page(State(state))
            .await
            .expect("Could not get prices page");

        assert_status_ok(&response);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Standard"));
        assert!(text.contains("2.000.000 ₫"));
    }
}
