//! Reusable price templates for setting up new rooms quickly.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod list;

pub use create::{create_price_endpoint, get_new_price_page};
pub use db::{create_price, create_price_table, delete_price, get_all_prices, get_price, update_price};
pub use delete::delete_price_endpoint;
pub use domain::{NewPrice, Price, PriceFormData, PriceId};
pub use edit::{get_edit_price_page, update_price_endpoint};
pub use list::get_prices_page;
