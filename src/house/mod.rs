//! House management, the buildings that rooms belong to.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::{create_house_endpoint, get_new_house_page};
pub use db::{create_house, create_house_table, delete_house, get_all_houses, get_house, update_house};
pub use delete::delete_house_endpoint;
pub use domain::{House, HouseData, HouseId};
pub use edit::{get_edit_house_page, update_house_endpoint};
pub use list::get_houses_page;
