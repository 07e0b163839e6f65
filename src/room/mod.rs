//! Room management, the rentable units inside houses.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod list;

pub use create::{create_room_endpoint, get_new_room_page};
pub use db::{create_room, create_room_table, delete_room, get_all_rooms, get_room, update_room};
pub use delete::delete_room_endpoint;
pub use domain::{NewRoom, Room, RoomFormData, RoomId, RoomStatus};
pub use edit::{get_edit_room_page, update_room_endpoint};
pub use list::get_rooms_page;
