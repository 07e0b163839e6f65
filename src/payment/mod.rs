//! Monthly payment records, one bill per room per period.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::{create_payment_endpoint, get_new_payment_page};
pub use db::{
    create_payment, create_payment_table, delete_payment, get_payment, get_payments,
    get_recent_periods, update_payment,
};
pub use delete::delete_payment_endpoint;
pub use domain::{
    NewPayment, Payment, PaymentFilter, PaymentFormData, PaymentId, PaymentStatus, PaymentUpdate,
};
pub use edit::{get_edit_payment_page, update_payment_endpoint};
pub use list::get_payments_page;
