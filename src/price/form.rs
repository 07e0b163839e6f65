//! The price template form shared by the create and edit pages.

use maud::{Markup, html};

use crate::{
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    price::PriceFormData,
};

/// Render the price template form.
///
/// Exactly one of `post_endpoint` and `put_endpoint` should be set, which
/// decides whether submitting creates or updates a template.
pub(super) fn price_form_view(
    post_endpoint: Option<&str>,
    put_endpoint: Option<&str>,
    values: &PriceFormData,
    submit_label: &str,
    error_message: &str,
) -> Markup {
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

    html! {
        form
            hx-post=[post_endpoint]
            hx-put=[put_endpoint]
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="price_name" class=(FORM_LABEL_STYLE) { "Template Name" }

                input
                    id="price_name"
                    type="text"
                    name="price_name"
                    placeholder="Template Name"
                    value=(values.price_name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (number_field("room_price", "Room Price (₫/month)", &values.room_price))
            (number_field("elect_unit_price", "Electricity Price (₫/kWh)", &values.elect_unit_price))
            (number_field("water_unit_price", "Water Price (₫/m³)", &values.water_unit_price))
            (number_field("trash_fee", "Trash Fee (₫)", &values.trash_fee))
            (number_field("parking_fee", "Parking Fee (₫)", &values.parking_fee))
            (number_field("washing_machine_fee", "Washing Machine Fee (₫)", &values.washing_machine_fee))
            (number_field("elevator_fee", "Elevator Fee (₫)", &values.elevator_fee))
            (number_field("deposit", "Deposit (₫)", &values.deposit))

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
        }
    }
}
