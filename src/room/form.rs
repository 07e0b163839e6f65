//! The room form shared by the create and edit pages.

use maud::{Markup, html};

use crate::{
    house::House,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
    },
    room::{RoomFormData, RoomStatus},
};

const STATUS_CHOICES: [RoomStatus; 3] = [
    RoomStatus::Available,
    RoomStatus::Rented,
    RoomStatus::Maintenance,
];

/// Render the room form.
///
/// Exactly one of `post_endpoint` and `put_endpoint` should be set, which
/// decides whether submitting creates or updates a room.
pub(super) fn room_form_view(
    post_endpoint: Option<&str>,
    put_endpoint: Option<&str>,
    houses: &[House],
    values: &RoomFormData,
    submit_label: &str,
    error_message: &str,
) -> Markup {
    let text_field = |id: &str, label: &str, value: &str, required: bool| {
        html! {
            div
            {
                label for=(id) class=(FORM_LABEL_STYLE) { (label) }

                input
                    id=(id)
                    type="text"
                    name=(id)
                    value=(value)
                    required[required]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    };

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
                label for="house_id" class=(FORM_LABEL_STYLE) { "House" }

                select
                    id="house_id"
                    name="house_id"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for house in houses {
                        option
                            value=(house.id)
                            selected[house.id.to_string() == values.house_id]
                        {
                            (house.address)
                        }
                    }
                }
            }

            (text_field("name", "Room Name", &values.name, true))
            (text_field("renter", "Renter", &values.renter, false))
            (text_field("phone", "Phone", &values.phone, false))

            div
            {
                label for="area" class=(FORM_LABEL_STYLE) { "Area (m²)" }

                input
                    id="area"
                    type="number"
                    name="area"
                    value=(values.area)
                    min="0"
                    step="0.1"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Status" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    @for status in STATUS_CHOICES {
                        div class="flex items-center gap-2"
                        {
                            input
                                id={ "status_" (status.as_str()) }
                                type="radio"
                                name="status"
                                value=(status.as_str())
                                checked[values.status == status.as_str()]
                                class=(FORM_RADIO_INPUT_STYLE);

                            label
                                for={ "status_" (status.as_str()) }
                                class=(FORM_RADIO_LABEL_STYLE)
                            {
                                (status)
                            }
                        }
                    }
                }
            }

            (number_field("room_price", "Room Price (₫/month)", &values.room_price))
            (number_field("elect_unit_price", "Electricity Price (₫/kWh)", &values.elect_unit_price))
            (number_field("water_unit_price", "Water Price (₫/m³)", &values.water_unit_price))
            (number_field("trash_fee", "Trash Fee (₫)", &values.trash_fee))
            (number_field("parking_fee", "Parking Fee (₫)", &values.parking_fee))
            (number_field("washing_machine_fee", "Washing Machine Fee (₫)", &values.washing_machine_fee))
            (number_field("elevator_fee", "Elevator Fee (₫)", &values.elevator_fee))
            (number_field("deposit", "Deposit (₫)", &values.deposit))

            (text_field("note", "Note", &values.note, false))

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
