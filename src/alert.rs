//! Dismissible alerts that htmx swaps into the alert container on a page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// A pop-up message displayed at the top of the page.
///
/// Forms render these into `#alert-container` via `hx-target-error`, so the
/// user keeps their form input when a request fails.
pub enum Alert {
    /// Indicates an action succeeded, with extra details.
    Success {
        /// A short title summarising the outcome.
        message: String,
        /// A longer description of the outcome.
        details: String,
    },
    /// Indicates an action succeeded.
    SuccessSimple {
        /// A short title summarising the outcome.
        message: String,
    },
    /// Indicates an action failed and why.
    Error {
        /// A short title summarising what went wrong.
        message: String,
        /// A longer description of what went wrong and what to do about it.
        details: String,
    },
}

impl Alert {
    /// Render an error alert as a complete response with `status`.
    ///
    /// htmx needs an error status code to route the response into
    /// `hx-target-error` rather than the regular target.
    pub fn error(status: StatusCode, message: &str, details: &str) -> Response {
        (
            status,
            Alert::Error {
                message: message.to_owned(),
                details: details.to_owned(),
            }
            .into_markup(),
        )
            .into_response()
    }

    fn into_markup(self) -> Markup {
        let (container_style, title_style, title, details) = match self {
            Alert::Success { message, details } => (
                "bg-green-100 border-green-400 text-green-800",
                "text-green-900",
                message,
                details,
            ),
            Alert::SuccessSimple { message } => (
                "bg-green-100 border-green-400 text-green-800",
                "text-green-900",
                message,
                String::new(),
            ),
            Alert::Error { message, details } => (
                "bg-red-100 border-red-400 text-red-800",
                "text-red-900",
                message,
                details,
            ),
        };

        html! {
            div class=(format!("flex justify-between gap-4 border rounded-lg p-4 mb-4 {container_style}")) role="alert" {
                div {
                    p class=(format!("font-bold {title_style}")) { (title) }
                    @if !details.is_empty() {
                        p { (details) }
                    }
                }
                button type="button" class="font-bold cursor-pointer self-start"
                    onclick="this.closest('[role=alert]').remove()" { "✕" }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_markup().into_response()
    }
}

#[cfg(test)]
mod alert_tests {
    use axum::http::StatusCode;
    use scraper::Html;

    use crate::{
        alert::Alert,
        test_utils::{assert_valid_html, parse_html_fragment},
    };

    async fn parse_alert(alert: Alert) -> Html {
        let response = axum::response::IntoResponse::into_response(alert);
        parse_html_fragment(response).await
    }

    #[tokio::test]
    async fn success_alert_renders_message_and_details() {
        let html = parse_alert(Alert::Success {
            message: "Saved".to_owned(),
            details: "The room was updated.".to_owned(),
        })
        .await;

        assert_valid_html(&html);
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Saved"));
        assert!(text.contains("The room was updated."));
    }

    #[tokio::test]
    async fn error_response_carries_status_and_details() {
        let response = Alert::error(
            StatusCode::BAD_REQUEST,
            "Invalid month",
            "13 is not a valid month.",
        );

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Invalid month"));
        assert!(text.contains("13 is not a valid month."));
    }
}
