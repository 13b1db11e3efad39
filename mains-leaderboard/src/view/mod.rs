use maud::{html, Markup, DOCTYPE};

use crate::dashboard::{PageId, SESSION_HEADER};

pub mod details;
pub mod home;
pub mod widgets;

// Error responses still swap so widgets can show their error text.
const HTMX_CONFIG: &str = r#"{"responseHandling":[{"code":"204","swap":false},{"code":"[23]..","swap":true},{"code":"[45]..","swap":true,"error":true}]}"#;

pub fn base(title: &str, page_id: Option<&PageId>, content: Markup) -> Markup {
    let hx_headers = page_id.map(|id| format!(r#"{{"{SESSION_HEADER}": "{id}"}}"#));

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="htmx-config" content=(HTMX_CONFIG);
                @if let Some(id) = page_id {
                    meta name="dashboard-session" content=(id.as_str());
                }
                title { (title) }
                script src="https://unpkg.com/htmx.org@2.0.4" {}
                script src="https://cdn.tailwindcss.com" {}
            }
            body class="min-h-screen bg-gray-100" hx-headers=[hx_headers] {
                (content)
            }
        }
    }
}
