//! Landing page

use std::sync::Arc;

use axum::{Router, extract::State, response::Html, routing::get};

use super::AppState;
use crate::greeting::current_greeting;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

/// Build landing page router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new().route("/", get(index)).with_state(state)
}

/// Render the page and start a fresh default conversation
async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    state.conversations.clear(None).await;
    Html(render_index(&current_greeting()))
}

/// Substitute the greeting into the page template
#[must_use]
pub fn render_index(greeting: &str) -> String {
    INDEX_TEMPLATE.replace("{{ greeting }}", &escape_html(greeting))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_is_embedded_and_escaped() {
        let page = render_index("Good <b>morning</b>, Sir!");
        assert!(page.contains("Good &lt;b&gt;morning&lt;/b&gt;, Sir!"));
        assert!(!page.contains("{{ greeting }}"));
    }
}
