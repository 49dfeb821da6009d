use dioxus::prelude::*;
use ui::{use_session, SessionProvider};

use crate::Route;

/// Any other page by file name. Public pages render for everyone; the rest
/// require a session.
#[component]
pub fn Page(page: String) -> Element {
    rsx! {
        SessionProvider {
            page: page.clone(),
            PageContent { page: page.clone() }
        }
    }
}

#[component]
fn PageContent(page: String) -> Element {
    let session = use_session();
    let title = page.trim_end_matches(".html").to_string();

    rsx! {
        div {
            class: "page",
            h1 { "{title}" }
            if let Some(s) = session.session() {
                p { "Sessão ativa: {s.usuario().unwrap_or_default()}" }
            }
            Link { to: Route::Home {}, "Início" }
        }
    }
}
