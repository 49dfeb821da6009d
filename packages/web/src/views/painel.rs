use dioxus::prelude::*;
use ui::{show, show_no_data, use_session, LogoutButton, NotifyOptions, SessionProvider, Severity};

use crate::Route;

/// Dashboard. Guarded: without a session the provider redirects to the login page.
#[component]
pub fn Painel() -> Element {
    rsx! {
        SessionProvider {
            page: "painel.html",
            PainelContent {}
        }
    }
}

#[component]
fn PainelContent() -> Element {
    let session = use_session();
    let nav = use_navigator();
    let name = session
        .session()
        .and_then(|s| s.astronomo().or(s.usuario()))
        .unwrap_or("astrônomo")
        .to_string();
    let id = session
        .session()
        .and_then(|s| s.id_astronomo())
        .map(|id| id.to_string());

    // No observation feed yet.
    use_effect(move || {
        show_no_data("Nenhuma observação registrada.");
    });

    let on_refresh = move |_| {
        let options = NotifyOptions::default().with_action("Ver rotas", move || {
            nav.push(Route::Page { page: "rotas.html".to_string() });
        });
        show("Painel atualizado.", Severity::Success, None, options);
    };

    rsx! {
        div {
            class: "page painel",
            h1 { "Olá, {name}" }
            if let Some(id) = id {
                p { class: "painel-id", "Identificador: {id}" }
            }
            div {
                class: "painel-actions",
                button { onclick: on_refresh, "Atualizar" }
                LogoutButton { class: "logout-btn" }
            }
        }
    }
}
