//! Login page: records who is observing. Credentials are not checked here.

use auth::{Clock, Session, SystemClock, PRIMARY_KEY};
use dioxus::prelude::*;
use store::KeyValueStore;
use ui::{make_store, show, NotifyOptions, SessionProvider, Severity};

use crate::Route;

#[component]
pub fn Login() -> Element {
    let mut usuario = use_signal(String::new);
    let nav = use_navigator();

    let onsubmit = move |event: FormEvent| {
        event.prevent_default();
        let name = usuario().trim().to_string();
        if name.is_empty() {
            show("Informe o usuário.", Severity::Warning, None, NotifyOptions::default());
            return;
        }

        let session = Session::for_user(&name, SystemClock.now_millis());
        match make_store().set(PRIMARY_KEY, &session.to_json()) {
            Ok(()) => {
                tracing::info!("session stored for `{name}`");
                nav.replace(Route::Painel {});
            }
            Err(err) => {
                tracing::error!("failed to store session: {err}");
                show(
                    "Não foi possível salvar a sessão neste navegador.",
                    Severity::Error,
                    Some(0),
                    NotifyOptions::default(),
                );
            }
        }
    };

    rsx! {
        SessionProvider {
            page: "login.html",
            div {
                class: "page login",
                h1 { "Entrar" }
                form {
                    onsubmit: onsubmit,
                    input {
                        r#type: "text",
                        placeholder: "Usuário",
                        value: "{usuario}",
                        oninput: move |event| usuario.set(event.value()),
                    }
                    button { r#type: "submit", "Entrar" }
                }
            }
        }
    }
}
