use dioxus::prelude::*;
use ui::SessionProvider;

use crate::Route;

/// Landing page. Public, so the guard only starts and stops.
#[component]
pub fn Home() -> Element {
    rsx! {
        SessionProvider {
            page: "index.html",
            div {
                class: "page",
                h1 { "Astrônomo" }
                p { "Registro de observações, rotas e despesas." }
                nav {
                    class: "page-links",
                    Link { to: Route::Painel {}, "Painel" }
                    Link { to: Route::Page { page: "rotas.html".to_string() }, "Rotas" }
                    Link { to: Route::Page { page: "historico.html".to_string() }, "Histórico" }
                    Link { to: Route::Login {}, "Entrar" }
                }
            }
        }
    }
}
