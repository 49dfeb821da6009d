use dioxus::prelude::*;

use ui::NotificationHost;
use views::{Home, Login, Page, Painel};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Home {},
    #[route("/login.html")]
    Login {},
    #[route("/painel.html")]
    Painel {},
    #[route("/:page")]
    Page { page: String },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        NotificationHost {}
        Router::<Route> {}
    }
}
