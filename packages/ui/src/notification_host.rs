use dioxus::prelude::*;

use crate::icons::{FaCircleCheck, FaCircleInfo, FaCircleXmark, FaTriangleExclamation, FaXmark};
use crate::notifier::{dismiss, invoke_action, Severity, NOTIFICATIONS};
use crate::Icon;

const NOTIFIER_CSS: Asset = asset!("/assets/styling/notifier.css");

/// Renders queued notifications. Mount once near the root of the app.
#[component]
pub fn NotificationHost() -> Element {
    let entries = NOTIFICATIONS.read().entries().to_vec();

    rsx! {
        document::Stylesheet { href: NOTIFIER_CSS }

        div {
            class: "notifier-stack",
            role: "status",
            for entry in entries {
                div {
                    key: "{entry.id}",
                    class: "{entry.class()}",
                    span {
                        class: "notifier-icon",
                        {severity_icon(entry.severity)}
                    }
                    span { class: "notifier-message", "{entry.message}" }
                    if let Some(label) = entry.options.action_label.clone() {
                        button {
                            class: "notifier-action",
                            onclick: {
                                let id = entry.id;
                                move |_| invoke_action(id)
                            },
                            "{label}"
                        }
                    }
                    button {
                        class: "notifier-close",
                        title: "Fechar",
                        onclick: {
                            let id = entry.id;
                            move |_| dismiss(id)
                        },
                        Icon { icon: FaXmark, width: 12, height: 12 }
                    }
                }
            }
        }
    }
}

fn severity_icon(severity: Severity) -> Element {
    match severity {
        Severity::Info => rsx! { Icon { icon: FaCircleInfo, width: 14, height: 14 } },
        Severity::Warning => rsx! { Icon { icon: FaTriangleExclamation, width: 14, height: 14 } },
        Severity::Error => rsx! { Icon { icon: FaCircleXmark, width: 14, height: 14 } },
        Severity::Success => rsx! { Icon { icon: FaCircleCheck, width: 14, height: 14 } },
    }
}
