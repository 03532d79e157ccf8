use dioxus::prelude::*;

use crate::state::{use_app_actions, use_app_state};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    fn accent_classes(self) -> (&'static str, &'static str) {
        match self {
            Self::Success => ("border-emerald-500 bg-emerald-50", "text-emerald-700"),
            Self::Error => ("border-red-500 bg-red-50", "text-red-700"),
        }
    }
}

#[component]
pub fn NotificationCenter() -> Element {
    let actions = use_app_actions();
    let operation = use_app_state().read().operation.clone();

    let (kind, message) = if let Some(error) = operation.error.clone() {
        (ToastKind::Error, error)
    } else if let Some(message) = operation.last_message.clone() {
        (ToastKind::Success, message)
    } else {
        return rsx! { Fragment {} };
    };

    let title = operation.context.unwrap_or_else(|| match kind {
        ToastKind::Success => "Done".to_string(),
        ToastKind::Error => "Something went wrong".to_string(),
    });
    let (container_class, accent_text) = kind.accent_classes();

    rsx! {
        div { class: "pointer-events-none fixed right-4 top-4 z-50 flex w-80 flex-col gap-3",
            div { class: "pointer-events-auto rounded-lg border-l-4 p-4 shadow-lg {container_class}",
                div { class: "flex items-start justify-between gap-4",
                    div { class: "space-y-1",
                        h3 { class: "text-sm font-semibold {accent_text}", "{title}" }
                        p { class: "text-xs text-slate-700", "{message}" }
                    }
                    button {
                        class: "rounded bg-slate-200 px-2 py-1 text-[11px] text-slate-600 transition hover:bg-slate-300",
                        onclick: move |_| actions.clear_operation_status(),
                        "Dismiss"
                    }
                }
            }
        }
    }
}
