use dioxus::prelude::*;
use dioxus_router::prelude::*;

use crate::state::{use_app_actions, use_app_state};
use crate::Route;

#[component]
pub fn NavBar() -> Element {
    let actions = use_app_actions();
    let state = use_app_state();
    let user = state.read().current_user().cloned();

    let user_label = user
        .as_ref()
        .map(|u| {
            if u.is_admin {
                format!("{} (admin)", u.name)
            } else {
                u.name.clone()
            }
        })
        .unwrap_or_default();

    rsx! {
        nav { class: "flex items-center justify-between border-b border-slate-200 bg-white px-6 py-3",
            div { class: "flex items-center gap-6",
                span { class: "text-lg font-semibold text-slate-900", "GuestDesk" }
                Link { class: "text-sm text-slate-600 hover:text-slate-900", to: Route::CasesRoute {}, "Cases" }
                Link { class: "text-sm text-slate-600 hover:text-slate-900", to: Route::FollowupsRoute {}, "Follow-ups" }
                Link { class: "text-sm text-slate-600 hover:text-slate-900", to: Route::TasksRoute {}, "Tasks" }
                Link { class: "text-sm text-slate-600 hover:text-slate-900", to: Route::UploadRoute {}, "Upload" }
                Link { class: "text-sm text-slate-600 hover:text-slate-900", to: Route::AssistantRoute {}, "Email assistant" }
            }
            div { class: "flex items-center gap-3",
                span { class: "text-xs text-slate-500", "{user_label}" }
                button {
                    class: "rounded border border-slate-300 px-3 py-1 text-xs text-slate-700 hover:bg-slate-100",
                    onclick: move |_| actions.logout(),
                    "Sign out"
                }
            }
        }
    }
}
