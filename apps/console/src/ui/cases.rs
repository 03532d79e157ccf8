use dioxus::prelude::*;

use crate::hooks::{self, api_client};
use crate::models::{CaseRecord, CaseStatus, CaseUpdate, User};
use crate::state::{use_app_actions, use_app_state};

#[component]
pub fn CasesPage() -> Element {
    hooks::cases::use_cases_feed();
    hooks::users::use_user_directory();

    let actions = use_app_actions();
    let state = use_app_state();
    let snapshot = state.read();
    let cases = snapshot.cases.clone();
    let users = snapshot.users.items.clone();
    let is_admin = snapshot.current_user().map(|u| u.is_admin).unwrap_or(false);
    drop(snapshot);

    rsx! {
        section { class: "space-y-4 p-6",
            header { class: "flex items-center justify-between",
                div {
                    h1 { class: "text-xl font-semibold text-slate-900", "Cases" }
                    p { class: "text-xs text-slate-500", "Guest incidents with their follow-ups" }
                }
                if is_admin {
                    button {
                        class: "rounded border border-slate-300 px-3 py-1.5 text-xs text-slate-700 hover:bg-slate-100",
                        onclick: move |_| {
                            spawn(async move {
                                if let Some(client) = api_client() {
                                    hooks::cases::reset_daily(client, actions).await;
                                }
                            });
                        },
                        "Daily reset"
                    }
                }
            }

            if cases.is_loading {
                p { class: "text-xs text-slate-500", "Loading cases..." }
            } else if let Some(ref err) = cases.error {
                p { class: "text-xs text-red-600", "Failed to load cases: {err}" }
            } else if cases.items.is_empty() {
                p { class: "text-xs italic text-slate-500", "No cases yet. Upload an incident report to get started." }
            } else {
                div { class: "overflow-x-auto rounded-lg border border-slate-200 bg-white shadow-sm",
                    table { class: "w-full text-left text-sm",
                        thead { class: "bg-slate-50 text-xs uppercase text-slate-500",
                            tr {
                                th { class: "px-4 py-2", "Room" }
                                th { class: "px-4 py-2", "Title" }
                                th { class: "px-4 py-2", "Importance" }
                                th { class: "px-4 py-2", "Status" }
                                th { class: "px-4 py-2", "Assignee" }
                                th { class: "px-4 py-2", "Follow-ups" }
                            }
                        }
                        tbody {
                            for case in cases.items.iter() {
                                CaseRow {
                                    key: "{case.id}",
                                    case: case.clone(),
                                    users: users.clone(),
                                    row_error: cases.row_errors.get(&case.id).cloned(),
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn CaseRow(case: CaseRecord, users: Vec<User>, row_error: Option<String>) -> Element {
    let actions = use_app_actions();
    let case_id = case.id;

    let on_status_change = move |evt: FormEvent| {
        let Some(status) = CaseStatus::from_wire(&evt.value()) else {
            return;
        };
        spawn(async move {
            if let Some(client) = api_client() {
                let patch = CaseUpdate {
                    status: Some(status),
                    ..CaseUpdate::default()
                };
                hooks::cases::update_case(client, actions, case_id, patch).await;
            }
        });
    };

    let on_owner_change = move |evt: FormEvent| {
        // Empty value is the "Unassigned" option: an explicit clear.
        let value = evt.value();
        let owner = if value.is_empty() {
            None
        } else {
            match value.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => return,
            }
        };
        spawn(async move {
            if let Some(client) = api_client() {
                let patch = CaseUpdate {
                    owner_id: Some(owner),
                    ..CaseUpdate::default()
                };
                hooks::cases::update_case(client, actions, case_id, patch).await;
            }
        });
    };

    let room = case.room.clone().unwrap_or_else(|| "—".to_string());

    rsx! {
        tr { class: "border-t border-slate-100 align-top",
            td { class: "px-4 py-2 text-slate-700", "{room}" }
            td { class: "px-4 py-2",
                p { class: "font-medium text-slate-900", "{case.title}" }
                if let Some(ref description) = case.case_description {
                    p { class: "mt-1 text-xs text-slate-500", "{description}" }
                }
                if let Some(ref error) = row_error {
                    p { class: "mt-1 text-xs text-red-600", "{error}" }
                }
            }
            td { class: "px-4 py-2 text-xs text-slate-600", {case.importance.label()} }
            td { class: "px-4 py-2",
                select {
                    class: "rounded border border-slate-300 px-2 py-1 text-xs",
                    onchange: on_status_change,
                    for status in CaseStatus::ALL {
                        option {
                            value: status.as_wire(),
                            selected: status == case.status,
                            {status.label()}
                        }
                    }
                }
            }
            td { class: "px-4 py-2",
                select {
                    class: "rounded border border-slate-300 px-2 py-1 text-xs",
                    onchange: on_owner_change,
                    option { value: "", selected: case.owner_id.is_none(), "Unassigned" }
                    for user in users.iter() {
                        option {
                            value: "{user.id}",
                            selected: Some(user.id) == case.owner_id,
                            "{user.name}"
                        }
                    }
                }
            }
            td { class: "px-4 py-2 text-xs text-slate-600",
                if case.followups.is_empty() {
                    span { class: "italic text-slate-400", "none" }
                } else {
                    ul { class: "space-y-1",
                        for followup in case.followups.iter() {
                            li { key: "{followup.id}", "{followup.suggestion_text}" }
                        }
                    }
                }
            }
        }
    }
}
