use dioxus::prelude::*;

use crate::hooks::{self, api_client};
use crate::models::{CaseStatus, Followup, FollowupUpdate, User};
use crate::state::{use_app_actions, use_app_state};
use crate::ui::confirm;

#[component]
pub fn FollowupsPage() -> Element {
    hooks::followups::use_followups_feed();
    hooks::users::use_user_directory();

    let state = use_app_state();
    let snapshot = state.read();
    let followups = snapshot.followups.clone();
    let users = snapshot.users.items.clone();
    drop(snapshot);

    rsx! {
        section { class: "space-y-4 p-6",
            header {
                h1 { class: "text-xl font-semibold text-slate-900", "Follow-ups" }
                p { class: "text-xs text-slate-500", "Action items seeded from AI suggestions" }
            }

            if followups.is_loading {
                p { class: "text-xs text-slate-500", "Loading follow-ups..." }
            } else if let Some(ref err) = followups.error {
                p { class: "text-xs text-red-600", "Failed to load follow-ups: {err}" }
            } else if followups.items.is_empty() {
                p { class: "text-xs italic text-slate-500", "No follow-ups yet." }
            } else {
                div { class: "overflow-x-auto rounded-lg border border-slate-200 bg-white shadow-sm",
                    table { class: "w-full text-left text-sm",
                        thead { class: "bg-slate-50 text-xs uppercase text-slate-500",
                            tr {
                                th { class: "px-4 py-2", "Case" }
                                th { class: "px-4 py-2", "Suggestion" }
                                th { class: "px-4 py-2", "Status" }
                                th { class: "px-4 py-2", "Assignee" }
                                th { class: "px-4 py-2", "" }
                            }
                        }
                        tbody {
                            for followup in followups.items.iter() {
                                FollowupRow {
                                    key: "{followup.id}",
                                    followup: followup.clone(),
                                    users: users.clone(),
                                    row_error: followups.row_errors.get(&followup.id).cloned(),
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
fn FollowupRow(followup: Followup, users: Vec<User>, row_error: Option<String>) -> Element {
    let actions = use_app_actions();
    let followup_id = followup.id;

    let on_status_change = move |evt: FormEvent| {
        let Some(status) = CaseStatus::from_wire(&evt.value()) else {
            return;
        };
        spawn(async move {
            if let Some(client) = api_client() {
                let patch = FollowupUpdate {
                    status: Some(status),
                    ..FollowupUpdate::default()
                };
                hooks::followups::update_followup(client, actions, followup_id, patch).await;
            }
        });
    };

    let on_assignee_change = move |evt: FormEvent| {
        // Empty value is the "Unassigned" option: an explicit clear.
        let value = evt.value();
        let assignee = if value.is_empty() {
            None
        } else {
            match value.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => return,
            }
        };
        spawn(async move {
            if let Some(client) = api_client() {
                let patch = FollowupUpdate {
                    assigned_to: Some(assignee),
                    ..FollowupUpdate::default()
                };
                hooks::followups::update_followup(client, actions, followup_id, patch).await;
            }
        });
    };

    let on_delete = move |_| {
        if !confirm("Delete this follow-up? This cannot be undone.") {
            return;
        }
        spawn(async move {
            if let Some(client) = api_client() {
                hooks::followups::delete_followup(client, actions, followup_id).await;
            }
        });
    };

    let case_label = followup
        .case_title
        .clone()
        .unwrap_or_else(|| format!("Case #{}", followup.case_id));
    let room = followup.room.clone().unwrap_or_default();

    rsx! {
        tr { class: "border-t border-slate-100 align-top",
            td { class: "px-4 py-2",
                p { class: "font-medium text-slate-900", "{case_label}" }
                if !room.is_empty() {
                    p { class: "text-xs text-slate-500", "Room {room}" }
                }
            }
            td { class: "px-4 py-2 text-slate-700",
                "{followup.suggestion_text}"
                if let Some(ref error) = row_error {
                    p { class: "mt-1 text-xs text-red-600", "{error}" }
                }
            }
            td { class: "px-4 py-2",
                select {
                    class: "rounded border border-slate-300 px-2 py-1 text-xs",
                    onchange: on_status_change,
                    for status in CaseStatus::ALL {
                        option {
                            value: status.as_wire(),
                            selected: status == followup.status,
                            {status.label()}
                        }
                    }
                }
            }
            td { class: "px-4 py-2",
                select {
                    class: "rounded border border-slate-300 px-2 py-1 text-xs",
                    onchange: on_assignee_change,
                    option { value: "", selected: followup.assigned_to.is_none(), "Unassigned" }
                    for user in users.iter() {
                        option {
                            value: "{user.id}",
                            selected: Some(user.id) == followup.assigned_to,
                            "{user.name}"
                        }
                    }
                }
            }
            td { class: "px-4 py-2",
                button {
                    class: "text-xs text-red-600 hover:underline",
                    onclick: on_delete,
                    "Delete"
                }
            }
        }
    }
}
