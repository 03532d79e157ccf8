use dioxus::prelude::*;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::hooks::{self, api_client};
use crate::models::{Task, TaskCreate, TaskStatus, TaskType, TaskUpdate, User};
use crate::state::{use_app_actions, use_app_state};
use crate::ui::confirm;

fn today() -> String {
    let format = format_description!("[year]-[month]-[day]");
    OffsetDateTime::now_utc()
        .date()
        .format(&format)
        .unwrap_or_default()
}

#[component]
pub fn TasksPage() -> Element {
    hooks::tasks::use_tasks_feed();
    hooks::users::use_user_directory();

    let actions = use_app_actions();
    let state = use_app_state();
    let snapshot = state.read();
    let tasks = snapshot.tasks.clone();
    let users = snapshot.users.items.clone();
    let is_admin = snapshot.current_user().map(|u| u.is_admin).unwrap_or(false);
    drop(snapshot);

    let mut new_title = use_signal(String::new);
    let mut new_type = use_signal(|| TaskType::Custom);

    let on_create = move |_| {
        let title = new_title().trim().to_string();
        if title.is_empty() {
            return;
        }
        let task = TaskCreate {
            title,
            description: None,
            task_type: new_type(),
            assigned_to: None,
            due_date: Some(today()),
            status: TaskStatus::Pending,
        };
        new_title.set(String::new());
        spawn(async move {
            if let Some(client) = api_client() {
                hooks::tasks::create_task(client, actions, task).await;
            }
        });
    };

    rsx! {
        section { class: "space-y-4 p-6",
            header { class: "flex items-center justify-between",
                div {
                    h1 { class: "text-xl font-semibold text-slate-900", "Tasks" }
                    p { class: "text-xs text-slate-500", "Daily guest-relations duties" }
                }
                if is_admin {
                    button {
                        class: "rounded border border-slate-300 px-3 py-1.5 text-xs text-slate-700 hover:bg-slate-100",
                        onclick: move |_| {
                            let task_date = today();
                            spawn(async move {
                                if let Some(client) = api_client() {
                                    hooks::tasks::create_daily_tasks(client, actions, task_date).await;
                                }
                            });
                        },
                        "Generate daily tasks"
                    }
                }
            }

            div { class: "flex items-end gap-2 rounded-lg border border-slate-200 bg-white p-4 shadow-sm",
                div { class: "flex-1",
                    label { class: "block text-xs font-medium text-slate-600", "New task" }
                    input {
                        class: "mt-1 w-full rounded border border-slate-300 px-3 py-1.5 text-sm",
                        placeholder: "Task title",
                        value: "{new_title}",
                        oninput: move |evt| new_title.set(evt.value()),
                    }
                }
                div {
                    label { class: "block text-xs font-medium text-slate-600", "Type" }
                    select {
                        class: "mt-1 rounded border border-slate-300 px-2 py-1.5 text-sm",
                        onchange: move |evt| {
                            if let Some(task_type) = TaskType::from_wire(&evt.value()) {
                                new_type.set(task_type);
                            }
                        },
                        for task_type in TaskType::ALL {
                            option {
                                value: task_type.as_wire(),
                                selected: task_type == new_type(),
                                {task_type.label()}
                            }
                        }
                    }
                }
                button {
                    class: "rounded bg-slate-900 px-4 py-1.5 text-sm font-semibold text-white hover:bg-slate-800",
                    onclick: on_create,
                    "Add"
                }
            }

            if tasks.is_loading {
                p { class: "text-xs text-slate-500", "Loading tasks..." }
            } else if let Some(ref err) = tasks.error {
                p { class: "text-xs text-red-600", "Failed to load tasks: {err}" }
            } else if tasks.items.is_empty() {
                p { class: "text-xs italic text-slate-500", "No tasks for today." }
            } else {
                div { class: "overflow-x-auto rounded-lg border border-slate-200 bg-white shadow-sm",
                    table { class: "w-full text-left text-sm",
                        thead { class: "bg-slate-50 text-xs uppercase text-slate-500",
                            tr {
                                th { class: "px-4 py-2", "Task" }
                                th { class: "px-4 py-2", "Type" }
                                th { class: "px-4 py-2", "Due" }
                                th { class: "px-4 py-2", "Status" }
                                th { class: "px-4 py-2", "Assignee" }
                                th { class: "px-4 py-2", "" }
                            }
                        }
                        tbody {
                            for task in tasks.items.iter() {
                                TaskRow {
                                    key: "{task.id}",
                                    task: task.clone(),
                                    users: users.clone(),
                                    row_error: tasks.row_errors.get(&task.id).cloned(),
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
fn TaskRow(task: Task, users: Vec<User>, row_error: Option<String>) -> Element {
    let actions = use_app_actions();
    let task_id = task.id;

    let on_status_change = move |evt: FormEvent| {
        let Some(status) = TaskStatus::from_wire(&evt.value()) else {
            return;
        };
        spawn(async move {
            if let Some(client) = api_client() {
                let patch = TaskUpdate {
                    status: Some(status),
                    ..TaskUpdate::default()
                };
                hooks::tasks::update_task(client, actions, task_id, patch).await;
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
                let patch = TaskUpdate {
                    assigned_to: Some(assignee),
                    ..TaskUpdate::default()
                };
                hooks::tasks::update_task(client, actions, task_id, patch).await;
            }
        });
    };

    let on_delete = move |_| {
        if !confirm("Delete this task?") {
            return;
        }
        spawn(async move {
            if let Some(client) = api_client() {
                hooks::tasks::delete_task(client, actions, task_id).await;
            }
        });
    };

    let due = task.due_date.clone().unwrap_or_else(|| "—".to_string());

    rsx! {
        tr { class: "border-t border-slate-100 align-top",
            td { class: "px-4 py-2",
                p { class: "font-medium text-slate-900", "{task.title}" }
                if let Some(ref description) = task.description {
                    p { class: "text-xs text-slate-500", "{description}" }
                }
                if let Some(ref error) = row_error {
                    p { class: "mt-1 text-xs text-red-600", "{error}" }
                }
            }
            td { class: "px-4 py-2 text-xs text-slate-600", {task.task_type.label()} }
            td { class: "px-4 py-2 text-xs text-slate-600", "{due}" }
            td { class: "px-4 py-2",
                select {
                    class: "rounded border border-slate-300 px-2 py-1 text-xs",
                    onchange: on_status_change,
                    for status in TaskStatus::ALL {
                        option {
                            value: status.as_wire(),
                            selected: status == task.status,
                            {status.label()}
                        }
                    }
                }
            }
            td { class: "px-4 py-2",
                select {
                    class: "rounded border border-slate-300 px-2 py-1 text-xs",
                    onchange: on_assignee_change,
                    option { value: "", selected: task.assigned_to.is_none(), "Unassigned" }
                    for user in users.iter() {
                        option {
                            value: "{user.id}",
                            selected: Some(user.id) == task.assigned_to,
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
