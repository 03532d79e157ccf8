use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

use crate::api::ApiClient;
use crate::hooks::api_client;
use crate::models::{TaskCreate, TaskUpdate};
use crate::state::{use_app_actions, use_app_state, AppActions};

pub async fn refresh(client: &ApiClient, actions: AppActions) {
    actions.set_tasks_loading(true);
    match client.fetch_tasks().await {
        Ok(items) => actions.set_tasks(items),
        Err(err) => {
            tracing::error!("task fetch failed: {err}");
            actions.fail_tasks(&err);
        }
    }
}

pub fn use_tasks_feed() {
    let actions = use_app_actions();
    let state = use_app_state();

    use_future(move || async move {
        if state.read().tasks.loaded {
            return;
        }

        TimeoutFuture::new(0).await;

        if let Some(client) = api_client() {
            refresh(client, actions).await;
        }
    });
}

pub async fn create_task(client: &ApiClient, actions: AppActions, task: TaskCreate) {
    match client.create_task(&task).await {
        Ok(_) => refresh(client, actions).await,
        Err(err) => actions.set_operation_error("Create task", &err),
    }
}

pub async fn create_daily_tasks(client: &ApiClient, actions: AppActions, task_date: String) {
    match client.create_daily_tasks(&task_date).await {
        Ok(created) => {
            actions.set_operation_success(
                "Daily tasks",
                format!("Generated {} task(s) for {task_date}", created.len()),
            );
            refresh(client, actions).await;
        }
        Err(err) => actions.set_operation_error("Daily tasks", &err),
    }
}

pub async fn update_task(client: &ApiClient, actions: AppActions, id: i64, patch: TaskUpdate) {
    match client.update_task(id, &patch).await {
        Ok(_) => refresh(client, actions).await,
        Err(err) => {
            tracing::warn!(task_id = id, "task update failed: {err}");
            actions.set_task_row_error(id, &err);
        }
    }
}

/// Deletion is only reached after the explicit confirmation step in the UI.
pub async fn delete_task(client: &ApiClient, actions: AppActions, id: i64) {
    match client.delete_task(id).await {
        Ok(_) => refresh(client, actions).await,
        Err(err) => {
            tracing::warn!(task_id = id, "task delete failed: {err}");
            actions.set_task_row_error(id, &err);
        }
    }
}
