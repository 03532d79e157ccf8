use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

use crate::api::ApiClient;
use crate::hooks::api_client;
use crate::models::CaseUpdate;
use crate::state::{use_app_actions, use_app_state, AppActions};

pub async fn refresh(client: &ApiClient, actions: AppActions) {
    actions.set_cases_loading(true);
    match client.fetch_cases_with_followups().await {
        Ok(items) => actions.set_cases(items),
        Err(err) => {
            tracing::error!("case fetch failed: {err}");
            actions.fail_cases(&err);
        }
    }
}

/// Fetch-on-mount for the cases page; refetches happen through mutations,
/// not through this hook.
pub fn use_cases_feed() {
    let actions = use_app_actions();
    let state = use_app_state();

    use_future(move || async move {
        if state.read().cases.loaded {
            return;
        }

        TimeoutFuture::new(0).await;

        if let Some(client) = api_client() {
            refresh(client, actions).await;
        }
    });
}

/// Serialize the update, await it, then refetch. No optimistic patch: on
/// failure the row keeps its prior displayed state and carries the error.
pub async fn update_case(client: &ApiClient, actions: AppActions, id: i64, patch: CaseUpdate) {
    actions.clear_case_row_error(id);
    match client.update_case(id, &patch).await {
        Ok(_) => refresh(client, actions).await,
        Err(err) => {
            tracing::warn!(case_id = id, "case update failed: {err}");
            actions.set_case_row_error(id, &err);
        }
    }
}

pub async fn reset_daily(client: &ApiClient, actions: AppActions) {
    match client.reset_daily_cases().await {
        Ok(_) => {
            actions.set_operation_success("Daily reset", "Daily case reset complete".into());
            refresh(client, actions).await;
        }
        Err(err) => actions.set_operation_error("Daily reset", &err),
    }
}
