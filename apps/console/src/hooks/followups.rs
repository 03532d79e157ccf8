use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

use crate::api::ApiClient;
use crate::hooks::api_client;
use crate::models::FollowupUpdate;
use crate::state::{use_app_actions, use_app_state, AppActions};

pub async fn refresh(client: &ApiClient, actions: AppActions) {
    actions.set_followups_loading(true);
    match client.fetch_followups_with_case_info().await {
        Ok(items) => actions.set_followups(items),
        Err(err) => {
            tracing::error!("followup fetch failed: {err}");
            actions.fail_followups(&err);
        }
    }
}

pub fn use_followups_feed() {
    let actions = use_app_actions();
    let state = use_app_state();

    use_future(move || async move {
        if state.read().followups.loaded {
            return;
        }

        TimeoutFuture::new(0).await;

        if let Some(client) = api_client() {
            refresh(client, actions).await;
        }
    });
}

pub async fn update_followup(
    client: &ApiClient,
    actions: AppActions,
    id: i64,
    patch: FollowupUpdate,
) {
    match client.update_followup(id, &patch).await {
        Ok(_) => refresh(client, actions).await,
        Err(err) => {
            tracing::warn!(followup_id = id, "followup update failed: {err}");
            actions.set_followup_row_error(id, &err);
        }
    }
}

/// Deletion is only reached after the explicit confirmation step in the UI.
pub async fn delete_followup(client: &ApiClient, actions: AppActions, id: i64) {
    match client.delete_followup(id).await {
        Ok(_) => refresh(client, actions).await,
        Err(err) => {
            tracing::warn!(followup_id = id, "followup delete failed: {err}");
            actions.set_followup_row_error(id, &err);
        }
    }
}
