use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

use crate::api::ApiClient;
use crate::hooks::api_client;
use crate::state::{use_app_actions, use_app_state, AppActions};

pub async fn refresh(client: &ApiClient, actions: AppActions) {
    actions.set_users_loading(true);
    match client.fetch_users().await {
        Ok(items) => actions.set_users(items),
        Err(err) => {
            tracing::error!("user fetch failed: {err}");
            actions.fail_users(&err);
        }
    }
}

/// The user directory backs every assignment picker; fetched once per
/// session.
pub fn use_user_directory() {
    let actions = use_app_actions();
    let state = use_app_state();

    use_future(move || async move {
        if state.read().users.loaded {
            return;
        }

        TimeoutFuture::new(0).await;

        if let Some(client) = api_client() {
            refresh(client, actions).await;
        }
    });
}
