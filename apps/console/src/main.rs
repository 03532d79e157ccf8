#![allow(non_snake_case)]

mod api;
mod config;
mod hooks;
mod models;
mod session;
mod state;
mod ui;
mod workflow;

use api::{ApiClient, ClientError};
use config::AppConfig;
use dioxus::prelude::*;
use dioxus_router::prelude::*;
use once_cell::sync::OnceCell;
use state::{use_app_state, AppState};
use tracing::{error, info};
use ui::assistant::AssistantPage;
use ui::cases::CasesPage;
use ui::followups::FollowupsPage;
use ui::login::LoginView;
use ui::nav::NavBar;
use ui::notifications::NotificationCenter;
use ui::tasks::TasksPage;
use ui::upload::UploadWizard;

pub(crate) static API_CLIENT: OnceCell<ApiClient> = OnceCell::new();

fn main() {
    console_error_panic_hook::set_once();
    init_logging();
    bootstrap_infrastructure();
    launch(App);
}

fn init_logging() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = dioxus_logger::init(tracing::Level::INFO);
    });
}

// Config travels with the client from here on; see `ApiClient::config`.
fn bootstrap_infrastructure() {
    let config = AppConfig::from_env();

    match ApiClient::new(config) {
        Ok(client) => {
            let _ = API_CLIENT.set(client);
            info!("api client initialized");
        }
        Err(err) => {
            report_client_error("building the api client failed", &err);
        }
    }
}

fn report_client_error(context: &str, err: &ClientError) {
    error!(%context, ?err, status = ?err.status(), "api bootstrap error");
}

#[component]
fn App() -> Element {
    let app_state = use_signal(AppState::restore);

    use_context_provider(|| app_state);

    rsx! {
        Router::<Route> {}
    }
}

#[derive(Clone, Routable, Debug, PartialEq)]
enum Route {
    #[layout(Shell)]
    #[route("/")]
    CasesRoute {},
    #[route("/followups")]
    FollowupsRoute {},
    #[route("/tasks")]
    TasksRoute {},
    #[route("/upload")]
    UploadRoute {},
    #[route("/assistant")]
    AssistantRoute {},
}

/// Authenticated frame. Without a session every route renders the login
/// screen instead; a 401 anywhere drops the session and lands back here.
#[component]
fn Shell() -> Element {
    let state = use_app_state();
    let authenticated = state.read().is_authenticated();

    if !authenticated {
        return rsx! {
            div { class: "relative",
                LoginView {}
                NotificationCenter {}
            }
        };
    }

    rsx! {
        div { class: "relative min-h-screen bg-slate-50",
            NavBar {}
            Outlet::<Route> {}
            NotificationCenter {}
        }
    }
}

#[component]
fn CasesRoute() -> Element {
    rsx! { CasesPage {} }
}

#[component]
fn FollowupsRoute() -> Element {
    rsx! { FollowupsPage {} }
}

#[component]
fn TasksRoute() -> Element {
    rsx! { TasksPage {} }
}

#[component]
fn UploadRoute() -> Element {
    rsx! { UploadWizard {} }
}

#[component]
fn AssistantRoute() -> Element {
    rsx! { AssistantPage {} }
}
