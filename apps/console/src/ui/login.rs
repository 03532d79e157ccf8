use dioxus::prelude::*;

use crate::api::ClientError;
use crate::hooks::api_client;
use crate::session::Session;
use crate::state::use_app_actions;

// On this form a 401 means the credentials were wrong, not that a
// session expired.
fn login_error_message(err: &ClientError) -> String {
    if err.is_unauthorized() {
        "Invalid username or password".to_string()
    } else {
        err.to_string()
    }
}

#[component]
pub fn LoginView() -> Element {
    let actions = use_app_actions();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut is_submitting = use_signal(|| false);

    let submit = move |_| {
        if is_submitting() {
            return;
        }
        let user_value = username();
        let pass_value = password();
        if user_value.trim().is_empty() || pass_value.is_empty() {
            error.set(Some("Username and password are required".to_string()));
            return;
        }

        is_submitting.set(true);
        error.set(None);

        spawn(async move {
            let Some(client) = api_client() else {
                error.set(Some("Client not initialized".to_string()));
                is_submitting.set(false);
                return;
            };

            match client.login(user_value.trim(), &pass_value).await {
                Ok(response) => {
                    actions.set_session(Session {
                        token: response.access_token,
                        user: response.user,
                    });
                }
                Err(err) => {
                    tracing::warn!("login failed: {err}");
                    error.set(Some(login_error_message(&err)));
                }
            }
            is_submitting.set(false);
        });
    };

    rsx! {
        div { class: "flex min-h-screen items-center justify-center bg-slate-50",
            div { class: "w-full max-w-sm space-y-4 rounded-lg border border-slate-200 bg-white p-8 shadow-sm",
                h1 { class: "text-xl font-semibold text-slate-900", "GuestDesk sign in" }
                p { class: "text-xs text-slate-500", "Guest relations case management" }
                input {
                    class: "w-full rounded border border-slate-300 px-3 py-2 text-sm",
                    placeholder: "Username",
                    value: "{username}",
                    oninput: move |evt| username.set(evt.value()),
                }
                input {
                    class: "w-full rounded border border-slate-300 px-3 py-2 text-sm",
                    r#type: "password",
                    placeholder: "Password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                if let Some(message) = error() {
                    p { class: "text-xs text-red-600", "{message}" }
                }
                button {
                    class: "w-full rounded bg-slate-900 px-3 py-2 text-sm font-semibold text-white hover:bg-slate-800 disabled:opacity-50",
                    disabled: is_submitting(),
                    onclick: submit,
                    if is_submitting() { "Signing in..." } else { "Sign in" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_reads_as_bad_credentials() {
        assert_eq!(
            login_error_message(&ClientError::Unauthorized),
            "Invalid username or password"
        );
        assert_eq!(
            login_error_message(&ClientError::Workflow("boom".into())),
            "boom"
        );
    }
}
