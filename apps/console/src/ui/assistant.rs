use dioxus::prelude::*;

use crate::hooks::api_client;
use crate::state::use_app_actions;

/// Drafts a reply to a guest email using the backend's chat endpoint.
#[component]
pub fn AssistantPage() -> Element {
    let actions = use_app_actions();
    let mut email_content = use_signal(String::new);
    let mut reply = use_signal(|| None::<String>);
    let mut error = use_signal(|| None::<String>);
    let mut is_busy = use_signal(|| false);

    let on_submit = move |_| {
        if is_busy() {
            return;
        }
        let content = email_content();
        if content.trim().is_empty() {
            error.set(Some("Paste a guest email first".to_string()));
            return;
        }

        is_busy.set(true);
        error.set(None);

        spawn(async move {
            let Some(client) = api_client() else {
                error.set(Some("Client not initialized".to_string()));
                is_busy.set(false);
                return;
            };

            match client.chat_email_assistant(content.trim()).await {
                Ok(response) => reply.set(Some(response.response)),
                Err(err) => {
                    tracing::warn!("email assistant request failed: {err}");
                    error.set(Some(actions.describe_failure(&err)));
                }
            }
            is_busy.set(false);
        });
    };

    rsx! {
        section { class: "space-y-4 p-6",
            header {
                h1 { class: "text-xl font-semibold text-slate-900", "Email assistant" }
                p { class: "text-xs text-slate-500", "Paste a guest email and get a suggested reply" }
            }

            div { class: "space-y-3 rounded-lg border border-slate-200 bg-white p-6 shadow-sm",
                textarea {
                    class: "w-full rounded border border-slate-300 px-3 py-2 text-sm",
                    rows: 8,
                    placeholder: "Dear reception, ...",
                    value: "{email_content}",
                    oninput: move |evt| email_content.set(evt.value()),
                }
                if let Some(message) = error() {
                    p { class: "text-xs text-red-600", "{message}" }
                }
                button {
                    class: "rounded bg-slate-900 px-4 py-2 text-sm font-semibold text-white hover:bg-slate-800 disabled:opacity-50",
                    disabled: is_busy(),
                    onclick: on_submit,
                    if is_busy() { "Drafting..." } else { "Draft reply" }
                }
            }

            if let Some(text) = reply() {
                div { class: "rounded-lg border border-slate-200 bg-white p-6 shadow-sm",
                    div { class: "flex items-center justify-between",
                        h2 { class: "text-sm font-semibold text-slate-900", "Suggested reply" }
                        button {
                            class: "rounded border border-slate-300 px-2 py-1 text-xs text-slate-600 hover:bg-slate-100",
                            onclick: {
                                let text = text.clone();
                                move |_| crate::ui::copy_to_clipboard(&text)
                            },
                            "Copy"
                        }
                    }
                    p { class: "mt-2 whitespace-pre-wrap text-sm text-slate-700", "{text}" }
                }
            }
        }
    }
}
