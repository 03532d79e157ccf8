use dioxus::prelude::*;

use crate::hooks::{self, api_client};
use crate::models::{CaseDraft, CaseStatus, Importance, User};
use crate::state::{use_app_actions, use_app_state};
use crate::workflow::{runner, ProcessingStatus, WizardStep, WorkflowState};

#[component]
pub fn UploadWizard() -> Element {
    hooks::users::use_user_directory();

    let state = use_app_state();
    let workflow = state.read().workflow.clone();

    rsx! {
        section { class: "space-y-4 p-6",
            header {
                h1 { class: "text-xl font-semibold text-slate-900", "Upload incident report" }
                p { class: "text-xs text-slate-500",
                    "Extract cases from a PDF or Word report, review them, then create them in bulk"
                }
            }

            StepIndicator { current: workflow.step }

            if let Some(ref message) = workflow.error {
                div { class: "rounded border border-red-200 bg-red-50 px-4 py-2 text-sm text-red-700",
                    "{message}"
                }
            }

            match workflow.step {
                WizardStep::Upload => rsx! { UploadStep { workflow: workflow.clone() } },
                WizardStep::Edit => rsx! { EditStep { workflow: workflow.clone() } },
                WizardStep::Confirm => rsx! { ConfirmStep { workflow: workflow.clone() } },
            }
        }
    }
}

#[component]
fn StepIndicator(current: WizardStep) -> Element {
    let steps = [WizardStep::Upload, WizardStep::Edit, WizardStep::Confirm];

    rsx! {
        ol { class: "flex items-center gap-4",
            for step in steps {
                li { class: "flex items-center gap-2",
                    span {
                        class: if step == current {
                            "flex h-6 w-6 items-center justify-center rounded-full bg-slate-900 text-xs font-semibold text-white"
                        } else {
                            "flex h-6 w-6 items-center justify-center rounded-full bg-slate-200 text-xs font-semibold text-slate-600"
                        },
                        "{step.ordinal()}"
                    }
                    span {
                        class: if step == current {
                            "text-sm font-medium text-slate-900"
                        } else {
                            "text-sm text-slate-500"
                        },
                        {step.title()}
                    }
                }
            }
        }
    }
}

#[component]
fn UploadStep(workflow: WorkflowState) -> Element {
    let actions = use_app_actions();

    let on_file_change = move |evt: FormEvent| {
        let Some(file_engine) = evt.files() else {
            return;
        };
        let Some(name) = file_engine.files().into_iter().next() else {
            return;
        };
        spawn(async move {
            match file_engine.read_file(&name).await {
                Some(bytes) => actions.update_workflow(|w| w.accept_file(name, bytes)),
                None => actions.update_workflow(|w| {
                    w.fail(format!("Could not read {name}"));
                }),
            }
        });
    };

    let can_start = workflow.can_start();
    let on_start = move |_| {
        spawn(async move {
            if let Some(client) = api_client() {
                runner::run_extraction(client, actions).await;
            }
        });
    };

    rsx! {
        div { class: "space-y-4 rounded-lg border border-slate-200 bg-white p-6 shadow-sm",
            div {
                label { class: "block text-sm font-medium text-slate-700", "Incident report" }
                input {
                    class: "mt-2 block w-full text-sm text-slate-600",
                    r#type: "file",
                    accept: ".pdf,.doc,.docx",
                    disabled: workflow.is_loading,
                    onchange: on_file_change,
                }
                p { class: "mt-1 text-xs text-slate-400", "PDF or Word, one report at a time" }
            }

            if let Some(ref file) = workflow.file {
                div { class: "flex items-center gap-2 text-sm text-slate-700",
                    span { "Selected: {file.name}" }
                    if !workflow.is_loading {
                        button {
                            class: "text-xs text-slate-500 hover:underline",
                            onclick: move |_| actions.update_workflow(|w| w.clear_file()),
                            "Remove"
                        }
                    }
                }
            }

            if let Some(ref status) = workflow.processing {
                ProcessingPanel { status: status.clone() }
            }

            button {
                class: "rounded bg-slate-900 px-4 py-2 text-sm font-semibold text-white hover:bg-slate-800 disabled:opacity-50",
                disabled: !can_start,
                onclick: on_start,
                if workflow.is_loading { "Processing..." } else { "Process report" }
            }
        }
    }
}

#[component]
fn ProcessingPanel(status: ProcessingStatus) -> Element {
    let counter = match (status.current_item, status.total_items) {
        (Some(current), Some(total)) => format!("{current} of {total}"),
        _ => String::new(),
    };

    rsx! {
        div { class: "space-y-2 rounded border border-slate-200 bg-slate-50 p-4",
            div { class: "flex items-center justify-between text-xs text-slate-600",
                span { "{status.message}" }
                if !counter.is_empty() {
                    span { "{counter}" }
                }
            }
            div { class: "h-2 w-full overflow-hidden rounded bg-slate-200",
                div {
                    class: "h-full bg-slate-900 transition-all",
                    style: "width: {status.progress_percent}%",
                }
            }
        }
    }
}

#[component]
fn EditStep(workflow: WorkflowState) -> Element {
    let actions = use_app_actions();

    rsx! {
        div { class: "space-y-4",
            if workflow.drafts.is_empty() {
                div { class: "rounded-lg border border-slate-200 bg-white p-6 text-sm text-slate-600 shadow-sm",
                    "No cases were extracted from this report. Go back and try a different file."
                }
            } else {
                for (index, draft) in workflow.drafts.iter().enumerate() {
                    DraftCard {
                        key: "{draft.draft_id}",
                        index,
                        draft: draft.clone(),
                        users: workflow.available_users.clone(),
                        assigned: workflow.assigned_users.get(&index).copied(),
                    }
                }
            }

            div { class: "flex items-center justify-between",
                button {
                    class: "rounded border border-slate-300 px-4 py-2 text-sm text-slate-700 hover:bg-slate-100",
                    onclick: move |_| actions.update_workflow(|w| w.previous()),
                    "Back"
                }
                if !workflow.drafts.is_empty() {
                    button {
                        class: "rounded bg-slate-900 px-4 py-2 text-sm font-semibold text-white hover:bg-slate-800",
                        onclick: move |_| actions.update_workflow(|w| w.next()),
                        "Continue"
                    }
                }
            }
        }
    }
}

#[component]
fn DraftCard(
    index: usize,
    draft: CaseDraft,
    users: Vec<User>,
    assigned: Option<i64>,
) -> Element {
    let actions = use_app_actions();

    rsx! {
        div { class: "space-y-3 rounded-lg border border-slate-200 bg-white p-4 shadow-sm",
            div { class: "flex items-center justify-between",
                h2 { class: "text-sm font-semibold text-slate-900", "Case {index + 1}" }
                span { class: "text-xs text-slate-400", {draft.status.label()} }
            }

            div { class: "grid grid-cols-2 gap-3",
                div {
                    label { class: "block text-xs font-medium text-slate-600", "Title" }
                    input {
                        class: "mt-1 w-full rounded border border-slate-300 px-2 py-1.5 text-sm",
                        value: "{draft.title}",
                        oninput: move |evt| actions.update_workflow(move |w| {
                            if let Some(d) = w.drafts.get_mut(index) {
                                d.title = evt.value();
                            }
                        }),
                    }
                }
                div {
                    label { class: "block text-xs font-medium text-slate-600", "Room" }
                    input {
                        class: "mt-1 w-full rounded border border-slate-300 px-2 py-1.5 text-sm",
                        value: draft.room.clone().unwrap_or_default(),
                        oninput: move |evt| actions.update_workflow(move |w| {
                            if let Some(d) = w.drafts.get_mut(index) {
                                let value = evt.value();
                                d.room = if value.is_empty() { None } else { Some(value) };
                            }
                        }),
                    }
                }
                div {
                    label { class: "block text-xs font-medium text-slate-600", "Status" }
                    select {
                        class: "mt-1 w-full rounded border border-slate-300 px-2 py-1.5 text-sm",
                        onchange: move |evt| {
                            if let Some(status) = CaseStatus::from_wire(&evt.value()) {
                                actions.update_workflow(move |w| {
                                    if let Some(d) = w.drafts.get_mut(index) {
                                        d.status = status;
                                    }
                                });
                            }
                        },
                        for status in CaseStatus::ALL {
                            option {
                                value: status.as_wire(),
                                selected: status == draft.status,
                                {status.label()}
                            }
                        }
                    }
                }
                div {
                    label { class: "block text-xs font-medium text-slate-600", "Importance" }
                    select {
                        class: "mt-1 w-full rounded border border-slate-300 px-2 py-1.5 text-sm",
                        onchange: move |evt| {
                            if let Some(importance) = Importance::from_wire(&evt.value()) {
                                actions.update_workflow(move |w| {
                                    if let Some(d) = w.drafts.get_mut(index) {
                                        d.importance = importance;
                                    }
                                });
                            }
                        },
                        for importance in Importance::ALL {
                            option {
                                value: importance.as_wire(),
                                selected: importance == draft.importance,
                                {importance.label()}
                            }
                        }
                    }
                }
                div {
                    label { class: "block text-xs font-medium text-slate-600", "Type" }
                    input {
                        class: "mt-1 w-full rounded border border-slate-300 px-2 py-1.5 text-sm",
                        value: draft.kind.clone().unwrap_or_default(),
                        oninput: move |evt| actions.update_workflow(move |w| {
                            if let Some(d) = w.drafts.get_mut(index) {
                                let value = evt.value();
                                d.kind = if value.is_empty() { None } else { Some(value) };
                            }
                        }),
                    }
                }
                div {
                    label { class: "block text-xs font-medium text-slate-600", "Assign to" }
                    select {
                        class: "mt-1 w-full rounded border border-slate-300 px-2 py-1.5 text-sm",
                        onchange: move |evt| {
                            let user_id = evt.value().parse::<i64>().ok();
                            actions.update_workflow(move |w| w.assign_user(index, user_id));
                        },
                        option { value: "", selected: assigned.is_none(), "Unassigned" }
                        for user in users.iter() {
                            option {
                                value: "{user.id}",
                                selected: Some(user.id) == assigned,
                                "{user.name}"
                            }
                        }
                    }
                }
            }

            div {
                label { class: "block text-xs font-medium text-slate-600", "Description" }
                textarea {
                    class: "mt-1 w-full rounded border border-slate-300 px-2 py-1.5 text-sm",
                    rows: 3,
                    value: draft.case_description.clone().unwrap_or_default(),
                    oninput: move |evt| actions.update_workflow(move |w| {
                        if let Some(d) = w.drafts.get_mut(index) {
                            let value = evt.value();
                            d.case_description = if value.is_empty() { None } else { Some(value) };
                        }
                    }),
                }
            }

            div {
                label { class: "block text-xs font-medium text-slate-600", "Action taken" }
                textarea {
                    class: "mt-1 w-full rounded border border-slate-300 px-2 py-1.5 text-sm",
                    rows: 2,
                    value: draft.action.clone().unwrap_or_default(),
                    oninput: move |evt| actions.update_workflow(move |w| {
                        if let Some(d) = w.drafts.get_mut(index) {
                            let value = evt.value();
                            d.action = if value.is_empty() { None } else { Some(value) };
                        }
                    }),
                }
            }

            div {
                label { class: "block text-xs font-medium text-slate-600", "Suggested follow-up" }
                textarea {
                    class: "mt-1 w-full rounded border border-amber-200 bg-amber-50 px-2 py-1.5 text-sm",
                    rows: 2,
                    value: "{draft.feedback}",
                    oninput: move |evt| actions.update_workflow(move |w| {
                        if let Some(d) = w.drafts.get_mut(index) {
                            d.feedback = evt.value();
                        }
                    }),
                }
            }
        }
    }
}

#[component]
fn ConfirmStep(workflow: WorkflowState) -> Element {
    let actions = use_app_actions();

    let assignee_name = |index: usize| -> String {
        workflow
            .assigned_users
            .get(&index)
            .and_then(|id| workflow.available_users.iter().find(|u| u.id == *id))
            .map(|u| u.name.clone())
            .unwrap_or_else(|| "Unassigned".to_string())
    };

    let on_confirm = move |_| {
        spawn(async move {
            if let Some(client) = api_client() {
                runner::commit_workflow(client, actions).await;
            }
        });
    };

    rsx! {
        div { class: "space-y-4",
            div { class: "rounded-lg border border-slate-200 bg-white p-6 shadow-sm",
                h2 { class: "text-sm font-semibold text-slate-900",
                    "Ready to create {workflow.drafts.len()} case(s)"
                }
                p { class: "mt-1 text-xs text-slate-500",
                    "Guest and staff names are anonymized before anything is stored. Each case gets one follow-up from its suggestion."
                }
                ul { class: "mt-4 space-y-2",
                    for (index, draft) in workflow.drafts.iter().enumerate() {
                        li {
                            key: "{draft.draft_id}",
                            class: "rounded border border-slate-100 bg-slate-50 px-3 py-2 text-sm",
                            p { class: "font-medium text-slate-900", "{draft.title}" }
                            p { class: "text-xs text-slate-500",
                                {draft.importance.label()}
                                " · "
                                {assignee_name(index)}
                            }
                            p { class: "mt-1 text-xs text-slate-600", "{draft.feedback}" }
                        }
                    }
                }
            }

            div { class: "flex items-center justify-between",
                button {
                    class: "rounded border border-slate-300 px-4 py-2 text-sm text-slate-700 hover:bg-slate-100 disabled:opacity-50",
                    disabled: workflow.is_loading,
                    onclick: move |_| actions.update_workflow(|w| w.previous()),
                    "Back"
                }
                button {
                    class: "rounded bg-slate-900 px-4 py-2 text-sm font-semibold text-white hover:bg-slate-800 disabled:opacity-50",
                    disabled: workflow.is_loading,
                    onclick: on_confirm,
                    if workflow.is_loading { "Creating..." } else { "Confirm & create" }
                }
            }
        }
    }
}
