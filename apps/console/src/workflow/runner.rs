use crate::api::ApiClient;
use crate::config::WorkflowTransportMode;
use crate::hooks;
use crate::state::AppActions;
use crate::workflow::{anonymize, build_commit_plan, pair_followups};

/// Upload the selected report and run extraction + suggestion, via
/// whichever transport the config selected. The wizard never learns which
/// one ran; both deliver the same terminal payload.
pub async fn run_extraction(client: &ApiClient, actions: AppActions) {
    let Some(file) = actions.snapshot_workflow().file else {
        return;
    };

    actions.update_workflow(|w| w.begin_processing());

    let result = match client.config().workflow_transport {
        WorkflowTransportMode::Blocking => client.run_workflow(&file.name, file.bytes).await,
        WorkflowTransportMode::Streaming => {
            client
                .run_workflow_stream(&file.name, file.bytes, |event| {
                    actions.update_workflow(|w| w.apply_progress(event));
                })
                .await
        }
    };

    match result {
        Ok(outcome) => {
            tracing::info!(
                cases = outcome.cases.len(),
                suggestions = outcome.suggestions.len(),
                "document workflow finished"
            );
            actions.update_workflow(|w| w.complete_extraction(outcome));
        }
        Err(err) => {
            tracing::error!("document workflow failed: {err}");
            let message = actions.describe_failure(&err);
            actions.update_workflow(|w| w.fail(message));
        }
    }
}

/// The Confirm action: anonymize, bulk-create the cases, then one followup
/// per created case, sequentially and in input order. Any create failure
/// aborts and leaves the wizard on Confirm with every draft intact;
/// already-created records stay created (at-least-once, no rollback).
pub async fn commit_workflow(client: &ApiClient, actions: AppActions) {
    let snapshot = actions.snapshot_workflow();
    if snapshot.drafts.is_empty() {
        actions.update_workflow(|w| w.reset());
        return;
    }

    actions.update_workflow(|w| {
        w.is_loading = true;
        w.error = None;
    });

    let mut plan = build_commit_plan(&snapshot.drafts, &snapshot.assigned_users);

    for case in plan.cases.iter_mut() {
        anonymize::anonymize_case(client, case).await;
    }

    let created = match client.create_cases_bulk(&plan.cases).await {
        Ok(created) => created,
        Err(err) => {
            tracing::error!("bulk case creation failed: {err}");
            let message = actions.describe_failure(&err);
            actions.update_workflow(|w| w.fail(message));
            return;
        }
    };

    let followups = match pair_followups(&created, &plan.followups) {
        Ok(followups) => followups,
        Err(message) => {
            tracing::error!("{message}");
            actions.update_workflow(|w| w.fail(message));
            return;
        }
    };

    let mut followups_created = 0usize;
    for followup in &followups {
        if let Err(err) = client.create_followup(followup).await {
            tracing::error!(case_id = followup.case_id, "followup creation failed: {err}");
            let message = actions.describe_failure(&err);
            actions.update_workflow(|w| w.fail(message));
            return;
        }
        followups_created += 1;
    }

    actions.update_workflow(|w| w.reset());
    actions.set_operation_success(
        "Upload workflow",
        format!(
            "Created {} case(s) and {} follow-up(s)",
            created.len(),
            followups_created
        ),
    );

    // Signal the list views: their collections are stale now.
    hooks::cases::refresh(client, actions).await;
}
