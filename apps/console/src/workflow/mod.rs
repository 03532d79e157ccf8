pub mod anonymize;
pub mod runner;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::stream::WorkflowProgress;
use crate::models::{
    CaseCreate, CaseDraft, CaseRecord, CaseStatus, ExtractedCase, FollowupCreate, Suggestion,
    User, WorkflowOutcome,
};

pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// The wizard's three steps. Processing is not a step of its own: it is
/// the Upload step's in-flight phase, and its terminal success event lands
/// on Edit with no user action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardStep {
    #[default]
    Upload,
    Edit,
    Confirm,
}

impl WizardStep {
    pub fn ordinal(self) -> usize {
        match self {
            Self::Upload => 1,
            Self::Edit => 2,
            Self::Confirm => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Upload => "Upload report",
            Self::Edit => "Review & edit cases",
            Self::Confirm => "Confirm & create",
        }
    }
}

/// The incident report picked in the Upload step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStatus {
    pub message: String,
    pub progress_percent: u8,
    pub current_item: Option<u64>,
    pub total_items: Option<u64>,
}

/// State of the upload wizard. Draft data survives every failure so a
/// retry never loses edits.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkflowState {
    pub step: WizardStep,
    pub file: Option<SelectedFile>,
    pub drafts: Vec<CaseDraft>,
    /// Draft list index -> user id. Indices stay valid because the draft
    /// list is append/remove-free during editing; `draft_id` exists for
    /// rendering keys, not assignment.
    pub assigned_users: HashMap<usize, i64>,
    pub available_users: Vec<User>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub processing: Option<ProcessingStatus>,
}

impl WorkflowState {
    /// File selection with client-side validation; unsupported kinds are
    /// rejected before any network traffic.
    pub fn accept_file(&mut self, name: String, bytes: Vec<u8>) {
        if is_accepted_document(&name) {
            self.file = Some(SelectedFile { name, bytes });
            self.error = None;
        } else {
            self.file = None;
            self.error = Some(format!(
                "Unsupported file type. Accepted: {}",
                ACCEPTED_EXTENSIONS.join(", ")
            ));
        }
    }

    pub fn clear_file(&mut self) {
        self.file = None;
        self.error = None;
    }

    pub fn can_start(&self) -> bool {
        self.step == WizardStep::Upload && self.file.is_some() && !self.is_loading
    }

    pub fn begin_processing(&mut self) {
        self.is_loading = true;
        self.error = None;
        self.processing = Some(ProcessingStatus {
            message: "Uploading document...".to_string(),
            ..ProcessingStatus::default()
        });
    }

    /// Progress events are applied in arrival order; terminal events are
    /// handled by [`complete_extraction`] / [`fail`] instead.
    pub fn apply_progress(&mut self, event: &WorkflowProgress) {
        let status = self.processing.get_or_insert_with(ProcessingStatus::default);
        if let Some(message) = &event.message {
            status.message = message.clone();
        }
        if let Some(progress) = event.progress {
            status.progress_percent = (progress.clamp(0.0, 1.0) * 100.0).round() as u8;
        }
        status.current_item = event.current.or(status.current_item);
        status.total_items = event.total.or(status.total_items);
    }

    /// Terminal success: attach suggestion i to case i and land on Edit —
    /// always, even when zero cases were extracted.
    pub fn complete_extraction(&mut self, outcome: WorkflowOutcome) {
        self.drafts = attach_suggestions(outcome.cases, &outcome.suggestions);
        self.assigned_users.clear();
        self.is_loading = false;
        self.processing = None;
        self.error = None;
        self.step = WizardStep::Edit;
    }

    /// A failed network-bound transition surfaces the error and leaves the
    /// step unchanged; the user may retry the same action.
    pub fn fail(&mut self, message: String) {
        self.error = Some(message);
        self.is_loading = false;
        self.processing = None;
    }

    pub fn next(&mut self) {
        self.step = match self.step {
            WizardStep::Upload => WizardStep::Upload,
            WizardStep::Edit => WizardStep::Confirm,
            WizardStep::Confirm => WizardStep::Confirm,
        };
    }

    /// Backward navigation changes the step only; no side effects, no
    /// draft loss.
    pub fn previous(&mut self) {
        self.step = match self.step {
            WizardStep::Upload => WizardStep::Upload,
            WizardStep::Edit => WizardStep::Upload,
            WizardStep::Confirm => WizardStep::Edit,
        };
        self.error = None;
    }

    pub fn assign_user(&mut self, index: usize, user_id: Option<i64>) {
        match user_id {
            Some(id) => {
                self.assigned_users.insert(index, id);
            }
            None => {
                self.assigned_users.remove(&index);
            }
        }
    }

    pub fn reset(&mut self) {
        let available_users = std::mem::take(&mut self.available_users);
        *self = Self {
            available_users,
            ..Self::default()
        };
    }
}

pub fn is_accepted_document(name: &str) -> bool {
    let extension = name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    matches!(extension.as_deref(), Some(ext) if ACCEPTED_EXTENSIONS.contains(&ext))
}

fn attach_suggestions(cases: Vec<ExtractedCase>, suggestions: &[Suggestion]) -> Vec<CaseDraft> {
    cases
        .into_iter()
        .enumerate()
        .map(|(i, case)| CaseDraft::from_extracted(case, suggestions.get(i)))
        .collect()
}

/// Everything the Confirm step sends, precomputed: the allow-listed case
/// payloads and, aligned by index, the followup seeds that become one
/// create call per created case.
#[derive(Clone, Debug, PartialEq)]
pub struct CommitPlan {
    pub cases: Vec<CaseCreate>,
    pub followups: Vec<FollowupSeed>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FollowupSeed {
    pub suggestion_text: String,
    pub assigned_to: Option<i64>,
}

/// Field selection happens here: only the CaseCreate allow-list crosses to
/// the backend, and the draft's feedback text becomes the followup's
/// suggestion text instead of a case field.
pub fn build_commit_plan(drafts: &[CaseDraft], assigned: &HashMap<usize, i64>) -> CommitPlan {
    let mut cases = Vec::with_capacity(drafts.len());
    let mut followups = Vec::with_capacity(drafts.len());

    for (index, draft) in drafts.iter().enumerate() {
        let owner = assigned.get(&index).copied();
        cases.push(CaseCreate {
            room: draft.room.clone(),
            status: draft.status,
            importance: draft.importance,
            kind: draft.kind.clone(),
            title: draft.title.clone(),
            action: draft.action.clone(),
            case_description: draft.case_description.clone(),
            guest: draft.guest.clone(),
            case_date: draft.case_date.clone(),
            created_by: draft.created_by.clone(),
            modified_by: draft.modified_by.clone(),
            owner_id: owner,
        });
        followups.push(FollowupSeed {
            suggestion_text: draft.feedback.clone(),
            assigned_to: owner,
        });
    }

    CommitPlan { cases, followups }
}

pub fn followup_status_for_new() -> CaseStatus {
    CaseStatus::Pending
}

/// Pair created records with their followup seeds. The backend must
/// return exactly one record per payload; anything else aborts the commit
/// instead of silently truncating the followup list.
pub fn pair_followups(
    created: &[CaseRecord],
    seeds: &[FollowupSeed],
) -> Result<Vec<FollowupCreate>, String> {
    if created.len() != seeds.len() {
        return Err(format!(
            "bulk create returned {} case(s) for {} payload(s)",
            created.len(),
            seeds.len()
        ));
    }

    Ok(created
        .iter()
        .zip(seeds)
        .map(|(record, seed)| FollowupCreate {
            case_id: record.id,
            suggestion_text: seed.suggestion_text.clone(),
            status: followup_status_for_new(),
            assigned_to: seed.assigned_to,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Importance;

    fn draft(title: &str, feedback: &str) -> CaseDraft {
        CaseDraft::from_extracted(
            ExtractedCase {
                title: Some(title.to_string()),
                ..ExtractedCase::default()
            },
            Some(&Suggestion {
                suggestion_text: Some(feedback.to_string()),
            }),
        )
    }

    #[test]
    fn only_accepted_extensions_enable_start() {
        let mut state = WorkflowState::default();

        state.accept_file("notes.txt".into(), vec![1]);
        assert!(state.file.is_none());
        assert!(state.error.as_deref().unwrap().contains("Unsupported"));
        assert!(!state.can_start());

        state.accept_file("report.pdf".into(), vec![1, 2]);
        assert!(state.error.is_none());
        assert!(state.can_start());

        state.accept_file("REPORT.DOCX".into(), vec![3]);
        assert!(state.can_start());
    }

    #[test]
    fn start_is_disabled_while_loading() {
        let mut state = WorkflowState::default();
        state.accept_file("report.pdf".into(), vec![1]);
        state.begin_processing();
        assert!(!state.can_start());
        assert!(state.processing.is_some());
    }

    #[test]
    fn terminal_success_always_lands_on_edit() {
        let mut state = WorkflowState::default();
        state.accept_file("report.pdf".into(), vec![1]);
        state.begin_processing();
        state.complete_extraction(WorkflowOutcome::default());
        assert_eq!(state.step, WizardStep::Edit);
        assert!(state.drafts.is_empty());
        assert!(!state.is_loading);

        let mut state = WorkflowState::default();
        state.begin_processing();
        state.complete_extraction(WorkflowOutcome {
            cases: vec![ExtractedCase::default(), ExtractedCase::default()],
            suggestions: vec![Suggestion {
                suggestion_text: Some("Apologize in person".into()),
            }],
        });
        assert_eq!(state.step, WizardStep::Edit);
        assert_eq!(state.drafts.len(), 2);
        assert_eq!(state.drafts[0].feedback, "Apologize in person");
        // Missing second suggestion falls back to the placeholder.
        assert_eq!(
            state.drafts[1].feedback,
            crate::models::NO_SUGGESTION_PLACEHOLDER
        );
    }

    #[test]
    fn failure_preserves_step_and_drafts() {
        let mut state = WorkflowState::default();
        state.begin_processing();
        state.complete_extraction(WorkflowOutcome {
            cases: vec![ExtractedCase::default()],
            suggestions: vec![],
        });
        state.next();
        assert_eq!(state.step, WizardStep::Confirm);

        state.fail("bulk create failed".into());
        assert_eq!(state.step, WizardStep::Confirm);
        assert_eq!(state.error.as_deref(), Some("bulk create failed"));
        assert_eq!(state.drafts.len(), 1);
    }

    #[test]
    fn previous_walks_back_without_side_effects() {
        let mut state = WorkflowState::default();
        state.complete_extraction(WorkflowOutcome {
            cases: vec![ExtractedCase::default()],
            suggestions: vec![],
        });
        state.assign_user(0, Some(7));
        state.next();
        assert_eq!(state.step, WizardStep::Confirm);

        state.previous();
        assert_eq!(state.step, WizardStep::Edit);
        state.previous();
        assert_eq!(state.step, WizardStep::Upload);
        state.previous();
        assert_eq!(state.step, WizardStep::Upload);

        assert_eq!(state.drafts.len(), 1);
        assert_eq!(state.assigned_users.get(&0), Some(&7));
    }

    #[test]
    fn progress_events_update_processing_status() {
        let mut state = WorkflowState::default();
        state.begin_processing();

        state.apply_progress(&WorkflowProgress {
            step: "parsing".into(),
            message: Some("Parsing page 2".into()),
            progress: Some(0.4),
            current: Some(2),
            total: Some(5),
            ..WorkflowProgress::default()
        });

        let status = state.processing.as_ref().unwrap();
        assert_eq!(status.message, "Parsing page 2");
        assert_eq!(status.progress_percent, 40);
        assert_eq!(status.current_item, Some(2));
        assert_eq!(status.total_items, Some(5));

        // Sparse events keep previously known counters.
        state.apply_progress(&WorkflowProgress {
            step: "suggesting".into(),
            progress: Some(0.8),
            ..WorkflowProgress::default()
        });
        let status = state.processing.as_ref().unwrap();
        assert_eq!(status.progress_percent, 80);
        assert_eq!(status.total_items, Some(5));
    }

    #[test]
    fn commit_plan_preserves_order_and_resolves_assignments() {
        let drafts = vec![
            draft("Cold breakfast", "Offer complimentary breakfast"),
            draft("Noisy corridor", "Move guest to a quieter room"),
            draft("Slow checkin", "Send an apology email"),
        ];
        let mut assigned = HashMap::new();
        assigned.insert(0, 7i64);
        assigned.insert(2, 3i64);

        let plan = build_commit_plan(&drafts, &assigned);
        assert_eq!(plan.cases.len(), 3);
        assert_eq!(plan.followups.len(), 3);

        assert_eq!(plan.cases[0].title, "Cold breakfast");
        assert_eq!(plan.cases[0].owner_id, Some(7));
        assert_eq!(plan.followups[0].assigned_to, Some(7));
        assert_eq!(
            plan.followups[0].suggestion_text,
            "Offer complimentary breakfast"
        );

        assert_eq!(plan.cases[1].owner_id, None);
        assert_eq!(plan.followups[1].assigned_to, None);

        assert_eq!(plan.cases[2].title, "Slow checkin");
        assert_eq!(plan.cases[2].owner_id, Some(3));
    }

    fn created_case(id: i64) -> CaseRecord {
        CaseRecord {
            id,
            room: None,
            status: CaseStatus::Pending,
            importance: Importance::Medium,
            kind: None,
            title: format!("case {id}"),
            action: None,
            case_description: None,
            guest: None,
            owner_id: None,
            created_at: None,
            created_by: None,
            modified_at: None,
            modified_by: None,
            followups: Vec::new(),
        }
    }

    #[test]
    fn followup_pairing_requires_one_record_per_payload() {
        let seeds = vec![
            FollowupSeed {
                suggestion_text: "Call the guest".into(),
                assigned_to: Some(7),
            },
            FollowupSeed {
                suggestion_text: "Send an apology email".into(),
                assigned_to: None,
            },
        ];

        let err = pair_followups(&[created_case(1)], &seeds).unwrap_err();
        assert!(err.contains("1 case(s) for 2 payload(s)"));

        let followups = pair_followups(&[created_case(1), created_case(2)], &seeds).unwrap();
        assert_eq!(followups[0].case_id, 1);
        assert_eq!(followups[0].assigned_to, Some(7));
        assert_eq!(followups[1].case_id, 2);
        assert_eq!(followups[1].status, CaseStatus::Pending);
    }

    #[test]
    fn commit_plan_excludes_feedback_from_case_payload() {
        let drafts = vec![draft("Lost luggage", "Call the airline")];
        let plan = build_commit_plan(&drafts, &HashMap::new());
        let value = serde_json::to_value(&plan.cases[0]).unwrap();
        assert!(value.get("feedback").is_none());
        assert!(value.get("draft_id").is_none());
        assert_eq!(plan.followups[0].suggestion_text, "Call the airline");
    }

    #[test]
    fn reset_returns_to_first_step_but_keeps_user_directory() {
        let mut state = WorkflowState::default();
        state.available_users = vec![User {
            id: 7,
            name: "Maria".into(),
            is_admin: false,
        }];
        state.accept_file("report.pdf".into(), vec![1]);
        state.complete_extraction(WorkflowOutcome {
            cases: vec![ExtractedCase::default()],
            suggestions: vec![],
        });
        state.assign_user(0, Some(7));
        state.next();

        state.reset();
        assert_eq!(state.step, WizardStep::Upload);
        assert!(state.file.is_none());
        assert!(state.drafts.is_empty());
        assert!(state.assigned_users.is_empty());
        assert_eq!(state.available_users.len(), 1);
    }

    // The whole happy path below the network layer: SSE chunks split at
    // awkward boundaries, terminal payload into the wizard, one
    // assignment, then the commit plan.
    #[test]
    fn streamed_report_flows_into_commit_plan() {
        use crate::api::stream::SseLineBuffer;

        let mut buffer = SseLineBuffer::default();
        let mut events = Vec::new();
        events.extend(buffer.push(b"data: {\"step\":\"parsing\",\"progress\":0.3}\ndata: {\"st"));
        events.extend(buffer.push(
            "ep\":\"complete\",\"cases\":[{\"room\":\"204\",\"title\":\"Broken AC\"}],\
             \"suggestions\":[{\"suggestion_text\":\"Send maintenance and offer a room change\"}]}\n"
                .as_bytes(),
        ));
        assert_eq!(events.len(), 2);

        let terminal = events.last().unwrap();
        assert!(terminal.is_complete());
        let outcome = WorkflowOutcome {
            cases: terminal.cases.clone().unwrap_or_default(),
            suggestions: terminal.suggestions.clone().unwrap_or_default(),
        };

        let mut state = WorkflowState::default();
        state.accept_file("report.pdf".into(), vec![1]);
        state.begin_processing();
        state.apply_progress(&events[0]);
        state.complete_extraction(outcome);

        assert_eq!(state.step, WizardStep::Edit);
        assert_eq!(state.drafts.len(), 1);
        assert_eq!(state.drafts[0].room.as_deref(), Some("204"));

        state.assign_user(0, Some(7));
        state.next();

        let plan = build_commit_plan(&state.drafts, &state.assigned_users);
        assert_eq!(plan.cases[0].owner_id, Some(7));
        assert_eq!(plan.followups[0].assigned_to, Some(7));
        assert_eq!(
            plan.followups[0].suggestion_text,
            "Send maintenance and offer a room change"
        );
    }

    #[test]
    fn drafts_default_sensibly() {
        let drafts = attach_suggestions(vec![ExtractedCase::default()], &[]);
        assert_eq!(drafts[0].status, CaseStatus::Pending);
        assert_eq!(drafts[0].importance, Importance::Medium);
    }
}
