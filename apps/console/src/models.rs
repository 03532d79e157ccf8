use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shown in the edit step when the backend produced no suggestion for a case.
pub const NO_SUGGESTION_PLACEHOLDER: &str = "No suggestion generated";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Rejected,
}

impl CaseStatus {
    pub const ALL: [CaseStatus; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Completed,
        Self::Rejected,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
            Self::Rejected => "Rejected",
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_wire() == value)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Low,
    #[default]
    Medium,
    High,
}

impl Importance {
    pub const ALL: [Importance; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.as_wire() == value)
    }
}

/// A guest-relations incident record as the backend stores it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: i64,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub status: CaseStatus,
    #[serde(default)]
    pub importance: Importance,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    pub title: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub case_description: Option<String>,
    #[serde(default)]
    pub guest: Option<String>,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub modified_at: Option<String>,
    #[serde(default)]
    pub modified_by: Option<String>,
    #[serde(default)]
    pub followups: Vec<Followup>,
}

/// The allow-listed payload for case creation. Transient draft fields
/// (notably the editable AI feedback) never appear here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseCreate {
    pub room: Option<String>,
    pub status: CaseStatus,
    pub importance: Importance,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: String,
    pub action: Option<String>,
    pub case_description: Option<String>,
    pub guest: Option<String>,
    pub case_date: Option<String>,
    pub created_by: Option<String>,
    pub modified_by: Option<String>,
    pub owner_id: Option<i64>,
}

/// Row patch. Assignee fields are double-optional: `None` leaves the
/// field out of the payload entirely, `Some(None)` sends an explicit
/// null to clear the assignee on the server.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CaseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CaseStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Option<i64>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Followup {
    pub id: i64,
    pub case_id: i64,
    pub suggestion_text: String,
    #[serde(default)]
    pub status: CaseStatus,
    #[serde(default)]
    pub assigned_to: Option<i64>,
    // Present only on the with-case-info listing.
    #[serde(default)]
    pub case_title: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FollowupCreate {
    pub case_id: i64,
    pub suggestion_text: String,
    pub status: CaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FollowupUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CaseStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Option<i64>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    AmenityList,
    Emails,
    CourtesyCalls,
    #[default]
    Custom,
}

impl TaskType {
    pub const ALL: [TaskType; 4] = [
        Self::AmenityList,
        Self::Emails,
        Self::CourtesyCalls,
        Self::Custom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::AmenityList => "Amenity list",
            Self::Emails => "Emails",
            Self::CourtesyCalls => "Courtesy calls",
            Self::Custom => "Custom",
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::AmenityList => "amenity_list",
            Self::Emails => "emails",
            Self::CourtesyCalls => "courtesy_calls",
            Self::Custom => "custom",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_wire() == value)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_wire() == value)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub task_type: TaskType,
    #[serde(default)]
    pub assigned_to: Option<i64>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub task_type: TaskType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub status: TaskStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Option<i64>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

/// A case as it arrives from document extraction, before review.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedCase {
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub status: Option<CaseStatus>,
    #[serde(default)]
    pub importance: Option<Importance>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub case_description: Option<String>,
    #[serde(default)]
    pub guest: Option<String>,
    #[serde(default)]
    pub case_date: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub modified_by: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default)]
    pub suggestion_text: Option<String>,
}

/// Combined result of the extraction + suggestion run; the blocking
/// endpoint returns it directly, the streaming endpoint delivers it on
/// the terminal `complete` event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowOutcome {
    #[serde(default)]
    pub cases: Vec<ExtractedCase>,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

/// Transient, editable case held only inside the upload wizard. The
/// `draft_id` is generated at extraction time and is stable for the life
/// of the draft list; user assignment stays keyed by list index until
/// commit.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseDraft {
    pub draft_id: Uuid,
    pub room: Option<String>,
    pub status: CaseStatus,
    pub importance: Importance,
    pub kind: Option<String>,
    pub title: String,
    pub action: Option<String>,
    pub case_description: Option<String>,
    pub guest: Option<String>,
    pub case_date: Option<String>,
    pub created_by: Option<String>,
    pub modified_by: Option<String>,
    pub feedback: String,
}

impl CaseDraft {
    pub fn from_extracted(case: ExtractedCase, suggestion: Option<&Suggestion>) -> Self {
        let feedback = suggestion
            .and_then(|s| s.suggestion_text.clone())
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| NO_SUGGESTION_PLACEHOLDER.to_string());

        Self {
            draft_id: Uuid::new_v4(),
            room: case.room,
            status: case.status.unwrap_or_default(),
            importance: case.importance.unwrap_or_default(),
            kind: case.kind,
            title: case
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Untitled case".to_string()),
            action: case.action,
            case_description: case.case_description,
            guest: case.guest,
            case_date: case.case_date,
            created_by: case.created_by,
            modified_by: case.modified_by,
            feedback,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct AnonymizeRequest<'a> {
    pub text: &'a str,
    pub preserve_dates: bool,
    pub preserve_times: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AnonymizeResponse {
    pub anonymized_text: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct EmailAssistantRequest<'a> {
    pub email_content: &'a str,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmailAssistantResponse {
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_status_round_trips_through_wire_names() {
        for status in CaseStatus::ALL {
            assert_eq!(CaseStatus::from_wire(status.as_wire()), Some(status));
        }
        assert_eq!(CaseStatus::from_wire("open"), None);
    }

    #[test]
    fn case_record_deserializes_backend_shape() {
        let case: CaseRecord = serde_json::from_value(serde_json::json!({
            "id": 12,
            "room": "101",
            "status": "in_progress",
            "importance": "high",
            "type": "complaint",
            "title": "Noise complaint",
            "owner_id": 7
        }))
        .unwrap();

        assert_eq!(case.status, CaseStatus::InProgress);
        assert_eq!(case.importance, Importance::High);
        assert_eq!(case.kind.as_deref(), Some("complaint"));
        assert_eq!(case.owner_id, Some(7));
        assert!(case.followups.is_empty());
    }

    #[test]
    fn case_create_serializes_type_field_name() {
        let payload = CaseCreate {
            title: "Late checkout".into(),
            kind: Some("request".into()),
            ..CaseCreate::default()
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["type"], "request");
        assert_eq!(value["status"], "pending");
        assert!(value.get("feedback").is_none());
    }

    #[test]
    fn update_payloads_distinguish_clear_from_untouched() {
        let untouched = CaseUpdate::default();
        let value = serde_json::to_value(&untouched).unwrap();
        assert!(value.get("owner_id").is_none());

        let cleared = CaseUpdate {
            owner_id: Some(None),
            ..CaseUpdate::default()
        };
        let value = serde_json::to_value(&cleared).unwrap();
        assert!(value["owner_id"].is_null());

        let assigned = FollowupUpdate {
            assigned_to: Some(Some(7)),
            ..FollowupUpdate::default()
        };
        let value = serde_json::to_value(&assigned).unwrap();
        assert_eq!(value["assigned_to"], 7);
        assert!(value.get("status").is_none());
    }

    #[test]
    fn draft_falls_back_to_placeholder_feedback() {
        let draft = CaseDraft::from_extracted(ExtractedCase::default(), None);
        assert_eq!(draft.feedback, NO_SUGGESTION_PLACEHOLDER);
        assert_eq!(draft.title, "Untitled case");

        let blank = Suggestion {
            suggestion_text: Some("   ".into()),
        };
        let draft = CaseDraft::from_extracted(ExtractedCase::default(), Some(&blank));
        assert_eq!(draft.feedback, NO_SUGGESTION_PLACEHOLDER);
    }

    #[test]
    fn draft_carries_suggestion_text() {
        let suggestion = Suggestion {
            suggestion_text: Some("Offer complimentary breakfast".into()),
        };
        let extracted = ExtractedCase {
            room: Some("101".into()),
            title: Some("Cold breakfast".into()),
            ..ExtractedCase::default()
        };
        let draft = CaseDraft::from_extracted(extracted, Some(&suggestion));
        assert_eq!(draft.feedback, "Offer complimentary breakfast");
        assert_eq!(draft.room.as_deref(), Some("101"));
    }
}
