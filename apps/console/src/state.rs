use std::collections::HashMap;

use dioxus::prelude::*;

use crate::api::ClientError;
use crate::models::{CaseRecord, Followup, Task, User};
use crate::session::{self, Session};
use crate::workflow::WorkflowState;

pub type AppSignal = Signal<AppState>;

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

/// One REST collection bound to a list view. `row_errors` keeps a failed
/// row mutation local to that row; sibling rows stay untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectionState<T> {
    pub items: Vec<T>,
    pub loaded: bool,
    pub is_loading: bool,
    pub error: Option<String>,
    pub row_errors: HashMap<i64, String>,
}

// Manual impl: a derive would demand `T: Default`, and the row types
// deliberately have no default value.
impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
            is_loading: false,
            error: None,
            row_errors: HashMap::new(),
        }
    }
}

impl<T> CollectionState<T> {
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.loaded = true;
        self.is_loading = false;
        self.error = None;
        self.row_errors.clear();
    }

    pub fn fail(&mut self, message: String) {
        self.error = Some(message);
        self.is_loading = false;
    }

    pub fn set_row_error(&mut self, id: i64, message: String) {
        self.row_errors.insert(id, message);
    }

    pub fn clear_row_error(&mut self, id: i64) {
        self.row_errors.remove(&id);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OperationState {
    pub last_message: Option<String>,
    pub error: Option<String>,
    pub context: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub session: Option<Session>,
    pub cases: CollectionState<CaseRecord>,
    pub followups: CollectionState<Followup>,
    pub tasks: CollectionState<Task>,
    pub users: CollectionState<User>,
    pub workflow: WorkflowState,
    pub operation: OperationState,
}

impl AppState {
    /// Session is restored once at startup from durable storage.
    pub fn restore() -> Self {
        Self {
            session: session::load(),
            ..Self::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// A 401 anywhere invalidates the whole session, regardless of which
    /// screen triggered the call.
    pub fn apply_session_invalidation(&mut self) {
        self.session = None;
        self.operation.error = Some(SESSION_EXPIRED_MESSAGE.to_string());
        self.operation.last_message = None;
        self.operation.context = Some("Authentication".to_string());
    }
}

#[derive(Clone, Copy)]
pub struct AppActions {
    state: AppSignal,
}

impl AppActions {
    pub fn new(state: AppSignal) -> Self {
        Self { state }
    }

    fn write(&self) -> impl std::ops::DerefMut<Target = AppState> + '_ {
        let mut state = self.state;
        state.write_unchecked()
    }

    // ---- session ----

    pub fn set_session(&self, new_session: Session) {
        session::store(&new_session);
        let mut state = self.write();
        state.session = Some(new_session);
        state.operation = OperationState::default();
    }

    pub fn logout(&self) {
        session::clear();
        let mut state = self.write();
        state.session = None;
        // Collections belong to the previous login.
        state.cases = CollectionState::default();
        state.followups = CollectionState::default();
        state.tasks = CollectionState::default();
        state.users = CollectionState::default();
        state.workflow = WorkflowState::default();
        state.operation = OperationState::default();
    }

    /// Translate a client error into a user-facing message, routing 401
    /// through the global session-invalidation path.
    pub fn describe_failure(&self, err: &ClientError) -> String {
        if err.is_unauthorized() {
            self.write().apply_session_invalidation();
            SESSION_EXPIRED_MESSAGE.to_string()
        } else {
            err.to_string()
        }
    }

    // ---- cases ----

    pub fn set_cases_loading(&self, loading: bool) {
        self.write().cases.is_loading = loading;
    }

    pub fn set_cases(&self, items: Vec<CaseRecord>) {
        self.write().cases.set_items(items);
    }

    pub fn fail_cases(&self, err: &ClientError) {
        let message = self.describe_failure(err);
        self.write().cases.fail(message);
    }

    pub fn set_case_row_error(&self, id: i64, err: &ClientError) {
        let message = self.describe_failure(err);
        self.write().cases.set_row_error(id, message);
    }

    pub fn clear_case_row_error(&self, id: i64) {
        self.write().cases.clear_row_error(id);
    }

    // ---- followups ----

    pub fn set_followups_loading(&self, loading: bool) {
        self.write().followups.is_loading = loading;
    }

    pub fn set_followups(&self, items: Vec<Followup>) {
        self.write().followups.set_items(items);
    }

    pub fn fail_followups(&self, err: &ClientError) {
        let message = self.describe_failure(err);
        self.write().followups.fail(message);
    }

    pub fn set_followup_row_error(&self, id: i64, err: &ClientError) {
        let message = self.describe_failure(err);
        self.write().followups.set_row_error(id, message);
    }

    // ---- tasks ----

    pub fn set_tasks_loading(&self, loading: bool) {
        self.write().tasks.is_loading = loading;
    }

    pub fn set_tasks(&self, items: Vec<Task>) {
        self.write().tasks.set_items(items);
    }

    pub fn fail_tasks(&self, err: &ClientError) {
        let message = self.describe_failure(err);
        self.write().tasks.fail(message);
    }

    pub fn set_task_row_error(&self, id: i64, err: &ClientError) {
        let message = self.describe_failure(err);
        self.write().tasks.set_row_error(id, message);
    }

    // ---- users ----

    pub fn set_users_loading(&self, loading: bool) {
        self.write().users.is_loading = loading;
    }

    pub fn set_users(&self, items: Vec<User>) {
        let mut state = self.write();
        state.workflow.available_users = items.clone();
        state.users.set_items(items);
    }

    pub fn fail_users(&self, err: &ClientError) {
        let message = self.describe_failure(err);
        self.write().users.fail(message);
    }

    // ---- workflow ----

    pub fn update_workflow(&self, apply: impl FnOnce(&mut WorkflowState)) {
        apply(&mut self.write().workflow);
    }

    pub fn snapshot_workflow(&self) -> WorkflowState {
        self.state.read().workflow.clone()
    }

    // ---- operation toasts ----

    pub fn set_operation_success(&self, context: impl Into<String>, message: String) {
        let mut state = self.write();
        state.operation.last_message = Some(message);
        state.operation.error = None;
        state.operation.context = Some(context.into());
    }

    pub fn set_operation_error(&self, context: impl Into<String>, err: &ClientError) {
        let message = self.describe_failure(err);
        let mut state = self.write();
        state.operation.error = Some(message);
        state.operation.last_message = None;
        state.operation.context = Some(context.into());
    }

    pub fn clear_operation_status(&self) {
        self.write().operation = OperationState::default();
    }
}

pub fn use_app_state() -> AppSignal {
    use_context::<AppSignal>()
}

pub fn use_app_actions() -> AppActions {
    AppActions::new(use_app_state())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CaseStatus, User};

    fn case(id: i64) -> CaseRecord {
        CaseRecord {
            id,
            room: None,
            status: CaseStatus::Pending,
            importance: Default::default(),
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
    fn collections_default_without_default_row_types() {
        // None of the row types implements Default; the store still must.
        let state = AppState::default();
        assert!(state.cases.items.is_empty());
        assert!(!state.followups.loaded);
        assert!(state.tasks.error.is_none());
        assert!(state.users.row_errors.is_empty());
    }

    #[test]
    fn session_invalidation_clears_session_globally() {
        let mut state = AppState {
            session: Some(Session {
                token: "tok".into(),
                user: User {
                    id: 1,
                    name: "Desk".into(),
                    is_admin: false,
                },
            }),
            ..AppState::default()
        };
        assert!(state.is_authenticated());

        state.apply_session_invalidation();
        assert!(!state.is_authenticated());
        assert_eq!(
            state.operation.error.as_deref(),
            Some(SESSION_EXPIRED_MESSAGE)
        );
    }

    #[test]
    fn row_error_is_local_to_one_row() {
        let mut cases: CollectionState<CaseRecord> = CollectionState::default();
        cases.set_items(vec![case(1), case(2), case(3)]);

        cases.set_row_error(2, "update failed".into());
        assert_eq!(cases.row_errors.get(&2).map(String::as_str), Some("update failed"));
        assert!(cases.row_errors.get(&1).is_none());
        assert!(cases.row_errors.get(&3).is_none());
        // Displayed items are untouched; no optimistic mutation happened.
        assert_eq!(cases.items.len(), 3);
        assert_eq!(cases.items[1].status, CaseStatus::Pending);

        cases.clear_row_error(2);
        assert!(cases.row_errors.is_empty());
    }

    #[test]
    fn refetch_replaces_items_and_clears_errors() {
        let mut cases: CollectionState<CaseRecord> = CollectionState::default();
        cases.fail("boom".into());
        assert_eq!(cases.error.as_deref(), Some("boom"));

        cases.set_items(vec![case(5)]);
        assert!(cases.error.is_none());
        assert!(cases.loaded);
        assert_eq!(cases.items.len(), 1);
    }
}
