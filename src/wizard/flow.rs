// User wizard flow
//
// The generic host owns navigation chrome and rendering; it drives a
// concrete wizard through the WizardFlow capability interface instead of the
// wizard subclassing the host.

use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::models::requests::CreateUserRequest;
use crate::models::responses::CreatedUserDto;
use crate::umc::{CommandError, UmcConnection};
use crate::utils::logging::mask_sensitive;
use crate::wizard::controller::{ClassFieldController, WizardMsg};
use crate::wizard::session::{FieldIssue, SessionState};
use crate::wizard::spec::{
    build_pages, PageSpec, WizardMode, FIELD_CLASS, FIELD_FIRSTNAME, FIELD_LASTNAME, FIELD_MAIL,
    FIELD_USERNAME, PAGE_USER,
};

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("page '{page}' has invalid fields")]
    Validation {
        page: &'static str,
        issues: Vec<FieldIssue>,
    },
    #[error("{0}")]
    Backend(#[from] CommandError),
}

/// Capability interface between a concrete wizard and its host.
#[async_trait]
pub trait WizardFlow: Send {
    fn pages(&self) -> &[PageSpec];
    fn session(&self) -> &SessionState;

    fn set_value(&mut self, field: &str, value: &str);
    fn set_password(&mut self, entry: &str, confirmation: &str);

    /// Host lifecycle hook: a page became visible (navigation or re-entry).
    fn on_page_shown(&mut self, page_name: &str);
    /// Host change hook: the role dropdown's value changed.
    fn on_role_changed(&mut self);
    /// Host event pump: dispatch one completed asynchronous operation.
    fn handle_message(&mut self, msg: WizardMsg) -> Result<(), CommandError>;

    fn page_is_valid(&self, page_name: &str) -> bool;
    /// Whether backwards navigation away from `page_name` is permitted.
    fn has_previous(&self, page_name: &str) -> bool;

    async fn submit(&mut self) -> Result<CreatedUserDto, WizardError>;
    fn restart(&mut self);
}

pub struct UserWizard {
    pages: Vec<PageSpec>,
    session: SessionState,
    controller: ClassFieldController,
    connection: Arc<dyn UmcConnection>,
}

impl UserWizard {
    /// Open a wizard session. The returned receiver is the host's event
    /// pump; completed asynchronous operations arrive there and must be fed
    /// back through `handle_message`.
    pub fn new(
        mode: WizardMode,
        school: &str,
        description: &str,
        record_dn: Option<&str>,
        connection: Arc<dyn UmcConnection>,
    ) -> (Self, mpsc::UnboundedReceiver<WizardMsg>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let wizard = Self {
            pages: build_pages(mode, school, description, record_dn),
            session: SessionState::new(mode, school),
            controller: ClassFieldController::new(Arc::clone(&connection), tx),
            connection,
        };
        (wizard, rx)
    }

    fn page(&self, name: &str) -> Option<&PageSpec> {
        self.pages.iter().find(|p| p.name == name)
    }

    fn collect_request(&self) -> CreateUserRequest {
        let value = |field: &str| self.session.value(field).unwrap_or("").to_string();
        let optional = |field: &str| self.session.value(field).map(str::to_string);

        CreateUserRequest {
            school: self.session.school().to_string(),
            role: self.session.role(),
            firstname: value(FIELD_FIRSTNAME),
            lastname: value(FIELD_LASTNAME),
            username: value(FIELD_USERNAME),
            class: if self.session.class_visible {
                optional(FIELD_CLASS)
            } else {
                None
            },
            mail_primary_address: optional(FIELD_MAIL),
            password: self.session.password.entry.clone(),
            offered_classes: self.session.class_options.clone(),
        }
    }
}

#[async_trait]
impl WizardFlow for UserWizard {
    fn pages(&self) -> &[PageSpec] {
        &self.pages
    }

    fn session(&self) -> &SessionState {
        &self.session
    }

    fn set_value(&mut self, field: &str, value: &str) {
        self.session.set_value(field, value);
    }

    fn set_password(&mut self, entry: &str, confirmation: &str) {
        self.session.password.entry = entry.to_string();
        self.session.password.confirmation = confirmation.to_string();
    }

    fn on_page_shown(&mut self, page_name: &str) {
        info!("[PHASE: navigation] [STEP: page_shown] {}", page_name);
        self.controller.on_page_shown(&mut self.session, page_name);
    }

    fn on_role_changed(&mut self) {
        self.controller.on_role_changed(&mut self.session);
    }

    fn handle_message(&mut self, msg: WizardMsg) -> Result<(), CommandError> {
        self.controller.handle_message(&mut self.session, msg)
    }

    fn page_is_valid(&self, page_name: &str) -> bool {
        match self.page(page_name) {
            Some(page) => self.session.page_is_valid(page),
            None => false,
        }
    }

    fn has_previous(&self, page_name: &str) -> bool {
        // The record's school must not change during an edit, so the edit
        // flow pins the user page; create mode may step back freely.
        match page_name {
            PAGE_USER => self.session.mode == WizardMode::Create,
            _ => false,
        }
    }

    async fn submit(&mut self) -> Result<CreatedUserDto, WizardError> {
        for page in &self.pages {
            let issues = self.session.validate_page(page);
            if !issues.is_empty() {
                return Err(WizardError::Validation {
                    page: page.name,
                    issues,
                });
            }
        }

        let request = self.collect_request();
        let correlation_id = Uuid::new_v4();
        info!(
            "[PHASE: submit] [STEP: create_user] {} creating '{}' at '{}'",
            correlation_id,
            mask_sensitive(&request.username),
            request.school
        );

        let created = self.connection.create_user(&request).await?;

        self.session.note = Some(format!(
            "User \"{}\" has been successfully created. Continue to create another user or press \"Cancel\" to close this wizard.",
            created.username
        ));
        info!(
            "[PHASE: submit] [STEP: created] {} record '{}'",
            correlation_id, created.dn
        );

        Ok(created)
    }

    fn restart(&mut self) {
        self.session.restart(&self.pages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::umc::DemoConnection;
    use crate::wizard::spec::{FieldKind, Role, FIELD_SCHOOL, FIELD_TYPE, PAGE_GENERAL};

    fn demo_wizard(mode: WizardMode) -> (UserWizard, mpsc::UnboundedReceiver<WizardMsg>) {
        let connection = Arc::new(DemoConnection::new("Example School"));
        UserWizard::new(mode, "Example School", "Add a user", None, connection)
    }

    fn fill_user_page(wizard: &mut UserWizard) {
        wizard.set_value(FIELD_FIRSTNAME, "Ada");
        wizard.set_value(FIELD_LASTNAME, "Lovelace");
        wizard.set_value(FIELD_USERNAME, "ada");
        wizard.set_value(FIELD_CLASS, "1a");
        wizard.set_password("s3cret", "s3cret");
    }

    #[tokio::test]
    async fn create_mode_scenario_builds_both_pages() {
        // mode=create, school="Example School" -> exactly two pages in order.
        let (wizard, _rx) = demo_wizard(WizardMode::Create);
        let names: Vec<&str> = wizard.pages().iter().map(|p| p.name).collect();
        assert_eq!(names, vec![PAGE_GENERAL, PAGE_USER]);

        let general = &wizard.pages()[0];
        let school = general.field(FIELD_SCHOOL).unwrap();
        assert!(school.auto_hide);
        assert_eq!(school.initial.as_deref(), Some("Example School"));
        assert_eq!(general.field(FIELD_TYPE).unwrap().kind, FieldKind::Dropdown);
    }

    #[tokio::test]
    async fn full_create_flow_reload_submit_restart() {
        let (mut wizard, mut rx) = demo_wizard(WizardMode::Create);

        wizard.on_page_shown(PAGE_USER);
        let msg = rx.recv().await.expect("class reload");
        wizard.handle_message(msg).unwrap();
        assert_eq!(wizard.session().class_options, vec!["1a", "1b", "2a"]);

        fill_user_page(&mut wizard);
        assert!(wizard.page_is_valid(PAGE_USER));

        let created = wizard.submit().await.unwrap();
        assert_eq!(created.username, "ada");
        let note = wizard.session().note.clone().unwrap();
        assert!(note.contains("User \"ada\" has been successfully created"));

        wizard.restart();
        assert_eq!(wizard.session().value(FIELD_CLASS), Some("1a"));
        assert_eq!(wizard.session().value(FIELD_USERNAME), None);
        assert!(wizard.session().password.is_empty());
        assert!(wizard.session().note.is_none());
    }

    #[tokio::test]
    async fn submit_rejects_an_invalid_page() {
        let (mut wizard, _rx) = demo_wizard(WizardMode::Create);
        fill_user_page(&mut wizard);
        wizard.set_password("s3cret", "different");

        let err = wizard.submit().await.expect_err("mismatch must block");
        match err {
            WizardError::Validation { page, issues } => {
                assert_eq!(page, PAGE_USER);
                assert_eq!(issues[0].field, "password");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_student_submission_omits_the_class() {
        let (mut wizard, _rx) = demo_wizard(WizardMode::Create);
        fill_user_page(&mut wizard);
        wizard.set_value(FIELD_TYPE, Role::Teacher.as_id());
        wizard.on_role_changed();

        let request = wizard.collect_request();
        assert_eq!(request.role, Role::Teacher);
        assert_eq!(request.class, None);

        wizard.submit().await.unwrap();
    }

    #[tokio::test]
    async fn back_navigation_policy_differs_by_mode() {
        let (create, _rx) = demo_wizard(WizardMode::Create);
        assert!(create.has_previous(PAGE_USER));
        assert!(!create.has_previous(PAGE_GENERAL));

        let (edit, _rx) = demo_wizard(WizardMode::Edit);
        assert!(!edit.has_previous(PAGE_USER));
        assert!(!edit.has_previous(PAGE_GENERAL));
    }
}
