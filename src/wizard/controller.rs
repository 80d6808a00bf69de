// Conditional class-field controller
//
// Keeps the class selector consistent with the selected role and reloads its
// option list from the backend. Every reload carries a ticket; only the
// newest ticket may apply its response, so a slow earlier response can never
// overwrite a newer one.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::mpsc;

use crate::umc::{CommandError, UmcConnection};
use crate::wizard::session::SessionState;
use crate::wizard::spec::{FIELD_CLASS, PAGE_GENERAL, PAGE_USER};

/// Messages delivered to the host's event pump once an asynchronous reload
/// completes.
#[derive(Debug)]
pub enum WizardMsg {
    ClassListLoaded { ticket: u64, classes: Vec<String> },
    ClassRefreshFailed { ticket: u64, error: CommandError },
}

pub struct ClassFieldController {
    connection: Arc<dyn UmcConnection>,
    tx: mpsc::UnboundedSender<WizardMsg>,
    current_ticket: u64,
}

impl ClassFieldController {
    pub fn new(connection: Arc<dyn UmcConnection>, tx: mpsc::UnboundedSender<WizardMsg>) -> Self {
        Self {
            connection,
            tx,
            current_ticket: 0,
        }
    }

    /// Wizard-level page hook. Re-entering the general page re-establishes
    /// the role/class invariant; showing the user page reloads the classes.
    pub fn on_page_shown(&mut self, state: &mut SessionState, page_name: &str) {
        match page_name {
            PAGE_GENERAL => self.on_role_changed(state),
            PAGE_USER => self.refresh(state),
            _ => {}
        }
    }

    pub fn on_role_changed(&mut self, state: &mut SessionState) {
        let role = state.role();
        if role.uses_classes() {
            state.class_visible = true;
            state.class_required = true;
            state.new_class_visible = true;
            self.refresh(state);
        } else {
            state.clear_value(FIELD_CLASS);
            state.class_required = false;
            state.class_visible = false;
            state.new_class_visible = false;
        }
    }

    /// Issue one asynchronous class-list query for the session's school.
    /// No-op while no school is known.
    pub fn refresh(&mut self, state: &SessionState) {
        let school = state.school().to_string();
        if school.is_empty() {
            debug!("[PHASE: classes] [STEP: refresh] no school selected, skipping");
            return;
        }

        self.current_ticket += 1;
        let ticket = self.current_ticket;
        let connection = Arc::clone(&self.connection);
        let tx = self.tx.clone();
        info!(
            "[PHASE: classes] [STEP: refresh] querying classes of '{}' (ticket {})",
            school, ticket
        );

        tokio::spawn(async move {
            match connection.list_classes(&school).await {
                Ok(entries) => {
                    let classes = entries.into_iter().map(|e| e.label).collect();
                    let _ = tx.send(WizardMsg::ClassListLoaded { ticket, classes });
                }
                Err(error) => {
                    let _ = tx.send(WizardMsg::ClassRefreshFailed { ticket, error });
                }
            }
        });
    }

    /// Apply a completed reload. Returns false when the response is stale,
    /// i.e. a newer reload was issued meanwhile; stale lists are dropped.
    pub fn apply_class_list(
        &self,
        state: &mut SessionState,
        ticket: u64,
        classes: Vec<String>,
    ) -> bool {
        if ticket != self.current_ticket {
            debug!(
                "[PHASE: classes] [STEP: apply] dropping stale list (ticket {}, current {})",
                ticket, self.current_ticket
            );
            return false;
        }

        // Keep the selection only while the backend still offers it; a value
        // absent from the new list would pass validation without being
        // submittable.
        if let Some(selected) = state.value(FIELD_CLASS) {
            if !classes.iter().any(|c| c == selected) {
                state.clear_value(FIELD_CLASS);
            }
        }
        state.class_options = classes;
        true
    }

    /// Dispatch one message from the event pump. A failed reload keeps the
    /// prior option list; its error is handed back for the host's generic
    /// error surface.
    pub fn handle_message(
        &self,
        state: &mut SessionState,
        msg: WizardMsg,
    ) -> Result<(), CommandError> {
        match msg {
            WizardMsg::ClassListLoaded { ticket, classes } => {
                self.apply_class_list(state, ticket, classes);
                Ok(())
            }
            WizardMsg::ClassRefreshFailed { ticket, error } => {
                if ticket != self.current_ticket {
                    return Ok(());
                }
                warn!(
                    "[PHASE: classes] [STEP: refresh] ticket {} failed: {}",
                    ticket, error.internal_details
                );
                Err(error)
            }
        }
    }
}
