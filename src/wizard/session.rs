// Wizard session state
//
// All user-entered values live here, not in ambient widget state. Handlers
// receive the session explicitly and mutate it; it is created when the
// wizard opens and discarded on close or successful submission.

use std::collections::HashMap;

use crate::utils::validation::{validate_email, validate_password_pair, validate_username};
use crate::wizard::spec::{
    FieldKind, FieldSpec, PageSpec, Role, WizardMode, FIELD_CLASS, FIELD_MAIL, FIELD_SCHOOL,
    FIELD_TYPE, FIELD_USERNAME, PAGE_USER,
};

/// A failed field-level check, surfaced inline by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// The paired password control. Cleared by setting both entries to empty;
/// `restart` nulls it explicitly instead of resetting to a default.
#[derive(Debug, Clone, Default)]
pub struct PasswordPair {
    pub entry: String,
    pub confirmation: String,
}

impl PasswordPair {
    pub fn is_empty(&self) -> bool {
        self.entry.is_empty() && self.confirmation.is_empty()
    }

    pub fn clear(&mut self) {
        self.entry.clear();
        self.confirmation.clear();
    }
}

#[derive(Debug)]
pub struct SessionState {
    pub mode: WizardMode,
    pub page_index: usize,
    values: HashMap<String, String>,
    pub password: PasswordPair,

    // Class selector state, kept consistent with the selected role by the
    // ClassFieldController.
    pub class_options: Vec<String>,
    pub class_visible: bool,
    pub class_required: bool,
    pub new_class_visible: bool,

    /// Success note shown on the user page after a completed creation.
    pub note: Option<String>,
}

impl SessionState {
    pub fn new(mode: WizardMode, school: &str) -> Self {
        let mut values = HashMap::new();
        if !school.is_empty() {
            values.insert(FIELD_SCHOOL.to_string(), school.to_string());
        }
        // The role dropdown starts on its first option.
        values.insert(FIELD_TYPE.to_string(), Role::Student.as_id().to_string());

        Self {
            mode,
            page_index: 0,
            values,
            password: PasswordPair::default(),
            class_options: Vec::new(),
            class_visible: true,
            class_required: true,
            new_class_visible: true,
            note: None,
        }
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn set_value(&mut self, field: &str, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.values.remove(field);
        } else {
            self.values.insert(field.to_string(), value);
        }
    }

    pub fn clear_value(&mut self, field: &str) {
        self.values.remove(field);
    }

    /// Currently selected role; unparseable or missing values fall back to
    /// the dropdown's first option.
    pub fn role(&self) -> Role {
        self.value(FIELD_TYPE)
            .and_then(Role::from_id)
            .unwrap_or(Role::Student)
    }

    pub fn school(&self) -> &str {
        self.value(FIELD_SCHOOL).unwrap_or("")
    }

    /// The class field's requiredness is controller-driven; every other
    /// field keeps its descriptor value.
    fn effective_required(&self, field: &FieldSpec) -> bool {
        if field.name == FIELD_CLASS {
            self.class_visible && self.class_required
        } else {
            field.required
        }
    }

    /// Run all field-level checks for one page. An empty issue list is the
    /// "page is valid" signal that allows navigation.
    pub fn validate_page(&self, page: &PageSpec) -> Vec<FieldIssue> {
        let mut issues = Vec::new();

        for field in &page.fields {
            if field.kind == FieldKind::StaticText {
                continue;
            }

            if field.kind == FieldKind::Password {
                if let Err(e) = validate_password_pair(&self.password.entry, &self.password.confirmation) {
                    issues.push(FieldIssue {
                        field: field.name.to_string(),
                        message: e.to_string(),
                    });
                }
                continue;
            }

            let value = self.value(field.name).unwrap_or("");
            if value.is_empty() {
                if self.effective_required(field) {
                    issues.push(FieldIssue {
                        field: field.name.to_string(),
                        message: format!("{} is required", field.label),
                    });
                }
                continue;
            }

            let checked = match field.name {
                FIELD_USERNAME => validate_username(value),
                FIELD_MAIL => validate_email(value),
                _ => Ok(()),
            };
            if let Err(e) = checked {
                issues.push(FieldIssue {
                    field: field.name.to_string(),
                    message: e.to_string(),
                });
            }
        }

        issues
    }

    pub fn page_is_valid(&self, page: &PageSpec) -> bool {
        self.validate_page(page).is_empty()
    }

    /// Reset for the next creation: every user-page field is cleared except
    /// the class selector, which deliberately survives so rapid successive
    /// creations can reuse it. The password pair is nulled explicitly.
    pub fn restart(&mut self, pages: &[PageSpec]) {
        if let Some(user_page) = pages.iter().find(|p| p.name == PAGE_USER) {
            for field in &user_page.fields {
                if field.name == FIELD_CLASS || field.kind == FieldKind::StaticText {
                    continue;
                }
                self.values.remove(field.name);
            }
        }
        self.password.clear();
        self.note = None;
        self.page_index = 0;
    }
}
