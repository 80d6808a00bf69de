// Page and field descriptors
//
// Descriptors are immutable once built; a reconfigured wizard (create vs
// edit) rebuilds its pages instead of mutating them in place.

use serde::{Deserialize, Serialize};

use crate::umc::{CLASS_QUERY_PATH, SCHOOL_QUERY_PATH};

pub const PAGE_GENERAL: &str = "general";
pub const PAGE_USER: &str = "user";

pub const FIELD_SCHOOL: &str = "school";
pub const FIELD_TYPE: &str = "type";
pub const FIELD_FIRSTNAME: &str = "firstname";
pub const FIELD_LASTNAME: &str = "lastname";
pub const FIELD_USERNAME: &str = "username";
pub const FIELD_CLASS: &str = "class";
pub const FIELD_MAIL: &str = "mailPrimaryAddress";
pub const FIELD_PASSWORD: &str = "password";
pub const FIELD_RECORD: &str = "record";

pub const ACTION_NEW_CLASS: &str = "newClass";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardMode {
    Create,
    Edit,
}

/// Category of user record being created or edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Student,
    Teacher,
    Staff,
    TeachersAndStaff,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Student,
        Role::Teacher,
        Role::Staff,
        Role::TeachersAndStaff,
    ];

    pub fn as_id(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Staff => "staff",
            Role::TeachersAndStaff => "teachersAndStaff",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Teacher => "Teacher",
            Role::Staff => "Staff",
            Role::TeachersAndStaff => "Teachers and staff",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_id() == id)
    }

    /// Only students are associated with a school class.
    pub fn uses_classes(&self) -> bool {
        matches!(self, Role::Student)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Paired input: value plus confirmation entry.
    Password,
    Dropdown,
    Hidden,
    /// Read-only display content, never submitted.
    StaticText,
}

/// Where a dropdown gets its permissible values from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsSource {
    Static(Vec<(&'static str, &'static str)>),
    /// Backend query path; the host resolves it through the connection.
    Query(&'static str),
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub initial: Option<String>,
    pub options: Option<OptionsSource>,
    /// Hide the widget when its option list has at most one entry.
    pub auto_hide: bool,
}

impl FieldSpec {
    fn text(name: &'static str, label: &'static str, required: bool) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            required,
            initial: None,
            options: None,
            auto_hide: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActionSpec {
    pub name: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone)]
pub struct PageSpec {
    pub name: &'static str,
    pub header_text: String,
    pub help_text: &'static str,
    pub fields: Vec<FieldSpec>,
    /// Rows of field/action names, rendered left to right.
    pub layout: Vec<Vec<&'static str>>,
    pub actions: Vec<ActionSpec>,
}

impl PageSpec {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Build the two wizard pages for the given mode and target school.
///
/// Pure: no side effects, same inputs produce the same descriptors. The
/// `record_dn` is only rendered in edit mode, as a read-only reference to
/// the underlying record.
pub fn build_pages(
    mode: WizardMode,
    school: &str,
    description: &str,
    record_dn: Option<&str>,
) -> Vec<PageSpec> {
    let school_field = match mode {
        WizardMode::Create => FieldSpec {
            name: FIELD_SCHOOL,
            label: "School",
            kind: FieldKind::Dropdown,
            required: true,
            initial: Some(school.to_string()),
            options: Some(OptionsSource::Query(SCHOOL_QUERY_PATH)),
            auto_hide: true,
        },
        // The school of an existing record cannot be changed here.
        WizardMode::Edit => FieldSpec {
            name: FIELD_SCHOOL,
            label: "School",
            kind: FieldKind::StaticText,
            required: false,
            initial: Some(school.to_string()),
            options: None,
            auto_hide: false,
        },
    };

    let general = PageSpec {
        name: PAGE_GENERAL,
        header_text: description.to_string(),
        help_text: "Specify the type of user to be created.",
        fields: vec![
            school_field,
            FieldSpec {
                name: FIELD_TYPE,
                label: "Type",
                kind: FieldKind::Dropdown,
                required: true,
                initial: Some(Role::Student.as_id().to_string()),
                options: Some(OptionsSource::Static(
                    Role::ALL.iter().map(|r| (r.as_id(), r.label())).collect(),
                )),
                auto_hide: false,
            },
        ],
        layout: vec![vec![FIELD_SCHOOL], vec![FIELD_TYPE]],
        actions: Vec::new(),
    };

    let mut fields = vec![
        FieldSpec::text(FIELD_FIRSTNAME, "Firstname", true),
        FieldSpec::text(FIELD_LASTNAME, "Lastname", true),
        FieldSpec::text(FIELD_USERNAME, "Username", true),
        FieldSpec {
            name: FIELD_CLASS,
            label: "Class",
            kind: FieldKind::Dropdown,
            required: false,
            initial: None,
            options: Some(OptionsSource::Query(CLASS_QUERY_PATH)),
            auto_hide: false,
        },
        FieldSpec::text(FIELD_MAIL, "E-Mail", false),
        FieldSpec {
            name: FIELD_PASSWORD,
            label: "Password",
            kind: FieldKind::Password,
            required: true,
            initial: None,
            options: None,
            auto_hide: false,
        },
    ];
    let mut layout = vec![
        vec![FIELD_FIRSTNAME, FIELD_LASTNAME],
        vec![FIELD_USERNAME],
        vec![FIELD_CLASS, ACTION_NEW_CLASS],
        vec![FIELD_MAIL],
        vec![FIELD_PASSWORD],
    ];

    if mode == WizardMode::Edit {
        fields.push(FieldSpec {
            name: FIELD_RECORD,
            label: "Record",
            kind: FieldKind::StaticText,
            required: false,
            initial: record_dn.map(str::to_string),
            options: None,
            auto_hide: false,
        });
        layout.push(vec![FIELD_RECORD]);
    }

    let user = PageSpec {
        name: PAGE_USER,
        header_text: description.to_string(),
        help_text: "Enter details to create a new user",
        fields,
        layout,
        actions: vec![ActionSpec {
            name: ACTION_NEW_CLASS,
            label: "Create a new class",
        }],
    };

    vec![general, user]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_mode_yields_general_then_user() {
        let pages = build_pages(WizardMode::Create, "Example School", "Add user", None);
        let names: Vec<&str> = pages.iter().map(|p| p.name).collect();
        assert_eq!(names, vec![PAGE_GENERAL, PAGE_USER]);

        let general = &pages[0];
        let school = general.field(FIELD_SCHOOL).unwrap();
        assert_eq!(school.kind, FieldKind::Dropdown);
        assert!(school.auto_hide, "single-school consoles hide the selector");
        assert_eq!(school.initial.as_deref(), Some("Example School"));

        let role = general.field(FIELD_TYPE).unwrap();
        match role.options.as_ref().unwrap() {
            OptionsSource::Static(options) => assert_eq!(options.len(), 4),
            other => panic!("expected static role options, got {:?}", other),
        }
    }

    #[test]
    fn user_page_layout_matches_form_grid() {
        let pages = build_pages(WizardMode::Create, "Example School", "Add user", None);
        let user = &pages[1];
        assert_eq!(
            user.layout,
            vec![
                vec![FIELD_FIRSTNAME, FIELD_LASTNAME],
                vec![FIELD_USERNAME],
                vec![FIELD_CLASS, ACTION_NEW_CLASS],
                vec![FIELD_MAIL],
                vec![FIELD_PASSWORD],
            ]
        );
        assert_eq!(user.actions[0].name, ACTION_NEW_CLASS);
        assert!(user.field(FIELD_RECORD).is_none());
    }

    #[test]
    fn edit_mode_fixes_school_and_links_record() {
        let pages = build_pages(
            WizardMode::Edit,
            "Example School",
            "Edit user",
            Some("uid=ada,ou=Example School"),
        );
        let school = pages[0].field(FIELD_SCHOOL).unwrap();
        assert_eq!(school.kind, FieldKind::StaticText);

        let record = pages[1].field(FIELD_RECORD).unwrap();
        assert_eq!(record.kind, FieldKind::StaticText);
        assert_eq!(record.initial.as_deref(), Some("uid=ada,ou=Example School"));
    }

    #[test]
    fn role_ids_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from_id(role.as_id()), Some(role));
        }
        assert_eq!(Role::from_id("teachersAndStaff"), Some(Role::TeachersAndStaff));
        assert!(Role::from_id("principal").is_none());
    }
}
