// Wizard engine: declarative page descriptors, session state, and the
// conditional class-field controller.

pub mod controller;
pub mod flow;
pub mod session;
pub mod spec;

pub use controller::{ClassFieldController, WizardMsg};
pub use flow::{UserWizard, WizardError, WizardFlow};
pub use session::{FieldIssue, SessionState};
pub use spec::{build_pages, FieldKind, FieldSpec, PageSpec, Role, WizardMode};
