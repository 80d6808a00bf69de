// Deterministic proof runners (no backend, no UI host).
//
// Each drives a full wizard session against the demo connection, writes a
// transcript under the log folder, and fails on the first contract break.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::info;
use tokio::time::timeout;

use crate::settings::WizardSettings;
use crate::umc::DemoConnection;
use crate::utils::path_resolver::resolve_log_folder;
use crate::wizard::spec::{
    FieldKind, Role, FIELD_CLASS, FIELD_FIRSTNAME, FIELD_LASTNAME, FIELD_RECORD, FIELD_SCHOOL,
    FIELD_TYPE, FIELD_USERNAME, PAGE_GENERAL, PAGE_USER,
};
use crate::wizard::{UserWizard, WizardFlow, WizardMode, WizardMsg};

const RELOAD_WAIT: Duration = Duration::from_secs(5);

fn check(push_line: &mut impl FnMut(String), label: &str, ok: bool) -> Result<()> {
    push_line(format!("CHECK {} {}", if ok { "PASS" } else { "FAIL" }, label));
    if ok {
        Ok(())
    } else {
        Err(anyhow::anyhow!("contract check failed: {}", label))
    }
}

async fn wait_for_reload(
    rx: &mut tokio::sync::mpsc::UnboundedReceiver<WizardMsg>,
) -> Result<WizardMsg> {
    match timeout(RELOAD_WAIT, rx.recv()).await {
        Ok(Some(msg)) => Ok(msg),
        Ok(None) => Err(anyhow::anyhow!("wizard message channel closed")),
        Err(_) => Err(anyhow::anyhow!("class reload did not complete in time")),
    }
}

/// Scripted create flow: role switching, class reload, submission, restart.
///
/// Writes `create_wizard_smoke_transcript.log` under the log folder.
pub async fn create_contract_smoke(settings: &WizardSettings) -> Result<()> {
    let log_dir = resolve_log_folder(settings.log_dir.as_deref())?;
    let transcript_path = log_dir.join("create_wizard_smoke_transcript.log");

    let mut transcript = String::new();
    let mut push_line = |line: String| {
        info!("[PHASE: smoke] [STEP: create] {}", line);
        transcript.push_str(&line);
        transcript.push('\n');
    };

    push_line("CREATE_WIZARD_SMOKE begin".to_string());

    let connection = Arc::new(DemoConnection::new("Example School"));
    let (mut wizard, mut rx) =
        UserWizard::new(WizardMode::Create, "Example School", "Add a user", None, connection);

    let page_names: Vec<&str> = wizard.pages().iter().map(|p| p.name).collect();
    check(
        &mut push_line,
        "pages are [general, user]",
        page_names == vec![PAGE_GENERAL, PAGE_USER],
    )?;

    // Entering the general page establishes the role/class invariant; the
    // default role is student, so a class reload is issued.
    wizard.on_page_shown(PAGE_GENERAL);
    let msg = wait_for_reload(&mut rx).await?;
    wizard.handle_message(msg)?;
    check(
        &mut push_line,
        "student default offers demo classes",
        wizard.session().class_options == vec!["1a", "1b", "2a"],
    )?;

    // Flip to a role without classes.
    wizard.set_value(FIELD_CLASS, "1a");
    wizard.set_value(FIELD_TYPE, Role::Teacher.as_id());
    wizard.on_role_changed();
    let s = wizard.session();
    check(
        &mut push_line,
        "teacher hides and clears the class field",
        !s.class_visible && !s.class_required && s.value(FIELD_CLASS).is_none()
            && !s.new_class_visible,
    )?;

    // Back to student: field returns, reload runs again.
    wizard.set_value(FIELD_TYPE, Role::Student.as_id());
    wizard.on_role_changed();
    let msg = wait_for_reload(&mut rx).await?;
    wizard.handle_message(msg)?;
    let s = wizard.session();
    check(
        &mut push_line,
        "student restores class field and options",
        s.class_visible && s.class_required && s.class_options == vec!["1a", "1b", "2a"],
    )?;

    // Fill the user page and submit.
    wizard.on_page_shown(PAGE_USER);
    let msg = wait_for_reload(&mut rx).await?;
    wizard.handle_message(msg)?;
    wizard.set_value(FIELD_FIRSTNAME, "Ada");
    wizard.set_value(FIELD_LASTNAME, "Lovelace");
    wizard.set_value(FIELD_USERNAME, "ada");
    wizard.set_value(FIELD_CLASS, "1b");
    wizard.set_password("s3cret", "s3cret");
    check(
        &mut push_line,
        "filled user page validates",
        wizard.page_is_valid(PAGE_USER),
    )?;

    let created = wizard.submit().await?;
    push_line(format!("created record {}", created.dn));
    check(
        &mut push_line,
        "success note embeds the login name",
        wizard
            .session()
            .note
            .as_deref()
            .is_some_and(|n| n.contains("\"ada\"")),
    )?;

    // Restart for the next creation: class survives, everything else resets.
    wizard.restart();
    let s = wizard.session();
    check(
        &mut push_line,
        "restart keeps class and nulls password",
        s.value(FIELD_CLASS) == Some("1b")
            && s.value(FIELD_USERNAME).is_none()
            && s.password.is_empty()
            && s.note.is_none(),
    )?;

    push_line("CREATE_WIZARD_SMOKE end".to_string());
    tokio::fs::write(&transcript_path, transcript).await?;
    Ok(())
}

/// Scripted edit flow: fixed school, record reference, pinned navigation.
///
/// Writes `edit_wizard_smoke_transcript.log` under the log folder.
pub async fn edit_contract_smoke(settings: &WizardSettings) -> Result<()> {
    let log_dir = resolve_log_folder(settings.log_dir.as_deref())?;
    let transcript_path = log_dir.join("edit_wizard_smoke_transcript.log");

    let mut transcript = String::new();
    let mut push_line = |line: String| {
        info!("[PHASE: smoke] [STEP: edit] {}", line);
        transcript.push_str(&line);
        transcript.push('\n');
    };

    push_line("EDIT_WIZARD_SMOKE begin".to_string());

    let connection = Arc::new(DemoConnection::new("Example School"));
    let (wizard, _rx) = UserWizard::new(
        WizardMode::Edit,
        "Example School",
        "Edit a user",
        Some("uid=ada,ou=Example School"),
        connection,
    );

    let school = wizard.pages()[0]
        .field(FIELD_SCHOOL)
        .ok_or_else(|| anyhow::anyhow!("school field missing"))?;
    check(
        &mut push_line,
        "school is fixed in edit mode",
        school.kind == FieldKind::StaticText,
    )?;

    let record = wizard.pages()[1].field(FIELD_RECORD);
    check(
        &mut push_line,
        "record reference is rendered read-only",
        record.is_some_and(|f| {
            f.kind == FieldKind::StaticText
                && f.initial.as_deref() == Some("uid=ada,ou=Example School")
        }),
    )?;

    check(
        &mut push_line,
        "back navigation from the user page is rejected",
        !wizard.has_previous(PAGE_USER),
    )?;

    push_line("EDIT_WIZARD_SMOKE end".to_string());
    tokio::fs::write(&transcript_path, transcript).await?;
    Ok(())
}
