// School console user wizard
// Main library entry point

pub mod models;
pub mod settings;
pub mod smoke;
pub mod umc;
pub mod utils;
pub mod wizard;

use std::path::Path;

use log::{error, info};

use crate::settings::WizardSettings;
use crate::umc::{HttpUmcConnection, UmcConnection};

/// Initialize logging system with dual format (JSON + human-readable)
pub fn init_logging(
    settings: &WizardSettings,
    with_stdout: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = utils::path_resolver::resolve_log_folder(settings.log_dir.as_deref())?;

    let timestamp = chrono::Utc::now().format("%Y-%m-%d-%H%M%S");

    // JSON log file for structured parsing
    let json_log_file = log_dir.join(format!("wizard-{}.log", timestamp));

    // Human-readable log file (.txt)
    let txt_log_file = log_dir.join(format!("wizard-{}.txt", timestamp));

    let mut dispatch = fern::Dispatch::new().level(log::LevelFilter::Debug);

    if with_stdout {
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(move |out, message, record| {
                    let timestamp_local = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
                    let message_str = format!("{}", message);
                    let (phase, step, cleaned_message) =
                        utils::logging::parse_log_metadata(&message_str);
                    let txt_line = utils::logging::format_human_readable_log(
                        &timestamp_local.to_string(),
                        record.level(),
                        record.target(),
                        &cleaned_message,
                        phase.as_deref(),
                        step.as_deref(),
                    );
                    out.finish(format_args!("{}", txt_line));
                })
                .chain(std::io::stdout()),
        );
    }

    dispatch = dispatch
        .chain(
            fern::Dispatch::new()
                .format(move |out, message, record| {
                    let timestamp_utc = chrono::Utc::now().to_rfc3339();
                    let message_str = format!("{}", message);
                    let (phase, step, cleaned_message) =
                        utils::logging::parse_log_metadata(&message_str);
                    let json_line = utils::logging::format_json_log(
                        &timestamp_utc,
                        record.level(),
                        record.target(),
                        &cleaned_message,
                        phase.as_deref(),
                        step.as_deref(),
                    );
                    out.finish(format_args!("{}\n", json_line));
                })
                .chain(fern::log_file(json_log_file)?),
        )
        .chain(
            fern::Dispatch::new()
                .format(move |out, message, record| {
                    let timestamp_local = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
                    let message_str = format!("{}", message);
                    let (phase, step, cleaned_message) =
                        utils::logging::parse_log_metadata(&message_str);
                    let txt_line = utils::logging::format_human_readable_log(
                        &timestamp_local.to_string(),
                        record.level(),
                        record.target(),
                        &cleaned_message,
                        phase.as_deref(),
                        step.as_deref(),
                    );
                    out.finish(format_args!("{}\n", txt_line));
                })
                .chain(fern::log_file(txt_log_file)?),
        );

    dispatch.apply()?;

    log::info!(
        "[PHASE: initialization] Logging initialized, log directory: {:?}",
        log_dir
    );
    Ok(())
}

fn load_settings(settings_file: Option<&Path>) -> WizardSettings {
    match WizardSettings::load(settings_file) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings, using defaults: {}", e);
            WizardSettings::default()
        }
    }
}

/// Deterministic create-flow proof mode.
/// Writes `create_wizard_smoke_transcript.log` under the log folder and exits 0/1.
pub fn run_create_smoke(settings_file: Option<&Path>) {
    let settings = load_settings(settings_file);
    if let Err(e) = init_logging(&settings, true) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!(
        "[PHASE: initialization] Create wizard smoke starting at {}",
        chrono::Utc::now()
    );

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build();
    let result = match rt {
        Ok(rt) => rt.block_on(smoke::create_contract_smoke(&settings)),
        Err(e) => Err(anyhow::anyhow!(
            "Failed to create async runtime for create smoke: {}",
            e
        )),
    };

    if let Err(e) = result {
        error!(
            "[PHASE: smoke] [STEP: create] Smoke exited with error: {:?}",
            e
        );
        eprintln!("Wizard error: {}", e);
        std::process::exit(1);
    }
}

/// Deterministic edit-flow proof mode.
/// Writes `edit_wizard_smoke_transcript.log` under the log folder and exits 0/1.
pub fn run_edit_smoke(settings_file: Option<&Path>) {
    let settings = load_settings(settings_file);
    if let Err(e) = init_logging(&settings, true) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!(
        "[PHASE: initialization] Edit wizard smoke starting at {}",
        chrono::Utc::now()
    );

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build();
    let result = match rt {
        Ok(rt) => rt.block_on(smoke::edit_contract_smoke(&settings)),
        Err(e) => Err(anyhow::anyhow!(
            "Failed to create async runtime for edit smoke: {}",
            e
        )),
    };

    if let Err(e) = result {
        error!("[PHASE: smoke] [STEP: edit] Smoke exited with error: {:?}", e);
        eprintln!("Wizard error: {}", e);
        std::process::exit(1);
    }
}

/// Query the configured backend for the class list of one school and print
/// the labels, one per line. Connectivity check for operators.
pub fn run_class_probe(settings_file: Option<&Path>, school: Option<String>) {
    let settings = load_settings(settings_file);
    if let Err(e) = init_logging(&settings, false) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let school = school.unwrap_or_else(|| settings.default_school.clone());

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build();
    let result: anyhow::Result<()> = match rt {
        Ok(rt) => rt.block_on(async {
            if school.is_empty() {
                return Err(anyhow::anyhow!(
                    "No school given; pass --school=NAME or set default_school"
                ));
            }
            let base_url = settings.backend_url()?;
            let connection = HttpUmcConnection::new(base_url, settings.request_timeout())?;
            info!(
                "[PHASE: probe] [STEP: classes] querying classes of '{}'",
                school
            );
            let classes = connection.list_classes(&school).await?;
            for class in &classes {
                println!("{}", class.label);
            }
            info!(
                "[PHASE: probe] [STEP: classes] {} classes received",
                classes.len()
            );
            Ok(())
        }),
        Err(e) => Err(anyhow::anyhow!(
            "Failed to create async runtime for class probe: {}",
            e
        )),
    };

    if let Err(e) = result {
        error!("[PHASE: probe] [STEP: classes] Probe failed: {:?}", e);
        eprintln!("Wizard error: {}", e);
        std::process::exit(1);
    }
}

/// Write a settings template to the given path (default `school-wizards.toml`).
pub fn run_write_config(path: Option<&Path>) {
    let default_path = Path::new("school-wizards.toml");
    let path = path.unwrap_or(default_path);

    if let Err(e) = WizardSettings::write_template(path) {
        eprintln!("Wizard error: {}", e);
        std::process::exit(1);
    }
    println!("Settings template written to {:?}", path);
}
