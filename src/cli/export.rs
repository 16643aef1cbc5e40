//! Selection export command

use std::path::Path;
use std::process::ExitCode;

use crate::export::SelectionExport;

use super::{system_clipboard, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

fn clean(ids: Vec<String>) -> Vec<String> {
    ids.into_iter().map(|id| id.trim().to_string()).filter(|id| !id.is_empty()).collect()
}

/// Execute the export-selection command.
///
/// The JSON payload always goes to stdout; status lines go to stderr.
pub fn run_export_selection(
    include: Vec<String>,
    remove: Vec<String>,
    output: Option<&Path>,
    copy: bool,
) -> ExitCode {
    let selection = SelectionExport::new(clean(include), clean(remove));
    let payload = match selection.to_pretty_json() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    println!("{}", payload);

    if copy {
        match system_clipboard() {
            Some(mut clipboard) => eprintln!("{}", selection.copy_with_status(clipboard.as_mut())),
            None => {
                eprintln!("Error: clipboard support is not available in this build");
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        }
    }

    if let Some(dir) = output {
        match selection.save_with_status(dir) {
            Ok(status) => eprintln!("{}", status),
            Err(status) => {
                eprintln!("{}", status);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}
