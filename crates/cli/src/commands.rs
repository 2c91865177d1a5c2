use crate::view;
use cxkit_core::{CompilationDatabase, CompileCommands};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;
use tracing::info;

#[derive(Tabled, Serialize)]
struct CommandRow {
    #[tabled(rename = "Directory")]
    directory: String,
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Command")]
    command: String,
}

fn rows(commands: Option<CompileCommands>) -> Vec<CommandRow> {
    let Some(commands) = commands else {
        return Vec::new();
    };
    commands
        .iter()
        .map(|command| CommandRow {
            directory: command.directory().display().to_string(),
            file: command.filename().display().to_string(),
            command: command.arguments().join(" "),
        })
        .collect()
}

pub fn run(
    directory: &Path,
    file: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let database = CompilationDatabase::from_directory(directory)?;
    info!("Loaded compilation database from {}", directory.display());
    let rows = match file {
        Some(file) => rows(database.compile_commands(file)?),
        None => rows(database.all_compile_commands()),
    };
    if rows.is_empty() {
        info!("No matching compile commands");
    }
    view::print_rows(&rows, json)
}
