use cxkit_core::SourceLocation;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

/// `file:line:column`, or `-` for locations outside any file.
pub fn location(location: &SourceLocation) -> String {
    match location.file() {
        Some(file) => format!("{}:{}:{}", file.name(), location.line(), location.column()),
        None => "-".to_string(),
    }
}

pub fn print_rows<T: Tabled + Serialize>(
    rows: &[T],
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
    } else if !rows.is_empty() {
        println!("{}", Table::new(rows).with(Style::psql()));
    }
    Ok(())
}
