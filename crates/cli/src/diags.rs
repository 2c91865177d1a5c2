use crate::SourceArgs;
use crate::source;
use crate::view;
use cxkit_core::{Diagnostic, ParseOptions};
use serde::Serialize;
use tabled::Tabled;
use tracing::info;

#[derive(Tabled, Serialize)]
struct DiagnosticRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Option")]
    option: String,
    #[tabled(skip)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fixits: Vec<String>,
}

impl DiagnosticRow {
    fn new(diagnostic: &Diagnostic, nested: bool) -> Self {
        let severity = format!("{:?}", diagnostic.severity()).to_lowercase();
        Self {
            severity: if nested { format!("  {severity}") } else { severity },
            location: view::location(&diagnostic.location()),
            message: diagnostic.spelling(),
            option: diagnostic.option(),
            fixits: diagnostic
                .fixits()
                .map(|fixit| {
                    format!("{} -> {:?}", view::location(&fixit.range.start()), fixit.value)
                })
                .collect(),
        }
    }
}

pub fn run(args: &SourceArgs) -> Result<(), Box<dyn std::error::Error>> {
    let unit = source::load(args, ParseOptions::NONE)?;
    let mut rows = Vec::new();
    let mut errors = 0;
    for diagnostic in unit.diagnostics().iter() {
        if diagnostic.severity().is_error() {
            errors += 1;
        }
        rows.push(DiagnosticRow::new(&diagnostic, false));
        rows.extend(
            diagnostic
                .children()
                .map(|child| DiagnosticRow::new(&child, true)),
        );
    }
    info!(
        "{} diagnostic(s), {} error(s) in {}",
        rows.len(),
        errors,
        unit.spelling()
    );
    view::print_rows(&rows, args.json)
}
