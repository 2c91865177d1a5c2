use crate::SourceArgs;
use crate::source;
use crate::view;
use cxkit_core::ParseOptions;
use serde::Serialize;
use tabled::Tabled;

#[derive(Tabled, Serialize)]
struct IncludeRow {
    #[tabled(rename = "Depth")]
    depth: u32,
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Included At")]
    included_at: String,
}

pub fn run(args: &SourceArgs) -> Result<(), Box<dyn std::error::Error>> {
    let unit = source::load(args, ParseOptions::NONE)?;
    let rows: Vec<IncludeRow> = unit
        .includes()
        .map(|inclusion| IncludeRow {
            depth: inclusion.depth(),
            file: inclusion.include().name(),
            included_at: view::location(inclusion.location()),
        })
        .collect();
    view::print_rows(&rows, args.json)
}
