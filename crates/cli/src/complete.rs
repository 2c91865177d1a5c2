use crate::SourceArgs;
use crate::source;
use crate::view;
use cxkit_core::{CompleteOptions, CompletionChunkKind, ParseOptions};
use serde::Serialize;
use tabled::Tabled;
use tracing::{info, warn};

#[derive(Tabled, Serialize)]
struct CandidateRow {
    #[tabled(rename = "Priority")]
    priority: u32,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Signature")]
    signature: String,
    #[tabled(rename = "Comment")]
    comment: String,
}

pub fn run(
    args: &SourceArgs,
    line: u32,
    column: u32,
    options: CompleteOptions,
    limit: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let unit = source::load(args, ParseOptions::NONE)?;
    let unsaved = source::config(args)?.unsaved;
    let Some(results) = unit.code_complete(&args.file, line, column, &unsaved, options)? else {
        warn!("No completion results at {}:{}:{}", args.file.display(), line, column);
        return Ok(());
    };

    let mut rows: Vec<CandidateRow> = results
        .iter()
        .map(|result| {
            let string = result.string();
            let name = string
                .chunks()
                .find(|chunk| chunk.kind() == CompletionChunkKind::TypedText)
                .map(|chunk| chunk.spelling().to_string())
                .unwrap_or_default();
            CandidateRow {
                priority: string.priority(),
                kind: result.kind().spelling(),
                name,
                signature: string.to_string(),
                comment: string.brief_comment(),
            }
        })
        .collect();
    rows.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.name.cmp(&b.name)));
    info!("{} completion candidate(s)", rows.len());
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    view::print_rows(&rows, args.json)
}
