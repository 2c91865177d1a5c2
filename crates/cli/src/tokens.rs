use crate::SourceArgs;
use crate::source;
use crate::view;
use cxkit_core::ParseOptions;
use serde::Serialize;
use tabled::Tabled;
use tracing::info;

#[derive(Tabled, Serialize)]
struct TokenRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Spelling")]
    spelling: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Cursor")]
    cursor: String,
}

pub fn run(args: &SourceArgs) -> Result<(), Box<dyn std::error::Error>> {
    let unit = source::load(args, ParseOptions::NONE)?;
    let rows: Vec<TokenRow> = unit
        .cursor()
        .tokens()
        .map(|token| TokenRow {
            kind: format!("{:?}", token.kind()),
            spelling: token.spelling(),
            location: view::location(&token.location()),
            cursor: token
                .cursor()
                .map(|cursor| cursor.kind().spelling())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();
    info!("{} token(s) in {}", rows.len(), unit.spelling());
    view::print_rows(&rows, args.json)
}
