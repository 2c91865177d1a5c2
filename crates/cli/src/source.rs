use crate::SourceArgs;
use cxkit_core::{Index, ParseConfig, ParseOptions, TranslationUnit};
use tracing::info;

pub fn config(args: &SourceArgs) -> Result<ParseConfig, Box<dyn std::error::Error>> {
    match &args.config {
        Some(path) => Ok(ParseConfig::from_json_file(path)?),
        None => Ok(ParseConfig::default()),
    }
}

/// Parses `args.file` with the configured arguments plus the trailing ones.
pub fn load(
    args: &SourceArgs,
    extra: ParseOptions,
) -> Result<TranslationUnit, Box<dyn std::error::Error>> {
    let config = config(args)?;
    let mut clang_args = config.args.clone();
    clang_args.extend(args.clang_args.iter().cloned());

    info!(
        "Parsing {} with {} argument(s)",
        args.file.display(),
        clang_args.len()
    );
    let index = Index::create(false)?;
    let unit = index.parse(
        Some(args.file.as_path()),
        clang_args.as_slice(),
        &config.unsaved,
        config.parse_options() | extra,
    )?;
    Ok(unit)
}
