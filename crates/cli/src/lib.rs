mod ast;
mod commands;
mod complete;
mod diags;
mod includes;
mod source;
mod tokens;
mod view;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cxkit",
    version,
    about = "Inspect C and C++ sources through libclang",
    long_about = "cxkit parses C, C++ and Objective-C sources with libclang and prints what the \
                  engine sees: the syntax tree, tokens, diagnostics, includes, code completion \
                  candidates and compilation database entries. Set LIBCLANG_PATH to choose \
                  the engine library."
)]
pub struct Cli {
    /// Also write logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where a source file comes from and how to parse it.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Source file to parse
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// JSON parse configuration with compiler arguments, parse flags and unsaved files
    #[arg(long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Extra compiler arguments, given after `--`
    #[arg(last = true, value_name = "CLANG_ARGS")]
    pub clang_args: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the syntax tree of a source file
    #[command(
        long_about = "Parses the file and prints its cursor tree in preorder. Only cursors \
                      located in the main file are shown unless --all is given."
    )]
    Ast {
        #[command(flatten)]
        source: SourceArgs,

        /// Stop descending below this depth
        #[arg(long, value_name = "DEPTH")]
        depth: Option<usize>,

        /// Include cursors from headers
        #[arg(long)]
        all: bool,
    },
    /// Print the tokens of a source file
    Tokens {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the diagnostics produced while parsing
    Diags {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the files included by a source file
    Includes {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// List code completion candidates at a position
    Complete {
        #[command(flatten)]
        source: SourceArgs,

        /// 1-based line of the completion point
        #[arg(long)]
        line: u32,

        /// 1-based column of the completion point
        #[arg(long)]
        column: u32,

        /// Include macros in the results
        #[arg(long)]
        macros: bool,

        /// Include code patterns such as loops in the results
        #[arg(long)]
        patterns: bool,

        /// Show at most this many candidates
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },
    /// Print entries from a compile_commands.json database
    #[command(
        long_about = "Loads the compilation database in BUILD_DIR and prints the commands for \
                      FILE, or every command when no file is given."
    )]
    Commands {
        /// Directory containing compile_commands.json
        #[arg(value_name = "BUILD_DIR")]
        directory: PathBuf,

        /// Only show commands that compile this file
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the libclang version in use
    Version,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = cxkit_core::logging::init_logging("cli", cli.verbose);

    match cli.command {
        Commands::Ast { source, depth, all } => ast::run(&source, depth, all),
        Commands::Tokens { source } => tokens::run(&source),
        Commands::Diags { source } => diags::run(&source),
        Commands::Includes { source } => includes::run(&source),
        Commands::Complete {
            source,
            line,
            column,
            macros,
            patterns,
            limit,
        } => complete::run(
            &source,
            line,
            column,
            cxkit_core::CompleteOptions {
                include_macros: macros,
                include_code_patterns: patterns,
                include_brief_comments: true,
            },
            limit,
        ),
        Commands::Commands {
            directory,
            file,
            json,
        } => commands::run(&directory, file.as_deref(), json),
        Commands::Version => {
            println!("cxkit {}", env!("CARGO_PKG_VERSION"));
            println!("{}", cxkit_core::clang_version()?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_source_args_collect_trailing_clang_args() {
        let cli = Cli::try_parse_from([
            "cxkit", "ast", "main.c", "--depth", "2", "--", "-std=c11", "-DNDEBUG",
        ])
        .unwrap();
        let Commands::Ast { source, depth, all } = cli.command else {
            panic!("expected ast");
        };
        assert_eq!(source.file, PathBuf::from("main.c"));
        assert_eq!(source.clang_args, ["-std=c11", "-DNDEBUG"]);
        assert_eq!(depth, Some(2));
        assert!(!all);
        assert!(!source.json);
    }

    #[test]
    fn test_complete_requires_position() {
        assert!(Cli::try_parse_from(["cxkit", "complete", "main.c", "--line", "3"]).is_err());
        let cli = Cli::try_parse_from([
            "cxkit", "-v", "complete", "main.c", "--line", "3", "--column", "7", "--macros",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Commands::Complete {
            line,
            column,
            macros,
            patterns,
            ..
        } = cli.command
        else {
            panic!("expected complete");
        };
        assert_eq!((line, column), (3, 7));
        assert!(macros);
        assert!(!patterns);
    }

    #[test]
    fn test_commands_file_filter_is_optional() {
        let cli = Cli::try_parse_from(["cxkit", "commands", "build", "--json"]).unwrap();
        let Commands::Commands {
            directory,
            file,
            json,
        } = cli.command
        else {
            panic!("expected commands");
        };
        assert_eq!(directory, PathBuf::from("build"));
        assert!(file.is_none());
        assert!(json);
    }
}
