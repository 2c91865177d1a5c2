use crate::SourceArgs;
use crate::source;
use crate::view;
use cxkit_core::{Cursor, ParseOptions};
use serde::Serialize;

#[derive(Serialize)]
struct AstNode {
    kind: String,
    spelling: String,
    location: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<AstNode>,
}

impl AstNode {
    fn build(cursor: &Cursor, depth: usize, max_depth: Option<usize>, all: bool) -> Self {
        let children = if max_depth.is_some_and(|max| depth >= max) {
            Vec::new()
        } else {
            cursor
                .children()
                .iter()
                .filter(|child| all || child.location().is_from_main_file())
                .map(|child| Self::build(child, depth + 1, max_depth, all))
                .collect()
        };
        Self {
            kind: cursor.kind().spelling(),
            spelling: cursor.spelling().to_string(),
            location: view::location(cursor.location()),
            children,
        }
    }

    fn print(&self, indent: usize) {
        println!(
            "{:indent$}{} '{}' <{}>",
            "",
            self.kind,
            self.spelling,
            self.location,
            indent = indent * 2
        );
        for child in &self.children {
            child.print(indent + 1);
        }
    }
}

pub fn run(
    args: &SourceArgs,
    max_depth: Option<usize>,
    all: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let unit = source::load(args, ParseOptions::DETAILED_PROCESSING_RECORD)?;
    let tree = AstNode::build(&unit.cursor(), 0, max_depth, all);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        tree.print(0);
    }
    Ok(())
}
