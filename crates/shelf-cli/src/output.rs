//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use shelf_entity::CollectionNode;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => print_json(&items),
    }
}

/// Print a single item in the selected format
pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{item:#?}"),
        OutputFormat::Json => print_json(item),
    }
}

/// Print collection trees, indented with box-drawing guides
pub fn print_tree(forest: &[CollectionNode], max_depth: Option<u32>, format: OutputFormat) {
    if format == OutputFormat::Json {
        print_json(&forest);
        return;
    }
    if forest.is_empty() {
        println!("No collections found.");
        return;
    }
    for line in render_tree(forest, max_depth) {
        println!("{line}");
    }
}

/// Render trees to lines, parents before children.
pub fn render_tree(forest: &[CollectionNode], max_depth: Option<u32>) -> Vec<String> {
    let mut lines = Vec::new();
    // (node, prefix of its own line, prefix inherited by its children)
    let mut stack: Vec<(&CollectionNode, String, String)> = forest
        .iter()
        .rev()
        .map(|node| (node, String::new(), String::new()))
        .collect();

    while let Some((node, line_prefix, child_prefix)) = stack.pop() {
        lines.push(format!(
            "{line_prefix}{} ({} comics)",
            node.name, node.comic_count
        ));

        if max_depth.is_some_and(|max| node.depth >= max) {
            continue;
        }
        let count = node.children.len();
        for (index, child) in node.children.iter().enumerate().rev() {
            let (connector, extension) = if index + 1 == count {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            stack.push((
                child,
                format!("{child_prefix}{connector}"),
                format!("{child_prefix}{extension}"),
            ));
        }
    }
    lines
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
    println!("{json}");
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn node(name: &str, depth: u32, comics: u64, children: Vec<CollectionNode>) -> CollectionNode {
        CollectionNode {
            id: Uuid::new_v4(),
            name: name.to_string(),
            depth,
            comic_count: comics,
            children,
        }
    }

    #[test]
    fn test_render_tree_draws_guides() {
        let forest = vec![node(
            "DC",
            0,
            0,
            vec![
                node("Batman", 1, 2, vec![node("Robin", 2, 1, vec![])]),
                node("Superman", 1, 0, vec![]),
            ],
        )];

        let lines = render_tree(&forest, None);
        assert_eq!(
            lines,
            vec![
                "DC (0 comics)",
                "├── Batman (2 comics)",
                "│   └── Robin (1 comics)",
                "└── Superman (0 comics)",
            ]
        );

        let shallow = render_tree(&forest, Some(1));
        assert_eq!(shallow.len(), 3);
    }
}
