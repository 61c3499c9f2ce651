use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Node {
    children: BTreeMap<String, Node>,
    is_file: bool,
}

/// Renders a textual tree of the exported files.
///
/// `paths` are forward-slash relative paths, expected sorted. The
/// rendering uses `.` as the root with `├──`/`└──` connectors and
/// four-column indentation.
pub fn render_file_tree(paths: &[String]) -> String {
    if paths.is_empty() {
        return "(No files found to include in tree)\n".to_string();
    }

    let mut root = Node::default();
    for path in paths {
        let parts: Vec<&str> = path.split('/').collect();
        let mut level = &mut root;
        for (i, part) in parts.iter().enumerate() {
            let is_leaf = i + 1 == parts.len();
            let node = level.children.entry((*part).to_string()).or_default();
            if is_leaf {
                if node.children.is_empty() {
                    node.is_file = true;
                } else {
                    log::warn!("Path conflict in tree structure near '{}'", path);
                }
            } else if node.is_file {
                log::warn!(
                    "Path conflict converting file to directory in tree near '{}'",
                    path
                );
                node.is_file = false;
            }
            level = node;
        }
    }

    let mut lines = vec!["Exported File Structure:".to_string(), ".".to_string()];
    render_level(&root, "", &mut lines);
    lines.join("\n") + "\n"
}

fn render_level(node: &Node, indent: &str, lines: &mut Vec<String>) {
    let count = node.children.len();
    for (i, (name, child)) in node.children.iter().enumerate() {
        let is_last = i + 1 == count;
        let connector = if is_last { "└── " } else { "├── " };
        lines.push(format!("{indent}{connector}{name}"));
        if !child.is_file {
            let next_indent = format!("{indent}{}", if is_last { "    " } else { "│   " });
            render_level(child, &next_indent, lines);
        }
    }
}
