use crate::error::AppResult;
use crate::patcher::common::{apply_edits, parse, TextEdit};
use crate::patcher::Rewrite;
use ra_ap_syntax::ast::HasModuleItem;
use ra_ap_syntax::{ast, AstNode};
use tracing::info;

/// Normalises `use a::b;`, `a::b;` and `a::b` to `a::b`.
fn import_path(import: &str) -> &str {
    let path = import.trim().trim_end_matches(';').trim();
    path.strip_prefix("use ").map_or(path, str::trim)
}

/// Appends `use` items for every import not already present.
///
/// Existing imports are compared case-insensitively on their use tree text.
/// New items go after the last top-level `use`, or at the top of the file.
pub fn append_imports(source: &str, imports: &[String]) -> AppResult<Rewrite> {
    let file = parse(source);

    let mut existing: Vec<String> = Vec::new();
    let mut last_use: Option<ra_ap_syntax::SyntaxNode> = None;
    for item in file.items() {
        if let ast::Item::Use(u) = item {
            if let Some(tree) = u.use_tree() {
                existing.push(tree.syntax().text().to_string().to_lowercase());
            }
            last_use = Some(u.syntax().clone());
        }
    }

    let mut missing: Vec<&str> = Vec::new();
    for import in imports {
        let path = import_path(import);
        if path.is_empty() {
            continue;
        }
        let key = path.to_lowercase();
        if existing.contains(&key) {
            info!(import = path, "Import already exists");
            continue;
        }
        existing.push(key);
        missing.push(path);
    }

    if missing.is_empty() {
        return Ok(Rewrite::unchanged(source));
    }

    let edit = match last_use {
        Some(node) => {
            let patch: String = missing.iter().map(|p| format!("\nuse {};", p)).collect();
            TextEdit::insert(node.text_range().end().into(), patch)
        }
        None => {
            let patch: String = missing.iter().map(|p| format!("use {};\n", p)).collect();
            TextEdit::insert(0, patch)
        }
    };

    Ok(Rewrite {
        original: source.to_string(),
        rewritten: apply_edits(source, vec![edit]),
    })
}
