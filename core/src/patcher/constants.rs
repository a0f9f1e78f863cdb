use crate::error::{AppError, AppResult};
use crate::patcher::common::{
    apply_edits, detect_indent, inherent_impls, line_indent, offset, parse, TextEdit,
};
use crate::patcher::Rewrite;
use indexmap::IndexMap;
use ra_ap_syntax::ast::{self, HasName};
use ra_ap_syntax::{AstNode, SyntaxKind};
use tracing::info;

/// Appends missing `pub const` string constants to the last inherent `impl`
/// of `type_name`, wrapped in a `// region: {region}` block.
///
/// Constants already declared in any inherent impl of the type are skipped.
/// Returns an unchanged rewrite when nothing is missing.
pub fn append_constants(
    source: &str,
    type_name: &str,
    region: &str,
    constants: &IndexMap<String, String>,
) -> AppResult<Rewrite> {
    let file = parse(source);
    let impls = inherent_impls(&file, type_name);

    let existing: Vec<String> = impls
        .iter()
        .filter_map(|imp| imp.assoc_item_list())
        .flat_map(|list| list.assoc_items())
        .filter_map(|item| match item {
            ast::AssocItem::Const(c) => c.name().map(|n| n.text().to_string()),
            _ => None,
        })
        .collect();

    let missing: Vec<(&String, &String)> = constants
        .iter()
        .filter(|(name, _)| {
            let present = existing.contains(name);
            if present {
                info!(constant = %name, "Constant already defined");
            }
            !present
        })
        .collect();

    if missing.is_empty() {
        return Ok(Rewrite::unchanged(source));
    }

    let list = impls
        .last()
        .and_then(|imp| imp.assoc_item_list())
        .ok_or_else(|| AppError::Parse(format!("No inherent impl of '{}' found", type_name)))?;
    let r_curly = list
        .r_curly_token()
        .ok_or_else(|| AppError::Parse(format!("Impl of '{}' is missing '}}'", type_name)))?;

    let first_item = list.assoc_items().next();
    let has_items = first_item.is_some();
    let outer = line_indent(source, offset(&r_curly));
    let indent = detect_indent(first_item.as_ref().map(|i| i.syntax()))
        .unwrap_or_else(|| format!("{}    ", outer));

    let mut patch = String::new();
    if has_items {
        patch.push('\n');
    }
    patch.push_str(&format!("\n{}// region: {}", indent, region));
    for (name, value) in &missing {
        patch.push_str(&format!("\n{}pub const {}: &str = {:?};", indent, name, value));
    }
    patch.push_str(&format!("\n{}// endregion: {}", indent, region));

    let edit = match r_curly.prev_token() {
        Some(ws) if ws.kind() == SyntaxKind::WHITESPACE && ws.text().contains('\n') => {
            TextEdit::insert(offset(&ws), patch)
        }
        Some(ws) if ws.kind() == SyntaxKind::WHITESPACE => {
            patch.push('\n');
            patch.push_str(&outer);
            TextEdit::replace(ws.text_range().into(), patch)
        }
        _ => {
            patch.push('\n');
            patch.push_str(&outer);
            TextEdit::insert(offset(&r_curly), patch)
        }
    };

    Ok(Rewrite {
        original: source.to_string(),
        rewritten: apply_edits(source, vec![edit]),
    })
}
