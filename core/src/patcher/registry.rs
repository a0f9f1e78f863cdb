use crate::error::{AppError, AppResult};
use crate::patcher::common::{apply_edits, detect_indent, list_insertion, parse};
use crate::patcher::Rewrite;
use ra_ap_syntax::ast::{self, HasName};
use ra_ap_syntax::{AstNode, SyntaxNode};
use tracing::info;

/// Name bound by a `static`, `const` or `let` declaration.
fn binding_name(node: &SyntaxNode) -> Option<String> {
    if let Some(s) = ast::Static::cast(node.clone()) {
        return s.name().map(|n| n.text().to_string());
    }
    if let Some(c) = ast::Const::cast(node.clone()) {
        return c.name().map(|n| n.text().to_string());
    }
    let pat = ast::LetStmt::cast(node.clone())?.pat()?;
    pat.syntax()
        .descendants()
        .find_map(ast::IdentPat::cast)?
        .name()
        .map(|n| n.text().to_string())
}

/// The type path an entry registers, whitespace removed.
///
/// `TypeId::of::<a::B>()` and `a::B` both yield `a::B`.
fn entry_key(text: &str) -> String {
    let inner = match (text.find('<'), text.rfind('>')) {
        (Some(start), Some(end)) if start < end => &text[start + 1..end],
        _ => text,
    };
    inner.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Renders a registry entry, keeping pre-formatted `TypeId::of` calls.
fn render_entry(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("TypeId::of") {
        raw.to_string()
    } else {
        format!("TypeId::of::<{}>()", raw.trim_matches(|c| c == '(' || c == ')'))
    }
}

/// Appends `TypeId::of::<T>()` entries to the array literal initialising the
/// binding named `variable` (case-insensitive).
///
/// Entries already registered for the same type path are skipped.
pub fn append_external_types(
    source: &str,
    variable: &str,
    types: &[String],
) -> AppResult<Rewrite> {
    let file = parse(source);
    let wanted = variable.to_lowercase();

    let array = file
        .syntax()
        .descendants()
        .filter(|node| binding_name(node).is_some_and(|name| name.to_lowercase() == wanted))
        .find_map(|node| node.descendants().find_map(ast::ArrayExpr::cast))
        .ok_or_else(|| {
            AppError::Parse(format!("No array literal bound to '{}' found", variable))
        })?;

    let mut existing: Vec<String> = array
        .exprs()
        .map(|e| entry_key(&e.syntax().text().to_string()))
        .collect();

    let mut items = Vec::new();
    for ty in types {
        let entry = render_entry(ty);
        let key = entry_key(&entry);
        if existing.contains(&key) {
            info!(external_type = %key, "External type already registered");
            continue;
        }
        existing.push(key);
        items.push(entry);
    }

    if items.is_empty() {
        return Ok(Rewrite::unchanged(source));
    }

    let r_brack = array
        .r_brack_token()
        .ok_or_else(|| AppError::Parse(format!("Array bound to '{}' is missing ']'", variable)))?;
    let first = array.exprs().next();
    let inner = detect_indent(first.as_ref().map(|e| e.syntax()));
    let edit = list_insertion(source, &r_brack, &items, inner);

    Ok(Rewrite {
        original: source.to_string(),
        rewritten: apply_edits(source, vec![edit]),
    })
}
