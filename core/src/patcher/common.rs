use ra_ap_edition::Edition;
use ra_ap_syntax::ast::{self, HasAttrs};
use ra_ap_syntax::{AstNode, NodeOrToken, SourceFile, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
use std::ops::Range;

use crate::naming::simple_name;

/// A replacement of a byte range of the source. Insertions use an empty range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextEdit {
    pub range: Range<usize>,
    pub text: String,
}

impl TextEdit {
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            range: offset..offset,
            text: text.into(),
        }
    }

    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }
}

/// Parses a source file. The tree is lossless, parse errors are ignored.
pub(crate) fn parse(source: &str) -> SourceFile {
    SourceFile::parse(source, Edition::Edition2021).tree()
}

/// Applies non-overlapping edits back to front so offsets stay valid.
///
/// Edits sharing an offset keep their relative order in the output.
pub(crate) fn apply_edits(source: &str, mut edits: Vec<TextEdit>) -> String {
    edits.sort_by_key(|e| e.range.start);
    let mut out = source.to_string();
    for edit in edits.into_iter().rev() {
        out.replace_range(edit.range, &edit.text);
    }
    out
}

pub(crate) fn offset(token: &SyntaxToken) -> usize {
    token.text_range().start().into()
}

/// Detects the indentation of the first child node of a list.
pub(crate) fn detect_indent(first_child: Option<&SyntaxNode>) -> Option<String> {
    let first_token = first_child?.first_token()?;
    line_break_indent(&first_token)
}

/// Indentation following the line break right before `token`, if any.
pub(crate) fn line_break_indent(token: &SyntaxToken) -> Option<String> {
    let prev = token.prev_token()?;
    if prev.kind() != SyntaxKind::WHITESPACE {
        return None;
    }
    prev.text()
        .rfind('\n')
        .map(|pos| prev.text()[pos + 1..].to_string())
}

/// Leading whitespace of the line containing `offset`.
pub(crate) fn line_indent(source: &str, offset: usize) -> String {
    let line_start = source[..offset].rfind('\n').map_or(0, |pos| pos + 1);
    source[line_start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

/// Checks if a comma is needed before inserting a new element ahead of `anchor`.
pub(crate) fn check_needs_comma(anchor: &SyntaxToken) -> bool {
    let mut curr = anchor.prev_token();
    while let Some(token) = curr {
        match token.kind() {
            SyntaxKind::WHITESPACE | SyntaxKind::COMMENT => {
                curr = token.prev_token();
            }
            SyntaxKind::L_CURLY | SyntaxKind::L_BRACK | SyntaxKind::L_PAREN | SyntaxKind::COMMA => {
                return false;
            }
            _ => {
                return true;
            }
        }
    }
    false
}

/// Builds the edit that appends `items` to a comma-separated list right
/// before `anchor` (a closing bracket or a `..` spread).
///
/// Multi-line lists keep their layout; single-line lists are broken onto one
/// line per element.
pub(crate) fn list_insertion(
    source: &str,
    anchor: &SyntaxToken,
    items: &[String],
    inner_indent: Option<String>,
) -> TextEdit {
    let outer = line_indent(source, offset(anchor));
    let inner = inner_indent.unwrap_or_else(|| format!("{}    ", outer));

    let mut patch = String::new();
    if check_needs_comma(anchor) {
        patch.push(',');
    }
    for item in items {
        patch.push('\n');
        patch.push_str(&inner);
        patch.push_str(item);
        patch.push(',');
    }

    let prev_ws = anchor
        .prev_token()
        .filter(|t| t.kind() == SyntaxKind::WHITESPACE);
    match prev_ws {
        Some(ws) if ws.text().contains('\n') => TextEdit::insert(offset(&ws), patch),
        Some(ws) => {
            patch.push('\n');
            patch.push_str(&outer);
            TextEdit::replace(ws.text_range().into(), patch)
        }
        None => {
            patch.push('\n');
            patch.push_str(&outer);
            TextEdit::insert(offset(anchor), patch)
        }
    }
}

/// The first child of `node` that is not an attribute, comment or whitespace.
pub(crate) fn first_content(node: &SyntaxNode) -> Option<SyntaxElement> {
    node.children_with_tokens().find(|el| {
        !matches!(
            el.kind(),
            SyntaxKind::ATTR | SyntaxKind::COMMENT | SyntaxKind::WHITESPACE
        )
    })
}

/// Builds the edit that places an attribute in front of a declaration,
/// after any attributes and doc comments it already carries.
pub(crate) fn attribute_insertion(node: &SyntaxNode, attribute: &str) -> Option<TextEdit> {
    let content = first_content(node)?;
    let first_token = match &content {
        NodeOrToken::Node(n) => n.first_token()?,
        NodeOrToken::Token(t) => t.clone(),
    };
    let separator = match line_break_indent(&first_token) {
        Some(indent) => format!("\n{}", indent),
        None => " ".to_string(),
    };
    Some(TextEdit::insert(
        offset(&first_token),
        format!("{}{}", attribute, separator),
    ))
}

/// The text inside `#[...]`, e.g. `schema(description = X)`.
pub(crate) fn attr_body(attr: &ast::Attr) -> String {
    match attr.meta() {
        Some(meta) => meta.syntax().text().to_string(),
        None => attr.syntax().text().to_string(),
    }
}

/// Bodies of every attribute attached to an item.
pub(crate) fn attr_bodies(item: &impl HasAttrs) -> Vec<String> {
    item.attrs().map(|a| attr_body(&a)).collect()
}

/// Simple name of a type as written in source, generic arguments dropped.
pub(crate) fn type_simple_name(text: &str) -> &str {
    let base = text.split('<').next().unwrap_or(text).trim();
    simple_name(base)
}

/// Inherent `impl` blocks of a type, in source order.
pub(crate) fn inherent_impls(file: &SourceFile, type_name: &str) -> Vec<ast::Impl> {
    file.syntax()
        .descendants()
        .filter_map(ast::Impl::cast)
        .filter(|imp| imp.trait_().is_none())
        .filter(|imp| {
            imp.self_ty()
                .is_some_and(|ty| type_simple_name(&ty.syntax().text().to_string()) == type_name)
        })
        .collect()
}
