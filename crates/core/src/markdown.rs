// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rich-text document tree to markdown rendering.
//!
//! External tracker descriptions arrive as a recursive JSON node tree
//! (paragraphs, headings, lists, code blocks, blockquotes, marked
//! inline text, link cards). Rendering is depth-first; unrecognized
//! node kinds are skipped without error and malformed input yields an
//! empty string.

use serde_json::Value;

/// Render a rich-text document to markdown.
pub fn render(doc: &Value) -> String {
    let Some(content) = doc.get("content").and_then(Value::as_array) else {
        return String::new();
    };

    let blocks: Vec<String> = content.iter().filter_map(render_block).collect();
    blocks.join("\n\n")
}

fn render_block(node: &Value) -> Option<String> {
    let kind = node.get("type").and_then(Value::as_str)?;
    match kind {
        "paragraph" => {
            let text = render_inline_children(node);
            if text.is_empty() {
                None
            } else {
                Some(text)
            }
        }
        "heading" => {
            let level = node
                .get("attrs")
                .and_then(|a| a.get("level"))
                .and_then(Value::as_u64)
                .unwrap_or(1)
                .clamp(1, 6) as usize;
            Some(format!("{} {}", "#".repeat(level), render_inline_children(node)))
        }
        "bulletList" => render_list(node, |_| "- ".to_string()),
        "orderedList" => render_list(node, |i| format!("{}. ", i + 1)),
        "codeBlock" => {
            let language = node
                .get("attrs")
                .and_then(|a| a.get("language"))
                .and_then(Value::as_str)
                .unwrap_or("");
            let body = render_inline_children(node);
            Some(format!("```{}\n{}\n```", language, body))
        }
        "blockquote" => {
            let inner: Vec<String> = node
                .get("content")
                .and_then(Value::as_array)
                .map(|children| children.iter().filter_map(render_block).collect())
                .unwrap_or_default();
            if inner.is_empty() {
                return None;
            }
            Some(
                inner
                    .join("\n\n")
                    .lines()
                    .map(|line| {
                        if line.is_empty() {
                            ">".to_string()
                        } else {
                            format!("> {}", line)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
            )
        }
        _ => None,
    }
}

fn render_list(node: &Value, marker: impl Fn(usize) -> String) -> Option<String> {
    let items = node.get("content").and_then(Value::as_array)?;
    let lines: Vec<String> = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            // List items hold block children; render them flattened onto
            // the item line.
            let inner: Vec<String> = item
                .get("content")
                .and_then(Value::as_array)
                .map(|children| children.iter().filter_map(render_block).collect())
                .unwrap_or_default();
            if inner.is_empty() {
                return None;
            }
            Some(format!("{}{}", marker(i), inner.join(" ")))
        })
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn render_inline_children(node: &Value) -> String {
    node.get("content")
        .and_then(Value::as_array)
        .map(|children| children.iter().map(render_inline).collect::<String>())
        .unwrap_or_default()
}

fn render_inline(node: &Value) -> String {
    let Some(kind) = node.get("type").and_then(Value::as_str) else {
        return String::new();
    };
    match kind {
        "text" => {
            let text = node.get("text").and_then(Value::as_str).unwrap_or("");
            apply_marks(text, node.get("marks").and_then(Value::as_array))
        }
        "hardBreak" => "\n".to_string(),
        "inlineCard" => node
            .get("attrs")
            .and_then(|a| a.get("url"))
            .and_then(Value::as_str)
            .map(|url| format!("[{}]({})", url, url))
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn apply_marks(text: &str, marks: Option<&Vec<Value>>) -> String {
    let mut out = text.to_string();
    let Some(marks) = marks else {
        return out;
    };
    for mark in marks {
        let Some(kind) = mark.get("type").and_then(Value::as_str) else {
            continue;
        };
        out = match kind {
            "code" => format!("`{}`", out),
            "strong" => format!("**{}**", out),
            "em" => format!("*{}*", out),
            "link" => {
                let href = mark
                    .get("attrs")
                    .and_then(|a| a.get("href"))
                    .and_then(Value::as_str)
                    .unwrap_or("");
                format!("[{}]({})", out, href)
            }
            _ => out,
        };
    }
    out
}

#[cfg(test)]
#[path = "markdown_tests.rs"]
mod tests;
