//! CommonMark output.

use crate::document::{Block, ContentDocument};

/// Render a laid-out record as CommonMark.
pub fn render(document: &ContentDocument) -> Vec<u8> {
    let mut out = String::new();
    push_paragraph(&mut out, &format!("# {}", escape(&document.title)));
    push_paragraph(&mut out, &format!("*{}*", escape(&document.subtitle)));
    if let Some(description) = &document.description {
        push_paragraph(&mut out, &escape(description));
    }
    for section in &document.sections {
        push_paragraph(&mut out, &format!("## {}", escape(&section.heading)));
        push_blocks(&mut out, &section.blocks, 3);
    }
    // One trailing newline, not a blank line.
    out.truncate(out.trim_end().len());
    out.push('\n');
    out.into_bytes()
}

/// Make user text inert inside a single block: whitespace runs collapse to
/// one space, inline markup characters are backslash-escaped and so is any
/// leading character that would open a heading, quote or list.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (index, word) in text.split_whitespace().enumerate() {
        if index > 0 {
            out.push(' ');
        }
        for ch in word.chars() {
            if matches!(ch, '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '&') {
                out.push('\\');
            }
            out.push(ch);
        }
    }
    if out.starts_with(['#', '>', '-', '+', '=']) {
        out.insert(0, '\\');
    } else {
        let digits = out.chars().take_while(char::is_ascii_digit).count();
        if (1..=9).contains(&digits) && out[digits..].starts_with(['.', ')']) {
            out.insert(digits, '\\');
        }
    }
    out
}

fn push_paragraph(out: &mut String, text: &str) {
    out.push_str(text);
    out.push_str("\n\n");
}

fn push_blocks(out: &mut String, blocks: &[Block], depth: usize) {
    for block in blocks {
        match block {
            Block::Field { label, value } => {
                push_paragraph(out, &format!("**{}:** {}", escape(label), escape(value)));
            }
            Block::Text(text) => push_paragraph(out, &escape(text)),
            Block::List(items) => {
                for item in items {
                    out.push_str("- ");
                    out.push_str(&escape(item));
                    out.push('\n');
                }
                out.push('\n');
            }
            Block::Entry { name, description } => {
                let name = escape(name);
                if description.trim().is_empty() {
                    push_paragraph(out, &format!("**{name}.**"));
                } else {
                    push_paragraph(out, &format!("**{name}.** {}", escape(description)));
                }
            }
            Block::Subsection { heading, blocks } => {
                let level = "#".repeat(depth.min(6));
                push_paragraph(out, &format!("{level} {}", escape(heading)));
                push_blocks(out, blocks, depth + 1);
            }
        }
    }
}
