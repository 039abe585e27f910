//! Markdown → ratatui Lines renderer for backend answers.
//!
//! Rendering is best effort: anything the walk cannot make sense of falls
//! back to the raw input wrapped as plain text. No error path is exposed.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style, Stylize};
use ratatui::text::{Line, Span};

/// Convert markdown text to width-wrapped ratatui lines.
pub fn to_lines(md: &str, width: u16) -> Vec<Line<'static>> {
    let width = width.max(1) as usize;
    let mut lines: Vec<Line<'static>> = Vec::new();

    // Inline text accumulates per block and is wrapped on flush.
    let mut block = String::new();
    let mut block_style = Style::default();
    let mut in_code_block = false;

    for event in Parser::new(md) {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                flush_block(&mut block, block_style, width, &mut lines);
                block_style = Style::new().cyan().add_modifier(Modifier::BOLD);
            }
            Event::End(TagEnd::Heading(_)) => {
                flush_block(&mut block, block_style, width, &mut lines);
                block_style = Style::default();
            }
            Event::Start(Tag::Paragraph) => {
                flush_block(&mut block, block_style, width, &mut lines);
            }
            Event::End(TagEnd::Paragraph) => {
                flush_block(&mut block, block_style, width, &mut lines);
                lines.push(Line::default());
            }
            Event::Start(Tag::CodeBlock(_)) => {
                flush_block(&mut block, block_style, width, &mut lines);
                in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                lines.push(Line::default());
            }
            Event::Start(Tag::Item) => {
                flush_block(&mut block, block_style, width, &mut lines);
                block.push_str("• ");
            }
            Event::End(TagEnd::Item) => {
                flush_block(&mut block, block_style, width, &mut lines);
            }
            Event::Text(text) => {
                if in_code_block {
                    for code_line in text.lines() {
                        lines.push(Line::from(Span::styled(
                            format!("    {code_line}"),
                            Style::new().dim(),
                        )));
                    }
                } else {
                    block.push_str(&text);
                }
            }
            Event::Code(code) => {
                block.push('`');
                block.push_str(&code);
                block.push('`');
            }
            Event::SoftBreak => block.push(' '),
            Event::HardBreak => flush_block(&mut block, block_style, width, &mut lines),
            Event::Rule => {
                flush_block(&mut block, block_style, width, &mut lines);
                lines.push(Line::from(Span::styled(
                    "─".repeat(width.min(40)),
                    Style::new().dim(),
                )));
            }
            _ => {}
        }
    }
    flush_block(&mut block, block_style, width, &mut lines);

    // Fallback: render the input verbatim rather than losing it.
    if lines.iter().all(|l| l.spans.is_empty()) && !md.trim().is_empty() {
        return textwrap::wrap(md, width)
            .into_iter()
            .map(|s| Line::from(s.to_string()))
            .collect();
    }

    while lines.last().is_some_and(|l| l.spans.is_empty()) {
        lines.pop();
    }
    lines
}

fn flush_block(block: &mut String, style: Style, width: usize, out: &mut Vec<Line<'static>>) {
    if block.is_empty() {
        return;
    }
    for piece in textwrap::wrap(block.as_str(), width) {
        out.push(Line::from(Span::styled(piece.to_string(), style)));
    }
    block.clear();
}
