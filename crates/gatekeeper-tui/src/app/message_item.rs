//! Wrapped measurement and rendering for the conversation transcript.
//!
//! Measurement and rendering both go through [`message_lines`] so the
//! virtual-scroll math always agrees with what ends up on screen.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::types::RenderableMessage;
use crate::chat_history::MessageKind;
use crate::markdown;

/// Lines a single message occupies at the given width. The spinner glyph is
/// substituted into the placeholder entry here; the transcript itself is not
/// touched by indicator ticks.
pub(crate) fn message_lines(
    msg: &RenderableMessage,
    width: u16,
    spinner: &str,
) -> Vec<Line<'static>> {
    if msg.status.is_generating() {
        return vec![Line::from(Span::styled(
            format!("{spinner} {}", msg.content),
            Style::new().fg(Color::Rgb(218, 119, 87)),
        ))];
    }
    match msg.kind {
        MessageKind::User => prefixed_wrap("You: ", &msg.content, width, Style::new().blue()),
        MessageKind::Assistant => {
            let mut lines = vec![Line::from(Span::styled("Bot:", Style::new().green()))];
            lines.extend(markdown::to_lines(&msg.content, width));
            lines
        }
        MessageKind::SysInfo => plain_wrap(&msg.content, width, Style::new().magenta()),
    }
}

fn prefixed_wrap(prefix: &str, content: &str, width: u16, style: Style) -> Vec<Line<'static>> {
    let wrap_width = (width as usize).saturating_sub(prefix.len()).max(1);
    let wrapped = textwrap::wrap(content, wrap_width);
    let mut lines = Vec::with_capacity(wrapped.len().max(1));
    for (i, piece) in wrapped.iter().enumerate() {
        if i == 0 {
            lines.push(Line::from(vec![
                Span::styled(prefix.to_string(), style),
                Span::raw(piece.to_string()),
            ]));
        } else {
            lines.push(Line::from(Span::raw(piece.to_string())));
        }
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(prefix.to_string(), style)));
    }
    lines
}

fn plain_wrap(content: &str, width: u16, style: Style) -> Vec<Line<'static>> {
    content
        .lines()
        .flat_map(|raw_line| {
            if raw_line.is_empty() {
                vec![Line::default()]
            } else {
                textwrap::wrap(raw_line, (width as usize).max(1))
                    .into_iter()
                    .map(|piece| Line::from(Span::styled(piece.to_string(), style)))
                    .collect()
            }
        })
        .collect()
}

/// Per-message heights and total virtual height at the given width.
pub(crate) fn measure_messages(
    messages: &[RenderableMessage],
    width: u16,
    spinner: &str,
) -> (u16, Vec<u16>) {
    let mut heights = Vec::with_capacity(messages.len());
    let mut total = 0u16;
    for msg in messages {
        let h = message_lines(msg, width, spinner).len() as u16;
        heights.push(h);
        total = total.saturating_add(h);
    }
    (total, heights)
}

/// Render the visible slice of the transcript at the given scroll offset.
pub(crate) fn render_messages(
    frame: &mut Frame,
    messages: &[RenderableMessage],
    width: u16,
    area: Rect,
    offset_y: u16,
    heights: &[u16],
    spinner: &str,
) {
    let viewport_height = area.height;
    let mut y_screen = 0u16;
    let mut y_virtual = 0u16;

    for (idx, msg) in messages.iter().enumerate() {
        let height = heights.get(idx).copied().unwrap_or(0);
        if y_virtual.saturating_add(height) <= offset_y {
            y_virtual = y_virtual.saturating_add(height);
            continue;
        }

        let lines = message_lines(msg, width, spinner);
        // If the offset lands inside this message, skip its top lines.
        let start_line = offset_y.saturating_sub(y_virtual) as usize;
        for line in lines.into_iter().skip(start_line) {
            let line_area = Rect::new(area.x + 1, area.y + y_screen, width, 1);
            frame.render_widget(Paragraph::new(line), line_area);
            y_screen += 1;
            if y_screen >= viewport_height {
                return;
            }
        }
        y_virtual = y_virtual.saturating_add(height);
    }
}
