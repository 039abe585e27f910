pub mod commands;
pub mod input;
pub mod message_item;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{Event, EventStream, KeyEvent};
use futures::{FutureExt, StreamExt};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::app_state::{AppState, StateCommand};
use crate::chat_history::MessageKind;
use crate::error::ResultExt as _;
use crate::user_config::UiConfig;
use crate::{AppEvent, EventBus, EventPriority};
use input::keymap::{to_action, Action};
use message_item::{measure_messages, render_messages};
use types::{Mode, RenderableMessage};

static HEADER: &str = r#"
 ██████╗  █████╗ ████████╗███████╗██╗  ██╗███████╗███████╗██████╗ ███████╗██████╗
██╔════╝ ██╔══██╗╚══██╔══╝██╔════╝██║ ██╔╝██╔════╝██╔════╝██╔══██╗██╔════╝██╔══██╗
██║  ███╗███████║   ██║   █████╗  █████╔╝ █████╗  █████╗  ██████╔╝█████╗  ██████╔╝
██║   ██║██╔══██║   ██║   ██╔══╝  ██╔═██╗ ██╔══╝  ██╔══╝  ██╔═══╝ ██╔══╝  ██╔══██╗
╚██████╔╝██║  ██║   ██║   ███████╗██║  ██╗███████╗███████╗██║     ███████╗██║  ██║
 ╚═════╝ ╚═╝  ╚═╝   ╚═╝   ╚══════╝╚═╝  ╚═╝╚══════╝╚══════╝╚═╝     ╚══════╝╚═╝  ╚═╝
"#;

const SPINNER_FRAMES: &[&str] = &["∙∙∙", "●∙∙", "∙●∙", "∙∙●"];

const PROMPT: &str = "> ";
const INSERT_HINT: &str = "/help for more info";
const NORMAL_HINT: &str = "press i to enter insert mode";

#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// A read-only handle to the shared application state.
    pub(crate) state: Arc<AppState>,
    /// A channel to send commands to the state manager.
    cmd_tx: mpsc::Sender<StateCommand>,
    /// A channel to receive broadcasted application events.
    event_rx: broadcast::Receiver<AppEvent>,
    /// User input buffer
    pub input_buffer: String,
    /// Input mode for vim-like modal editing
    pub mode: Mode,
    char_limit: usize,
    tick_rate: Duration,
    spinner_frame: usize,
    // Conversation viewport scrolling state
    convo_offset_y: u16,
    convo_auto_follow: bool,
    pending_char: Option<char>,
    last_viewport_height: u16,
    needs_redraw: bool,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(
        state: Arc<AppState>,
        cmd_tx: mpsc::Sender<StateCommand>,
        event_bus: &EventBus, // reference non-Arc OK because only created at startup
        ui: &UiConfig,
    ) -> Self {
        Self {
            running: false, // Will be set to true in run()
            state,
            cmd_tx,
            event_rx: event_bus.subscribe(EventPriority::Realtime),
            input_buffer: String::new(),
            mode: Mode::default(),
            char_limit: ui.char_limit,
            tick_rate: Duration::from_millis(ui.tick_ms),
            spinner_frame: 0,
            convo_offset_y: 0,
            convo_auto_follow: true,
            pending_char: None,
            last_viewport_height: 0,
            needs_redraw: true,
        }
    }

    pub(crate) fn send_cmd(&self, cmd: StateCommand) {
        // Use try_send to prevent the UI from blocking
        let _ = self.cmd_tx.try_send(cmd).emit_warning();
    }

    /// Run the application's main loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.running = true;
        let mut crossterm_events = EventStream::new();
        let mut spinner_interval = tokio::time::interval(self.tick_rate);

        while self.running {
            if self.needs_redraw {
                // Prepare data for this frame by reading from AppState.
                let history_guard = self.state.chat.0.read().await;
                let renderable_messages = history_guard
                    .messages()
                    .iter()
                    .map(|m| RenderableMessage {
                        kind: m.kind,
                        content: m.content.clone(),
                        status: m.status.clone(),
                    })
                    .collect::<Vec<RenderableMessage>>();
                drop(history_guard);

                terminal.draw(|frame| self.draw(frame, &renderable_messages))?;
                self.needs_redraw = false;
            }

            // Handle all incoming events (user input, timer, state changes).
            tokio::select! {
                // Prioritize Ui responsiveness
                biased;

                // User input
                maybe_event = crossterm_events.next().fuse() => {
                    if let Some(Ok(event)) = maybe_event {
                        match event {
                            Event::Key(key_event) => {
                                self.on_key_event(key_event);
                                self.needs_redraw = true;
                            }
                            Event::Resize(_, _) => { self.needs_redraw = true; }
                            _ => {}
                        }
                    }
                }

                // Indicator animation. Ticks at a fixed interval regardless
                // of pending state; only triggers a redraw while a request
                // placeholder is visible.
                _ = spinner_interval.tick() => {
                    self.spinner_frame = self.spinner_frame.wrapping_add(1);
                    if self.state.is_pending().await {
                        self.needs_redraw = true;
                    }
                }

                // Application events
                Ok(app_event) = self.event_rx.recv() => {
                    match app_event {
                        AppEvent::MessageUpdated(_) => {}
                        AppEvent::Error(error_event) => {
                            self.send_cmd(StateCommand::AddMessageImmediate {
                                msg: format!("Error: {}", error_event.message),
                                kind: MessageKind::SysInfo,
                                new_msg_id: Uuid::new_v4(),
                            });
                        }
                        AppEvent::Backend(_) => {}
                    }
                    self.needs_redraw = true;
                }
            }
        }
        Ok(())
    }

    fn spinner_glyph(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    /// Renders the user interface.
    fn draw(&mut self, frame: &mut Frame, messages: &[RenderableMessage]) {
        // ---------- Define Layout ----------
        let main_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Min(1),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let chat_area = main_layout[0];
        let input_area = main_layout[1];
        let status_area = main_layout[2];

        // ---------- Conversation viewport ----------
        let conversation_width = chat_area.width.saturating_sub(2);
        let viewport_height = chat_area.height;
        self.last_viewport_height = viewport_height;

        if messages.is_empty() {
            self.convo_offset_y = 0;
            self.convo_auto_follow = true;
            let header = Paragraph::new(HEADER)
                .style(Style::new().fg(Color::Rgb(218, 119, 87)))
                .alignment(Alignment::Center);
            let header_area = center_vertically(chat_area, HEADER.lines().count() as u16);
            frame.render_widget(header, header_area);
        } else {
            let spinner = self.spinner_glyph();
            let (total_height, heights) =
                measure_messages(messages, conversation_width, spinner);
            let max_offset = total_height.saturating_sub(viewport_height);

            if self.convo_auto_follow || self.convo_offset_y > max_offset {
                self.convo_offset_y = max_offset;
            }
            // Re-engage follow once the user scrolls back to the bottom.
            if self.convo_offset_y >= max_offset {
                self.convo_auto_follow = true;
            }

            render_messages(
                frame,
                messages,
                conversation_width,
                chat_area,
                self.convo_offset_y,
                &heights,
                spinner,
            );
        }

        // ---------- Input area ----------
        let input_width = input_area.width.saturating_sub(2) as usize;
        let hint = match self.mode {
            Mode::Insert => INSERT_HINT,
            Mode::Normal => NORMAL_HINT,
        };
        let input_line = if self.input_buffer.is_empty() {
            ratatui::text::Line::from(vec![
                Span::styled(PROMPT, Style::new().fg(Color::Rgb(125, 174, 163))),
                Span::styled(hint.to_string(), Style::new().fg(Color::DarkGray)),
            ])
        } else {
            // Single-line input: show the tail when the buffer outgrows the box.
            let visible_width = input_width.saturating_sub(PROMPT.len() + 1);
            let chars = self.input_buffer.chars().count();
            let tail: String = self
                .input_buffer
                .chars()
                .skip(chars.saturating_sub(visible_width))
                .collect();
            ratatui::text::Line::from(vec![
                Span::styled(PROMPT, Style::new().fg(Color::Rgb(125, 174, 163))),
                Span::raw(tail),
            ])
        };
        let input = Paragraph::new(input_line)
            .block(Block::bordered().title("Input"))
            .style(match self.mode {
                Mode::Normal => Style::default(),
                Mode::Insert => Style::default().fg(Color::Yellow),
            });
        frame.render_widget(input, input_area);

        // ---------- Status line ----------
        let status_bar = Block::default()
            .title(self.mode.to_string())
            .borders(Borders::NONE)
            .padding(Padding::horizontal(1));
        frame.render_widget(status_bar, status_area);

        match self.mode {
            Mode::Insert => {
                let cursor_col = PROMPT.len() as u16
                    + self
                        .input_buffer
                        .chars()
                        .count()
                        .min(input_width.saturating_sub(PROMPT.len() + 1))
                        as u16;
                frame.set_cursor_position((input_area.x + 1 + cursor_col, input_area.y + 1));
            }
            Mode::Normal => {
                // Cursor hidden by not calling `set_cursor_position`
            }
        }
    }

    /// Handles the key events and updates the state of [`App`]
    fn on_key_event(&mut self, key: KeyEvent) {
        if let Some(action) = to_action(self.mode, key) {
            self.handle_action(action);
        } else {
            self.pending_char = None;
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.quit(),

            // Mode switches are idempotent; re-entering the current mode is
            // a no-op.
            Action::SwitchMode(mode) => {
                self.pending_char = None;
                self.mode = mode;
            }

            Action::InsertChar(c) => {
                if self.input_buffer.chars().count() < self.char_limit {
                    self.input_buffer.push(c);
                }
            }
            Action::Backspace => {
                self.input_buffer.pop();
            }
            Action::Submit => self.submit_input(),

            Action::ScrollLineUp => self.scroll_by(-1),
            Action::ScrollLineDown => self.scroll_by(1),
            Action::PageUp => self.scroll_by(-(self.half_page() as i32)),
            Action::PageDown => self.scroll_by(self.half_page() as i32),
            Action::JumpBottom => {
                self.pending_char = None;
                self.convo_auto_follow = true;
                self.convo_offset_y = u16::MAX; // clamped to the bottom on draw
            }
            Action::GotoSequenceG => {
                if matches!(self.pending_char, Some('g')) {
                    self.pending_char = None;
                    self.convo_auto_follow = false;
                    self.convo_offset_y = 0;
                } else {
                    // wait for the second 'g'
                    self.pending_char = Some('g');
                }
            }
        }
    }

    fn half_page(&self) -> u16 {
        (self.last_viewport_height / 2).max(1)
    }

    fn scroll_by(&mut self, delta: i32) {
        self.pending_char = None;
        if delta < 0 {
            self.convo_offset_y = self.convo_offset_y.saturating_sub(delta.unsigned_abs() as u16);
            self.convo_auto_follow = false;
        } else {
            // Clamped (and auto-follow re-engaged) against content height on draw.
            self.convo_offset_y = self.convo_offset_y.saturating_add(delta as u16);
        }
    }

    fn submit_input(&mut self) {
        if self.input_buffer.trim().is_empty() {
            return;
        }
        let line = std::mem::take(&mut self.input_buffer);
        let command = commands::parser::parse(&line);
        commands::exec::execute(self, command);
    }

    /// Set running to false to quit the application.
    pub(crate) fn quit(&mut self) {
        self.running = false;
    }
}

fn center_vertically(area: Rect, content_height: u16) -> Rect {
    let top = area.height.saturating_sub(content_height) / 2;
    Rect::new(
        area.x,
        area.y + top,
        area.width,
        content_height.min(area.height),
    )
}
