//! Command executor for the TUI.
//!
//! Dataflow:
//! - Receives structured `Command` variants from the parser.
//! - Translates them into `StateCommand`s for the state manager (or local
//!   App effects for quit). Never blocks the UI thread.
//!
//! The at-most-one-outstanding-request rule is not checked here; the state
//! manager owns the pending slot and silently drops submissions while a
//! request is in flight.

use uuid::Uuid;

use super::parser::Command;
use crate::app::App;
use crate::app_state::StateCommand;
use crate::backend::RequestKind;
use crate::chat_history::MessageKind;

/// Execute a parsed command.
pub fn execute(app: &mut App, command: Command) {
    match command {
        Command::Ask(query) if query.trim().is_empty() => {
            show_help(app, Some("ask requires a query"));
        }
        Command::Ask(query) => {
            app.send_cmd(StateCommand::SubmitRequest {
                kind: RequestKind::Ask,
                payload: query,
                new_msg_id: Uuid::new_v4(),
            });
        }
        Command::Remember(data) if data.trim().is_empty() => {
            show_help(app, Some("remember requires data to store"));
        }
        Command::Remember(data) => {
            app.send_cmd(StateCommand::SubmitRequest {
                kind: RequestKind::Remember,
                payload: data,
                new_msg_id: Uuid::new_v4(),
            });
        }
        Command::Clear => {
            app.send_cmd(StateCommand::ClearHistory);
        }
        Command::Quit => {
            app.quit();
        }
        Command::Help { error } => {
            show_help(app, error.as_deref());
        }
        Command::Unknown(name) => {
            show_help(app, Some(&format!("unknown command: {name}")));
        }
    }
}

fn show_help(app: &mut App, error: Option<&str>) {
    app.send_cmd(StateCommand::AddMessageImmediate {
        msg: super::help_text(error),
        kind: MessageKind::SysInfo,
        new_msg_id: Uuid::new_v4(),
    });
}
