pub(crate) mod exec;
pub mod parser;

use std::fmt::Write as _;

use crate::app::input::keymap::KEYBINDS;
use parser::COMMANDS;

/// Builds the `/help` transcript entry from the command and keybinding
/// tables, optionally prefixed with an error line.
pub fn help_text(error: Option<&str>) -> String {
    let mut help = String::new();
    if let Some(error) = error {
        let _ = writeln!(help, "Error: {error}");
    }
    help.push_str(
        "=================GATEKEEPER=====================\n\
         A RAG for your own personal knowledge base\n\n\
         Commands:\n",
    );
    for entry in COMMANDS {
        let _ = writeln!(help, "  /{:<12} {}", entry.name, entry.help);
    }
    help.push_str("\nKeybinds:\n");
    for (key, desc) in KEYBINDS {
        let _ = writeln!(help, "  {key:<12} {desc}");
    }
    help.push_str(
        "\nModes:\n  \
         normal       scroll the transcript using vim motions\n  \
         insert       type queries and /commands for the knowledge base\n",
    );
    help
}
