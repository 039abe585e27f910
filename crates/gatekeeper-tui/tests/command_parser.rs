use gatekeeper_tui::app::commands::help_text;
use gatekeeper_tui::app::commands::parser::{parse, Command, COMMANDS};

#[test]
fn plain_text_is_an_implicit_ask() {
    assert_eq!(parse("hello"), Command::Ask("hello".to_string()));
}

#[test]
fn implicit_ask_keeps_the_line_verbatim() {
    let line = "what do I do for fun? /not-a-command";
    assert_eq!(parse(line), Command::Ask(line.to_string()));
}

#[test]
fn explicit_ask_takes_the_rest_of_the_line() {
    assert_eq!(
        parse("/ask what is rust"),
        Command::Ask("what is rust".to_string())
    );
}

#[test]
fn remember_takes_raw_data() {
    assert_eq!(
        parse("/remember fact: sky is blue"),
        Command::Remember("fact: sky is blue".to_string())
    );
}

#[test]
fn bare_commands_parse() {
    assert_eq!(parse("/clear"), Command::Clear);
    assert_eq!(parse("/quit"), Command::Quit);
    assert_eq!(parse("/help"), Command::Help { error: None });
}

#[test]
fn unknown_command_is_reported_by_name() {
    assert_eq!(parse("/bogus"), Command::Unknown("bogus".to_string()));
    assert_eq!(
        parse("/bogus with args"),
        Command::Unknown("bogus".to_string())
    );
}

#[test]
fn lookup_is_case_sensitive() {
    assert_eq!(parse("/Help"), Command::Unknown("Help".to_string()));
    assert_eq!(parse("/ASK hi"), Command::Unknown("ASK".to_string()));
}

#[test]
fn bare_prefix_yields_help_with_error() {
    match parse("/") {
        Command::Help { error: Some(e) } => assert!(e.contains("command")),
        other => panic!("expected help with error, got {other:?}"),
    }
}

#[test]
fn argument_splits_on_first_whitespace_run() {
    assert_eq!(
        parse("/ask   spaced   out"),
        Command::Ask("spaced   out".to_string())
    );
}

#[test]
fn registry_names_are_unique() {
    let mut names: Vec<&str> = COMMANDS.iter().map(|c| c.name).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), COMMANDS.len());
}

#[test]
fn every_registered_name_is_recognized() {
    for entry in COMMANDS {
        let parsed = parse(&format!("/{} arg", entry.name));
        assert!(
            !matches!(parsed, Command::Unknown(_)),
            "registered command {} fell through to Unknown",
            entry.name
        );
    }
}

#[test]
fn help_text_lists_commands_and_keybinds() {
    let help = help_text(None);
    for entry in COMMANDS {
        assert!(help.contains(entry.name), "help is missing /{}", entry.name);
    }
    assert!(help.contains("ctrl+c"));
    assert!(help.contains("Modes:"));
}

#[test]
fn help_text_carries_the_error_line() {
    let help = help_text(Some("unknown command: bogus"));
    assert!(help.starts_with("Error: unknown command: bogus"));
}
