use super::{parse_line, SessionCommand};
use crate::workflow::ReportField;

fn parsed(line: &str) -> SessionCommand {
    parse_line(line)
        .expect("parse line")
        .expect("line yields a command")
}

#[test]
fn blank_lines_and_comments_are_skipped() {
    assert_eq!(parse_line("").expect("blank"), None);
    assert_eq!(parse_line("   ").expect("spaces"), None);
    assert_eq!(parse_line("# seleziona la batteria").expect("comment"), None);
}

#[test]
fn free_text_keeps_apostrophes_and_spacing() {
    assert_eq!(
        parsed("analyze l'auto non parte  la mattina"),
        SessionCommand::Analyze(Some("l'auto non parte  la mattina".to_string()))
    );
    assert_eq!(
        parsed("search   batteria"),
        SessionCommand::Search("batteria".to_string())
    );
}

#[test]
fn bare_analyze_uses_the_stored_complaint() {
    assert_eq!(parsed("analyze"), SessionCommand::Analyze(None));
    assert_eq!(parsed("analizza   "), SessionCommand::Analyze(None));
}

#[test]
fn numbers_are_one_based() {
    assert_eq!(parsed("select 2"), SessionCommand::Select(2));
    assert_eq!(parsed("toggle 1"), SessionCommand::Toggle(1));
    assert_eq!(parsed("read 3"), SessionCommand::Read(3));
    assert!(parse_line("toggle 0").is_err());
    assert!(parse_line("select due").is_err());
    assert!(parse_line("read").is_err());
}

#[test]
fn set_parses_field_and_value() {
    assert_eq!(
        parsed("set client Mario Rossi"),
        SessionCommand::Set(ReportField::ClientName, "Mario Rossi".to_string())
    );
    assert_eq!(
        parsed("set ricambi batteria 70Ah"),
        SessionCommand::Set(ReportField::PartsUsed, "batteria 70Ah".to_string())
    );
    assert_eq!(
        parsed("set test"),
        SessionCommand::Set(ReportField::FinalTest, String::new())
    );
    assert!(parse_line("set").is_err());
    assert!(parse_line("set colore rosso").is_err());
}

#[test]
fn italian_aliases_and_case_are_accepted() {
    assert_eq!(parsed("AVANTI"), SessionCommand::Proceed);
    assert_eq!(parsed("indietro"), SessionCommand::Back);
    assert_eq!(parsed("esci"), SessionCommand::Quit);
    assert_eq!(parsed("Status"), SessionCommand::Status);
}

#[test]
fn unknown_command_is_an_error() {
    let err = parse_line("ripara tutto").expect_err("unknown command");
    assert!(err.to_string().contains("unknown command"));
}
