use super::*;
use hades_ir::{FileId, Span};
use pretty_assertions::assert_eq;

fn loc(start: u32, end: u32) -> SourceLocation {
    SourceLocation::new(FileId::new(0), Span::new(start, end))
}

#[test]
fn builder_collects_labels_and_notes() {
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_message("type mismatch")
        .with_label(loc(4, 9), "expected CInt")
        .with_secondary_label(loc(0, 2), "declared here")
        .with_note("values of type Bool are not numbers");

    assert!(diag.is_error());
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.primary_location(), Some(loc(4, 9)));
    assert_eq!(diag.notes.len(), 1);
}

#[test]
fn primary_location_skips_secondary_labels() {
    let diag = Diagnostic::warning(ErrorCode::E2016)
        .with_secondary_label(loc(0, 1), "context")
        .with_label(loc(7, 8), "here");
    assert_eq!(diag.primary_location(), Some(loc(7, 8)));
    assert!(!diag.is_error());
}

#[test]
fn display_format() {
    let diag = Diagnostic::error(ErrorCode::E2012)
        .with_message("missing arguments: expected 2")
        .with_label(loc(3, 10), "in this call")
        .with_note("the function declares 2 parameters");

    assert_eq!(
        diag.to_string(),
        "error [E2012]: missing arguments: expected 2\n  --> 0:3..10: in this call\n  = note: the function declares 2 parameters"
    );
}
