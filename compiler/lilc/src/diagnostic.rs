//! Error reports as labelled source snippets.

use std::io::{self, IsTerminal};
use std::ops::Range;

use ariadne::{Config, Label, Report, ReportKind, Source};

use crate::error::DriverError;

/// Render `err` against `source` as plain text.
pub fn render(path: &str, source: &str, err: &DriverError) -> String {
    let mut out = Vec::new();
    match report(path, err, false).write((path, Source::from(source.to_owned())), &mut out) {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(_) => format!("error: {err}\n"),
    }
}

/// Print `err` to stderr, coloured when stderr is a terminal.
pub fn emit(path: &str, source: &str, err: &DriverError) {
    let color = io::stderr().is_terminal();
    if report(path, err, color)
        .eprint((path, Source::from(source.to_owned())))
        .is_err()
    {
        eprintln!("error: {err}");
    }
}

fn report<'p>(
    path: &'p str,
    err: &DriverError,
    color: bool,
) -> Report<'p, (&'p str, Range<usize>)> {
    let span = err.span();
    let offset = span.map_or(0, |span| span.start as usize);
    let builder = Report::build(ReportKind::Error, path, offset)
        .with_config(Config::default().with_color(color))
        .with_message(err.to_string());
    match span {
        Some(span) => builder
            .with_label(
                Label::new((path, span.to_range())).with_message(format!("{} error", err.phase())),
            )
            .finish(),
        None => builder.finish(),
    }
}
