//! Terminal front end for the save dialog
//!
//! Reads one answer per line and turns it into [`SaveEvent`]s. The
//! dialog itself decides what each answer means; this module only renders
//! its view and parses keystrokes.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::debug;

use docsave_conflict::{SaveDialog, SaveEvent};
use docsave_core::domain::{Decision, DomainError, ResolutionState};

/// Choice offered when the name already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CollisionChoice {
    Overwrite,
    Rename,
    Edit,
    Cancel,
}

fn parse_choice(line: &str) -> Option<CollisionChoice> {
    match line.trim().to_lowercase().as_str() {
        "o" | "overwrite" => Some(CollisionChoice::Overwrite),
        "r" | "rename" => Some(CollisionChoice::Rename),
        "e" | "edit" => Some(CollisionChoice::Edit),
        "c" | "cancel" | "q" => Some(CollisionChoice::Cancel),
        _ => None,
    }
}

/// Runs the dialog until it commits or is cancelled
///
/// `check_name` vets a non-blank candidate before it is submitted; a
/// refused name is shown like a blank one and asked for again. Returns the
/// commit decision, or `None` if the user cancelled. End of input counts
/// as cancelling.
pub fn run_dialog<R, W, F>(
    dialog: &mut SaveDialog,
    mut input: R,
    mut output: W,
    mut check_name: F,
) -> Result<Option<Decision>>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str) -> Result<(), DomainError>,
{
    let mut line = String::new();
    let mut refused: Option<String> = None;

    loop {
        let view = dialog.view();
        match view.state {
            ResolutionState::Editing => {
                if let Some(message) = refused.take().or(view.validation) {
                    writeln!(output, "\u{2717} {message}")?;
                }
                write!(output, "Name [{}]: ", view.candidate)?;
                output.flush()?;

                if !read_line(&mut input, &mut line)? {
                    dialog.dispatch(SaveEvent::Abort)?;
                    return Ok(None);
                }
                if !line.trim().is_empty() {
                    dialog.dispatch(SaveEvent::Edit(line.clone()))?;
                }

                let candidate = dialog.resolver().candidate();
                if !candidate.is_empty() {
                    if let Err(e) = check_name(candidate) {
                        debug!(candidate = %candidate, error = %e, "Name refused by store");
                        refused = Some(e.to_string());
                        continue;
                    }
                }

                match dialog.dispatch(SaveEvent::Submit)? {
                    Some(decision @ Decision::Commit { .. }) => return Ok(Some(decision)),
                    other => debug!(decision = ?other, "Submit did not commit"),
                }
            }
            ResolutionState::ConfirmingOverwrite => {
                let suggestion = view.suggestion.unwrap_or_default();
                write!(
                    output,
                    "'{}' already exists. [o]verwrite, [r]ename to '{}', [e]dit, [c]ancel: ",
                    view.candidate, suggestion
                )?;
                output.flush()?;

                if !read_line(&mut input, &mut line)? {
                    dialog.dispatch(SaveEvent::Abort)?;
                    return Ok(None);
                }

                match parse_choice(&line) {
                    Some(CollisionChoice::Overwrite) => {
                        return Ok(dialog.dispatch(SaveEvent::ConfirmOverwrite)?);
                    }
                    Some(CollisionChoice::Rename) => {
                        dialog.dispatch(SaveEvent::AcceptSuggestion)?;
                    }
                    Some(CollisionChoice::Edit) => {
                        dialog.dispatch(SaveEvent::CancelConfirmation)?;
                    }
                    Some(CollisionChoice::Cancel) => {
                        dialog.dispatch(SaveEvent::Abort)?;
                        return Ok(None);
                    }
                    None => writeln!(output, "Please answer o, r, e or c.")?,
                }
            }
            ResolutionState::Committed | ResolutionState::Aborted => return Ok(None),
        }
    }
}

/// Reads one line into `buf` without its line ending. Returns false at EOF.
fn read_line<R: BufRead>(input: &mut R, buf: &mut String) -> Result<bool> {
    buf.clear();
    if input.read_line(buf)? == 0 {
        return Ok(false);
    }
    let trimmed_len = buf.trim_end_matches(['\r', '\n']).len();
    buf.truncate(trimmed_len);
    Ok(true)
}
