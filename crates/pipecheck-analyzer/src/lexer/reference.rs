use pipecheck_common::{Position, Range};
use thiserror::Error;

use super::cursor::Cursor;

const PIPELINE_PREFIX: &str = "pipeline";
const PIPELINE_PARAMS: &str = "pipeline.parameters.";
const LOCAL_PARAMS: &str = "parameters.";

/// Which scope a reference is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    /// `<< pipeline.parameters.NAME >>`: document-wide parameters only.
    Pipeline,
    /// `<< parameters.NAME >>`: parameters visible at the usage site.
    Local,
}

/// A parameter substitution found inside scalar text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Referenced parameter name.
    pub name: String,
    /// Dotted path as written, e.g. `pipeline.parameters.tag`.
    pub full_name: String,
    pub qualifier: Qualifier,
    /// Range of the whole `<< ... >>` expression, relative to the text start.
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("unterminated substitution starting at {0}")]
    Unterminated(Position),
}

/// Whether a dotted reference path designates a pipeline parameter.
pub fn is_pipeline_qualified(full_name: &str) -> bool {
    full_name.starts_with(PIPELINE_PREFIX)
}

/// Scan `text` for parameter substitutions.
///
/// Substitutions that do not name a parameter (`<< pipeline.git.tag >>`) are
/// skipped. An opening `<<` with no closing `>>` makes the whole text
/// malformed.
pub fn extract_references(text: &str) -> Result<Vec<Reference>, ReferenceError> {
    let mut cursor = Cursor::new(text);
    let mut references = Vec::new();

    while !cursor.is_eof() {
        if !cursor.at_pair('<', '<') {
            cursor.advance();
            continue;
        }

        let start = cursor.position();
        cursor.advance();
        cursor.advance();
        let body_start = cursor.offset();
        while !cursor.at_pair('>', '>') {
            if cursor.advance().is_none() {
                return Err(ReferenceError::Unterminated(start));
            }
        }
        let body = cursor.slice_from(body_start);
        cursor.advance();
        cursor.advance();

        if let Some(full_name) = parameter_path(body) {
            let qualifier = if is_pipeline_qualified(full_name) {
                Qualifier::Pipeline
            } else {
                Qualifier::Local
            };
            let name = match qualifier {
                Qualifier::Pipeline => &full_name[PIPELINE_PARAMS.len()..],
                Qualifier::Local => &full_name[LOCAL_PARAMS.len()..],
            };
            references.push(Reference {
                name: name.to_string(),
                full_name: full_name.to_string(),
                qualifier,
                range: Range::new(start, cursor.position()),
            });
        }
    }

    Ok(references)
}

/// The single reference `text` consists of, ignoring surrounding whitespace.
///
/// The substitution must cover the whole trimmed text: any literal character
/// before or after it makes the text an ordinary string.
pub fn lone_reference(text: &str) -> Option<Reference> {
    let trimmed = text.trim();
    let mut references = extract_references(trimmed).ok()?;
    if references.len() != 1 {
        return None;
    }
    let reference = references.pop()?;

    let mut cursor = Cursor::new(trimmed);
    while cursor.advance().is_some() {}
    let whole = reference.range == Range::new(Position::new(0, 0), cursor.position());
    whole.then_some(reference)
}

pub fn is_lone_reference(text: &str) -> bool {
    lone_reference(text).is_some()
}

/// Dotted parameter path inside a substitution body, if it is one.
fn parameter_path(body: &str) -> Option<&str> {
    let path = body.trim();
    let name = path
        .strip_prefix(PIPELINE_PARAMS)
        .or_else(|| path.strip_prefix(LOCAL_PARAMS))?;
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid.then_some(path)
}
