use crate::model::action::OnCompletionAction;
use crate::parse::normalize::{
    dataview_directive_re, json_directive_start_re, matching_brace, simple_directive_re,
};

/// Error type for directive parsing
#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    #[error("empty on-completion value")]
    Empty,
    #[error("unrecognized on-completion format: {0}")]
    Unrecognized(String),
    #[error("invalid on-completion JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Locate the raw on-completion value on a task line, in any of the three
/// notations. The JSON notation wins when present; the returned value is the
/// payload text exactly as written (`{...}`, a bare token, or the inline
/// field's value).
pub fn extract_directive(line: &str) -> Option<String> {
    if let Some(m) = json_directive_start_re().find(line) {
        let open = m.end() - 1;
        if let Some(close) = matching_brace(line, open) {
            return Some(line[open..=close].to_string());
        }
    }
    if let Some(caps) = simple_directive_re().captures(line) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = dataview_directive_re().captures(line) {
        return Some(caps[1].trim().to_string());
    }
    None
}

/// Parse a raw on-completion value into a typed action.
///
/// Accepts the simple keyword formats (`keep`, `delete`, `archive`), the
/// parameterized colon formats (`archive:<file>`, `move:<file>`,
/// `duplicate:<file>`), and a JSON object (`{"type": "archive", ...}`).
/// Keywords are case-insensitive; file arguments keep their original case.
pub fn parse_directive(raw: &str) -> Result<OnCompletionAction, DirectiveError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(DirectiveError::Empty);
    }

    if value.starts_with('{') {
        return Ok(serde_json::from_str(value)?);
    }

    let lower = value.to_lowercase();
    match lower.as_str() {
        "keep" => return Ok(OnCompletionAction::Keep),
        "delete" => return Ok(OnCompletionAction::Delete),
        "archive" => {
            return Ok(OnCompletionAction::Archive {
                archive_file: None,
                archive_section: None,
            });
        }
        _ => {}
    }

    if lower.starts_with("archive:") {
        let file = value["archive:".len()..].trim();
        return Ok(OnCompletionAction::Archive {
            archive_file: (!file.is_empty()).then(|| file.to_string()),
            archive_section: None,
        });
    }
    if lower.starts_with("move:") {
        let file = value["move:".len()..].trim();
        return Ok(OnCompletionAction::Move {
            target_file: file.to_string(),
            target_section: None,
        });
    }
    if lower.starts_with("duplicate:") {
        let file = value["duplicate:".len()..].trim();
        return Ok(OnCompletionAction::Duplicate {
            target_file: (!file.is_empty()).then(|| file.to_string()),
            target_section: None,
            preserve_metadata: false,
        });
    }

    Err(DirectiveError::Unrecognized(value.to_string()))
}
