use serde_json::Value;

use crate::JobRecord;

/// What a single stream line turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Blank,
    Record(JobRecord),
    Invalid(InvalidRecord),
    /// Well-formed record with a type this client does not handle.
    Unknown { kind: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRecord {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("record has no `type` field")]
    MissingType,
    #[error("record `type` is not a string")]
    TypeNotString,
    #[error("record has no `content` field")]
    MissingContent,
    #[error("`state` record content is not an object")]
    StateNotObject,
}

/// Classifies one line of the stream: `{"type": ..., "content": ...}`.
pub fn parse_line(line: &str) -> ParsedLine {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ParsedLine::Blank;
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(err) => {
            return ParsedLine::Record(JobRecord::Malformed {
                line: trimmed.to_string(),
                reason: err.to_string(),
            })
        }
    };

    match classify(value) {
        Ok(parsed) => parsed,
        Err(invalid) => ParsedLine::Invalid(invalid),
    }
}

fn classify(value: Value) -> Result<ParsedLine, InvalidRecord> {
    let Value::Object(mut object) = value else {
        return Err(InvalidRecord::NotAnObject);
    };
    let kind = match object.remove("type") {
        Some(Value::String(kind)) => kind,
        Some(_) => return Err(InvalidRecord::TypeNotString),
        None => return Err(InvalidRecord::MissingType),
    };
    let content = object.remove("content").ok_or(InvalidRecord::MissingContent)?;

    let record = match kind.as_str() {
        "terminal" => JobRecord::Terminal(match content {
            Value::String(text) => text,
            other => other.to_string(),
        }),
        "state" => match content {
            Value::Object(partial) => JobRecord::State(partial),
            _ => return Err(InvalidRecord::StateNotObject),
        },
        "error" => JobRecord::Error(content),
        _ => return Ok(ParsedLine::Unknown { kind }),
    };
    Ok(ParsedLine::Record(record))
}
