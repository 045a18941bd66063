//! Fixed width field decoding
use crate::error::ParsingError;

/// Observation fields of a satellite line, as byte ranges, in this order:
/// pseudorange, carrier phase, doppler, signal strength.
pub const OBSERVATION_FIELDS: [(usize, usize); 4] = [(3, 19), (19, 35), (35, 51), (51, 67)];

/// Returns `line[start..end]`, trimmed. Portions beyond the end of the line
/// are considered empty. Returns None when the range splits a character.
pub(crate) fn slice(line: &str, start: usize, end: usize) -> Option<&str> {
    let bytes = line.as_bytes();
    let end = end.min(bytes.len());
    let start = start.min(end);
    std::str::from_utf8(&bytes[start..end])
        .ok()
        .map(|content| content.trim())
}

/// Decodes a single fixed width field.
/// Blank fields are absent measurements (None), not zeros.
pub fn decode_field(line: &str, start: usize, end: usize) -> Result<Option<f64>, ParsingError> {
    let content = slice(line, start, end).ok_or_else(|| ParsingError::FieldDecodeError {
        start,
        end,
        content: line.to_string(),
    })?;

    if content.is_empty() {
        return Ok(None);
    }

    let value = content
        .parse::<f64>()
        .map_err(|_| ParsingError::FieldDecodeError {
            start,
            end,
            content: content.to_string(),
        })?;

    Ok(Some(value))
}

/// Decodes all given fixed width fields, in order.
pub fn decode_fields(
    line: &str,
    ranges: &[(usize, usize)],
) -> Result<Vec<Option<f64>>, ParsingError> {
    ranges
        .iter()
        .map(|(start, end)| decode_field(line, *start, *end))
        .collect()
}
