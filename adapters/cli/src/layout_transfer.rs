//! One-line layout strings for sharing boards between players.

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

const LAYOUT_DOMAIN: &str = "chase";
const LAYOUT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub(crate) const LAYOUT_HEADER: &str = "chase:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableLayout {
    rows: Vec<String>,
}

/// Encodes layout rows into a single-line string suitable for clipboard
/// transfer.
pub(crate) fn encode(rows: &[&str]) -> String {
    let payload = SerializableLayout {
        rows: rows.iter().map(|row| (*row).to_owned()).collect(),
    };
    let json = serde_json::to_vec(&payload).expect("layout serialization never fails");
    let encoded = STANDARD_NO_PAD.encode(json);
    let columns = rows.first().map_or(0, |row| row.chars().count());
    format!("{LAYOUT_HEADER}:{columns}x{}:{encoded}", rows.len())
}

/// Decodes layout rows from their string representation.
pub(crate) fn decode(value: &str) -> Result<Vec<String>, LayoutTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LayoutTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

    if domain != LAYOUT_DOMAIN {
        return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != LAYOUT_VERSION {
        return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
    }

    let (columns, rows) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(LayoutTransferError::InvalidEncoding)?;
    let decoded: SerializableLayout =
        serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

    let actual_rows = decoded.rows.len();
    let actual_columns = decoded
        .rows
        .first()
        .map_or(0, |row| row.chars().count());
    if actual_rows != rows as usize || actual_columns != columns as usize {
        return Err(LayoutTransferError::DimensionMismatch {
            declared: (columns, rows),
            actual: (actual_columns, actual_rows),
        });
    }

    Ok(decoded.rows)
}

fn parse_dimensions(value: &str) -> Result<(u32, u32), LayoutTransferError> {
    let mut parts = value.split('x');
    let columns = parts
        .next()
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| LayoutTransferError::InvalidDimensions(value.to_owned()))?;
    let rows = parts
        .next()
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| LayoutTransferError::InvalidDimensions(value.to_owned()))?;
    if parts.next().is_some() {
        return Err(LayoutTransferError::InvalidDimensions(value.to_owned()));
    }
    Ok((columns, rows))
}

/// Errors that can occur while decoding layout transfer strings.
#[derive(Debug)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded layout.
    MissingPrefix,
    /// The encoded layout did not contain a version segment.
    MissingVersion,
    /// The encoded layout did not include grid dimensions.
    MissingDimensions,
    /// The encoded layout did not include the payload segment.
    MissingPayload,
    /// The encoded layout used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded layout used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded layout.
    InvalidDimensions(String),
    /// The declared dimensions did not match the decoded rows.
    DimensionMismatch {
        /// Columns and rows named in the header.
        declared: (u32, u32),
        /// Columns and rows actually decoded.
        actual: (usize, usize),
    },
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for LayoutTransferError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(formatter, "layout string is empty"),
            Self::MissingPrefix => write!(formatter, "layout string is missing its prefix"),
            Self::MissingVersion => write!(formatter, "layout string is missing its version"),
            Self::MissingDimensions => {
                write!(formatter, "layout string is missing its dimensions")
            }
            Self::MissingPayload => write!(formatter, "layout string is missing its payload"),
            Self::InvalidPrefix(prefix) => {
                write!(formatter, "unexpected layout prefix {prefix:?}")
            }
            Self::UnsupportedVersion(version) => {
                write!(formatter, "unsupported layout version {version:?}")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(formatter, "malformed layout dimensions {dimensions:?}")
            }
            Self::DimensionMismatch { declared, actual } => write!(
                formatter,
                "declared dimensions {}x{} do not match decoded rows {}x{}",
                declared.0, declared.1, actual.0, actual.1
            ),
            Self::InvalidEncoding(source) => {
                write!(formatter, "payload is not valid base64: {source}")
            }
            Self::InvalidPayload(source) => {
                write!(formatter, "payload is not a valid layout: {source}")
            }
        }
    }
}

impl Error for LayoutTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(source) => Some(source),
            Self::InvalidPayload(source) => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode_returns_the_original_rows() {
        let rows = ["#####", "#P.D#", "#####"];
        let encoded = encode(&rows);
        assert!(encoded.starts_with(LAYOUT_HEADER));
        assert_eq!(decode(&encoded).expect("decodable"), rows);
    }

    #[test]
    fn foreign_prefixes_are_rejected() {
        let encoded = encode(&["#P#"]).replacen("chase", "othergame", 1);
        assert!(matches!(
            decode(&encoded),
            Err(LayoutTransferError::InvalidPrefix(_))
        ));
    }

    #[test]
    fn tampered_dimensions_are_rejected() {
        let encoded = encode(&["#P#"]).replacen("3x1", "4x2", 1);
        assert!(matches!(
            decode(&encoded),
            Err(LayoutTransferError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn garbage_payloads_are_rejected() {
        assert!(matches!(
            decode("chase:v1:1x1:!!!"),
            Err(LayoutTransferError::InvalidEncoding(_))
        ));
    }
}
