use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while extracting ACTION/GOTO tables from a report.
///
/// The first two variants mean the input is not a table report at all and
/// are always fatal. The malformed-row/cell variants are only raised in
/// strict mode; the default is to skip and count such lines.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The section marker never occurs in the input.
    #[error("table section not found: no {marker:?} in input")]
    SectionNotFound { marker: String },

    /// No header row follows the section marker.
    #[error("table header not found: no row containing {state_label:?}")]
    HeaderNotFound { state_label: String },

    /// A data row whose leading field is not a nonnegative integer.
    #[error("malformed row at line {line_no}: state field {field:?}")]
    MalformedRow { line_no: usize, field: String },

    /// A goto cell whose value is not a nonnegative integer.
    #[error("malformed cell at line {line_no}, column {label:?}: {value:?}")]
    MalformedCell {
        line_no: usize,
        label: String,
        value: String,
    },
}

/// Errors produced while loading a rule or schema file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("can't read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line that is neither a directive, an entry, a comment nor blank.
    #[error("unrecognized line ({line_no}): {line:?}")]
    Line { line_no: usize, line: String },

    /// A directive or entry with an invalid value.
    #[error("invalid value (line {line_no}): {reason}")]
    Value { line_no: usize, reason: String },
}

impl ConfigError {
    /// Wraps an I/O failure with the path it happened on.
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
