use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProwlerError {
    #[error("duplicate species identifier '{0}' in reference universe")]
    DuplicateSpecies(String),

    #[error("species '{0}' is not part of the reference universe")]
    UnknownSpecies(String),

    #[error("{}", incompatible_universe_message(.left, .right))]
    IncompatibleUniverse { left: usize, right: usize },

    #[error("PSS threshold {threshold} outside 0..={universe_length}")]
    InvalidThreshold {
        threshold: usize,
        universe_length: usize,
    },

    #[error("invalid profile symbol '{0}'")]
    InvalidSymbol(char),

    #[error("expected {expected} profile positions, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("row {row} has no {side} profile")]
    MissingProfile { row: usize, side: &'static str },

    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("worksheet '{0}' not found")]
    MissingSheet(String),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Spreadsheet(#[from] calamine::Error),
}

fn incompatible_universe_message(left: &usize, right: &usize) -> String {
    if left == right {
        format!(
            "profiles were built over species universes that differ in content or order \
             ({left} species each)"
        )
    } else {
        format!("profiles were built over different species universes ({left} vs {right} species)")
    }
}

impl ProwlerError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProwlerError>;
