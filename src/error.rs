use thiserror::Error;

/// Invalid process or session configuration. Always fatal for the run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid hash {0}: fingerprints must be below 1099511627775")]
    FingerprintRange(u64),
    #[error("invalid hash {0}: not present in the graph")]
    UnknownFingerprint(u64),
    #[error("field {0} does not hold a multiple of 4 minos")]
    MinoCount(u64),
    #[error("invalid see {0}: must be in 2..=11")]
    See(usize),
    #[error("invalid number of threads: must be at least 1")]
    Threads,
    #[error("weight {value} for subset '{subset}' outside [0, 2^32]")]
    WeightRange { subset: String, value: i64 },
    #[error("malformed weight file at line {line}: {reason}")]
    WeightSyntax { line: usize, reason: String },
    #[error("cannot combine -{0} and -{1} modes")]
    Conflict(char, char),
}

/// Malformed query input on the line protocol. Fatal for the run, not just the query.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid piece '{0}'")]
    InvalidPiece(char),
    #[error("queue token must be {expected} pieces long, got {got}")]
    Length { expected: usize, got: usize },
    #[error("too few pieces to infer bag")]
    TooFewToInfer,
    #[error("cannot infer bag from duplicate pieces")]
    DuplicateInferred,
    #[error("missing bag after queue '{0}'")]
    MissingBag(String),
    #[error("missing value after {0}")]
    MissingValue(&'static str),
    #[error("invalid number '{0}'")]
    Number(String),
}
