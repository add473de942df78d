use thiserror::Error;

#[derive(Error, Debug)]
pub enum DerivationError {
    #[error("Measurement '{measurement}' is missing from channel '{identity}'")]
    MissingMeasurement {
        measurement: String,
        identity: String,
    },

    #[error("Duplicate channel identity: '{0}'")]
    DuplicateIdentity(String),

    #[error("An unexpected error occurred during derivation: {0}")]
    Internal(String),
}
