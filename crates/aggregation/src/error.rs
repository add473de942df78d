use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("Cannot aggregate an empty table")]
    EmptyTable,

    #[error("Measurement '{measurement}' is missing from channel '{identity}'")]
    MissingMeasurement {
        measurement: String,
        identity: String,
    },

    #[error("Channel '{0}' is not present in the table")]
    EntityNotFound(String),
}
