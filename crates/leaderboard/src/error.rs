use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeaderboardError {
    #[error("Cannot rank an empty table")]
    EmptyTable,

    #[error("Channel '{0}' is not present in the ranking")]
    EntityNotFound(String),

    #[error("Measurement '{0}' was not analyzed in this snapshot")]
    MissingMeasurement(String),
}
