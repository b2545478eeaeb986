use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing input band '{0}'")]
    MissingBand(String),
    #[error("Input band '{0}' does not have wavelength information")]
    MissingWavelength(String),
    #[error("Valid pixel expression is not compatible with the source product ({reason}). Expression is '{expression}'")]
    IncompatibleExpression { expression: String, reason: String },
    #[error("Invalid solar flux table: {0}")]
    SolarFlux(String),
    #[error("threads must be greater than zero")]
    Threads,
}
