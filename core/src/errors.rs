// core/src/errors.rs
use thiserror::Error;

/// Feiltyper for kjernen. Alle unntatt `Storage` er lokale og gjenopprettbare:
/// brukeren retter input og prøver igjen. Lagringsfeil propageres uhåndtert
/// til kalleren.
#[derive(Debug, Error)]
pub enum WorkoutError {
    /// Et påkrevd felt manglet i skjemaet.
    #[error("empty field: {0}")]
    EmptyField(&'static str),

    /// Et felt var til stede men ikke et gyldig tall (NaN/uendelig,
    /// eller utenfor tillatt område).
    #[error("not a number: {0}")]
    InvalidNumber(&'static str),

    /// Operasjonen refererte en id som ikke finnes i lageret.
    #[error("workout not found: {0}")]
    NotFound(String),

    /// Serialisering/deserialisering mot lageret feilet.
    #[error("storage: {0}")]
    Storage(String),

    /// IO-feil fra filbasert lager.
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
}
