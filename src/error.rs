use thiserror::Error;

/// Why a single generation stage did not produce questions.
/// Never leaves the provider: every variant is logged and demoted to "try the next stage".
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("empty response from model")]
    EmptyResponse,
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("response contained no usable questions")]
    NoQuestions,
}

/// Rejected quiz-flow transitions. State is left untouched when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("event {event} is not valid in phase {phase}")]
    InvalidTransition { phase: &'static str, event: &'static str },
    #[error("unknown subject: {0}")]
    UnknownSubject(String),
    #[error("unknown level: {0}")]
    UnknownLevel(String),
    #[error("pick a subject and a level first")]
    IncompleteSelection,
    #[error("option {0} is out of range")]
    OptionOutOfRange(usize),
}
