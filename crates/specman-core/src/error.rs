use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("not initialized: run 'specman init'")]
    NotInitialized,

    #[error("spec not found: {0}")]
    SpecNotFound(String),

    #[error("spec already exists: {0}")]
    SpecExists(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("invalid spec id '{0}': expected <prefix>-<number>-<slug>")]
    InvalidId(String),

    #[error("invalid item ref '{0}': expected <spec-id>/<item-id>")]
    InvalidItemRef(String),

    #[error("unknown spec type: {0}")]
    UnknownSpecType(String),

    #[error("item not found: {0}")]
    ItemNotFound(String),

    #[error("item already superseded: {id} (by {by})")]
    AlreadySuperseded { id: String, by: String },

    #[error("draft not found: {0}")]
    DraftNotFound(String),

    #[error("draft is already complete: {0}")]
    DraftComplete(String),

    #[error("answer required for question '{0}'")]
    AnswerRequired(String),

    #[error("draft '{id}' is missing required answers: {missing}")]
    DraftIncomplete { id: String, missing: String },

    #[error("invalid field value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SpecError>;
