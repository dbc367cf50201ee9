use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid record id: {0:?}")]
    InvalidId(String),
    #[error("unknown ability code: {0}")]
    UnknownAbility(String),
    #[error("invalid hit die: d{0}")]
    InvalidHitDie(u8),
    #[error("unknown content kind: {0}")]
    UnknownKind(String),
    #[error("unknown creature size: {0}")]
    UnknownSize(String),
    #[error("patch must be a JSON object")]
    PatchNotObject,
    #[error("patch may not change {field}")]
    ImmutableField { field: &'static str },
    #[error("patch may not change the content kind from {from} to another kind")]
    KindChange { from: crate::ContentKind },
    #[error("patch produced an invalid record: {0}")]
    InvalidPatch(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
