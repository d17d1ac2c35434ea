use thiserror::Error;

use crate::core::types::NationId;

#[derive(Error, Debug)]
pub enum SimError {
    /// A reference to a nation that does not exist. Only an engine bug can
    /// produce this, so it is surfaced instead of ignored.
    #[error("Unknown nation: {0}")]
    UnknownNation(NationId),

    #[error("Intent rejected: {0}")]
    Rejected(#[from] IntentRejection),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Reason codes for intents that violate a precondition
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntentRejection {
    #[error("a nation cannot act on itself")]
    SelfTarget,

    #[error("nations are already at war")]
    AlreadyAtWar,

    #[error("nations are not at war")]
    NotAtWar,

    #[error("cannot declare war on an ally")]
    TargetIsAlly,

    #[error("a peace treaty is still in force")]
    TruceActive,

    #[error("relations too low: need {required:.0}, have {actual:.1}")]
    RelationsTooLow { required: f64, actual: f64 },

    #[error("nations are hostile")]
    Hostile,

    #[error("a trade deal is already active")]
    TradeDealActive,

    #[error("an alliance is already active")]
    AllianceActive,

    #[error("sanctions are already in place")]
    AlreadySanctioned,

    #[error("actor economy too small to give aid")]
    InsufficientGdp,

    #[error("tax rate {0} outside [0, 1]")]
    TaxRateOutOfRange(f64),

    #[error("budget share {0} is not a finite non-negative number")]
    InvalidShare(f64),

    #[error("budget shares total {total:.3}, exceeding 1")]
    BudgetOverAllocated { total: f64 },

    #[error("government type unchanged")]
    GovernmentUnchanged,

    #[error("law already in requested state")]
    LawUnchanged,
}

pub type Result<T> = std::result::Result<T, SimError>;
