//! Error types raised by round processing.

use thiserror::Error;

/// Malformed game data. Fatal: the round cannot continue.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The priority roster handed to the round was empty.
    #[error("player roster is empty")]
    EmptyRoster,

    /// No corporation with the given symbol exists.
    #[error("unknown corporation '{0}'")]
    UnknownCorporation(String),

    /// No company with the given symbol exists.
    #[error("unknown company '{0}'")]
    UnknownCompany(String),

    /// A corporation or company lacks a link it needs for this round.
    #[error("{entity} has no linked {expected}")]
    MissingLink {
        /// Symbol of the entity being resolved.
        entity: String,
        /// Kind of entity the link should point at.
        expected: &'static str,
    },

    /// A link resolved to a corporation of the wrong category.
    #[error("{entity} links to {target}, which is not a {expected}")]
    WrongLinkKind {
        /// Symbol of the entity being resolved.
        entity: String,
        /// Symbol the link pointed at.
        target: String,
        /// Kind of entity the link should point at.
        expected: &'static str,
    },

    /// A home coordinate that does not exist on the board.
    #[error("{corporation} home coordinate {coordinate} is not on the board")]
    UnknownHex {
        /// Corporation whose home was looked up.
        corporation: String,
        /// The unresolved coordinate.
        coordinate: String,
    },

    /// A floated corporation without a share price on the market.
    #[error("{0} is floated but has no share price")]
    NoSharePrice(String),

    /// A corporation without a president's share.
    #[error("{0} has no president's share")]
    NoPresidentShare(String),

    /// An unowned company whose category has no expiry rule.
    #[error("company {0} has no expiry rule for its category")]
    UnrecognizedCompanyCategory(String),
}

/// State that correct data should never produce.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A home tile without any city to release a reservation from.
    #[error("home tile on {hex} has no city to release {corporation}'s reservation from")]
    HomeTileWithoutCities {
        /// Hex identifier.
        hex: String,
        /// Corporation whose reservation was expected.
        corporation: String,
    },
}

/// Any error that aborts first stock round processing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoundError {
    /// Bad game data.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Unreachable state reached.
    #[error("invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// Result alias for round operations.
pub type RoundResult<T> = Result<T, RoundError>;
