//! Shared domain models.

use serde::{Deserialize, Serialize};

use crate::market::MarketPosition;

/// A participant in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl Player {
    /// Build a player whose display name equals its id.
    pub fn named(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
        }
    }
}

/// Category of a corporation, carrying the links the first stock round needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CorporationKind {
    /// Regional railway that may sell out during the round.
    Regional,
    /// Coal railway holding the presidency of a regional in reserve.
    CoalRailway {
        /// Symbol of the regional whose president's share it reserves.
        regional: String,
    },
    /// Pre-state (minor) railway that later merges into a state railway.
    PreState {
        /// Symbol of the state railway it merges into.
        state_railway: String,
    },
    /// State railway formed from pre-state railways.
    StateRailway,
    /// Anything else.
    Other,
}

/// Who holds a share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ShareOwner {
    /// Held by the named player.
    Player(String),
    /// Still in the corporation's treasury (initial offering).
    Treasury,
    /// In the open market pool.
    Market,
}

/// A unit of corporation equity.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub percent: u8,
    #[serde(default)]
    pub president: bool,
    #[serde(default = "default_true")]
    pub buyable: bool,
    pub owner: ShareOwner,
}

fn default_true() -> bool {
    true
}

/// Category of an ability attached to a corporation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    /// Abilities granted by the reservation on the corporation's base setup.
    Base,
    /// Home token reservation.
    Reservation,
    /// Anything else.
    Other,
}

/// A removable capability attached to a corporation.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub kind: AbilityKind,
    #[serde(default)]
    pub description: String,
}

/// A station token. `hex` is set once it is placed on the board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Hex the token sits on.
    #[serde(default)]
    pub hex: Option<String>,
}

/// A tradeable company.
#[allow(missing_docs)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corporation {
    pub sym: String,
    pub name: String,
    pub kind: CorporationKind,
    #[serde(default)]
    pub floated: bool,
    #[serde(default = "default_true")]
    pub floatable: bool,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub removed: bool,
    #[serde(default)]
    pub share_price: Option<MarketPosition>,
    pub coordinates: String,
    #[serde(default)]
    pub shares: Vec<Share>,
    #[serde(default)]
    pub abilities: Vec<Ability>,
    #[serde(default)]
    pub tokens: Vec<Token>,
}

impl Corporation {
    /// Build an unfloated corporation with no shares, abilities or tokens.
    pub fn new(
        sym: impl Into<String>,
        name: impl Into<String>,
        kind: CorporationKind,
        coordinates: impl Into<String>,
    ) -> Self {
        Self {
            sym: sym.into(),
            name: name.into(),
            kind,
            floated: false,
            floatable: true,
            closed: false,
            removed: false,
            share_price: None,
            coordinates: coordinates.into(),
            shares: Vec::new(),
            abilities: Vec::new(),
            tokens: Vec::new(),
        }
    }

    /// Regional railway.
    pub fn is_regional(&self) -> bool {
        matches!(self.kind, CorporationKind::Regional)
    }

    /// Coal railway.
    pub fn is_coal_railway(&self) -> bool {
        matches!(self.kind, CorporationKind::CoalRailway { .. })
    }

    /// Pre-state (minor) railway.
    pub fn is_pre_state(&self) -> bool {
        matches!(self.kind, CorporationKind::PreState { .. })
    }

    /// The president's share, reserved or not.
    pub fn president_share(&self) -> Option<&Share> {
        self.shares.iter().find(|share| share.president)
    }

    /// Abilities of the given category currently held.
    pub fn abilities_of(&self, kind: AbilityKind) -> impl Iterator<Item = &Ability> {
        self.abilities.iter().filter(move |ability| ability.kind == kind)
    }
}

/// Category of a private company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyKind {
    /// Closes without side effects when unsold.
    MountainRailway,
    /// Controls the pre-state railway sharing its symbol.
    PreStateControl,
    /// No expiry rule; an unowned one aborts the round.
    Other,
}

/// Holder of a private company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum CompanyOwner {
    #[allow(missing_docs)]
    Player(String),
    #[allow(missing_docs)]
    Corporation(String),
}

/// A private company.
#[allow(missing_docs)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub sym: String,
    pub name: String,
    pub kind: CompanyKind,
    #[serde(default)]
    pub owner: Option<CompanyOwner>,
    #[serde(default)]
    pub closed: bool,
}

impl Company {
    /// Build an unowned, open company.
    pub fn new(sym: impl Into<String>, name: impl Into<String>, kind: CompanyKind) -> Self {
        Self {
            sym: sym.into(),
            name: name.into(),
            kind,
            owner: None,
            closed: false,
        }
    }
}
