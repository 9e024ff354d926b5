//! Game state context shared by the round components.
//!
//! All mutation of corporations, companies and the board during the first
//! stock round goes through the methods on [`GameState`], which keeps the
//! effects of the end-of-round cascade in one auditable place.

pub mod log;

use tracing::{debug, info};

use crate::{
    board::{Board, Hex},
    error::{ConfigurationError, RoundResult},
    market::StockMarket,
    models::{Ability, AbilityKind, Company, Corporation, CorporationKind, Player, ShareOwner},
};

pub use log::{GameLog, LogEntry};

/// Central game state: roster, entities, board, market and log.
#[derive(Debug, Clone)]
pub struct GameState {
    players: Vec<Player>,
    corporations: Vec<Corporation>,
    companies: Vec<Company>,
    board: Board,
    market: StockMarket,
    log: GameLog,
}

impl GameState {
    /// Assemble a game state. `players` must be in priority order.
    pub fn new(
        players: Vec<Player>,
        corporations: Vec<Corporation>,
        companies: Vec<Company>,
        board: Board,
        market: StockMarket,
        log: GameLog,
    ) -> Self {
        Self {
            players,
            corporations,
            companies,
            board,
            market,
            log,
        }
    }

    /// Players in priority order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// All corporations, including closed ones.
    pub fn corporations(&self) -> &[Corporation] {
        &self.corporations
    }

    /// Private companies, including closed ones.
    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    /// The map.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// User-visible game log.
    pub fn log(&self) -> &GameLog {
        &self.log
    }

    /// Mutable access to the game log.
    pub fn log_mut(&mut self) -> &mut GameLog {
        &mut self.log
    }

    /// Corporation by symbol.
    pub fn corporation(&self, sym: &str) -> Result<&Corporation, ConfigurationError> {
        self.corporations
            .iter()
            .find(|corp| corp.sym == sym)
            .ok_or_else(|| ConfigurationError::UnknownCorporation(sym.to_string()))
    }

    fn corporation_mut(&mut self, sym: &str) -> Result<&mut Corporation, ConfigurationError> {
        self.corporations
            .iter_mut()
            .find(|corp| corp.sym == sym)
            .ok_or_else(|| ConfigurationError::UnknownCorporation(sym.to_string()))
    }

    /// Private company by symbol.
    pub fn company(&self, sym: &str) -> Result<&Company, ConfigurationError> {
        self.companies
            .iter()
            .find(|company| company.sym == sym)
            .ok_or_else(|| ConfigurationError::UnknownCompany(sym.to_string()))
    }

    /// The pre-state railway controlled by the company with the same symbol.
    pub fn minor_by_id(&self, id: &str) -> Result<&Corporation, ConfigurationError> {
        let minor = self
            .corporations
            .iter()
            .find(|corp| corp.sym == id)
            .ok_or_else(|| ConfigurationError::MissingLink {
                entity: id.to_string(),
                expected: "pre-state railway",
            })?;
        if !minor.is_pre_state() {
            return Err(ConfigurationError::WrongLinkKind {
                entity: id.to_string(),
                target: minor.sym.clone(),
                expected: "pre-state railway",
            });
        }
        Ok(minor)
    }

    /// The state railway a pre-state railway (or its control company) merges into.
    pub fn linked_state_railway(&self, id: &str) -> Result<&Corporation, ConfigurationError> {
        let minor = self.minor_by_id(id)?;
        let CorporationKind::PreState { state_railway } = &minor.kind else {
            return Err(ConfigurationError::MissingLink {
                entity: id.to_string(),
                expected: "state railway",
            });
        };
        let state = self
            .corporations
            .iter()
            .find(|corp| &corp.sym == state_railway)
            .ok_or_else(|| ConfigurationError::MissingLink {
                entity: minor.sym.clone(),
                expected: "state railway",
            })?;
        if state.kind != CorporationKind::StateRailway {
            return Err(ConfigurationError::WrongLinkKind {
                entity: minor.sym.clone(),
                target: state.sym.clone(),
                expected: "state railway",
            });
        }
        Ok(state)
    }

    /// The regional whose presidency a coal railway holds in reserve.
    pub fn linked_regional(&self, coal_railway: &str) -> Result<&Corporation, ConfigurationError> {
        let coal = self.corporation(coal_railway)?;
        let CorporationKind::CoalRailway { regional } = &coal.kind else {
            return Err(ConfigurationError::MissingLink {
                entity: coal.sym.clone(),
                expected: "regional",
            });
        };
        let linked = self
            .corporations
            .iter()
            .find(|corp| &corp.sym == regional)
            .ok_or_else(|| ConfigurationError::MissingLink {
                entity: coal.sym.clone(),
                expected: "regional",
            })?;
        if !linked.is_regional() {
            return Err(ConfigurationError::WrongLinkKind {
                entity: coal.sym.clone(),
                target: linked.sym.clone(),
                expected: "regional",
            });
        }
        Ok(linked)
    }

    /// Hex at the home coordinate of `corporation`.
    pub fn home_hex(&self, corporation: &str) -> Result<&Hex, ConfigurationError> {
        let corp = self.corporation(corporation)?;
        self.board
            .hex_by_id(&corp.coordinates)
            .ok_or_else(|| ConfigurationError::UnknownHex {
                corporation: corp.sym.clone(),
                coordinate: corp.coordinates.clone(),
            })
    }

    /// Every share is held by a player; none left in treasury or market.
    pub fn is_sold_out(&self, sym: &str) -> Result<bool, ConfigurationError> {
        let corp = self.corporation(sym)?;
        Ok(!corp.shares.is_empty()
            && corp
                .shares
                .iter()
                .all(|share| matches!(share.owner, ShareOwner::Player(_))))
    }

    /// Current share price, if the corporation has a market position.
    pub fn share_price(&self, sym: &str) -> Result<Option<i32>, ConfigurationError> {
        let corp = self.corporation(sym)?;
        Ok(corp
            .share_price
            .and_then(|position| self.market.price(position)))
    }

    /// Move a sold out corporation up the market. Returns `(before, after)` prices.
    ///
    /// The corporation must have a share price on the market.
    pub fn apply_sold_out_price_movement(
        &mut self,
        sym: &str,
    ) -> Result<(i32, i32), ConfigurationError> {
        let market = &self.market;
        let corp = self
            .corporations
            .iter_mut()
            .find(|corp| corp.sym == sym)
            .ok_or_else(|| ConfigurationError::UnknownCorporation(sym.to_string()))?;
        let missing = || ConfigurationError::NoSharePrice(sym.to_string());
        let position = corp.share_price.ok_or_else(missing)?;
        let before = market.price(position).ok_or_else(missing)?;
        let moved = market.sold_out_move(position);
        let after = market.price(moved).ok_or_else(missing)?;
        corp.share_price = Some(moved);
        debug!(corporation = sym, ?before, ?after, "sold out price movement");
        Ok((before, after))
    }

    /// Release the home city reservation of `corporation`.
    pub fn release_home_reservation(&mut self, corporation: &str) -> RoundResult<()> {
        let hex_id = self.home_hex(corporation)?.id.clone();
        let hex = self
            .board
            .hex_by_id_mut(&hex_id)
            .ok_or_else(|| ConfigurationError::UnknownHex {
                corporation: corporation.to_string(),
                coordinate: hex_id.clone(),
            })?;
        hex.release_reservation(corporation)?;
        debug!(corporation, hex = %hex_id, "home reservation released");
        Ok(())
    }

    /// Pull the corporation's first token back off the board, if it was placed.
    pub fn remove_home_token(&mut self, corporation: &str) -> Result<(), ConfigurationError> {
        let corp = self.corporation_mut(corporation)?;
        let Some(hex_id) = corp.tokens.first_mut().and_then(|token| token.hex.take()) else {
            return Ok(());
        };
        if let Some(hex) = self.board.hex_by_id_mut(&hex_id) {
            for city in &mut hex.tile.cities {
                if city.remove_token(corporation) {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Mark a corporation closed.
    pub fn close_corporation(&mut self, sym: &str) -> Result<(), ConfigurationError> {
        self.corporation_mut(sym)?.closed = true;
        info!(corporation = sym, "corporation closed");
        Ok(())
    }

    /// Flag a closed corporation as taken out of the game.
    pub fn mark_removed(&mut self, sym: &str) -> Result<(), ConfigurationError> {
        self.corporation_mut(sym)?.removed = true;
        Ok(())
    }

    /// Mark a private company closed.
    pub fn close_company(&mut self, sym: &str) -> Result<(), ConfigurationError> {
        let company = self
            .companies
            .iter_mut()
            .find(|company| company.sym == sym)
            .ok_or_else(|| ConfigurationError::UnknownCompany(sym.to_string()))?;
        company.closed = true;
        info!(company = sym, "company closed");
        Ok(())
    }

    /// Unreserve the president's share so it can be bought.
    pub fn set_president_share_buyable(&mut self, sym: &str) -> Result<(), ConfigurationError> {
        let corp = self.corporation_mut(sym)?;
        let share = corp
            .shares
            .iter_mut()
            .find(|share| share.president)
            .ok_or_else(|| ConfigurationError::NoPresidentShare(sym.to_string()))?;
        share.buyable = true;
        Ok(())
    }

    /// Allow or forbid the corporation to float.
    pub fn set_floatable(&mut self, sym: &str, floatable: bool) -> Result<(), ConfigurationError> {
        self.corporation_mut(sym)?.floatable = floatable;
        Ok(())
    }

    /// Snapshot of the abilities of one category held by a corporation.
    pub fn abilities_of(
        &self,
        sym: &str,
        kind: AbilityKind,
    ) -> Result<Vec<Ability>, ConfigurationError> {
        Ok(self.corporation(sym)?.abilities_of(kind).cloned().collect())
    }

    /// Remove one matching ability. Returns whether anything was removed.
    pub fn remove_ability(&mut self, sym: &str, ability: &Ability) -> Result<bool, ConfigurationError> {
        let corp = self.corporation_mut(sym)?;
        match corp.abilities.iter().position(|held| held == ability) {
            Some(index) => {
                corp.abilities.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
