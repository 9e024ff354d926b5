#![allow(missing_docs)]

//! Map hexes, tiles and cities, as far as home reservations need them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::InvariantViolation;

/// A city revenue location on a tile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    /// Corporations holding a home reservation here.
    #[serde(default)]
    pub reservations: Vec<String>,
    /// Corporations with a station token placed here.
    #[serde(default)]
    pub tokens: Vec<String>,
}

impl City {
    /// Whether `corporation` holds a reservation in this city.
    pub fn reserved_by(&self, corporation: &str) -> bool {
        self.reservations.iter().any(|sym| sym == corporation)
    }

    /// Drop the reservation for `corporation`, returning whether one was removed.
    pub fn remove_reservation(&mut self, corporation: &str) -> bool {
        match self.reservations.iter().position(|sym| sym == corporation) {
            Some(index) => {
                self.reservations.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop the token of `corporation`, returning whether one was removed.
    pub fn remove_token(&mut self, corporation: &str) -> bool {
        match self.tokens.iter().position(|sym| sym == corporation) {
            Some(index) => {
                self.tokens.remove(index);
                true
            }
            None => false,
        }
    }
}

/// The tile currently laid on a hex.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cities: Vec<City>,
}

/// A board location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hex {
    pub id: String,
    pub tile: Tile,
}

impl Hex {
    /// Release the home reservation of `corporation` on this hex's tile.
    ///
    /// The city reserved by the corporation is preferred. When no city holds
    /// such a reservation the first city is used instead, which is logged as a
    /// warning and leaves the tile unchanged. A tile without cities has nowhere
    /// to release from and fails.
    pub fn release_reservation(&mut self, corporation: &str) -> Result<(), InvariantViolation> {
        if self.tile.cities.is_empty() {
            error!(hex = %self.id, corporation, "home tile has no cities");
            return Err(InvariantViolation::HomeTileWithoutCities {
                hex: self.id.clone(),
                corporation: corporation.to_string(),
            });
        }

        let index = match self
            .tile
            .cities
            .iter()
            .position(|city| city.reserved_by(corporation))
        {
            Some(index) => index,
            None => {
                warn!(
                    hex = %self.id,
                    corporation,
                    "no city reserved for corporation, falling back to first city"
                );
                0
            }
        };
        self.tile.cities[index].remove_reservation(corporation);
        Ok(())
    }
}

/// All hexes by coordinate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Board {
    hexes: BTreeMap<String, Hex>,
}

impl Board {
    pub fn new(hexes: impl IntoIterator<Item = Hex>) -> Self {
        Self {
            hexes: hexes.into_iter().map(|hex| (hex.id.clone(), hex)).collect(),
        }
    }

    pub fn hex_by_id(&self, id: &str) -> Option<&Hex> {
        self.hexes.get(id)
    }

    pub fn hex_by_id_mut(&mut self, id: &str) -> Option<&mut Hex> {
        self.hexes.get_mut(id)
    }
}
