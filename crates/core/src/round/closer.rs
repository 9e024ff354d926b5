//! End of first stock round resolution.

use serde::Serialize;
use tracing::info;

use crate::{
    error::{ConfigurationError, RoundResult},
    game::GameState,
    models::{AbilityKind, CompanyKind},
};

/// Banner logged between the price sweep and the expiries.
pub const FINISH_BANNER: &str = "First stock round is finished - any unsold Pre-State Railways, \
    Coal Railways, and Mountain Railways are removed from the game";

/// A share price move caused by a sold out regional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceChange {
    /// Symbol of the regional that moved.
    pub corporation: String,
    /// Price before the move.
    pub from: i32,
    /// Price after the move.
    pub to: i32,
}

/// What the end of round cascade changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    /// Sold out moves in the order they were applied.
    pub price_changes: Vec<PriceChange>,
    /// Private companies closed for lack of an owner.
    pub closed_companies: Vec<String>,
    /// Pre-state and coal railways taken out of the game.
    pub closed_corporations: Vec<String>,
}

/// Runs the sold out, private company and coal railway sweeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundCloser;

impl RoundCloser {
    /// Run all sweeps in narrative order: prices, privates, coal railways.
    pub fn finish(&self, state: &mut GameState) -> RoundResult<RoundSummary> {
        let mut summary = RoundSummary::default();
        self.settle_sold_out_regionals(state, &mut summary)?;
        state.log_mut().push(FINISH_BANNER);
        self.expire_unowned_companies(state, &mut summary)?;
        self.expire_unfloated_coal_railways(state, &mut summary)?;
        info!(
            price_changes = summary.price_changes.len(),
            companies = summary.closed_companies.len(),
            corporations = summary.closed_corporations.len(),
            "first stock round finished"
        );
        Ok(summary)
    }

    /// Floated regionals that sold out move up the market, highest price first.
    pub fn settle_sold_out_regionals(
        &self,
        state: &mut GameState,
        summary: &mut RoundSummary,
    ) -> RoundResult<()> {
        let mut regionals = Vec::new();
        for corp in state.corporations() {
            if corp.is_regional() && corp.floated {
                let price = state
                    .share_price(&corp.sym)?
                    .ok_or_else(|| ConfigurationError::NoSharePrice(corp.sym.clone()))?;
                regionals.push((price, corp.sym.clone(), corp.name.clone()));
            }
        }
        regionals.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        for (_, sym, name) in regionals {
            if !state.is_sold_out(&sym)? {
                continue;
            }
            let (from, to) = state.apply_sold_out_price_movement(&sym)?;
            state.log_mut().log_share_price(&name, from, to);
            if from != to {
                summary.price_changes.push(PriceChange {
                    corporation: sym,
                    from,
                    to,
                });
            }
        }
        Ok(())
    }

    /// Close every unowned private. Pre-state control privates take their
    /// pre-state railway with them.
    pub fn expire_unowned_companies(
        &self,
        state: &mut GameState,
        summary: &mut RoundSummary,
    ) -> RoundResult<()> {
        let expiring: Vec<_> = state
            .companies()
            .iter()
            .filter(|company| company.owner.is_none() && !company.closed)
            .map(|company| (company.sym.clone(), company.name.clone(), company.kind))
            .collect();

        for (sym, name, kind) in expiring {
            match kind {
                CompanyKind::MountainRailway => {
                    state.log_mut().push(format!("Mountain Railway {name} closes"));
                }
                CompanyKind::PreStateControl => {
                    let minor = state.minor_by_id(&sym)?;
                    let (minor_sym, minor_name) = (minor.sym.clone(), minor.name.clone());
                    let state_name = state.linked_state_railway(&sym)?.name.clone();
                    state.log_mut().push(format!(
                        "Pre-Staatsbahn Railway {minor_name} closes; \
                         corresponding share in {state_name} is no longer reserved"
                    ));

                    state.remove_home_token(&minor_sym)?;
                    self.close_corporation_with_reservation_release(state, &minor_sym)?;
                    summary.closed_corporations.push(minor_sym);
                }
                CompanyKind::Other => {
                    return Err(ConfigurationError::UnrecognizedCompanyCategory(sym).into());
                }
            }
            state.close_company(&sym)?;
            summary.closed_companies.push(sym);
        }
        Ok(())
    }

    /// Close coal railways that never floated and hand their reserved
    /// presidency back to the linked regional.
    pub fn expire_unfloated_coal_railways(
        &self,
        state: &mut GameState,
        summary: &mut RoundSummary,
    ) -> RoundResult<()> {
        let expiring: Vec<_> = state
            .corporations()
            .iter()
            .filter(|corp| corp.is_coal_railway() && !corp.floated && !corp.closed)
            .map(|corp| (corp.sym.clone(), corp.name.clone()))
            .collect();

        for (sym, name) in expiring {
            let regional = state.linked_regional(&sym)?;
            let (regional_sym, regional_name) = (regional.sym.clone(), regional.name.clone());
            state.log_mut().push(format!(
                "{name} closes; {regional_name}'s presidency share is no longer reserved"
            ));

            self.close_corporation_with_reservation_release(state, &sym)?;
            summary.closed_corporations.push(sym);

            state.set_president_share_buyable(&regional_sym)?;
            state.set_floatable(&regional_sym, true)?;
            for ability in state.abilities_of(&regional_sym, AbilityKind::Base)? {
                state.remove_ability(&regional_sym, &ability)?;
            }
        }
        Ok(())
    }

    /// Release the home reservation, then close the corporation and take it
    /// out of the game.
    pub fn close_corporation_with_reservation_release(
        &self,
        state: &mut GameState,
        sym: &str,
    ) -> RoundResult<()> {
        state.release_home_reservation(sym)?;
        state.close_corporation(sym)?;
        state.mark_removed(sym)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        board::{Board, City, Hex, Tile},
        error::InvariantViolation,
        game::GameLog,
        market::{MarketPosition, StockMarket},
        models::{
            Ability, Company, CompanyOwner, Corporation, CorporationKind, Player, Share,
            ShareOwner,
        },
    };

    fn hex(id: &str, reservations: &[&str]) -> Hex {
        Hex {
            id: id.to_string(),
            tile: Tile {
                name: id.to_string(),
                cities: vec![City {
                    reservations: reservations.iter().map(|s| s.to_string()).collect(),
                    tokens: Vec::new(),
                }],
            },
        }
    }

    fn regional(sym: &str, row: usize, owners: &[ShareOwner]) -> Corporation {
        let mut corp = Corporation::new(sym, format!("Regional {sym}"), CorporationKind::Regional, "R1");
        corp.floated = true;
        corp.share_price = Some(MarketPosition { row, col: 0 });
        corp.shares = owners
            .iter()
            .enumerate()
            .map(|(i, owner)| Share {
                percent: if i == 0 { 20 } else { 10 },
                president: i == 0,
                buyable: true,
                owner: owner.clone(),
            })
            .collect();
        corp
    }

    fn player(id: &str) -> ShareOwner {
        ShareOwner::Player(id.to_string())
    }

    fn game(corporations: Vec<Corporation>, companies: Vec<Company>, hexes: Vec<Hex>) -> GameState {
        GameState::new(
            vec![Player::named("A"), Player::named("B")],
            corporations,
            companies,
            Board::new(hexes),
            StockMarket::from_rows(&[vec!["150"], vec!["130"], vec!["110"]]),
            GameLog::default(),
        )
    }

    fn minor_game(companies: Vec<Company>) -> GameState {
        let minor = Corporation::new(
            "P1",
            "Minor M1",
            CorporationKind::PreState {
                state_railway: "S1".to_string(),
            },
            "H1",
        );
        let state_railway = Corporation::new("S1", "State S1", CorporationKind::StateRailway, "S9");
        game(vec![minor, state_railway], companies, vec![hex("H1", &["P1"])])
    }

    fn minor_setup() -> GameState {
        minor_game(vec![
            Company::new("MR1", "Semmeringbahn", CompanyKind::MountainRailway),
            Company::new("P1", "Control P1", CompanyKind::PreStateControl),
        ])
    }

    fn coal_corporations() -> Vec<Corporation> {
        let mut target = regional("BK", 2, &[ShareOwner::Treasury, ShareOwner::Treasury]);
        target.floated = false;
        target.floatable = false;
        target.shares[0].buyable = false;
        target.abilities = vec![
            Ability {
                kind: AbilityKind::Base,
                description: "reserved presidency".to_string(),
            },
            Ability {
                kind: AbilityKind::Base,
                description: "no float".to_string(),
            },
            Ability {
                kind: AbilityKind::Reservation,
                description: "home".to_string(),
            },
        ];
        let coal = Corporation::new(
            "KK1",
            "Kohlenbahn 1",
            CorporationKind::CoalRailway {
                regional: "BK".to_string(),
            },
            "C1",
        );
        vec![target, coal]
    }

    fn coal_setup() -> GameState {
        game(coal_corporations(), Vec::new(), vec![hex("C1", &["KK1"])])
    }

    #[test]
    fn sold_out_regionals_move_up_in_price_order() -> anyhow::Result<()> {
        let mut state = game(
            vec![
                regional("B", 2, &[player("A"), player("B")]),
                regional("A", 2, &[player("A"), player("B")]),
                regional("C", 1, &[player("A"), ShareOwner::Market]),
            ],
            Vec::new(),
            Vec::new(),
        );
        let mut summary = RoundSummary::default();
        RoundCloser.settle_sold_out_regionals(&mut state, &mut summary)?;

        let moved: Vec<_> = summary.price_changes.iter().map(|c| c.corporation.as_str()).collect();
        assert_eq!(moved, vec!["A", "B"]);
        assert_eq!(state.share_price("A")?, Some(130));
        assert_eq!(state.share_price("C")?, Some(130));
        assert_eq!(
            state.log().messages().next(),
            Some("Regional A's share price changes from 110 G to 130 G")
        );
        Ok(())
    }

    #[test]
    fn unfloated_or_unsold_regionals_are_untouched() -> anyhow::Result<()> {
        let mut unfloated = regional("U", 2, &[player("A")]);
        unfloated.floated = false;
        let mut state = game(
            vec![unfloated, regional("P", 2, &[player("A"), ShareOwner::Treasury])],
            Vec::new(),
            Vec::new(),
        );
        let mut summary = RoundSummary::default();
        RoundCloser.settle_sold_out_regionals(&mut state, &mut summary)?;
        assert!(summary.price_changes.is_empty());
        assert_eq!(state.share_price("U")?, Some(110));
        assert_eq!(state.share_price("P")?, Some(110));
        assert!(state.log().is_empty());
        Ok(())
    }

    #[test]
    fn unowned_privates_close_with_their_minor() -> anyhow::Result<()> {
        let mut state = minor_setup();
        let summary = RoundCloser.finish(&mut state)?;

        assert!(state.company("MR1")?.closed);
        assert!(state.company("P1")?.closed);
        let minor = state.corporation("P1")?;
        assert!(minor.closed && minor.removed);
        assert!(!state.corporation("S1")?.closed);
        let city = &state.board().hex_by_id("H1").expect("hex").tile.cities[0];
        assert!(city.reservations.is_empty());
        assert_eq!(summary.closed_companies, vec!["MR1", "P1"]);
        assert_eq!(summary.closed_corporations, vec!["P1"]);

        let messages: Vec<_> = state.log().messages().collect();
        assert_eq!(
            messages,
            vec![
                FINISH_BANNER,
                "Mountain Railway Semmeringbahn closes",
                "Pre-Staatsbahn Railway Minor M1 closes; corresponding share in State S1 is no longer reserved",
            ]
        );
        Ok(())
    }

    #[test]
    fn owned_privates_survive() -> anyhow::Result<()> {
        let mut control = Company::new("P1", "Control P1", CompanyKind::PreStateControl);
        control.owner = Some(CompanyOwner::Player("A".to_string()));
        let mut state = minor_game(vec![control]);
        let mut summary = RoundSummary::default();
        RoundCloser.expire_unowned_companies(&mut state, &mut summary)?;
        assert!(summary.closed_companies.is_empty());
        assert!(!state.company("P1")?.closed);
        assert!(!state.corporation("P1")?.closed);
        Ok(())
    }

    #[test]
    fn mountain_railway_closes_without_touching_corporations() -> anyhow::Result<()> {
        let mut state = game(
            vec![regional("BK", 2, &[player("A")])],
            vec![Company::new("MR1", "Semmeringbahn", CompanyKind::MountainRailway)],
            Vec::new(),
        );
        let before = state.corporations().to_vec();
        let mut summary = RoundSummary::default();
        RoundCloser.expire_unowned_companies(&mut state, &mut summary)?;
        assert!(state.company("MR1")?.closed);
        let after = state.corporations();
        assert_eq!(before.len(), after.len());
        assert!(before
            .iter()
            .zip(after)
            .all(|(a, b)| a.closed == b.closed && a.floatable == b.floatable));
        Ok(())
    }

    #[test]
    fn unrecognized_company_category_fails() {
        let mut state = game(
            Vec::new(),
            vec![Company::new("X", "Mystery", CompanyKind::Other)],
            Vec::new(),
        );
        let err = RoundCloser.finish(&mut state).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnrecognizedCompanyCategory("X".to_string()).into()
        );
    }

    #[test]
    fn unfloated_coal_railway_unlocks_regional() -> anyhow::Result<()> {
        let mut state = coal_setup();
        let summary = RoundCloser.finish(&mut state)?;

        let coal = state.corporation("KK1")?;
        assert!(coal.closed && coal.removed);
        let target = state.corporation("BK")?;
        assert!(target.president_share().expect("president").buyable);
        assert!(target.floatable);
        assert_eq!(target.abilities_of(AbilityKind::Base).count(), 0);
        assert_eq!(target.abilities.len(), 1);
        let city = &state.board().hex_by_id("C1").expect("hex").tile.cities[0];
        assert!(city.reservations.is_empty());
        assert_eq!(summary.closed_corporations, vec!["KK1"]);
        assert_eq!(
            state.log().messages().last(),
            Some("Kohlenbahn 1 closes; Regional BK's presidency share is no longer reserved")
        );
        Ok(())
    }

    #[test]
    fn unreserved_home_city_still_closes_coal_railway() -> anyhow::Result<()> {
        let mut state = game(
            coal_corporations(),
            vec![Company::new("MR1", "Semmeringbahn", CompanyKind::MountainRailway)],
            vec![hex("C1", &["OTHER"])],
        );
        let summary = RoundCloser.finish(&mut state)?;

        assert!(state.company("MR1")?.closed);
        let coal = state.corporation("KK1")?;
        assert!(coal.closed && coal.removed);
        let target = state.corporation("BK")?;
        assert!(target.floatable);
        assert!(target.president_share().expect("president").buyable);
        let city = &state.board().hex_by_id("C1").expect("hex").tile.cities[0];
        assert!(city.reserved_by("OTHER"));
        assert_eq!(summary.closed_corporations, vec!["KK1"]);
        Ok(())
    }

    #[test]
    fn home_tile_without_cities_aborts() {
        let mut empty = hex("C1", &[]);
        empty.tile.cities.clear();
        let mut state = game(coal_corporations(), Vec::new(), vec![empty]);
        let err = RoundCloser.finish(&mut state).unwrap_err();
        assert_eq!(
            err,
            InvariantViolation::HomeTileWithoutCities {
                hex: "C1".to_string(),
                corporation: "KK1".to_string(),
            }
            .into()
        );
    }

    #[test]
    fn finish_logs_prices_then_banner_then_expiries() -> anyhow::Result<()> {
        let sold_out = regional("BK", 2, &[player("A"), player("B")]);
        let mut corporations = coal_corporations();
        let target = &mut corporations[0];
        target.sym = "CL".to_string();
        target.name = "Regional CL".to_string();
        corporations[1].kind = CorporationKind::CoalRailway {
            regional: "CL".to_string(),
        };
        corporations.push(sold_out);
        corporations.push(Corporation::new(
            "P1",
            "Minor M1",
            CorporationKind::PreState {
                state_railway: "S1".to_string(),
            },
            "H1",
        ));
        corporations.push(Corporation::new("S1", "State S1", CorporationKind::StateRailway, "S9"));
        let mut state = game(
            corporations,
            vec![Company::new("P1", "Control P1", CompanyKind::PreStateControl)],
            vec![hex("C1", &["KK1"]), hex("H1", &["P1"])],
        );

        RoundCloser.finish(&mut state)?;
        let messages: Vec<_> = state.log().messages().collect();
        assert_eq!(
            messages,
            vec![
                "Regional BK's share price changes from 110 G to 130 G",
                FINISH_BANNER,
                "Pre-Staatsbahn Railway Minor M1 closes; corresponding share in State S1 is no longer reserved",
                "Kohlenbahn 1 closes; Regional CL's presidency share is no longer reserved",
            ]
        );
        Ok(())
    }

    #[test]
    fn floated_regional_without_share_price_fails() {
        let mut unpriced = regional("BK", 2, &[player("A")]);
        unpriced.share_price = None;
        let mut state = game(vec![unpriced], Vec::new(), Vec::new());
        let err = RoundCloser.finish(&mut state).unwrap_err();
        assert_eq!(err, ConfigurationError::NoSharePrice("BK".to_string()).into());
        assert!(state.log().is_empty());
    }

    #[test]
    fn floated_coal_railway_is_kept() -> anyhow::Result<()> {
        let mut state = coal_setup();
        let mut floated = state.corporation("KK1")?.clone();
        floated.floated = true;
        let target = state.corporation("BK")?.clone();
        state = game(vec![target, floated], Vec::new(), vec![hex("C1", &["KK1"])]);

        let summary = RoundCloser.finish(&mut state)?;
        assert!(summary.closed_corporations.is_empty());
        assert!(!state.corporation("BK")?.floatable);
        Ok(())
    }

    #[test]
    fn rerunning_expiries_is_a_no_op() -> anyhow::Result<()> {
        let mut state = coal_setup();
        let mut summary = RoundSummary::default();
        RoundCloser.expire_unfloated_coal_railways(&mut state, &mut summary)?;
        let logged = state.log().len();

        let mut again = RoundSummary::default();
        RoundCloser.expire_unfloated_coal_railways(&mut state, &mut again)?;
        RoundCloser.expire_unowned_companies(&mut state, &mut again)?;
        assert_eq!(again, RoundSummary::default());
        assert_eq!(state.log().len(), logged);
        Ok(())
    }

    #[test]
    fn coal_railway_without_regional_is_a_configuration_error() {
        let coal = Corporation::new(
            "KK9",
            "Kohlenbahn 9",
            CorporationKind::CoalRailway {
                regional: "NOPE".to_string(),
            },
            "C1",
        );
        let mut state = game(vec![coal], Vec::new(), vec![hex("C1", &["KK9"])]);
        let err = RoundCloser.finish(&mut state).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingLink {
                entity: "KK9".to_string(),
                expected: "regional",
            }
            .into()
        );
    }
}
