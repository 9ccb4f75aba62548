//! Liquidation of undercollateralized vaults
//!
//! `grab` marks a vault and starts a Dutch auction over its collateral. Buyers
//! repay face-value debt with fyToken and receive collateral at a rate that
//! starts at half of `ink / art` and rises linearly to all of it once the
//! auction duration has elapsed. Every buy is priced against the collateral
//! and debt the vault held when it was grabbed.

use soroban_sdk::{contracterror, contracttype, log, Address, BytesN, Env};

use crate::accrual::Accrual;
use crate::config::ProtocolConfig;
use crate::events::ProtocolEvent;
use crate::interfaces::{CollateralLedgerClient, FyTokenClient};
use crate::math::{mul_div, mul_div_up, RAY};
use crate::registry::Registry;
use crate::storage::{bump_persistent, DataKey};
use crate::vault::{Balances, VaultModule, VaultStorage};
use crate::ProtocolError;

/// Liquidation-specific errors
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum LiquidationError {
    VaultNotFound = 5001,
    NotUndercollateralized = 5002,
    AlreadyTimestamped = 5003,
    NotTimestamped = 5004,
    NothingToBuy = 5005,
    InvalidAmount = 5006,
    SlippageExceeded = 5007,
}

impl From<LiquidationError> for ProtocolError {
    fn from(err: LiquidationError) -> Self {
        match err {
            LiquidationError::VaultNotFound => ProtocolError::VaultNotFound,
            LiquidationError::NotUndercollateralized => ProtocolError::NotUndercollateralized,
            LiquidationError::AlreadyTimestamped => ProtocolError::AlreadyTimestamped,
            LiquidationError::NotTimestamped => ProtocolError::NotTimestamped,
            LiquidationError::NothingToBuy => ProtocolError::NothingToBuy,
            LiquidationError::InvalidAmount => ProtocolError::InvalidAmount,
            LiquidationError::SlippageExceeded => ProtocolError::SlippageExceeded,
        }
    }
}

/// Liquidation mark of a vault with the balances it was grabbed at
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Auction {
    pub timestamp: u64,
    pub ink: i128,
    pub art: i128,
}

pub struct AuctionStorage;

impl AuctionStorage {
    pub fn auction(env: &Env, vault_id: &BytesN<12>) -> Option<Auction> {
        env.storage()
            .persistent()
            .get(&DataKey::Auction(vault_id.clone()))
    }

    fn save(env: &Env, vault_id: &BytesN<12>, auction: &Auction) {
        let key = DataKey::Auction(vault_id.clone());
        env.storage().persistent().set(&key, auction);
        bump_persistent(env, &key);
    }

    fn clear(env: &Env, vault_id: &BytesN<12>) {
        env.storage()
            .persistent()
            .remove(&DataKey::Auction(vault_id.clone()));
    }
}

pub struct LiquidationModule;

impl LiquidationModule {
    /// Mark an undercollateralized vault for auction. Anyone may call.
    pub fn grab(env: &Env, vault_id: BytesN<12>) -> Result<u64, ProtocolError> {
        let config = ProtocolConfig::load(env)?;
        let vault = VaultStorage::vault(env, &vault_id).map_err(|_| LiquidationError::VaultNotFound)?;
        if AuctionStorage::auction(env, &vault_id).is_some() {
            return Err(LiquidationError::AlreadyTimestamped.into());
        }

        let balances = VaultStorage::balances(env, &vault_id);
        if balances.art == 0 {
            return Err(LiquidationError::NotUndercollateralized.into());
        }
        let series = Registry::series(env, &vault.series_id)?;
        let (snapshot, captured) = Accrual::current(env, &series)?;
        let level = VaultModule::level_of(env, &config, &vault, &series, &snapshot, balances.ink, balances.art)?;
        if level >= 0 {
            return Err(LiquidationError::NotUndercollateralized.into());
        }

        let now = env.ledger().timestamp();
        let auction = Auction { timestamp: now, ink: balances.ink, art: balances.art };
        AuctionStorage::save(env, &vault_id, &auction);
        Accrual::commit(env, &series.id, &snapshot, captured);

        log!(env, "vault grabbed", vault_id.clone(), level);
        ProtocolEvent::VaultTimestamped { vault_id, timestamp: now }.emit(env);
        Ok(now)
    }

    /// Repay up to `debt_to_cover` face-value debt of a marked vault and take
    /// collateral at the current auction price.
    pub fn buy(
        env: &Env,
        buyer: &Address,
        vault_id: BytesN<12>,
        debt_to_cover: i128,
        min_collateral_out: i128,
    ) -> Result<i128, ProtocolError> {
        buyer.require_auth();
        let config = ProtocolConfig::load(env)?;
        let auction = AuctionStorage::auction(env, &vault_id).ok_or(LiquidationError::NothingToBuy)?;
        let vault = VaultStorage::vault(env, &vault_id).map_err(|_| LiquidationError::NothingToBuy)?;
        let balances = VaultStorage::balances(env, &vault_id);
        if balances.art == 0 {
            return Err(LiquidationError::NothingToBuy.into());
        }
        if debt_to_cover <= 0 {
            return Err(LiquidationError::InvalidAmount.into());
        }

        let covered = debt_to_cover.min(balances.art);
        let elapsed = Self::elapsed(env, auction.timestamp, config.auction_duration);
        let factor = Self::price_factor(elapsed, config.auction_duration);
        let collateral_out = Self::collateral_out(env, &auction, &balances, covered, factor)?;
        if collateral_out < min_collateral_out {
            return Err(LiquidationError::SlippageExceeded.into());
        }
        let series = Registry::series(env, &vault.series_id)?;

        FyTokenClient::new(env, &series.fy_token).burn(buyer, &covered);
        if collateral_out > 0 {
            CollateralLedgerClient::new(env, &config.collateral_ledger).exit(
                &vault.ilk_id,
                buyer,
                &collateral_out,
            );
        }

        let remaining = Balances {
            ink: balances.ink - collateral_out,
            art: balances.art - covered,
        };
        VaultStorage::save_balances(env, &vault_id, &remaining);
        if remaining.art == 0 {
            AuctionStorage::clear(env, &vault_id);
        }

        log!(env, "vault bought", vault_id.clone(), collateral_out, covered);
        ProtocolEvent::Bought { vault_id, buyer: buyer.clone(), ink: collateral_out, art: covered }.emit(env);
        Ok(collateral_out)
    }

    /// Drop the liquidation mark of a vault. Admin only.
    pub fn unwind(env: &Env, caller: &Address, vault_id: BytesN<12>) -> Result<(), ProtocolError> {
        ProtocolConfig::require_admin(env, caller)?;
        if AuctionStorage::auction(env, &vault_id).is_none() {
            return Err(LiquidationError::NotTimestamped.into());
        }
        AuctionStorage::clear(env, &vault_id);

        log!(env, "vault unwound", vault_id.clone());
        ProtocolEvent::Unwound { vault_id }.emit(env);
        Ok(())
    }

    /// Current price factor of a marked vault in ray
    pub fn auction_price(env: &Env, vault_id: &BytesN<12>) -> Result<i128, ProtocolError> {
        let config = ProtocolConfig::load(env)?;
        let auction = AuctionStorage::auction(env, vault_id).ok_or(LiquidationError::NotTimestamped)?;
        let elapsed = Self::elapsed(env, auction.timestamp, config.auction_duration);
        Ok(Self::price_factor(elapsed, config.auction_duration))
    }

    fn elapsed(env: &Env, mark: u64, duration: u64) -> u64 {
        env.ledger().timestamp().saturating_sub(mark).min(duration)
    }

    /// `RAY / 2 + elapsed * RAY / (2 * duration)`, so half of `ink / art` at
    /// the start and all of it once `elapsed == duration`.
    pub fn price_factor(elapsed: u64, duration: u64) -> i128 {
        if duration == 0 {
            return RAY;
        }
        let elapsed = elapsed.min(duration) as i128;
        let duration = duration as i128;
        let rise = elapsed
            .checked_mul(RAY / 2)
            .map(|scaled| scaled / duration)
            .unwrap_or((RAY / 2) / duration * elapsed);
        RAY / 2 + rise
    }

    /// Collateral paid for `covered` debt at `factor`.
    ///
    /// The rate is `auction.ink / auction.art * factor`, fixed at grab time.
    /// The payout is the rounded-up price of all debt bought so far minus the
    /// rounded-up price of what was bought before, so a purchase split into
    /// pieces at one price pays the same as a single purchase. Capped at the
    /// remaining `ink`, and a buy that clears the debt at full price takes all
    /// of it.
    pub fn collateral_out(
        env: &Env,
        auction: &Auction,
        balances: &Balances,
        covered: i128,
        factor: i128,
    ) -> Result<i128, ProtocolError> {
        if balances.art <= 0 || auction.art <= 0 {
            return Ok(0);
        }
        if covered == balances.art && factor >= RAY {
            return Ok(balances.ink);
        }
        let per_art = mul_div(env, auction.ink, factor, auction.art)?;
        let bought = (auction.art - balances.art).max(0);
        let before = mul_div_up(env, bought, per_art, RAY)?;
        let after = mul_div_up(env, bought + covered, per_art, RAY)?;
        Ok((after - before).min(balances.ink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_factor_curve() {
        assert_eq!(LiquidationModule::price_factor(0, 3600), RAY / 2);
        assert_eq!(LiquidationModule::price_factor(1800, 3600), RAY * 3 / 4);
        assert_eq!(LiquidationModule::price_factor(3600, 3600), RAY);
        assert_eq!(LiquidationModule::price_factor(7200, 3600), RAY);

        let mut last = 0;
        for elapsed in [0u64, 1, 59, 600, 1799, 3599, 3600] {
            let factor = LiquidationModule::price_factor(elapsed, 3600);
            assert!(factor >= last);
            last = factor;
        }
    }

    #[test]
    fn test_collateral_out_rounds_up_and_caps() {
        let env = Env::default();
        let auction = Auction { timestamp: 0, ink: 100, art: 30 };
        let balances = Balances { ink: 100, art: 30 };

        // 10 * 100 / 30 * 0.5 = 16.67
        assert_eq!(
            LiquidationModule::collateral_out(&env, &auction, &balances, 10, RAY / 2).unwrap(),
            17
        );
        assert_eq!(LiquidationModule::collateral_out(&env, &auction, &balances, 30, RAY / 2).unwrap(), 50);
        assert_eq!(LiquidationModule::collateral_out(&env, &auction, &balances, 30, RAY).unwrap(), 100);

        let drained = Balances { ink: 5, art: 20 };
        assert_eq!(LiquidationModule::collateral_out(&env, &auction, &drained, 20, RAY / 2).unwrap(), 5);
    }

    #[test]
    fn test_collateral_out_prices_against_auction_start() {
        let env = Env::default();
        let auction = Auction { timestamp: 0, ink: 100, art: 30 };

        // 17 already paid for the first 10, the next 10 cost ceil(33.33) - 17
        let balances = Balances { ink: 83, art: 20 };
        assert_eq!(
            LiquidationModule::collateral_out(&env, &auction, &balances, 10, RAY / 2).unwrap(),
            17
        );

        let mut balances = Balances { ink: 100, art: 30 };
        let mut total = 0;
        while balances.art > 0 {
            let out = LiquidationModule::collateral_out(&env, &auction, &balances, 1, RAY / 2).unwrap();
            total += out;
            balances = Balances { ink: balances.ink - out, art: balances.art - 1 };
        }
        assert_eq!(total, 50);
    }
}
