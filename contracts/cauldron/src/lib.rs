//! Cauldron Soroban Smart Contract
//!
//! Fixed-maturity collateralized borrowing. Users lock collateral in a vault
//! and mint fyToken, a claim on the base asset at the series maturity, against
//! it. Vaults that fall below their collateralization ratio are sold off
//! through a Dutch auction.

#![no_std]
use soroban_sdk::{contract, contractimpl, log, Address, BytesN, Env, Vec};

mod accrual;
mod config;
mod error;
mod events;
mod interfaces;
mod math;
mod registry;
mod storage;
mod vault;
mod witch;

pub use accrual::{Accrual, AccrualSnapshot};
pub use config::{Config, ProtocolConfig};
pub use error::{ErrorKind, ProtocolError};
pub use events::ProtocolEvent;
pub use interfaces::{
    AccrualOracleClient, CollateralLedgerClient, FyTokenClient, PriceOracleClient,
};
pub use math::RAY;
pub use registry::{Asset, Registry, Series};
pub use vault::{Balances, PourResult, Vault, VaultModule, VaultStorage};
pub use witch::{Auction, AuctionStorage, LiquidationError, LiquidationModule};

#[contract]
pub struct Cauldron;

#[contractimpl]
impl Cauldron {
    /// Initializes the contract with its admin and collaborators
    pub fn initialize(
        env: Env,
        admin: Address,
        spot_oracle: Address,
        collateral_ledger: Address,
        auction_duration: u64,
    ) -> Result<(), ProtocolError> {
        let config = Config { admin: admin.clone(), spot_oracle, collateral_ledger, auction_duration };
        ProtocolConfig::initialize(&env, &config)?;
        log!(&env, "initialized", admin.clone(), auction_duration);
        ProtocolEvent::Initialized { admin }.emit(&env);
        Ok(())
    }

    pub fn config(env: Env) -> Result<Config, ProtocolError> {
        ProtocolConfig::load(&env)
    }

    pub fn set_admin(env: Env, caller: Address, new_admin: Address) -> Result<(), ProtocolError> {
        ProtocolConfig::set_admin(&env, &caller, &new_admin)
    }

    pub fn set_spot_oracle(env: Env, caller: Address, oracle: Address) -> Result<(), ProtocolError> {
        ProtocolConfig::set_spot_oracle(&env, &caller, &oracle)
    }

    pub fn set_auction_duration(env: Env, caller: Address, duration: u64) -> Result<(), ProtocolError> {
        ProtocolConfig::set_auction_duration(&env, &caller, duration)
    }

    // Registry

    pub fn add_asset(
        env: Env,
        caller: Address,
        asset_id: BytesN<6>,
        decimals: u32,
        rate_oracle: Option<Address>,
    ) -> Result<Asset, ProtocolError> {
        Registry::add_asset(&env, &caller, asset_id, decimals, rate_oracle)
    }

    pub fn add_series(
        env: Env,
        caller: Address,
        series_id: BytesN<6>,
        base_id: BytesN<6>,
        maturity: u64,
        fy_token: Address,
    ) -> Result<Series, ProtocolError> {
        Registry::add_series(&env, &caller, series_id, base_id, maturity, fy_token)
    }

    pub fn approve_collateral(
        env: Env,
        caller: Address,
        series_id: BytesN<6>,
        ilk_id: BytesN<6>,
        ratio: i128,
    ) -> Result<(), ProtocolError> {
        Registry::approve_collateral(&env, &caller, series_id, ilk_id, ratio)
    }

    pub fn asset(env: Env, asset_id: BytesN<6>) -> Result<Asset, ProtocolError> {
        Registry::asset(&env, &asset_id)
    }

    pub fn series(env: Env, series_id: BytesN<6>) -> Result<Series, ProtocolError> {
        Registry::series(&env, &series_id)
    }

    pub fn ratio(env: Env, series_id: BytesN<6>, ilk_id: BytesN<6>) -> Result<i128, ProtocolError> {
        Registry::ratio(&env, &series_id, &ilk_id)
    }

    pub fn is_approved(env: Env, series_id: BytesN<6>, ilk_id: BytesN<6>) -> bool {
        Registry::is_approved(&env, &series_id, &ilk_id)
    }

    // Accrual

    pub fn rate(env: Env, asset_id: BytesN<6>) -> Result<i128, ProtocolError> {
        Accrual::rate(&env, &asset_id)
    }

    pub fn mature(env: Env, series_id: BytesN<6>) -> Result<i128, ProtocolError> {
        Accrual::mature(&env, &series_id)
    }

    pub fn accrual(env: Env, series_id: BytesN<6>) -> Result<i128, ProtocolError> {
        Accrual::accrual(&env, &series_id)
    }

    pub fn snapshot(env: Env, series_id: BytesN<6>) -> Result<AccrualSnapshot, ProtocolError> {
        Accrual::snapshot(&env, &series_id)
    }

    // Vaults

    pub fn build(
        env: Env,
        owner: Address,
        series_id: BytesN<6>,
        ilk_id: BytesN<6>,
    ) -> Result<BytesN<12>, ProtocolError> {
        VaultModule::build(&env, &owner, series_id, ilk_id)
    }

    pub fn destroy(env: Env, caller: Address, vault_id: BytesN<12>) -> Result<(), ProtocolError> {
        VaultModule::destroy(&env, &caller, vault_id)
    }

    pub fn tweak(
        env: Env,
        caller: Address,
        vault_id: BytesN<12>,
        series_id: BytesN<6>,
        ilk_id: BytesN<6>,
    ) -> Result<Vault, ProtocolError> {
        VaultModule::tweak(&env, &caller, vault_id, series_id, ilk_id)
    }

    pub fn give(
        env: Env,
        caller: Address,
        vault_id: BytesN<12>,
        receiver: Address,
    ) -> Result<Vault, ProtocolError> {
        VaultModule::give(&env, &caller, vault_id, receiver)
    }

    pub fn adjust_collateral(
        env: Env,
        caller: Address,
        vault_id: BytesN<12>,
        delta_ink: i128,
    ) -> Result<Balances, ProtocolError> {
        VaultModule::adjust_collateral(&env, &caller, vault_id, delta_ink)
    }

    pub fn adjust_debt(
        env: Env,
        caller: Address,
        vault_id: BytesN<12>,
        delta_art: i128,
        delta_ink: i128,
    ) -> Result<PourResult, ProtocolError> {
        VaultModule::adjust_debt(&env, &caller, vault_id, delta_art, delta_ink)
    }

    pub fn vault(env: Env, vault_id: BytesN<12>) -> Result<Vault, ProtocolError> {
        VaultStorage::vault(&env, &vault_id)
    }

    pub fn balances(env: Env, vault_id: BytesN<12>) -> Result<Balances, ProtocolError> {
        VaultStorage::vault(&env, &vault_id)?;
        Ok(VaultStorage::balances(&env, &vault_id))
    }

    pub fn vaults_of(env: Env, owner: Address) -> Vec<BytesN<12>> {
        VaultStorage::vaults_of(&env, &owner)
    }

    pub fn debt_in_base(env: Env, vault_id: BytesN<12>) -> Result<i128, ProtocolError> {
        VaultModule::debt_in_base(&env, &vault_id)
    }

    pub fn total_debt_in_base(env: Env, ilk_id: BytesN<6>, owner: Address) -> Result<i128, ProtocolError> {
        VaultModule::total_debt_in_base(&env, &ilk_id, &owner)
    }

    pub fn level(env: Env, vault_id: BytesN<12>) -> Result<i128, ProtocolError> {
        VaultModule::level(&env, &vault_id)
    }

    // Liquidations

    pub fn grab(env: Env, vault_id: BytesN<12>) -> Result<u64, ProtocolError> {
        LiquidationModule::grab(&env, vault_id)
    }

    pub fn buy(
        env: Env,
        buyer: Address,
        vault_id: BytesN<12>,
        debt_to_cover: i128,
        min_collateral_out: i128,
    ) -> Result<i128, ProtocolError> {
        LiquidationModule::buy(&env, &buyer, vault_id, debt_to_cover, min_collateral_out)
    }

    pub fn unwind(env: Env, caller: Address, vault_id: BytesN<12>) -> Result<(), ProtocolError> {
        LiquidationModule::unwind(&env, &caller, vault_id)
    }

    pub fn timestamp(env: Env, vault_id: BytesN<12>) -> Option<u64> {
        AuctionStorage::auction(&env, &vault_id).map(|auction| auction.timestamp)
    }

    pub fn auction(env: Env, vault_id: BytesN<12>) -> Option<Auction> {
        AuctionStorage::auction(&env, &vault_id)
    }

    pub fn auction_price(env: Env, vault_id: BytesN<12>) -> Result<i128, ProtocolError> {
        LiquidationModule::auction_price(&env, &vault_id)
    }
}

mod test;
