//! Client interfaces of the contracts the engine calls into.
//!
//! Each collaborator authorizes the engine's contract address for its
//! restricted operations. The engine only ever holds the generated clients.

use soroban_sdk::{contractclient, Address, BytesN, Env};

/// Per-asset monotonic accumulator, scaled by `RAY`
#[contractclient(name = "AccrualOracleClient")]
pub trait AccrualOracle {
    fn rate(env: Env, asset_id: BytesN<6>) -> i128;
}

/// Spot price of one unit of collateral in base units, scaled by `RAY`
#[contractclient(name = "PriceOracleClient")]
pub trait PriceOracle {
    fn spot(env: Env, ilk_id: BytesN<6>) -> i128;
}

/// Custody of raw collateral
#[contractclient(name = "CollateralLedgerClient")]
pub trait CollateralLedger {
    /// Move `amount` of `asset_id` from `account` into custody
    fn join(env: Env, asset_id: BytesN<6>, account: Address, amount: i128);
    /// Release `amount` of `asset_id` from custody to `account`
    fn exit(env: Env, asset_id: BytesN<6>, account: Address, amount: i128);
}

/// Fixed-maturity debt token of a single series
#[contractclient(name = "FyTokenClient")]
pub trait FyToken {
    fn mint(env: Env, to: Address, amount: i128);
    fn burn(env: Env, from: Address, amount: i128);
}
