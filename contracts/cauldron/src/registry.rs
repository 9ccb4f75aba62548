use soroban_sdk::{contracttype, log, Address, BytesN, Env};

use crate::accrual::Accrual;
use crate::config::ProtocolConfig;
use crate::events::ProtocolEvent;
use crate::storage::{bump_instance, DataKey};
use crate::ProtocolError;

/// A registered token, usable as base or as collateral
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Asset {
    pub id: BytesN<6>,
    pub decimals: u32,
    /// Accrual oracle for the asset when used as base. `None` means the
    /// accumulator stays at `RAY`.
    pub rate_oracle: Option<Address>,
}

/// A fixed-maturity borrowing market over one base asset
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Series {
    pub id: BytesN<6>,
    pub base_id: BytesN<6>,
    pub maturity: u64,
    pub fy_token: Address,
}

/// Assets, series and the collateral approved for each series
pub struct Registry;

impl Registry {
    pub fn add_asset(
        env: &Env,
        caller: &Address,
        id: BytesN<6>,
        decimals: u32,
        rate_oracle: Option<Address>,
    ) -> Result<Asset, ProtocolError> {
        ProtocolConfig::require_admin(env, caller)?;
        let key = DataKey::Asset(id.clone());
        if env.storage().instance().has(&key) {
            return Err(ProtocolError::DuplicateAsset);
        }

        let asset = Asset { id: id.clone(), decimals, rate_oracle };
        env.storage().instance().set(&key, &asset);
        bump_instance(env);

        log!(env, "asset added", id, decimals);
        ProtocolEvent::AssetAdded { asset_id: id, decimals }.emit(env);
        Ok(asset)
    }

    pub fn add_series(
        env: &Env,
        caller: &Address,
        id: BytesN<6>,
        base_id: BytesN<6>,
        maturity: u64,
        fy_token: Address,
    ) -> Result<Series, ProtocolError> {
        ProtocolConfig::require_admin(env, caller)?;
        Self::asset(env, &base_id)?;
        let key = DataKey::Series(id.clone());
        if env.storage().instance().has(&key) {
            return Err(ProtocolError::DuplicateSeries);
        }
        if maturity <= env.ledger().timestamp() {
            return Err(ProtocolError::InvalidMaturity);
        }

        let rate_at_issuance = Accrual::rate(env, &base_id)?;
        let series = Series { id: id.clone(), base_id: base_id.clone(), maturity, fy_token };
        env.storage().instance().set(&key, &series);
        Accrual::record_issuance(env, &id, rate_at_issuance);
        bump_instance(env);

        log!(env, "series added", id, maturity, rate_at_issuance);
        ProtocolEvent::SeriesAdded { series_id: id, base_id, maturity }.emit(env);
        Ok(series)
    }

    /// Approve `ilk_id` as collateral for `series_id` at `ratio` (ray).
    ///
    /// An existing approval can be replaced only while no vault uses the pair.
    pub fn approve_collateral(
        env: &Env,
        caller: &Address,
        series_id: BytesN<6>,
        ilk_id: BytesN<6>,
        ratio: i128,
    ) -> Result<(), ProtocolError> {
        ProtocolConfig::require_admin(env, caller)?;
        Self::series(env, &series_id)?;
        Self::asset(env, &ilk_id)?;
        if ratio <= 0 {
            return Err(ProtocolError::InvalidRatio);
        }
        if Self::pair_usage(env, &series_id, &ilk_id) > 0 {
            return Err(ProtocolError::ApprovalInUse);
        }

        env.storage()
            .instance()
            .set(&DataKey::Approval(series_id.clone(), ilk_id.clone()), &ratio);
        bump_instance(env);

        log!(env, "collateral approved", series_id, ilk_id, ratio);
        ProtocolEvent::IlkApproved { series_id, ilk_id, ratio }.emit(env);
        Ok(())
    }

    pub fn asset(env: &Env, id: &BytesN<6>) -> Result<Asset, ProtocolError> {
        env.storage()
            .instance()
            .get(&DataKey::Asset(id.clone()))
            .ok_or(ProtocolError::UnknownAsset)
    }

    pub fn series(env: &Env, id: &BytesN<6>) -> Result<Series, ProtocolError> {
        env.storage()
            .instance()
            .get(&DataKey::Series(id.clone()))
            .ok_or(ProtocolError::UnknownSeries)
    }

    pub fn ratio(env: &Env, series_id: &BytesN<6>, ilk_id: &BytesN<6>) -> Result<i128, ProtocolError> {
        env.storage()
            .instance()
            .get(&DataKey::Approval(series_id.clone(), ilk_id.clone()))
            .ok_or(ProtocolError::IlkNotApproved)
    }

    pub fn is_approved(env: &Env, series_id: &BytesN<6>, ilk_id: &BytesN<6>) -> bool {
        env.storage()
            .instance()
            .has(&DataKey::Approval(series_id.clone(), ilk_id.clone()))
    }

    /// Number of live vaults holding the pair
    pub fn pair_usage(env: &Env, series_id: &BytesN<6>, ilk_id: &BytesN<6>) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::PairUsage(series_id.clone(), ilk_id.clone()))
            .unwrap_or(0)
    }

    pub(crate) fn use_pair(env: &Env, series_id: &BytesN<6>, ilk_id: &BytesN<6>) {
        let usage = Self::pair_usage(env, series_id, ilk_id);
        env.storage().instance().set(
            &DataKey::PairUsage(series_id.clone(), ilk_id.clone()),
            &usage.saturating_add(1),
        );
    }

    pub(crate) fn release_pair(env: &Env, series_id: &BytesN<6>, ilk_id: &BytesN<6>) {
        let key = DataKey::PairUsage(series_id.clone(), ilk_id.clone());
        match Self::pair_usage(env, series_id, ilk_id) {
            0 | 1 => env.storage().instance().remove(&key),
            usage => env.storage().instance().set(&key, &(usage - 1)),
        }
    }
}
