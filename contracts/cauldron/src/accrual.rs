//! Conversion between face-value debt and base-asset value.
//!
//! Debt is recorded as `art`, units of fyToken owed at maturity. Before
//! maturity the base value of one unit grows with the base asset's accrual
//! oracle relative to the rate seen when the series was added. At maturity the
//! rate is frozen and the debt stops growing.

use soroban_sdk::{contracttype, log, BytesN, Env};

use crate::events::ProtocolEvent;
use crate::interfaces::AccrualOracleClient;
use crate::math::{mul_div, rdiv, RAY};
use crate::registry::{Registry, Series};
use crate::storage::{bump_instance, DataKey};
use crate::ProtocolError;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccrualSnapshot {
    pub rate_at_issuance: i128,
    pub rate_at_maturity: Option<i128>,
}

pub struct Accrual;

impl Accrual {
    /// Current accumulator of `asset_id`
    pub fn rate(env: &Env, asset_id: &BytesN<6>) -> Result<i128, ProtocolError> {
        let asset = Registry::asset(env, asset_id)?;
        let rate = match asset.rate_oracle {
            Some(oracle) => AccrualOracleClient::new(env, &oracle).rate(asset_id),
            None => RAY,
        };
        if rate <= 0 {
            return Err(ProtocolError::InvalidRate);
        }
        Ok(rate)
    }

    pub(crate) fn record_issuance(env: &Env, series_id: &BytesN<6>, rate: i128) {
        let snapshot = AccrualSnapshot { rate_at_issuance: rate, rate_at_maturity: None };
        Self::persist(env, series_id, &snapshot);
    }

    pub fn snapshot(env: &Env, series_id: &BytesN<6>) -> Result<AccrualSnapshot, ProtocolError> {
        env.storage()
            .instance()
            .get(&DataKey::Accrual(series_id.clone()))
            .ok_or(ProtocolError::UnknownSeries)
    }

    pub(crate) fn persist(env: &Env, series_id: &BytesN<6>, snapshot: &AccrualSnapshot) {
        env.storage()
            .instance()
            .set(&DataKey::Accrual(series_id.clone()), snapshot);
        bump_instance(env);
    }

    /// Snapshot as it should be now.
    ///
    /// The second value is the maturity rate when this call captured it. It
    /// still has to be written with [`Accrual::commit`].
    pub(crate) fn current(env: &Env, series: &Series) -> Result<(AccrualSnapshot, Option<i128>), ProtocolError> {
        let mut snapshot = Self::snapshot(env, &series.id)?;
        if snapshot.rate_at_maturity.is_none() && env.ledger().timestamp() >= series.maturity {
            let rate = Self::rate(env, &series.base_id)?;
            snapshot.rate_at_maturity = Some(rate);
            return Ok((snapshot, Some(rate)));
        }
        Ok((snapshot, None))
    }

    /// Rate the debt of `series` is valued at under `snapshot`
    fn effective_rate(env: &Env, series: &Series, snapshot: &AccrualSnapshot) -> Result<i128, ProtocolError> {
        match snapshot.rate_at_maturity {
            Some(rate) => Ok(rate),
            None => Self::rate(env, &series.base_id),
        }
    }

    /// Base-asset value of `art` units of face-value debt
    pub fn debt_to_base(
        env: &Env,
        series: &Series,
        snapshot: &AccrualSnapshot,
        art: i128,
    ) -> Result<i128, ProtocolError> {
        if art == 0 {
            return Ok(0);
        }
        let rate = Self::effective_rate(env, series, snapshot)?;
        mul_div(env, art, rate, snapshot.rate_at_issuance)
    }

    /// Accrual factor of `series_id` in ray
    pub fn accrual(env: &Env, series_id: &BytesN<6>) -> Result<i128, ProtocolError> {
        let series = Registry::series(env, series_id)?;
        let (snapshot, _) = Self::current(env, &series)?;
        let rate = Self::effective_rate(env, &series, &snapshot)?;
        rdiv(env, rate, snapshot.rate_at_issuance)
    }

    /// Record the rate at maturity. Callable by anyone once the series has
    /// matured.
    pub fn mature(env: &Env, series_id: &BytesN<6>) -> Result<i128, ProtocolError> {
        let series = Registry::series(env, series_id)?;
        if env.ledger().timestamp() < series.maturity {
            return Err(ProtocolError::SeriesNotMature);
        }
        match Self::current(env, &series)? {
            (snapshot, Some(rate)) => {
                Self::commit(env, series_id, &snapshot, Some(rate));
                Ok(rate)
            }
            (_, None) => Err(ProtocolError::AlreadyMatured),
        }
    }

    /// Persist a snapshot returned by [`Accrual::current`] if it captured the
    /// maturity rate
    pub(crate) fn commit(env: &Env, series_id: &BytesN<6>, snapshot: &AccrualSnapshot, captured: Option<i128>) {
        if let Some(rate) = captured {
            Self::persist(env, series_id, snapshot);
            log!(env, "series matured", series_id.clone(), rate);
            ProtocolEvent::SeriesMatured { series_id: series_id.clone(), rate }.emit(env);
        }
    }
}
