use soroban_sdk::{contracttype, log, xdr::ToXdr, Address, Bytes, BytesN, Env, Vec};

use crate::accrual::{Accrual, AccrualSnapshot};
use crate::config::{Config, ProtocolConfig};
use crate::events::ProtocolEvent;
use crate::interfaces::{CollateralLedgerClient, FyTokenClient, PriceOracleClient};
use crate::math::rmul;
use crate::registry::{Registry, Series};
use crate::storage::{bump_instance, bump_persistent, DataKey};
use crate::witch::AuctionStorage;
use crate::ProtocolError;

/// A collateralized debt position
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Vault {
    pub owner: Address,
    pub series_id: BytesN<6>,
    pub ilk_id: BytesN<6>,
}

/// Collateral (`ink`) and face-value debt (`art`) held by a vault
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Balances {
    pub ink: i128,
    pub art: i128,
}

impl Balances {
    pub fn empty() -> Self {
        Self { ink: 0, art: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.ink == 0 && self.art == 0
    }
}

/// Deltas actually applied by a balance change
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PourResult {
    pub ink: i128,
    pub art: i128,
}

pub struct VaultStorage;

impl VaultStorage {
    pub fn vault(env: &Env, vault_id: &BytesN<12>) -> Result<Vault, ProtocolError> {
        env.storage()
            .persistent()
            .get(&DataKey::Vault(vault_id.clone()))
            .ok_or(ProtocolError::VaultNotFound)
    }

    fn save_vault(env: &Env, vault_id: &BytesN<12>, vault: &Vault) {
        let key = DataKey::Vault(vault_id.clone());
        env.storage().persistent().set(&key, vault);
        bump_persistent(env, &key);
    }

    pub fn balances(env: &Env, vault_id: &BytesN<12>) -> Balances {
        env.storage()
            .persistent()
            .get(&DataKey::Balances(vault_id.clone()))
            .unwrap_or(Balances::empty())
    }

    pub(crate) fn save_balances(env: &Env, vault_id: &BytesN<12>, balances: &Balances) {
        let key = DataKey::Balances(vault_id.clone());
        env.storage().persistent().set(&key, balances);
        bump_persistent(env, &key);
    }

    pub fn vaults_of(env: &Env, owner: &Address) -> Vec<BytesN<12>> {
        env.storage()
            .persistent()
            .get(&DataKey::OwnerVaults(owner.clone()))
            .unwrap_or(Vec::new(env))
    }

    fn add_to_owner(env: &Env, owner: &Address, vault_id: &BytesN<12>) {
        let key = DataKey::OwnerVaults(owner.clone());
        let mut ids = Self::vaults_of(env, owner);
        ids.push_back(vault_id.clone());
        env.storage().persistent().set(&key, &ids);
        bump_persistent(env, &key);
    }

    fn remove_from_owner(env: &Env, owner: &Address, vault_id: &BytesN<12>) {
        let key = DataKey::OwnerVaults(owner.clone());
        let mut ids = Vec::new(env);
        for id in Self::vaults_of(env, owner).iter() {
            if &id != vault_id {
                ids.push_back(id);
            }
        }
        if ids.is_empty() {
            env.storage().persistent().remove(&key);
        } else {
            env.storage().persistent().set(&key, &ids);
            bump_persistent(env, &key);
        }
    }

    /// First 12 bytes of sha256(nonce | series | ilk | owner)
    fn next_id(env: &Env, owner: &Address, series_id: &BytesN<6>, ilk_id: &BytesN<6>) -> BytesN<12> {
        let mut nonce: u64 = env
            .storage()
            .instance()
            .get(&DataKey::VaultNonce)
            .unwrap_or(0);
        loop {
            let mut salt = Bytes::from_slice(env, &nonce.to_be_bytes());
            salt.append(&Bytes::from(series_id.clone()));
            salt.append(&Bytes::from(ilk_id.clone()));
            salt.append(&owner.clone().to_xdr(env));
            let digest = env.crypto().sha256(&salt).to_bytes().to_array();
            nonce += 1;

            let mut id = [0u8; 12];
            id.copy_from_slice(&digest[..12]);
            let vault_id = BytesN::from_array(env, &id);
            if !env.storage().persistent().has(&DataKey::Vault(vault_id.clone())) {
                env.storage().instance().set(&DataKey::VaultNonce, &nonce);
                bump_instance(env);
                return vault_id;
            }
        }
    }
}

/// Vault lifecycle and balance accounting
pub struct VaultModule;

impl VaultModule {
    pub fn build(
        env: &Env,
        owner: &Address,
        series_id: BytesN<6>,
        ilk_id: BytesN<6>,
    ) -> Result<BytesN<12>, ProtocolError> {
        owner.require_auth();
        ProtocolConfig::load(env)?;
        Registry::series(env, &series_id)?;
        Registry::ratio(env, &series_id, &ilk_id)?;

        let vault_id = VaultStorage::next_id(env, owner, &series_id, &ilk_id);
        let vault = Vault { owner: owner.clone(), series_id: series_id.clone(), ilk_id: ilk_id.clone() };
        VaultStorage::save_vault(env, &vault_id, &vault);
        VaultStorage::save_balances(env, &vault_id, &Balances::empty());
        VaultStorage::add_to_owner(env, owner, &vault_id);
        Registry::use_pair(env, &series_id, &ilk_id);

        log!(env, "vault built", vault_id.clone(), owner.clone());
        ProtocolEvent::VaultBuilt { vault_id: vault_id.clone(), owner: owner.clone(), series_id, ilk_id }
            .emit(env);
        Ok(vault_id)
    }

    pub fn destroy(env: &Env, caller: &Address, vault_id: BytesN<12>) -> Result<(), ProtocolError> {
        let vault = Self::owned(env, caller, &vault_id)?;
        if !VaultStorage::balances(env, &vault_id).is_empty() {
            return Err(ProtocolError::NotEmpty);
        }

        env.storage().persistent().remove(&DataKey::Vault(vault_id.clone()));
        env.storage().persistent().remove(&DataKey::Balances(vault_id.clone()));
        VaultStorage::remove_from_owner(env, &vault.owner, &vault_id);
        Registry::release_pair(env, &vault.series_id, &vault.ilk_id);

        log!(env, "vault destroyed", vault_id.clone());
        ProtocolEvent::VaultDestroyed { vault_id }.emit(env);
        Ok(())
    }

    /// Change the series and collateral of an empty vault
    pub fn tweak(
        env: &Env,
        caller: &Address,
        vault_id: BytesN<12>,
        series_id: BytesN<6>,
        ilk_id: BytesN<6>,
    ) -> Result<Vault, ProtocolError> {
        let mut vault = Self::owned(env, caller, &vault_id)?;
        let balances = VaultStorage::balances(env, &vault_id);
        if balances.art != 0 {
            return Err(ProtocolError::HasDebt);
        }
        if balances.ink != 0 {
            return Err(ProtocolError::HasCollateral);
        }
        Registry::series(env, &series_id)?;
        Registry::ratio(env, &series_id, &ilk_id)?;

        Registry::release_pair(env, &vault.series_id, &vault.ilk_id);
        Registry::use_pair(env, &series_id, &ilk_id);
        vault.series_id = series_id.clone();
        vault.ilk_id = ilk_id.clone();
        VaultStorage::save_vault(env, &vault_id, &vault);

        log!(env, "vault tweaked", vault_id.clone());
        ProtocolEvent::VaultTweaked { vault_id, series_id, ilk_id }.emit(env);
        Ok(vault)
    }

    pub fn give(
        env: &Env,
        caller: &Address,
        vault_id: BytesN<12>,
        receiver: Address,
    ) -> Result<Vault, ProtocolError> {
        let mut vault = Self::owned(env, caller, &vault_id)?;

        VaultStorage::remove_from_owner(env, &vault.owner, &vault_id);
        VaultStorage::add_to_owner(env, &receiver, &vault_id);
        vault.owner = receiver.clone();
        VaultStorage::save_vault(env, &vault_id, &vault);

        log!(env, "vault given", vault_id.clone(), receiver.clone());
        ProtocolEvent::VaultTransferred { vault_id, receiver }.emit(env);
        Ok(vault)
    }

    /// Post (`delta_ink > 0`) or withdraw (`delta_ink < 0`) collateral
    pub fn adjust_collateral(
        env: &Env,
        caller: &Address,
        vault_id: BytesN<12>,
        delta_ink: i128,
    ) -> Result<Balances, ProtocolError> {
        Self::pour(env, caller, &vault_id, delta_ink, 0, ProtocolError::Undercollateralized)?;
        Ok(VaultStorage::balances(env, &vault_id))
    }

    /// Borrow (`delta_art > 0`) or repay (`delta_art < 0`) with an optional
    /// collateral change in the same step. Repayment is clamped to the
    /// outstanding debt.
    pub fn adjust_debt(
        env: &Env,
        caller: &Address,
        vault_id: BytesN<12>,
        delta_art: i128,
        delta_ink: i128,
    ) -> Result<PourResult, ProtocolError> {
        Self::pour(env, caller, &vault_id, delta_ink, delta_art, ProtocolError::TooMuchDebt)
    }

    fn pour(
        env: &Env,
        caller: &Address,
        vault_id: &BytesN<12>,
        delta_ink: i128,
        delta_art: i128,
        breach: ProtocolError,
    ) -> Result<PourResult, ProtocolError> {
        let vault = Self::owned(env, caller, vault_id)?;
        if delta_ink == 0 && delta_art == 0 {
            return Err(ProtocolError::InvalidAmount);
        }
        let config = ProtocolConfig::load(env)?;
        let series = Registry::series(env, &vault.series_id)?;
        if delta_art > 0 && env.ledger().timestamp() >= series.maturity {
            return Err(ProtocolError::SeriesMatured);
        }
        let (snapshot, captured) = Accrual::current(env, &series)?;

        let balances = VaultStorage::balances(env, vault_id);
        let ink = balances
            .ink
            .checked_add(delta_ink)
            .ok_or(ProtocolError::ArithmeticOverflow)?;
        if ink < 0 {
            return Err(ProtocolError::InsufficientCollateral);
        }
        let applied_art = if delta_art < 0 {
            -(delta_art.checked_neg().unwrap_or(i128::MAX).min(balances.art))
        } else {
            delta_art
        };
        let art = balances
            .art
            .checked_add(applied_art)
            .ok_or(ProtocolError::ArithmeticOverflow)?;

        if art > 0 && (applied_art > 0 || delta_ink < 0) {
            let level = Self::level_of(env, &config, &vault, &series, &snapshot, ink, art)?;
            if level < 0 {
                return Err(breach);
            }
        }

        let ledger = CollateralLedgerClient::new(env, &config.collateral_ledger);
        if delta_ink > 0 {
            ledger.join(&vault.ilk_id, &vault.owner, &delta_ink);
        } else if delta_ink < 0 {
            ledger.exit(&vault.ilk_id, &vault.owner, &-delta_ink);
        }
        let fy_token = FyTokenClient::new(env, &series.fy_token);
        if applied_art > 0 {
            fy_token.mint(&vault.owner, &applied_art);
        } else if applied_art < 0 {
            fy_token.burn(&vault.owner, &-applied_art);
        }

        VaultStorage::save_balances(env, vault_id, &Balances { ink, art });
        Accrual::commit(env, &series.id, &snapshot, captured);

        log!(env, "vault poured", vault_id.clone(), delta_ink, applied_art);
        ProtocolEvent::VaultPoured {
            vault_id: vault_id.clone(),
            series_id: vault.series_id,
            ilk_id: vault.ilk_id,
            ink: delta_ink,
            art: applied_art,
        }
        .emit(env);
        Ok(PourResult { ink: delta_ink, art: applied_art })
    }

    /// Current debt of the vault in base-asset units
    pub fn debt_in_base(env: &Env, vault_id: &BytesN<12>) -> Result<i128, ProtocolError> {
        let vault = VaultStorage::vault(env, vault_id)?;
        let series = Registry::series(env, &vault.series_id)?;
        let (snapshot, _) = Accrual::current(env, &series)?;
        let balances = VaultStorage::balances(env, vault_id);
        Accrual::debt_to_base(env, &series, &snapshot, balances.art)
    }

    /// Debt in base across every vault of `owner` collateralized by `ilk_id`
    pub fn total_debt_in_base(env: &Env, ilk_id: &BytesN<6>, owner: &Address) -> Result<i128, ProtocolError> {
        let mut total: i128 = 0;
        for vault_id in VaultStorage::vaults_of(env, owner).iter() {
            let vault = VaultStorage::vault(env, &vault_id)?;
            if &vault.ilk_id != ilk_id {
                continue;
            }
            let debt = Self::debt_in_base(env, &vault_id)?;
            total = total.checked_add(debt).ok_or(ProtocolError::ArithmeticOverflow)?;
        }
        Ok(total)
    }

    /// Collateral value minus required collateral value, in base units.
    /// Negative when the vault is undercollateralized.
    pub fn level(env: &Env, vault_id: &BytesN<12>) -> Result<i128, ProtocolError> {
        let config = ProtocolConfig::load(env)?;
        let vault = VaultStorage::vault(env, vault_id)?;
        let series = Registry::series(env, &vault.series_id)?;
        let (snapshot, _) = Accrual::current(env, &series)?;
        let balances = VaultStorage::balances(env, vault_id);
        Self::level_of(env, &config, &vault, &series, &snapshot, balances.ink, balances.art)
    }

    pub(crate) fn level_of(
        env: &Env,
        config: &Config,
        vault: &Vault,
        series: &Series,
        snapshot: &AccrualSnapshot,
        ink: i128,
        art: i128,
    ) -> Result<i128, ProtocolError> {
        let spot = PriceOracleClient::new(env, &config.spot_oracle).spot(&vault.ilk_id);
        if spot <= 0 {
            return Err(ProtocolError::InvalidSpot);
        }
        let ratio = Registry::ratio(env, &vault.series_id, &vault.ilk_id)?;
        let debt = Accrual::debt_to_base(env, series, snapshot, art)?;
        let value = rmul(env, ink, spot)?;
        let required = rmul(env, debt, ratio)?;
        Ok(value - required)
    }

    /// Load a vault the caller owns and may mutate
    fn owned(env: &Env, caller: &Address, vault_id: &BytesN<12>) -> Result<Vault, ProtocolError> {
        let vault = VaultStorage::vault(env, vault_id)?;
        if &vault.owner != caller {
            return Err(ProtocolError::NotOwner);
        }
        caller.require_auth();
        if AuctionStorage::auction(env, vault_id).is_some() {
            return Err(ProtocolError::UnderLiquidation);
        }
        Ok(vault)
    }
}
