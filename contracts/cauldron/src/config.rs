use soroban_sdk::{contracttype, Address, Env};

use crate::storage::{bump_instance, DataKey};
use crate::ProtocolError;

/// Engine-wide settings written once by `initialize`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub admin: Address,
    /// Price oracle queried for every collateral spot price
    pub spot_oracle: Address,
    /// Custody ledger holding raw collateral
    pub collateral_ledger: Address,
    /// Seconds for the auction payout to go from half to all of the collateral
    pub auction_duration: u64,
}

/// Protocol configuration and admin management
pub struct ProtocolConfig;

impl ProtocolConfig {
    pub fn initialize(env: &Env, config: &Config) -> Result<(), ProtocolError> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(ProtocolError::AlreadyInitialized);
        }
        if config.auction_duration == 0 {
            return Err(ProtocolError::InvalidDuration);
        }
        Self::save(env, config);
        Ok(())
    }

    pub fn load(env: &Env) -> Result<Config, ProtocolError> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(ProtocolError::NotInitialized)
    }

    fn save(env: &Env, config: &Config) {
        env.storage().instance().set(&DataKey::Config, config);
        bump_instance(env);
    }

    /// Require that the caller is the admin and has signed the invocation
    pub fn require_admin(env: &Env, caller: &Address) -> Result<Config, ProtocolError> {
        let config = Self::load(env)?;
        if &config.admin != caller {
            return Err(ProtocolError::NotAdmin);
        }
        caller.require_auth();
        Ok(config)
    }

    pub fn set_admin(env: &Env, caller: &Address, new_admin: &Address) -> Result<(), ProtocolError> {
        let mut config = Self::require_admin(env, caller)?;
        config.admin = new_admin.clone();
        Self::save(env, &config);
        Ok(())
    }

    pub fn set_spot_oracle(env: &Env, caller: &Address, oracle: &Address) -> Result<(), ProtocolError> {
        let mut config = Self::require_admin(env, caller)?;
        config.spot_oracle = oracle.clone();
        Self::save(env, &config);
        Ok(())
    }

    pub fn set_auction_duration(env: &Env, caller: &Address, duration: u64) -> Result<(), ProtocolError> {
        if duration == 0 {
            return Err(ProtocolError::InvalidDuration);
        }
        let mut config = Self::require_admin(env, caller)?;
        config.auction_duration = duration;
        Self::save(env, &config);
        Ok(())
    }
}
