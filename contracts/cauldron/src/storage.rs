use soroban_sdk::{contracttype, Address, BytesN, Env};

pub(crate) const DAY_IN_LEDGERS: u32 = 17_280;
pub(crate) const BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const LIFETIME_THRESHOLD: u32 = BUMP_AMOUNT - DAY_IN_LEDGERS;

/// Storage keys
///
/// Configuration and registry entries live in instance storage, everything
/// keyed by vault or owner lives in persistent storage.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Config,
    Asset(BytesN<6>),
    Series(BytesN<6>),
    Approval(BytesN<6>, BytesN<6>),
    PairUsage(BytesN<6>, BytesN<6>),
    Accrual(BytesN<6>),
    VaultNonce,
    Vault(BytesN<12>),
    Balances(BytesN<12>),
    Auction(BytesN<12>),
    OwnerVaults(Address),
}

pub(crate) fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(LIFETIME_THRESHOLD, BUMP_AMOUNT);
}

pub(crate) fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, LIFETIME_THRESHOLD, BUMP_AMOUNT);
}
