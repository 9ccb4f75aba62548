#![cfg(test)]

use soroban_sdk::{
    testutils::{Address as _, Events, Ledger},
    Address, BytesN, Env, Symbol, TryFromVal,
};

use crate::{Cauldron, CauldronClient, RAY};


mod accrual;

pub use fy_token::{MockFyToken, MockFyTokenClient};
pub use ledger::{MockLedger, MockLedgerClient};
pub use oracle::{MockOracle, MockOracleClient};

pub const START: u64 = 1_700_000_000;
pub const MATURITY: u64 = START + 90 * 86_400;
pub const AUCTION_DURATION: u64 = 3_600;

/// A deployed engine with one base asset, one collateral and one series
/// approved at a 100% ratio. Spot starts at 1.5 and every rate at 1.0.
pub struct Setup {
    pub env: Env,
    pub admin: Address,
    pub owner: Address,
    pub cauldron: CauldronClient<'static>,
    pub oracle: MockOracleClient<'static>,
    pub ledger: MockLedgerClient<'static>,
    pub fy_token: MockFyTokenClient<'static>,
    pub base_id: BytesN<6>,
    pub ilk_id: BytesN<6>,
    pub series_id: BytesN<6>,
}

impl Setup {
    pub fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().set_timestamp(START);

        let admin = Address::generate(&env);
        let owner = Address::generate(&env);
        let oracle = MockOracleClient::new(&env, &env.register(MockOracle, ()));
        let ledger = MockLedgerClient::new(&env, &env.register(MockLedger, ()));
        let fy_token = MockFyTokenClient::new(&env, &env.register(MockFyToken, ()));
        let cauldron = CauldronClient::new(&env, &env.register(Cauldron, ()));

        cauldron.initialize(&admin, &oracle.address, &ledger.address, &AUCTION_DURATION);
        ledger.initialize(&cauldron.address);
        fy_token.initialize(&cauldron.address);

        let base_id = asset_id(&env, b"USDC00");
        let ilk_id = asset_id(&env, b"ETH000");
        let series_id = asset_id(&env, b"USDC01");
        cauldron.add_asset(&admin, &base_id, &6, &Some(oracle.address.clone()));
        cauldron.add_asset(&admin, &ilk_id, &18, &None);
        cauldron.add_series(&admin, &series_id, &base_id, &MATURITY, &fy_token.address);
        cauldron.approve_collateral(&admin, &series_id, &ilk_id, &RAY);
        oracle.set_spot(&ilk_id, &(RAY * 3 / 2));
        ledger.fund(&ilk_id, &owner, &1_000);

        Setup {
            env,
            admin,
            owner,
            cauldron,
            oracle,
            ledger,
            fy_token,
            base_id,
            ilk_id,
            series_id,
        }
    }

    pub fn build(&self) -> BytesN<12> {
        self.cauldron.build(&self.owner, &self.series_id, &self.ilk_id)
    }

    /// Build a vault holding `ink` collateral and `art` debt
    pub fn vault_with(&self, ink: i128, art: i128) -> BytesN<12> {
        let vault_id = self.build();
        self.cauldron.adjust_debt(&self.owner, &vault_id, &art, &ink);
        vault_id
    }

    pub fn set_spot(&self, spot: i128) {
        self.oracle.set_spot(&self.ilk_id, &spot);
    }

    pub fn set_rate(&self, rate: i128) {
        self.oracle.set_rate(&self.base_id, &rate);
    }

    pub fn jump_to(&self, timestamp: u64) {
        self.env.ledger().set_timestamp(timestamp);
    }

    /// Whether the last invocation published an engine event named `name`
    pub fn emitted(&self, name: Symbol) -> bool {
        self.env.events().all().iter().any(|(contract, topics, _)| {
            contract == self.cauldron.address
                && topics
                    .get(0)
                    .and_then(|topic| Symbol::try_from_val(&self.env, &topic).ok())
                    .map_or(false, |topic| topic == name)
        })
    }
}

pub fn asset_id(env: &Env, tag: &[u8; 6]) -> BytesN<6> {
    BytesN::from_array(env, tag)
}

#[test]
fn test_initialize_twice() {
    let setup = Setup::new();
    let result = setup.cauldron.try_initialize(
        &setup.admin,
        &setup.oracle.address,
        &setup.ledger.address,
        &AUCTION_DURATION,
    );
    assert_eq!(result.unwrap_err().unwrap(), crate::ProtocolError::AlreadyInitialized);
}

#[test]
fn test_uninitialized_rejects_calls() {
    let env = Env::default();
    env.mock_all_auths();
    let cauldron = CauldronClient::new(&env, &env.register(Cauldron, ()));
    let owner = Address::generate(&env);
    let id = asset_id(&env, b"ETH000");

    let result = cauldron.try_build(&owner, &id, &id);
    assert_eq!(result.unwrap_err().unwrap(), crate::ProtocolError::NotInitialized);
    assert_eq!(cauldron.try_config().unwrap_err().unwrap(), crate::ProtocolError::NotInitialized);
}

#[test]
fn test_initialize_rejects_zero_duration() {
    let env = Env::default();
    env.mock_all_auths();
    let cauldron = CauldronClient::new(&env, &env.register(Cauldron, ()));
    let admin = Address::generate(&env);

    let result = cauldron.try_initialize(&admin, &admin, &admin, &0);
    assert_eq!(result.unwrap_err().unwrap(), crate::ProtocolError::InvalidDuration);
}

#[test]
fn test_admin_setters() {
    let setup = Setup::new();
    let stranger = Address::generate(&setup.env);

    setup.cauldron.set_auction_duration(&setup.admin, &7_200);
    assert_eq!(setup.cauldron.config().auction_duration, 7_200);

    let result = setup.cauldron.try_set_auction_duration(&stranger, &60);
    assert_eq!(result.unwrap_err().unwrap(), crate::ProtocolError::NotAdmin);
    let result = setup.cauldron.try_set_auction_duration(&setup.admin, &0);
    assert_eq!(result.unwrap_err().unwrap(), crate::ProtocolError::InvalidDuration);

    let oracle = Address::generate(&setup.env);
    setup.cauldron.set_spot_oracle(&setup.admin, &oracle);
    assert_eq!(setup.cauldron.config().spot_oracle, oracle);

    setup.cauldron.set_admin(&setup.admin, &stranger);
    assert_eq!(setup.cauldron.config().admin, stranger);
    let result = setup.cauldron.try_set_admin(&setup.admin, &setup.admin);
    assert_eq!(result.unwrap_err().unwrap(), crate::ProtocolError::NotAdmin);
}
