use soroban_sdk::symbol_short;

use super::{asset_id, Setup, MATURITY};
use crate::{ProtocolError, RAY};

#[test]
fn test_accrual_follows_rate_before_maturity() {
    let setup = Setup::new();
    assert_eq!(setup.cauldron.accrual(&setup.series_id), RAY);

    setup.set_rate(RAY * 5 / 4);
    assert_eq!(setup.cauldron.rate(&setup.base_id), RAY * 5 / 4);
    assert_eq!(setup.cauldron.accrual(&setup.series_id), RAY * 5 / 4);
}

#[test]
fn test_debt_on_series_issued_above_ray() {
    let setup = Setup::new();
    let series_id = asset_id(&setup.env, b"USDC02");
    setup.set_rate(RAY * 11 / 10);
    setup.cauldron.add_series(
        &setup.admin,
        &series_id,
        &setup.base_id,
        &MATURITY,
        &setup.fy_token.address,
    );
    setup.cauldron.approve_collateral(&setup.admin, &series_id, &setup.ilk_id, &(RAY * 3 / 2));
    assert_eq!(setup.cauldron.accrual(&series_id), RAY);

    let vault_id = setup.cauldron.build(&setup.owner, &series_id, &setup.ilk_id);
    setup.cauldron.adjust_debt(&setup.owner, &vault_id, &100, &150);
    assert_eq!(setup.cauldron.debt_in_base(&vault_id), 100);
    assert_eq!(setup.cauldron.level(&vault_id), 225 - 150);

    // Accrual is measured from the 1.1 issuance rate
    setup.set_rate(RAY * 121 / 100);
    assert_eq!(setup.cauldron.accrual(&series_id), RAY * 11 / 10);
    assert_eq!(setup.cauldron.debt_in_base(&vault_id), 110);
    assert_eq!(setup.cauldron.level(&vault_id), 60);
}

#[test]
fn test_mature() {
    let setup = Setup::new();
    let vault_id = setup.vault_with(300, 100);

    let result = setup.cauldron.try_mature(&setup.series_id);
    assert_eq!(result.unwrap_err().unwrap(), ProtocolError::SeriesNotMature);

    setup.jump_to(MATURITY);
    setup.set_rate(RAY * 11 / 10);
    assert_eq!(setup.cauldron.mature(&setup.series_id), RAY * 11 / 10);
    assert!(setup.emitted(symbol_short!("matured")));
    assert_eq!(
        setup.cauldron.snapshot(&setup.series_id).rate_at_maturity,
        Some(RAY * 11 / 10)
    );

    let result = setup.cauldron.try_mature(&setup.series_id);
    assert_eq!(result.unwrap_err().unwrap(), ProtocolError::AlreadyMatured);

    // Debt stops growing once the maturity rate is recorded
    assert_eq!(setup.cauldron.debt_in_base(&vault_id), 110);
    setup.set_rate(RAY * 2);
    assert_eq!(setup.cauldron.debt_in_base(&vault_id), 110);
    assert_eq!(setup.cauldron.accrual(&setup.series_id), RAY * 11 / 10);
}

#[test]
fn test_maturity_rate_captured_on_first_touch() {
    let setup = Setup::new();
    let vault_id = setup.vault_with(300, 100);
    setup.jump_to(MATURITY + 86_400);

    // Views use the live rate until something records it
    setup.set_rate(RAY * 13 / 10);
    assert_eq!(setup.cauldron.debt_in_base(&vault_id), 130);
    assert_eq!(setup.cauldron.snapshot(&setup.series_id).rate_at_maturity, None);

    setup.set_rate(RAY * 6 / 5);
    setup.cauldron.adjust_debt(&setup.owner, &vault_id, &-10, &0);
    assert_eq!(
        setup.cauldron.snapshot(&setup.series_id).rate_at_maturity,
        Some(RAY * 6 / 5)
    );

    setup.set_rate(RAY * 2);
    assert_eq!(setup.cauldron.debt_in_base(&vault_id), 108);

    let result = setup.cauldron.try_mature(&setup.series_id);
    assert_eq!(result.unwrap_err().unwrap(), ProtocolError::AlreadyMatured);
}

#[test]
fn test_invalid_rate() {
    let setup = Setup::new();
    let vault_id = setup.vault_with(300, 100);
    setup.set_rate(0);

    assert_eq!(
        setup.cauldron.try_rate(&setup.base_id).unwrap_err().unwrap(),
        ProtocolError::InvalidRate
    );
    let result = setup.cauldron.try_adjust_debt(&setup.owner, &vault_id, &10, &0);
    assert_eq!(result.unwrap_err().unwrap(), ProtocolError::InvalidRate);
}
