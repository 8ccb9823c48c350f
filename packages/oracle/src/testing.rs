#![cfg(test)]

use cosmwasm_std::{Addr, Decimal, Uint128};

use chain_core::{InMemorySlashing, InMemoryStaking, MemoryStore, PrefixedStore, SlashingSink, StakingView};

use crate::contract::{
    begin_block_round_init, delegate_feed_consent, end_block_aggregate_asset, init_signing_info,
    register_asset, submit_price,
};
use crate::params::{OracleParams, ORACLE_PARAMS};

struct Fixture {
    store: MemoryStore,
    staking: InMemoryStaking,
    slashing: InMemorySlashing,
}

impl Fixture {
    fn new(validators: &[&str], power: u128) -> Self {
        let mut store = MemoryStore::new();
        let mut staking = InMemoryStaking::new();
        for v in validators {
            staking.bond(Addr::unchecked(*v), Uint128::new(power));
        }
        {
            let mut storage = PrefixedStore::new(&mut store, "oracle");
            ORACLE_PARAMS.init(&mut storage, &OracleParams::default()).unwrap();
            register_asset(&mut storage, "uatom", 6, 60, 5, 0).unwrap();
            let addrs: Vec<Addr> = validators.iter().map(|v| Addr::unchecked(*v)).collect();
            init_signing_info(&mut storage, &addrs).unwrap();
        }
        Self {
            store,
            staking,
            slashing: InMemorySlashing::new(),
        }
    }

    fn storage(&mut self) -> PrefixedStore<'_> {
        PrefixedStore::new(&mut self.store, "oracle")
    }
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn scenario_outlier_detection_slashes_and_excludes() {
    let validators = ["v1", "v2", "v3", "v4", "v5", "v6", "v7"];
    let mut fx = Fixture::new(&validators, 100);

    let prices = ["100", "101", "100.5", "101.5", "100.2", "1000", "1000"];
    {
        let mut storage = fx.storage();
        for (v, p) in validators.iter().zip(prices.iter()) {
            let addr = Addr::unchecked(*v);
            submit_price(&mut storage, &fx.staking, &addr, &addr, "uatom", dec(p), 1, 0, 0).unwrap();
        }
    }

    let aggregated = {
        let mut storage = fx.storage();
        end_block_aggregate_asset(&mut storage, &fx.staking, &mut fx.slashing, "uatom", 1)
            .unwrap()
            .expect("round clears threshold")
    };

    assert!(aggregated.price >= dec("100") && aggregated.price <= dec("102"));
    assert_eq!(fx.slashing.slashed.len(), 2);
    let slashed_validators: Vec<&Addr> = fx.slashing.slashed.iter().map(|(v, _, _)| v).collect();
    assert!(slashed_validators.contains(&&Addr::unchecked("v6")));
    assert!(slashed_validators.contains(&&Addr::unchecked("v7")));
}

#[test]
fn scenario_threshold_failure_increments_miss_counters() {
    let validators = ["v1", "v2", "v3", "v4", "v5", "v6", "v7"];
    let mut fx = Fixture::new(&validators, 100);

    {
        let mut storage = fx.storage();
        for v in &validators[..2] {
            let addr = Addr::unchecked(*v);
            submit_price(&mut storage, &fx.staking, &addr, &addr, "uatom", dec("100"), 1, 0, 0).unwrap();
        }
    }

    let aggregated = {
        let mut storage = fx.storage();
        end_block_aggregate_asset(&mut storage, &fx.staking, &mut fx.slashing, "uatom", 1).unwrap()
    };
    assert!(aggregated.is_none());

    let storage = fx.storage();
    for v in &validators[2..] {
        let info = crate::state::SIGNING_INFO
            .load(&storage, &Addr::unchecked(*v))
            .unwrap();
        assert_eq!(info.missed_rounds, 1);
    }
    for v in &validators[..2] {
        let info = crate::state::SIGNING_INFO
            .load(&storage, &Addr::unchecked(*v))
            .unwrap();
        assert_eq!(info.missed_rounds, 0);
    }
}

#[test]
fn feeder_delegation_allows_delegate_but_not_strangers() {
    let validators = ["v1"];
    let mut fx = Fixture::new(&validators, 100);
    let validator = Addr::unchecked("v1");
    let feeder = Addr::unchecked("feeder");
    let stranger = Addr::unchecked("stranger");

    {
        let mut storage = fx.storage();
        delegate_feed_consent(&mut storage, &fx.staking, &validator, feeder.clone()).unwrap();
    }

    let mut storage = fx.storage();
    let err = submit_price(&mut storage, &fx.staking, &stranger, &validator, "uatom", dec("100"), 1, 0, 0)
        .unwrap_err();
    assert_eq!(err, crate::error::ContractError::NotAuthorizedFeeder {});

    submit_price(&mut storage, &fx.staking, &feeder, &validator, "uatom", dec("100"), 1, 0, 0).unwrap();
}

#[test]
fn round_init_clears_prior_submissions_and_counters() {
    let validators = ["v1", "v2"];
    let mut fx = Fixture::new(&validators, 100);
    let v1 = Addr::unchecked("v1");

    {
        let mut storage = fx.storage();
        submit_price(&mut storage, &fx.staking, &v1, &v1, "uatom", dec("100"), 1, 0, 0).unwrap();
        // A second submission in the same round for the same asset is rejected...
        let err = submit_price(&mut storage, &fx.staking, &v1, &v1, "uatom", dec("101"), 1, 0, 0).unwrap_err();
        assert_eq!(err, crate::error::ContractError::DuplicateSubmission("v1".to_string()));
    }

    {
        let mut storage = fx.storage();
        begin_block_round_init(&mut storage).unwrap();
    }

    // ...but succeeds again once the next round clears it.
    let mut storage = fx.storage();
    submit_price(&mut storage, &fx.staking, &v1, &v1, "uatom", dec("101"), 2, 0, 0).unwrap();
}

#[test]
fn submission_outside_the_freshness_window_is_rejected() {
    let validators = ["v1"];
    let mut fx = Fixture::new(&validators, 100);
    let v1 = Addr::unchecked("v1");

    // "uatom" is registered with max_age_secs=60, max_clock_drift_secs=5, so
    // at block_time=1_000 the valid window is [940, 1_005].
    let mut storage = fx.storage();
    let err = submit_price(&mut storage, &fx.staking, &v1, &v1, "uatom", dec("100"), 1, 500, 1_000).unwrap_err();
    assert_eq!(
        err,
        crate::error::ContractError::StaleTimestamp {
            timestamp: 500,
            min: 940,
            max: 1_005,
        }
    );

    let err = submit_price(&mut storage, &fx.staking, &v1, &v1, "uatom", dec("100"), 1, 2_000, 1_000).unwrap_err();
    assert_eq!(
        err,
        crate::error::ContractError::StaleTimestamp {
            timestamp: 2_000,
            min: 940,
            max: 1_005,
        }
    );

    // A timestamp inside the window succeeds.
    submit_price(&mut storage, &fx.staking, &v1, &v1, "uatom", dec("100"), 1, 1_000, 1_000).unwrap();
}

#[test]
fn jailed_validator_is_rejected_after_repeated_misses() {
    let validators = ["v1", "v2", "v3"];
    let mut fx = Fixture::new(&validators, 100);
    let v3 = Addr::unchecked("v3");

    for height in 1..=10 {
        {
            let mut storage = fx.storage();
            let v1 = Addr::unchecked("v1");
            let v2 = Addr::unchecked("v2");
            submit_price(&mut storage, &fx.staking, &v1, &v1, "uatom", dec("100"), height, 0, 0).unwrap();
            submit_price(&mut storage, &fx.staking, &v2, &v2, "uatom", dec("100"), height, 0, 0).unwrap();
        }
        {
            let mut storage = fx.storage();
            end_block_aggregate_asset(&mut storage, &fx.staking, &mut fx.slashing, "uatom", height).unwrap();
        }
        {
            let mut storage = fx.storage();
            begin_block_round_init(&mut storage).unwrap();
        }
    }

    let storage = fx.storage();
    let info = crate::state::SIGNING_INFO.load(&storage, &v3).unwrap();
    assert!(info.missed_rounds >= 10);
    assert!(fx.slashing.is_jailed(&v3, 10));
}
