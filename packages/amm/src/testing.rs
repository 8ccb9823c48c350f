#![cfg(test)]

use cosmwasm_std::{Addr, Uint128};

use chain_core::{Bank, InMemoryBank, MemoryStore, PrefixedStore};

use crate::contract::{add_liquidity, create_pool, remove_liquidity, swap};
use crate::error::ContractError;
use crate::params::{AmmParams, AMM_PARAMS};
use crate::state::{LP_POSITIONS, POOLS};

struct Fixture {
    store: MemoryStore,
    bank: InMemoryBank,
}

impl Fixture {
    fn new() -> Self {
        let mut store = MemoryStore::new();
        {
            let mut amm_store = PrefixedStore::new(&mut store, "amm");
            AMM_PARAMS.init(&mut amm_store, &AmmParams::default()).unwrap();
        }
        Self {
            store,
            bank: InMemoryBank::new(),
        }
    }

    fn amm(&mut self) -> PrefixedStore<'_> {
        PrefixedStore::new(&mut self.store, "amm")
    }

    fn fund(&mut self, who: &Addr, denom: &str, amount: Uint128) {
        self.bank.mint(who, denom, amount);
    }
}

#[test]
fn scenario_pool_creation_and_swap() {
    let mut fx = Fixture::new();
    let alice = Addr::unchecked("alice");
    let bob = Addr::unchecked("bob");
    fx.fund(&alice, "uatom", Uint128::new(1_000_000));
    fx.fund(&alice, "uosmo", Uint128::new(2_000_000));
    fx.fund(&alice, "uposa", Uint128::new(100));
    fx.fund(&bob, "uatom", Uint128::new(100_000));

    let pool = {
        let mut storage = fx.amm();
        create_pool(
            &mut storage,
            &mut fx.bank,
            &alice,
            "uatom",
            "uosmo",
            Uint128::new(1_000_000),
            Uint128::new(2_000_000),
            30,
            100,
        )
        .unwrap()
    };
    assert_eq!(pool.total_shares, Uint128::new(1_414_213));

    let amount_out = {
        let mut storage = fx.amm();
        swap(
            &mut storage,
            &mut fx.bank,
            &bob,
            pool.id,
            "uatom",
            Uint128::new(100_000),
            Uint128::zero(),
            101,
        )
        .unwrap()
    };
    assert_eq!(amount_out, Uint128::new(181_322));

    let storage = fx.amm();
    let stored = POOLS.load(&storage, pool.id).unwrap();
    assert!(stored.k() >= pool.k());
}

#[test]
fn flash_loan_lock_rejects_same_window_removal() {
    let mut fx = Fixture::new();
    let eve = Addr::unchecked("eve");
    let trader = Addr::unchecked("trader");
    fx.fund(&eve, "uatom", Uint128::new(2_000_000));
    fx.fund(&eve, "uosmo", Uint128::new(2_000_000));
    fx.fund(&eve, "uposa", Uint128::new(100));
    fx.fund(&trader, "uatom", Uint128::new(10_000));

    let pool = {
        let mut storage = fx.amm();
        create_pool(
            &mut storage,
            &mut fx.bank,
            &eve,
            "uatom",
            "uosmo",
            Uint128::new(1_000_000),
            Uint128::new(1_000_000),
            30,
            1,
        )
        .unwrap()
    };

    let minted = {
        let mut storage = fx.amm();
        add_liquidity(
            &mut storage,
            &mut fx.bank,
            &eve,
            pool.id,
            Uint128::new(1_000_000),
            Uint128::new(1_000_000),
            1,
        )
        .unwrap()
    };

    {
        let mut storage = fx.amm();
        swap(
            &mut storage,
            &mut fx.bank,
            &trader,
            pool.id,
            "uatom",
            Uint128::new(10_000),
            Uint128::zero(),
            2,
        )
        .unwrap();
    }

    let mut storage = fx.amm();
    let err = remove_liquidity(&mut storage, &mut fx.bank, &eve, pool.id, minted, 2).unwrap_err();
    assert!(matches!(err, ContractError::FlashLoanLocked(_)));

    // Past the lock window it succeeds.
    let (out_a, out_b) = remove_liquidity(&mut storage, &mut fx.bank, &eve, pool.id, minted, 20).unwrap();
    assert!(out_a > Uint128::zero());
    assert!(out_b > Uint128::zero());

    assert!(!LP_POSITIONS.has(&storage, (pool.id, &eve)) || {
        let remaining = LP_POSITIONS.load(&storage, (pool.id, &eve)).unwrap();
        remaining.shares > Uint128::zero()
    });
}

#[test]
fn swap_rejects_when_module_disabled() {
    let mut fx = Fixture::new();
    let alice = Addr::unchecked("alice");
    fx.fund(&alice, "uatom", Uint128::new(1_000_000));
    fx.fund(&alice, "uosmo", Uint128::new(1_000_000));
    fx.fund(&alice, "uposa", Uint128::new(100));

    let pool = {
        let mut storage = fx.amm();
        create_pool(
            &mut storage,
            &mut fx.bank,
            &alice,
            "uatom",
            "uosmo",
            Uint128::new(1_000_000),
            Uint128::new(1_000_000),
            30,
            1,
        )
        .unwrap()
    };

    {
        let mut storage = fx.amm();
        let mut params = AMM_PARAMS.get(&storage).unwrap();
        params.enabled = false;
        AMM_PARAMS.init(&mut storage, &params).unwrap();
    }

    let mut storage = fx.amm();
    let err = swap(
        &mut storage,
        &mut fx.bank,
        &alice,
        pool.id,
        "uatom",
        Uint128::new(1_000),
        Uint128::zero(),
        2,
    )
    .unwrap_err();
    assert_eq!(err, ContractError::ModuleDisabled {});
}

#[test]
fn mev_bound_rejects_oversized_swap() {
    let mut fx = Fixture::new();
    let alice = Addr::unchecked("alice");
    fx.fund(&alice, "uatom", Uint128::new(10_000_000));
    fx.fund(&alice, "uosmo", Uint128::new(1_000_000));
    fx.fund(&alice, "uposa", Uint128::new(100));

    let pool = {
        let mut storage = fx.amm();
        create_pool(
            &mut storage,
            &mut fx.bank,
            &alice,
            "uatom",
            "uosmo",
            Uint128::new(1_000_000),
            Uint128::new(1_000_000),
            30,
            1,
        )
        .unwrap()
    };

    let mut storage = fx.amm();
    let err = swap(
        &mut storage,
        &mut fx.bank,
        &alice,
        pool.id,
        "uatom",
        Uint128::new(400_000), // > 30% of the 1_000_000 offer reserve
        Uint128::zero(),
        2,
    )
    .unwrap_err();
    assert_eq!(err, ContractError::MevBoundExceeded {});
}
