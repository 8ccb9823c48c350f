#![cfg(test)]

use cosmwasm_std::{Addr, Uint128};

use amm::params::{AmmParams, AMM_PARAMS};
use chain_core::{BlockInfo, InMemoryBank, InMemoryStaking, MemoryStore, PrefixedStore, TxContext};
use compute::params::{ComputeParams, COMPUTE_PARAMS};
use oracle::contract::register_asset;
use oracle::params::{OracleParams, ORACLE_PARAMS};

use crate::error::AnteError;
use crate::msg::{Msg, Tx};
use crate::pipeline::ModuleStores;
use crate::sequence::InMemorySequencer;
use crate::run_ante_chain;

struct Fixture {
    amm_store: MemoryStore,
    compute_store: MemoryStore,
    oracle_store: MemoryStore,
    bank: InMemoryBank,
    staking: InMemoryStaking,
    sequencer: InMemorySequencer,
}

impl Fixture {
    fn new() -> Self {
        let mut amm_store = MemoryStore::new();
        {
            let mut s = PrefixedStore::new(&mut amm_store, "amm");
            AMM_PARAMS.init(&mut s, &AmmParams::default()).unwrap();
        }
        let mut compute_store = MemoryStore::new();
        {
            let mut s = PrefixedStore::new(&mut compute_store, "compute");
            COMPUTE_PARAMS.init(&mut s, &ComputeParams::default()).unwrap();
        }
        let mut oracle_store = MemoryStore::new();
        {
            let mut s = PrefixedStore::new(&mut oracle_store, "oracle");
            ORACLE_PARAMS.init(&mut s, &OracleParams::default()).unwrap();
            register_asset(&mut s, "uatom", 6, 60, 5, 0).unwrap();
        }

        Self {
            amm_store,
            compute_store,
            oracle_store,
            bank: InMemoryBank::new(),
            staking: InMemoryStaking::new(),
            sequencer: InMemorySequencer::new(),
        }
    }

    fn base_tx(&self, signer: &Addr, messages: Vec<Msg>) -> Tx {
        Tx {
            signer: signer.clone(),
            sequence: 0,
            messages,
            gas_limit: 1_000_000,
            memo: String::new(),
            timeout_height: 0,
            extension_options: vec![],
            fee_amount: Uint128::new(10),
            fee_denom: "uposa".to_string(),
        }
    }

    fn run(&mut self, tx: &Tx) -> Result<TxContext, AnteError> {
        let block = BlockInfo {
            height: 5,
            time_unix_secs: 1_000,
            proposer: Addr::unchecked("proposer"),
        };
        let ctx = TxContext::new(block, tx.gas_limit);
        let amm = PrefixedStore::new(&mut self.amm_store, "amm");
        let compute = PrefixedStore::new(&mut self.compute_store, "compute");
        let oracle = PrefixedStore::new(&mut self.oracle_store, "oracle");
        let stores = ModuleStores {
            amm: &amm,
            compute: &compute,
            oracle: &oracle,
        };
        run_ante_chain(ctx, tx, 1_000, &mut self.bank, &self.staking, &mut self.sequencer, &stores)
    }
}

#[test]
fn well_formed_oracle_submission_passes_the_full_chain() {
    let mut fx = Fixture::new();
    let validator = Addr::unchecked("validator1");
    fx.staking.bond(validator.clone(), Uint128::new(100));
    fx.bank.mint(&validator, "uposa", Uint128::new(1_000));

    let tx = fx.base_tx(
        &validator,
        vec![Msg::OracleSubmitPrice {
            validator: validator.clone(),
            feeder: validator.clone(),
            asset: "uatom".to_string(),
            price: cosmwasm_std::Decimal::percent(100),
            timestamp: 1_000,
        }],
    );
    let ctx = fx.run(&tx).unwrap();
    assert!(ctx.gas.consumed() > 0);
}

#[test]
fn too_many_messages_is_rejected_before_any_module_check() {
    let mut fx = Fixture::new();
    let signer = Addr::unchecked("signer01");
    fx.bank.mint(&signer, "uposa", Uint128::new(1_000));

    let msg = Msg::OracleDelegateFeedConsent {
        validator: signer.clone(),
        feeder: signer.clone(),
    };
    let tx = fx.base_tx(&signer, vec![msg; 11]);
    let err = fx.run(&tx).unwrap_err();
    assert_eq!(err, AnteError::TooManyMessages { count: 11, max: 10 });
}

#[test]
fn gas_limit_above_global_cap_is_rejected() {
    let mut fx = Fixture::new();
    let signer = Addr::unchecked("signer02");
    fx.bank.mint(&signer, "uposa", Uint128::new(1_000));

    let mut tx = fx.base_tx(&signer, vec![]);
    tx.gas_limit = 10_000_001;
    let err = fx.run(&tx).unwrap_err();
    assert_eq!(
        err,
        AnteError::GasLimitTooHigh { limit: 10_000_001, max: 10_000_000 }
    );
}

#[test]
fn unknown_extension_option_is_rejected() {
    let mut fx = Fixture::new();
    let signer = Addr::unchecked("signer03");
    fx.bank.mint(&signer, "uposa", Uint128::new(1_000));

    let mut tx = fx.base_tx(&signer, vec![]);
    tx.extension_options = vec!["mystery".to_string()];
    let err = fx.run(&tx).unwrap_err();
    assert_eq!(err, AnteError::UnknownExtensionOption("mystery".to_string()));
}

#[test]
fn memo_over_256_bytes_is_rejected() {
    let mut fx = Fixture::new();
    let signer = Addr::unchecked("signer04");
    fx.bank.mint(&signer, "uposa", Uint128::new(1_000));

    let mut tx = fx.base_tx(&signer, vec![]);
    tx.memo = "x".repeat(257);
    let err = fx.run(&tx).unwrap_err();
    assert_eq!(err, AnteError::MemoTooLong { len: 257, max: 256 });
}

#[test]
fn timeout_height_in_the_past_is_rejected() {
    let mut fx = Fixture::new();
    let signer = Addr::unchecked("signer05");
    fx.bank.mint(&signer, "uposa", Uint128::new(1_000));

    let mut tx = fx.base_tx(&signer, vec![]);
    tx.timeout_height = 1;
    let err = fx.run(&tx).unwrap_err();
    assert_eq!(err, AnteError::TimeoutExceeded { current: 5, timeout: 1 });
}

#[test]
fn insufficient_fee_balance_is_rejected() {
    let mut fx = Fixture::new();
    let signer = Addr::unchecked("signer06");
    // no funding at all

    let tx = fx.base_tx(&signer, vec![]);
    let err = fx.run(&tx).unwrap_err();
    assert!(matches!(err, AnteError::InsufficientFee { .. }));
}

#[test]
fn sequence_mismatch_is_rejected() {
    let mut fx = Fixture::new();
    let signer = Addr::unchecked("signer07");
    fx.bank.mint(&signer, "uposa", Uint128::new(1_000));

    let mut tx = fx.base_tx(&signer, vec![]);
    tx.sequence = 1;
    let err = fx.run(&tx).unwrap_err();
    assert_eq!(err, AnteError::SequenceMismatch { expected: 0, got: 1 });
}

#[test]
fn module_disabled_short_circuits_step_eleven() {
    let mut fx = Fixture::new();
    let signer = Addr::unchecked("signer08");
    fx.bank.mint(&signer, "uposa", Uint128::new(1_000));
    fx.staking.bond(signer.clone(), Uint128::new(100));
    {
        let mut s = PrefixedStore::new(&mut fx.oracle_store, "oracle");
        let mut params = ORACLE_PARAMS.get(&s).unwrap();
        params.enabled = false;
        ORACLE_PARAMS.init(&mut s, &params).unwrap();
    }

    let tx = fx.base_tx(
        &signer,
        vec![Msg::OracleDelegateFeedConsent {
            validator: signer.clone(),
            feeder: signer.clone(),
        }],
    );
    let err = fx.run(&tx).unwrap_err();
    assert_eq!(err, AnteError::ModuleDisabled("oracle"));
}

#[test]
fn simulation_mode_bypasses_module_checks_but_not_global_caps() {
    let mut fx = Fixture::new();
    let signer = Addr::unchecked("signer09");
    fx.bank.mint(&signer, "uposa", Uint128::new(1_000));

    // DelegateFeedConsent for a validator that isn't bonded would normally
    // fail step 11; under simulation it should be skipped entirely.
    let tx = fx.base_tx(
        &signer,
        vec![Msg::OracleDelegateFeedConsent {
            validator: signer.clone(),
            feeder: signer.clone(),
        }],
    );

    let block = BlockInfo {
        height: 5,
        time_unix_secs: 1_000,
        proposer: Addr::unchecked("proposer"),
    };
    let ctx = TxContext::new(block, tx.gas_limit).simulated();
    let amm = PrefixedStore::new(&mut fx.amm_store, "amm");
    let compute = PrefixedStore::new(&mut fx.compute_store, "compute");
    let oracle = PrefixedStore::new(&mut fx.oracle_store, "oracle");
    let stores = ModuleStores { amm: &amm, compute: &compute, oracle: &oracle };
    let result = run_ante_chain(ctx, &tx, 1_000, &mut fx.bank, &fx.staking, &mut fx.sequencer, &stores);
    assert!(result.is_ok());
}

#[test]
fn invalid_message_fails_validate_basic_before_fees_are_charged() {
    let mut fx = Fixture::new();
    let signer = Addr::unchecked("signer10");
    fx.bank.mint(&signer, "uposa", Uint128::new(1_000));

    let tx = fx.base_tx(
        &signer,
        vec![Msg::DexSwap {
            trader: signer.clone(),
            pool_id: 1,
            denom_in: "uatom".to_string(),
            amount_in: Uint128::zero(),
            min_amount_out: Uint128::zero(),
        }],
    );
    let err = fx.run(&tx).unwrap_err();
    assert!(matches!(err, AnteError::InvalidMessage(_)));
    assert_eq!(fx.bank.spendable(&signer, "uposa"), Uint128::new(1_000), "pre-fee failures must not charge the fee");
}
