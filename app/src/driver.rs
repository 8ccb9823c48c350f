use ante::{AccountSequencer, InMemorySequencer, ModuleStores, Msg, Tx};
use chain_core::{
    Bank, BlockInfo, Event, GovernanceAuthority, InMemoryBank, InMemorySlashing, InMemoryStaking,
    MemoryStore, TxContext,
};

use crate::dispatch::dispatch;
use crate::error::AppError;
use crate::genesis::{apply_genesis, GenesisState};

/// The full mutable state of the chain: one store per
/// module kept separate rather than namespaced into a shared store, plus
/// the cross-cutting collaborators every module handler borrows. Every
/// field is `Clone` so [`ChainState::deliver_tx`] can snapshot before a tx
/// and roll back on failure without a bespoke undo log per module.
#[derive(Debug, Clone)]
pub struct ChainState {
    pub amm_store: MemoryStore,
    pub compute_store: MemoryStore,
    pub oracle_store: MemoryStore,
    pub ibc_store: MemoryStore,
    pub bank: InMemoryBank,
    pub staking: InMemoryStaking,
    pub slashing: InMemorySlashing,
    pub sequencer: InMemorySequencer,
    pub governance: GovernanceAuthority,
}

impl ChainState {
    pub fn from_genesis(genesis: &GenesisState) -> Result<Self, AppError> {
        let mut amm_store = MemoryStore::new();
        let mut compute_store = MemoryStore::new();
        let mut oracle_store = MemoryStore::new();
        let mut bank = InMemoryBank::new();
        let mut staking = InMemoryStaking::new();

        let governance = apply_genesis(
            &mut amm_store,
            &mut compute_store,
            &mut oracle_store,
            &mut bank,
            &mut staking,
            genesis,
        )?;

        Ok(Self {
            amm_store,
            compute_store,
            oracle_store,
            ibc_store: MemoryStore::new(),
            bank,
            staking,
            slashing: InMemorySlashing::new(),
            sequencer: InMemorySequencer::new(),
            governance,
        })
    }

    /// BeginBlock: only the oracle module has
    /// per-round bookkeeping to reset before transactions land. Compute
    /// escrow expiry and AMM statistics are both handled once, at
    /// EndBlock, so they never run twice in the same block.
    pub fn begin_block(&mut self, _height: i64) -> Result<(), AppError> {
        oracle::begin_block_round_init(&mut self.oracle_store)?;
        Ok(())
    }

    /// Runs the ante chain, then dispatches every message in the tx to its
    /// module handler. The whole state is cloned up front; on any
    /// failure — ante rejection or a module error — the clone replaces
    /// `self` so a tx either commits in full or leaves no trace.
    pub fn deliver_tx(&mut self, tx: &Tx, height: i64, block_time: i64) -> Result<Vec<Event>, AppError> {
        let snapshot = self.clone();

        let result = self.try_deliver_tx(tx, height, block_time);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }

    fn try_deliver_tx(&mut self, tx: &Tx, height: i64, block_time: i64) -> Result<Vec<Event>, AppError> {
        let ctx = TxContext::new(
            BlockInfo {
                height,
                time_unix_secs: block_time,
                proposer: tx.signer.clone(),
            },
            tx.gas_limit,
        );

        let mut ctx = {
            let stores = ModuleStores {
                amm: &self.amm_store,
                compute: &self.compute_store,
                oracle: &self.oracle_store,
            };
            ante::run_ante_chain(
                ctx,
                tx,
                block_time,
                &mut self.bank,
                &self.staking,
                &mut self.sequencer,
                &stores,
            )?
        };

        let mut events = Vec::new();
        for msg in &tx.messages {
            let mut msg_events = dispatch(self, height, block_time, &mut ctx.gas, msg)?;
            events.append(&mut msg_events);
        }
        Ok(events)
    }

    /// EndBlock, in a fixed order: oracle
    /// aggregation feeds the slashing sink before anything else touches
    /// voting power; escrow expiry runs once aggregation can no longer
    /// change the round; AMM stats are refreshed last since nothing
    /// downstream reads them this block.
    pub fn end_block(&mut self, height: i64) -> Result<Vec<Event>, AppError> {
        let mut events = Vec::new();

        let prices = oracle::end_block_aggregate_all(
            &mut self.oracle_store,
            &self.staking,
            &mut self.slashing,
            height,
        )?;
        for price in prices {
            events.push(Event::new("oracle_aggregated_price").attr("asset", price.asset).attr("price", price.price));
        }

        let swept = compute::sweep_expired(&mut self.compute_store, &mut self.bank, height)?;
        for request_id in swept {
            events.push(Event::new("compute_escrow_refunded").attr("request_id", request_id));
        }

        amm::refresh_stats(&mut self.amm_store, height)?;

        Ok(events)
    }

    /// Commit is a no-op for the in-memory store: there is nothing
    /// buffered that `deliver_tx`/`end_block` did not already apply
    /// directly. A durable backend would flush to disk here.
    pub fn commit(&mut self) {}

    /// Governance-gated parameter updates and the compute module's
    /// `ImmediateRelease` override run out of band from
    /// `deliver_tx` — they are not transactions any signer can submit, only
    /// actions the governance authority itself takes.
    pub fn set_amm_params(&mut self, signer: &cosmwasm_std::Addr, params: amm::AmmParams) -> Result<(), AppError> {
        amm::AMM_PARAMS.set(&mut self.amm_store, &self.governance, signer, params)?;
        Ok(())
    }

    pub fn set_compute_params(&mut self, signer: &cosmwasm_std::Addr, params: compute::ComputeParams) -> Result<(), AppError> {
        compute::COMPUTE_PARAMS.set(&mut self.compute_store, &self.governance, signer, params)?;
        Ok(())
    }

    pub fn set_oracle_params(&mut self, signer: &cosmwasm_std::Addr, params: oracle::OracleParams) -> Result<(), AppError> {
        oracle::ORACLE_PARAMS.set(&mut self.oracle_store, &self.governance, signer, params)?;
        Ok(())
    }

    pub fn immediate_release(&mut self, signer: &cosmwasm_std::Addr, request_id: u64, height: i64) -> Result<(), AppError> {
        compute::immediate_release(&mut self.compute_store, &mut self.bank, &self.governance, signer, request_id, height)?;
        Ok(())
    }

    pub fn expected_sequence(&self, signer: &cosmwasm_std::Addr) -> u64 {
        self.sequencer.expected_sequence(signer)
    }

    pub fn spendable(&self, addr: &cosmwasm_std::Addr, denom: &str) -> cosmwasm_std::Uint128 {
        self.bank.spendable(addr, denom)
    }
}

#[cfg(test)]
mod tests {
    use cosmwasm_std::{Addr, Decimal, Uint128};

    use crate::genesis::{GenesisBalance, GenesisState, GenesisValidator};

    use super::*;

    fn genesis() -> GenesisState {
        GenesisState {
            governance_authority: Addr::unchecked("gov"),
            amm_params: Default::default(),
            compute_params: Default::default(),
            oracle_params: Default::default(),
            validators: vec![GenesisValidator { address: Addr::unchecked("validator1"), voting_power: Uint128::new(100) }],
            balances: vec![GenesisBalance { address: Addr::unchecked("alice"), denom: "uposa".into(), amount: Uint128::new(1_000_000) }],
            oracle_assets: vec![],
        }
    }

    fn tx(signer: &str, sequence: u64, messages: Vec<Msg>) -> Tx {
        Tx {
            signer: Addr::unchecked(signer),
            sequence,
            messages,
            gas_limit: 5_000_000,
            memo: String::new(),
            timeout_height: 0,
            extension_options: vec![],
            fee_amount: Uint128::zero(),
            fee_denom: "uposa".into(),
        }
    }

    #[test]
    fn a_successful_pool_creation_commits_and_a_failing_one_rolls_back() {
        let mut state = ChainState::from_genesis(&genesis()).unwrap();
        state.begin_block(1).unwrap();

        let good = tx(
            "alice",
            0,
            vec![Msg::DexCreatePool {
                creator: Addr::unchecked("alice"),
                denom_a: "uposa".into(),
                denom_b: "uatom".into(),
                amount_a: Uint128::new(1_000),
                amount_b: Uint128::new(1_000),
                fee_bps: 30,
            }],
        );
        state.deliver_tx(&good, 1, 1_000).unwrap();
        assert_eq!(state.spendable(&Addr::unchecked("alice"), "uposa"), Uint128::new(999_000));

        let before = state.clone();
        let bad = tx(
            "alice",
            1,
            vec![Msg::DexSwap {
                trader: Addr::unchecked("alice"),
                pool_id: 999,
                denom_in: "uposa".into(),
                amount_in: Uint128::new(10),
                min_amount_out: Uint128::zero(),
            }],
        );
        let err = state.deliver_tx(&bad, 1, 1_000);
        assert!(err.is_err());
        assert_eq!(state.expected_sequence(&Addr::unchecked("alice")), before.expected_sequence(&Addr::unchecked("alice")));
        assert_eq!(state.spendable(&Addr::unchecked("alice"), "uposa"), Uint128::new(999_000));
    }

    #[test]
    fn end_block_refreshes_pool_stats_and_aggregates_prices() {
        let mut g = genesis();
        g.oracle_assets.push(crate::genesis::GenesisOracleAsset {
            symbol: "uatom".into(),
            decimals: 6,
            max_age_secs: 120,
            max_clock_drift_secs: 30,
        });
        let mut state = ChainState::from_genesis(&g).unwrap();
        state.begin_block(1).unwrap();

        let submit = tx(
            "validator1",
            0,
            vec![Msg::OracleSubmitPrice {
                validator: Addr::unchecked("validator1"),
                feeder: Addr::unchecked("validator1"),
                asset: "uatom".into(),
                price: Decimal::percent(1000),
                timestamp: 1_000,
            }],
        );
        state.deliver_tx(&submit, 1, 1_000).unwrap();

        let events = state.end_block(1).unwrap();
        assert!(events.iter().any(|e| e.ty == "oracle_aggregated_price"));
    }
}
