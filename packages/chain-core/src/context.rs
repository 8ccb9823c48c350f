use cosmwasm_std::Addr;

use crate::gas::GasMeter;

/// What the consensus layer hands each block: a monotonic
/// height, a block time that is monotonic except across chain halts, and
/// the proposer identity.
#[derive(Debug, Clone)]
pub struct BlockInfo {
    pub height: i64,
    pub time_unix_secs: i64,
    pub proposer: Addr,
}

/// The context threaded through the ante chain and message handlers. Every
/// stage takes a `TxContext` by value and returns a new one, so there is no
/// implicit global mutable store that could desynchronize nodes.
#[derive(Debug, Clone)]
pub struct TxContext {
    pub block: BlockInfo,
    pub gas: GasMeter,
    /// `true` during mempool gas estimation. Module-specific ante checks
    /// are skipped under simulation so a gas estimate remains a
    /// valid lower bound even for txs that would otherwise fail a
    /// state-dependent check.
    pub simulate: bool,
}

impl TxContext {
    pub fn new(block: BlockInfo, gas_limit: u64) -> Self {
        Self {
            block,
            gas: GasMeter::new(gas_limit),
            simulate: false,
        }
    }

    pub fn simulated(mut self) -> Self {
        self.simulate = true;
        self
    }
}
