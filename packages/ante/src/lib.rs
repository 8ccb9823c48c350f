pub mod error;
pub mod msg;
pub mod pipeline;
pub mod sequence;

mod testing;

use chain_core::{Bank, StakingView, TxContext};

pub use error::AnteError;
pub use msg::{Msg, Tx};
pub use pipeline::{
    check_and_advance_sequence, check_block_time, check_extension_options, check_global_caps,
    check_memo_length, check_module_specific, check_timeout_height, check_validate_basic,
    charge_size_gas, deduct_fee, ModuleStores, FEE_COLLECTOR_ACCOUNT, MAX_BLOCK_TIME_DRIFT_SECS,
    MAX_GAS_LIMIT, MAX_MEMO_BYTES, MAX_MESSAGES_PER_TX, MAX_PER_MESSAGE_GAS,
};
pub use sequence::{AccountSequencer, InMemorySequencer};

/// Runs the full ordered ante chain against one transaction,
/// returning the updated [`TxContext`] (gas consumed so far) on success.
/// Simulation mode (`ctx.simulate`) skips step 11's module-specific checks;
/// every other step still runs.
#[allow(clippy::too_many_arguments)]
pub fn run_ante_chain(
    mut ctx: TxContext,
    tx: &Tx,
    wall_clock: i64,
    bank: &mut dyn Bank,
    staking: &dyn StakingView,
    sequencer: &mut dyn AccountSequencer,
    stores: &ModuleStores,
) -> Result<TxContext, AnteError> {
    check_block_time(ctx.block.time_unix_secs, wall_clock)?;
    check_global_caps(tx)?;
    check_extension_options(tx)?;
    check_validate_basic(tx)?;
    check_timeout_height(tx, ctx.block.height)?;
    check_memo_length(tx)?;
    charge_size_gas(&mut ctx, tx)?;
    deduct_fee(bank, tx)?;
    check_and_advance_sequence(sequencer, tx)?;

    if !ctx.simulate {
        for msg in &tx.messages {
            check_module_specific(stores, bank, staking, msg)?;
        }
    }

    Ok(ctx)
}
