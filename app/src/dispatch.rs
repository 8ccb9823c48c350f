use ante::Msg;
use chain_core::{Event, GasMeter};

use crate::driver::ChainState;
use crate::error::AppError;

/// Routes one admitted message to its module handler, producing the
/// events the block result records for it. Ante has already
/// run by the time this is called — every check here is a module-level
/// state transition, not an admission check. Each message is charged
/// against `gas` for its declared ceiling before its handler runs.
pub fn dispatch(
    state: &mut ChainState,
    height: i64,
    block_time: i64,
    gas: &mut GasMeter,
    msg: &Msg,
) -> Result<Vec<Event>, AppError> {
    gas.charge(msg.gas_ceiling())?;
    match msg {
        Msg::DexCreatePool { creator, denom_a, denom_b, amount_a, amount_b, fee_bps } => {
            let pool = amm::create_pool(
                &mut state.amm_store,
                &mut state.bank,
                creator,
                denom_a,
                denom_b,
                *amount_a,
                *amount_b,
                *fee_bps,
                height,
            )?;
            Ok(vec![Event::new("dex_create_pool")
                .attr("pool_id", pool.id)
                .attr("creator", creator)])
        }
        Msg::DexSwap { trader, pool_id, denom_in, amount_in, min_amount_out } => {
            let amount_out = amm::swap(
                &mut state.amm_store,
                &mut state.bank,
                trader,
                *pool_id,
                denom_in,
                *amount_in,
                *min_amount_out,
                height,
            )?;
            Ok(vec![Event::new("dex_swap")
                .attr("pool_id", *pool_id)
                .attr("amount_out", amount_out)])
        }
        Msg::DexAddLiquidity { provider, pool_id, amount_a, amount_b } => {
            let minted = amm::add_liquidity(
                &mut state.amm_store,
                &mut state.bank,
                provider,
                *pool_id,
                *amount_a,
                *amount_b,
                height,
            )?;
            Ok(vec![Event::new("dex_add_liquidity")
                .attr("pool_id", *pool_id)
                .attr("shares_minted", minted)])
        }
        Msg::DexRemoveLiquidity { provider, pool_id, shares } => {
            let (amount_a, amount_b) = amm::remove_liquidity(
                &mut state.amm_store,
                &mut state.bank,
                provider,
                *pool_id,
                *shares,
                height,
            )?;
            Ok(vec![Event::new("dex_remove_liquidity")
                .attr("pool_id", *pool_id)
                .attr("amount_a", amount_a)
                .attr("amount_b", amount_b)])
        }
        Msg::ComputeSubmitRequest { requester, provider, max_payment } => {
            let request_id = compute::allocate_request_id(&mut state.compute_store)?;
            compute::lock(
                &mut state.compute_store,
                &mut state.bank,
                request_id,
                requester,
                provider,
                *max_payment,
                height,
            )?;
            Ok(vec![Event::new("compute_submit_request")
                .attr("request_id", request_id)
                .attr("provider", provider)])
        }
        Msg::ComputeRegisterProvider { address, endpoint_url, stake_amount } => {
            compute::register_provider(
                &mut state.compute_store,
                &mut state.bank,
                address,
                endpoint_url.clone(),
                *stake_amount,
            )?;
            Ok(vec![Event::new("compute_register_provider").attr("address", address)])
        }
        Msg::ComputeSubmitResult { provider, request_id, result_commitment, proof } => {
            let verifier = compute::CommitmentProofVerifier;
            compute::submit_result(
                &mut state.compute_store,
                &verifier,
                *request_id,
                provider,
                result_commitment.clone(),
                proof,
                height,
            )?;
            Ok(vec![Event::new("compute_submit_result").attr("request_id", *request_id)])
        }
        Msg::OracleSubmitPrice { validator, feeder, asset, price, timestamp } => {
            oracle::submit_price(
                &mut state.oracle_store,
                &state.staking,
                feeder,
                validator,
                asset,
                *price,
                height,
                *timestamp,
                block_time,
            )?;
            Ok(vec![Event::new("oracle_submit_price")
                .attr("validator", validator)
                .attr("asset", asset)])
        }
        Msg::OracleDelegateFeedConsent { validator, feeder } => {
            oracle::delegate_feed_consent(&mut state.oracle_store, &state.staking, validator, feeder.clone())?;
            Ok(vec![Event::new("oracle_delegate_feed_consent").attr("validator", validator)])
        }
    }
}
