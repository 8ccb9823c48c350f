use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Decimal, Uint128};

use crate::error::AnteError;

/// Tagged dispatch union over every message kind the chain accepts, matched
/// exhaustively at dispatch time rather than modeled as a trait object.
#[cw_serde]
pub enum Msg {
    DexCreatePool {
        creator: Addr,
        denom_a: String,
        denom_b: String,
        amount_a: Uint128,
        amount_b: Uint128,
        fee_bps: u64,
    },
    DexSwap {
        trader: Addr,
        pool_id: u64,
        denom_in: String,
        amount_in: Uint128,
        min_amount_out: Uint128,
    },
    DexAddLiquidity {
        provider: Addr,
        pool_id: u64,
        amount_a: Uint128,
        amount_b: Uint128,
    },
    DexRemoveLiquidity {
        provider: Addr,
        pool_id: u64,
        shares: Uint128,
    },
    ComputeSubmitRequest {
        requester: Addr,
        provider: Addr,
        max_payment: Uint128,
    },
    ComputeRegisterProvider {
        address: Addr,
        endpoint_url: String,
        stake_amount: Uint128,
    },
    ComputeSubmitResult {
        provider: Addr,
        request_id: u64,
        result_commitment: Binary,
        proof: Binary,
    },
    OracleSubmitPrice {
        validator: Addr,
        feeder: Addr,
        asset: String,
        price: Decimal,
        timestamp: i64,
    },
    OracleDelegateFeedConsent {
        validator: Addr,
        feeder: Addr,
    },
}

impl Msg {
    /// Per-operation gas ceiling. Kinds with no override fall back to the
    /// global per-message ceiling.
    pub fn gas_ceiling(&self) -> u64 {
        match self {
            Msg::DexCreatePool { .. } => 300_000,
            Msg::DexSwap { .. } => 200_000,
            Msg::DexAddLiquidity { .. } | Msg::DexRemoveLiquidity { .. } => 150_000,
            Msg::ComputeSubmitRequest { .. } => 250_000,
            Msg::ComputeSubmitResult { .. } => 500_000,
            Msg::ComputeRegisterProvider { .. } => 500_000,
            Msg::OracleSubmitPrice { .. } => 100_000,
            Msg::OracleDelegateFeedConsent { .. } => 500_000,
        }
    }

    fn non_empty(s: &str) -> bool {
        !s.trim().is_empty()
    }

    /// Static, state-independent syntax checks.
    pub fn validate_basic(&self) -> Result<(), AnteError> {
        match self {
            Msg::DexCreatePool { denom_a, denom_b, amount_a, amount_b, fee_bps, .. } => {
                if !Self::non_empty(denom_a) || !Self::non_empty(denom_b) || denom_a == denom_b {
                    return Err(AnteError::InvalidMessage("pool denoms must be non-empty and distinct".into()));
                }
                if amount_a.is_zero() || amount_b.is_zero() {
                    return Err(AnteError::InvalidMessage("initial liquidity amounts must be positive".into()));
                }
                if *fee_bps >= 10_000 {
                    return Err(AnteError::InvalidMessage("fee_bps must be less than 10000".into()));
                }
                Ok(())
            }
            Msg::DexSwap { denom_in, amount_in, .. } => {
                if !Self::non_empty(denom_in) {
                    return Err(AnteError::InvalidMessage("swap denom must be non-empty".into()));
                }
                if amount_in.is_zero() {
                    return Err(AnteError::InvalidMessage("amount_in must be positive".into()));
                }
                Ok(())
            }
            Msg::DexAddLiquidity { amount_a, amount_b, .. } => {
                if amount_a.is_zero() || amount_b.is_zero() {
                    return Err(AnteError::InvalidMessage("liquidity amounts must be positive".into()));
                }
                Ok(())
            }
            Msg::DexRemoveLiquidity { shares, .. } => {
                if shares.is_zero() {
                    return Err(AnteError::InvalidMessage("shares must be positive".into()));
                }
                Ok(())
            }
            Msg::ComputeSubmitRequest { .. } => Ok(()),
            Msg::ComputeRegisterProvider { endpoint_url, .. } => {
                if !Self::non_empty(endpoint_url) {
                    return Err(AnteError::InvalidMessage("endpoint_url must be non-empty".into()));
                }
                Ok(())
            }
            Msg::ComputeSubmitResult { .. } => Ok(()),
            Msg::OracleSubmitPrice { asset, price, .. } => {
                if !Self::non_empty(asset) {
                    return Err(AnteError::InvalidMessage("asset symbol must be non-empty".into()));
                }
                if price.is_zero() {
                    return Err(AnteError::InvalidMessage("price must be positive".into()));
                }
                Ok(())
            }
            Msg::OracleDelegateFeedConsent { .. } => Ok(()),
        }
    }
}

/// A transaction as the ante chain sees it: the parts relevant to
/// admission, independent of the wire encoding.
#[cw_serde]
pub struct Tx {
    pub signer: Addr,
    pub sequence: u64,
    pub messages: Vec<Msg>,
    pub gas_limit: u64,
    pub memo: String,
    /// `0` means no timeout.
    pub timeout_height: i64,
    pub extension_options: Vec<String>,
    pub fee_amount: Uint128,
    pub fee_denom: String,
}
