use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};

/// Two token denominations in their canonical (sorted) order, plus their
/// reserves, fee parameter, and LP accounting.
#[cw_serde]
pub struct Pool {
    pub id: u64,
    pub denom_a: String,
    pub denom_b: String,
    pub reserve_a: Uint128,
    pub reserve_b: Uint128,
    /// Basis points, strictly less than 10_000.
    pub fee_bps: u64,
    pub total_shares: Uint128,
    pub active: bool,
}

impl Pool {
    /// The constant product `k = reserveA * reserveB`, computed in 256-bit
    /// space so it never silently wraps even near `u128::MAX` reserves.
    pub fn k(&self) -> cosmwasm_std::Uint256 {
        cosmwasm_std::Uint256::from(self.reserve_a) * cosmwasm_std::Uint256::from(self.reserve_b)
    }

    pub fn reserve_of(&self, denom: &str) -> Option<Uint128> {
        if denom == self.denom_a {
            Some(self.reserve_a)
        } else if denom == self.denom_b {
            Some(self.reserve_b)
        } else {
            None
        }
    }

    pub fn other_denom(&self, denom: &str) -> Option<&str> {
        if denom == self.denom_a {
            Some(&self.denom_b)
        } else if denom == self.denom_b {
            Some(&self.denom_a)
        } else {
            None
        }
    }
}

/// Reporting-only rolling statistics refreshed at EndBlock; never alters
/// reserves.
#[cw_serde]
#[derive(Default)]
pub struct PoolStats {
    pub volume_a: Uint128,
    pub volume_b: Uint128,
    pub fees_collected_a: Uint128,
    pub fees_collected_b: Uint128,
    pub last_updated_height: i64,
}

/// An LP's share balance in one pool.
#[cw_serde]
pub struct LpPosition {
    pub owner: Addr,
    pub pool_id: u64,
    pub shares: Uint128,
    pub last_modified_height: i64,
}

/// Orders a token pair canonically so `{A,B}` and `{B,A}` resolve to the
/// same pool, the same role `pair_key` plays in
/// `contracts/factory/src/state.rs`.
pub fn canonical_pair(denom_x: &str, denom_y: &str) -> (String, String) {
    if denom_x <= denom_y {
        (denom_x.to_string(), denom_y.to_string())
    } else {
        (denom_y.to_string(), denom_x.to_string())
    }
}

fn pair_key(denom_a: &str, denom_b: &str) -> Vec<u8> {
    let (a, b) = canonical_pair(denom_a, denom_b);
    [a.as_bytes(), b"/", b.as_bytes()].concat()
}

pub const NEXT_POOL_ID: Item<u64> = Item::new("next_pool_id");
pub const POOLS: Map<u64, Pool> = Map::new("pools");
pub const POOL_BY_PAIR: Map<&[u8], u64> = Map::new("pool_by_pair");
pub const POOL_STATS: Map<u64, PoolStats> = Map::new("pool_stats");
/// Keyed by `(pool_id, owner)`.
pub const LP_POSITIONS: Map<(u64, &Addr), LpPosition> = Map::new("lp_positions");

pub fn pool_pair_key(denom_a: &str, denom_b: &str) -> Vec<u8> {
    pair_key(denom_a, denom_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_pair_is_order_independent() {
        assert_eq!(canonical_pair("uatom", "uosmo"), canonical_pair("uosmo", "uatom"));
        assert_eq!(pool_pair_key("uatom", "uosmo"), pool_pair_key("uosmo", "uatom"));
    }
}
