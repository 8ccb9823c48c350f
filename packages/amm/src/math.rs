use cosmwasm_std::{Uint128, Uint256};
use integer_sqrt::IntegerSquareRoot;

use crate::error::ContractError;

/// Maximum fraction of the offer reserve a single swap may consume:
/// `amtIn ≤ 0.3·reserveIn`.
pub const MEV_BOUND_NUMERATOR: u128 = 3;
pub const MEV_BOUND_DENOMINATOR: u128 = 10;

const BPS_DENOMINATOR: u128 = 10_000;

/// `⌊√(amtA·amtB)⌋`, the initial LP share mint for `CreatePool`.
pub fn initial_shares(amount_a: Uint128, amount_b: Uint128) -> Result<Uint128, ContractError> {
    let product: u128 = amount_a
        .u128()
        .checked_mul(amount_b.u128())
        .ok_or_else(|| ContractError::InvariantViolation("initial liquidity product overflowed".into()))?;
    Ok(Uint128::new(product.integer_sqrt()))
}

/// Checks neither initial deposit amount is more than `max_multiple` times
/// the other, the `1 : 1_000_000` bound `CreatePool` enforces on its own
/// two amounts — there is no existing reserve to compare
/// against yet, so this guards against precision-destroying skew rather
/// than price-impact skew.
pub fn initial_ratio_bounded(amount_a: Uint128, amount_b: Uint128, max_multiple: u128) -> bool {
    let a = Uint256::from(amount_a);
    let b = Uint256::from(amount_b);
    let max_multiple = Uint256::from(max_multiple);
    a <= b * max_multiple && b <= a * max_multiple
}

/// Checks the deposit ratio lies within the allowed skew of the existing
/// pool ratio, the `±1%` tolerance `AddLiquidity` enforces.
pub fn ratio_within_tolerance(
    reserve_a: Uint128,
    reserve_b: Uint128,
    amount_a: Uint128,
    amount_b: Uint128,
    tolerance_numerator: u128,
    tolerance_denominator: u128,
) -> bool {
    // amount_a/amount_b should be within `tolerance` of reserve_a/reserve_b:
    // |amount_a * reserve_b - amount_b * reserve_a| <= tolerance * amount_b * reserve_a
    let lhs = Uint256::from(amount_a) * Uint256::from(reserve_b);
    let rhs = Uint256::from(amount_b) * Uint256::from(reserve_a);
    let diff = if lhs > rhs { lhs - rhs } else { rhs - lhs };
    let bound = rhs * Uint256::from(tolerance_numerator) / Uint256::from(tolerance_denominator);
    diff <= bound
}

/// `shares = min(amtA·totalShares/reserveA, amtB·totalShares/reserveB)`
/// ( `AddLiquidity`).
pub fn add_liquidity_shares(
    reserve_a: Uint128,
    reserve_b: Uint128,
    total_shares: Uint128,
    amount_a: Uint128,
    amount_b: Uint128,
) -> Result<Uint128, ContractError> {
    let shares_a = Uint256::from(amount_a) * Uint256::from(total_shares) / Uint256::from(reserve_a);
    let shares_b = Uint256::from(amount_b) * Uint256::from(total_shares) / Uint256::from(reserve_b);
    let shares = shares_a.min(shares_b);
    shares
        .try_into()
        .map_err(|_| ContractError::InvariantViolation("minted share amount overflowed u128".into()))
}

/// `amtX = shares·reserveX/totalShares` for each side (
/// `RemoveLiquidity`).
pub fn remove_liquidity_amounts(
    reserve_a: Uint128,
    reserve_b: Uint128,
    total_shares: Uint128,
    shares: Uint128,
) -> Result<(Uint128, Uint128), ContractError> {
    let amount_a = Uint256::from(shares) * Uint256::from(reserve_a) / Uint256::from(total_shares);
    let amount_b = Uint256::from(shares) * Uint256::from(reserve_b) / Uint256::from(total_shares);
    let amount_a = amount_a
        .try_into()
        .map_err(|_| ContractError::InvariantViolation("withdraw amount overflowed u128".into()))?;
    let amount_b = amount_b
        .try_into()
        .map_err(|_| ContractError::InvariantViolation("withdraw amount overflowed u128".into()))?;
    Ok((amount_a, amount_b))
}

/// Output of a constant-product swap, after fees:
/// `amtInAfterFee = amtIn·(10000−feeBps)/10000`;
/// `amtOut = amtInAfterFee·reserveOut / (reserveIn + amtInAfterFee)`.
/// Division rounds toward zero, guaranteeing `k' >= k` (fees make it
/// strictly greater).
/// Splits an offered amount into the portion that reaches the constant
/// product curve and the portion retained as the pool's swap fee.
pub fn fee_split(amount_in: Uint128, fee_bps: u64) -> (Uint128, Uint128) {
    let after_fee = Uint256::from(amount_in) * Uint256::from(BPS_DENOMINATOR - fee_bps as u128)
        / Uint256::from(BPS_DENOMINATOR);
    let after_fee: Uint128 = after_fee.try_into().expect("fee split cannot overflow u128");
    (after_fee, amount_in - after_fee)
}

pub fn compute_swap(
    reserve_in: Uint128,
    reserve_out: Uint128,
    amount_in: Uint128,
    fee_bps: u64,
) -> Result<Uint128, ContractError> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(ContractError::PoolNotFound {});
    }
    if amount_in.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }

    let (amount_in_after_fee, _fee) = fee_split(amount_in, fee_bps);

    let numerator = Uint256::from(amount_in_after_fee) * Uint256::from(reserve_out);
    let denominator = Uint256::from(reserve_in) + Uint256::from(amount_in_after_fee);
    let amount_out = numerator / denominator;

    amount_out
        .try_into()
        .map_err(|_| ContractError::InvariantViolation("swap output overflowed u128".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scenario_pool_creation_and_swap() {
        let shares = initial_shares(Uint128::new(1_000_000), Uint128::new(2_000_000)).unwrap();
        assert_eq!(shares, Uint128::new(1_414_213));

        let amount_out = compute_swap(
            Uint128::new(1_000_000),
            Uint128::new(2_000_000),
            Uint128::new(100_000),
            30,
        )
        .unwrap();
        assert_eq!(amount_out, Uint128::new(181_322));
    }

    proptest! {
        #[test]
        fn k_never_decreases_on_swap(
            reserve_in in 1_000u128..1_000_000_000_000u128,
            reserve_out in 1_000u128..1_000_000_000_000u128,
            amount_in in 1u128..300_000_000_000u128,
            fee_bps in 0u64..9999u64,
        ) {
            // respect the MEV bound so the scenario is one the engine would
            // actually accept
            prop_assume!(amount_in * MEV_BOUND_DENOMINATOR <= reserve_in * MEV_BOUND_NUMERATOR);

            let amount_out = compute_swap(
                Uint128::new(reserve_in),
                Uint128::new(reserve_out),
                Uint128::new(amount_in),
                fee_bps,
            );
            if let Ok(amount_out) = amount_out {
                if amount_out < Uint128::new(reserve_out) {
                    let k_before = Uint256::from(reserve_in) * Uint256::from(reserve_out);
                    let new_reserve_in = Uint256::from(reserve_in) + Uint256::from(amount_in);
                    let new_reserve_out = Uint256::from(reserve_out) - Uint256::from(amount_out);
                    let k_after = new_reserve_in * new_reserve_out;
                    prop_assert!(k_after >= k_before);
                }
            }
        }
    }

    #[test]
    fn add_then_remove_round_trips_modulo_rounding() {
        let reserve_a = Uint128::new(1_000_000);
        let reserve_b = Uint128::new(2_000_000);
        let total_shares = initial_shares(reserve_a, reserve_b).unwrap();

        let deposit_a = Uint128::new(1_000_000);
        let deposit_b = Uint128::new(2_000_000);
        let minted = add_liquidity_shares(reserve_a, reserve_b, total_shares, deposit_a, deposit_b).unwrap();

        let new_reserve_a = reserve_a + deposit_a;
        let new_reserve_b = reserve_b + deposit_b;
        let new_total_shares = total_shares + minted;

        let (withdraw_a, withdraw_b) =
            remove_liquidity_amounts(new_reserve_a, new_reserve_b, new_total_shares, minted).unwrap();

        // Rounding is always toward zero, so the withdrawal can never exceed
        // the deposit.
        assert!(withdraw_a <= deposit_a);
        assert!(withdraw_b <= deposit_b);
        // ...and by at most a handful of atomic units.
        assert!(deposit_a - withdraw_a <= Uint128::new(2));
        assert!(deposit_b - withdraw_b <= Uint128::new(2));
    }
}
