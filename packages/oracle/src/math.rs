use cosmwasm_std::{Decimal, Uint128};

/// `0.6745`, the constant that turns MAD into a normal-equivalent scale
/// estimator for the modified z-score.
fn modz_constant() -> Decimal {
    Decimal::from_ratio(6745u128, 10_000u128)
}

/// Median of a non-empty slice of already-sorted decimals.
fn median_of_sorted(sorted: &[Decimal]) -> Decimal {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        let a = sorted[n / 2 - 1];
        let b = sorted[n / 2];
        (a + b) / Decimal::from_ratio(2u128, 1u128)
    }
}

pub fn median(prices: &[Decimal]) -> Decimal {
    let mut sorted = prices.to_vec();
    sorted.sort();
    median_of_sorted(&sorted)
}

fn abs_diff(a: Decimal, b: Decimal) -> Decimal {
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// Median absolute deviation: `median(|pᵢ − median|)`.
pub fn median_absolute_deviation(prices: &[Decimal], center: Decimal) -> Decimal {
    let mut deviations: Vec<Decimal> = prices.iter().map(|p| abs_diff(*p, center)).collect();
    deviations.sort();
    median_of_sorted(&deviations)
}

/// Nearest-rank percentile (`p` in `[0, 100]`) of an already-sorted slice.
fn percentile_of_sorted(sorted: &[Decimal], p: u64) -> Decimal {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = (Decimal::from_ratio(p, 100u128) * Decimal::from_ratio((n - 1) as u128, 1u128))
        .to_uint_floor()
        .u128() as usize;
    sorted[rank.min(n - 1)]
}

/// `[Q1 − k·IQR, Q3 + k·IQR]`, clamped at zero on the low side since prices
/// are never negative.
pub fn iqr_bounds(prices: &[Decimal], k: Decimal) -> (Decimal, Decimal) {
    let mut sorted = prices.to_vec();
    sorted.sort();
    let q1 = percentile_of_sorted(&sorted, 25);
    let q3 = percentile_of_sorted(&sorted, 75);
    let iqr = q3 - q1;
    let spread = iqr * k;
    let lower = q1.checked_sub(spread).unwrap_or(Decimal::zero());
    let upper = q3 + spread;
    (lower, upper)
}

/// A submission is an outlier if its modified z-score exceeds `threshold`,
/// or it falls outside the IQR fence. When `mad` is zero (every submission
/// agrees), only a strictly different price is flagged.
pub fn is_outlier(
    price: Decimal,
    center: Decimal,
    mad: Decimal,
    threshold: Decimal,
    iqr_lower: Decimal,
    iqr_upper: Decimal,
) -> bool {
    let outside_iqr = price < iqr_lower || price > iqr_upper;
    let diff = abs_diff(price, center);
    let modz_exceeds = if mad.is_zero() {
        !diff.is_zero()
    } else {
        modz_constant() * diff > threshold * mad
    };
    modz_exceeds || outside_iqr
}

/// Voting-power-weighted median: the price at which cumulative weight
/// (sorted ascending) first reaches half of the total weight.
pub fn weighted_median(mut prices_with_power: Vec<(Decimal, Uint128)>) -> Decimal {
    prices_with_power.sort_by(|a, b| a.0.cmp(&b.0));
    let total: Uint128 = prices_with_power
        .iter()
        .fold(Uint128::zero(), |acc, (_, vp)| acc + *vp);
    let half = total / Uint128::new(2);
    let mut cumulative = Uint128::zero();
    for (price, vp) in &prices_with_power {
        cumulative += *vp;
        if cumulative * Uint128::new(2) >= total || cumulative > half {
            return *price;
        }
    }
    prices_with_power
        .last()
        .map(|(p, _)| *p)
        .unwrap_or_else(Decimal::zero)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn outlier_detection_flags_far_submissions() {
        let prices = vec![
            dec("100"),
            dec("101"),
            dec("100.5"),
            dec("101.5"),
            dec("100.2"),
            dec("1000"),
            dec("1000"),
        ];
        let center = median(&prices);
        let mad = median_absolute_deviation(&prices, center);
        let (lower, upper) = iqr_bounds(&prices, Decimal::permille(1500));

        let outliers: Vec<Decimal> = prices
            .iter()
            .copied()
            .filter(|p| is_outlier(*p, center, mad, Decimal::permille(3500), lower, upper))
            .collect();
        assert_eq!(outliers, vec![dec("1000"), dec("1000")]);
    }

    #[test]
    fn unanimous_submissions_are_never_outliers() {
        let prices = vec![dec("42"); 7];
        let center = median(&prices);
        let mad = median_absolute_deviation(&prices, center);
        let (lower, upper) = iqr_bounds(&prices, Decimal::permille(1500));
        for p in prices {
            assert!(!is_outlier(p, center, mad, Decimal::permille(3500), lower, upper));
        }
    }

    #[test]
    fn weighted_median_respects_voting_power() {
        let submissions = vec![
            (dec("100"), Uint128::new(10)),
            (dec("200"), Uint128::new(1)),
            (dec("300"), Uint128::new(1)),
        ];
        // 10 of 12 total power sits at 100, so the weighted median is 100.
        assert_eq!(weighted_median(submissions), dec("100"));
    }
}
