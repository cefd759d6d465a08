//! Aggregate economic indicators - inequality, monetary growth, human capital.
//!
//! All functions are total: degenerate inputs (empty population, zero
//! supply, zero balance sum) return defined fallback values instead of
//! dividing by zero. These are normal conditions on day 0 of a run.

/// Mean of a slice, 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Discrete Gini coefficient over token balances.
///
/// Sorts balances ascending and accumulates the gap between the population
/// share and the balance share at each rank:
///
/// G = (2/n) · Σᵢ (i/n − cumulative_balanceᵢ/total)
///
/// Result is in [0, 1]; 0 = perfect equality. Empty populations and
/// all-zero balances yield 0.
pub fn gini(balances: &[f64]) -> f64 {
    let n = balances.len();
    if n == 0 {
        return 0.0;
    }
    let total: f64 = balances.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }

    let mut sorted = balances.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut cumulative = 0.0;
    let mut deficit = 0.0;
    for (i, balance) in sorted.iter().enumerate() {
        cumulative += balance;
        deficit += (i + 1) as f64 / n as f64 - cumulative / total;
    }

    (2.0 * deficit / n as f64).clamp(0.0, 1.0)
}

/// Relative growth of the money supply since the previous measurement.
/// Returns 0 when there was no previous supply to compare against.
pub fn money_supply_growth(total_supply: f64, previous_supply: f64) -> f64 {
    if previous_supply <= 0.0 {
        return 0.0;
    }
    (total_supply - previous_supply) / previous_supply
}

/// Economic growth from human capital: 1% of the mean per-citizen
/// capital (education × health/100). Empty populations grow by 0.
pub fn human_capital_growth(human_capital: &[f64]) -> f64 {
    mean(human_capital) * 0.01
}

/// Inflation is money-supply growth in excess of real growth, floored at 0.
pub fn inflation(money_supply_growth: f64, economic_growth: f64) -> f64 {
    (money_supply_growth - economic_growth).max(0.0)
}

/// Share of citizens below the poverty line, as a percentage [0, 100].
pub fn poverty_rate(balances: &[f64], poverty_line: f64) -> f64 {
    if balances.is_empty() {
        return 0.0;
    }
    let poor = balances.iter().filter(|b| **b < poverty_line).count();
    poor as f64 / balances.len() as f64 * 100.0
}
