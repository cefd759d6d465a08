//! Price formation - demand/supply curves scaled by population wealth,
//! clearing prices with a hard floor, and the consumer price index.

use serde::{Deserialize, Serialize};

/// Product categories traded on the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Food,
    Housing,
    Education,
    Healthcare,
    Luxury,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 5] = [
        ProductCategory::Food,
        ProductCategory::Housing,
        ProductCategory::Education,
        ProductCategory::Healthcare,
        ProductCategory::Luxury,
    ];

    /// Demand each category sees before wealth scaling.
    pub fn base_demand(&self) -> f64 {
        match self {
            ProductCategory::Food => 2.0,
            ProductCategory::Housing => 1.5,
            ProductCategory::Education => 1.2,
            ProductCategory::Healthcare => 1.3,
            ProductCategory::Luxury => 0.5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProductCategory::Food => "food",
            ProductCategory::Housing => "housing",
            ProductCategory::Education => "education",
            ProductCategory::Healthcare => "healthcare",
            ProductCategory::Luxury => "luxury",
        }
    }
}

/// A product never trades below this fraction of its base price.
pub const PRICE_FLOOR_RATIO: f64 = 0.5;

/// Supply floor used in the demand/supply ratio.
pub const SUPPLY_FLOOR: f64 = 0.1;

/// Relative price movement above which a price alert is raised.
pub const PRICE_ALERT_THRESHOLD: f64 = 0.1;

/// Average balance is normalized against this to get the wealth factor.
pub const WEALTH_NORMALIZATION: f64 = 100.0;

/// Clearing price: base × (demand/supply) × (1 + inflation), floored at
/// half the base price. Supply is floored to avoid division by zero.
pub fn clearing_price(base_price: f64, demand: f64, supply: f64, inflation_rate: f64) -> f64 {
    let ratio = demand / supply.max(SUPPLY_FLOOR);
    let adjusted = base_price * ratio * (1.0 + inflation_rate);
    adjusted.max(base_price * PRICE_FLOOR_RATIO)
}

/// Demand for a category at the given wealth factor (average balance / 100).
///
/// Luxury demand only appears once average wealth exceeds the norm;
/// everything else saturates at double its base demand.
pub fn demand_level(category: ProductCategory, wealth_factor: f64) -> f64 {
    let multiplier = match category {
        ProductCategory::Luxury => (wealth_factor - 1.0).max(0.0),
        _ => wealth_factor.min(1.0),
    };
    category.base_demand() * (1.0 + multiplier)
}

/// Supply grows linearly with population wealth.
pub fn supply_level(wealth_factor: f64) -> f64 {
    1.0 + wealth_factor * 0.5
}

/// Consumer price index: mean current price over mean base price, ×100.
/// An empty catalog reports the base index of 100.
pub fn price_index(current_prices: &[f64], base_prices: &[f64]) -> f64 {
    if current_prices.is_empty() || base_prices.is_empty() {
        return 100.0;
    }
    let avg_current = current_prices.iter().sum::<f64>() / current_prices.len() as f64;
    let avg_base = base_prices.iter().sum::<f64>() / base_prices.len() as f64;
    if avg_base <= 0.0 {
        return 100.0;
    }
    avg_current / avg_base * 100.0
}

/// Relative magnitude of a price movement; 0 when there is no old price.
pub fn relative_change(old_price: f64, new_price: f64) -> f64 {
    if old_price <= 0.0 {
        return 0.0;
    }
    (new_price - old_price).abs() / old_price
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_floor_holds() {
        // Collapsed demand cannot push price below half of base
        let price = clearing_price(100.0, 0.0, 5.0, 0.0);
        assert!((price - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_price_floor_holds_at_zero_supply() {
        let price = clearing_price(100.0, 0.01, 0.0, 0.0);
        assert!(price >= 50.0);
    }

    #[test]
    fn test_zero_supply_uses_floor_not_infinity() {
        let price = clearing_price(20.0, 2.0, 0.0, 0.0);
        // demand/SUPPLY_FLOOR = 20× base
        assert!((price - 400.0).abs() < 1e-9);
        assert!(price.is_finite());
    }

    #[test]
    fn test_inflation_raises_price() {
        let flat = clearing_price(100.0, 1.0, 1.0, 0.0);
        let inflated = clearing_price(100.0, 1.0, 1.0, 0.2);
        assert!(inflated > flat);
        assert!((inflated - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_balanced_market_trades_at_base() {
        let price = clearing_price(80.0, 1.0, 1.0, 0.0);
        assert!((price - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_luxury_demand_needs_surplus_wealth() {
        // At or below the norm, luxury stays at base demand
        assert!((demand_level(ProductCategory::Luxury, 0.8) - 0.5).abs() < 1e-9);
        assert!((demand_level(ProductCategory::Luxury, 1.0) - 0.5).abs() < 1e-9);
        // Above it, demand scales with the excess
        assert!((demand_level(ProductCategory::Luxury, 1.5) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_staple_demand_saturates() {
        assert!((demand_level(ProductCategory::Food, 0.5) - 3.0).abs() < 1e-9);
        // Multiplier caps at 1 regardless of wealth
        assert!((demand_level(ProductCategory::Food, 4.0) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_supply_grows_with_wealth() {
        assert!((supply_level(0.0) - 1.0).abs() < 1e-9);
        assert!((supply_level(2.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_price_index_empty_catalog() {
        assert_eq!(price_index(&[], &[]), 100.0);
    }

    #[test]
    fn test_price_index_at_base_prices() {
        let base = [20.0, 40.0, 60.0];
        assert!((price_index(&base, &base) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_price_index_tracks_average() {
        let idx = price_index(&[30.0, 60.0, 90.0], &[20.0, 40.0, 60.0]);
        assert!((idx - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_relative_change_no_baseline() {
        assert_eq!(relative_change(0.0, 10.0), 0.0);
    }

    #[test]
    fn test_relative_change_symmetric_magnitude() {
        assert!((relative_change(100.0, 90.0) - 0.1).abs() < 1e-9);
        assert!((relative_change(100.0, 110.0) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_all_categories_have_positive_base_demand() {
        for category in ProductCategory::ALL {
            assert!(category.base_demand() > 0.0, "{:?}", category);
        }
    }
}
