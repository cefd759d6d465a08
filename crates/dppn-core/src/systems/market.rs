//! Market - product catalog, price formation, purchases, and statistics.
//!
//! The market owns its catalog and an append-only transaction log. It
//! reads population wealth as a plain balance slice, so the engine decides
//! when the snapshot is taken (once per tick, before the per-product loop).

use crate::components::{Wallet, Wellbeing};
use dppn_logic::indicators;
use dppn_logic::pricing::{self, ProductCategory};
use serde::{Deserialize, Serialize};

/// Demand feedback added to a product by each purchase.
const PURCHASE_DEMAND_BUMP: f64 = 0.1;

/// Happiness gained per unit of product quality.
const QUALITY_CHEER_FACTOR: f32 = 5.0;

/// Catalog seed data for one product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSpec {
    pub name: String,
    pub category: ProductCategory,
    pub base_price: f64,
    pub quality: f32,
}

impl ProductSpec {
    pub fn new(
        name: impl Into<String>,
        category: ProductCategory,
        base_price: f64,
        quality: f32,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            base_price,
            quality,
        }
    }
}

/// A tradable product with its live market state. Base price and quality
/// are immutable; price, demand, and supply are recomputed every tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub category: ProductCategory,
    pub base_price: f64,
    pub quality: f32,
    pub current_price: f64,
    pub demand: f64,
    pub supply: f64,
}

/// Immutable purchase record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub day: u32,
    pub citizen_id: u32,
    pub product_id: u32,
    pub price: f64,
    pub category: ProductCategory,
}

/// Raised when a product's price moves more than the alert threshold
/// within a single tick.
#[derive(Debug, Clone, Serialize)]
pub struct PriceAlert {
    pub product_id: u32,
    pub name: String,
    pub old_price: f64,
    pub new_price: f64,
}

/// Why a purchase attempt was refused. The attempt is a strict no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseError {
    UnknownProduct,
    InsufficientFunds,
}

impl std::fmt::Display for PurchaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PurchaseError::UnknownProduct => write!(f, "no product with that id"),
            PurchaseError::InsufficientFunds => write!(f, "balance below product price"),
        }
    }
}

impl std::error::Error for PurchaseError {}

/// Per-category slice of the market statistics.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryStatistics {
    pub category: ProductCategory,
    pub average_price: f64,
    pub total_demand: f64,
    pub product_count: usize,
}

/// On-demand market statistics for external consumers.
#[derive(Debug, Clone, Serialize)]
pub struct MarketStatistics {
    pub price_index: f64,
    pub total_products: usize,
    pub total_transactions: usize,
    pub transaction_volume: f64,
    pub categories: Vec<CategoryStatistics>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    products: Vec<Product>,
    transactions: Vec<Transaction>,
    total_transaction_volume: f64,
    price_index: f64,
}

impl Market {
    /// Build a market from catalog seed data. Products get dense ids
    /// starting at 1, in catalog order; prices start at base.
    pub fn new(catalog: &[ProductSpec]) -> Self {
        let products = catalog
            .iter()
            .enumerate()
            .map(|(index, spec)| Product {
                id: index as u32 + 1,
                name: spec.name.clone(),
                category: spec.category,
                base_price: spec.base_price,
                quality: spec.quality,
                current_price: spec.base_price,
                demand: 1.0,
                supply: 1.0,
            })
            .collect();

        Self {
            products,
            transactions: Vec::new(),
            total_transaction_volume: 0.0,
            price_index: 100.0,
        }
    }

    /// Reprice the whole catalog from population wealth and inflation.
    ///
    /// The wealth factor (average balance / 100) is computed once from the
    /// given snapshot and drives demand and supply for every product.
    /// Returns the price alerts raised by movements above the threshold.
    pub fn update_conditions(&mut self, balances: &[f64], inflation_rate: f64) -> Vec<PriceAlert> {
        let wealth_factor = indicators::mean(balances) / pricing::WEALTH_NORMALIZATION;
        let mut alerts = Vec::new();

        for product in &mut self.products {
            product.demand = pricing::demand_level(product.category, wealth_factor);
            product.supply = pricing::supply_level(wealth_factor);

            let old_price = product.current_price;
            product.current_price = pricing::clearing_price(
                product.base_price,
                product.demand,
                product.supply,
                inflation_rate,
            );

            if pricing::relative_change(old_price, product.current_price)
                > pricing::PRICE_ALERT_THRESHOLD
            {
                log::warn!(
                    "price alert: {} {:.1} -> {:.1} PP",
                    product.name,
                    old_price,
                    product.current_price
                );
                alerts.push(PriceAlert {
                    product_id: product.id,
                    name: product.name.clone(),
                    old_price,
                    new_price: product.current_price,
                });
            }
        }

        let current: Vec<f64> = self.products.iter().map(|p| p.current_price).collect();
        let base: Vec<f64> = self.products.iter().map(|p| p.base_price).collect();
        self.price_index = pricing::price_index(&current, &base);

        alerts
    }

    /// Execute a purchase at the product's current price. On success the
    /// price is debited, happiness rises with quality, the transaction is
    /// logged, and the product's demand is bumped, so buying today raises
    /// tomorrow's price.
    pub fn purchase(
        &mut self,
        citizen_id: u32,
        wallet: &mut Wallet,
        wellbeing: &mut Wellbeing,
        product_id: u32,
        day: u32,
    ) -> Result<f64, PurchaseError> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or(PurchaseError::UnknownProduct)?;

        let price = product.current_price;
        if !wallet.debit(price) {
            return Err(PurchaseError::InsufficientFunds);
        }

        wellbeing.cheer(product.quality * QUALITY_CHEER_FACTOR);
        product.demand += PURCHASE_DEMAND_BUMP;

        self.transactions.push(Transaction {
            day,
            citizen_id,
            product_id,
            price,
            category: product.category,
        });
        self.total_transaction_volume += price;

        Ok(price)
    }

    /// Products priced within the budget, best quality first. Ties keep
    /// catalog order.
    pub fn affordable(&self, budget: f64, category: Option<ProductCategory>) -> Vec<&Product> {
        let mut matches: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .filter(|p| p.current_price <= budget)
            .collect();
        matches.sort_by(|a, b| {
            b.quality
                .partial_cmp(&a.quality)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches
    }

    /// Market statistics for external consumers.
    pub fn statistics(&self) -> MarketStatistics {
        let categories = ProductCategory::ALL
            .iter()
            .filter_map(|&category| {
                let prices: Vec<f64> = self
                    .products
                    .iter()
                    .filter(|p| p.category == category)
                    .map(|p| p.current_price)
                    .collect();
                if prices.is_empty() {
                    return None;
                }
                let total_demand = self
                    .products
                    .iter()
                    .filter(|p| p.category == category)
                    .map(|p| p.demand)
                    .sum();
                Some(CategoryStatistics {
                    category,
                    average_price: indicators::mean(&prices),
                    total_demand,
                    product_count: prices.len(),
                })
            })
            .collect();

        MarketStatistics {
            price_index: self.price_index,
            total_products: self.products.len(),
            total_transactions: self.transactions.len(),
            transaction_volume: self.total_transaction_volume,
            categories,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn total_transaction_volume(&self) -> f64 {
        self.total_transaction_volume
    }

    pub fn price_index(&self) -> f64 {
        self.price_index
    }
}

impl Default for Market {
    fn default() -> Self {
        Self::new(&default_catalog())
    }
}

/// The seeded catalog: 15 products, 3 per category.
pub fn default_catalog() -> Vec<ProductSpec> {
    use ProductCategory::*;
    vec![
        ProductSpec::new("Basic Food Ration", Food, 20.0, 0.8),
        ProductSpec::new("Quality Food Package", Food, 40.0, 1.2),
        ProductSpec::new("Organic Premium Food", Food, 60.0, 1.5),
        ProductSpec::new("Basic Housing", Housing, 100.0, 0.7),
        ProductSpec::new("Comfortable Apartment", Housing, 200.0, 1.3),
        ProductSpec::new("Luxury Residence", Housing, 500.0, 2.0),
        ProductSpec::new("Online Course", Education, 30.0, 1.0),
        ProductSpec::new("Professional Training", Education, 80.0, 1.5),
        ProductSpec::new("University Program", Education, 150.0, 2.0),
        ProductSpec::new("Basic Healthcare", Healthcare, 25.0, 1.0),
        ProductSpec::new("Advanced Medical Care", Healthcare, 75.0, 1.8),
        ProductSpec::new("Premium Health Package", Healthcare, 120.0, 2.2),
        ProductSpec::new("Entertainment", Luxury, 50.0, 1.2),
        ProductSpec::new("Luxury Goods", Luxury, 100.0, 1.8),
        ProductSpec::new("Exclusive Services", Luxury, 200.0, 2.5),
    ]
}
