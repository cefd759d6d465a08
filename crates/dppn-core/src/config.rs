//! Construction-time simulation configuration.
//!
//! Consumed once when the simulator is built and never mutated afterwards.
//! Validation runs before the first tick so a malformed configuration
//! fails fast instead of corrupting a run.

use crate::components::AgentType;
use crate::rng::DEFAULT_SEED;
use crate::systems::market::{default_catalog, ProductSpec};
use serde::{Deserialize, Serialize};

/// Base income per agent type; initial balances are drawn uniformly from
/// [0.5×, 1.5×] of the type's base income.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseIncomes {
    pub worker: f64,
    pub entrepreneur: f64,
    pub student: f64,
    pub retiree: f64,
}

impl BaseIncomes {
    pub fn for_type(&self, agent_type: AgentType) -> f64 {
        match agent_type {
            AgentType::Worker => self.worker,
            AgentType::Entrepreneur => self.entrepreneur,
            AgentType::Student => self.student,
            AgentType::Retiree => self.retiree,
        }
    }
}

impl Default for BaseIncomes {
    fn default() -> Self {
        Self {
            worker: 150.0,
            entrepreneur: 200.0,
            student: 80.0,
            retiree: 120.0,
        }
    }
}

/// Full simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of citizens to generate.
    pub population_size: u32,
    /// Default run length in days.
    pub days: u32,
    /// Daily universal basic income, in PP.
    pub basic_income: f64,
    /// Redistribution tax rate, in [0, 1].
    pub tax_rate: f64,
    /// Seed for the deterministic RNG.
    pub seed: u64,
    pub base_incomes: BaseIncomes,
    /// Product catalog seed data for the market.
    pub products: Vec<ProductSpec>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population_size: 1000,
            days: 365,
            basic_income: 100.0,
            tax_rate: 0.1,
            seed: DEFAULT_SEED,
            base_incomes: BaseIncomes::default(),
            products: default_catalog(),
        }
    }
}

impl SimulationConfig {
    /// Check the configuration before any tick runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tax_rate.is_finite() || !(0.0..=1.0).contains(&self.tax_rate) {
            return Err(ConfigError::TaxRateOutOfRange(self.tax_rate));
        }
        if !self.basic_income.is_finite() || self.basic_income < 0.0 {
            return Err(ConfigError::InvalidBasicIncome(self.basic_income));
        }
        for agent_type in AgentType::ALL {
            let income = self.base_incomes.for_type(agent_type);
            if !income.is_finite() || income <= 0.0 {
                return Err(ConfigError::InvalidBaseIncome { agent_type, income });
            }
        }
        for product in &self.products {
            if !product.base_price.is_finite() || product.base_price <= 0.0 {
                return Err(ConfigError::InvalidProductPrice {
                    name: product.name.clone(),
                    base_price: product.base_price,
                });
            }
        }
        Ok(())
    }
}

/// Errors raised by configuration validation.
#[derive(Debug)]
pub enum ConfigError {
    TaxRateOutOfRange(f64),
    InvalidBasicIncome(f64),
    InvalidBaseIncome { agent_type: AgentType, income: f64 },
    InvalidProductPrice { name: String, base_price: f64 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::TaxRateOutOfRange(rate) => {
                write!(f, "tax rate {} outside [0, 1]", rate)
            }
            ConfigError::InvalidBasicIncome(amount) => {
                write!(f, "basic income {} must be finite and non-negative", amount)
            }
            ConfigError::InvalidBaseIncome { agent_type, income } => {
                write!(
                    f,
                    "base income {} for {} must be finite and positive",
                    income,
                    agent_type.label()
                )
            }
            ConfigError::InvalidProductPrice { name, base_price } => {
                write!(
                    f,
                    "product {:?} has invalid base price {}",
                    name, base_price
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
