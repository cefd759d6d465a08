//! Daily economic decision rule.
//!
//! The rule itself is pure: the two uniform draws it consumes are sampled
//! by the caller from the simulation's RNG and passed in, so the logic is
//! testable without randomness and the RNG stream stays in one place.

use serde::{Deserialize, Serialize};

/// The closed set of decisions a citizen can emit in one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    BuyProducts,
    InvestInEducation,
    BuyLuxury,
}

/// Daily cost of food plus basic housing.
pub const BASIC_NEEDS_COST: f64 = 45.0;

/// Minimum balance before a citizen considers an education investment.
pub const EDUCATION_FUNDS_THRESHOLD: f64 = 50.0;

/// Citizens at or above this education level stop investing in courses.
pub const EDUCATION_LEVEL_CEILING: f32 = 8.0;

/// Enrollment probability is learning ability scaled by this factor.
pub const EDUCATION_INVEST_FACTOR: f32 = 0.3;

/// Minimum balance before luxury spending is considered.
pub const LUXURY_FUNDS_THRESHOLD: f64 = 150.0;

/// Risk tolerance required to consider luxury spending.
pub const LUXURY_RISK_THRESHOLD: f32 = 0.5;

/// Chance of a luxury purchase once the gates are passed.
pub const LUXURY_CHANCE: f32 = 0.2;

/// Secondary balance guard the simulator applies before enrollment,
/// above the course-specific cost check.
pub const ENROLL_MIN_BALANCE: f64 = 20.0;

/// Cost of the generic basic-goods purchase, outside the market catalog.
pub const GENERIC_GOODS_COST: f64 = 25.0;

/// Happiness gained from the generic basic-goods purchase.
pub const GENERIC_GOODS_CHEER: f32 = 5.0;

/// The citizen state the decision rule reads.
#[derive(Debug, Clone, Copy)]
pub struct DecisionInputs {
    pub balance: f64,
    pub education_level: f32,
    pub risk_tolerance: f32,
    pub learning_ability: f32,
}

/// Evaluate one day's decisions. Rules fire independently, so several
/// tags can be emitted at once; the emitted order is the application
/// order. `education_draw` and `luxury_draw` are uniform samples in
/// [0, 1).
pub fn decide(inputs: &DecisionInputs, education_draw: f32, luxury_draw: f32) -> Vec<Decision> {
    let mut decisions = Vec::new();

    if inputs.balance > BASIC_NEEDS_COST {
        decisions.push(Decision::BuyProducts);
    }

    if inputs.balance > EDUCATION_FUNDS_THRESHOLD
        && inputs.education_level < EDUCATION_LEVEL_CEILING
        && education_draw < inputs.learning_ability * EDUCATION_INVEST_FACTOR
    {
        decisions.push(Decision::InvestInEducation);
    }

    if inputs.balance > LUXURY_FUNDS_THRESHOLD
        && inputs.risk_tolerance > LUXURY_RISK_THRESHOLD
        && luxury_draw < LUXURY_CHANCE
    {
        decisions.push(Decision::BuyLuxury);
    }

    decisions
}
