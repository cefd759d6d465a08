//! Citizen components: identity, wallet, wellbeing, learning, traits.
//!
//! Components are pure data attached to citizen entities. The split
//! follows the subsystems that write them: Economy touches `Wallet` and
//! `Wellbeing`, EducationSystem touches `Learning` and `Wellbeing`, the
//! Market touches `Wallet` and `Wellbeing`. Behavior that spans the whole
//! population lives in systems.

use dppn_logic::courses::{CourseType, MAX_EDUCATION_LEVEL};
use serde::{Deserialize, Serialize};

/// The four agent archetypes of the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Worker,
    Entrepreneur,
    Student,
    Retiree,
}

impl AgentType {
    pub const ALL: [AgentType; 4] = [
        AgentType::Worker,
        AgentType::Entrepreneur,
        AgentType::Student,
        AgentType::Retiree,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgentType::Worker => "worker",
            AgentType::Entrepreneur => "entrepreneur",
            AgentType::Student => "student",
            AgentType::Retiree => "retiree",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    #[default]
    Unemployed,
    Employed,
}

/// Identity component. `id` is dense, assigned in creation order, and
/// doubles as the citizen's index in the simulator roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citizen {
    pub id: u32,
    pub agent_type: AgentType,
    pub age: u32,
    pub employment: EmploymentStatus,
}

/// Token wallet. The balance never goes negative: debits are
/// all-or-nothing and taxation rates are validated to [0, 1] upstream.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Wallet {
    pub balance: f64,
}

impl Wallet {
    pub fn new(balance: f64) -> Self {
        Self { balance }
    }

    pub fn credit(&mut self, amount: f64) {
        self.balance += amount;
    }

    /// All-or-nothing debit. Returns false and leaves the balance
    /// unchanged when funds are insufficient.
    pub fn debit(&mut self, amount: f64) -> bool {
        if self.balance < amount {
            return false;
        }
        self.balance -= amount;
        true
    }

    pub fn can_afford(&self, amount: f64) -> bool {
        self.balance >= amount
    }

    /// Deduct `rate` of the current balance and return the amount taken.
    pub fn tax(&mut self, rate: f64) -> f64 {
        let amount = self.balance * rate;
        self.balance -= amount;
        amount
    }
}

pub const MAX_HAPPINESS: f32 = 100.0;
pub const MAX_HEALTH: f32 = 100.0;

/// Health and happiness, both bounded to [0, 100].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Wellbeing {
    pub health: f32,
    pub happiness: f32,
}

impl Wellbeing {
    pub fn cheer(&mut self, amount: f32) {
        self.happiness = (self.happiness + amount).clamp(0.0, MAX_HAPPINESS);
    }
}

impl Default for Wellbeing {
    fn default() -> Self {
        Self {
            health: MAX_HEALTH,
            happiness: 50.0,
        }
    }
}

/// Education level and the courses completed to reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Learning {
    pub education_level: f32,
    pub skills: Vec<CourseType>,
}

impl Learning {
    pub fn new(education_level: f32) -> Self {
        Self {
            education_level,
            skills: Vec::new(),
        }
    }

    /// Daily self-study: a small, ability-scaled increment while below
    /// the level cap.
    pub fn study(&mut self, learning_ability: f32) {
        if self.education_level < MAX_EDUCATION_LEVEL {
            self.education_level += learning_ability * 0.1;
        }
    }

    /// Apply a finished course: gain its skill levels (capped) and record
    /// the course.
    pub fn complete_course(&mut self, course: CourseType) {
        self.education_level =
            (self.education_level + course.skill_gain()).min(MAX_EDUCATION_LEVEL);
        self.skills.push(course);
    }
}

/// Behavioral traits, fixed at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Traits {
    /// Uniform in [0.1, 0.9].
    pub risk_tolerance: f32,
    /// Uniform in [0.3, 1.0].
    pub learning_ability: f32,
}

impl Traits {
    /// Draw a random trait set.
    pub fn random(rng: &mut impl rand::Rng) -> Self {
        Self {
            risk_tolerance: rng.gen_range(0.1..0.9),
            learning_ability: rng.gen_range(0.3..1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_debit_rejects_overdraft() {
        let mut wallet = Wallet::new(20.0);
        assert!(!wallet.can_afford(25.0));
        assert!(!wallet.debit(25.0));
        assert_eq!(wallet.balance, 20.0);
        assert!(wallet.can_afford(20.0));
        assert!(wallet.debit(20.0));
        assert_eq!(wallet.balance, 0.0);
    }

    #[test]
    fn test_wallet_tax_returns_amount() {
        let mut wallet = Wallet::new(500.0);
        let tax = wallet.tax(0.1);
        assert!((tax - 50.0).abs() < 1e-9);
        assert!((wallet.balance - 450.0).abs() < 1e-9);
    }

    #[test]
    fn test_wallet_tax_full_rate_empties_but_never_overdraws() {
        let mut wallet = Wallet::new(80.0);
        let tax = wallet.tax(1.0);
        assert!((tax - 80.0).abs() < 1e-9);
        assert_eq!(wallet.balance, 0.0);
    }

    #[test]
    fn test_cheer_caps_at_max() {
        let mut wellbeing = Wellbeing::default();
        wellbeing.cheer(500.0);
        assert_eq!(wellbeing.happiness, MAX_HAPPINESS);
    }

    #[test]
    fn test_complete_course_caps_education() {
        let mut learning = Learning::new(9.5);
        learning.complete_course(CourseType::Professional); // +3.0
        assert_eq!(learning.education_level, MAX_EDUCATION_LEVEL);
        assert_eq!(learning.skills, vec![CourseType::Professional]);
    }

    #[test]
    fn test_study_stops_at_cap() {
        let mut learning = Learning::new(MAX_EDUCATION_LEVEL);
        learning.study(1.0);
        assert_eq!(learning.education_level, MAX_EDUCATION_LEVEL);

        let mut below = Learning::new(5.0);
        below.study(0.5);
        assert!((below.education_level - 5.05).abs() < 1e-6);
    }

    #[test]
    fn test_traits_within_ranges() {
        use rand::SeedableRng;
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            let traits = Traits::random(&mut rng);
            assert!((0.1..0.9).contains(&traits.risk_tolerance));
            assert!((0.3..1.0).contains(&traits.learning_ability));
        }
    }
}
