//! Simulation engine - daily tick orchestration over the citizen world.

use crate::components::{
    AgentType, Citizen, EmploymentStatus, Learning, Traits, Wallet, Wellbeing,
};
use crate::config::{ConfigError, SimulationConfig};
use crate::generation;
use crate::metrics::{DailyMetrics, RunSummary};
use crate::rng::SimRng;
use crate::systems::economy::{self, Economy};
use crate::systems::education::EducationSystem;
use crate::systems::market::Market;
use dppn_logic::courses::CourseType;
use dppn_logic::decisions::{self, Decision, DecisionInputs};
use dppn_logic::indicators;
use dppn_logic::pricing::ProductCategory;
use hecs::{Entity, World};
use rand::Rng;
use serde::Serialize;

/// External read-only view of one citizen.
#[derive(Debug, Clone, Serialize)]
pub struct CitizenSnapshot {
    pub id: u32,
    pub agent_type: AgentType,
    pub age: u32,
    pub employment: EmploymentStatus,
    pub balance: f64,
    pub education_level: f32,
    pub health: f32,
    pub happiness: f32,
    pub skills: Vec<CourseType>,
}

/// Main simulation engine.
///
/// Owns the citizen world and the three subsystems and advances them in a
/// fixed order, one day per `run_day` call. Within a tick the subsystems
/// mutate disjoint citizen components, and citizens are always processed
/// in roster order, so a run is fully determined by its configuration.
pub struct Simulator {
    /// ECS world containing all citizen entities
    pub world: World,
    /// Aggregate economic indicators
    pub economy: Economy,
    /// Course catalog and enrollment ledger
    pub education: EducationSystem,
    /// Product catalog and transaction log
    pub market: Market,
    roster: Vec<Entity>,
    rng: SimRng,
    day: u32,
    metrics: Vec<DailyMetrics>,
    config: SimulationConfig,
}

impl Simulator {
    /// Validate the configuration, generate the population, and seed the
    /// market. Fails before any tick if the configuration is malformed.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut world = World::new();
        let mut rng = SimRng::from_seed_u64(config.seed);
        let roster = generation::spawn_population(&mut world, &config, &mut rng.0);
        let market = Market::new(&config.products);

        Ok(Self {
            world,
            economy: Economy::new(),
            education: EducationSystem::new(),
            market,
            roster,
            rng,
            day: 0,
            metrics: Vec::new(),
            config,
        })
    }

    /// Advance the simulation by one day.
    pub fn run_day(&mut self) {
        // 1. Universal basic income
        for index in 0..self.roster.len() {
            economy::grant_basic_income(
                &mut self.world,
                self.roster[index],
                self.config.basic_income,
            );
        }

        // 2. Tax and redistribution, in roster order
        self.economy.redistribute(
            &mut self.world,
            &self.roster,
            self.config.tax_rate,
            self.config.basic_income,
        );

        // 3. Education progress
        let completions = self.education.advance_all(&mut self.world, &self.roster);
        if completions > 0 {
            log::debug!("day {}: {} course completions", self.day, completions);
        }

        // 4. Inflation, exactly once, from the day-start supply snapshot
        let inflation = self.economy.update_inflation(&self.world, &self.roster);

        // 5. Market repricing at current wealth
        let balances = economy::collect_balances(&self.world, &self.roster);
        self.market.update_conditions(&balances, inflation);

        // 6. Citizen decisions, in roster order
        for index in 0..self.roster.len() {
            self.decide_and_apply(self.roster[index]);
        }

        // 7. Daily metrics snapshot
        self.record_metrics();

        // 8. Next day
        self.day += 1;
    }

    /// Run a fixed number of days, reporting progress every 30.
    pub fn run(&mut self, days: u32) {
        log::info!(
            "starting simulation: {} citizens, {} days",
            self.roster.len(),
            days
        );
        for _ in 0..days {
            let day = self.day;
            self.run_day();
            if day % 30 == 0 {
                if let Some(snapshot) = self.metrics.last() {
                    log::info!(
                        "day {}: avg balance {:.1}, avg happiness {:.1}, gini {:.3}",
                        day,
                        indicators::mean(&snapshot.balances),
                        snapshot.avg_happiness,
                        snapshot.gini
                    );
                }
            }
        }
    }

    fn decide_and_apply(&mut self, citizen: Entity) {
        let Ok((wallet, learning, traits)) = self
            .world
            .query_one_mut::<(&Wallet, &Learning, &Traits)>(citizen)
        else {
            return;
        };
        let inputs = DecisionInputs {
            balance: wallet.balance,
            education_level: learning.education_level,
            risk_tolerance: traits.risk_tolerance,
            learning_ability: traits.learning_ability,
        };

        // Both draws are taken unconditionally so the RNG stream shape
        // does not depend on citizen state
        let education_draw = self.rng.0.gen::<f32>();
        let luxury_draw = self.rng.0.gen::<f32>();

        for decision in decisions::decide(&inputs, education_draw, luxury_draw) {
            match decision {
                Decision::BuyProducts => {
                    // Generic basic-goods purchase, outside the catalog
                    if let Ok((wallet, wellbeing)) = self
                        .world
                        .query_one_mut::<(&mut Wallet, &mut Wellbeing)>(citizen)
                    {
                        if wallet.debit(decisions::GENERIC_GOODS_COST) {
                            wellbeing.cheer(decisions::GENERIC_GOODS_CHEER);
                        }
                    }
                }
                Decision::InvestInEducation => {
                    let balance = self
                        .world
                        .get::<&Wallet>(citizen)
                        .map(|w| w.balance)
                        .unwrap_or(0.0);
                    if balance > decisions::ENROLL_MIN_BALANCE {
                        let course =
                            CourseType::ALL[self.rng.0.gen_range(0..CourseType::ALL.len())];
                        if let Ok((citizen_ref, wallet)) = self
                            .world
                            .query_one_mut::<(&Citizen, &mut Wallet)>(citizen)
                        {
                            // A refused enrollment drops the decision
                            let _ = self.education.enroll(citizen_ref.id, wallet, course);
                        }
                    }
                }
                Decision::BuyLuxury => {
                    let budget = self
                        .world
                        .get::<&Wallet>(citizen)
                        .map(|w| w.balance)
                        .unwrap_or(0.0);
                    let pick = self
                        .market
                        .affordable(budget, Some(ProductCategory::Luxury))
                        .first()
                        .map(|product| product.id);
                    if let Some(product_id) = pick {
                        if let Ok((citizen_ref, wallet, wellbeing)) = self
                            .world
                            .query_one_mut::<(&Citizen, &mut Wallet, &mut Wellbeing)>(citizen)
                        {
                            let _ = self.market.purchase(
                                citizen_ref.id,
                                wallet,
                                wellbeing,
                                product_id,
                                self.day,
                            );
                        }
                    }
                }
            }
        }
    }

    fn record_metrics(&mut self) {
        let balances = economy::collect_balances(&self.world, &self.roster);
        let gini = self.economy.update_gini(&self.world, &self.roster);
        self.economy
            .record_gdp(self.market.total_transaction_volume());

        let mut happiness = Vec::with_capacity(self.roster.len());
        let mut education = Vec::with_capacity(self.roster.len());
        for &citizen in &self.roster {
            if let Ok(wellbeing) = self.world.get::<&Wellbeing>(citizen) {
                happiness.push(wellbeing.happiness as f64);
            }
            if let Ok(learning) = self.world.get::<&Learning>(citizen) {
                education.push(learning.education_level as f64);
            }
        }

        self.metrics.push(DailyMetrics {
            day: self.day,
            balances,
            gini,
            inflation: self.economy.inflation_rate(),
            avg_happiness: indicators::mean(&happiness),
            avg_education: indicators::mean(&education),
        });
    }

    /// Current day (number of completed ticks).
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Append-only metrics series, one entry per completed day.
    pub fn metrics(&self) -> &[DailyMetrics] {
        &self.metrics
    }

    /// Summary over the run so far; `None` before the first tick.
    pub fn summary(&self) -> Option<RunSummary> {
        RunSummary::from_metrics(&self.metrics)
    }

    /// Ordered citizen entity handles. Index equals citizen id.
    pub fn roster(&self) -> &[Entity] {
        &self.roster
    }

    pub fn population_size(&self) -> usize {
        self.roster.len()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Read-only snapshots of all citizens, in roster order.
    pub fn citizens(&self) -> Vec<CitizenSnapshot> {
        self.roster
            .iter()
            .filter_map(|&entity| {
                let citizen = self.world.get::<&Citizen>(entity).ok()?;
                let wallet = self.world.get::<&Wallet>(entity).ok()?;
                let wellbeing = self.world.get::<&Wellbeing>(entity).ok()?;
                let learning = self.world.get::<&Learning>(entity).ok()?;
                Some(CitizenSnapshot {
                    id: citizen.id,
                    agent_type: citizen.agent_type,
                    age: citizen.age,
                    employment: citizen.employment,
                    balance: wallet.balance,
                    education_level: learning.education_level,
                    health: wellbeing.health,
                    happiness: wellbeing.happiness,
                    skills: learning.skills.clone(),
                })
            })
            .collect()
    }
}
