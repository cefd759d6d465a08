//! Population generation.

use crate::components::{AgentType, Citizen, EmploymentStatus, Learning, Traits, Wallet, Wellbeing};
use crate::config::SimulationConfig;
use hecs::{Entity, World};
use rand::Rng;

/// Spawn the initial population in id order and return the roster.
///
/// Ids are dense and equal each citizen's index in the returned roster;
/// subsystems rely on that to resolve citizen ids back to entities.
pub fn spawn_population(
    world: &mut World,
    config: &SimulationConfig,
    rng: &mut impl Rng,
) -> Vec<Entity> {
    let mut roster = Vec::with_capacity(config.population_size as usize);

    for id in 0..config.population_size {
        let agent_type = AgentType::ALL[rng.gen_range(0..AgentType::ALL.len())];
        let age = rng.gen_range(18..=80);
        let education_level = rng.gen_range(1..=10) as f32;
        let traits = Traits::random(rng);

        // Starting balance scales with the agent type's base income
        let base_income = config.base_incomes.for_type(agent_type);
        let balance = rng.gen_range(base_income * 0.5..=base_income * 1.5);

        let entity = world.spawn((
            Citizen {
                id,
                agent_type,
                age,
                employment: EmploymentStatus::Unemployed,
            },
            Wallet::new(balance),
            Wellbeing::default(),
            Learning::new(education_level),
            traits,
        ));
        roster.push(entity);
    }

    roster
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimRng;

    fn small_config(population_size: u32) -> SimulationConfig {
        SimulationConfig {
            population_size,
            ..Default::default()
        }
    }

    #[test]
    fn test_spawn_count_matches_config() {
        let mut world = World::new();
        let mut rng = SimRng::from_seed_u64(1);
        let roster = spawn_population(&mut world, &small_config(50), &mut rng.0);
        assert_eq!(roster.len(), 50);
        assert_eq!(world.query::<&Citizen>().iter().count(), 50);
    }

    #[test]
    fn test_ids_match_roster_order() {
        let mut world = World::new();
        let mut rng = SimRng::from_seed_u64(2);
        let roster = spawn_population(&mut world, &small_config(20), &mut rng.0);
        for (index, &entity) in roster.iter().enumerate() {
            let citizen = world.get::<&Citizen>(entity).unwrap();
            assert_eq!(citizen.id as usize, index);
        }
    }

    #[test]
    fn test_initial_state_within_ranges() {
        let mut world = World::new();
        let mut rng = SimRng::from_seed_u64(3);
        let config = small_config(100);
        let roster = spawn_population(&mut world, &config, &mut rng.0);

        for &entity in &roster {
            let citizen = world.get::<&Citizen>(entity).unwrap();
            let wallet = world.get::<&Wallet>(entity).unwrap();
            let wellbeing = world.get::<&Wellbeing>(entity).unwrap();
            let learning = world.get::<&Learning>(entity).unwrap();

            assert!((18..=80).contains(&citizen.age));
            assert!((1.0..=10.0).contains(&learning.education_level));
            assert!(learning.skills.is_empty());
            assert_eq!(wellbeing.health, 100.0);
            assert_eq!(wellbeing.happiness, 50.0);
            assert_eq!(citizen.employment, EmploymentStatus::Unemployed);

            let base = config.base_incomes.for_type(citizen.agent_type);
            assert!(
                wallet.balance >= base * 0.5 && wallet.balance <= base * 1.5,
                "balance {} outside band for {}",
                wallet.balance,
                citizen.agent_type.label()
            );
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = small_config(30);

        let mut world_a = World::new();
        let mut rng_a = SimRng::from_seed_u64(99);
        let roster_a = spawn_population(&mut world_a, &config, &mut rng_a.0);

        let mut world_b = World::new();
        let mut rng_b = SimRng::from_seed_u64(99);
        let roster_b = spawn_population(&mut world_b, &config, &mut rng_b.0);

        for (&a, &b) in roster_a.iter().zip(&roster_b) {
            let wallet_a = world_a.get::<&Wallet>(a).unwrap();
            let wallet_b = world_b.get::<&Wallet>(b).unwrap();
            assert_eq!(wallet_a.balance, wallet_b.balance);

            let citizen_a = world_a.get::<&Citizen>(a).unwrap();
            let citizen_b = world_b.get::<&Citizen>(b).unwrap();
            assert_eq!(citizen_a.agent_type, citizen_b.agent_type);
            assert_eq!(citizen_a.age, citizen_b.age);
        }
    }
}
