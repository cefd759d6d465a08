//! Pure simulation logic for the DPPN token economy.
//!
//! This crate contains all simulation math that is independent of the ECS
//! world, the random generator, and any runtime. Functions take plain data
//! and return results, making them unit-testable and portable across the
//! engine, the headless harness, and any future consumer.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`courses`] | Course catalog: costs, skill gains, duration |
//! | [`decisions`] | Daily economic decision rule and its thresholds |
//! | [`indicators`] | Gini, money-supply growth, human capital, poverty |
//! | [`pricing`] | Demand/supply curves, clearing prices, price index |

pub mod courses;
pub mod decisions;
pub mod indicators;
pub mod pricing;
