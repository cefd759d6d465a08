//! Subsystems - Economy, EducationSystem, and Market

pub mod economy;
pub mod education;
pub mod market;

pub use economy::*;
pub use education::*;
pub use market::*;
