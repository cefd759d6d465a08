//! Course catalog - the closed set of course types with their costs,
//! skill gains, and the fixed 30-day duration.

use serde::{Deserialize, Serialize};

/// Courses a citizen can enroll in. The set is closed: an unknown course
/// type is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseType {
    Basic,
    Advanced,
    Professional,
}

impl CourseType {
    pub const ALL: [CourseType; 3] = [
        CourseType::Basic,
        CourseType::Advanced,
        CourseType::Professional,
    ];

    /// Enrollment cost, debited up front.
    pub fn cost(&self) -> f64 {
        match self {
            CourseType::Basic => 20.0,
            CourseType::Advanced => 50.0,
            CourseType::Professional => 100.0,
        }
    }

    /// Education levels gained on completion.
    pub fn skill_gain(&self) -> f32 {
        match self {
            CourseType::Basic => 1.0,
            CourseType::Advanced => 2.0,
            CourseType::Professional => 3.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CourseType::Basic => "basic",
            CourseType::Advanced => "advanced",
            CourseType::Professional => "professional",
        }
    }
}

/// Every course runs for the same number of simulated days.
pub const COURSE_DURATION_DAYS: u32 = 30;

/// Progress percentage gained per day of study.
pub const DAILY_PROGRESS: f32 = 100.0 / COURSE_DURATION_DAYS as f32;

/// Education level is capped here no matter how large a skill gain is.
pub const MAX_EDUCATION_LEVEL: f32 = 10.0;
