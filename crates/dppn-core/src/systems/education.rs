//! Education system - course enrollment ledger and daily progress.

use std::collections::BTreeMap;

use crate::components::{Citizen, Learning, Wallet, Wellbeing};
use dppn_logic::courses::{CourseType, COURSE_DURATION_DAYS, DAILY_PROGRESS};
use hecs::{Entity, World};
use serde::{Deserialize, Serialize};

/// Happiness gained on course completion.
const COMPLETION_CHEER: f32 = 10.0;

/// One citizen's active course commitment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub course: CourseType,
    /// Percentage complete, grows by `DAILY_PROGRESS` per day.
    pub progress: f32,
    pub days_remaining: u32,
}

/// Why an enrollment attempt was refused. Either way the attempt is a
/// strict no-op: balance and ledger are left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollError {
    /// A citizen keeps at most one active course; the paid cost of the
    /// current one is never silently discarded.
    AlreadyEnrolled,
    InsufficientFunds,
}

impl std::fmt::Display for EnrollError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrollError::AlreadyEnrolled => write!(f, "citizen already has an active course"),
            EnrollError::InsufficientFunds => write!(f, "balance below course cost"),
        }
    }
}

impl std::error::Error for EnrollError {}

/// Course catalog plus the enrollment ledger, keyed by citizen id.
///
/// The ledger is a `BTreeMap` so the daily pass walks enrollments in a
/// deterministic order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationSystem {
    enrollments: BTreeMap<u32, Enrollment>,
}

impl EducationSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enroll a citizen in a course: debit the cost up front and open a
    /// ledger entry with the full 30-day duration.
    pub fn enroll(
        &mut self,
        citizen_id: u32,
        wallet: &mut Wallet,
        course: CourseType,
    ) -> Result<(), EnrollError> {
        if self.enrollments.contains_key(&citizen_id) {
            return Err(EnrollError::AlreadyEnrolled);
        }
        if !wallet.debit(course.cost()) {
            return Err(EnrollError::InsufficientFunds);
        }
        self.enrollments.insert(
            citizen_id,
            Enrollment {
                course,
                progress: 0.0,
                days_remaining: COURSE_DURATION_DAYS,
            },
        );
        Ok(())
    }

    /// Advance every active enrollment by one day and apply completion
    /// effects. Returns the number of courses completed.
    ///
    /// The roster is indexed by citizen id. A stale id (citizen no longer
    /// present) is skipped silently; its expired entry still leaves the
    /// ledger so it cannot tick forever.
    pub fn advance_all(&mut self, world: &mut World, roster: &[Entity]) -> u32 {
        let mut expired = Vec::new();
        for (&citizen_id, enrollment) in self.enrollments.iter_mut() {
            enrollment.days_remaining = enrollment.days_remaining.saturating_sub(1);
            enrollment.progress += DAILY_PROGRESS;
            if enrollment.days_remaining == 0 {
                expired.push(citizen_id);
            }
        }

        let mut completions = 0;
        for citizen_id in expired {
            let Some(enrollment) = self.enrollments.remove(&citizen_id) else {
                continue;
            };
            let Some(&entity) = roster.get(citizen_id as usize) else {
                continue;
            };
            if let Ok((citizen, learning, wellbeing)) =
                world.query_one_mut::<(&Citizen, &mut Learning, &mut Wellbeing)>(entity)
            {
                if citizen.id != citizen_id {
                    continue;
                }
                learning.complete_course(enrollment.course);
                wellbeing.cheer(COMPLETION_CHEER);
                completions += 1;
                log::debug!(
                    "citizen {} completed {} course, education now {:.1}",
                    citizen_id,
                    enrollment.course.label(),
                    learning.education_level
                );
            }
        }
        completions
    }

    pub fn is_enrolled(&self, citizen_id: u32) -> bool {
        self.enrollments.contains_key(&citizen_id)
    }

    pub fn enrollment(&self, citizen_id: u32) -> Option<&Enrollment> {
        self.enrollments.get(&citizen_id)
    }

    pub fn active_enrollments(&self) -> usize {
        self.enrollments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{AgentType, EmploymentStatus, Traits};

    fn spawn_student(world: &mut World, id: u32, balance: f64, education: f32) -> Entity {
        world.spawn((
            Citizen {
                id,
                agent_type: AgentType::Student,
                age: 20,
                employment: EmploymentStatus::Unemployed,
            },
            Wallet::new(balance),
            Wellbeing::default(),
            Learning::new(education),
            Traits {
                risk_tolerance: 0.5,
                learning_ability: 0.8,
            },
        ))
    }

    #[test]
    fn test_enroll_debits_and_opens_entry() {
        let mut education = EducationSystem::new();
        let mut wallet = Wallet::new(100.0);

        education
            .enroll(0, &mut wallet, CourseType::Advanced)
            .unwrap();

        assert!((wallet.balance - 50.0).abs() < 1e-9);
        assert_eq!(education.active_enrollments(), 1);
        let entry = education.enrollment(0).unwrap();
        assert_eq!(entry.course, CourseType::Advanced);
        assert_eq!(entry.days_remaining, COURSE_DURATION_DAYS);
        assert_eq!(entry.progress, 0.0);
    }

    #[test]
    fn test_enroll_insufficient_funds_is_a_no_op() {
        let mut education = EducationSystem::new();
        let mut wallet = Wallet::new(30.0);

        let result = education.enroll(0, &mut wallet, CourseType::Professional);

        assert_eq!(result, Err(EnrollError::InsufficientFunds));
        assert_eq!(wallet.balance, 30.0);
        assert!(!education.is_enrolled(0));
    }

    #[test]
    fn test_reenrollment_rejected_while_active() {
        let mut education = EducationSystem::new();
        let mut wallet = Wallet::new(200.0);

        education.enroll(0, &mut wallet, CourseType::Basic).unwrap();
        let result = education.enroll(0, &mut wallet, CourseType::Advanced);

        assert_eq!(result, Err(EnrollError::AlreadyEnrolled));
        // Only the first course was paid for
        assert!((wallet.balance - 180.0).abs() < 1e-9);
        assert_eq!(education.enrollment(0).unwrap().course, CourseType::Basic);
    }

    #[test]
    fn test_course_completes_after_duration() {
        let mut world = World::new();
        let student = spawn_student(&mut world, 0, 100.0, 5.0);
        let roster = vec![student];

        let mut education = EducationSystem::new();
        {
            let wallet = world.query_one_mut::<&mut Wallet>(student).unwrap();
            education.enroll(0, wallet, CourseType::Advanced).unwrap();
        }

        for day in 0..COURSE_DURATION_DAYS {
            let completed = education.advance_all(&mut world, &roster);
            if day + 1 < COURSE_DURATION_DAYS {
                assert_eq!(completed, 0, "completed early on day {day}");
            } else {
                assert_eq!(completed, 1);
            }
        }

        assert!(!education.is_enrolled(0));
        let learning = world.get::<&Learning>(student).unwrap();
        assert!((learning.education_level - 7.0).abs() < 1e-6);
        assert_eq!(learning.skills, vec![CourseType::Advanced]);
        let wellbeing = world.get::<&Wellbeing>(student).unwrap();
        assert_eq!(wellbeing.happiness, 60.0);
    }

    #[test]
    fn test_completion_caps_education_level() {
        let mut world = World::new();
        let student = spawn_student(&mut world, 0, 200.0, 9.5);
        let roster = vec![student];

        let mut education = EducationSystem::new();
        {
            let wallet = world.query_one_mut::<&mut Wallet>(student).unwrap();
            education
                .enroll(0, wallet, CourseType::Professional)
                .unwrap();
        }
        for _ in 0..COURSE_DURATION_DAYS {
            education.advance_all(&mut world, &roster);
        }

        let learning = world.get::<&Learning>(student).unwrap();
        assert_eq!(learning.education_level, 10.0);
    }

    #[test]
    fn test_progress_accumulates_daily() {
        let mut world = World::new();
        let student = spawn_student(&mut world, 0, 100.0, 3.0);
        let roster = vec![student];

        let mut education = EducationSystem::new();
        {
            let wallet = world.query_one_mut::<&mut Wallet>(student).unwrap();
            education.enroll(0, wallet, CourseType::Basic).unwrap();
        }
        for _ in 0..10 {
            education.advance_all(&mut world, &roster);
        }

        let entry = education.enrollment(0).unwrap();
        assert_eq!(entry.days_remaining, COURSE_DURATION_DAYS - 10);
        assert!((entry.progress - 10.0 * DAILY_PROGRESS).abs() < 1e-4);
    }

    #[test]
    fn test_stale_citizen_id_skipped_silently() {
        let mut world = World::new();
        let mut education = EducationSystem::new();

        // Enrollment for an id with no citizen behind it
        let mut wallet = Wallet::new(100.0);
        education.enroll(7, &mut wallet, CourseType::Basic).unwrap();

        let mut completions = 0;
        for _ in 0..COURSE_DURATION_DAYS {
            completions += education.advance_all(&mut world, &[]);
        }

        assert_eq!(completions, 0);
        // The expired entry is still purged from the ledger
        assert!(!education.is_enrolled(7));
    }
}
