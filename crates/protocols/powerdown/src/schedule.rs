//! Weekly unlock schedule derivation
//!
//! The schedule is uniform: each of the 8 periods releases
//! `weekly_bonk_amount`, plain division with no remainder correction, so the
//! per-week figures always agree with what the status snapshot reports.

use bonk_core::constants::{POWER_DOWN_WEEKS, WEEK_SECS};
use bonk_core::{BonkAmount, DbonkAmount, PowerDownStatus, Timestamp};
use serde::Serialize;

/// Display status of one schedule entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStatus {
    Completed,
    Processing,
    Pending,
}

/// One week of the unlock schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekEntry {
    /// Week index, 1-based
    pub week: u32,
    pub scheduled_date: Timestamp,
    pub bonk_amount: BonkAmount,
    pub status: WeekStatus,
}

/// Compute the full 8-entry unlock schedule for an active power-down.
///
/// Week `i` is `completed` when already unlocked, `processing` when it is the
/// next period boundary, and `pending` after that.
pub fn compute_schedule(status: &PowerDownStatus) -> Vec<WeekEntry> {
    (1..=POWER_DOWN_WEEKS)
        .map(|week| WeekEntry {
            week,
            scheduled_date: status.start_date + week as Timestamp * WEEK_SECS,
            bonk_amount: status.weekly_bonk_amount,
            status: if week <= status.weeks_completed {
                WeekStatus::Completed
            } else if week == status.weeks_completed + 1 {
                WeekStatus::Processing
            } else {
                WeekStatus::Pending
            },
        })
        .collect()
}

/// Unlock progress as a display percentage.
pub fn progress_pct(status: &PowerDownStatus) -> f64 {
    status.weeks_completed as f64 / POWER_DOWN_WEEKS as f64 * 100.0
}

/// BONK still locked in the schedule. Guarded against negative results even
/// though the distributed-total invariant should prevent them.
pub fn bonk_remaining(status: &PowerDownStatus) -> BonkAmount {
    (status.total_bonk_equivalent - status.bonk_distributed).max(0.0)
}

/// dBONK not yet converted.
pub fn dbonk_remaining(status: &PowerDownStatus) -> DbonkAmount {
    (status.total_dbonk_amount - status.dbonk_converted).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonk_core::constants::BONK_TO_DBONK_RATE;

    fn active_status(weeks_completed: u32) -> PowerDownStatus {
        let total_dbonk = 1200.0;
        let total_bonk = total_dbonk / BONK_TO_DBONK_RATE;
        let weekly = total_bonk / POWER_DOWN_WEEKS as f64;
        PowerDownStatus {
            start_date: 1_700_000_000,
            total_dbonk_amount: total_dbonk,
            total_bonk_equivalent: total_bonk,
            weekly_bonk_amount: weekly,
            weeks_completed,
            dbonk_converted: weeks_completed as f64 * total_dbonk / POWER_DOWN_WEEKS as f64,
            bonk_distributed: weeks_completed as f64 * weekly,
            next_payout_date: 1_700_000_000 + (weeks_completed as i64 + 1) * WEEK_SECS,
            estimated_completion: 1_700_000_000 + POWER_DOWN_WEEKS as i64 * WEEK_SECS,
        }
    }

    #[test]
    fn test_always_eight_entries() {
        for weeks in 0..=POWER_DOWN_WEEKS {
            let schedule = compute_schedule(&active_status(weeks));
            assert_eq!(schedule.len(), POWER_DOWN_WEEKS as usize);
        }
    }

    #[test]
    fn test_week_statuses_partition() {
        // weeksCompleted=3: weeks 1-3 completed, 4 processing, 5-8 pending.
        let schedule = compute_schedule(&active_status(3));

        for entry in &schedule[..3] {
            assert_eq!(entry.status, WeekStatus::Completed);
        }
        assert_eq!(schedule[3].week, 4);
        assert_eq!(schedule[3].status, WeekStatus::Processing);
        for entry in &schedule[4..] {
            assert_eq!(entry.status, WeekStatus::Pending);
        }
    }

    #[test]
    fn test_completed_schedule_has_no_processing_week() {
        let schedule = compute_schedule(&active_status(POWER_DOWN_WEEKS));
        assert!(schedule
            .iter()
            .all(|entry| entry.status == WeekStatus::Completed));
    }

    #[test]
    fn test_scheduled_dates_step_weekly() {
        let status = active_status(0);
        let schedule = compute_schedule(&status);

        assert_eq!(schedule[0].scheduled_date, status.start_date + WEEK_SECS);
        for pair in schedule.windows(2) {
            assert_eq!(pair[1].scheduled_date - pair[0].scheduled_date, WEEK_SECS);
        }
    }

    #[test]
    fn test_schedule_sums_to_total() {
        let status = active_status(2);
        let sum: f64 = compute_schedule(&status)
            .iter()
            .map(|entry| entry.bonk_amount)
            .sum();
        assert!((sum - status.total_bonk_equivalent).abs() < 1e-9);
    }

    #[test]
    fn test_progress_percentage() {
        assert_eq!(progress_pct(&active_status(3)), 37.5);
        assert_eq!(progress_pct(&active_status(0)), 0.0);
        assert_eq!(progress_pct(&active_status(8)), 100.0);
    }

    #[test]
    fn test_remaining_amounts() {
        let status = active_status(3);
        assert!((bonk_remaining(&status) - 50.0).abs() < 1e-9);
        assert!((dbonk_remaining(&status) - 750.0).abs() < 1e-9);
    }

    #[test]
    fn test_remaining_never_negative() {
        let mut status = active_status(8);
        // Force an inconsistent snapshot; the guard must clamp to zero.
        status.bonk_distributed = status.total_bonk_equivalent + 1.0;
        status.dbonk_converted = status.total_dbonk_amount + 1.0;

        assert_eq!(bonk_remaining(&status), 0.0);
        assert_eq!(dbonk_remaining(&status), 0.0);
    }
}
