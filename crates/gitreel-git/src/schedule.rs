// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Animation timing
//!
//! Real commit times are replaced by a synthetic timeline in which every
//! calendar day with commits lasts exactly `day_duration`. Days with few
//! commits give each one `max_commit_duration` and spread the rest of the day
//! as equal pauses; busy days split the day evenly with no pauses. Gaps of
//! whole days between active days become gaps of whole animation days.

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::error::GitError;
use crate::operation::Operation;

/// Timing budget for the animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleOptions {
    day_duration: f64,
    max_commit_duration: f64,
}

impl ScheduleOptions {
    /// Create schedule options
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidSchedule` unless both durations are finite
    /// and strictly positive.
    pub fn new(day_duration: f64, max_commit_duration: f64) -> Result<Self, GitError> {
        for (name, value) in [
            ("day duration", day_duration),
            ("max commit duration", max_commit_duration),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GitError::InvalidSchedule {
                    message: format!("{name} must be a positive number, got {value}"),
                });
            }
        }
        Ok(Self {
            day_duration,
            max_commit_duration,
        })
    }

    /// Animation time allotted to one calendar day
    #[must_use]
    pub fn day_duration(&self) -> f64 {
        self.day_duration
    }

    /// Longest animation time a single commit may take
    #[must_use]
    pub fn max_commit_duration(&self) -> f64 {
        self.max_commit_duration
    }

    /// Number of commits that fit in one day at full duration
    #[must_use]
    pub fn capacity(&self) -> usize {
        (self.day_duration / self.max_commit_duration).floor() as usize
    }

    /// How a day with `commits` commits is laid out
    #[must_use]
    pub fn strategy_for(&self, commits: usize) -> DayStrategy {
        if commits > self.capacity() {
            DayStrategy::Compress
        } else {
            DayStrategy::Pad
        }
    }
}

/// Layout of a single calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStrategy {
    /// More commits than capacity: equal shares of the day, back to back
    Compress,
    /// Full duration for each commit, with equal pauses before each one
    Pad,
}

/// Summary of a scheduling pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScheduleStats {
    /// Calendar days with at least one commit
    pub active_days: usize,
    /// Days laid out with [`DayStrategy::Compress`]
    pub compressed_days: usize,
    /// End of the last operation on the synthetic timeline
    pub total_duration: f64,
}

/// Assign synthetic `start_date` and `duration` to every operation
///
/// Operations must be in commit order. Consecutive operations on the same
/// calendar day (in their own offset) form one day.
pub fn schedule(operations: &mut [Operation], options: &ScheduleOptions) -> ScheduleStats {
    let mut stats = ScheduleStats::default();
    let mut cursor = 0.0;
    let mut start = 0;

    while start < operations.len() {
        let day = operations[start].start_time.date_naive();
        let len = operations[start..]
            .iter()
            .take_while(|op| op.start_time.date_naive() == day)
            .count();
        let end = start + len;

        let strategy = options.strategy_for(len);
        lay_out_day(&mut operations[start..end], cursor, strategy, options);
        debug!(%day, commits = len, ?strategy, cursor, "Scheduled day");

        stats.active_days += 1;
        if strategy == DayStrategy::Compress {
            stats.compressed_days += 1;
        }
        stats.total_duration = cursor + options.day_duration;

        if let Some(next) = operations.get(end) {
            let days = whole_days_between(&operations[end - 1].start_time, &next.start_time);
            cursor += options.day_duration * days as f64;
        }
        start = end;
    }

    stats
}

/// Lay out one day's operations starting at `cursor`
fn lay_out_day(
    day: &mut [Operation],
    cursor: f64,
    strategy: DayStrategy,
    options: &ScheduleOptions,
) {
    let n = day.len() as f64;
    let (duration, pause) = match strategy {
        DayStrategy::Compress => (options.day_duration / n, 0.0),
        DayStrategy::Pad => (
            options.max_commit_duration,
            (options.day_duration - n * options.max_commit_duration) / n,
        ),
    };

    let mut at = cursor;
    for operation in day {
        at += pause;
        operation.start_date = at;
        operation.duration = duration;
        at += duration;
    }
}

/// Whole calendar days from `first`'s day to `second`'s day
///
/// Each time is truncated to midnight in its own offset. Never less than one,
/// so a day can not overlap the one before it even if commit times are out of
/// order.
fn whole_days_between(first: &DateTime<FixedOffset>, second: &DateTime<FixedOffset>) -> i64 {
    (second.date_naive() - first.date_naive()).num_days().max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{Action, FileChange};
    use chrono::TimeZone;
    use similar_asserts::assert_eq;

    const DAY: i64 = 86_400;
    // 2023-11-14T00:00:00Z
    const MIDNIGHT: i64 = 1_699_920_000;

    fn op_at(seconds: i64) -> Operation {
        let time = FixedOffset::east_opt(0)
            .and_then(|tz| tz.timestamp_opt(seconds, 0).single())
            .expect("valid timestamp");
        Operation::new(
            "Author a@example.com".to_string(),
            time,
            vec![FileChange::new(Action::Modify, "f.txt")],
        )
    }

    fn options(day: f64, max: f64) -> ScheduleOptions {
        ScheduleOptions::new(day, max).expect("valid options")
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_two_commits_same_day_pad() {
        let mut ops = vec![op_at(MIDNIGHT + 3600), op_at(MIDNIGHT + 7200)];
        let opts = options(1000.0, 400.0);
        assert_eq!(opts.capacity(), 2);

        schedule(&mut ops, &opts);

        assert_close(ops[0].start_date, 100.0);
        assert_close(ops[0].duration, 400.0);
        assert_close(ops[1].start_date, 600.0);
        assert_close(ops[1].duration, 400.0);
        assert_close(ops[1].end_date(), 1000.0);
    }

    #[test]
    fn test_dense_day_compresses() {
        let mut ops: Vec<Operation> = (0..4).map(|i| op_at(MIDNIGHT + i * 60)).collect();
        let stats = schedule(&mut ops, &options(1000.0, 400.0));

        for (i, op) in ops.iter().enumerate() {
            assert_close(op.start_date, 250.0 * i as f64);
            assert_close(op.duration, 250.0);
        }
        assert_eq!(stats.compressed_days, 1);
        assert_close(stats.total_duration, 1000.0);
    }

    #[test]
    fn test_capacity_boundary() {
        let opts = options(1000.0, 400.0);
        assert_eq!(opts.strategy_for(2), DayStrategy::Pad);
        assert_eq!(opts.strategy_for(3), DayStrategy::Compress);
    }

    #[test]
    fn test_capacity_zero_always_compresses() {
        let opts = options(100.0, 400.0);
        assert_eq!(opts.capacity(), 0);

        let mut ops = vec![op_at(MIDNIGHT)];
        schedule(&mut ops, &opts);
        assert_close(ops[0].start_date, 0.0);
        assert_close(ops[0].duration, 100.0);
    }

    #[test]
    fn test_gap_between_days() {
        // Day 0: one commit; day 3: one commit
        let mut ops = vec![op_at(MIDNIGHT + 100), op_at(MIDNIGHT + 3 * DAY + 100)];
        let stats = schedule(&mut ops, &options(1000.0, 400.0));

        assert_close(ops[0].start_date, 600.0);
        assert_close(ops[1].start_date, 3000.0 + 600.0);
        assert_eq!(stats.active_days, 2);
        assert_close(stats.total_duration, 4000.0);
    }

    #[test]
    fn test_late_and_early_commits_on_adjacent_days() {
        // 23:59 then 00:01 the next day are one animation day apart
        let mut ops = vec![op_at(MIDNIGHT + DAY - 60), op_at(MIDNIGHT + DAY + 60)];
        schedule(&mut ops, &options(1000.0, 1000.0));
        assert_close(ops[0].start_date, 0.0);
        assert_close(ops[1].start_date, 1000.0);
    }

    #[test]
    fn test_out_of_order_days_never_overlap() {
        let mut ops = vec![op_at(MIDNIGHT + 2 * DAY), op_at(MIDNIGHT)];
        schedule(&mut ops, &options(1000.0, 500.0));
        assert!(ops[1].start_date >= ops[0].end_date());
    }

    #[test]
    fn test_empty_input() {
        let mut ops: Vec<Operation> = Vec::new();
        let stats = schedule(&mut ops, &options(1000.0, 400.0));
        assert_eq!(stats, ScheduleStats::default());
    }

    #[test]
    fn test_invalid_options_rejected() {
        assert!(ScheduleOptions::new(0.0, 1.0).is_err());
        assert!(ScheduleOptions::new(1000.0, -1.0).is_err());
        assert!(ScheduleOptions::new(f64::NAN, 1.0).is_err());
        assert!(ScheduleOptions::new(1000.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_days_follow_commit_offset() {
        // 2023-11-14T20:00Z and 2023-11-15T02:00Z are both on 2023-11-15 at +09:00
        let tokyo = FixedOffset::east_opt(9 * 3600).expect("offset");
        let at = |s: i64| {
            let mut op = op_at(s);
            op.start_time = tokyo.timestamp_opt(s, 0).single().expect("valid");
            op
        };
        let mut ops = vec![at(MIDNIGHT + 20 * 3600), at(MIDNIGHT + DAY + 2 * 3600)];
        let stats = schedule(&mut ops, &options(1000.0, 400.0));
        assert_eq!(stats.active_days, 1);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::operation::{Action, FileChange};
    use proptest::prelude::*;

    /// Sorted commit times spread over about a month
    fn times_strategy() -> impl Strategy<Value = Vec<i64>> {
        proptest::collection::vec(1_600_000_000i64..1_602_600_000i64, 1..60).prop_map(|mut v| {
            v.sort_unstable();
            v
        })
    }

    fn operations(times: &[i64]) -> Vec<Operation> {
        times
            .iter()
            .filter_map(|&t| DateTime::from_timestamp(t, 0))
            .map(|t| {
                Operation::new(
                    "p p@example.com".to_string(),
                    t.fixed_offset(),
                    vec![FileChange::new(Action::Add, "x")],
                )
            })
            .collect()
    }

    proptest! {
        /// Property: synthetic start dates never decrease and durations are positive
        #[test]
        fn prop_schedule_is_ordered(
            times in times_strategy(),
            day in 100.0f64..10_000.0,
            max in 10.0f64..5_000.0,
        ) {
            let mut ops = operations(&times);
            schedule(&mut ops, &ScheduleOptions::new(day, max).expect("valid"));
            for op in &ops {
                prop_assert!(op.duration > 0.0);
            }
            for pair in ops.windows(2) {
                prop_assert!(pair[1].start_date >= pair[0].end_date() - 1e-6);
            }
        }

        /// Property: each active day ends exactly one day after its start
        #[test]
        fn prop_each_day_is_filled_exactly(
            times in times_strategy(),
            day in 100.0f64..10_000.0,
            max in 10.0f64..5_000.0,
        ) {
            let mut ops = operations(&times);
            schedule(&mut ops, &ScheduleOptions::new(day, max).expect("valid"));

            let first_day = ops[0].start_time.date_naive();
            for (i, op) in ops.iter().enumerate() {
                let is_last_of_day = ops
                    .get(i + 1)
                    .is_none_or(|next| next.start_time.date_naive() != op.start_time.date_naive());
                if is_last_of_day {
                    let offset = (op.start_time.date_naive() - first_day).num_days() as f64;
                    let expected_end = day * (offset + 1.0);
                    prop_assert!((op.end_date() - expected_end).abs() < 1e-6 * expected_end.max(1.0));
                }
            }
        }
    }
}
