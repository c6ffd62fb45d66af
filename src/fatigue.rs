use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::models::{
    EmploymentType, FatigueAssessment, LongShift, RestGapViolation, RiskLevel, ShiftRecord,
};

pub const MAX_CONSECUTIVE_DAYS: i64 = 6;
pub const MIN_REST_GAP_HOURS: f64 = 10.0;
pub const LONG_SHIFT_HOURS: f64 = 10.0;
pub const WEEKLY_HOURS_WARNING: f64 = 50.0;
pub const MIN_ENGAGEMENT_HOURS: f64 = 3.0;
pub const SPLIT_SPREAD_HOURS: f64 = 12.0;

pub fn cutoff_date(since_days: i64) -> NaiveDate {
    Utc::now().date_naive() - Duration::days(since_days.max(1))
}

/// Paid hours for one shift: wall-clock end minus start, overnight shifts
/// wrapped by a day, unpaid break subtracted.
pub fn worked_hours(shift: &ShiftRecord) -> f64 {
    let minutes = shift_span_minutes(shift).saturating_sub(shift.break_minutes.max(0));
    minutes as f64 / 60.0
}

fn start_minute(shift: &ShiftRecord) -> i64 {
    (shift.start_time.num_seconds_from_midnight() / 60) as i64
}

/// End expressed as minutes from the start date's midnight, so an
/// overnight shift ends past minute 1440.
fn end_minute(shift: &ShiftRecord) -> i64 {
    let start = start_minute(shift);
    let mut end = (shift.end_time.num_seconds_from_midnight() / 60) as i64;
    if end < start {
        end += 24 * 60;
    }
    end
}

fn shift_span_minutes(shift: &ShiftRecord) -> i64 {
    end_minute(shift) - start_minute(shift)
}

fn end_datetime(shift: &ShiftRecord) -> NaiveDateTime {
    shift.date.and_time(shift.start_time) + Duration::minutes(shift_span_minutes(shift))
}

/// Longest run of calendar days with at least one shift, counting
/// backward from the most recent rostered day in the window.
pub fn consecutive_days(shifts: &[ShiftRecord]) -> i64 {
    let mut dates: Vec<_> = shifts.iter().map(|s| s.date).collect();
    dates.sort();
    dates.dedup();

    let Some(&latest) = dates.last() else {
        return 0;
    };

    let mut run = 1;
    let mut cursor = latest;
    for &date in dates.iter().rev().skip(1) {
        if cursor - date == Duration::days(1) {
            run += 1;
            cursor = date;
        } else {
            break;
        }
    }
    run
}

/// Rest gaps under the minimum between shifts on consecutive calendar
/// days, walking the window in roster order.
pub fn short_rest_gaps(sorted: &[ShiftRecord]) -> Vec<RestGapViolation> {
    let mut violations = Vec::new();
    for pair in sorted.windows(2) {
        let (earlier, later) = (&pair[0], &pair[1]);
        if later.date - earlier.date != Duration::days(1) {
            continue;
        }
        let rest = later.date.and_time(later.start_time) - end_datetime(earlier);
        let gap_hours = rest.num_minutes() as f64 / 60.0;
        if gap_hours < MIN_REST_GAP_HOURS {
            violations.push(RestGapViolation {
                first_shift_date: earlier.date,
                second_shift_date: later.date,
                gap_hours,
            });
        }
    }
    violations
}

/// Spread of the longest rostered day: for any date with two or more
/// shifts, hours between the earliest start and the latest wrapped end.
fn split_shift_spreads(sorted: &[ShiftRecord]) -> Vec<(NaiveDate, f64)> {
    let mut spreads = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let date = sorted[i].date;
        let mut j = i;
        let mut earliest_start = i64::MAX;
        let mut latest_end = i64::MIN;
        while j < sorted.len() && sorted[j].date == date {
            earliest_start = earliest_start.min(start_minute(&sorted[j]));
            latest_end = latest_end.max(end_minute(&sorted[j]));
            j += 1;
        }
        if j - i >= 2 {
            spreads.push((date, (latest_end - earliest_start) as f64 / 60.0));
        }
        i = j;
    }
    spreads
}

#[derive(Debug, Clone)]
pub struct BaseAssessment {
    pub risk_level: RiskLevel,
    pub warnings: Vec<String>,
}

/// Base roster rules shared with the rostering screens: consecutive-day
/// runs, short rest gaps, and long-shift counts set the floor the
/// assessor escalates from.
pub fn base_roster_assessment(
    consecutive: i64,
    short_gap_count: usize,
    long_shift_count: usize,
) -> BaseAssessment {
    let mut warnings = Vec::new();
    let mut level = RiskLevel::Low;

    if consecutive > MAX_CONSECUTIVE_DAYS {
        warnings.push(format!(
            "{consecutive} consecutive rostered days exceeds the limit of {MAX_CONSECUTIVE_DAYS}."
        ));
        level = level.max(if consecutive >= 10 {
            RiskLevel::High
        } else {
            RiskLevel::Medium
        });
    }

    if short_gap_count > 0 {
        warnings.push(format!(
            "{short_gap_count} rest break(s) under {MIN_REST_GAP_HOURS:.0} hours between shifts."
        ));
        level = level.max(if short_gap_count >= 3 {
            RiskLevel::High
        } else {
            RiskLevel::Medium
        });
    }

    if long_shift_count >= 3 {
        warnings.push(format!(
            "{long_shift_count} shifts of {LONG_SHIFT_HOURS:.0}+ hours in the window."
        ));
        level = level.max(RiskLevel::Medium);
    }

    BaseAssessment {
        risk_level: level,
        warnings,
    }
}

/// Assess one worker's shift window. Purely a function of the inputs;
/// safe to re-run and to parallelize across workers.
pub fn assess_worker(
    worker_id: uuid::Uuid,
    shifts: &[ShiftRecord],
    employment_type: EmploymentType,
) -> FatigueAssessment {
    let mut sorted: Vec<ShiftRecord> = shifts.to_vec();
    sorted.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)));

    let consecutive = consecutive_days(&sorted);
    let short_gaps = short_rest_gaps(&sorted);
    let long_shifts: Vec<LongShift> = sorted
        .iter()
        .filter(|s| worked_hours(s) >= LONG_SHIFT_HOURS)
        .map(|s| LongShift {
            date: s.date,
            worked_hours: worked_hours(s),
        })
        .collect();
    let total_weekly_hours: f64 = sorted.iter().map(worked_hours).sum();

    let base = base_roster_assessment(consecutive, short_gaps.len(), long_shifts.len());

    let mut extra_warnings = Vec::new();
    if total_weekly_hours > WEEKLY_HOURS_WARNING {
        extra_warnings.push(format!(
            "{total_weekly_hours:.1} rostered hours this window exceeds {WEEKLY_HOURS_WARNING:.0}."
        ));
    }

    if matches!(
        employment_type,
        EmploymentType::Casual | EmploymentType::PartTime
    ) {
        for shift in &sorted {
            let hours = worked_hours(shift);
            if hours < MIN_ENGAGEMENT_HOURS {
                extra_warnings.push(format!(
                    "Shift on {} is {hours:.1} hours, under the {MIN_ENGAGEMENT_HOURS:.0}-hour minimum engagement.",
                    shift.date
                ));
            }
        }
    }

    for (date, spread) in split_shift_spreads(&sorted) {
        if spread > SPLIT_SPREAD_HOURS {
            extra_warnings.push(format!(
                "Split shifts on {date} span {spread:.1} hours, over the {SPLIT_SPREAD_HOURS:.0}-hour spread."
            ));
        }
    }

    // Additional findings only ever escalate a clean base assessment to
    // MEDIUM; they never downgrade.
    let risk_level = if base.risk_level == RiskLevel::Low && !extra_warnings.is_empty() {
        RiskLevel::Medium
    } else {
        base.risk_level
    };

    let mut warnings = base.warnings;
    warnings.extend(extra_warnings);

    FatigueAssessment {
        worker_id,
        consecutive_days: consecutive,
        max_consecutive_allowed: MAX_CONSECUTIVE_DAYS,
        short_gaps,
        long_shifts,
        total_weekly_hours,
        risk_level,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use uuid::Uuid;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn shift(d: u32, start: (u32, u32), end: (u32, u32), break_minutes: i64) -> ShiftRecord {
        ShiftRecord {
            worker_id: Uuid::nil(),
            date: day(d),
            start_time: t(start.0, start.1),
            end_time: t(end.0, end.1),
            break_minutes,
        }
    }

    #[test]
    fn worked_hours_subtracts_breaks() {
        let s = shift(2, (9, 0), (17, 30), 30);
        assert!((worked_hours(&s) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn overnight_shift_wraps_past_midnight() {
        let s = shift(2, (22, 0), (6, 0), 0);
        assert!((worked_hours(&s) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn eight_hour_turnaround_is_a_short_gap() {
        let shifts = vec![shift(2, (14, 0), (22, 0), 0), shift(3, (6, 0), (14, 0), 0)];
        let gaps = short_rest_gaps(&shifts);
        assert_eq!(gaps.len(), 1);
        assert!((gaps[0].gap_hours - 8.0).abs() < 1e-9);
    }

    #[test]
    fn ten_hour_turnaround_is_not_flagged() {
        let shifts = vec![shift(2, (14, 0), (22, 0), 0), shift(3, (8, 0), (16, 0), 0)];
        assert!(short_rest_gaps(&shifts).is_empty());
    }

    #[test]
    fn overnight_end_feeds_the_gap_calculation() {
        // Rostered the 2nd but ends 02:00 on the 3rd; the gap is measured
        // from the wrapped end, not from the rostered date's midnight.
        let shifts = vec![shift(2, (18, 0), (2, 0), 0), shift(3, (9, 0), (17, 0), 0)];
        let gaps = short_rest_gaps(&shifts);
        assert_eq!(gaps.len(), 1);
        assert!((gaps[0].gap_hours - 7.0).abs() < 1e-9);
    }

    #[test]
    fn consecutive_days_counts_back_from_latest() {
        let shifts = vec![
            shift(1, (9, 0), (17, 0), 0),
            // gap on the 2nd
            shift(3, (9, 0), (17, 0), 0),
            shift(4, (9, 0), (17, 0), 0),
            shift(5, (9, 0), (17, 0), 0),
        ];
        assert_eq!(consecutive_days(&shifts), 3);
    }

    #[test]
    fn two_shifts_same_day_count_one_day() {
        let shifts = vec![shift(4, (7, 0), (11, 0), 0), shift(4, (17, 0), (22, 0), 0)];
        assert_eq!(consecutive_days(&shifts), 1);
    }

    #[test]
    fn casual_two_hour_shift_escalates_a_clean_base_to_medium() {
        let shifts = vec![shift(4, (10, 0), (12, 0), 0)];
        let assessment = assess_worker(Uuid::new_v4(), &shifts, EmploymentType::Casual);

        assert_eq!(assessment.risk_level, RiskLevel::Medium);
        assert_eq!(assessment.warnings.len(), 1);
        assert!(assessment.warnings[0].contains("minimum engagement"));
    }

    #[test]
    fn full_time_short_shift_is_not_an_engagement_issue() {
        let shifts = vec![shift(4, (10, 0), (12, 0), 0)];
        let assessment = assess_worker(Uuid::new_v4(), &shifts, EmploymentType::FullTime);
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert!(assessment.warnings.is_empty());
    }

    #[test]
    fn split_day_over_twelve_hours_warns() {
        let shifts = vec![shift(4, (7, 0), (11, 0), 0), shift(4, (17, 0), (22, 0), 0)];
        let assessment = assess_worker(Uuid::new_v4(), &shifts, EmploymentType::FullTime);
        // 07:00 to 22:00 is a 15 hour spread
        assert!(assessment
            .warnings
            .iter()
            .any(|w| w.contains("Split shifts")));
        assert_eq!(assessment.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn heavy_week_flags_hours_and_long_shifts() {
        let shifts: Vec<ShiftRecord> = (1..=5)
            .map(|d| shift(d, (8, 0), (19, 30), 30))
            .collect();
        let assessment = assess_worker(Uuid::new_v4(), &shifts, EmploymentType::FullTime);

        assert_eq!(assessment.long_shifts.len(), 5);
        assert!((assessment.total_weekly_hours - 55.0).abs() < 1e-9);
        assert!(assessment
            .warnings
            .iter()
            .any(|w| w.contains("rostered hours")));
        assert!(assessment.risk_level >= RiskLevel::Medium);
    }

    #[test]
    fn base_rules_escalate_with_counts() {
        assert_eq!(base_roster_assessment(3, 0, 0).risk_level, RiskLevel::Low);
        assert_eq!(base_roster_assessment(8, 0, 0).risk_level, RiskLevel::Medium);
        assert_eq!(base_roster_assessment(11, 0, 0).risk_level, RiskLevel::High);
        assert_eq!(base_roster_assessment(2, 1, 0).risk_level, RiskLevel::Medium);
        assert_eq!(base_roster_assessment(2, 3, 0).risk_level, RiskLevel::High);
        assert_eq!(base_roster_assessment(2, 0, 3).risk_level, RiskLevel::Medium);
    }

    #[test]
    fn extra_warnings_never_downgrade_a_high_base() {
        let mut shifts: Vec<ShiftRecord> = (1..=11)
            .map(|d| shift(d, (9, 0), (17, 0), 0))
            .collect();
        shifts.push(shift(11, (18, 0), (20, 0), 0));
        let assessment = assess_worker(Uuid::new_v4(), &shifts, EmploymentType::Casual);
        assert_eq!(assessment.risk_level, RiskLevel::High);
    }

    #[test]
    fn base_warnings_precede_additional_warnings() {
        // 8 consecutive days trips the base rule; the 2 hour casual
        // shift on the final day adds an engagement warning after it.
        let mut shifts: Vec<ShiftRecord> = (1..=8)
            .map(|d| shift(d, (9, 0), (17, 0), 0))
            .collect();
        shifts.push(shift(8, (19, 0), (21, 0), 0));
        let assessment = assess_worker(Uuid::new_v4(), &shifts, EmploymentType::Casual);

        assert!(assessment.warnings[0].contains("consecutive rostered days"));
        assert!(assessment
            .warnings
            .iter()
            .skip(1)
            .any(|w| w.contains("minimum engagement")));
    }
}
