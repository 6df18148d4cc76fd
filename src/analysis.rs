use chrono::NaiveDate;

use crate::ledger::BudgetRecord;

/// Minimum number of finalized records before pattern analysis runs.
pub const MIN_RECORDS: usize = 3;

const LOW_RATE: f64 = 0.10;
const HIGH_RATE: f64 = 0.20;

/// Outcome of a pattern analysis. Too little history is a normal,
/// displayable result, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternReport {
    NeedMoreData,
    Report(PatternSummary),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatternSummary {
    pub mean_rate: f64,
    pub best: DayRate,
    pub worst: DayRate,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayRate {
    pub date: NaiveDate,
    pub rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    /// Mean savings rate below 10%: cost-cutting tips.
    CutCosts,
    /// Mean savings rate above 20%: praise, suggest a higher goal.
    RaiseGoal,
    Steady,
}

/// Aggregate savings statistics over a user's finalized records.
/// Ties for best/worst resolve to the first chronological occurrence.
pub fn analyze(history: &[BudgetRecord]) -> PatternReport {
    let finalized: Vec<&BudgetRecord> = history.iter().filter(|r| r.is_finalized()).collect();
    if finalized.len() < MIN_RECORDS {
        return PatternReport::NeedMoreData;
    }

    let rates: Vec<DayRate> = finalized
        .iter()
        .map(|r| DayRate {
            date: r.date(),
            rate: r.savings_rate(),
        })
        .collect();

    let mean_rate = rates.iter().map(|d| d.rate).sum::<f64>() / rates.len() as f64;

    let mut best = rates[0];
    let mut worst = rates[0];
    for day in &rates[1..] {
        if day.rate > best.rate {
            best = *day;
        }
        if day.rate < worst.rate {
            worst = *day;
        }
    }

    let recommendation = if mean_rate < LOW_RATE {
        Recommendation::CutCosts
    } else if mean_rate > HIGH_RATE {
        Recommendation::RaiseGoal
    } else {
        Recommendation::Steady
    };

    PatternReport::Report(PatternSummary {
        mean_rate,
        best,
        worst,
        recommendation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::allocate;
    use crate::categories::{Domain, SCHOOL_PLAN};

    /// Finalized school record with a chosen savings rate.
    fn record(day: u32, allowance: f64, rate: f64) -> BudgetRecord {
        let date = NaiveDate::from_ymd_opt(2026, 8, day).unwrap();
        let thresholds = allocate(allowance, &SCHOOL_PLAN).unwrap();
        let mut record = BudgetRecord::new(Domain::School, date, allowance, thresholds);

        // Spread the target leftover over one category; the guaranteed
        // savings slice (15%) plus transport's leftover set the rate.
        let target_saved = allowance * rate;
        let transport_spent = record.thresholds()["transport"] - (target_saved - allowance * 0.15);
        for cat in SCHOOL_PLAN.prompted() {
            let spent = if cat.key == "transport" {
                transport_spent
            } else {
                record.thresholds()[cat.key]
            };
            record.spent_mut().insert(cat.key.to_string(), spent);
        }
        record.finalize();
        assert!((record.savings_rate() - rate).abs() < 1e-9);
        record
    }

    #[test]
    fn test_insufficient_history() {
        assert_eq!(analyze(&[]), PatternReport::NeedMoreData);
        let history = vec![record(1, 1000.0, 0.1), record(2, 1000.0, 0.2)];
        assert_eq!(analyze(&history), PatternReport::NeedMoreData);
    }

    #[test]
    fn test_unfinalized_records_do_not_count() {
        let mut history = vec![
            record(1, 1000.0, 0.1),
            record(2, 1000.0, 0.2),
            record(3, 1000.0, 0.15),
        ];
        history[2].spent_mut().clear();
        assert_eq!(analyze(&history), PatternReport::NeedMoreData);
    }

    #[test]
    fn test_three_record_report() {
        let history = vec![
            record(19, 1000.0, 0.05),
            record(20, 1000.0, 0.30),
            record(21, 1000.0, 0.15),
        ];
        let PatternReport::Report(summary) = analyze(&history) else {
            panic!("expected a report");
        };
        assert!((summary.mean_rate - 0.5 / 3.0).abs() < 1e-9);
        assert_eq!(summary.best.date, NaiveDate::from_ymd_opt(2026, 8, 20).unwrap());
        assert_eq!(summary.worst.date, NaiveDate::from_ymd_opt(2026, 8, 19).unwrap());
        assert_eq!(summary.recommendation, Recommendation::Steady);
    }

    #[test]
    fn test_tie_break_first_occurrence() {
        let history = vec![
            record(19, 1000.0, 0.30),
            record(20, 1000.0, 0.30),
            record(21, 1000.0, 0.05),
            record(22, 1000.0, 0.05),
        ];
        let PatternReport::Report(summary) = analyze(&history) else {
            panic!("expected a report");
        };
        assert_eq!(summary.best.date, NaiveDate::from_ymd_opt(2026, 8, 19).unwrap());
        assert_eq!(summary.worst.date, NaiveDate::from_ymd_opt(2026, 8, 21).unwrap());
    }

    #[test]
    fn test_recommendation_bands() {
        let low = vec![
            record(19, 1000.0, 0.05),
            record(20, 1000.0, 0.05),
            record(21, 1000.0, 0.05),
        ];
        let PatternReport::Report(summary) = analyze(&low) else {
            panic!("expected a report");
        };
        assert_eq!(summary.recommendation, Recommendation::CutCosts);

        let high = vec![
            record(19, 1000.0, 0.30),
            record(20, 1000.0, 0.25),
            record(21, 1000.0, 0.28),
        ];
        let PatternReport::Report(summary) = analyze(&high) else {
            panic!("expected a report");
        };
        assert_eq!(summary.recommendation, Recommendation::RaiseGoal);
    }
}
