use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::categories::{CategoryPlan, Domain};

/// The full persisted collection of all users' records and wallets,
/// keyed by opaque user-ID string.
pub type Ledger = BTreeMap<String, UserLedger>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserLedger {
    #[serde(default)]
    pub school: DomainLog,
    #[serde(default)]
    pub life: DomainLog,
    #[serde(default)]
    pub wallet: Wallet,
}

impl UserLedger {
    pub fn domain(&self, domain: Domain) -> &DomainLog {
        match domain {
            Domain::School => &self.school,
            Domain::Life => &self.life,
        }
    }

    pub fn domain_mut(&mut self, domain: Domain) -> &mut DomainLog {
        match domain {
            Domain::School => &mut self.school,
            Domain::Life => &mut self.life,
        }
    }
}

/// Append-only record sequence for one domain. The active record of a
/// conversation is always the last element; older records are never
/// mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainLog {
    #[serde(default)]
    pub transactions: Vec<BudgetRecord>,
}

impl DomainLog {
    pub fn active(&self) -> Option<&BudgetRecord> {
        self.transactions.last()
    }

    pub fn finalized_on(&self, date: NaiveDate) -> bool {
        self.transactions
            .iter()
            .any(|r| r.date() == date && r.is_finalized())
    }
}

/// One day's budgeting record. School and life share the shape but store
/// the period amount under different field names, so the persisted form
/// is tagged by domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BudgetRecord {
    School {
        date: NaiveDate,
        allowance: f64,
        thresholds: BTreeMap<String, f64>,
        #[serde(default)]
        spent: BTreeMap<String, f64>,
        #[serde(default)]
        total_saved: f64,
    },
    Life {
        date: NaiveDate,
        budget: f64,
        thresholds: BTreeMap<String, f64>,
        #[serde(default)]
        spent: BTreeMap<String, f64>,
        #[serde(default)]
        total_saved: f64,
    },
}

impl BudgetRecord {
    pub fn new(
        domain: Domain,
        date: NaiveDate,
        amount: f64,
        thresholds: BTreeMap<String, f64>,
    ) -> Self {
        match domain {
            Domain::School => BudgetRecord::School {
                date,
                allowance: amount,
                thresholds,
                spent: BTreeMap::new(),
                total_saved: 0.0,
            },
            Domain::Life => BudgetRecord::Life {
                date,
                budget: amount,
                thresholds,
                spent: BTreeMap::new(),
                total_saved: 0.0,
            },
        }
    }

    pub fn domain(&self) -> Domain {
        match self {
            BudgetRecord::School { .. } => Domain::School,
            BudgetRecord::Life { .. } => Domain::Life,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            BudgetRecord::School { date, .. } | BudgetRecord::Life { date, .. } => *date,
        }
    }

    /// The allowance (school) or budget (life) entered at the start of
    /// the conversation.
    pub fn amount(&self) -> f64 {
        match self {
            BudgetRecord::School { allowance, .. } => *allowance,
            BudgetRecord::Life { budget, .. } => *budget,
        }
    }

    pub fn thresholds(&self) -> &BTreeMap<String, f64> {
        match self {
            BudgetRecord::School { thresholds, .. } | BudgetRecord::Life { thresholds, .. } => {
                thresholds
            }
        }
    }

    pub fn spent(&self) -> &BTreeMap<String, f64> {
        match self {
            BudgetRecord::School { spent, .. } | BudgetRecord::Life { spent, .. } => spent,
        }
    }

    pub fn spent_mut(&mut self) -> &mut BTreeMap<String, f64> {
        match self {
            BudgetRecord::School { spent, .. } | BudgetRecord::Life { spent, .. } => spent,
        }
    }

    pub fn total_saved(&self) -> f64 {
        match self {
            BudgetRecord::School { total_saved, .. } | BudgetRecord::Life { total_saved, .. } => {
                *total_saved
            }
        }
    }

    /// A record is finalized once every prompted category has a spent
    /// entry; stranded mid-conversation records never reach this point.
    pub fn is_finalized(&self) -> bool {
        self.spent().len() >= self.domain().plan().prompted_count()
    }

    /// total_saved / amount, defined as 0 when the amount is 0.
    pub fn savings_rate(&self) -> f64 {
        if self.amount() > 0.0 {
            self.total_saved() / self.amount()
        } else {
            0.0
        }
    }

    /// Compute and store total_saved from the current spent entries.
    /// Guaranteed categories credit their full threshold; everything else
    /// credits threshold minus spent (negative when over).
    pub fn finalize(&mut self) {
        let total = saved_total(self.domain().plan(), self.thresholds(), self.spent());
        match self {
            BudgetRecord::School { total_saved, .. } | BudgetRecord::Life { total_saved, .. } => {
                *total_saved = total;
            }
        }
    }
}

fn saved_total(
    plan: &CategoryPlan,
    thresholds: &BTreeMap<String, f64>,
    spent: &BTreeMap<String, f64>,
) -> f64 {
    plan.categories
        .iter()
        .map(|cat| {
            let threshold = thresholds.get(cat.key).copied().unwrap_or(0.0);
            if cat.guaranteed {
                threshold
            } else {
                threshold - spent.get(cat.key).copied().unwrap_or(0.0)
            }
        })
        .sum()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    #[serde(default)]
    pub current_balance: f64,
    /// Reserved for future transfer logic.
    #[serde(default)]
    pub total_savings: f64,
    #[serde(default)]
    pub transactions: Vec<WalletTransaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub balance_after: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
}

impl WalletTransaction {
    pub fn deposit(amount: f64, balance_after: f64) -> Self {
        WalletTransaction {
            id: Uuid::new_v4().to_string(),
            date: Local::now().to_rfc3339(),
            kind: TransactionKind::Deposit,
            amount,
            balance_after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::allocate;
    use crate::categories::SCHOOL_PLAN;

    fn school_record(allowance: f64) -> BudgetRecord {
        let date = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();
        let thresholds = allocate(allowance, &SCHOOL_PLAN).unwrap();
        BudgetRecord::new(Domain::School, date, allowance, thresholds)
    }

    #[test]
    fn test_persisted_field_names() {
        let record = school_record(1000.0);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "school");
        assert_eq!(value["allowance"], 1000.0);
        assert_eq!(value["date"], "2026-08-20");
        assert!(value["thresholds"].is_object());
        assert!(value.get("budget").is_none());

        let thresholds = allocate(500.0, Domain::Life.plan()).unwrap();
        let record = BudgetRecord::new(
            Domain::Life,
            NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
            500.0,
            thresholds,
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "life");
        assert_eq!(value["budget"], 500.0);
        assert!(value.get("allowance").is_none());
    }

    #[test]
    fn test_finalize_total_saved() {
        // Everything spent exactly at threshold except transport at half:
        // total_saved = guaranteed 150 + half of transport's 200.
        let mut record = school_record(1000.0);
        for cat in SCHOOL_PLAN.prompted() {
            let threshold = record.thresholds()[cat.key];
            let spent = if cat.key == "transport" {
                threshold / 2.0
            } else {
                threshold
            };
            record.spent_mut().insert(cat.key.to_string(), spent);
        }
        assert!(record.is_finalized());
        record.finalize();
        assert!((record.total_saved() - 250.0).abs() < 1e-9);
        assert!((record.savings_rate() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_total_saved_can_go_negative() {
        let mut record = school_record(100.0);
        for cat in SCHOOL_PLAN.prompted() {
            record.spent_mut().insert(cat.key.to_string(), 100.0);
        }
        record.finalize();
        assert!(record.total_saved() < 0.0);
    }

    #[test]
    fn test_partial_record_is_not_finalized() {
        let mut record = school_record(1000.0);
        assert!(!record.is_finalized());
        record.spent_mut().insert("transport".to_string(), 50.0);
        assert!(!record.is_finalized());
    }

    #[test]
    fn test_savings_rate_zero_allowance() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();
        let record = BudgetRecord::new(Domain::School, date, 0.0, BTreeMap::new());
        assert_eq!(record.savings_rate(), 0.0);
    }
}
