use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use tempfile::NamedTempFile;
use tracing::{debug, error};

use crate::categories::Domain;
use crate::error::{BaonError, Result};
use crate::ledger::{BudgetRecord, Ledger, UserLedger, Wallet, WalletTransaction};

/// Owns the single persisted ledger document shared by all users.
///
/// Every mutation runs as a lock-mutate-save cycle behind one mutex, so
/// two users' simultaneous steps cannot interleave into a lost update.
/// Saves go through a temp file in the target directory followed by a
/// rename, so a crash mid-write never corrupts previously-valid data.
pub struct RecordStore {
    path: PathBuf,
    ledger: Mutex<Ledger>,
}

impl RecordStore {
    /// Open the ledger at `path`. A missing file is the first-use case
    /// and yields an empty ledger; an unreadable one is an error.
    pub fn open(path: PathBuf) -> Result<Self> {
        let ledger = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Ledger::new()
        };

        Ok(RecordStore {
            path,
            ledger: Mutex::new(ledger),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        // A poisoned lock still holds a consistent ledger: every write
        // completes its mutation before persisting.
        self.ledger.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn persist(&self, ledger: &Ledger) -> Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, ledger)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| {
            error!("failed to persist ledger: {}", e.error);
            BaonError::Io(e.error)
        })?;

        debug!("ledger persisted to {}", self.path.display());
        Ok(())
    }

    /// Idempotent: returns the user's entry, creating the zero-value
    /// structure on first contact.
    pub fn ensure_user(&self, user_id: &str) -> Result<UserLedger> {
        let mut ledger = self.lock();
        if ledger.contains_key(user_id) {
            return Ok(ledger[user_id].clone());
        }
        let user = ledger.entry(user_id.to_string()).or_default().clone();
        self.persist(&ledger)?;
        Ok(user)
    }

    pub fn user(&self, user_id: &str) -> Option<UserLedger> {
        self.lock().get(user_id).cloned()
    }

    pub fn wallet(&self, user_id: &str) -> Option<Wallet> {
        self.lock().get(user_id).map(|u| u.wallet.clone())
    }

    pub fn has_finalized_on(&self, user_id: &str, domain: Domain, date: NaiveDate) -> bool {
        self.lock()
            .get(user_id)
            .map(|u| u.domain(domain).finalized_on(date))
            .unwrap_or(false)
    }

    /// Append a new record to the domain's sequence and persist.
    pub fn append_record(&self, user_id: &str, record: BudgetRecord) -> Result<()> {
        let domain = record.domain();
        let mut ledger = self.lock();
        ledger
            .entry(user_id.to_string())
            .or_default()
            .domain_mut(domain)
            .transactions
            .push(record);
        self.persist(&ledger)
    }

    /// Mutate the last record of the domain's sequence and persist,
    /// returning a snapshot of the mutated record. The sequence being
    /// empty means the conversation outlived its record (for example a
    /// restart mid-flow).
    pub fn update_active_record<F>(
        &self,
        user_id: &str,
        domain: Domain,
        mutate: F,
    ) -> Result<BudgetRecord>
    where
        F: FnOnce(&mut BudgetRecord),
    {
        let mut ledger = self.lock();
        let record = ledger
            .get_mut(user_id)
            .and_then(|u| u.domain_mut(domain).transactions.last_mut())
            .ok_or(BaonError::NoActiveRecord(domain))?;

        mutate(record);
        let snapshot = record.clone();
        self.persist(&ledger)?;
        Ok(snapshot)
    }

    /// Add money to the wallet, appending a transaction to its log.
    pub fn deposit(&self, user_id: &str, amount: f64) -> Result<Wallet> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(BaonError::InvalidAmount(amount.to_string()));
        }

        let mut ledger = self.lock();
        let wallet = &mut ledger.entry(user_id.to_string()).or_default().wallet;
        wallet.current_balance += amount;
        let balance_after = wallet.current_balance;
        wallet
            .transactions
            .push(WalletTransaction::deposit(amount, balance_after));
        let snapshot = wallet.clone();
        self.persist(&ledger)?;
        Ok(snapshot)
    }
}
