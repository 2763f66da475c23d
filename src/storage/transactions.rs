//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json.
//!
//! Records written by older versions may lack a settlement state or carry a
//! date string that no longer parses. Those gaps are resolved here, when a
//! record is loaded, so that nothing above the storage layer ever sees an
//! optional column.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::models::{
    Category, Direction, Money, MonthPeriod, SettlementState, Transaction, TransactionId,
};

use super::file_io::{read_json, write_json_atomic};

/// On-disk shape of a transaction, tolerant of legacy records
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredTransaction {
    id: TransactionId,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    description: Option<String>,
    amount: Money,
    direction: Direction,
    category: Category,
    #[serde(default, alias = "status", skip_serializing_if = "Option::is_none")]
    settlement_state: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl StoredTransaction {
    fn from_transaction(txn: &Transaction) -> Self {
        let date = txn
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .or_else(|| txn.unparsed_date.clone());

        Self {
            id: txn.id,
            date,
            description: Some(txn.description.clone()),
            amount: txn.amount,
            direction: txn.direction,
            category: txn.category,
            settlement_state: Some(state_key(txn.settlement_state).to_string()),
            created_at: Some(txn.created_at),
            updated_at: Some(txn.updated_at),
        }
    }

    /// Resolve optional legacy columns into a domain transaction
    fn resolve(self) -> Result<Transaction, LedgerError> {
        let (date, unparsed_date) = match self.date.as_deref().map(str::trim) {
            None | Some("") => (None, None),
            Some(raw) => match parse_stored_date(raw) {
                Some(date) => (Some(date), None),
                None => {
                    log::warn!(
                        "transaction {} has unparseable date '{}'; excluded from monthly views",
                        self.id,
                        raw
                    );
                    (None, Some(raw.to_string()))
                }
            },
        };

        // An unknown label is treated as unpaid and never overdue, so it
        // neither moves the balance nor raises a false alarm.
        let mut settlement_state = match self.settlement_state.as_deref() {
            None => SettlementState::Settled,
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                log::warn!("transaction {}: {}; treated as in negotiation", self.id, e);
                SettlementState::InNegotiation
            }),
        };

        if self.direction == Direction::Inflow && settlement_state.is_unpaid() {
            log::warn!(
                "inflow {} stored as {}; inflows are always settled",
                self.id,
                settlement_state
            );
            settlement_state = SettlementState::Settled;
        }

        let created_at = self.created_at.unwrap_or_else(Utc::now);

        Ok(Transaction {
            id: self.id,
            date,
            unparsed_date,
            description: self.description.unwrap_or_default(),
            amount: self.amount,
            direction: self.direction,
            category: self.category,
            settlement_state,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        })
    }
}

fn state_key(state: SettlementState) -> &'static str {
    match state {
        SettlementState::Settled => "settled",
        SettlementState::Pending => "pending",
        SettlementState::InNegotiation => "in_negotiation",
    }
}

/// Parse a stored date, accepting plain dates, timestamps and day-first dates
pub(crate) fn parse_stored_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok())
}

/// Serializable transaction file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TransactionData {
    transactions: Vec<StoredTransaction>,
}

/// Repository for transaction persistence with a per-month index
///
/// Mutations write the file first and only touch memory once the write has
/// succeeded, so a failed save leaves the loaded ledger exactly as it was.
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: month -> transaction ids dated in that month
    by_period: RwLock<BTreeMap<MonthPeriod, Vec<TransactionId>>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_period: RwLock::new(BTreeMap::new()),
        }
    }

    fn read_data(&self) -> Result<RwLockReadGuard<'_, HashMap<TransactionId, Transaction>>, LedgerError> {
        self.data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_data(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<TransactionId, Transaction>>, LedgerError> {
        self.data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn write_index(
        &self,
    ) -> Result<RwLockWriteGuard<'_, BTreeMap<MonthPeriod, Vec<TransactionId>>>, LedgerError> {
        self.by_period
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load transactions from disk and rebuild the index
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut loaded = HashMap::with_capacity(file_data.transactions.len());
        for stored in file_data.transactions {
            let txn = stored.resolve()?;
            loaded.insert(txn.id, txn);
        }

        let mut data = self.write_data()?;
        let mut by_period = self.write_index()?;

        by_period.clear();
        for txn in loaded.values() {
            if let Some(date) = txn.date {
                by_period
                    .entry(MonthPeriod::containing(date))
                    .or_default()
                    .push(txn.id);
            }
        }
        *data = loaded;

        Ok(())
    }

    /// Save transactions to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self.read_data()?;
        self.persist(data.values())
    }

    fn persist<'a>(&self, transactions: impl Iterator<Item = &'a Transaction>) -> Result<(), LedgerError> {
        let mut sorted: Vec<&Transaction> = transactions.collect();
        sort_newest_first(&mut sorted);

        let file_data = TransactionData {
            transactions: sorted
                .into_iter()
                .map(StoredTransaction::from_transaction)
                .collect(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, LedgerError> {
        Ok(self.read_data()?.get(&id).cloned())
    }

    /// Get all transactions, newest first, undated last
    pub fn get_all(&self) -> Result<Vec<Transaction>, LedgerError> {
        let data = self.read_data()?;
        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| newest_first(a, b));
        Ok(transactions)
    }

    /// Get transactions dated within a month, newest first
    pub fn get_by_period(&self, period: MonthPeriod) -> Result<Vec<Transaction>, LedgerError> {
        let data = self.read_data()?;
        let by_period = self
            .by_period
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_period.get(&period).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        transactions.sort_by(|a, b| newest_first(a, b));
        Ok(transactions)
    }

    /// Find transactions whose id matches a short or full identifier
    pub fn find_matching(&self, identifier: &str) -> Result<Vec<Transaction>, LedgerError> {
        let data = self.read_data()?;
        Ok(data
            .values()
            .filter(|t| t.id.matches(identifier))
            .cloned()
            .collect())
    }

    /// Insert or update a transaction, persisting before memory changes
    pub fn upsert(&self, txn: Transaction) -> Result<(), LedgerError> {
        let mut data = self.write_data()?;

        self.persist(
            data.values()
                .filter(|t| t.id != txn.id)
                .chain(std::iter::once(&txn)),
        )?;

        let mut by_period = self.write_index()?;
        if let Some(old) = data.get(&txn.id) {
            remove_from_index(&mut by_period, old);
        }
        if let Some(date) = txn.date {
            by_period
                .entry(MonthPeriod::containing(date))
                .or_default()
                .push(txn.id);
        }

        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction, returning it if it existed
    pub fn delete(&self, id: TransactionId) -> Result<Option<Transaction>, LedgerError> {
        let mut data = self.write_data()?;

        if !data.contains_key(&id) {
            return Ok(None);
        }

        self.persist(data.values().filter(|t| t.id != id))?;

        let removed = data.remove(&id);
        if let Some(txn) = &removed {
            let mut by_period = self.write_index()?;
            remove_from_index(&mut by_period, txn);
        }
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, LedgerError> {
        Ok(self.read_data()?.len())
    }
}

fn remove_from_index(by_period: &mut BTreeMap<MonthPeriod, Vec<TransactionId>>, txn: &Transaction) {
    if let Some(date) = txn.date {
        let period = MonthPeriod::containing(date);
        if let Some(ids) = by_period.get_mut(&period) {
            ids.retain(|&id| id != txn.id);
            if ids.is_empty() {
                by_period.remove(&period);
            }
        }
    }
}

fn newest_first(a: &Transaction, b: &Transaction) -> std::cmp::Ordering {
    // `None` sorts below `Some`, so reversing puts undated records last
    b.date
        .cmp(&a.date)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

fn sort_newest_first(transactions: &mut [&Transaction]) {
    transactions.sort_by(|a, b| newest_first(a, b));
}
