//! Transaction service
//!
//! Creates, lists, settles and deletes ledger transactions. Every mutation
//! is validated, written to disk and then recorded in the audit log.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Category, Direction, Money, MonthPeriod, SettlementState, Transaction, TransactionId,
};
use crate::storage::Storage;

use super::recurring::RecurringService;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub period: Option<MonthPeriod>,
    pub category: Option<Category>,
    pub state: Option<SettlementState>,
    pub direction: Option<Direction>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period(mut self, period: MonthPeriod) -> Self {
        self.period = Some(period);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn state(mut self, state: SettlementState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub direction: Direction,
    pub category: Category,
    /// Requested state; ignored for inflows, which are always settled
    pub state: Option<SettlementState>,
    /// Also store the entry as a recurring template
    pub save_as_template: bool,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new transaction
    pub fn create(&self, input: CreateTransactionInput) -> LedgerResult<Transaction> {
        if !input.amount.is_positive() {
            return Err(LedgerError::Validation(format!(
                "Amount must be greater than zero (got {})",
                input.amount
            )));
        }

        let state = match (input.direction, input.state) {
            (Direction::Inflow, Some(requested)) if requested.is_unpaid() => {
                log::debug!("ignoring requested state {} for an inflow", requested);
                SettlementState::Settled
            }
            (_, requested) => requested.unwrap_or_default(),
        };

        if input.save_as_template && input.direction == Direction::Inflow {
            return Err(LedgerError::Validation(
                "Only outflows can be saved as recurring templates".into(),
            ));
        }

        let txn = Transaction::new(
            input.date,
            input.description.trim(),
            input.amount,
            input.direction,
            input.category,
        )
        .with_state(state);

        txn.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let template = if input.save_as_template {
            Some(RecurringService::prepare(
                &txn.description,
                txn.amount,
                txn.category,
            )?)
        } else {
            None
        };

        self.storage.transactions.upsert(txn.clone())?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.description.clone()),
            &txn,
        )?;
        log::info!("created transaction {} ({})", txn.id, txn);

        if let Some(template) = template {
            RecurringService::new(self.storage).insert(template)?;
        }

        Ok(txn)
    }

    pub fn get(&self, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by full UUID or short `txn-` identifier
    pub fn find(&self, identifier: &str) -> LedgerResult<Transaction> {
        if let Ok(id) = identifier.trim().parse::<TransactionId>() {
            if let Some(txn) = self.storage.transactions.get(id)? {
                return Ok(txn);
            }
        }

        let mut matches = self.storage.transactions.find_matching(identifier)?;
        match matches.len() {
            0 => Err(LedgerError::transaction_not_found(identifier)),
            1 => Ok(matches.remove(0)),
            _ => Err(LedgerError::Ambiguous {
                entity_type: "Transaction",
                identifier: identifier.to_string(),
            }),
        }
    }

    /// List transactions, newest first
    pub fn list(&self, filter: TransactionFilter) -> LedgerResult<Vec<Transaction>> {
        let mut transactions = match filter.period {
            Some(period) => self.storage.transactions.get_by_period(period)?,
            None => self.storage.transactions.get_all()?,
        };

        if let Some(category) = filter.category {
            transactions.retain(|t| t.category == category);
        }
        if let Some(state) = filter.state {
            transactions.retain(|t| t.settlement_state == state);
        }
        if let Some(direction) = filter.direction {
            transactions.retain(|t| t.direction == direction);
        }
        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// Mark a pending or in-negotiation outflow as paid
    pub fn mark_settled(&self, id: TransactionId) -> LedgerResult<Transaction> {
        let mut txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;

        let before = txn.clone();
        txn.mark_settled()
            .map_err(|e| LedgerError::InvalidTransition {
                id: id.to_string(),
                reason: e.to_string(),
            })?;

        self.storage.transactions.upsert(txn.clone())?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.description.clone()),
            &before,
            &txn,
        )?;
        log::info!("settled transaction {} ({})", txn.id, txn.amount);

        Ok(txn)
    }

    /// Delete a transaction
    pub fn delete(&self, id: TransactionId) -> LedgerResult<Transaction> {
        let txn = self
            .storage
            .transactions
            .delete(id)?
            .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;

        self.storage.log_delete(
            EntityType::Transaction,
            id.to_string(),
            Some(txn.description.clone()),
            &txn,
        )?;
        log::info!("deleted transaction {}", id);

        Ok(txn)
    }
}
