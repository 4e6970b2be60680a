//! Settlement service
//!
//! Records payments between members. Every request is validated against a
//! single loaded snapshot of the ledger before insertion, so the check and
//! the write cannot disagree about what was owed. Rejected requests are
//! written to the audit log with their reason and never touch the ledger.

use chrono::NaiveDate;
use serde_json::json;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{validate_settlement, SettlementCheck};
use crate::models::{MemberId, Money, Month, Settlement, SettlementId};
use crate::storage::Storage;

/// Service for settlement management
pub struct SettlementService<'a> {
    storage: &'a Storage,
}

impl<'a> SettlementService<'a> {
    /// Create a new settlement service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Validate a proposed settlement without recording anything.
    pub fn check(&self, from: MemberId, to: MemberId, amount: Money) -> LedgerResult<SettlementCheck> {
        let members = self.storage.members.get_all()?;
        let expenses = self.storage.expenses.get_all()?;
        let settlements = self.storage.settlements.get_all()?;

        Ok(validate_settlement(
            &members,
            &expenses,
            &settlements,
            from,
            to,
            amount,
        ))
    }

    /// Record a settlement payment from one member to another.
    ///
    /// The payment must not exceed what the payer directly owes the payee.
    /// Invalid requests are refused, logged with their reason, and leave the
    /// ledger untouched.
    pub fn record(
        &self,
        from: MemberId,
        to: MemberId,
        amount: Money,
        date: NaiveDate,
        note: Option<&str>,
    ) -> LedgerResult<Settlement> {
        let check = self.check(from, to, amount)?;

        if !check.valid {
            let reason = check
                .error
                .unwrap_or_else(|| "Settlement was refused.".to_string());

            self.storage.log_reject(
                EntityType::Settlement,
                Some(format!("{} -> {}", from, to)),
                &json!({
                    "from": from,
                    "to": to,
                    "amount": amount,
                    "date": date,
                }),
                reason.clone(),
            )?;

            return Err(LedgerError::Validation(reason));
        }

        let mut settlement = Settlement::new(from, to, amount, date);
        settlement.note = note.map(|n| n.trim().to_string()).unwrap_or_default();

        self.storage.settlements.upsert(settlement.clone())?;
        self.storage.settlements.save()?;

        self.storage.log_create(
            EntityType::Settlement,
            settlement.id.to_string(),
            Some(format!("{} -> {}", from, to)),
            &settlement,
        )?;

        Ok(settlement)
    }

    /// Get a settlement by ID
    pub fn get(&self, id: SettlementId) -> LedgerResult<Option<Settlement>> {
        self.storage.settlements.get(id)
    }

    /// List all settlements, newest first
    pub fn list(&self) -> LedgerResult<Vec<Settlement>> {
        self.storage.settlements.get_all()
    }

    /// List settlements for a month, newest first
    pub fn list_for_month(&self, month: Month) -> LedgerResult<Vec<Settlement>> {
        self.storage.settlements.get_by_month(month)
    }

    /// Delete a settlement (undo a mistaken payment record)
    pub fn delete(&self, id: SettlementId) -> LedgerResult<Settlement> {
        let settlement = self
            .storage
            .settlements
            .get(id)?
            .ok_or_else(|| LedgerError::settlement_not_found(id.to_string()))?;

        self.storage.settlements.delete(id)?;
        self.storage.settlements.save()?;

        self.storage.log_delete(
            EntityType::Settlement,
            settlement.id.to_string(),
            Some(format!(
                "{} -> {}",
                settlement.from_member, settlement.to_member
            )),
            &settlement,
        )?;

        Ok(settlement)
    }
}
