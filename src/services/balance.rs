//! Balance service
//!
//! Read-only views over the ledger: group-wide balance reports, settle-up
//! plans, and pairwise breakdowns. Everything here recomputes from the raw
//! records on each call; inconsistencies found along the way are reported
//! inside the result instead of failing the read.

use crate::error::LedgerResult;
use crate::ledger::{
    compute_balances, pairwise_breakdown, simplify_debts, BalanceReport, PairwiseBreakdown,
    SuggestedTransfer,
};
use crate::models::{MemberId, Month};
use crate::storage::Storage;

/// Service for balance and debt views
pub struct BalanceService<'a> {
    storage: &'a Storage,
}

impl<'a> BalanceService<'a> {
    /// Create a new balance service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Compute net balances across the entire ledger history.
    pub fn report(&self) -> LedgerResult<BalanceReport> {
        let members = self.storage.members.get_all()?;
        let expenses = self.storage.expenses.get_all()?;
        let settlements = self.storage.settlements.get_all()?;

        Ok(compute_balances(&members, &expenses, &settlements))
    }

    /// Compute net balances restricted to a single billing month.
    pub fn report_for_month(&self, month: Month) -> LedgerResult<BalanceReport> {
        let members = self.storage.members.get_all()?;
        let expenses = self.storage.expenses.get_by_month(month)?;
        let settlements = self.storage.settlements.get_by_month(month)?;

        Ok(compute_balances(&members, &expenses, &settlements))
    }

    /// Suggest a minimal set of payments that would settle the whole group.
    pub fn settle_plan(&self) -> LedgerResult<Vec<SuggestedTransfer>> {
        let report = self.report()?;
        Ok(simplify_debts(&report.balances))
    }

    /// Itemize the mutual position between two members.
    pub fn pairwise(&self, a: MemberId, b: MemberId) -> LedgerResult<PairwiseBreakdown> {
        let expenses = self.storage.expenses.get_all()?;
        let settlements = self.storage.settlements.get_all()?;

        Ok(pairwise_breakdown(&expenses, &settlements, a, b))
    }
}
