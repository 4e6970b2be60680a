//! Expense repository for JSON storage
//!
//! Manages loading and saving shared expenses to expenses.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{Expense, ExpenseId, MemberId, Month};

use super::file_io::{read_json, write_json_atomic};

/// Serializable expense data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Repository for expense persistence with indexing
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
    /// Index: month -> expense_ids
    by_month: RwLock<HashMap<Month, Vec<ExpenseId>>>,
    /// Index: payer -> expense_ids
    by_payer: RwLock<HashMap<MemberId, Vec<ExpenseId>>>,
}

impl ExpenseRepository {
    /// Create a new expense repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_month: RwLock::new(HashMap::new()),
            by_payer: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from disk and build indexes
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_month = self
            .by_month
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_payer = self
            .by_payer
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_month.clear();
        by_payer.clear();

        for expense in file_data.expenses {
            let id = expense.id;
            by_month.entry(expense.month).or_default().push(id);
            by_payer.entry(expense.payer_id).or_default().push(id);
            data.insert(id, expense);
        }

        Ok(())
    }

    /// Save expenses to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        let file_data = ExpenseData { expenses };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get an expense by ID
    pub fn get(&self, id: ExpenseId) -> Result<Option<Expense>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all expenses, newest first
    pub fn get_all(&self) -> Result<Vec<Expense>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(expenses)
    }

    /// Get expenses for a month
    pub fn get_by_month(&self, month: Month) -> Result<Vec<Expense>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_month = self
            .by_month
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_month.get(&month).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut expenses: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(expenses)
    }

    /// Get expenses paid by a member
    pub fn get_by_payer(&self, payer_id: MemberId) -> Result<Vec<Expense>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_payer = self
            .by_payer
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_payer.get(&payer_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut expenses: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(expenses)
    }

    /// Count expenses that involve a member as payer or split participant
    pub fn count_involving(&self, member_id: MemberId) -> Result<usize, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .filter(|e| {
                e.payer_id == member_id || e.splits.iter().any(|s| s.member_id == member_id)
            })
            .count())
    }

    /// Insert or update an expense
    pub fn upsert(&self, expense: Expense) -> Result<(), LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_month = self
            .by_month
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_payer = self
            .by_payer
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        // Remove from old indexes if updating
        if let Some(old) = data.get(&expense.id) {
            if let Some(ids) = by_month.get_mut(&old.month) {
                ids.retain(|&id| id != expense.id);
            }
            if let Some(ids) = by_payer.get_mut(&old.payer_id) {
                ids.retain(|&id| id != expense.id);
            }
        }

        by_month.entry(expense.month).or_default().push(expense.id);
        by_payer.entry(expense.payer_id).or_default().push(expense.id);

        data.insert(expense.id, expense);
        Ok(())
    }

    /// Delete an expense
    pub fn delete(&self, id: ExpenseId) -> Result<bool, LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_month = self
            .by_month
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_payer = self
            .by_payer
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(expense) = data.remove(&id) {
            if let Some(ids) = by_month.get_mut(&expense.month) {
                ids.retain(|&eid| eid != id);
            }
            if let Some(ids) = by_payer.get_mut(&expense.payer_id) {
                ids.retain(|&eid| eid != id);
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Count expenses
    pub fn count(&self) -> Result<usize, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Split};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ExpenseRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.json");
        let repo = ExpenseRepository::new(path);
        (temp_dir, repo)
    }

    fn test_expense(payer: MemberId, other: MemberId, date: NaiveDate) -> Expense {
        Expense::new(
            payer,
            Money::from_cents(1000),
            vec![
                Split::new(payer, Money::from_cents(500)),
                Split::new(other, Money::from_cents(500)),
            ],
            date,
            "Groceries",
        )
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let payer = MemberId::new();
        let other = MemberId::new();
        let expense = test_expense(payer, other, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        let id = expense.id;

        repo.upsert(expense).unwrap();

        let retrieved = repo.get(id).unwrap().unwrap();
        assert_eq!(retrieved.description, "Groceries");
    }

    #[test]
    fn test_save_and_reload_rebuilds_indexes() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let payer = MemberId::new();
        let other = MemberId::new();
        let expense = test_expense(payer, other, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        let month = expense.month;

        repo.upsert(expense).unwrap();
        repo.save().unwrap();

        let repo2 = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        repo2.load().unwrap();

        assert_eq!(repo2.get_by_month(month).unwrap().len(), 1);
        assert_eq!(repo2.get_by_payer(payer).unwrap().len(), 1);
    }

    #[test]
    fn test_get_by_month() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let payer = MemberId::new();
        let other = MemberId::new();
        let march = test_expense(payer, other, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        let april = test_expense(payer, other, NaiveDate::from_ymd_opt(2025, 4, 2).unwrap());
        let march_month = march.month;

        repo.upsert(march).unwrap();
        repo.upsert(april).unwrap();

        let in_march = repo.get_by_month(march_month).unwrap();
        assert_eq!(in_march.len(), 1);
        assert_eq!(in_march[0].month, march_month);
    }

    #[test]
    fn test_upsert_moves_between_index_buckets() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let payer = MemberId::new();
        let other = MemberId::new();
        let mut expense = test_expense(payer, other, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        let old_month = expense.month;

        repo.upsert(expense.clone()).unwrap();

        // Move the expense into April
        let new_date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        expense.date = new_date;
        expense.month = Month::of(new_date);
        repo.upsert(expense.clone()).unwrap();

        assert!(repo.get_by_month(old_month).unwrap().is_empty());
        assert_eq!(repo.get_by_month(expense.month).unwrap().len(), 1);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_count_involving() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let payer = MemberId::new();
        let other = MemberId::new();
        let bystander = MemberId::new();
        let expense = test_expense(payer, other, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());

        repo.upsert(expense).unwrap();

        assert_eq!(repo.count_involving(payer).unwrap(), 1);
        assert_eq!(repo.count_involving(other).unwrap(), 1);
        assert_eq!(repo.count_involving(bystander).unwrap(), 0);
    }

    #[test]
    fn test_delete_cleans_indexes() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let payer = MemberId::new();
        let other = MemberId::new();
        let expense = test_expense(payer, other, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        let id = expense.id;
        let month = expense.month;

        repo.upsert(expense).unwrap();
        assert!(repo.delete(id).unwrap());

        assert!(repo.get(id).unwrap().is_none());
        assert!(repo.get_by_month(month).unwrap().is_empty());
        assert!(repo.get_by_payer(payer).unwrap().is_empty());
        assert!(!repo.delete(id).unwrap());
    }
}
