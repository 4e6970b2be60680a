//! Expense service
//!
//! Provides business logic for shared expenses: creating them with even,
//! weighted, or custom splits, editing, and deletion. Every write is
//! validated against the split conservation rule before it is persisted.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, ExpenseId, MemberId, Money, Month, Split};
use crate::storage::Storage;

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record an expense split evenly across the participants.
    ///
    /// When the amount does not divide evenly the leftover cents go to the
    /// earliest participants, one cent each, so the shares always conserve
    /// the total.
    pub fn add_even(
        &self,
        payer_id: MemberId,
        amount: Money,
        participants: &[MemberId],
        date: NaiveDate,
        description: &str,
        category: Option<&str>,
    ) -> LedgerResult<Expense> {
        if participants.is_empty() {
            return Err(LedgerError::Validation(
                "An expense needs at least one participant".into(),
            ));
        }

        let shares = amount.split_evenly(participants.len());
        let splits = participants
            .iter()
            .zip(shares)
            .map(|(&member_id, share)| Split::new(member_id, share))
            .collect();

        self.add_custom(payer_id, amount, splits, date, description, category)
    }

    /// Record an expense split proportionally to integer weights.
    pub fn add_weighted(
        &self,
        payer_id: MemberId,
        amount: Money,
        weighted: &[(MemberId, u32)],
        date: NaiveDate,
        description: &str,
        category: Option<&str>,
    ) -> LedgerResult<Expense> {
        if weighted.is_empty() {
            return Err(LedgerError::Validation(
                "An expense needs at least one participant".into(),
            ));
        }

        let weights: Vec<u32> = weighted.iter().map(|(_, w)| *w).collect();
        if weights.iter().all(|&w| w == 0) {
            return Err(LedgerError::Validation(
                "At least one split weight must be nonzero".into(),
            ));
        }

        let shares = amount.allocate_ratios(&weights);
        let splits = weighted
            .iter()
            .zip(shares)
            .map(|(&(member_id, _), share)| Split::new(member_id, share))
            .collect();

        self.add_custom(payer_id, amount, splits, date, description, category)
    }

    /// Record an expense with explicit per-member shares.
    pub fn add_custom(
        &self,
        payer_id: MemberId,
        amount: Money,
        splits: Vec<Split>,
        date: NaiveDate,
        description: &str,
        category: Option<&str>,
    ) -> LedgerResult<Expense> {
        let description = description.trim();
        if description.is_empty() {
            return Err(LedgerError::Validation(
                "Expense description cannot be empty".into(),
            ));
        }

        if !self.storage.members.exists(payer_id)? {
            return Err(LedgerError::member_not_found(payer_id.to_string()));
        }
        for split in &splits {
            if !self.storage.members.exists(split.member_id)? {
                return Err(LedgerError::member_not_found(split.member_id.to_string()));
            }
        }

        let mut expense = Expense::new(payer_id, amount, splits, date, description);
        expense.category = category.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());

        expense
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;

        Ok(expense)
    }

    /// Get an expense by ID
    pub fn get(&self, id: ExpenseId) -> LedgerResult<Option<Expense>> {
        self.storage.expenses.get(id)
    }

    /// List all expenses, newest first
    pub fn list(&self) -> LedgerResult<Vec<Expense>> {
        self.storage.expenses.get_all()
    }

    /// List expenses for a month, newest first
    pub fn list_for_month(&self, month: Month) -> LedgerResult<Vec<Expense>> {
        self.storage.expenses.get_by_month(month)
    }

    /// List expenses paid by one member, newest first
    pub fn list_for_payer(&self, payer_id: MemberId) -> LedgerResult<Vec<Expense>> {
        self.storage.expenses.get_by_payer(payer_id)
    }

    /// Update an expense's description, category, date, amount, or
    /// recurring flag.
    ///
    /// Moving the date into a different month relabels the expense's billing
    /// month to match. Changing the amount redistributes the existing splits
    /// proportionally so the conservation rule keeps holding.
    pub fn update(
        &self,
        id: ExpenseId,
        description: Option<&str>,
        category: Option<&str>,
        date: Option<NaiveDate>,
        amount: Option<Money>,
        recurring: Option<bool>,
    ) -> LedgerResult<Expense> {
        let mut expense = self
            .storage
            .expenses
            .get(id)?
            .ok_or_else(|| LedgerError::expense_not_found(id.to_string()))?;

        let before = expense.clone();

        if let Some(description) = description {
            let description = description.trim();
            if description.is_empty() {
                return Err(LedgerError::Validation(
                    "Expense description cannot be empty".into(),
                ));
            }
            expense.description = description.to_string();
        }

        if let Some(category) = category {
            let category = category.trim();
            expense.category = if category.is_empty() {
                None
            } else {
                Some(category.to_string())
            };
        }

        if let Some(date) = date {
            expense.date = date;
            expense.month = Month::of(date);
        }

        if let Some(amount) = amount {
            if !amount.is_positive() {
                return Err(LedgerError::Validation(
                    "Expense amount must be positive".into(),
                ));
            }
            if amount != expense.amount {
                let weights: Vec<u32> = expense
                    .splits
                    .iter()
                    .map(|s| s.share.cents().clamp(0, u32::MAX as i64) as u32)
                    .collect();
                let shares = if weights.iter().all(|&w| w == 0) {
                    amount.split_evenly(expense.splits.len())
                } else {
                    amount.allocate_ratios(&weights)
                };
                let splits = expense
                    .splits
                    .iter()
                    .zip(shares)
                    .map(|(split, share)| Split::new(split.member_id, share))
                    .collect();
                expense.amount = amount;
                expense.set_splits(splits);
            }
        }

        if let Some(recurring) = recurring {
            expense.recurring = recurring;
        }

        expense.updated_at = chrono::Utc::now();
        expense
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &before,
            &expense,
        )?;

        Ok(expense)
    }

    /// Replace an expense's splits with an even split across new participants.
    pub fn resplit_even(&self, id: ExpenseId, participants: &[MemberId]) -> LedgerResult<Expense> {
        if participants.is_empty() {
            return Err(LedgerError::Validation(
                "An expense needs at least one participant".into(),
            ));
        }
        for &member_id in participants {
            if !self.storage.members.exists(member_id)? {
                return Err(LedgerError::member_not_found(member_id.to_string()));
            }
        }

        let mut expense = self
            .storage
            .expenses
            .get(id)?
            .ok_or_else(|| LedgerError::expense_not_found(id.to_string()))?;

        let before = expense.clone();

        let shares = expense.amount.split_evenly(participants.len());
        let splits = participants
            .iter()
            .zip(shares)
            .map(|(&member_id, share)| Split::new(member_id, share))
            .collect();
        expense.set_splits(splits);

        expense
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &before,
            &expense,
        )?;

        Ok(expense)
    }

    /// Delete an expense
    pub fn delete(&self, id: ExpenseId) -> LedgerResult<Expense> {
        let expense = self
            .storage
            .expenses
            .get(id)?
            .ok_or_else(|| LedgerError::expense_not_found(id.to_string()))?;

        self.storage.expenses.delete(id)?;
        self.storage.expenses.save()?;

        self.storage.log_delete(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;

        Ok(expense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::Member;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn add_members(storage: &Storage, names: &[&str]) -> Vec<MemberId> {
        names
            .iter()
            .map(|name| {
                let member = Member::new(*name);
                let id = member.id;
                storage.members.upsert(member).unwrap();
                id
            })
            .collect()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_add_even_split_conserves_total() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);
        let ids = add_members(&storage, &["Alice", "Bob", "Cleo"]);

        let expense = service
            .add_even(ids[0], Money::from_cents(1000), &ids, date(), "Pizza", None)
            .unwrap();

        let shares: Vec<i64> = expense.splits.iter().map(|s| s.share.cents()).collect();
        assert_eq!(shares, vec![334, 333, 333]);
        assert_eq!(expense.splits_total(), expense.amount);
    }

    #[test]
    fn test_add_weighted() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);
        let ids = add_members(&storage, &["Alice", "Bob"]);

        // Alice takes 2 parts, Bob 1 part of 900
        let expense = service
            .add_weighted(
                ids[0],
                Money::from_cents(900),
                &[(ids[0], 2), (ids[1], 1)],
                date(),
                "Utilities",
                Some("bills"),
            )
            .unwrap();

        assert_eq!(expense.share_of(ids[0]).cents(), 600);
        assert_eq!(expense.share_of(ids[1]).cents(), 300);
        assert_eq!(expense.category.as_deref(), Some("bills"));
    }

    #[test]
    fn test_add_custom_mismatch_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);
        let ids = add_members(&storage, &["Alice", "Bob"]);

        let result = service.add_custom(
            ids[0],
            Money::from_cents(1000),
            vec![
                Split::new(ids[0], Money::from_cents(400)),
                Split::new(ids[1], Money::from_cents(400)),
            ],
            date(),
            "Short splits",
            None,
        );

        assert!(matches!(result, Err(LedgerError::Validation(_))));
        assert_eq!(service.list().unwrap().len(), 0);
    }

    #[test]
    fn test_unknown_payer_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);
        let ids = add_members(&storage, &["Alice"]);
        let ghost = MemberId::new();

        let result = service.add_even(
            ghost,
            Money::from_cents(1000),
            &[ids[0]],
            date(),
            "Ghost payer",
            None,
        );

        assert!(matches!(result, Err(LedgerError::NotFound { .. })));
    }

    #[test]
    fn test_unknown_participant_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);
        let ids = add_members(&storage, &["Alice"]);
        let ghost = MemberId::new();

        let result = service.add_even(
            ids[0],
            Money::from_cents(1000),
            &[ids[0], ghost],
            date(),
            "Ghost split",
            None,
        );

        assert!(matches!(result, Err(LedgerError::NotFound { .. })));
    }

    #[test]
    fn test_update_date_relabels_month() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);
        let ids = add_members(&storage, &["Alice"]);

        let expense = service
            .add_even(ids[0], Money::from_cents(1000), &ids, date(), "Rent", None)
            .unwrap();
        assert_eq!(expense.month, Month::new(2025, 3).unwrap());

        let moved = service
            .update(
                expense.id,
                None,
                None,
                Some(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()),
                None,
                None,
            )
            .unwrap();

        assert_eq!(moved.month, Month::new(2025, 4).unwrap());
        assert_eq!(
            service
                .list_for_month(Month::new(2025, 4).unwrap())
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_update_amount_rescales_splits() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);
        let ids = add_members(&storage, &["Alice", "Bob"]);

        // 60/40 split of 10.00
        let expense = service
            .add_custom(
                ids[0],
                Money::from_cents(1000),
                vec![
                    Split::new(ids[0], Money::from_cents(600)),
                    Split::new(ids[1], Money::from_cents(400)),
                ],
                date(),
                "Takeout",
                None,
            )
            .unwrap();

        let updated = service
            .update(expense.id, None, None, None, Some(Money::from_cents(500)), None)
            .unwrap();

        assert_eq!(updated.amount.cents(), 500);
        assert_eq!(updated.share_of(ids[0]).cents(), 300);
        assert_eq!(updated.share_of(ids[1]).cents(), 200);
        assert_eq!(updated.splits_total(), updated.amount);
    }

    #[test]
    fn test_resplit_even() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);
        let ids = add_members(&storage, &["Alice", "Bob"]);

        let expense = service
            .add_even(
                ids[0],
                Money::from_cents(1000),
                &[ids[0]],
                date(),
                "Initially solo",
                None,
            )
            .unwrap();

        let resplit = service.resplit_even(expense.id, &ids).unwrap();
        assert_eq!(resplit.splits.len(), 2);
        assert_eq!(resplit.share_of(ids[1]).cents(), 500);
        assert_eq!(resplit.splits_total(), resplit.amount);
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);
        let ids = add_members(&storage, &["Alice"]);

        let expense = service
            .add_even(ids[0], Money::from_cents(500), &ids, date(), "Snacks", None)
            .unwrap();

        service.delete(expense.id).unwrap();
        assert!(service.get(expense.id).unwrap().is_none());

        let result = service.delete(expense.id);
        assert!(matches!(result, Err(LedgerError::NotFound { .. })));
    }

    #[test]
    fn test_zero_weights_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);
        let ids = add_members(&storage, &["Alice", "Bob"]);

        let result = service.add_weighted(
            ids[0],
            Money::from_cents(900),
            &[(ids[0], 0), (ids[1], 0)],
            date(),
            "No weights",
            None,
        );

        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }
}
