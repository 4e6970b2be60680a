//! Member service
//!
//! Provides business logic for household membership: adding, renaming,
//! and removing members, with referential protection for ledger history.

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Member, MemberId};
use crate::storage::Storage;

/// Service for member management
pub struct MemberService<'a> {
    storage: &'a Storage,
}

impl<'a> MemberService<'a> {
    /// Create a new member service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a member to the household
    pub fn add(&self, name: &str) -> LedgerResult<Member> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("Member name cannot be empty".into()));
        }

        if self.storage.members.name_exists(name, None)? {
            return Err(LedgerError::Duplicate {
                entity_type: "Member",
                identifier: name.to_string(),
            });
        }

        let member = Member::new(name);

        self.storage.members.upsert(member.clone())?;
        self.storage.members.save()?;

        self.storage.log_create(
            EntityType::Member,
            member.id.to_string(),
            Some(member.name.clone()),
            &member,
        )?;

        Ok(member)
    }

    /// Get a member by ID
    pub fn get(&self, id: MemberId) -> LedgerResult<Option<Member>> {
        self.storage.members.get(id)
    }

    /// Find a member by name or ID string
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Member>> {
        if let Some(member) = self.storage.members.get_by_name(identifier)? {
            return Ok(Some(member));
        }

        if let Ok(id) = identifier.parse::<MemberId>() {
            return self.storage.members.get(id);
        }

        Ok(None)
    }

    /// Find a member by name or ID string, failing if absent
    pub fn require(&self, identifier: &str) -> LedgerResult<Member> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::member_not_found(identifier))
    }

    /// List all members sorted by name
    pub fn list(&self) -> LedgerResult<Vec<Member>> {
        self.storage.members.get_all()
    }

    /// Rename a member
    ///
    /// Ledger identity is the id, so history is unaffected by the rename.
    pub fn rename(&self, id: MemberId, new_name: &str) -> LedgerResult<Member> {
        let mut member = self
            .storage
            .members
            .get(id)?
            .ok_or_else(|| LedgerError::member_not_found(id.to_string()))?;

        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(LedgerError::Validation("Member name cannot be empty".into()));
        }

        if self.storage.members.name_exists(new_name, Some(id))? {
            return Err(LedgerError::Duplicate {
                entity_type: "Member",
                identifier: new_name.to_string(),
            });
        }

        let before = member.clone();
        member.rename(new_name);

        self.storage.members.upsert(member.clone())?;
        self.storage.members.save()?;

        self.storage.log_update(
            EntityType::Member,
            member.id.to_string(),
            Some(member.name.clone()),
            &before,
            &member,
        )?;

        Ok(member)
    }

    /// Remove a member from the household
    ///
    /// Refused while any expense or settlement references the member, since
    /// deleting a referenced member would break the zero-sum invariant.
    pub fn remove(&self, id: MemberId) -> LedgerResult<Member> {
        let member = self
            .storage
            .members
            .get(id)?
            .ok_or_else(|| LedgerError::member_not_found(id.to_string()))?;

        let expenses = self.storage.expenses.count_involving(id)?;
        let settlements = self.storage.settlements.count_involving(id)?;
        if expenses > 0 || settlements > 0 {
            return Err(LedgerError::MemberHasHistory {
                name: member.name.clone(),
                expenses,
                settlements,
            });
        }

        self.storage.members.delete(id)?;
        self.storage.members.save()?;

        self.storage.log_delete(
            EntityType::Member,
            member.id.to_string(),
            Some(member.name.clone()),
            &member,
        )?;

        Ok(member)
    }
}
