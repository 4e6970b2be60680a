//! Settlement repository for JSON storage
//!
//! Manages loading and saving settlements to settlements.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{MemberId, Month, Settlement, SettlementId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable settlement data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct SettlementData {
    settlements: Vec<Settlement>,
}

/// Repository for settlement persistence with indexing
pub struct SettlementRepository {
    path: PathBuf,
    data: RwLock<HashMap<SettlementId, Settlement>>,
    /// Index: month -> settlement_ids
    by_month: RwLock<HashMap<Month, Vec<SettlementId>>>,
}

impl SettlementRepository {
    /// Create a new settlement repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_month: RwLock::new(HashMap::new()),
        }
    }

    /// Load settlements from disk and build indexes
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: SettlementData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_month = self
            .by_month
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_month.clear();

        for settlement in file_data.settlements {
            by_month.entry(settlement.month).or_default().push(settlement.id);
            data.insert(settlement.id, settlement);
        }

        Ok(())
    }

    /// Save settlements to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut settlements: Vec<_> = data.values().cloned().collect();
        settlements.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        let file_data = SettlementData { settlements };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a settlement by ID
    pub fn get(&self, id: SettlementId) -> Result<Option<Settlement>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all settlements, newest first
    pub fn get_all(&self) -> Result<Vec<Settlement>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut settlements: Vec<_> = data.values().cloned().collect();
        settlements.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(settlements)
    }

    /// Get settlements for a month
    pub fn get_by_month(&self, month: Month) -> Result<Vec<Settlement>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_month = self
            .by_month
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_month.get(&month).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut settlements: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        settlements.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(settlements)
    }

    /// Count settlements that involve a member as payer or payee
    pub fn count_involving(&self, member_id: MemberId) -> Result<usize, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .filter(|s| s.from_member == member_id || s.to_member == member_id)
            .count())
    }

    /// Insert or update a settlement
    pub fn upsert(&self, settlement: Settlement) -> Result<(), LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_month = self
            .by_month
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(old) = data.get(&settlement.id) {
            if let Some(ids) = by_month.get_mut(&old.month) {
                ids.retain(|&id| id != settlement.id);
            }
        }

        by_month.entry(settlement.month).or_default().push(settlement.id);
        data.insert(settlement.id, settlement);
        Ok(())
    }

    /// Delete a settlement
    pub fn delete(&self, id: SettlementId) -> Result<bool, LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_month = self
            .by_month
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(settlement) = data.remove(&id) {
            if let Some(ids) = by_month.get_mut(&settlement.month) {
                ids.retain(|&sid| sid != id);
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Count settlements
    pub fn count(&self) -> Result<usize, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
