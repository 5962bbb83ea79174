use chrono::NaiveDate;
use entity::employee::fields;
use entity::{EmployeeRecord, NO, YES};
use serde::{Deserialize, Serialize};

const DATE_FMT: &str = "%Y-%m-%d";

/// In-memory roster: the active and terminated sequences.
///
/// Membership is mutually exclusive by construction: a record moves
/// between the two sides, it is never present in both. The persisted
/// snapshot is the authoritative copy; this split is a derived view,
/// recomputed on every load.
#[derive(Clone, Debug, Default)]
pub struct RosterStore {
    pub active: Vec<EmployeeRecord>,
    pub terminated: Vec<EmployeeRecord>,
}

/// A restorable copy of the roster, taken immediately before a
/// reconciliation run. Only the most recent snapshot is retained and there
/// is no redo.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub active: Vec<EmployeeRecord>,
    pub terminated: Vec<EmployeeRecord>,
}

impl RosterStore {
    /// Partition a full stored snapshot on the `terminated` flag.
    pub fn from_snapshot(all: Vec<EmployeeRecord>) -> Self {
        let (terminated, active) = all.into_iter().partition(EmployeeRecord::is_terminated);
        Self { active, terminated }
    }

    /// The full collection, active first, for the replace-everything
    /// persistence call.
    pub fn snapshot(&self) -> Vec<EmployeeRecord> {
        self.active
            .iter()
            .chain(self.terminated.iter())
            .cloned()
            .collect()
    }

    pub fn backup(&self) -> Snapshot {
        Snapshot {
            active: self.active.clone(),
            terminated: self.terminated.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: Snapshot) {
        self.active = snapshot.active;
        self.terminated = snapshot.terminated;
    }

    /// Stamp `terminationDate = today` and move an active record to the
    /// terminated side. Returns false when the index is out of range.
    pub fn terminate(&mut self, index: usize, today: NaiveDate) -> bool {
        if index >= self.active.len() {
            return false;
        }
        let mut record = self.active.remove(index);
        record.set(
            fields::TERMINATION_DATE,
            today.format(DATE_FMT).to_string(),
        );
        record.set(fields::TERMINATED, YES);
        self.terminated.push(record);
        true
    }

    /// Move a terminated record back to the active side, clearing the
    /// termination stamp.
    pub fn reactivate(&mut self, index: usize) -> bool {
        if index >= self.terminated.len() {
            return false;
        }
        let mut record = self.terminated.remove(index);
        record.remove(fields::TERMINATION_DATE);
        record.set(fields::TERMINATED, NO);
        self.active.push(record);
        true
    }
}
