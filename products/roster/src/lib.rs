//! `products-roster` — the employee roster engine.
//!
//! Identity matching, smart-import reconciliation, duplicate detection and
//! field-level merging over in-memory records. Pure engine crate: no IO,
//! no HTTP, no rendering dependency.

pub mod duplicates;
pub mod error;
pub mod identity;
pub mod import;
pub mod merge;
pub mod reconcile;
pub mod store;

pub use duplicates::{DuplicateHit, MatchType, find_duplicates};
pub use error::RosterError;
pub use identity::is_same_employee;
pub use import::{parse_name, parse_roster_csv};
pub use merge::merge_employee_data;
pub use reconcile::{ImportSummary, smart_import};
pub use store::{RosterStore, Snapshot};
