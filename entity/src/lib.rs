//! Shared record types for the Staffdesk admin portal.

pub mod advocate;
pub mod employee;
pub mod lead;
pub mod payout;

pub use advocate::Advocate;
pub use employee::{EmployeeCollection, EmployeeRecord, NO, YES};
pub use lead::{Lead, LeadStatus};
pub use payout::{Payout, PayoutKind, PayoutStatus};
