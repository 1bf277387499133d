//! Service layer: the replica-bound read path and the primary-bound write
//! path.
//!
//! [`ComputerReadService`] never opens a transaction and only borrows from
//! the replica; [`ComputerWriteService`] wraps every call in a primary
//! transaction.

pub mod read_service;
pub mod write_service;

pub use read_service::ComputerReadService;
pub use write_service::ComputerWriteService;
