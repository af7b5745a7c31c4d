//! # hostel-shared
//!
//! Types shared by the Hostel Complaint System client and backend: wallet
//! addresses, the complaint record decoded from the contract, the contract
//! interface descriptor, and the auxiliary record DTOs exchanged over HTTP.

pub mod abi;
pub mod complaint;
pub mod constants;
pub mod error;
pub mod records;
pub mod types;

pub use abi::{ContractCapabilities, InterfaceDescriptor};
pub use complaint::{Category, Complaint, ComplaintSet, ComplaintStatus};
pub use error::{AbiError, DecodeError, SharedError};
pub use types::{Address, ComplaintId};
