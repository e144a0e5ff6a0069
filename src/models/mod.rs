//! Data models for lab result requests and responses.
//!
//! This module contains the core data structures shared by the form, the
//! analysis client and the history store.

pub mod catalog;
pub mod request;
pub mod response;

pub use catalog::{find_parameter, unit_for, LabParameter, LAB_PARAMETERS};
pub use request::{Gender, LabResultRequest};
pub use response::{LabResultResponse, RiskLevel};
