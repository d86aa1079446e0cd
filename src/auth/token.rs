//! Token classes, issuance, and verification.

pub mod kind;
pub mod service;
pub mod verdict;
