//! # coffer-core
//!
//! Wallet records, token binding, and the transfer orchestration that ties
//! vault decryption to chain calls: load validated wallet records, decrypt
//! each key for the duration of its wallet's processing, report balances,
//! and on explicit confirmation build, sign, and broadcast ERC-20
//! transfers. Every failure is isolated to the wallet or token it happened
//! in.

pub mod error;
pub mod orchestrator;
pub mod prompt;
pub mod records;
pub mod report;
pub mod token;

pub use error::CoreError;
