//! Adapter layer for the backing stores.
//!
//! Each store has a fixture-backed implementation for local runs and tests,
//! and an AWS-backed implementation:
//! - Notes (S3 objects keyed by `<claimId>.txt`)
//! - Claims (DynamoDB items keyed by `id`)

pub mod claims;
pub mod notes;

pub use claims::{ClaimStore, DynamoClaimStore, FixtureClaimStore};
pub use notes::{FixtureNoteSource, NoteSource, S3NoteSource};
