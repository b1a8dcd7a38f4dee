//! Data access and ingestion logic for the hitfactor engine.
//!
//! Responsibilities:
//! - Parse the periodic classification snapshot into a member directory.
//! - Fetch per-member documents from the upstream API in restartable slices.
//! - Normalise fetched payloads into canonical score records.
//! - Persist score records behind the [`store::ScoreStore`] boundary.
//!
//! Boundaries:
//! - Domain rules (percent maths, HHF resolution) live in `hitfactor-core`.
//! - Network I/O is async; everything after the fetch is a sequential pass.
//!
//! Invariants:
//! - No global mutable state. Credentials, retry settings and blacklists are
//!   values owned by the caller.

pub mod directory;
pub mod fetch;
pub mod hydrate;
pub mod store;
pub mod upstream;
