//! Facade crate for the hitfactor classifier engine.
//!
//! This crate re-exports the core domain types and exposes the ingestion
//! pipeline and analytics aggregation behind feature flags.

#![forbid(unsafe_code)]

pub use hitfactor_core::{
    ClassLetter, Classifications, Division, HhfResolver, HhfRevision, HhfTable,
    MemberClassificationRecord, RecommendedHhf, RecommendedHhfTable, ResolutionPolicy,
    ResolvedHhf, ScoreRecord,
};

#[cfg(feature = "data")]
pub use hitfactor_data::{
    directory::{Directory, DirectoryBuilder, PriorityTiers},
    fetch::{FetchOptions, FetchPipeline, RetryPolicy},
    hydrate::{Blacklist, Normalizer},
    store::{ScoreStore, SqliteScoreStore},
};

#[cfg(feature = "analytics")]
pub use hitfactor_analytics::{ClassifierAnalytics, aggregate};
