//! Core domain types for the hitfactor engine.
//!
//! Divisions, classification letters and member records describe the
//! published directory. [`ScoreRecord`] is the canonical classifier score and
//! [`HhfTable`] resolves the high hit factor in force when a score was shot.

mod classification;
mod dates;
mod division;
mod hhf;
mod member;
mod recommended;
mod score;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use classification::{ClassLetter, Classifications, UnknownClassLetter};
pub use dates::parse_upstream_date;
pub use division::{Division, UnknownDivision};
pub use hhf::{HhfResolver, HhfRevision, HhfTable, HhfTableError, PolicyResolver, ResolutionPolicy};
pub use member::MemberClassificationRecord;
pub use recommended::{RecommendedHhf, RecommendedHhfTable};
pub use score::{
    LEGACY_SOURCE, MAJOR_MATCH_SOURCE, PERCENT_SENTINEL, ResolvedHhf, ScoreRecord,
    is_valid_percent, percent_of,
};
