//! Writes analytics rows into the artefact directory.

use hitfactor_fs::ArtifactDir;

use crate::{AnalyticsError, ClassifierAnalytics};

/// File name of the published analytics artefact.
pub const ANALYTICS_FILE: &str = "analytics.json";

/// Serialise `rows` to `analytics.json` inside `dir`.
///
/// The file is replaced atomically so readers never observe a partial write.
pub fn write_analytics(
    rows: &[ClassifierAnalytics],
    dir: &ArtifactDir,
) -> Result<(), AnalyticsError> {
    let bytes =
        serde_json::to_vec(rows).map_err(|source| AnalyticsError::Serialise { source })?;
    dir.write_atomic(ANALYTICS_FILE, bytes)
        .map_err(|source| AnalyticsError::Write {
            path: dir.path().join(ANALYTICS_FILE),
            source,
        })?;
    log::info!("wrote {} analytics rows to {}", rows.len(), dir.path());
    Ok(())
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use hitfactor_core::{Division, HhfTable, RecommendedHhfTable};
    use hitfactor_core::{ResolvedHhf, test_support::club_score};
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    fn writes_rows_as_a_json_array() {
        let temp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(temp.path().join("analytics")).expect("utf8 path");
        let dir = ArtifactDir::create(&root).expect("create artefact dir");
        let records = [club_score(
            Division::CarryOptics,
            "22-01",
            Some(8.0),
            ResolvedHhf::Known(10.0),
        )];
        let rows = crate::aggregate(&records, &HhfTable::default(), &RecommendedHhfTable::default());

        write_analytics(&rows, &dir).expect("write analytics");

        let bytes = dir.read(ANALYTICS_FILE).expect("read analytics");
        let decoded: Vec<ClassifierAnalytics> =
            serde_json::from_slice(&bytes).expect("decode analytics");
        assert_eq!(decoded, rows);
        assert_eq!(decoded.len(), 1);
        assert_eq!(dir.file_names().expect("list"), vec![ANALYTICS_FILE.to_owned()]);
    }
}
