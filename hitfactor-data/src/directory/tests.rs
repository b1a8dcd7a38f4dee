use super::*;
use camino::Utf8PathBuf;
use hitfactor_fs::ArtifactDir;
use rstest::{fixture, rstest};
use tempfile::TempDir;

const SNAPSHOT: &str = "\
$SNAPSHOT 2024-04-02
$FIELDS USPSA,PersonNumber,Expires,OPEN,LIMITED,PRODUCTION,CARRYOPTICS,PCC
TY100,900,2026-01-01,GM,,B,,
TY101,901,2026-01-01,,M,A,M,
TY102,902,12/31/2023,A,,,,
TY103,903,LIFE,,,C,,D
TY104,904,2026-01-01,U,,,X,
TY105,905,2026-01-01,,,,,D
TY106
";

#[fixture]
fn cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 31).expect("valid cutoff")
}

#[fixture]
fn directory(cutoff: NaiveDate) -> Directory {
    DirectoryBuilder::new()
        .with_active_after(cutoff)
        .build(SNAPSHOT)
        .expect("snapshot parses")
}

#[rstest]
fn retains_every_member_line(directory: Directory) {
    let numbers: Vec<&str> = directory
        .members()
        .iter()
        .map(|member| member.member_number.as_str())
        .collect();
    assert_eq!(
        numbers,
        ["TY100", "TY101", "TY102", "TY103", "TY104", "TY105", "TY106"]
    );
}

#[rstest]
fn short_lines_keep_missing_fields_empty(directory: Directory) {
    let short = directory.members().last().expect("short line parsed");
    assert_eq!(short.member_id, None);
    assert_eq!(short.expires, None);
    assert!(!short.is_classified());
}

#[rstest]
#[case(ClassLetter::GrandMaster, vec!["TY100"])]
#[case(ClassLetter::Master, vec!["TY101"])]
#[case(ClassLetter::A, vec![])]
#[case(ClassLetter::B, vec![])]
#[case(ClassLetter::C, vec!["TY103"])]
#[case(ClassLetter::D, vec!["TY105"])]
fn tiers_follow_precedence(
    directory: Directory,
    #[case] letter: ClassLetter,
    #[case] expected: Vec<&str>,
) {
    assert_eq!(directory.tier(letter), expected);
}

#[rstest]
fn expired_members_stay_in_classified_numbers(directory: Directory) {
    assert_eq!(
        directory.classified_numbers(),
        ["TY100", "TY101", "TY102", "TY103", "TY105"]
    );
}

#[rstest]
fn without_cutoff_everyone_is_scheduled() {
    let directory = DirectoryBuilder::new().build(SNAPSHOT).expect("parses");
    assert_eq!(directory.tier(ClassLetter::A), ["TY102"]);
    assert_eq!(directory.tiers().len(), 5);
}

#[rstest]
fn division_views_only_cover_active_members(directory: Directory) {
    assert_eq!(directory.division_members(Division::Open), ["TY100"]);
    assert_eq!(
        directory.division_members(Division::Production),
        ["TY100", "TY101", "TY103"]
    );
    let stats = directory.division_stats();
    assert_eq!(stats.get(&Division::CarryOptics), Some(&1));
    assert_eq!(stats.get(&Division::Pcc), Some(&2));
    assert_eq!(stats.get(&Division::Revolver), Some(&0));
}

#[rstest]
fn indexes_member_ids(directory: Directory) {
    let index = directory.member_id_index();
    assert_eq!(index.get("903"), Some(&"TY103"));
    assert_eq!(index.len(), 6);
}

#[rstest]
fn repeated_members_are_claimed_once() {
    let text = "$FIELDS USPSA,OPEN,LIMITED\nTY1,B,\nTY1,,M\nTY2,B,\n";
    let directory = DirectoryBuilder::new().build(text).expect("parses");
    assert_eq!(directory.tier(ClassLetter::Master), ["TY1"]);
    assert_eq!(directory.tier(ClassLetter::B), ["TY2"]);
}

#[rstest]
#[case("", SnapshotFormatError::Empty)]
#[case("   \n\n", SnapshotFormatError::Empty)]
#[case("TY1,GM\nTY2,M\n", SnapshotFormatError::MissingHeader)]
#[case("$FIELDS OPEN,LIMITED\nGM,M\n", SnapshotFormatError::MissingHeader)]
fn rejects_unusable_snapshots(#[case] text: &str, #[case] expected: SnapshotFormatError) {
    let err = DirectoryBuilder::new().build(text).expect_err("format error");
    assert_eq!(err, expected);
}

#[rstest]
fn writes_meta_artefacts(directory: Directory) {
    let temp = TempDir::new().expect("tempdir");
    let path = Utf8PathBuf::from_path_buf(temp.path().join("meta")).expect("utf8 path");
    let dir = ArtifactDir::create(&path).expect("meta dir");

    let written = write_meta(&directory, &dir).expect("meta written");
    assert_eq!(written.len(), 3 + Division::ALL.len() + ClassLetter::ALL.len());

    let gm: Vec<String> =
        serde_json::from_slice(&dir.read("classified.gm.json").expect("read gm")).expect("json");
    assert_eq!(gm, ["TY100"]);
    let prod: Vec<String> =
        serde_json::from_slice(&dir.read("classified.prod.json").expect("read prod"))
            .expect("json");
    assert_eq!(prod, ["TY100", "TY101", "TY103"]);
    let all: Vec<MemberClassificationRecord> =
        serde_json::from_slice(&dir.read("all.json").expect("read all")).expect("json");
    assert_eq!(all, directory.members());
}

#[rstest]
fn tiers_read_back_from_meta(directory: Directory) {
    let temp = TempDir::new().expect("tempdir");
    let path = Utf8PathBuf::from_path_buf(temp.path().join("meta")).expect("utf8 path");
    let dir = ArtifactDir::create(&path).expect("meta dir");
    write_meta(&directory, &dir).expect("meta written");

    let tiers = read_tiers(&dir).expect("tiers read");
    assert_eq!(&tiers, directory.tiers());
}

#[rstest]
fn missing_tier_file_is_reported() {
    let temp = TempDir::new().expect("tempdir");
    let path = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8 path");
    let dir = ArtifactDir::create(&path).expect("meta dir");

    match read_tiers(&dir) {
        Err(TierReadError::Read { name, .. }) => assert_eq!(name, "classified.gm.json"),
        other => panic!("expected a read error, got {other:?}"),
    }
}
