//! Parsing of the comma-delimited classification snapshot.

use hitfactor_core::{ClassLetter, Classifications, Division, MemberClassificationRecord};

use super::SnapshotFormatError;

const HEADER_PREFIX: &str = "$FIELDS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    MemberNumber,
    MemberId,
    Expires,
    Division(Division),
    Ignored,
}

impl Column {
    fn from_header(name: &str) -> Self {
        match name.trim() {
            "USPSA" => Self::MemberNumber,
            "PersonNumber" => Self::MemberId,
            "Expires" => Self::Expires,
            other => Division::from_snapshot_column(other).map_or(Self::Ignored, Self::Division),
        }
    }
}

/// Parse every member line of `text` into a record.
///
/// Lines starting with `$` other than the header are metadata. Short lines
/// yield records with the trailing fields missing.
pub(super) fn parse_members(
    text: &str,
) -> Result<Vec<MemberClassificationRecord>, SnapshotFormatError> {
    if text.trim().is_empty() {
        return Err(SnapshotFormatError::Empty);
    }
    let columns = text
        .lines()
        .find_map(|line| line.trim_start().strip_prefix(HEADER_PREFIX))
        .map(|fields| {
            fields
                .trim()
                .split(',')
                .map(Column::from_header)
                .collect::<Vec<_>>()
        })
        .filter(|columns| columns.iter().any(|column| *column == Column::MemberNumber))
        .ok_or(SnapshotFormatError::MissingHeader)?;

    Ok(text
        .lines()
        .filter(|line| !line.starts_with('$') && !line.trim().is_empty())
        .map(|line| parse_line(&columns, line))
        .collect())
}

fn parse_line(columns: &[Column], line: &str) -> MemberClassificationRecord {
    let mut member_number = String::new();
    let mut member_id = None;
    let mut expires = None;
    let mut classifications = Classifications::default();

    for (column, raw) in columns.iter().zip(line.split(',')) {
        let value = raw.trim();
        match column {
            Column::MemberNumber => value.clone_into(&mut member_number),
            Column::MemberId => member_id = non_empty(value),
            Column::Expires => expires = non_empty(value),
            Column::Division(division) => {
                if let Ok(letter) = value.parse::<ClassLetter>() {
                    classifications.insert(*division, letter);
                }
            }
            Column::Ignored => {}
        }
    }

    MemberClassificationRecord::new(member_number, member_id, expires, classifications)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}
