//! Availability CSV import: `member_id,available_from` (ISO dates).

use advent_core::time::parse_iso_date;
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct AvailabilityRow {
    member_id: String,
    available_from: String,
}

pub fn parse_availability_reader<R: Read>(reader: R) -> Result<BTreeMap<String, NaiveDate>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = BTreeMap::new();
    for (row, result) in rdr.deserialize::<AvailabilityRow>().enumerate() {
        let rec = result.with_context(|| format!("reading availability row {}", row + 2))?;
        if rec.member_id.is_empty() {
            continue;
        }
        let date = parse_iso_date(&rec.available_from)
            .with_context(|| format!("row {} ({})", row + 2, rec.member_id))?;
        if out.insert(rec.member_id.clone(), date).is_some() {
            bail!("availability for '{}' listed twice", rec.member_id);
        }
    }
    Ok(out)
}

pub fn parse_availability_csv(path: impl AsRef<Path>) -> Result<BTreeMap<String, NaiveDate>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_availability_reader(file).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_availability() {
        let csv = "member_id,available_from\nm1,2026-10-21\n m2 , 2026-10-18 \n";
        let map = parse_availability_reader(csv.as_bytes()).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["m1"], NaiveDate::from_ymd_opt(2026, 10, 21).unwrap());
        assert_eq!(map["m2"], NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
    }

    #[test]
    fn test_rejects_bad_date_and_duplicates() {
        assert!(parse_availability_reader("member_id,available_from\nm1,10/21\n".as_bytes()).is_err());
        let dup = "member_id,available_from\nm1,2026-10-21\nm1,2026-10-22\n";
        assert!(parse_availability_reader(dup.as_bytes()).is_err());
    }
}
