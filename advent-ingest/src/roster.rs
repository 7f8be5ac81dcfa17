//! Roster CSV import.
//!
//! Expected header (boss columns optional, any order, case-insensitive):
//! member_id,name,teo,yeonhee,kyle,karma
//!
//! A member listed twice is a resubmission: the later row replaces the
//! earlier one but keeps the earlier row's roster position.

use advent_core::{validate_guild, Boss, MemberDamage, ScoreSource};
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::damage::DamageParser;

struct Columns {
    id: usize,
    name: usize,
    bosses: Vec<(Boss, usize)>,
}

fn locate_columns(headers: &csv::StringRecord) -> Result<Columns> {
    let mut id = None;
    let mut name = None;
    let mut bosses = Vec::new();

    for (i, h) in headers.iter().enumerate() {
        let h = h.trim().to_lowercase();
        match h.as_str() {
            "member_id" | "memberid" | "id" => id = Some(i),
            "name" | "ingame_name" | "ign" => name = Some(i),
            other => {
                if let Ok(boss) = other.parse::<Boss>() {
                    bosses.push((boss, i));
                }
            }
        }
    }

    let id = id.context("roster header has no member_id column")?;
    let name = name.context("roster header has no name column")?;
    Ok(Columns { id, name, bosses })
}

/// Parse roster rows from any reader (file, stdin, test string).
pub fn parse_roster_reader<R: Read>(reader: R) -> Result<Vec<MemberDamage>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let cols = locate_columns(rdr.headers().context("reading roster header")?)?;
    let damage = DamageParser::new()?;

    let mut members: Vec<MemberDamage> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("reading roster row {}", row + 2))?;
        let id = record.get(cols.id).unwrap_or("").trim();
        if id.is_empty() {
            continue;
        }
        let name = record.get(cols.name).unwrap_or("").trim();

        let mut member = MemberDamage::new(id, if name.is_empty() { id } else { name });
        for (boss, col) in &cols.bosses {
            let cell = record.get(*col).unwrap_or("");
            let value = damage
                .parse(cell)
                .with_context(|| format!("row {} ({id}), column {boss}", row + 2))?;
            member = member.with_damage(*boss, value);
        }

        match index.get(id) {
            Some(&pos) => {
                tracing::debug!(member_id = %id, "resubmitted score row replaces earlier one");
                members[pos] = member;
            }
            None => {
                index.insert(id.to_string(), members.len());
                members.push(member);
            }
        }
    }

    Ok(members)
}

pub fn parse_roster_csv(path: impl AsRef<Path>) -> Result<Vec<MemberDamage>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let members = parse_roster_reader(file).with_context(|| format!("parsing {}", path.display()))?;
    if members.is_empty() {
        bail!("{} contains no members", path.display());
    }
    tracing::info!(path = %path.display(), members = members.len(), "roster loaded");
    Ok(members)
}

/// Score source backed by one roster CSV per guild: `<dir>/<guild>.csv`.
#[derive(Debug, Clone)]
pub struct RosterDir {
    dir: PathBuf,
}

impl RosterDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, guild: &str) -> Result<PathBuf> {
        validate_guild(guild)?;
        Ok(self.dir.join(format!("{guild}.csv")))
    }
}

impl ScoreSource for RosterDir {
    fn member_damage(&self, guild: &str) -> Result<Vec<MemberDamage>> {
        parse_roster_csv(self.path_for(guild)?)
    }
}

/// Score source backed by a single roster file, whatever the guild.
#[derive(Debug, Clone)]
pub struct RosterFile {
    path: PathBuf,
}

impl RosterFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScoreSource for RosterFile {
    fn member_damage(&self, _guild: &str) -> Result<Vec<MemberDamage>> {
        parse_roster_csv(&self.path)
    }
}
