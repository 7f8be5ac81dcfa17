//! advent-ingest: roster and availability import from hand-maintained CSV sheets.

pub mod availability;
pub mod damage;
pub mod roster;

pub use availability::{parse_availability_csv, parse_availability_reader};
pub use damage::DamageParser;
pub use roster::{parse_roster_csv, parse_roster_reader, RosterDir, RosterFile};
