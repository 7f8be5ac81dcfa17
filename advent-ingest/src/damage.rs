//! Damage cell parsing.
//!
//! Scores are typed in by hand from in-game result screens, so cells show up
//! as `12345678`, `12,345,678`, `1.5m` or `820k`. Blank means no score.

use anyhow::{bail, Result};
use regex::Regex;

#[derive(Debug, Clone)]
pub struct DamageParser {
    re: Regex,
}

impl DamageParser {
    pub fn new() -> Result<Self> {
        let re = Regex::new(r"(?i)^(?P<num>\d[\d,]*(?:\.\d+)?)\s*(?P<unit>[kmb])?$")?;
        Ok(Self { re })
    }

    pub fn parse(&self, cell: &str) -> Result<i64> {
        parse_with(&self.re, cell)
    }
}

fn parse_with(re: &Regex, cell: &str) -> Result<i64> {
    let cell = cell.trim();
    if cell.is_empty() || cell == "-" {
        return Ok(0);
    }
    if cell.starts_with('-') {
        bail!("negative damage '{cell}'");
    }

    let Some(caps) = re.captures(cell) else {
        bail!("unrecognized damage value '{cell}'");
    };

    let num = caps["num"].replace(',', "");
    let scale: i64 = match caps.name("unit").map(|u| u.as_str().to_ascii_lowercase()) {
        Some(u) if u == "k" => 1_000,
        Some(u) if u == "m" => 1_000_000,
        Some(u) if u == "b" => 1_000_000_000,
        _ => 1,
    };

    if let Some((whole, frac)) = num.split_once('.') {
        // Keep it in integers: 1.25m -> 1 * 1e6 + 25 * 1e6 / 100.
        let whole: i64 = whole.parse()?;
        let denom = 10i64
            .checked_pow(frac.len() as u32)
            .ok_or_else(|| anyhow::anyhow!("too many decimals in '{cell}'"))?;
        let frac: i64 = frac.parse()?;
        if scale == 1 && frac != 0 {
            bail!("fractional damage '{cell}' without a k/m/b unit");
        }
        return whole
            .checked_mul(scale)
            .zip(frac.checked_mul(scale))
            .and_then(|(w, f)| w.checked_add(f / denom))
            .ok_or_else(|| anyhow::anyhow!("damage '{cell}' is out of range"));
    }

    let value: i64 = num
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid damage '{cell}': {e}"))?;
    value
        .checked_mul(scale)
        .ok_or_else(|| anyhow::anyhow!("damage '{cell}' is out of range"))
}
