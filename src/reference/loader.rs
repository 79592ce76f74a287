use crate::model::ReferenceError;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Instant;
use tracing::{error, info, warn};

static IDLE_POWER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s+([\d.]+)$").expect("idle power line regex"));

/// Both benchmark maps, keyed by upper-cased CPU name.
///
/// Built once at startup and only read afterwards, so a single instance can be
/// shared by reference across every concurrent search. Keys iterate in
/// lexicographic order, which fixes the order of substring fallback lookups.
#[derive(Debug, Default, Clone)]
pub struct ReferenceDataStore {
    passmark: BTreeMap<String, u32>,
    idle_power: BTreeMap<String, f64>,
}

impl ReferenceDataStore {
    pub fn new(passmark: BTreeMap<String, u32>, idle_power: BTreeMap<String, f64>) -> Self {
        Self { passmark, idle_power }
    }

    /// Loads both files. A missing file leaves its map empty; only when neither
    /// file could be read is an error returned.
    pub fn load(passmark_path: &Path, idle_power_path: &Path) -> Result<Self, ReferenceError> {
        let passmark = read_reference_file(passmark_path, "PassMark").map(|c| parse_passmark(&c));
        let idle_power =
            read_reference_file(idle_power_path, "idle power").map(|c| parse_idle_power(&c));

        if passmark.is_none() && idle_power.is_none() {
            return Err(ReferenceError::NoReferenceData {
                passmark: passmark_path.display().to_string(),
                idle_power: idle_power_path.display().to_string(),
            });
        }

        Ok(Self::new(passmark.unwrap_or_default(), idle_power.unwrap_or_default()))
    }

    pub fn passmark(&self) -> &BTreeMap<String, u32> {
        &self.passmark
    }

    pub fn idle_power(&self) -> &BTreeMap<String, f64> {
        &self.idle_power
    }
}

fn read_reference_file(path: &Path, label: &str) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => Some(decode_lines(&bytes, label)),
        Err(e) => {
            error!("{} file not available at '{}': {}", label, path.display(), e);
            None
        }
    }
}

/// Decodes line by line. A line that is not valid UTF-8 is blanked out with a
/// warning so the parsers skip it and keep their line numbering.
fn decode_lines(bytes: &[u8], label: &str) -> String {
    bytes
        .split(|b| *b == b'\n')
        .enumerate()
        .map(|(line_no, line)| match std::str::from_utf8(line) {
            Ok(text) => text,
            Err(e) => {
                warn!("{} line {}: not valid UTF-8 ({}), skipped", label, line_no + 1, e);
                ""
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tab-separated `name<TAB>score` rows; commas in the score are ignored.
pub fn parse_passmark(content: &str) -> BTreeMap<String, u32> {
    let start = Instant::now();
    let mut scores = BTreeMap::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split('\t').collect();
        let [name, raw_score] = parts.as_slice() else {
            warn!("PassMark line {}: expected 2 columns, got {}", line_no + 1, parts.len());
            continue;
        };
        match raw_score.replace(',', "").trim().parse::<u32>() {
            Ok(score) => {
                scores.insert(name.trim().to_uppercase(), score);
            }
            Err(_) => warn!(
                "PassMark line {}: could not parse score '{}' for CPU '{}'",
                line_no + 1,
                raw_score,
                name
            ),
        }
    }

    info!(
        "Loaded {} PassMark scores in {:.2}s",
        scores.len(),
        start.elapsed().as_secs_f64()
    );
    scores
}

/// `<name> <watts>` lines; the first line is a header and always skipped.
pub fn parse_idle_power(content: &str) -> BTreeMap<String, f64> {
    let start = Instant::now();
    let mut watts = BTreeMap::new();

    for (line_no, line) in content.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(caps) = IDLE_POWER_LINE.captures(line) else {
            warn!("Idle power line {}: no trailing watts value in '{}'", line_no + 1, line);
            continue;
        };
        let name = caps[1].trim().to_uppercase();
        match caps[2].parse::<f64>() {
            Ok(value) if !name.is_empty() => {
                watts.insert(name, value);
            }
            Ok(_) => warn!("Idle power line {}: missing CPU name", line_no + 1),
            Err(_) => warn!(
                "Idle power line {}: could not parse idle power '{}' for CPU '{}'",
                line_no + 1,
                &caps[2],
                name
            ),
        }
    }

    info!(
        "Loaded {} idle-power entries in {:.2}s",
        watts.len(),
        start.elapsed().as_secs_f64()
    );
    watts
}
