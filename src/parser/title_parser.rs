// Free-text title -> ParsedSpecification
use crate::model::{ParsedSpecification, NOT_DETECTED, NO_CPU};
use regex::Regex;
use std::sync::LazyLock;

/// Words that mark an adjacent capacity as storage rather than memory.
pub const STORAGE_KEYWORDS: [&str; 7] = ["SSD", "HDD", "NVME", "SSHD", "STORAGE", "DRIVE", "EMMC"];

/// Brand-only CPU keywords, checked in this order when no model token was found.
const GENERIC_CPU_KEYWORDS: [(&str, &str); 6] = [
    ("celeron", "CELERON"),
    ("pentium", "PENTIUM"),
    ("atom", "ATOM"),
    ("xeon", "XEON"),
    ("ryzen", "RYZEN"),
    ("athlon", "ATHLON"),
];

static INTEL_CORE_MODEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"i([3579])[\s-]?(\d{4,5}[a-z\d]*)").expect("core model regex"));
static INTEL_CORE_FAMILY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"i([3579])").expect("core family regex"));
static N_SERIES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"n(\d{3,4})").expect("n-series regex"));

static STORAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d+\.?\d*\s*(?:tb|gb))\s*(?:ssd|hdd|nvme|sshd|storage|drive|emmc)|(?:ssd|hdd|nvme|sshd|storage|drive|emmc)\s*(\d+\.?\d*\s*(?:tb|gb))",
    )
    .expect("storage regex")
});

/// RAM rules, tried in order.
static RAM_RULES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)(\d+\s*gb)\s*ram").expect("ram suffix regex"),
        Regex::new(r"(?i)ram\s*(\d+\s*gb)").expect("ram prefix regex"),
        Regex::new(r"(?i)(\d+gb)\s*ddr[345]").expect("ddr regex"),
    ]
});

static TOKEN_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,;/]+").expect("separator regex"));
static STANDALONE_GB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)GB$").expect("standalone gb regex"));

#[derive(Debug, Default)]
pub struct TitleParser;

impl TitleParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, title: &str) -> ParsedSpecification {
        parse_title(title)
    }
}

/// Extracts CPU model, RAM and storage from a listing title.
///
/// Never fails: anything not found degrades to the `"N/A"` sentinel.
pub fn parse_title(title: &str) -> ParsedSpecification {
    let lower = title.to_lowercase();
    let cpu = detect_cpu(&lower);

    ParsedSpecification {
        cpu_model: cpu.model,
        generic_intel_core_type: cpu.generic_type,
        is_generic_intel_core_type: cpu.is_generic,
        ram: detect_ram(title),
        storage: detect_storage(title),
    }
}

struct CpuDetection {
    model: String,
    generic_type: Option<String>,
    is_generic: bool,
}

fn detect_cpu(lower: &str) -> CpuDetection {
    if let Some(caps) = INTEL_CORE_MODEL.captures(lower) {
        let family = format!("I{}", &caps[1]);
        return CpuDetection {
            model: format!("{}-{}", family, caps[2].to_uppercase()),
            generic_type: Some(family),
            is_generic: false,
        };
    }

    if let Some(caps) = INTEL_CORE_FAMILY.captures(lower) {
        let family = format!("I{}", &caps[1]);
        return CpuDetection {
            model: family.clone(),
            generic_type: Some(family),
            is_generic: true,
        };
    }

    if let Some(digits) = find_n_series(lower) {
        return CpuDetection {
            model: format!("N{}", digits),
            generic_type: None,
            is_generic: false,
        };
    }

    if let Some((_, keyword)) = GENERIC_CPU_KEYWORDS.iter().find(|(kw, _)| lower.contains(kw)) {
        return CpuDetection {
            model: keyword.to_string(),
            generic_type: None,
            is_generic: false,
        };
    }

    if lower.contains("no cpu") {
        return CpuDetection {
            model: NO_CPU.to_string(),
            generic_type: Some(NO_CPU.to_string()),
            is_generic: false,
        };
    }

    CpuDetection {
        model: NOT_DETECTED.to_string(),
        generic_type: None,
        is_generic: false,
    }
}

/// First `n<digits>` token that has no alphanumeric neighbour on either side.
fn find_n_series(lower: &str) -> Option<&str> {
    N_SERIES.captures_iter(lower).find_map(|caps| {
        let whole = caps.get(0)?;
        let before = lower[..whole.start()].chars().next_back();
        let after = lower[whole.end()..].chars().next();
        if before.is_some_and(|c| c.is_alphanumeric()) || after.is_some_and(|c| c.is_alphanumeric()) {
            return None;
        }
        caps.get(1).map(|m| m.as_str())
    })
}

fn normalize_capacity(token: &str) -> String {
    token.split_whitespace().collect::<String>().to_uppercase()
}

fn detect_storage(title: &str) -> String {
    STORAGE
        .captures(title)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| normalize_capacity(m.as_str()))
        .unwrap_or_else(|| NOT_DETECTED.to_string())
}

fn detect_ram(title: &str) -> String {
    for rule in RAM_RULES.iter() {
        if let Some(m) = rule.captures(title).and_then(|caps| caps.get(1)) {
            return normalize_capacity(m.as_str());
        }
    }

    // No labelled capacity: take the first bare <N>GB token that is not
    // sitting right next to a storage keyword.
    let upper = title.to_uppercase();
    let tokens: Vec<&str> = TOKEN_SEPARATORS.split(&upper).collect();
    for (idx, token) in tokens.iter().enumerate() {
        let Some(caps) = STANDALONE_GB.captures(token) else {
            continue;
        };
        let prev = idx.checked_sub(1).and_then(|i| tokens.get(i)).copied().unwrap_or("");
        let next = tokens.get(idx + 1).copied().unwrap_or("");
        if STORAGE_KEYWORDS.contains(&prev) || STORAGE_KEYWORDS.contains(&next) {
            continue;
        }
        return format!("{}GB", &caps[1]);
    }

    NOT_DETECTED.to_string()
}

/// Display category used by the ranking views.
pub fn cpu_type(spec: &ParsedSpecification) -> String {
    if spec.cpu_model == NO_CPU {
        return NO_CPU.to_string();
    }
    if let Some(family) = &spec.generic_intel_core_type {
        return family.clone();
    }
    if is_n_series_model(&spec.cpu_model) {
        return "N-SERIES".to_string();
    }
    match spec.cpu_model.as_str() {
        "RYZEN" | "ATHLON" => "AMD".to_string(),
        _ => "OTHER".to_string(),
    }
}

fn is_n_series_model(model: &str) -> bool {
    model
        .strip_prefix('N')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}
