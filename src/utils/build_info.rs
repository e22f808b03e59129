use fintrack_domain::SNAPSHOT_SCHEMA_VERSION;

const UNKNOWN: &str = "unknown";

/// What `version` reports about this binary, mostly stamped in by `build.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub snapshot_schema: u32,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

impl BuildMetadata {
    /// One-line form, e.g. `fintrack 0.1.0 (3f2a9c1, dirty)`.
    pub fn headline(&self) -> String {
        if self.git_hash == UNKNOWN {
            format!("fintrack {}", self.version)
        } else {
            format!("fintrack {} ({}, {})", self.version, self.git_hash, self.git_status)
        }
    }

    /// Labelled detail rows, in display order.
    pub fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Snapshot schema", format!("v{}", self.snapshot_schema)),
            ("Built at", self.timestamp.to_string()),
            ("Target", self.target.to_string()),
            ("Profile", self.profile.to_string()),
            ("Rustc", self.rustc.to_string()),
        ]
    }
}

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        snapshot_schema: SNAPSHOT_SCHEMA_VERSION,
        git_hash: option_env!("FINTRACK_BUILD_HASH").unwrap_or(UNKNOWN),
        git_status: option_env!("FINTRACK_BUILD_STATUS").unwrap_or(UNKNOWN),
        timestamp: option_env!("FINTRACK_BUILD_TIMESTAMP").unwrap_or(UNKNOWN),
        target: option_env!("FINTRACK_BUILD_TARGET").unwrap_or(UNKNOWN),
        profile: option_env!("FINTRACK_BUILD_PROFILE").unwrap_or(UNKNOWN),
        rustc: option_env!("FINTRACK_BUILD_RUSTC").unwrap_or(UNKNOWN),
    }
}
