//! JVM flag presets
//!
//! Builds the argument vector prepended to `-jar` based on a preset
//! (Aikar's G1 tuning, a minimal set, or user-supplied custom flags)
//! plus heap sizing.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{McinitError, McinitResult};

/// JVM flags preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagsPreset {
    /// Aikar's GC tuning flags (https://docs.papermc.io/paper/aikars-flags)
    Aikar,
    /// Minimal G1 flags
    Minimal,
    /// User-supplied custom flags
    Custom,
}

impl FlagsPreset {
    /// All preset names
    pub fn all() -> &'static [&'static str] {
        &["aikar", "minimal", "custom"]
    }
}

impl std::fmt::Display for FlagsPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Aikar => "aikar",
            Self::Minimal => "minimal",
            Self::Custom => "custom",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for FlagsPreset {
    type Err = McinitError;

    fn from_str(s: &str) -> McinitResult<Self> {
        match s {
            "aikar" => Ok(Self::Aikar),
            "minimal" => Ok(Self::Minimal),
            "custom" => Ok(Self::Custom),
            other => Err(McinitError::UnknownPreset(other.to_string())),
        }
    }
}

/// Build the JVM argument vector for a preset
pub fn build_flags(
    preset: FlagsPreset,
    xms: &str,
    xmx: &str,
    custom: &[String],
) -> McinitResult<Vec<String>> {
    match preset {
        FlagsPreset::Aikar => Ok(aikar_flags(xms, xmx)),
        FlagsPreset::Minimal => Ok(minimal_flags(xms, xmx)),
        FlagsPreset::Custom => {
            validate_flags(custom)?;
            let mut flags = heap_flags(xms, xmx);
            flags.extend(custom.iter().cloned());
            Ok(flags)
        }
    }
}

fn heap_flags(xms: &str, xmx: &str) -> Vec<String> {
    vec![format!("-Xms{}", xms), format!("-Xmx{}", xmx)]
}

/// Aikar's flags for optimal GC performance
fn aikar_flags(xms: &str, xmx: &str) -> Vec<String> {
    let mut flags = heap_flags(xms, xmx);
    flags.extend(
        [
            "-XX:+UseG1GC",
            "-XX:+ParallelRefProcEnabled",
            "-XX:MaxGCPauseMillis=200",
            "-XX:+UnlockExperimentalVMOptions",
            "-XX:+DisableExplicitGC",
            "-XX:+AlwaysPreTouch",
            "-XX:G1NewSizePercent=30",
            "-XX:G1MaxNewSizePercent=40",
            "-XX:G1HeapRegionSize=8M",
            "-XX:G1ReservePercent=20",
            "-XX:G1HeapWastePercent=5",
            "-XX:G1MixedGCCountTarget=4",
            "-XX:InitiatingHeapOccupancyPercent=15",
            "-XX:G1MixedGCLiveThresholdPercent=90",
            "-XX:G1RSetUpdatingPauseTimePercent=5",
            "-XX:SurvivorRatio=32",
            "-XX:+PerfDisableSharedMem",
            "-XX:MaxTenuringThreshold=1",
            "-Dusing.aikars.flags=https://mcflags.emc.gs",
            "-Daikars.new.flags=true",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    flags
}

fn minimal_flags(xms: &str, xmx: &str) -> Vec<String> {
    let mut flags = heap_flags(xms, xmx);
    flags.extend(
        ["-XX:+UseG1GC", "-XX:+ParallelRefProcEnabled", "-XX:MaxGCPauseMillis=200"]
            .iter()
            .map(|s| s.to_string()),
    );
    flags
}

/// Validate that every flag looks like a JVM option
pub fn validate_flags(flags: &[String]) -> McinitResult<()> {
    for flag in flags {
        if flag.is_empty() {
            continue;
        }
        if !flag.starts_with('-') {
            return Err(McinitError::InvalidFlag(flag.clone()));
        }
    }
    Ok(())
}

/// Parse a space-separated string of extra flags, honoring double quotes
pub fn parse_extra_flags(input: &str) -> Vec<String> {
    let mut flags = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;

    for ch in input.chars() {
        match ch {
            '"' => in_quote = !in_quote,
            ' ' if !in_quote => {
                if !current.is_empty() {
                    flags.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        flags.push(current);
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aikar_includes_heap_and_g1() {
        let flags = build_flags(FlagsPreset::Aikar, "2G", "4G", &[]).unwrap();
        assert_eq!(flags[0], "-Xms2G");
        assert_eq!(flags[1], "-Xmx4G");
        assert!(flags.contains(&"-XX:+UseG1GC".to_string()));
        assert!(flags.contains(&"-Daikars.new.flags=true".to_string()));
    }

    #[test]
    fn minimal_is_small() {
        let flags = build_flags(FlagsPreset::Minimal, "1G", "1G", &[]).unwrap();
        assert_eq!(flags.len(), 5);
    }

    #[test]
    fn custom_appends_user_flags() {
        let custom = vec!["-XX:+UseZGC".to_string()];
        let flags = build_flags(FlagsPreset::Custom, "2G", "4G", &custom).unwrap();
        assert_eq!(flags, vec!["-Xms2G", "-Xmx4G", "-XX:+UseZGC"]);
    }

    #[test]
    fn custom_rejects_bad_flag() {
        let custom = vec!["UseZGC".to_string()];
        assert!(matches!(
            build_flags(FlagsPreset::Custom, "2G", "4G", &custom),
            Err(McinitError::InvalidFlag(_))
        ));
    }

    #[test]
    fn preset_from_str() {
        assert_eq!("aikar".parse::<FlagsPreset>().unwrap(), FlagsPreset::Aikar);
        assert!("zgc".parse::<FlagsPreset>().is_err());
    }

    #[test]
    fn parse_extra_simple() {
        assert_eq!(
            parse_extra_flags("-Xint -XX:+UseZGC"),
            vec!["-Xint", "-XX:+UseZGC"]
        );
    }

    #[test]
    fn parse_extra_quoted() {
        assert_eq!(
            parse_extra_flags("-Dname=\"my server\" -Xint"),
            vec!["-Dname=my server", "-Xint"]
        );
    }

    #[test]
    fn parse_extra_empty() {
        assert!(parse_extra_flags("").is_empty());
    }
}
