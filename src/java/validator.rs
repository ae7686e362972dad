//! Java / Minecraft compatibility
//!
//! Minecraft's minimum Java requirement moved over the years:
//! 1.12-1.16 run on 8, 1.17 needs 16, 1.18-1.20 need 17, and 1.21+
//! needs 21. Unknown versions default to 17.

use crate::error::{McinitError, McinitResult};
use crate::java::Installation;

/// Minimum Java major version for a Minecraft version
pub fn required_java_major(mc_version: &str) -> u64 {
    let Some((major, minor)) = parse_mc_version(mc_version) else {
        return 17;
    };

    if major != 1 {
        return 17;
    }
    match minor {
        12..=16 => 8,
        17 => 16,
        18..=20 => 17,
        m if m >= 21 => 21,
        _ => 17,
    }
}

/// Recommended Java major version (same or the next LTS)
pub fn recommended_java_major(mc_version: &str) -> u64 {
    match required_java_major(mc_version) {
        8 => 11,
        16 => 17,
        other => other,
    }
}

/// Check an installation against a Minecraft version's requirement
pub fn validate_for_minecraft(inst: &Installation, mc_version: &str) -> McinitResult<()> {
    let required = required_java_major(mc_version);
    if inst.major() < required {
        return Err(McinitError::JavaTooOld {
            required,
            found: inst.major(),
        });
    }
    Ok(())
}

pub fn is_compatible(java_major: u64, mc_version: &str) -> bool {
    java_major >= required_java_major(mc_version)
}

fn parse_mc_version(mc_version: &str) -> Option<(u64, u64)> {
    let mut parts = mc_version.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    Some((major, minor))
}
