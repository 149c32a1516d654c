//! Size ladder
//!
//! Ordered size tiers with their relative compute capacity. Each step up the
//! ladder doubles capacity except `12xlarge`, which sits between `8xlarge`
//! and `16xlarge`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Instance size tier, ordered smallest to largest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SizeTier {
    #[serde(rename = "nano")]
    Nano,
    #[serde(rename = "micro")]
    Micro,
    #[serde(rename = "small")]
    Small,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "large")]
    Large,
    #[serde(rename = "xlarge")]
    XLarge,
    #[serde(rename = "2xlarge")]
    X2Large,
    #[serde(rename = "4xlarge")]
    X4Large,
    #[serde(rename = "8xlarge")]
    X8Large,
    #[serde(rename = "12xlarge")]
    X12Large,
    #[serde(rename = "16xlarge")]
    X16Large,
    #[serde(rename = "24xlarge")]
    X24Large,
}

/// All tiers in ladder order
pub const LADDER: [SizeTier; 12] = [
    SizeTier::Nano,
    SizeTier::Micro,
    SizeTier::Small,
    SizeTier::Medium,
    SizeTier::Large,
    SizeTier::XLarge,
    SizeTier::X2Large,
    SizeTier::X4Large,
    SizeTier::X8Large,
    SizeTier::X12Large,
    SizeTier::X16Large,
    SizeTier::X24Large,
];

impl SizeTier {
    /// Position in the ladder, 0 for `nano`
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        LADDER.get(index).copied()
    }

    /// Relative compute capacity (`small` = 1)
    pub fn multiplier(self) -> f64 {
        match self {
            SizeTier::Nano => 0.25,
            SizeTier::Micro => 0.5,
            SizeTier::Small => 1.0,
            SizeTier::Medium => 2.0,
            SizeTier::Large => 4.0,
            SizeTier::XLarge => 8.0,
            SizeTier::X2Large => 16.0,
            SizeTier::X4Large => 32.0,
            SizeTier::X8Large => 64.0,
            SizeTier::X12Large => 96.0,
            SizeTier::X16Large => 128.0,
            SizeTier::X24Large => 192.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeTier::Nano => "nano",
            SizeTier::Micro => "micro",
            SizeTier::Small => "small",
            SizeTier::Medium => "medium",
            SizeTier::Large => "large",
            SizeTier::XLarge => "xlarge",
            SizeTier::X2Large => "2xlarge",
            SizeTier::X4Large => "4xlarge",
            SizeTier::X8Large => "8xlarge",
            SizeTier::X12Large => "12xlarge",
            SizeTier::X16Large => "16xlarge",
            SizeTier::X24Large => "24xlarge",
        }
    }

    /// Look up a tier by its suffix (`large`, `2xlarge`, ...)
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        LADDER.iter().copied().find(|tier| tier.as_str() == suffix)
    }

    /// Tiers strictly below `self` down to `floor` inclusive, largest first
    pub fn descending_to(self, floor: SizeTier) -> impl Iterator<Item = SizeTier> {
        let upper = self.index();
        let lower = floor.index();
        (lower..upper).rev().filter_map(SizeTier::from_index)
    }
}

impl fmt::Display for SizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipliers_strictly_increase() {
        for pair in LADDER.windows(2) {
            assert!(
                pair[1].multiplier() > pair[0].multiplier(),
                "{} should be larger than {}",
                pair[1],
                pair[0]
            );
        }
    }

    #[test]
    fn test_small_tiers_double() {
        for pair in LADDER[..9].windows(2) {
            assert_eq!(pair[1].multiplier(), pair[0].multiplier() * 2.0);
        }
    }

    #[test]
    fn test_index_matches_ladder_position() {
        for (i, tier) in LADDER.iter().enumerate() {
            assert_eq!(tier.index(), i);
            assert_eq!(SizeTier::from_index(i), Some(*tier));
        }
        assert_eq!(SizeTier::from_index(LADDER.len()), None);
    }

    #[test]
    fn test_suffix_lookup() {
        assert_eq!(SizeTier::from_suffix("2xlarge"), Some(SizeTier::X2Large));
        assert_eq!(SizeTier::from_suffix("metal"), None);
        assert_eq!(SizeTier::from_suffix("Large"), None);
    }

    #[test]
    fn test_descending_walk_is_exclusive_of_current() {
        let walk: Vec<_> = SizeTier::Large.descending_to(SizeTier::Nano).collect();
        assert_eq!(
            walk,
            vec![
                SizeTier::Medium,
                SizeTier::Small,
                SizeTier::Micro,
                SizeTier::Nano
            ]
        );

        assert_eq!(SizeTier::Large.descending_to(SizeTier::Large).count(), 0);
        assert_eq!(SizeTier::Medium.descending_to(SizeTier::Large).count(), 0);
    }
}
