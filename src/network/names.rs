//! Known network names.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

/// Networks the tool knows how to set up.
///
/// Declaration order matters: it fixes each network's port offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum NetworkName {
    Dailynet,
    Ghostnet,
    Mainnet,
    Oxfordnet,
    Parisnet,
    Weeklynet,
    Predalnet,
}

impl NetworkName {
    /// Every known network in declaration order.
    pub const ALL: [NetworkName; 7] = [
        NetworkName::Dailynet,
        NetworkName::Ghostnet,
        NetworkName::Mainnet,
        NetworkName::Oxfordnet,
        NetworkName::Parisnet,
        NetworkName::Weeklynet,
        NetworkName::Predalnet,
    ];

    /// Lowercase name, also the registry key prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkName::Dailynet => "dailynet",
            NetworkName::Ghostnet => "ghostnet",
            NetworkName::Mainnet => "mainnet",
            NetworkName::Oxfordnet => "oxfordnet",
            NetworkName::Parisnet => "parisnet",
            NetworkName::Weeklynet => "weeklynet",
            NetworkName::Predalnet => "predalnet",
        }
    }

    /// 1-based position in [`NetworkName::ALL`].
    pub fn ordinal(&self) -> u16 {
        Self::ALL
            .iter()
            .position(|n| n == self)
            .map_or(0, |i| i as u16 + 1)
    }
}

impl fmt::Display for NetworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|n| n.as_str() == lower)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|n| n.as_str()).collect();
                format!(
                    "invalid network name '{}'. Network must be one of {}",
                    s,
                    names.join(", ")
                )
            })
    }
}
