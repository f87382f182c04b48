//! Layout orientation types.
//!
//! - [`RankDir`] - The primary flow axis of the layout
//! - [`Align`] - Optional in-rank alignment preference
//!
//! Both parse case-insensitively from the values accepted by the widget's
//! `rankdir` and `align` attributes and display in their canonical upper case
//! form.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Rank direction of a hierarchical layout.
///
/// # Examples
///
/// ```
/// # use nut_graph_core::direction::RankDir;
/// let dir: RankDir = "lr".parse().unwrap();
/// assert_eq!(dir, RankDir::LR);
/// assert!(dir.is_horizontal());
/// assert_eq!(dir.to_string(), "LR");
///
/// assert!("XX".parse::<RankDir>().is_err());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum RankDir {
    /// Top to bottom (default)
    #[default]
    #[serde(alias = "tb")]
    TB,
    /// Bottom to top
    #[serde(alias = "bt")]
    BT,
    /// Left to right
    #[serde(alias = "lr")]
    LR,
    /// Right to left
    #[serde(alias = "rl")]
    RL,
}

impl RankDir {
    /// All rank directions, in declaration order.
    pub const ALL: [RankDir; 4] = [RankDir::TB, RankDir::BT, RankDir::LR, RankDir::RL];

    /// Returns `true` when ranks advance along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LR | Self::RL)
    }

    /// Returns `true` when ranks advance toward decreasing coordinates.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::BT | Self::RL)
    }
}

impl FromStr for RankDir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TB" => Ok(Self::TB),
            "BT" => Ok(Self::BT),
            "LR" => Ok(Self::LR),
            "RL" => Ok(Self::RL),
            _ => Err(format!(
                "invalid rank direction `{s}`, valid values: TB, BT, LR, RL"
            )),
        }
    }
}

impl From<RankDir> for &'static str {
    fn from(val: RankDir) -> Self {
        match val {
            RankDir::TB => "TB",
            RankDir::BT => "BT",
            RankDir::LR => "LR",
            RankDir::RL => "RL",
        }
    }
}

impl Display for RankDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Alignment of nodes inside their rank.
///
/// The first letter is the vertical preference (Up/Down), the second the
/// horizontal one (Left/Right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Align {
    #[serde(alias = "ul")]
    UL,
    #[serde(alias = "ur")]
    UR,
    #[serde(alias = "dl")]
    DL,
    #[serde(alias = "dr")]
    DR,
}

impl Align {
    /// Returns `true` for the left-justified variants.
    pub fn is_left(self) -> bool {
        matches!(self, Self::UL | Self::DL)
    }

    /// Returns `true` for the up-biased variants.
    pub fn is_up(self) -> bool {
        matches!(self, Self::UL | Self::UR)
    }
}

impl FromStr for Align {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UL" => Ok(Self::UL),
            "UR" => Ok(Self::UR),
            "DL" => Ok(Self::DL),
            "DR" => Ok(Self::DR),
            _ => Err(format!(
                "invalid alignment `{s}`, valid values: UL, UR, DL, DR"
            )),
        }
    }
}

impl From<Align> for &'static str {
    fn from(val: Align) -> Self {
        match val {
            Align::UL => "UL",
            Align::UR => "UR",
            Align::DL => "DL",
            Align::DR => "DR",
        }
    }
}

impl Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}
