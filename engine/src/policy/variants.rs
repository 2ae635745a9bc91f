// engine/src/policy/variants.rs
#![forbid(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Aggressivity {
    /// Takes every chain it can.
    None,
    /// Holds back small chains to build bigger ones.
    Full,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Anticipation {
    NextOne,
    NextTwo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AiKind {
    Dumb,
    Simple(Aggressivity),
    Anticipatory(Anticipation),
    Advanced,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error(
    "unknown AI kind {0:?} (expected dumb, simple, simple-full, anticipatory, anticipatory-2 or advanced)"
)]
pub struct ParseAiKindError(pub String);

impl FromStr for AiKind {
    type Err = ParseAiKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let k = s.trim().to_ascii_lowercase().replace('_', "-");
        match k.as_str() {
            "dumb" | "random" => Ok(AiKind::Dumb),
            "simple" | "simple-none" => Ok(AiKind::Simple(Aggressivity::None)),
            "simple-full" | "aggressive" => Ok(AiKind::Simple(Aggressivity::Full)),
            "anticipatory" | "anticipatory-1" | "next-one" => {
                Ok(AiKind::Anticipatory(Anticipation::NextOne))
            }
            "anticipatory-2" | "next-two" => Ok(AiKind::Anticipatory(Anticipation::NextTwo)),
            "advanced" => Ok(AiKind::Advanced),
            _ => Err(ParseAiKindError(s.to_string())),
        }
    }
}

impl fmt::Display for AiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AiKind::Dumb => "dumb",
            AiKind::Simple(Aggressivity::None) => "simple",
            AiKind::Simple(Aggressivity::Full) => "simple-full",
            AiKind::Anticipatory(Anticipation::NextOne) => "anticipatory",
            AiKind::Anticipatory(Anticipation::NextTwo) => "anticipatory-2",
            AiKind::Advanced => "advanced",
        };
        f.write_str(s)
    }
}

/// Which formula turns a `PositionResult` into a score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScoreFormula {
    /// Seeded random score.
    Random,
    Simple { hold_small_chains: bool },
    /// Simple formula restricted to the immediate chain.
    FirstStep,
    Advanced,
}

/// Search and pacing knobs of one AI player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AiPolicy {
    pub formula: ScoreFormula,
    pub check_next: bool,
    pub check_following: bool,
    pub max_speed: bool,
    /// Rendering hint: whether the UI shows this player's landing silhouette.
    pub satellite_visible: bool,
    pub time_to_wait_ms: u32,
    pub time_deviation_ms: u32,
}

impl AiPolicy {
    /// Weight (percent) of the best deeper-ply score.
    pub fn discount_percent(&self, waiting_ghosts: u32) -> i64 {
        match self.formula {
            ScoreFormula::Advanced => (60 - 2 * i64::from(waiting_ghosts.min(20))).max(20),
            _ => 50,
        }
    }

    #[inline]
    pub fn searches_ahead(&self) -> bool {
        self.check_next || self.check_following
    }
}

impl AiKind {
    pub fn policy(self) -> AiPolicy {
        match self {
            AiKind::Dumb => AiPolicy {
                formula: ScoreFormula::Random,
                check_next: false,
                check_following: false,
                max_speed: false,
                satellite_visible: true,
                time_to_wait_ms: 400,
                time_deviation_ms: 200,
            },
            AiKind::Simple(aggressivity) => AiPolicy {
                formula: ScoreFormula::Simple {
                    hold_small_chains: aggressivity == Aggressivity::Full,
                },
                check_next: false,
                check_following: false,
                max_speed: true,
                satellite_visible: aggressivity == Aggressivity::None,
                time_to_wait_ms: 250,
                time_deviation_ms: 100,
            },
            AiKind::Anticipatory(anticipation) => AiPolicy {
                formula: ScoreFormula::FirstStep,
                check_next: true,
                check_following: anticipation == Anticipation::NextTwo,
                max_speed: true,
                satellite_visible: false,
                time_to_wait_ms: 200,
                time_deviation_ms: 80,
            },
            AiKind::Advanced => AiPolicy {
                formula: ScoreFormula::Advanced,
                check_next: true,
                check_following: true,
                max_speed: true,
                satellite_visible: false,
                time_to_wait_ms: 150,
                time_deviation_ms: 50,
            },
        }
    }
}
