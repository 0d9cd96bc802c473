// Player records, role classification, and the repository seam.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Attribute defaults (applied when a source column is absent)
// ---------------------------------------------------------------------------

pub const DEFAULT_STARS: u32 = 0;
pub const DEFAULT_BASE_PRICE: f64 = 1.0;
pub const DEFAULT_BATTING_AVG: f64 = 30.0;
pub const DEFAULT_STRIKE_RATE: f64 = 100.0;
pub const DEFAULT_WICKETS: u32 = 0;
pub const DEFAULT_ECONOMY: f64 = 7.0;

/// Squad role a player is auctioned under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Batsman,
    Bowler,
    WicketKeeper,
    AllRounder,
}

impl Role {
    /// All roles in repository lookup priority order.
    pub const ALL: [Role; 4] = [
        Role::Batsman,
        Role::Bowler,
        Role::WicketKeeper,
        Role::AllRounder,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Role::Batsman => "Batsman",
            Role::Bowler => "Bowler",
            Role::WicketKeeper => "Wicket Keeper",
            Role::AllRounder => "All Rounder",
        }
    }

    /// Whether batting statistics feed this role's score.
    pub fn bats(&self) -> bool {
        matches!(self, Role::Batsman | Role::AllRounder)
    }

    /// Whether bowling statistics feed this role's score.
    pub fn bowls(&self) -> bool {
        matches!(self, Role::Bowler | Role::AllRounder)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Nationality {
    #[default]
    Domestic,
    Foreign,
}

impl Nationality {
    /// Normalize a single-letter nationality code. `F` is foreign; every
    /// other code (including `I` and blanks) is domestic.
    pub fn from_code(code: &str) -> Self {
        if code.trim().eq_ignore_ascii_case("f") {
            Nationality::Foreign
        } else {
            Nationality::Domestic
        }
    }
}

/// Immutable snapshot of one auctionable player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub role: Role,
    pub stars: u32,
    /// Base price in crores. Always positive.
    pub base_price: f64,
    pub nationality: Nationality,
    pub batting_avg: f64,
    pub strike_rate: f64,
    pub wickets: u32,
    pub economy: f64,
}

impl PlayerRecord {
    /// A record with every attribute at its neutral default.
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        PlayerRecord {
            name: name.into(),
            role,
            stars: DEFAULT_STARS,
            base_price: DEFAULT_BASE_PRICE,
            nationality: Nationality::Domestic,
            batting_avg: DEFAULT_BATTING_AVG,
            strike_rate: DEFAULT_STRIKE_RATE,
            wickets: DEFAULT_WICKETS,
            economy: DEFAULT_ECONOMY,
        }
    }

    pub fn is_foreign(&self) -> bool {
        self.nationality == Nationality::Foreign
    }
}

// ---------------------------------------------------------------------------
// Repository seam
// ---------------------------------------------------------------------------

/// Name-based player lookup. Implementations must be side-effect free.
pub trait PlayerRepository {
    fn lookup(&self, name: &str) -> Option<PlayerRecord>;
}

impl<T: PlayerRepository + ?Sized> PlayerRepository for &T {
    fn lookup(&self, name: &str) -> Option<PlayerRecord> {
        (**self).lookup(name)
    }
}

impl<T: PlayerRepository + ?Sized> PlayerRepository for Arc<T> {
    fn lookup(&self, name: &str) -> Option<PlayerRecord> {
        (**self).lookup(name)
    }
}

impl PlayerRepository for HashMap<String, PlayerRecord> {
    fn lookup(&self, name: &str) -> Option<PlayerRecord> {
        self.get(name).cloned()
    }
}
