// Role-partitioned player tables loaded from CSV.
//
// One CSV per role (the four sheets of the auction dataset). Columns:
// Player, Stars, Base Price (Cr), Nationality, Average, Strike Rates, Wkts,
// Economy. Only Player is required; absent columns and blank or unparseable
// cells fall back to the neutral defaults on `PlayerRecord::new`.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use bidbot_core::player::{Nationality, PlayerRecord, PlayerRepository, Role};
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

/// Locations of the four role tables.
#[derive(Debug, Clone, Deserialize)]
pub struct TablePaths {
    pub batsmen: PathBuf,
    pub bowlers: PathBuf,
    pub wicket_keepers: PathBuf,
    pub all_rounders: PathBuf,
}

impl TablePaths {
    pub fn for_role(&self, role: Role) -> &Path {
        match role {
            Role::Batsman => &self.batsmen,
            Role::Bowler => &self.bowlers,
            Role::WicketKeeper => &self.wicket_keepers,
            Role::AllRounder => &self.all_rounders,
        }
    }

    /// Resolve relative paths against `base`.
    pub fn relative_to(&self, base: &Path) -> TablePaths {
        TablePaths {
            batsmen: base.join(&self.batsmen),
            bowlers: base.join(&self.bowlers),
            wicket_keepers: base.join(&self.wicket_keepers),
            all_rounders: base.join(&self.all_rounders),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawPlayerRow {
    #[serde(rename = "Player", alias = "Name")]
    name: String,
    #[serde(rename = "Stars", default, deserialize_with = "lenient_number")]
    stars: Option<f64>,
    #[serde(
        rename = "Base Price (Cr)",
        alias = "Base Price",
        default,
        deserialize_with = "lenient_number"
    )]
    base_price: Option<f64>,
    #[serde(rename = "Nationality", default)]
    nationality: Option<String>,
    #[serde(rename = "Average", default, deserialize_with = "lenient_number")]
    average: Option<f64>,
    #[serde(
        rename = "Strike Rates",
        alias = "Strike Rate",
        default,
        deserialize_with = "lenient_number"
    )]
    strike_rate: Option<f64>,
    #[serde(rename = "Wkts", alias = "Wickets", default, deserialize_with = "lenient_number")]
    wickets: Option<f64>,
    #[serde(rename = "Economy", default, deserialize_with = "lenient_number")]
    economy: Option<f64>,
}

/// Blank, non-numeric ("-", "NA") and non-finite cells read as absent.
fn lenient_number<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    let raw: Option<String> = Option::deserialize(de)?;
    Ok(raw
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite()))
}

impl RawPlayerRow {
    fn into_record(self, role: Role) -> PlayerRecord {
        let mut record = PlayerRecord::new(self.name.trim(), role);
        if let Some(stars) = self.stars.filter(|v| *v >= 0.0) {
            record.stars = stars.round() as u32;
        }
        if let Some(price) = self.base_price.filter(|v| *v > 0.0) {
            record.base_price = price;
        }
        if let Some(code) = self.nationality.as_deref() {
            record.nationality = Nationality::from_code(code);
        }
        if let Some(avg) = self.average.filter(|v| *v >= 0.0) {
            record.batting_avg = avg;
        }
        if let Some(sr) = self.strike_rate.filter(|v| *v >= 0.0) {
            record.strike_rate = sr;
        }
        if let Some(wkts) = self.wickets.filter(|v| *v >= 0.0) {
            record.wickets = wkts.round() as u32;
        }
        if let Some(econ) = self.economy.filter(|v| *v >= 0.0) {
            record.economy = econ;
        }
        record
    }
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Parse one role table. Malformed rows and rows without a name are skipped.
pub fn read_role_table<R: Read>(rdr: R, role: Role) -> Result<Vec<PlayerRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawPlayerRow>() {
        match result {
            Ok(raw) => {
                if raw.name.trim().is_empty() {
                    warn!("skipping {} row without a player name", role);
                    continue;
                }
                players.push(raw.into_record(role));
            }
            Err(e) => {
                warn!("skipping malformed {} row: {}", role, e);
            }
        }
    }
    Ok(players)
}

/// Load one role table from a CSV file.
pub fn load_role_table(path: &Path, role: Role) -> Result<Vec<PlayerRecord>, TableError> {
    let file = std::fs::File::open(path).map_err(|e| TableError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    read_role_table(file, role).map_err(|e| TableError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// PlayerTables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
struct RoleTable {
    players: Vec<PlayerRecord>,
    index: HashMap<String, usize>,
}

/// In-memory player repository, one table per role.
///
/// Lookup checks tables in `Role::ALL` order and returns the first match, so a
/// name listed under two roles resolves to the earlier one.
#[derive(Debug, Clone, Default)]
pub struct PlayerTables {
    tables: HashMap<Role, RoleTable>,
}

impl PlayerTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load all four tables.
    pub fn load(paths: &TablePaths) -> Result<Self, TableError> {
        let mut tables = PlayerTables::new();
        for role in Role::ALL {
            let path = paths.for_role(role);
            let players = load_role_table(path, role)?;
            debug!("loaded {} {} rows from {}", players.len(), role, path.display());
            tables.insert(role, players);
        }
        Ok(tables)
    }

    /// Add players to the `role` table. Records keep the table's role; a name
    /// already present keeps its first row.
    pub fn insert(&mut self, role: Role, players: impl IntoIterator<Item = PlayerRecord>) {
        let table = self.tables.entry(role).or_default();
        for mut player in players {
            if table.index.contains_key(&player.name) {
                warn!("duplicate {} entry for '{}', keeping the first", role, player.name);
                continue;
            }
            player.role = role;
            table.index.insert(player.name.clone(), table.players.len());
            table.players.push(player);
        }
    }

    /// Total number of players across all tables.
    pub fn len(&self) -> usize {
        self.tables.values().map(|t| t.players.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of players in one role table.
    pub fn role_len(&self, role: Role) -> usize {
        self.tables.get(&role).map_or(0, |t| t.players.len())
    }

    /// Player names in `role`, in file order.
    pub fn names(&self, role: Role) -> Vec<&str> {
        self.tables
            .get(&role)
            .map(|t| t.players.iter().map(|p| p.name.as_str()).collect())
            .unwrap_or_default()
    }
}

impl PlayerRepository for PlayerTables {
    fn lookup(&self, name: &str) -> Option<PlayerRecord> {
        Role::ALL.iter().find_map(|role| {
            let table = self.tables.get(role)?;
            table.index.get(name).map(|&i| table.players[i].clone())
        })
    }
}
