use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};

use crate::metrics::rank_column;

/// One team's row in the wide season-rankings table: every metric value
/// keyed by column name, plus the precomputed `<metric>_rank` integers.
#[derive(Debug, Clone, Default)]
pub struct TeamRow {
    pub name: String,
    values: HashMap<String, f64>,
    ranks: HashMap<String, i64>,
}

impl TeamRow {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            values: HashMap::new(),
            ranks: HashMap::new(),
        }
    }

    pub fn with_metric(mut self, column: &str, value: f64, rank: i64) -> Self {
        self.set_value(column, value);
        self.set_rank(&rank_column(column), rank);
        self
    }

    pub fn set_value(&mut self, column: &str, value: f64) {
        self.values.insert(column.to_string(), value);
    }

    pub fn set_rank(&mut self, rank_col: &str, rank: i64) {
        self.ranks.insert(rank_col.to_string(), rank);
    }

    pub fn value(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }

    pub fn rank(&self, rank_col: &str) -> Option<i64> {
        self.ranks.get(rank_col).copied()
    }
}

/// Season rankings snapshot: one row per team, read-only during a render.
#[derive(Debug, Clone, Default)]
pub struct RankingsTable {
    rows: Vec<TeamRow>,
    columns: HashSet<String>,
}

impl RankingsTable {
    pub fn new(rows: Vec<TeamRow>) -> Self {
        let mut columns = HashSet::new();
        for row in &rows {
            columns.extend(row.values.keys().cloned());
            columns.extend(row.ranks.keys().cloned());
        }
        Self { rows, columns }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[TeamRow] {
        &self.rows
    }

    /// A metric is present only when both its value column and its rank
    /// column exist somewhere in the snapshot.
    pub fn has_metric(&self, metric_column: &str) -> bool {
        self.columns.contains(metric_column) && self.columns.contains(&rank_column(metric_column))
    }

    pub fn team(&self, name: &str) -> Option<&TeamRow> {
        self.rows.iter().find(|row| row.name == name)
    }

    pub fn team_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rows.iter().map(|row| row.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn rank_of(&self, team: &str, metric_column: &str) -> Option<i64> {
        self.team(team)?.rank(&rank_column(metric_column))
    }

    pub fn value_of(&self, team: &str, metric_column: &str) -> Option<f64> {
        self.team(team)?.value(metric_column)
    }

    /// All teams whose precomputed rank for the metric equals `position`.
    /// Plain linear scan; the table never exceeds the competition size.
    pub fn teams_at_rank(&self, metric_column: &str, position: i64) -> Vec<&TeamRow> {
        let rank_col = rank_column(metric_column);
        self.rows
            .iter()
            .filter(|row| row.rank(&rank_col) == Some(position))
            .collect()
    }
}

/// One team's row for one match in the per-match metrics table.
#[derive(Debug, Clone)]
pub struct MatchRow {
    pub team: String,
    pub opponent: String,
    /// Raw date string as stored; ordering parses it best-effort.
    pub date: String,
    values: HashMap<String, f64>,
}

impl MatchRow {
    pub fn new(team: &str, opponent: &str, date: &str) -> Self {
        Self {
            team: team.to_string(),
            opponent: opponent.to_string(),
            date: date.to_string(),
            values: HashMap::new(),
        }
    }

    pub fn with_value(mut self, column: &str, value: f64) -> Self {
        self.set_value(column, value);
        self
    }

    pub fn set_value(&mut self, column: &str, value: f64) {
        self.values.insert(column.to_string(), value);
    }

    pub fn value(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }
}

/// Per-match metric history (also reused for the optional physical table,
/// which has the same row shape).
#[derive(Debug, Clone, Default)]
pub struct MatchTable {
    rows: Vec<MatchRow>,
    columns: HashSet<String>,
}

impl MatchTable {
    pub fn new(rows: Vec<MatchRow>) -> Self {
        let mut columns = HashSet::new();
        for row in &rows {
            columns.extend(row.values.keys().cloned());
        }
        Self { rows, columns }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    /// Rows for one team, ordered by match date (unparseable dates sort
    /// after parsed ones, by raw string).
    pub fn rows_for_team(&self, team: &str) -> Vec<&MatchRow> {
        let mut rows: Vec<&MatchRow> = self.rows.iter().filter(|row| row.team == team).collect();
        rows.sort_by(|a, b| {
            match (parse_match_date(&a.date), parse_match_date(&b.date)) {
                (Some(da), Some(db)) => da.cmp(&db),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => a.date.cmp(&b.date),
            }
        });
        rows
    }
}

pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }
    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(cleaned, fmt) {
            return Some(d);
        }
    }
    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// The full read-only snapshot one render cycle works from.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub rankings: RankingsTable,
    pub matches: MatchTable,
    pub physical: MatchTable,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty()
    }
}
