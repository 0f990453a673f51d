use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use rusqlite::types::Value;

use crate::dataset::{Dataset, MatchRow, MatchTable, RankingsTable, TeamRow};

pub const RANKINGS_TABLE: &str = "team_season_rankings";
pub const MATCHES_TABLE: &str = "team_match_metrics";
pub const PHYSICAL_TABLE: &str = "team_match_physical";

const TEAM_COL: &str = "team";
const OPPONENT_COL: &str = "opponent";
const DATE_COL: &str = "match_date";

/// Database location: `RANKINGS_DB` env override, else a local file.
pub fn db_path_from_env() -> PathBuf {
    match std::env::var("RANKINGS_DB") {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from("segunda_rankings.sqlite"),
    }
}

pub fn open_db(path: &Path) -> Result<Connection> {
    Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))
}

/// Load everything the dashboard needs. Individual table failures degrade to
/// empty tables and a console warning; only the caller decides whether an
/// entirely empty dataset is worth surfacing.
pub struct LoadReport {
    pub dataset: Dataset,
    pub warnings: Vec<String>,
}

pub fn load_dataset(conn: &Connection) -> LoadReport {
    let mut warnings = Vec::new();

    let rankings = match load_rankings_table(conn) {
        Ok(Some(table)) => table,
        Ok(None) => {
            warnings.push(format!(
                "[INFO] table {RANKINGS_TABLE} absent, no season rankings"
            ));
            RankingsTable::default()
        }
        Err(err) => {
            warnings.push(format!("[WARN] season rankings load failed: {err:#}"));
            RankingsTable::default()
        }
    };

    let matches = match load_match_table(conn, MATCHES_TABLE) {
        Ok(Some(table)) => table,
        Ok(None) => {
            warnings.push(format!(
                "[INFO] table {MATCHES_TABLE} absent, no match history"
            ));
            MatchTable::default()
        }
        Err(err) => {
            warnings.push(format!("[WARN] match history load failed: {err:#}"));
            MatchTable::default()
        }
    };

    // The physical table is optional by contract; absence is not worth a log.
    let physical = match load_match_table(conn, PHYSICAL_TABLE) {
        Ok(Some(table)) => table,
        Ok(None) => MatchTable::default(),
        Err(err) => {
            warnings.push(format!("[WARN] physical metrics load failed: {err:#}"));
            MatchTable::default()
        }
    };

    LoadReport {
        dataset: Dataset {
            rankings,
            matches,
            physical,
        },
        warnings,
    }
}

/// `Ok(None)` when the table does not exist in this database.
pub fn load_rankings_table(conn: &Connection) -> Result<Option<RankingsTable>> {
    if !table_exists(conn, RANKINGS_TABLE)? {
        return Ok(None);
    }

    let mut stmt = conn
        .prepare(&format!("SELECT * FROM {RANKINGS_TABLE}"))
        .context("prepare rankings query")?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let team_idx = column_index(&columns, TEAM_COL)
        .ok_or_else(|| anyhow!("{RANKINGS_TABLE} has no '{TEAM_COL}' column"))?;

    let mut rows = stmt.query([]).context("query rankings")?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().context("read rankings row")? {
        let team: String = row.get(team_idx).context("decode team name")?;
        let mut team_row = TeamRow::new(&team);
        for (idx, name) in columns.iter().enumerate() {
            if idx == team_idx {
                continue;
            }
            let value: Value = row.get(idx).context("decode rankings cell")?;
            if name.ends_with("_rank") {
                if let Some(rank) = cell_as_i64(&value) {
                    team_row.set_rank(name, rank);
                }
            } else if let Some(v) = cell_as_f64(&value) {
                team_row.set_value(name, v);
            }
        }
        out.push(team_row);
    }
    Ok(Some(RankingsTable::new(out)))
}

/// Shared loader for the per-match tables; `Ok(None)` when absent.
pub fn load_match_table(conn: &Connection, table: &str) -> Result<Option<MatchTable>> {
    if !table_exists(conn, table)? {
        return Ok(None);
    }

    let mut stmt = conn
        .prepare(&format!("SELECT * FROM {table}"))
        .with_context(|| format!("prepare {table} query"))?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let team_idx = column_index(&columns, TEAM_COL)
        .ok_or_else(|| anyhow!("{table} has no '{TEAM_COL}' column"))?;
    let opponent_idx = column_index(&columns, OPPONENT_COL);
    let date_idx = column_index(&columns, DATE_COL);

    let mut rows = stmt.query([]).with_context(|| format!("query {table}"))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().with_context(|| format!("read {table} row"))? {
        let team: String = row.get(team_idx).context("decode team name")?;
        let opponent: String = match opponent_idx {
            Some(idx) => row.get::<_, Option<String>>(idx)?.unwrap_or_default(),
            None => String::new(),
        };
        let date: String = match date_idx {
            Some(idx) => row.get::<_, Option<String>>(idx)?.unwrap_or_default(),
            None => String::new(),
        };

        let mut match_row = MatchRow::new(&team, &opponent, &date);
        for (idx, name) in columns.iter().enumerate() {
            if idx == team_idx || Some(idx) == opponent_idx || Some(idx) == date_idx {
                continue;
            }
            let value: Value = row.get(idx).context("decode match cell")?;
            if let Some(v) = cell_as_f64(&value) {
                match_row.set_value(name, v);
            }
        }
        out.push(match_row);
    }
    Ok(Some(MatchTable::new(out)))
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .with_context(|| format!("probe table {table}"))?;
    Ok(count > 0)
}

fn column_index(columns: &[String], name: &str) -> Option<usize> {
    columns.iter().position(|c| c == name)
}

fn cell_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Real(v) => Some(*v),
        Value::Integer(v) => Some(*v as f64),
        _ => None,
    }
}

fn cell_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(v) => Some(*v),
        Value::Real(v) => Some(*v as i64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_db() -> Connection {
        let conn = Connection::open_in_memory().expect("in-memory db");
        conn.execute_batch(
            r#"
            CREATE TABLE team_season_rankings (
                team TEXT NOT NULL,
                ppda REAL,
                ppda_rank INTEGER,
                goals_for INTEGER,
                goals_for_rank INTEGER
            );
            INSERT INTO team_season_rankings VALUES
                ('Alpha', 8.1, 1, 40, 2),
                ('Beta', 9.4, 2, 44, 1),
                ('Gamma', NULL, NULL, 31, 3);

            CREATE TABLE team_match_metrics (
                team TEXT NOT NULL,
                opponent TEXT,
                match_date TEXT,
                ppda REAL
            );
            INSERT INTO team_match_metrics VALUES
                ('Alpha', 'Beta', '2024-09-01', 7.5),
                ('Alpha', 'Gamma', '2024-08-18', 9.0),
                ('Beta', 'Alpha', '2024-09-01', NULL);
            "#,
        )
        .expect("seed schema");
        conn
    }

    #[test]
    fn rankings_round_trip_with_nulls() {
        let conn = seeded_db();
        let table = load_rankings_table(&conn)
            .expect("load ok")
            .expect("table present");
        assert_eq!(table.len(), 3);
        assert!(table.has_metric("ppda"));
        assert_eq!(table.rank_of("Beta", "goals_for"), Some(1));
        assert_eq!(table.value_of("Alpha", "ppda"), Some(8.1));
        // NULL cells simply vanish from the row.
        assert_eq!(table.rank_of("Gamma", "ppda"), None);
        assert_eq!(table.value_of("Gamma", "ppda"), None);
    }

    #[test]
    fn match_table_round_trip() {
        let conn = seeded_db();
        let table = load_match_table(&conn, MATCHES_TABLE)
            .expect("load ok")
            .expect("table present");
        assert_eq!(table.len(), 3);
        let rows = table.rows_for_team("Alpha");
        assert_eq!(rows[0].opponent, "Gamma");
        assert_eq!(rows[1].value("ppda"), Some(7.5));
    }

    #[test]
    fn missing_tables_degrade_to_empty() {
        let conn = seeded_db();
        assert!(
            load_match_table(&conn, PHYSICAL_TABLE)
                .expect("probe ok")
                .is_none()
        );

        let report = load_dataset(&conn);
        assert!(!report.dataset.rankings.is_empty());
        assert!(report.dataset.physical.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn empty_database_loads_as_empty_dataset() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        let report = load_dataset(&conn);
        assert!(report.dataset.is_empty());
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings.iter().all(|w| w.starts_with("[INFO]")));
    }
}
