use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::dataset::Dataset;
use crate::metrics::{DiagramKind, MetricDef, diagram_metrics};

pub struct ExportReport {
    pub teams: usize,
    pub sheets: usize,
}

/// Write the season snapshot to an xlsx workbook: one sheet per diagram,
/// one row per team, value and rank per catalog metric. Cells without data
/// stay blank.
pub fn export_rankings(path: &Path, dataset: &Dataset) -> Result<ExportReport> {
    let mut workbook = Workbook::new();
    let mut sheets = 0usize;

    for (name, kind) in [
        ("Style", DiagramKind::Style),
        ("Performance", DiagramKind::Performance),
    ] {
        let rows = sheet_rows(dataset, diagram_metrics(kind));
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        write_rows(sheet, &rows)?;
        sheets += 1;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        teams: dataset.rankings.len(),
        sheets,
    })
}

fn sheet_rows(dataset: &Dataset, metrics: &[MetricDef]) -> Vec<Vec<String>> {
    let mut header = vec!["Team".to_string()];
    for metric in metrics {
        header.push(metric.label.clone());
        header.push(format!("{} Rank", metric.label));
    }

    let mut rows = vec![header];
    for team in dataset.rankings.team_names() {
        let mut row = vec![team.to_string()];
        for metric in metrics {
            row.push(
                dataset
                    .rankings
                    .value_of(team, &metric.column)
                    .map(|v| format!("{v:.2}"))
                    .unwrap_or_default(),
            );
            row.push(
                dataset
                    .rankings
                    .rank_of(team, &metric.column)
                    .map(|r| r.to_string())
                    .unwrap_or_default(),
            );
        }
        rows.push(row);
    }
    rows
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            worksheet.write_string(r as u32, c as u16, cell)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{RankingsTable, TeamRow};

    #[test]
    fn sheet_rows_cover_all_teams_and_metrics() {
        let dataset = Dataset {
            rankings: RankingsTable::new(vec![
                TeamRow::new("Alpha").with_metric("goals_for", 40.0, 1),
                TeamRow::new("Beta").with_metric("goals_for", 31.0, 2),
            ]),
            ..Dataset::default()
        };
        let metrics = diagram_metrics(DiagramKind::Performance);
        let rows = sheet_rows(&dataset, metrics);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].len(), 1 + metrics.len() * 2);
        // goals_for is the 4th performance metric: columns 7 (value), 8 (rank).
        assert_eq!(rows[1][0], "Alpha");
        assert_eq!(rows[1][7], "40.00");
        assert_eq!(rows[1][8], "1");
        // Metrics without data stay blank.
        assert_eq!(rows[1][1], "");
    }
}
