use crate::dataset::MatchTable;

/// One bar in the per-match trend chart.
#[derive(Debug, Clone)]
pub struct TrendPoint {
    pub opponent: String,
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct TrendSeries {
    pub metric_column: String,
    pub points: Vec<TrendPoint>,
    pub average: f64,
}

/// Per-match values of one metric for one team, in match-date order.
/// Returns `None` when the team has no rows or the metric column carries no
/// data for it; the caller renders the empty placeholder.
pub fn build_trend(table: &MatchTable, team: &str, metric_column: &str) -> Option<TrendSeries> {
    if !table.has_column(metric_column) {
        return None;
    }

    let points: Vec<TrendPoint> = table
        .rows_for_team(team)
        .into_iter()
        .filter_map(|row| {
            let value = row.value(metric_column)?;
            Some(TrendPoint {
                opponent: row.opponent.clone(),
                date: row.date.clone(),
                value,
            })
        })
        .collect();

    if points.is_empty() {
        return None;
    }

    let average = points.iter().map(|p| p.value).sum::<f64>() / points.len() as f64;
    Some(TrendSeries {
        metric_column: metric_column.to_string(),
        points,
        average,
    })
}
