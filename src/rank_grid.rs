use crate::dataset::{RankingsTable, TeamRow};
use crate::metrics::MetricDef;

/// Positions in one rank column, fixed by the competition size.
pub const GRID_SLOTS: usize = 22;

const TOP_TIER_MAX: i64 = 6;
const MID_TIER_MAX: i64 = 16;

/// Coarse placement bucket for a rank. The three tiers partition 1..=22.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankTier {
    Top,
    Mid,
    Bottom,
}

impl RankTier {
    pub fn from_rank(rank: i64) -> Self {
        if rank <= TOP_TIER_MAX {
            RankTier::Top
        } else if rank <= MID_TIER_MAX {
            RankTier::Mid
        } else {
            RankTier::Bottom
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotFill {
    /// Filled with the selected team's tier color.
    Tier(RankTier),
    /// Above the team's own rank: neutral, not yet "reached".
    Unfilled,
    /// Metric has no data at all.
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct RankSlot {
    /// 1-based rank position this slot represents.
    pub position: u8,
    pub fill: SlotFill,
    pub tooltip: String,
    /// The indicator glyph sits on exactly one slot per column.
    pub marker: bool,
}

#[derive(Debug, Clone)]
pub struct RankColumn {
    pub slots: Vec<RankSlot>,
    /// Set when the rank column contains overlapping tie blocks, which the
    /// spillover rule cannot attribute. Surfaced, never silently resolved.
    pub anomaly: Option<String>,
}

pub const NO_DATA_TOOLTIP: &str = "No data available";

/// Uniform neutral column for metrics without data.
pub fn unavailable_column() -> RankColumn {
    let slots = (1..=GRID_SLOTS as u8)
        .map(|position| RankSlot {
            position,
            fill: SlotFill::Unavailable,
            tooltip: NO_DATA_TOOLTIP.to_string(),
            marker: false,
        })
        .collect();
    RankColumn {
        slots,
        anomaly: None,
    }
}

/// Build the 22-slot column for one metric and the selected team.
///
/// The bar fills from the team's own rank down to position 22 in the team's
/// tier color; positions above the rank stay unfilled. Tooltips name the
/// occupant(s) of each position, attributing gap positions to the tied group
/// that spilled over them.
pub fn build_rank_column(table: &RankingsTable, metric: &MetricDef, team: &str) -> RankColumn {
    if !metric.is_renderable() || !table.has_metric(&metric.column) {
        return unavailable_column();
    }
    let Some(team_rank) = table.rank_of(team, &metric.column) else {
        return unavailable_column();
    };
    if team_rank < 1 || team_rank > GRID_SLOTS as i64 {
        // A rank outside the grid means a malformed snapshot row.
        return unavailable_column();
    }

    let tier = RankTier::from_rank(team_rank);
    let occupants = occupants_by_position(table, &metric.column);

    let slots = (1..=GRID_SLOTS as i64)
        .map(|position| {
            let fill = if position >= team_rank {
                SlotFill::Tier(tier)
            } else {
                SlotFill::Unfilled
            };
            RankSlot {
                position: position as u8,
                fill,
                tooltip: tooltip_for_position(&occupants, &metric.column, position),
                marker: position == team_rank,
            }
        })
        .collect();

    RankColumn {
        slots,
        anomaly: contiguity_anomaly(&occupants, &metric.column),
    }
}

/// Occupants of each grid position, indexed 1..=22. Ranks outside the grid
/// are dropped.
fn occupants_by_position<'a>(
    table: &'a RankingsTable,
    metric_column: &str,
) -> Vec<Vec<&'a TeamRow>> {
    let mut occupants: Vec<Vec<&TeamRow>> = vec![Vec::new(); GRID_SLOTS + 1];
    for position in 1..=GRID_SLOTS as i64 {
        occupants[position as usize] = table.teams_at_rank(metric_column, position);
    }
    occupants
}

fn tooltip_for_position(occupants: &[Vec<&TeamRow>], metric_column: &str, position: i64) -> String {
    let exact = &occupants[position as usize];
    if !exact.is_empty() {
        return group_label(position, exact, metric_column);
    }

    // Gap position: a tied group above may have consumed it. Bounded
    // backward scan to the nearest occupied rank; stop there either way.
    let mut q = position - 1;
    while q >= 1 {
        let group = &occupants[q as usize];
        if !group.is_empty() {
            if q + group.len() as i64 - 1 >= position {
                return group_label(q, group, metric_column);
            }
            break;
        }
        q -= 1;
    }
    format!("Position {position}")
}

fn group_label(position: i64, group: &[&TeamRow], metric_column: &str) -> String {
    let names = group
        .iter()
        .map(|row| row.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    // Tied rows share the ranked value; the first row speaks for the group.
    match group.first().and_then(|row| row.value(metric_column)) {
        Some(v) => format!("#{position} {names}: {v:.2}"),
        None => format!("#{position} {names}"),
    }
}

/// Anomaly strings for every data-bearing metric of a catalog. Rank-column
/// contiguity does not depend on the selected team, so the app scans once
/// per dataset load and logs the results.
pub fn scan_anomalies(table: &RankingsTable, metrics: &[MetricDef]) -> Vec<String> {
    metrics
        .iter()
        .filter(|m| m.is_renderable() && table.has_metric(&m.column))
        .filter_map(|m| {
            let occupants = occupants_by_position(table, &m.column);
            contiguity_anomaly(&occupants, &m.column)
        })
        .collect()
}

/// The spillover rule assumes a tied group occupies a contiguous block
/// forward from its rank. An exactly-occupied position that an earlier
/// group's span also covers breaks that assumption.
fn contiguity_anomaly(occupants: &[Vec<&TeamRow>], metric_column: &str) -> Option<String> {
    for position in 2..=GRID_SLOTS as i64 {
        if occupants[position as usize].is_empty() {
            continue;
        }
        for q in 1..position {
            let group = &occupants[q as usize];
            if !group.is_empty() && q + group.len() as i64 - 1 >= position {
                return Some(format!(
                    "rank column for '{metric_column}' has overlapping tie blocks at #{q} and #{position}"
                ));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::RankingsTable;
    use crate::dataset::TeamRow;

    #[test]
    fn tier_boundaries_have_no_overlap() {
        for rank in 1..=22 {
            let tier = RankTier::from_rank(rank);
            let expected = if rank <= 6 {
                RankTier::Top
            } else if rank <= 16 {
                RankTier::Mid
            } else {
                RankTier::Bottom
            };
            assert_eq!(tier, expected, "rank {rank}");
        }
        assert_ne!(RankTier::from_rank(6), RankTier::from_rank(7));
        assert_ne!(RankTier::from_rank(16), RankTier::from_rank(17));
    }

    #[test]
    fn rank_outside_grid_renders_unavailable() {
        let table = RankingsTable::new(vec![TeamRow::new("Alpha").with_metric("ppda", 9.0, 23)]);
        let metric = MetricDef::new("ppda", "PPDA");
        let column = build_rank_column(&table, &metric, "Alpha");
        assert!(column.slots.iter().all(|s| s.fill == SlotFill::Unavailable));
    }

    #[test]
    fn overlapping_tie_blocks_are_flagged() {
        // Three teams share rank 4 (span 4..=6), but rank 5 is also
        // occupied: an upstream ranking bug the renderer must surface.
        let table = RankingsTable::new(vec![
            TeamRow::new("Alpha").with_metric("goals_for", 30.0, 4),
            TeamRow::new("Beta").with_metric("goals_for", 30.0, 4),
            TeamRow::new("Gamma").with_metric("goals_for", 30.0, 4),
            TeamRow::new("Delta").with_metric("goals_for", 29.0, 5),
        ]);
        let metric = MetricDef::new("goals_for", "Goals For");
        let column = build_rank_column(&table, &metric, "Delta");
        let anomaly = column.anomaly.expect("overlap should be flagged");
        assert!(anomaly.contains("goals_for"));
        // Exact occupant still owns its tooltip; nothing is guessed away.
        assert!(column.slots[4].tooltip.contains("Delta"));
    }
}
