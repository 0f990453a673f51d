use chrono::{Duration as ChronoDuration, NaiveDate};
use rand::Rng;

use crate::dataset::{Dataset, MatchRow, MatchTable, RankingsTable, TeamRow};
use crate::metrics::{PERFORMANCE_METRICS, PHYSICAL_METRICS, STYLE_METRICS, rank_column};
use crate::rank_grid::GRID_SLOTS;

const DEMO_TEAMS: [&str; GRID_SLOTS] = [
    "Alpha FC",
    "Beta CF",
    "Gamma United",
    "Delta City",
    "Epsilon FC",
    "Zeta CF",
    "Eta Rovers",
    "Theta Town",
    "Iota FC",
    "Kappa CF",
    "Lambda FC",
    "Mu Athletic",
    "Nu County",
    "Xi FC",
    "Omicron CF",
    "Pi Rovers",
    "Rho United",
    "Sigma FC",
    "Tau Athletic",
    "Upsilon Town",
    "Phi CF",
    "Omega FC",
];

const DEMO_MATCHES_PER_TEAM: usize = 10;

/// Fully synthetic season so the dashboard renders without a database.
/// Values are random but ranks are honest competition ranks over them,
/// including shared ranks for ties.
pub fn demo_dataset() -> Dataset {
    let mut rng = rand::thread_rng();

    let mut team_rows: Vec<TeamRow> = DEMO_TEAMS.iter().map(|name| TeamRow::new(name)).collect();

    for metric in STYLE_METRICS.iter().chain(PERFORMANCE_METRICS.iter()) {
        let mut values: Vec<f64> = Vec::with_capacity(DEMO_TEAMS.len());
        for i in 0..DEMO_TEAMS.len() {
            // A sprinkle of exact ties keeps the spillover path visible.
            if i > 0 && rng.gen_bool(0.15) {
                values.push(values[i - 1]);
            } else {
                values.push((rng.gen_range(20.0..80.0_f64) * 10.0).round() / 10.0);
            }
        }
        let ranks = competition_ranks(&values);
        for (row, (value, rank)) in team_rows.iter_mut().zip(values.iter().zip(ranks.iter())) {
            row.set_value(&metric.column, *value);
            row.set_rank(&rank_column(&metric.column), *rank);
        }
    }

    let season_start = NaiveDate::from_ymd_opt(2024, 8, 18).expect("static date");
    let mut match_rows = Vec::new();
    let mut physical_rows = Vec::new();
    for (idx, team) in DEMO_TEAMS.iter().enumerate() {
        for round in 0..DEMO_MATCHES_PER_TEAM {
            let opponent = DEMO_TEAMS[(idx + round + 1) % DEMO_TEAMS.len()];
            let date = (season_start + ChronoDuration::weeks(round as i64))
                .format("%Y-%m-%d")
                .to_string();

            let mut row = MatchRow::new(team, opponent, &date);
            for metric in STYLE_METRICS.iter().chain(PERFORMANCE_METRICS.iter()) {
                let season_value = team_rows[idx].value(&metric.column).unwrap_or(50.0);
                let jitter = rng.gen_range(-6.0..6.0);
                row.set_value(&metric.column, ((season_value + jitter) * 10.0).round() / 10.0);
            }
            match_rows.push(row);

            let mut phys = MatchRow::new(team, opponent, &date);
            for metric in PHYSICAL_METRICS.iter() {
                phys.set_value(
                    &metric.column,
                    (rng.gen_range(10.0..120.0_f64) * 10.0).round() / 10.0,
                );
            }
            physical_rows.push(phys);
        }
    }

    Dataset {
        rankings: RankingsTable::new(team_rows),
        matches: MatchTable::new(match_rows),
        physical: MatchTable::new(physical_rows),
    }
}

/// Competition ranking over metric values, higher is better: tied values
/// share the best position of the block and the next distinct value skips
/// past the block.
fn competition_ranks(values: &[f64]) -> Vec<i64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0i64; values.len()];
    let mut prev_value = f64::NAN;
    let mut prev_rank = 0i64;
    for (pos, &idx) in order.iter().enumerate() {
        let rank = if values[idx] == prev_value {
            prev_rank
        } else {
            pos as i64 + 1
        };
        ranks[idx] = rank;
        prev_value = values[idx];
        prev_rank = rank;
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn competition_ranks_share_and_skip() {
        let ranks = competition_ranks(&[50.0, 70.0, 70.0, 40.0]);
        assert_eq!(ranks, vec![3, 1, 1, 4]);
    }

    #[test]
    fn demo_dataset_is_complete() {
        let data = demo_dataset();
        assert_eq!(data.rankings.len(), GRID_SLOTS);
        assert!(data.rankings.has_metric("ppda"));
        assert!(data.rankings.has_metric("goals_for"));
        assert_eq!(
            data.matches.rows_for_team("Alpha FC").len(),
            DEMO_MATCHES_PER_TEAM
        );
        assert!(data.physical.has_column("sprint_count"));

        // Every rank lands inside the grid.
        for row in data.rankings.rows() {
            let rank = row.rank("ppda_rank").expect("rank present");
            assert!((1..=GRID_SLOTS as i64).contains(&rank));
        }
    }
}
