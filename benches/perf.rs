use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use segunda_rankings::dataset::{RankingsTable, TeamRow};
use segunda_rankings::metrics::{PERFORMANCE_METRICS, STYLE_METRICS};
use segunda_rankings::rank_grid::{GRID_SLOTS, build_rank_column};

/// Deterministic full season: every catalog metric populated, ranks 1..=22,
/// with a tied pair on each metric to keep the spillover path hot.
fn full_season() -> RankingsTable {
    let mut rows: Vec<TeamRow> = (1..=GRID_SLOTS as i64)
        .map(|rank| TeamRow::new(&format!("Team {rank:02}")))
        .collect();

    for metric in STYLE_METRICS.iter().chain(PERFORMANCE_METRICS.iter()) {
        for (idx, row) in rows.iter_mut().enumerate() {
            let rank = match idx as i64 + 1 {
                // Ranks 5 and 6 collapse into a tie at 5.
                6 => 5,
                r => r,
            };
            let value = 80.0 - rank as f64;
            row.set_value(&metric.column, value);
            row.set_rank(&format!("{}_rank", metric.column), rank);
        }
    }

    RankingsTable::new(rows)
}

fn bench_single_column(c: &mut Criterion) {
    let table = full_season();
    let metric = &STYLE_METRICS[0];
    c.bench_function("rank_column_single", |b| {
        b.iter(|| {
            let column = build_rank_column(black_box(&table), black_box(metric), "Team 11");
            black_box(column.slots.len());
        })
    });
}

fn bench_full_grid(c: &mut Criterion) {
    let table = full_season();
    c.bench_function("rank_grid_both_diagrams", |b| {
        b.iter(|| {
            let mut slots = 0usize;
            for metric in STYLE_METRICS.iter().chain(PERFORMANCE_METRICS.iter()) {
                let column = build_rank_column(black_box(&table), metric, "Team 11");
                slots += column.slots.len();
            }
            black_box(slots);
        })
    });
}

criterion_group!(benches, bench_single_column, bench_full_grid);
criterion_main!(benches);
