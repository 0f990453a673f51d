use segunda_rankings::dataset::{Dataset, MatchRow, MatchTable, RankingsTable, TeamRow};
use segunda_rankings::metrics::DiagramKind;
use segunda_rankings::state::AppState;

fn small_dataset() -> Dataset {
    Dataset {
        rankings: RankingsTable::new(vec![
            TeamRow::new("Beta CF").with_metric("ppda", 9.0, 2),
            TeamRow::new("Alpha FC").with_metric("ppda", 8.0, 1),
            TeamRow::new("Gamma United").with_metric("ppda", 11.0, 3),
        ]),
        matches: MatchTable::new(vec![
            MatchRow::new("Alpha FC", "Beta CF", "2024-09-01").with_value("ppda", 8.5),
        ]),
        physical: MatchTable::default(),
    }
}

#[test]
fn team_selection_wraps_over_sorted_names() {
    let mut state = AppState::new();
    state.replace_dataset(small_dataset(), "test");

    assert_eq!(state.selected_team_name().as_deref(), Some("Alpha FC"));
    state.select_next_team();
    assert_eq!(state.selected_team_name().as_deref(), Some("Beta CF"));
    state.select_next_team();
    state.select_next_team();
    assert_eq!(state.selected_team_name().as_deref(), Some("Alpha FC"));
    state.select_prev_team();
    assert_eq!(state.selected_team_name().as_deref(), Some("Gamma United"));
}

#[test]
fn empty_dataset_is_a_placeholder_not_a_panic() {
    let mut state = AppState::new();
    assert!(state.selected_team_name().is_none());
    state.select_next_team();
    state.select_prev_team();
    assert!(state.selected_team_name().is_none());

    // Installing and then clearing the dataset keeps selections in range.
    state.replace_dataset(small_dataset(), "test");
    state.selected_team = 2;
    state.replace_dataset(Dataset::default(), "test");
    assert_eq!(state.selected_team, 0);
    assert!(state.selected_team_name().is_none());
}

#[test]
fn diagram_toggle_clamps_metric_cursor() {
    let mut state = AppState::new();
    state.replace_dataset(small_dataset(), "test");
    assert_eq!(state.diagram, DiagramKind::Style);

    // Park the cursor on the last performance metric, then shrink the
    // catalog by toggling back to style (13 -> 11 metrics).
    state.toggle_diagram();
    for _ in 0..20 {
        state.metric_cursor_right();
    }
    assert_eq!(state.metric_cursor, state.active_metrics().len() - 1);
    state.toggle_diagram();
    assert!(state.metric_cursor < state.active_metrics().len());
}

#[test]
fn trend_catalog_includes_physical_only_when_loaded() {
    let mut state = AppState::new();
    state.replace_dataset(small_dataset(), "test");
    let without_physical = state.trend_catalog().len();

    let mut dataset = small_dataset();
    dataset.physical = MatchTable::new(vec![
        MatchRow::new("Alpha FC", "Beta CF", "2024-09-01").with_value("sprint_count", 120.0),
    ]);
    state.replace_dataset(dataset, "test");
    let with_physical = state.trend_catalog().len();
    assert_eq!(with_physical, without_physical + 4);

    // Physical metrics resolve against the physical table.
    let physical_metric = *state
        .trend_catalog()
        .iter()
        .find(|m| m.column == "sprint_count")
        .expect("physical metric listed");
    assert!(state.trend_source(physical_metric).has_column("sprint_count"));

    let style_metric = *state
        .trend_catalog()
        .iter()
        .find(|m| m.column == "ppda")
        .expect("style metric listed");
    assert!(state.trend_source(style_metric).has_column("ppda"));
}

#[test]
fn trend_metric_cycles_and_survives_catalog_shrink() {
    let mut state = AppState::new();
    state.replace_dataset(small_dataset(), "test");

    let total = state.trend_catalog().len();
    assert!(total > 0);
    for _ in 0..total {
        state.trend_metric_next();
    }
    assert_eq!(state.trend_metric, 0);

    state.trend_metric_prev();
    assert_eq!(state.trend_metric, total - 1);

    // Toggling diagrams changes the catalog size; index must stay valid.
    state.toggle_diagram();
    assert!(state.current_trend_metric().is_some());
}

#[test]
fn log_ring_is_bounded() {
    let mut state = AppState::new();
    for i in 0..500 {
        state.push_log(format!("[INFO] message {i}"));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.back().map(String::as_str), Some("[INFO] message 499"));
}
