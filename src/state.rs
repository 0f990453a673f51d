use std::collections::VecDeque;

use crate::dataset::{Dataset, MatchTable};
use crate::metrics::{DiagramKind, MetricDef, PHYSICAL_METRICS, diagram_metrics};
use crate::rank_grid::GRID_SLOTS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Rankings,
    Trend,
}

pub struct AppState {
    pub screen: Screen,
    pub diagram: DiagramKind,
    pub dataset: Dataset,
    /// Index into the sorted team-name list.
    pub selected_team: usize,
    /// Metric column under the grid inspector cursor.
    pub metric_cursor: usize,
    /// 0-based grid row under the inspector cursor.
    pub position_cursor: usize,
    /// Index into `trend_catalog`.
    pub trend_metric: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    /// Shown in the header: db path or the demo-data label.
    pub data_source: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Rankings,
            diagram: DiagramKind::Style,
            dataset: Dataset::default(),
            selected_team: 0,
            metric_cursor: 0,
            position_cursor: 0,
            trend_metric: 0,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
            data_source: String::new(),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Install a freshly loaded snapshot, keeping every selection in range.
    pub fn replace_dataset(&mut self, dataset: Dataset, source: &str) {
        self.dataset = dataset;
        self.data_source = source.to_string();
        self.clamp_selections();
    }

    pub fn team_names(&self) -> Vec<&str> {
        self.dataset.rankings.team_names()
    }

    pub fn selected_team_name(&self) -> Option<String> {
        self.team_names()
            .get(self.selected_team)
            .map(|name| name.to_string())
    }

    pub fn select_team_by_name(&mut self, name: &str) {
        if let Some(idx) = self.team_names().iter().position(|n| *n == name) {
            self.selected_team = idx;
        }
    }

    pub fn select_next_team(&mut self) {
        let total = self.team_names().len();
        if total > 0 {
            self.selected_team = (self.selected_team + 1) % total;
        }
    }

    pub fn select_prev_team(&mut self) {
        let total = self.team_names().len();
        if total > 0 {
            self.selected_team = (self.selected_team + total - 1) % total;
        }
    }

    pub fn active_metrics(&self) -> &'static [MetricDef] {
        diagram_metrics(self.diagram)
    }

    pub fn cursor_metric(&self) -> Option<&'static MetricDef> {
        self.active_metrics().get(self.metric_cursor)
    }

    pub fn toggle_diagram(&mut self) {
        self.diagram = self.diagram.toggled();
        self.clamp_selections();
    }

    pub fn metric_cursor_left(&mut self) {
        self.metric_cursor = self.metric_cursor.saturating_sub(1);
    }

    pub fn metric_cursor_right(&mut self) {
        let max = self.active_metrics().len().saturating_sub(1);
        self.metric_cursor = (self.metric_cursor + 1).min(max);
    }

    pub fn position_cursor_up(&mut self) {
        self.position_cursor = self.position_cursor.saturating_sub(1);
    }

    pub fn position_cursor_down(&mut self) {
        self.position_cursor = (self.position_cursor + 1).min(GRID_SLOTS - 1);
    }

    /// Metrics the trend chart can cycle through: the active diagram's
    /// data-bearing metrics, plus the physical catalog when that table has
    /// rows.
    pub fn trend_catalog(&self) -> Vec<&'static MetricDef> {
        let mut catalog: Vec<&'static MetricDef> = self
            .active_metrics()
            .iter()
            .filter(|m| m.is_renderable())
            .collect();
        if !self.dataset.physical.is_empty() {
            catalog.extend(PHYSICAL_METRICS.iter());
        }
        catalog
    }

    pub fn current_trend_metric(&self) -> Option<&'static MetricDef> {
        self.trend_catalog().get(self.trend_metric).copied()
    }

    pub fn trend_metric_next(&mut self) {
        let total = self.trend_catalog().len();
        if total > 0 {
            self.trend_metric = (self.trend_metric + 1) % total;
        }
    }

    pub fn trend_metric_prev(&mut self) {
        let total = self.trend_catalog().len();
        if total > 0 {
            self.trend_metric = (self.trend_metric + total - 1) % total;
        }
    }

    /// Physical metrics read from the physical table; everything else from
    /// the match-metrics table.
    pub fn trend_source(&self, metric: &MetricDef) -> &MatchTable {
        if PHYSICAL_METRICS.iter().any(|m| m.column == metric.column) {
            &self.dataset.physical
        } else {
            &self.dataset.matches
        }
    }

    fn clamp_selections(&mut self) {
        let teams = self.team_names().len();
        if teams == 0 {
            self.selected_team = 0;
        } else if self.selected_team >= teams {
            self.selected_team = teams - 1;
        }

        let metrics = self.active_metrics().len();
        if self.metric_cursor >= metrics {
            self.metric_cursor = metrics.saturating_sub(1);
        }

        let trend = self.trend_catalog().len();
        if self.trend_metric >= trend {
            self.trend_metric = 0;
        }

        self.position_cursor = self.position_cursor.min(GRID_SLOTS - 1);
    }
}
