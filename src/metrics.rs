use once_cell::sync::Lazy;

/// One column of a ranking diagram: where the values live and how to label
/// them. `available` covers metrics the feed stopped delivering; a
/// `placeholder` slot reserves a column that never had data behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDef {
    pub column: String,
    pub label: String,
    pub available: bool,
    pub placeholder: bool,
}

impl MetricDef {
    pub fn new(column: &str, label: &str) -> Self {
        Self {
            column: column.to_string(),
            label: label.to_string(),
            available: true,
            placeholder: false,
        }
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn placeholder(mut self) -> Self {
        self.placeholder = true;
        self.available = false;
        self
    }

    /// A metric renders as data-bearing only when it is neither switched off
    /// nor a reserved placeholder column.
    pub fn is_renderable(&self) -> bool {
        self.available && !self.placeholder
    }
}

/// Name of the precomputed integer rank column paired with a metric column.
pub fn rank_column(metric_column: &str) -> String {
    format!("{metric_column}_rank")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramKind {
    Style,
    Performance,
}

impl DiagramKind {
    pub fn toggled(self) -> Self {
        match self {
            DiagramKind::Style => DiagramKind::Performance,
            DiagramKind::Performance => DiagramKind::Style,
        }
    }
}

pub fn diagram_label(kind: DiagramKind) -> &'static str {
    match kind {
        DiagramKind::Style => "GLOBAL STYLE",
        DiagramKind::Performance => "GLOBAL PERFORMANCE",
    }
}

pub fn diagram_metrics(kind: DiagramKind) -> &'static [MetricDef] {
    match kind {
        DiagramKind::Style => &STYLE_METRICS,
        DiagramKind::Performance => &PERFORMANCE_METRICS,
    }
}

/// Playing-style diagram: how a team plays, not how well.
pub static STYLE_METRICS: Lazy<Vec<MetricDef>> = Lazy::new(|| {
    vec![
        MetricDef::new("game_initiative", "Game Initiative"),
        MetricDef::new("possession_pct", "Possession %"),
        MetricDef::new("offensive_buildup", "Offensive Build-up"),
        MetricDef::new("fast_finish_pct", "Fast Finishes %"),
        MetricDef::new("circulation_tempo", "Circulation Tempo"),
        MetricDef::new("long_pass_pct", "Long Passes %"),
        MetricDef::new("crosses_attempted", "Crosses"),
        MetricDef::new("opp_half_recovery_pct", "Opp-Half Recoveries %"),
        MetricDef::new("fast_recovery_pct", "Fast Recoveries %"),
        MetricDef::new("recovery_tempo", "Recovery Tempo"),
        MetricDef::new("ppda", "PPDA"),
    ]
});

/// Performance diagram: outcome quality on both sides of the ball.
pub static PERFORMANCE_METRICS: Lazy<Vec<MetricDef>> = Lazy::new(|| {
    vec![
        MetricDef::new("buildup_efficiency", "Build-up Efficiency %"),
        MetricDef::new("finishing_efficiency", "Finishing Efficiency %"),
        MetricDef::new("xg_for_open_play", "xG For (Open Play)"),
        MetricDef::new("goals_for", "Goals For"),
        MetricDef::new("containment_efficiency", "Containment Efficiency %"),
        MetricDef::new("prevention_efficiency", "Prevention Efficiency %"),
        MetricDef::new("xg_against_open_play", "xG Against (Open Play)"),
        MetricDef::new("goals_against", "Goals Against"),
        MetricDef::new("aerial_duel_pct", "Aerial Duels %"),
        MetricDef::new("set_piece_goals_for", "Set-Piece Goals For"),
        MetricDef::new("set_piece_xg_for", "Set-Piece xG For"),
        MetricDef::new("set_piece_goals_against", "Set-Piece Goals Against"),
        MetricDef::new("set_piece_xg_against", "Set-Piece xG Against"),
    ]
});

/// Physical output per match. These columns live in the optional physical
/// table and carry no rank columns, so they only feed the trend chart.
pub static PHYSICAL_METRICS: Lazy<Vec<MetricDef>> = Lazy::new(|| {
    vec![
        MetricDef::new("total_distance_km", "Total Distance (km)"),
        MetricDef::new("high_speed_distance_m", "High-Speed Distance (m)"),
        MetricDef::new("sprint_count", "Sprints"),
        MetricDef::new("top_speed_kmh", "Top Speed (km/h)"),
    ]
});
