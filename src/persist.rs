use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::metrics::DiagramKind;
use crate::state::{AppState, Screen};

const CACHE_DIR: &str = "segunda_rankings";
const CACHE_FILE: &str = "ui_state.json";
const CACHE_VERSION: u32 = 1;

/// Last UI position, restored on the next launch. Best-effort: a missing,
/// unreadable or version-mismatched file is silently ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct UiCache {
    version: u32,
    #[serde(default)]
    selected_team: Option<String>,
    #[serde(default)]
    diagram: Option<String>,
    #[serde(default)]
    screen: Option<String>,
    #[serde(default)]
    trend_metric: Option<String>,
}

pub fn load_into_state(state: &mut AppState) {
    let Some(path) = cache_path() else {
        return;
    };
    let Ok(raw) = fs::read_to_string(&path) else {
        return;
    };
    let Ok(cache) = serde_json::from_str::<UiCache>(&raw) else {
        return;
    };
    if cache.version != CACHE_VERSION {
        return;
    }

    if let Some(diagram) = cache.diagram.as_deref().and_then(parse_diagram) {
        state.diagram = diagram;
    }
    if let Some(screen) = cache.screen.as_deref().and_then(parse_screen) {
        state.screen = screen;
    }
    if let Some(team) = cache.selected_team.as_deref() {
        state.select_team_by_name(team);
    }
    if let Some(column) = cache.trend_metric.as_deref() {
        if let Some(idx) = state
            .trend_catalog()
            .iter()
            .position(|m| m.column == column)
        {
            state.trend_metric = idx;
        }
    }
}

pub fn save_from_state(state: &AppState) {
    let Some(path) = cache_path() else {
        return;
    };
    let Some(dir) = path.parent() else {
        return;
    };
    let _ = fs::create_dir_all(dir);

    let cache = UiCache {
        version: CACHE_VERSION,
        selected_team: state.selected_team_name(),
        diagram: Some(diagram_key(state.diagram).to_string()),
        screen: Some(screen_key(state.screen).to_string()),
        trend_metric: state
            .current_trend_metric()
            .map(|m| m.column.clone()),
    };

    if let Ok(json) = serde_json::to_string(&cache) {
        let tmp = path.with_extension("json.tmp");
        if fs::write(&tmp, json).is_ok() {
            let _ = fs::rename(&tmp, &path);
        }
    }
}

fn cache_path() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(CACHE_FILE),
    )
}

fn diagram_key(kind: DiagramKind) -> &'static str {
    match kind {
        DiagramKind::Style => "style",
        DiagramKind::Performance => "performance",
    }
}

fn parse_diagram(raw: &str) -> Option<DiagramKind> {
    match raw {
        "style" => Some(DiagramKind::Style),
        "performance" => Some(DiagramKind::Performance),
        _ => None,
    }
}

fn screen_key(screen: Screen) -> &'static str {
    match screen {
        Screen::Rankings => "rankings",
        Screen::Trend => "trend",
    }
}

fn parse_screen(raw: &str) -> Option<Screen> {
    match raw {
        "rankings" => Some(Screen::Rankings),
        "trend" => Some(Screen::Trend),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagram_and_screen_keys_round_trip() {
        for kind in [DiagramKind::Style, DiagramKind::Performance] {
            assert_eq!(parse_diagram(diagram_key(kind)), Some(kind));
        }
        for screen in [Screen::Rankings, Screen::Trend] {
            assert_eq!(parse_screen(screen_key(screen)), Some(screen));
        }
        assert_eq!(parse_diagram("nope"), None);
    }
}
