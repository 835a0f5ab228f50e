// src/macros.rs — Recorded input-macro file format
//
// Companion utility format: an ordered JSON array of mouse/keyboard actions,
// each stamped with seconds since recording start. Replay waits the delta
// between consecutive stamps before issuing each action. Only the format and
// schedule live here; OS-level input injection is a separate tool.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MacroAction {
    Click {
        x: i32,
        y: i32,
        button: MouseButton,
        interval: f64,
    },
    Drag {
        start_x: i32,
        start_y: i32,
        end_x: i32,
        end_y: i32,
        button: MouseButton,
        interval: f64,
    },
    Key {
        key: String,
        interval: f64,
    },
}

impl MacroAction {
    pub fn interval(&self) -> f64 {
        match self {
            MacroAction::Click { interval, .. }
            | MacroAction::Drag { interval, .. }
            | MacroAction::Key { interval, .. } => *interval,
        }
    }
}

pub fn load_macro(path: &Path) -> anyhow::Result<Vec<MacroAction>> {
    let content = std::fs::read_to_string(path)?;
    let actions: Vec<MacroAction> = serde_json::from_str(&content)?;
    for (i, action) in actions.iter().enumerate() {
        if action.interval() < 0.0 {
            anyhow::bail!("action {i} has a negative interval");
        }
    }
    Ok(actions)
}

/// Wait before each action: the delta between consecutive interval stamps,
/// clamped at zero so a non-monotonic recording never blocks replay.
pub fn replay_schedule(actions: &[MacroAction]) -> Vec<Duration> {
    let mut last = 0.0f64;
    actions
        .iter()
        .map(|a| {
            let wait = (a.interval() - last).max(0.0);
            last = a.interval();
            Duration::from_secs_f64(wait)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"[
        {"type": "click", "x": 10, "y": 20, "button": "left", "interval": 0.0},
        {"type": "drag", "start_x": 10, "start_y": 20, "end_x": 50, "end_y": 60, "button": "left", "interval": 1.5},
        {"type": "key", "key": "enter", "interval": 2.0}
    ]"#;

    #[test]
    fn test_parse_sample_recording() {
        let actions: Vec<MacroAction> = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(actions.len(), 3);
        assert_eq!(
            actions[0],
            MacroAction::Click {
                x: 10,
                y: 20,
                button: MouseButton::Left,
                interval: 0.0
            }
        );
        assert!(matches!(actions[1], MacroAction::Drag { end_x: 50, .. }));
    }

    #[test]
    fn test_schedule_is_deltas() {
        let actions: Vec<MacroAction> = serde_json::from_str(SAMPLE).unwrap();
        let schedule = replay_schedule(&actions);
        assert_eq!(
            schedule,
            vec![
                Duration::from_secs_f64(0.0),
                Duration::from_secs_f64(1.5),
                Duration::from_secs_f64(0.5),
            ]
        );
    }

    #[test]
    fn test_schedule_clamps_backwards_stamps() {
        let json = r#"[
            {"type": "key", "key": "a", "interval": 2.0},
            {"type": "key", "key": "b", "interval": 1.0}
        ]"#;
        let actions: Vec<MacroAction> = serde_json::from_str(json).unwrap();
        let schedule = replay_schedule(&actions);
        assert_eq!(schedule[1], Duration::ZERO);
    }

    #[test]
    fn test_load_rejects_negative_interval() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clicks.json");
        std::fs::write(
            &path,
            r#"[{"type": "key", "key": "a", "interval": -1.0}]"#,
        )
        .unwrap();
        assert!(load_macro(&path).is_err());
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clicks.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(load_macro(&path).is_err());
    }

    #[test]
    fn test_roundtrip() {
        let actions: Vec<MacroAction> = serde_json::from_str(SAMPLE).unwrap();
        let json = serde_json::to_string(&actions).unwrap();
        let back: Vec<MacroAction> = serde_json::from_str(&json).unwrap();
        assert_eq!(actions, back);
    }
}
