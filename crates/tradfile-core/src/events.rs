//! Drag-drop events delivered by the windowing shell

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Phase of a drag-drop gesture. Only [`DragDropKind::Drop`] admits files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragDropKind {
    Enter,
    Over,
    Drop,
    Leave,
}

impl DragDropKind {
    /// Parse the lowercase wire name (`enter`, `over`, `drop`, `leave`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "enter" => Some(Self::Enter),
            "over" => Some(Self::Over),
            "drop" => Some(Self::Drop),
            "leave" => Some(Self::Leave),
            _ => None,
        }
    }
}

/// A single drag-drop notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragDropEvent {
    pub kind: DragDropKind,
    pub position: Point,
    #[serde(default)]
    pub paths: Vec<PathBuf>,
}

impl DragDropEvent {
    pub fn drop_at(x: f64, y: f64, paths: Vec<PathBuf>) -> Self {
        Self {
            kind: DragDropKind::Drop,
            position: Point::new(x, y),
            paths,
        }
    }

    pub fn is_drop(&self) -> bool {
        self.kind == DragDropKind::Drop
    }
}
