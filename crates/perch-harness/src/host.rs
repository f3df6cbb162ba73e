//! Recording window host.
//!
//! Every outbound call the coordinator makes is journaled as a
//! serializable record, so scenario tests assert on the exact call
//! sequence (and can dump a JSONL trace when a regression needs eyes).

use serde::{Deserialize, Serialize};

use perch_geometry::{ModelRect, ViewPoint};
use perch_runtime::WindowHost;

/// One outbound host call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum HostCall {
    Resize { width: f64, height: f64 },
    Passthrough { enabled: bool },
}

/// Scriptable host that journals everything the coordinator sends it.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
    cursor: Option<ViewPoint>,
    window: Option<ModelRect>,
    work_area: Option<ModelRect>,
    /// When set, passthrough changes are reported as rejected.
    refuse_passthrough: bool,
}

impl RecordingHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Park the polled cursor at a desktop point (`None` = query fails).
    pub fn set_cursor(&mut self, point: Option<ViewPoint>) {
        self.cursor = point;
    }

    pub fn set_window(&mut self, bounds: Option<ModelRect>) {
        self.window = bounds;
    }

    pub fn set_work_area(&mut self, area: Option<ModelRect>) {
        self.work_area = area;
    }

    pub fn set_refuse_passthrough(&mut self, refuse: bool) {
        self.refuse_passthrough = refuse;
    }

    /// The full outbound journal, in call order.
    #[must_use]
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    #[must_use]
    pub fn resize_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HostCall::Resize { .. }))
            .count()
    }

    /// The passthrough booleans pushed, in order.
    #[must_use]
    pub fn passthrough_pushes(&self) -> Vec<bool> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Passthrough { enabled } => Some(*enabled),
                _ => None,
            })
            .collect()
    }

    /// The journal as JSONL, one call per line.
    #[must_use]
    pub fn journal(&self) -> String {
        self.calls
            .iter()
            .filter_map(|c| serde_json::to_string(c).ok())
            .map(|line| line + "\n")
            .collect()
    }
}

impl WindowHost for RecordingHost {
    fn request_resize(&mut self, width: f64, height: f64) {
        self.calls.push(HostCall::Resize { width, height });
    }

    fn cursor_screen_point(&mut self) -> Option<ViewPoint> {
        self.cursor
    }

    fn window_bounds(&mut self) -> Option<ModelRect> {
        self.window
    }

    fn set_mouse_passthrough(&mut self, enabled: bool) -> bool {
        self.calls.push(HostCall::Passthrough { enabled });
        !self.refuse_passthrough
    }

    fn screen_work_area(&mut self) -> Option<ModelRect> {
        self.work_area
    }
}
