//! Input contracts for the motion context.
//!
//! Hosts (the wasm adapter, tests) build one `Inputs` per frame and pass it to
//! `MotionContext::update()`. Elements are addressed by their stable keys.

use serde::{Deserialize, Serialize};

/// Document-relative layout box of an element.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Distance from the document top in px.
    pub top: f64,
    pub height: f32,
    /// Scrollable width for strips, layout width otherwise.
    #[serde(default)]
    pub width: f32,
}

impl Rect {
    pub fn new(top: f64, height: f32, width: f32) -> Self {
        Self { top, height, width }
    }
}

/// Window scroll position and viewport size.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollState {
    pub scroll_y: f64,
    pub viewport_height: f32,
    pub viewport_width: f32,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            scroll_y: 0.0,
            viewport_height: 900.0,
            viewport_width: 1440.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LayoutUpdate {
    pub key: String,
    pub rect: Rect,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PointerKind {
    Enter,
    Leave,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PointerEvent {
    pub key: String,
    pub kind: PointerKind,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Inputs {
    /// Latest scroll/viewport state, if it changed this frame.
    #[serde(default)]
    pub scroll: Option<ScrollState>,
    /// Element rects measured by the host.
    #[serde(default)]
    pub layout: Vec<LayoutUpdate>,
    /// Pointer enter/leave notifications, in arrival order.
    #[serde(default)]
    pub pointer: Vec<PointerEvent>,
}

impl Inputs {
    pub fn scroll_to(scroll_y: f64, viewport_height: f32, viewport_width: f32) -> Self {
        Self {
            scroll: Some(ScrollState {
                scroll_y,
                viewport_height,
                viewport_width,
            }),
            ..Self::default()
        }
    }

    pub fn with_layout(mut self, key: impl Into<String>, rect: Rect) -> Self {
        self.layout.push(LayoutUpdate {
            key: key.into(),
            rect,
        });
        self
    }

    pub fn with_pointer(mut self, key: impl Into<String>, kind: PointerKind) -> Self {
        self.pointer.push(PointerEvent {
            key: key.into(),
            kind,
        });
        self
    }
}
