//! Animation steps: the immutable building blocks of a timeline.

use serde::{Deserialize, Serialize};

use crate::ease::Easing;
use crate::ids::ElementId;
use crate::value::{Prop, PropSet, Value};

/// Where a step starts relative to the timeline built so far.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum Position {
    /// At the current end of the timeline.
    #[default]
    After,
    /// Relative to the current end; negative values overlap (`"-=0.5"`).
    Offset(f64),
    /// Same start as the previous step (`"<"`).
    WithPrevious,
    /// Absolute time in ms from the timeline start.
    At(f64),
}

/// One transition applied to one or more targets.
///
/// `from == None` makes this a "to" step: the start value is whatever the
/// element shows when the step begins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationStep {
    pub targets: Vec<ElementId>,
    #[serde(default)]
    pub from: Option<PropSet>,
    pub to: PropSet,
    pub duration_ms: f64,
    #[serde(default)]
    pub ease: Easing,
    /// Delay between consecutive targets' start times.
    #[serde(default)]
    pub stagger_ms: f64,
    /// Extra delay added to this step's start.
    #[serde(default)]
    pub delay_ms: f64,
    #[serde(default)]
    pub position: Position,
}

impl AnimationStep {
    /// A `fromTo` step.
    pub fn from_to(
        targets: impl IntoIterator<Item = ElementId>,
        from: PropSet,
        to: PropSet,
        duration_ms: f64,
    ) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            from: Some(from),
            to,
            duration_ms: duration_ms.max(0.0),
            ease: Easing::default(),
            stagger_ms: 0.0,
            delay_ms: 0.0,
            position: Position::After,
        }
    }

    /// A `to` step starting from the current rendered values.
    pub fn to(targets: impl IntoIterator<Item = ElementId>, to: PropSet, duration_ms: f64) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            from: None,
            to,
            duration_ms: duration_ms.max(0.0),
            ease: Easing::default(),
            stagger_ms: 0.0,
            delay_ms: 0.0,
            position: Position::After,
        }
    }

    /// Instant property write (`gsap.set`).
    pub fn set(targets: impl IntoIterator<Item = ElementId>, prop: Prop, value: Value) -> Self {
        Self::to(targets, PropSet::new().with(prop, value), 0.0)
    }

    pub fn ease(mut self, ease: Easing) -> Self {
        self.ease = ease;
        self
    }

    pub fn stagger(mut self, stagger_ms: f64) -> Self {
        self.stagger_ms = stagger_ms.max(0.0);
        self
    }

    pub fn delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms.max(0.0);
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Base duration plus the stagger spread across all targets.
    pub fn total_duration(&self) -> f64 {
        let spread = self.targets.len().saturating_sub(1) as f64 * self.stagger_ms;
        self.duration_ms + spread
    }
}
