//! Output contracts from the motion context.
//!
//! Outputs carry only the property values that changed this frame, keyed by
//! the host's target handle, and a separate list of semantic events.
//! Adapters apply changes to the host and forward events.

use serde::{Deserialize, Serialize};

use crate::ids::{ElementId, RunId, ScopeId, TriggerId};
use crate::trigger::{ToggleAction, TriggerEvent};
use crate::value::{Prop, Value};

/// One changed property value this frame.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Change {
    pub element: ElementId,
    /// TargetHandle resolved for the element
    pub key: String,
    pub prop: Prop,
    pub value: Value,
}

/// Discrete semantic signals emitted during stepping.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub enum MotionEvent {
    TriggerFired {
        trigger: TriggerId,
        event: TriggerEvent,
    },
    /// A toggle or hover action was applied to a timeline run.
    ActionApplied {
        run: RunId,
        action: ToggleAction,
    },
    TimelineCompleted {
        run: RunId,
    },
    TimelineRewound {
        run: RunId,
    },
    TimelineRepeated {
        run: RunId,
        iteration: u32,
    },
    ScopeReleased {
        scope: ScopeId,
    },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub events: Vec<MotionEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: Change) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_event(&mut self, event: MotionEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }

    /// Changes addressed to one element.
    pub fn changes_for(&self, element: ElementId) -> impl Iterator<Item = &Change> {
        self.changes.iter().filter(move |c| c.element == element)
    }

    /// Last value written to (element, prop) this frame.
    pub fn value_of(&self, element: ElementId, prop: Prop) -> Option<&Value> {
        self.changes
            .iter()
            .rev()
            .find(|c| c.element == element && c.prop == prop)
            .map(|c| &c.value)
    }
}
