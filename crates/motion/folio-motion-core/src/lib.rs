//! Folio Motion Core (host-agnostic)
//!
//! Scroll-triggered animation primitives for the portfolio page: easing
//! curves, typed property values, animation steps compiled into timelines,
//! scroll intersection triggers, hover bindings, a deterministic timer queue,
//! and the explicit `MotionContext` that owns all of them per page.
//! Hosts feed `Inputs` each frame and apply the returned `Outputs`.

pub mod binding;
pub mod config;
pub mod context;
pub mod ease;
pub mod error;
pub mod ids;
pub mod inputs;
pub mod outputs;
pub mod step;
pub mod timeline;
pub mod timer;
pub mod trigger;
pub mod value;

// Re-exports for consumers (page runtime, adapters)
pub use binding::{ElementRegistry, IdentityResolver, MapResolver, TargetHandle, TargetResolver};
pub use config::MotionConfig;
pub use context::{HoverSpec, MotionContext, Subscription};
pub use ease::{EaseDir, Easing};
pub use error::MotionError;
pub use ids::{ElementId, HoverId, IdAllocator, RunId, ScopeId, TimerId, TriggerId};
pub use inputs::{Inputs, LayoutUpdate, PointerEvent, PointerKind, Rect, ScrollState};
pub use outputs::{Change, MotionEvent, Outputs};
pub use step::{AnimationStep, Position};
pub use timeline::{
    Direction, PlayState, Playhead, PlayheadEvent, Repeat, Timeline, TimelineBuilder, Track,
};
pub use timer::{Fired, Timers, MIN_INTERVAL_MS};
pub use trigger::{
    Anchor, ReplayPolicy, ScrollTrigger, Threshold, ToggleAction, ToggleActions, TriggerEvent,
    TriggerEventKind, TriggerSpec, Zone,
};
pub use value::{Prop, PropSet, Value};

pub type Result<T> = std::result::Result<T, MotionError>;
