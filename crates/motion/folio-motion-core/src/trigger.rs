//! Scroll intersection triggers.
//!
//! A trigger watches one element against two threshold lines and reports
//! enter/leave transitions tagged with scroll direction. The zone model
//! (`Before`/`Active`/`After`) makes duplicate "entered" events impossible.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MotionError;
use crate::inputs::{Rect, ScrollState};
use crate::timeline::Direction;

/// A point on the element or on the viewport, measured from its top edge.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Anchor {
    /// Fraction of the height: `top` = 0, `center` = 0.5, `bottom` = 1, `70%` = 0.7
    Fraction(f32),
    Px(f32),
}

impl Anchor {
    #[inline]
    fn offset(self, height: f32) -> f64 {
        match self {
            Anchor::Fraction(f) => (height * f) as f64,
            Anchor::Px(p) => p as f64,
        }
    }
}

impl FromStr for Anchor {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" | "left" => return Ok(Anchor::Fraction(0.0)),
            "center" => return Ok(Anchor::Fraction(0.5)),
            "bottom" | "right" => return Ok(Anchor::Fraction(1.0)),
            _ => {}
        }
        if let Some(pct) = s.strip_suffix('%') {
            let v: f32 = pct
                .parse()
                .map_err(|_| MotionError::threshold(s, "bad percentage"))?;
            return Ok(Anchor::Fraction(v / 100.0));
        }
        let px = s.strip_suffix("px").unwrap_or(s);
        px.parse()
            .map(Anchor::Px)
            .map_err(|_| MotionError::threshold(s, "expected keyword, percentage or px"))
    }
}

/// Scroll position where an element anchor meets a viewport line.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Threshold {
    Line { element: Anchor, viewport: Anchor },
    /// Only valid as an end threshold: px past the start position (`+=1200`).
    AfterStart(f32),
}

impl Threshold {
    pub fn line(element: Anchor, viewport: Anchor) -> Self {
        Threshold::Line { element, viewport }
    }
}

impl FromStr for Threshold {
    type Err = MotionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let s = input.trim();
        if let Some(rel) = s.strip_prefix("+=") {
            let px = rel.trim().strip_suffix("px").unwrap_or(rel.trim());
            return px
                .parse()
                .map(Threshold::AfterStart)
                .map_err(|_| MotionError::threshold(input, "bad relative offset"));
        }
        let mut parts = s.split_whitespace();
        let (Some(el), Some(vp), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(MotionError::threshold(
                input,
                "expected '<element> <viewport>'",
            ));
        };
        Ok(Threshold::Line {
            element: el.parse()?,
            viewport: vp.parse()?,
        })
    }
}

fn anchor_name(a: Anchor) -> String {
    match a {
        Anchor::Fraction(f) if f == 0.0 => "top".into(),
        Anchor::Fraction(f) if f == 0.5 => "center".into(),
        Anchor::Fraction(f) if f == 1.0 => "bottom".into(),
        Anchor::Fraction(f) => format!("{}%", f * 100.0),
        Anchor::Px(p) => format!("{p}px"),
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Line { element, viewport } => {
                write!(f, "{} {}", anchor_name(*element), anchor_name(*viewport))
            }
            Threshold::AfterStart(px) => write!(f, "+={px}"),
        }
    }
}

impl TryFrom<String> for Threshold {
    type Error = MotionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Threshold> for String {
    fn from(value: Threshold) -> Self {
        value.to_string()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToggleAction {
    Play,
    Pause,
    Resume,
    Reverse,
    Restart,
    Reset,
    Complete,
    None,
}

impl FromStr for ToggleAction {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "play" => ToggleAction::Play,
            "pause" => ToggleAction::Pause,
            "resume" => ToggleAction::Resume,
            "reverse" => ToggleAction::Reverse,
            "restart" => ToggleAction::Restart,
            "reset" => ToggleAction::Reset,
            "complete" => ToggleAction::Complete,
            "none" => ToggleAction::None,
            other => {
                return Err(MotionError::InvalidToggleActions {
                    input: other.to_string(),
                    reason: "unknown action".into(),
                })
            }
        })
    }
}

/// Actions for onEnter, onLeave, onEnterBack, onLeaveBack.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleActions(pub [ToggleAction; 4]);

impl ToggleActions {
    pub fn for_event(&self, event: TriggerEvent) -> ToggleAction {
        self.0[event.slot()]
    }
}

impl Default for ToggleActions {
    fn default() -> Self {
        ToggleActions([
            ToggleAction::Play,
            ToggleAction::None,
            ToggleAction::None,
            ToggleAction::None,
        ])
    }
}

impl FromStr for ToggleActions {
    type Err = MotionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let actions: Vec<ToggleAction> = input
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<_, _>>()?;
        let slots: [ToggleAction; 4] =
            actions
                .try_into()
                .map_err(|_| MotionError::InvalidToggleActions {
                    input: input.to_string(),
                    reason: "expected four actions".into(),
                })?;
        Ok(ToggleActions(slots))
    }
}

/// What happens when the viewport leaves the region again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReplayPolicy {
    /// Play on first entry; the trigger retires afterwards.
    Once,
    /// Play on entry, reverse when scrolling back above the start.
    Reverse,
}

impl ReplayPolicy {
    pub fn actions(self) -> ToggleActions {
        match self {
            ReplayPolicy::Once => ToggleActions::default(),
            ReplayPolicy::Reverse => ToggleActions([
                ToggleAction::Play,
                ToggleAction::None,
                ToggleAction::None,
                ToggleAction::Reverse,
            ]),
        }
    }
}

/// Static description of a trigger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerSpec {
    pub start: Threshold,
    pub end: Threshold,
    pub actions: ToggleActions,
    /// Retire after the first forward entry.
    #[serde(default)]
    pub once: bool,
}

impl TriggerSpec {
    /// `start`/`end` in threshold grammar, e.g. `("top 70%", "bottom 30%")`.
    pub fn new(start: &str, end: &str, policy: ReplayPolicy) -> Result<Self, MotionError> {
        Ok(Self {
            start: start.parse()?,
            end: end.parse()?,
            actions: policy.actions(),
            once: policy == ReplayPolicy::Once,
        })
    }

    pub fn with_actions(mut self, actions: ToggleActions) -> Self {
        self.actions = actions;
        self
    }

    /// Scroll positions (start, end) for an element rect under a viewport.
    pub fn positions(&self, rect: &Rect, viewport: &ScrollState) -> (f64, f64) {
        let vh = viewport.viewport_height;
        let line = |th: &Threshold| match th {
            Threshold::Line {
                element,
                viewport: line_at,
            } => rect.top + element.offset(rect.height) - line_at.offset(vh),
            Threshold::AfterStart(px) => rect.top + *px as f64,
        };
        let start = line(&self.start);
        let end = match self.end {
            Threshold::AfterStart(px) => start + px as f64,
            ref other => line(other),
        };
        (start, end)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerEventKind {
    Enter,
    Leave,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEvent {
    pub kind: TriggerEventKind,
    pub direction: Direction,
}

impl TriggerEvent {
    const fn new(kind: TriggerEventKind, direction: Direction) -> Self {
        Self { kind, direction }
    }

    /// Index into [`ToggleActions`].
    fn slot(self) -> usize {
        match (self.kind, self.direction) {
            (TriggerEventKind::Enter, Direction::Forward) => 0,
            (TriggerEventKind::Leave, Direction::Forward) => 1,
            (TriggerEventKind::Enter, Direction::Reverse) => 2,
            (TriggerEventKind::Leave, Direction::Reverse) => 3,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Zone {
    Before,
    Active,
    After,
}

/// Runtime state of one trigger.
#[derive(Clone, Debug)]
pub struct ScrollTrigger {
    spec: TriggerSpec,
    zone: Option<Zone>,
    retired: bool,
}

const ENTER: TriggerEvent = TriggerEvent::new(TriggerEventKind::Enter, Direction::Forward);
const LEAVE: TriggerEvent = TriggerEvent::new(TriggerEventKind::Leave, Direction::Forward);
const ENTER_BACK: TriggerEvent = TriggerEvent::new(TriggerEventKind::Enter, Direction::Reverse);
const LEAVE_BACK: TriggerEvent = TriggerEvent::new(TriggerEventKind::Leave, Direction::Reverse);

impl ScrollTrigger {
    pub fn new(spec: TriggerSpec) -> Self {
        Self {
            spec,
            zone: None,
            retired: false,
        }
    }

    pub fn spec(&self) -> &TriggerSpec {
        &self.spec
    }

    pub fn zone(&self) -> Option<Zone> {
        self.zone
    }

    pub fn is_retired(&self) -> bool {
        self.retired
    }

    pub fn retire(&mut self) {
        self.retired = true;
    }

    fn classify(scroll: f64, start: f64, end: f64) -> Zone {
        if scroll < start {
            Zone::Before
        } else if scroll < end {
            Zone::Active
        } else {
            Zone::After
        }
    }

    /// 0 before the start line, 1 past the end line.
    pub fn progress(&self, rect: &Rect, viewport: &ScrollState) -> f32 {
        let (start, end) = self.spec.positions(rect, viewport);
        if end <= start {
            return if viewport.scroll_y >= start { 1.0 } else { 0.0 };
        }
        ((viewport.scroll_y - start) / (end - start)).clamp(0.0, 1.0) as f32
    }

    /// Re-evaluate against the latest scroll state, returning the events to
    /// dispatch in order. A retired trigger reports nothing.
    pub fn update(&mut self, rect: &Rect, viewport: &ScrollState) -> Vec<TriggerEvent> {
        if self.retired {
            return Vec::new();
        }
        let (start, end) = self.spec.positions(rect, viewport);
        let next = Self::classify(viewport.scroll_y, start, end);
        let prev = self.zone.unwrap_or(Zone::Before);
        self.zone = Some(next);

        let events = match (prev, next) {
            (Zone::Before, Zone::Active) => vec![ENTER],
            (Zone::Active, Zone::After) => vec![LEAVE],
            (Zone::After, Zone::Active) => vec![ENTER_BACK],
            (Zone::Active, Zone::Before) => vec![LEAVE_BACK],
            (Zone::Before, Zone::After) => vec![ENTER, LEAVE],
            (Zone::After, Zone::Before) => vec![ENTER_BACK, LEAVE_BACK],
            _ => Vec::new(),
        };
        if !events.is_empty() {
            debug!(?prev, ?next, start, end, scroll = viewport.scroll_y, "trigger zone change");
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp(scroll_y: f64) -> ScrollState {
        ScrollState {
            scroll_y,
            viewport_height: 1000.0,
            viewport_width: 1280.0,
        }
    }

    #[test]
    fn parse_thresholds() {
        assert_eq!(
            "top 70%".parse::<Threshold>().unwrap(),
            Threshold::line(Anchor::Fraction(0.0), Anchor::Fraction(0.7))
        );
        assert_eq!(
            "top bottom".parse::<Threshold>().unwrap(),
            Threshold::line(Anchor::Fraction(0.0), Anchor::Fraction(1.0))
        );
        assert_eq!(
            "+=1200".parse::<Threshold>().unwrap(),
            Threshold::AfterStart(1200.0)
        );
        assert_eq!(
            "center 100px".parse::<Threshold>().unwrap(),
            Threshold::line(Anchor::Fraction(0.5), Anchor::Px(100.0))
        );
        assert!("top".parse::<Threshold>().is_err());
        assert!("top 70% extra".parse::<Threshold>().is_err());
        assert!("middle 70%".parse::<Threshold>().is_err());
    }

    #[test]
    fn parse_toggle_actions() {
        let a: ToggleActions = "play none none reverse".parse().unwrap();
        assert_eq!(a, ReplayPolicy::Reverse.actions());
        assert!("play none".parse::<ToggleActions>().is_err());
        assert!("play none none rewind".parse::<ToggleActions>().is_err());
    }

    #[test]
    fn positions_from_rect() {
        let spec = TriggerSpec::new("top 70%", "bottom 30%", ReplayPolicy::Reverse).unwrap();
        let rect = Rect::new(2000.0, 800.0, 1280.0);
        let (s, e) = spec.positions(&rect, &vp(0.0));
        assert!((s - 1300.0).abs() < 1e-6);
        assert!((e - 2500.0).abs() < 1e-6);

        let rel = TriggerSpec::new("top bottom", "+=1500", ReplayPolicy::Reverse).unwrap();
        let (s, e) = rel.positions(&rect, &vp(0.0));
        assert!((s - 1000.0).abs() < 1e-6);
        assert!((e - 2500.0).abs() < 1e-6);
    }

    #[test]
    fn jump_over_band_reports_both() {
        let spec = TriggerSpec::new("top 70%", "bottom 30%", ReplayPolicy::Reverse).unwrap();
        let mut trig = ScrollTrigger::new(spec);
        let rect = Rect::new(2000.0, 800.0, 1280.0);
        assert!(trig.update(&rect, &vp(0.0)).is_empty());
        assert_eq!(trig.update(&rect, &vp(5000.0)), vec![ENTER, LEAVE]);
        assert_eq!(trig.update(&rect, &vp(0.0)), vec![ENTER_BACK, LEAVE_BACK]);
    }
}
