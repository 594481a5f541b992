//! Animatable properties and their typed values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MotionError;

/// Visual properties a step may drive on an element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Prop {
    Opacity,
    /// Horizontal translation in px
    X,
    /// Vertical translation in px
    Y,
    Scale,
    /// Gaussian blur radius in px
    Blur,
    /// Rotation in degrees
    Rotation,
    Color,
    /// Text content of the element
    Text,
}

impl Prop {
    /// Value an element is assumed to have before anything rendered it.
    pub fn default_value(self) -> Value {
        match self {
            Prop::Opacity | Prop::Scale => Value::Float(1.0),
            Prop::X | Prop::Y | Prop::Blur | Prop::Rotation => Value::Float(0.0),
            Prop::Color => Value::Keyword("currentColor".into()),
            Prop::Text => Value::Text(String::new()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Prop::Opacity => "opacity",
            Prop::X => "x",
            Prop::Y => "y",
            Prop::Scale => "scale",
            Prop::Blur => "blur",
            Prop::Rotation => "rotation",
            Prop::Color => "color",
            Prop::Text => "text",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    Float(f32),
    /// RGBA, each channel in [0,1]
    Color([f32; 4]),
    /// Step-only CSS keyword (e.g. `currentColor`)
    Keyword(String),
    /// Step-only text content
    Text(String),
}

impl Value {
    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn hex_color(input: &str) -> Result<Value, MotionError> {
        let bad = || MotionError::InvalidColor {
            input: input.to_string(),
        };
        let hex = input.strip_prefix('#').ok_or_else(bad)?;
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => hex.to_string(),
            _ => return Err(bad()),
        };
        let mut rgba = [1.0f32; 4];
        for (i, chunk) in expanded.as_bytes().chunks(2).enumerate() {
            let s = std::str::from_utf8(chunk).map_err(|_| bad())?;
            let byte = u8::from_str_radix(s, 16).map_err(|_| bad())?;
            rgba[i] = byte as f32 / 255.0;
        }
        Ok(Value::Color(rgba))
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Interpolate towards `to` at eased progress `t`.
    /// Step-only kinds and mismatched kinds switch at t >= 1.
    pub fn lerp(&self, to: &Value, t: f32) -> Value {
        match (self, to) {
            (Value::Float(a), Value::Float(b)) => Value::Float(a + (b - a) * t),
            (Value::Color(a), Value::Color(b)) => Value::Color([
                a[0] + (b[0] - a[0]) * t,
                a[1] + (b[1] - a[1]) * t,
                a[2] + (b[2] - a[2]) * t,
                a[3] + (b[3] - a[3]) * t,
            ]),
            _ => {
                if t >= 1.0 {
                    to.clone()
                } else {
                    self.clone()
                }
            }
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v as f32)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(v) => write!(f, "{v}"),
            Value::Color(c) => write!(
                f,
                "rgba({}, {}, {}, {})",
                (c[0] * 255.0).round() as u8,
                (c[1] * 255.0).round() as u8,
                (c[2] * 255.0).round() as u8,
                c[3]
            ),
            Value::Keyword(k) => f.write_str(k),
            Value::Text(t) => f.write_str(t),
        }
    }
}

/// Ordered property/value pairs for one end of a transition.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PropSet(pub Vec<(Prop, Value)>);

impl PropSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a property.
    pub fn with(mut self, prop: Prop, value: impl Into<Value>) -> Self {
        self.set(prop, value.into());
        self
    }

    pub fn set(&mut self, prop: Prop, value: Value) {
        if let Some(slot) = self.0.iter_mut().find(|(p, _)| *p == prop) {
            slot.1 = value;
        } else {
            self.0.push((prop, value));
        }
    }

    pub fn get(&self, prop: Prop) -> Option<&Value> {
        self.0.iter().find(|(p, _)| *p == prop).map(|(_, v)| v)
    }

    pub fn props(&self) -> impl Iterator<Item = Prop> + '_ {
        self.0.iter().map(|(p, _)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Prop, Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for Prop {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "opacity" => Prop::Opacity,
            "x" => Prop::X,
            "y" => Prop::Y,
            "scale" => Prop::Scale,
            "blur" | "filter" => Prop::Blur,
            "rotation" => Prop::Rotation,
            "color" => Prop::Color,
            "text" | "textContent" => Prop::Text,
            other => {
                return Err(MotionError::InvalidConfig {
                    reason: format!("unknown property '{other}'"),
                })
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(
            Value::hex_color("#ff006e").unwrap(),
            Value::Color([1.0, 0.0, 110.0 / 255.0, 1.0])
        );
        assert_eq!(
            Value::hex_color("#fff").unwrap(),
            Value::Color([1.0, 1.0, 1.0, 1.0])
        );
        assert!(Value::hex_color("ff006e").is_err());
        assert!(Value::hex_color("#ff00").is_err());
        assert!(Value::hex_color("#gg0000").is_err());
    }

    #[test]
    fn step_only_values_switch_at_end() {
        let a = Value::Text("Hello".into());
        let b = Value::Text("Hola".into());
        assert_eq!(a.lerp(&b, 0.99), a);
        assert_eq!(a.lerp(&b, 1.0), b);

        let c = Value::hex_color("#ff006e").unwrap();
        let k = Value::Keyword("currentColor".into());
        assert_eq!(c.lerp(&k, 0.5), c);
    }

    #[test]
    fn propset_replaces_in_place() {
        let set = PropSet::new()
            .with(Prop::Opacity, 0.0)
            .with(Prop::Y, 30.0)
            .with(Prop::Opacity, 0.5);
        assert_eq!(set.0.len(), 2);
        assert_eq!(set.get(Prop::Opacity), Some(&Value::Float(0.5)));
        assert_eq!(set.props().collect::<Vec<_>>(), vec![Prop::Opacity, Prop::Y]);
    }
}
