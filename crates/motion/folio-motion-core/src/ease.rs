//! Easing curves.
//!
//! Names follow the GSAP vocabulary used by the page (`power2.out`,
//! `back.out(1.4)`, `none`), plus CSS-style `cubic-bezier(x1,y1,x2,y2)`.
//! Every curve maps 0 → 0 and 1 → 1; `back` overshoots in between.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MotionError;

const DEFAULT_OVERSHOOT: f32 = 1.70158;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EaseDir {
    In,
    Out,
    InOut,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    Linear,
    /// `power0..power4`; exponent is `power + 1`
    Power(u8, EaseDir),
    Back(f32, EaseDir),
    Sine(EaseDir),
    CubicBezier([f32; 4]),
}

impl Default for Easing {
    /// GSAP's default ease.
    fn default() -> Self {
        Easing::Power(1, EaseDir::Out)
    }
}

impl Easing {
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::Power(p, dir) => {
                let exp = p as i32 + 1;
                directed(dir, t, |x| x.powi(exp))
            }
            Easing::Back(s, dir) => directed(dir, t, |x| (s + 1.0) * x * x * x - s * x * x),
            Easing::Sine(dir) => directed(dir, t, |x| 1.0 - (x * PI * 0.5).cos()),
            Easing::CubicBezier(ctrl) => cubic_bezier_at(t, ctrl),
        }
    }
}

/// Derive out/inOut variants from an ease-in curve.
#[inline]
fn directed(dir: EaseDir, t: f32, ease_in: impl Fn(f32) -> f32) -> f32 {
    match dir {
        EaseDir::In => ease_in(t),
        EaseDir::Out => 1.0 - ease_in(1.0 - t),
        EaseDir::InOut => {
            if t < 0.5 {
                ease_in(t * 2.0) * 0.5
            } else {
                1.0 - ease_in((1.0 - t) * 2.0) * 0.5
            }
        }
    }
}

/// One axis of a cubic bezier running from 0 to 1 through controls `c1`, `c2`.
#[inline]
fn bezier_axis(c1: f32, c2: f32, s: f32) -> f32 {
    let u = 1.0 - s;
    3.0 * u * u * s * c1 + 3.0 * u * s * s * c2 + s * s * s
}

/// CSS `cubic-bezier(x1, y1, x2, y2)` at time `t`, clamped to [0, 1].
/// Bisects for the curve parameter whose x is `t`; x must be monotonic.
fn cubic_bezier_at(t: f32, [x1, y1, x2, y2]: [f32; 4]) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    let mut s = t;
    for _ in 0..24 {
        let x = bezier_axis(x1, x2, s);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = 0.5 * (lo + hi);
    }
    bezier_axis(y1, y2, s)
}

fn parse_dir(s: &str) -> Option<EaseDir> {
    match s {
        "in" => Some(EaseDir::In),
        "out" => Some(EaseDir::Out),
        "inOut" | "inout" | "in-out" => Some(EaseDir::InOut),
        _ => None,
    }
}

fn dir_name(dir: EaseDir) -> &'static str {
    match dir {
        EaseDir::In => "in",
        EaseDir::Out => "out",
        EaseDir::InOut => "inOut",
    }
}

/// Split `name(args)` into `("name", Some("args"))`.
fn split_call(s: &str) -> Option<(&str, Option<&str>)> {
    match s.find('(') {
        Some(open) => {
            let inner = s[open + 1..].strip_suffix(')')?;
            Some((&s[..open], Some(inner)))
        }
        None => Some((s, None)),
    }
}

impl FromStr for Easing {
    type Err = MotionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let unknown = || MotionError::UnknownEasing {
            name: input.to_string(),
        };
        let s = input.trim();
        let (head, args) = split_call(s).ok_or_else(unknown)?;

        if head == "cubic-bezier" {
            let args = args.ok_or_else(unknown)?;
            let nums: Vec<f32> = args
                .split(',')
                .map(|n| n.trim().parse::<f32>())
                .collect::<Result<_, _>>()
                .map_err(|_| unknown())?;
            let ctrl: [f32; 4] = nums.try_into().map_err(|_| unknown())?;
            return Ok(Easing::CubicBezier(ctrl));
        }

        let (family, dir) = match head.split_once('.') {
            Some((f, d)) => (f, parse_dir(d).ok_or_else(unknown)?),
            None => (head, EaseDir::Out),
        };

        match family {
            "none" | "linear" | "power0" => Ok(Easing::Linear),
            "power1" | "quad" => Ok(Easing::Power(1, dir)),
            "power2" | "cubic" => Ok(Easing::Power(2, dir)),
            "power3" | "quart" => Ok(Easing::Power(3, dir)),
            "power4" | "quint" | "strong" => Ok(Easing::Power(4, dir)),
            "sine" => Ok(Easing::Sine(dir)),
            "back" => {
                let overshoot = match args {
                    Some(a) => a.trim().parse::<f32>().map_err(|_| unknown())?,
                    None => DEFAULT_OVERSHOOT,
                };
                Ok(Easing::Back(overshoot, dir))
            }
            _ => Err(unknown()),
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("none"),
            Easing::Power(p, dir) => write!(f, "power{p}.{}", dir_name(*dir)),
            Easing::Back(s, dir) => write!(f, "back.{}({s})", dir_name(*dir)),
            Easing::Sine(dir) => write!(f, "sine.{}", dir_name(*dir)),
            Easing::CubicBezier([a, b, c, d]) => write!(f, "cubic-bezier({a},{b},{c},{d})"),
        }
    }
}

impl TryFrom<String> for Easing {
    type Error = MotionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(value: Easing) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names() {
        assert_eq!("none".parse::<Easing>().unwrap(), Easing::Linear);
        assert_eq!(
            "power2.out".parse::<Easing>().unwrap(),
            Easing::Power(2, EaseDir::Out)
        );
        assert_eq!(
            "power3.inOut".parse::<Easing>().unwrap(),
            Easing::Power(3, EaseDir::InOut)
        );
        assert_eq!(
            "back.out(1.4)".parse::<Easing>().unwrap(),
            Easing::Back(1.4, EaseDir::Out)
        );
        assert_eq!(
            "back.out".parse::<Easing>().unwrap(),
            Easing::Back(DEFAULT_OVERSHOOT, EaseDir::Out)
        );
        assert_eq!(
            "cubic-bezier(0.42, 0, 0.58, 1)".parse::<Easing>().unwrap(),
            Easing::CubicBezier([0.42, 0.0, 0.58, 1.0])
        );
        assert!("elastic.out".parse::<Easing>().is_err());
        assert!("power2.sideways".parse::<Easing>().is_err());
        assert!("cubic-bezier(1,2,3)".parse::<Easing>().is_err());
    }

    #[test]
    fn cubic_bezier_endpoints_and_midpoint() {
        let ease = Easing::CubicBezier([0.42, 0.0, 0.58, 1.0]);
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
        assert!((ease.apply(0.5) - 0.5).abs() < 1e-4);
        assert!(ease.apply(0.25) < 0.25);
        // out-of-range input is clamped inside the curve helper as well
        assert_eq!(cubic_bezier_at(-1.0, [0.42, 0.0, 0.58, 1.0]), 0.0);
        assert_eq!(cubic_bezier_at(2.0, [0.42, 0.0, 0.58, 1.0]), 1.0);
    }

    #[test]
    fn display_round_trips() {
        for name in ["none", "power1.inOut", "back.out(1.7)", "sine.in"] {
            let e: Easing = name.parse().unwrap();
            assert_eq!(e.to_string().parse::<Easing>().unwrap(), e);
        }
    }
}
