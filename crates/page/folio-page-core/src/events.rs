//! Page-level commands from the host and events back to it.
//!
//! Motion changes travel separately (`folio_motion::Change`); these carry the
//! things a host reacts to outside of styling: scroll requests, form results,
//! menu state, readiness.

use serde::{Deserialize, Serialize};

use crate::anchor::SectionAnchor;
use crate::contact_form::{FormData, FormField};

/// User intents forwarded by the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageCommand {
    NavToggleMenu,
    NavSelect { anchor: SectionAnchor },
    /// "Let's work together"
    HeroCta,
    /// "Explore my work" and the scroll indicator
    HeroExplore,
    ProjectClicked { id: u32 },
    FormInput { field: FormField, value: String },
    FormSubmit,
    FooterLink { anchor: SectionAnchor },
}

/// Why the page left the loading phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadyCause {
    Sequencer,
    Fallback,
}

/// Where a floating particle sits inside its field, in percent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticlePlacement {
    pub key: String,
    pub left_pct: f32,
    pub top_pct: f32,
    pub duration_ms: f64,
    pub delay_ms: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum PageEvent {
    GreetingShown {
        index: usize,
        text: String,
    },
    LoadingFinalizing,
    Ready {
        cause: ReadyCause,
    },
    SectionMounted {
        section: String,
    },
    /// Smooth-scroll the window to the anchor's element.
    ScrollTo {
        anchor: SectionAnchor,
    },
    NavScrolled {
        scrolled: bool,
    },
    MenuToggled {
        open: bool,
    },
    ProjectSelected {
        id: u32,
        title: String,
    },
    FormSubmitting,
    /// Delivery of the data is up to the host.
    FormSubmitted {
        data: FormData,
    },
    FormRejected {
        reason: String,
    },
    /// Host creates one element per placement under the field.
    ParticlesPlaced {
        field: String,
        particles: Vec<ParticlePlacement>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_use_tagged_json() {
        let cmd: PageCommand =
            serde_json::from_str(r#"{ "type": "nav_select", "anchor": "projects" }"#).unwrap();
        assert_eq!(
            cmd,
            PageCommand::NavSelect {
                anchor: SectionAnchor::Projects
            }
        );
        let cmd: PageCommand = serde_json::from_str(
            r#"{ "type": "form_input", "field": "email", "value": "a@b.co" }"#,
        )
        .unwrap();
        assert!(matches!(
            cmd,
            PageCommand::FormInput {
                field: FormField::Email,
                ..
            }
        ));
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(PageEvent::Ready {
            cause: ReadyCause::Fallback,
        })
        .unwrap();
        assert_eq!(json["type"], "ready");
        assert_eq!(json["cause"], "fallback");
    }
}
