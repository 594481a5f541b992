//! Folio Page Core
//!
//! The portfolio page runtime on top of `folio_motion`: the greeting
//! sequencer shown while loading, the composer that swaps the loader for the
//! page, the section choreographies, the contact form and navigation state.
//! Hosts construct a [`PageComposer`], call `update(dt, inputs)` every frame
//! and apply the returned changes and events.

pub mod anchor;
pub mod composer;
pub mod config;
pub mod contact_form;
pub mod content;
pub mod error;
pub mod events;
pub mod navigation;
pub mod sections;
pub mod sequencer;

pub use anchor::SectionAnchor;
pub use composer::{PageComposer, PageFrame, PageInputs, PagePhase, PageState};
pub use config::{
    ComposerConfig, ContactConfig, FallbackPolicy, LoadingConfig, NavConfig, PageConfig,
    ParticleConfig, ParticlesConfig, ProjectsConfig,
};
pub use contact_form::{is_valid_email, ContactForm, FormData, FormField};
pub use content::{catalog, Catalog};
pub use error::{FormError, PageError};
pub use events::{PageCommand, PageEvent, ParticlePlacement, ReadyCause};
pub use navigation::NavState;
pub use sections::Section;
pub use sequencer::{
    GreetingCycle, LoadingSequencer, SequencerEvent, SequencerState, DEFAULT_GREETINGS,
};

pub type Result<T> = std::result::Result<T, PageError>;
