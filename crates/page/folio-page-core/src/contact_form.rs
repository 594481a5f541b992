//! Contact form state: three fields, validation and a simulated submission.
//!
//! The form itself never talks to a network. `begin_submit` snapshots the
//! fields; the owner waits the configured delay and calls `finish_submit`,
//! which clears the fields and hands the snapshot back for delivery.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FormError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    Name,
    Email,
    Message,
}

impl FormField {
    pub fn name(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Message => "message",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl FormData {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Message => &self.message,
        }
    }

    fn slot(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Message => &mut self.message,
        }
    }
}

/// Accepts `local@domain.tld` with no whitespace.
pub fn is_valid_email(input: &str) -> bool {
    let s = input.trim();
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[derive(Clone, Debug, Default)]
pub struct ContactForm {
    data: FormData,
    /// Snapshot taken when a submission started.
    pending: Option<FormData>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        *self.data.slot(field) = value.into();
    }

    pub fn validate(&self) -> Result<(), FormError> {
        for field in [FormField::Name, FormField::Email, FormField::Message] {
            if self.data.get(field).trim().is_empty() {
                return Err(FormError::MissingField {
                    field: field.name().to_string(),
                });
            }
        }
        if !is_valid_email(&self.data.email) {
            return Err(FormError::InvalidEmail {
                input: self.data.email.clone(),
            });
        }
        Ok(())
    }

    /// Validate and snapshot the fields.
    pub fn begin_submit(&mut self) -> Result<FormData, FormError> {
        if self.pending.is_some() {
            return Err(FormError::SubmissionInFlight);
        }
        self.validate()?;
        let snapshot = self.data.clone();
        self.pending = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// Clear the fields and return the submitted snapshot, if any.
    pub fn finish_submit(&mut self) -> Option<FormData> {
        let sent = self.pending.take()?;
        self.data = FormData::default();
        Some(sent)
    }

    pub fn reset(&mut self) {
        self.data = FormData::default();
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        let mut form = ContactForm::new();
        form.set(FormField::Name, "Ada");
        form.set(FormField::Email, "ada@example.com");
        form.set(FormField::Message, "Let's build something.");
        form
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("hello@miladicode.com"));
        assert!(is_valid_email(" a.b@c.io "));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn required_fields_in_order() {
        let mut form = ContactForm::new();
        form.set(FormField::Email, "x@y.z");
        assert_eq!(
            form.validate(),
            Err(FormError::MissingField {
                field: "name".into()
            })
        );
        form.set(FormField::Name, "   ");
        assert!(matches!(form.validate(), Err(FormError::MissingField { .. })));
    }

    #[test]
    fn submit_cycle_clears_fields() {
        let mut form = filled();
        let sent = form.begin_submit().unwrap();
        assert!(form.is_submitting());
        assert_eq!(form.begin_submit(), Err(FormError::SubmissionInFlight));
        assert_eq!(form.finish_submit(), Some(sent));
        assert_eq!(form.data(), &FormData::default());
        assert!(!form.is_submitting());
        assert_eq!(form.finish_submit(), None);
    }

    #[test]
    fn invalid_email_blocks_submission() {
        let mut form = filled();
        form.set(FormField::Email, "ada-at-example");
        assert!(matches!(
            form.begin_submit(),
            Err(FormError::InvalidEmail { .. })
        ));
        assert!(!form.is_submitting());
    }
}
