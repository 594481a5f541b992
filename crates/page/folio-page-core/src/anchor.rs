//! Stable section anchors used for in-page navigation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PageError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionAnchor {
    Hero,
    About,
    Projects,
    Contact,
}

impl SectionAnchor {
    pub const ALL: [SectionAnchor; 4] = [
        SectionAnchor::Hero,
        SectionAnchor::About,
        SectionAnchor::Projects,
        SectionAnchor::Contact,
    ];

    /// Element id of the section; hosts scroll to it.
    pub fn id(self) -> &'static str {
        match self {
            SectionAnchor::Hero => "hero",
            SectionAnchor::About => "about",
            SectionAnchor::Projects => "projects",
            SectionAnchor::Contact => "contact",
        }
    }
}

impl fmt::Display for SectionAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SectionAnchor {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionAnchor::ALL
            .into_iter()
            .find(|a| a.id() == s)
            .ok_or_else(|| PageError::config(format!("unknown section anchor '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable() {
        let ids: Vec<&str> = SectionAnchor::ALL.iter().map(|a| a.id()).collect();
        assert_eq!(ids, ["hero", "about", "projects", "contact"]);
        assert_eq!("projects".parse::<SectionAnchor>().unwrap(), SectionAnchor::Projects);
        assert!("footer".parse::<SectionAnchor>().is_err());
        assert_eq!(serde_json::to_string(&SectionAnchor::About).unwrap(), "\"about\"");
    }
}
