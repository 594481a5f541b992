//! Static content of the portfolio: the lists the sections iterate over.
//!
//! Element keys are derived from these lists (`about.skill.3`,
//! `projects.card.2`), so their lengths fix how many elements a section claims.

use serde::Serialize;

use crate::anchor::SectionAnchor;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct Skill {
    pub label: &'static str,
    pub accent: &'static str,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct Project {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub tech: &'static [&'static str],
    pub featured: bool,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct SocialLink {
    pub label: &'static str,
    pub href: &'static str,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub anchor: SectionAnchor,
}

pub const SKILLS: [Skill; 6] = [
    Skill { label: "Frontend Development", accent: "neon-blue" },
    Skill { label: "Creative User Experiences", accent: "neon-purple" },
    Skill { label: "Seamless System Integration", accent: "neon-cyan" },
    Skill { label: "Human-Centered Interfaces", accent: "neon-pink" },
    Skill { label: "Performance Optimization", accent: "neon-blue" },
    Skill { label: "Modern Frameworks", accent: "neon-purple" },
];

pub const TECH_STACK: [&str; 6] = [
    "React",
    "TypeScript",
    "GSAP",
    "Bootstrap",
    "Redux",
    "Tailwind CSS",
];

pub const PROJECTS: [Project; 6] = [
    Project {
        id: 1,
        title: "3D Interactive Portfolio",
        description: "A stunning portfolio website featuring Spline 3D models, GSAP animations, and immersive user experience.",
        tech: &["React", "Spline", "GSAP", "Three.js"],
        featured: true,
    },
    Project {
        id: 2,
        title: "Email for Developers",
        description: "A comprehensive email service platform designed specifically for developers with advanced API integration.",
        tech: &["React", "Node.js", "API", "Email"],
        featured: true,
    },
    Project {
        id: 3,
        title: "Next-Level Gaming UI",
        description: "Modern gaming interface with real-time data visualization and interactive 3D elements.",
        tech: &["React", "WebGL", "Real-time", "Gaming"],
        featured: false,
    },
    Project {
        id: 4,
        title: "Animation Tools Platform",
        description: "Educational platform for learning web animation tools with interactive tutorials and examples.",
        tech: &["GSAP", "Education", "Interactive", "Tutorials"],
        featured: false,
    },
    Project {
        id: 5,
        title: "Portfolio Tutorial",
        description: "Step-by-step tutorial series for building animated portfolios with modern web technologies.",
        tech: &["Tutorial", "Portfolio", "Animation", "Web Dev"],
        featured: false,
    },
    Project {
        id: 6,
        title: "AuthKit Login System",
        description: "Beautiful and secure authentication system with glassmorphic design and smooth animations.",
        tech: &["Auth", "Security", "UI/UX", "Backend"],
        featured: false,
    },
];

pub const SOCIAL_LINKS: [SocialLink; 4] = [
    SocialLink { label: "GitHub", href: "https://github.com/miladicode" },
    SocialLink { label: "LinkedIn", href: "https://linkedin.com/in/miladicode" },
    SocialLink { label: "Twitter", href: "https://twitter.com/miladicode" },
    SocialLink { label: "Email", href: "mailto:hello@miladicode.com" },
];

/// Navigation bar entries; the footer's quick links use the same list.
pub const NAV_ITEMS: [NavItem; 4] = [
    NavItem { label: "Home", anchor: SectionAnchor::Hero },
    NavItem { label: "About", anchor: SectionAnchor::About },
    NavItem { label: "Projects", anchor: SectionAnchor::Projects },
    NavItem { label: "Contact", anchor: SectionAnchor::Contact },
];

pub fn project(id: u32) -> Option<&'static Project> {
    PROJECTS.iter().find(|p| p.id == id)
}

/// Everything above in one serializable value, for hosts that render markup.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Catalog {
    pub skills: &'static [Skill],
    pub tech_stack: &'static [&'static str],
    pub projects: &'static [Project],
    pub social_links: &'static [SocialLink],
    pub nav_items: &'static [NavItem],
}

pub fn catalog() -> Catalog {
    Catalog {
        skills: &SKILLS,
        tech_stack: &TECH_STACK,
        projects: &PROJECTS,
        social_links: &SOCIAL_LINKS,
        nav_items: &NAV_ITEMS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_lookup() {
        assert_eq!(project(3).map(|p| p.title), Some("Next-Level Gaming UI"));
        assert!(project(42).is_none());
        let ids: Vec<u32> = PROJECTS.iter().map(|p| p.id).collect();
        assert_eq!(ids, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn catalog_serializes() {
        let json = serde_json::to_value(catalog()).unwrap();
        assert_eq!(json["nav_items"][2]["anchor"], "projects");
        assert_eq!(json["skills"].as_array().map(Vec::len), Some(6));
    }
}
