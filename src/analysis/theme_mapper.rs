// src/analysis/theme_mapper.rs
//! Canonical education themes and their program-finder listing URLs.

use std::collections::BTreeMap;

use crate::error::{AdvisorError, Result};

/// Fixed enumeration, in match-priority order.
pub const THEMES: [&str; 12] = [
    "Agriculture",
    "Digital: AI, Data Science, Cybersecurity & Cloud Computing",
    "Energie Renouvelable",
    "Géologie et Exploitation Minière",
    "HSE, Wellbeing & Sciences de la Santé",
    "Industrie 4.0",
    "Innovation Urbaine et Territoriale",
    "Process Engineering",
    "Science des Matériaux et Nanotechnologie",
    "Sciences de l'éducation",
    "Sciences des Eaux",
    "Sustainability",
];

const PROGRAM_FINDER: &str = "https://exed.um6p.ma/fr/program-finder/?f=&startdate=&enddate=&topic%5B%5D=";
const PROGRAM_FINDER_EN: &str = "https://exed.um6p.ma/program-finder?f=&startdate=&enddate=&topic%5B%5D=";

pub fn default_theme_urls() -> BTreeMap<String, String> {
    let topics = [
        (THEMES[0], PROGRAM_FINDER, 59),
        (THEMES[1], PROGRAM_FINDER, 61),
        (THEMES[2], PROGRAM_FINDER, 65),
        (THEMES[3], PROGRAM_FINDER, 63),
        (THEMES[4], PROGRAM_FINDER, 67),
        (THEMES[5], PROGRAM_FINDER, 64),
        (THEMES[6], PROGRAM_FINDER_EN, 77),
        (THEMES[7], PROGRAM_FINDER, 88),
        (THEMES[8], PROGRAM_FINDER, 60),
        (THEMES[9], PROGRAM_FINDER, 71),
        (THEMES[10], PROGRAM_FINDER_EN, 19),
        (THEMES[11], PROGRAM_FINDER, 69),
    ];

    topics
        .into_iter()
        .map(|(theme, base, topic)| (theme.to_string(), format!("{}{}", base, topic)))
        .collect()
}

/// Outcome of matching a free-text label against the enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeMatch {
    Canonical(&'static str),
    /// No canonical theme occurs in the label; carries the raw label.
    Unmapped(String),
}

impl ThemeMatch {
    /// The theme if canonical, the raw label otherwise.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Canonical(theme) => theme,
            Self::Unmapped(raw) => raw,
        }
    }
}

/// First theme (in enumeration order) contained in `label`; pass-through otherwise.
pub fn canonicalize(label: &str) -> ThemeMatch {
    THEMES
        .iter()
        .copied()
        .find(|theme| label.contains(*theme))
        .map(ThemeMatch::Canonical)
        .unwrap_or_else(|| ThemeMatch::Unmapped(label.to_string()))
}

/// Listing URL for a mapped theme. Unmapped labels are "not found", never a panic.
pub fn listing_url<'a>(
    theme: &ThemeMatch,
    theme_urls: &'a BTreeMap<String, String>,
) -> Result<&'a str> {
    theme_urls
        .get(theme.as_str())
        .map(String::as_str)
        .ok_or_else(|| AdvisorError::MappingNotFound(theme.as_str().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_theme_has_a_listing_url() {
        let urls = default_theme_urls();
        assert_eq!(urls.len(), THEMES.len());
        for theme in THEMES {
            let url = listing_url(&ThemeMatch::Canonical(theme), &urls).unwrap();
            assert!(url.starts_with("https://exed.um6p.ma/"), "{}", url);
        }
    }

    #[test]
    fn test_single_theme_in_label() {
        let label = "Digital: AI, Data Science, Cybersecurity & Cloud Computing — great fit";
        assert_eq!(
            canonicalize(label),
            ThemeMatch::Canonical("Digital: AI, Data Science, Cybersecurity & Cloud Computing")
        );
        assert_eq!(canonicalize("Sustainability"), ThemeMatch::Canonical("Sustainability"));
    }

    #[test]
    fn test_unmatched_label_passes_through() {
        let label = "Quantum basket weaving";
        let matched = canonicalize(label);
        assert_eq!(matched, ThemeMatch::Unmapped(label.to_string()));
        assert_eq!(matched.as_str(), label);
    }

    #[test]
    fn test_enumeration_order_wins_over_position_in_label() {
        let label = "Sustainability, or maybe Agriculture";
        assert_eq!(canonicalize(label), ThemeMatch::Canonical("Agriculture"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(matches!(canonicalize("agriculture"), ThemeMatch::Unmapped(_)));
    }

    #[test]
    fn test_unmapped_theme_is_not_found() {
        let urls = default_theme_urls();
        let err = listing_url(&canonicalize("Astrophysics"), &urls).unwrap_err();
        assert!(matches!(err, AdvisorError::MappingNotFound(ref t) if t == "Astrophysics"));
    }
}
