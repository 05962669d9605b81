// src/analysis/mod.rs
pub mod classifier;
pub mod theme_mapper;

pub use classifier::{ClassificationLabel, Classifier, TaskKind};
pub use theme_mapper::{canonicalize, ThemeMatch, THEMES};
