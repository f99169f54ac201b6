//! Color palette
//!
//! A cell refers to a color by its short id only. The palette never owns the
//! cells that use it, so removing a color leaves those ids dangling; a
//! dangling id is valid state and reads as "no color".

use serde::{Deserialize, Serialize};

/// Reserved id meaning "no color"
pub const NO_COLOR: &str = "none";

/// A named yarn color
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ColorDefinition {
    /// Short code used in notation ("MC", "CC1", ...)
    pub id: String,

    /// Display name
    pub name: String,

    /// Color value as a hex string ("#4A90E2")
    pub hex: String,
}

impl ColorDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, hex: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            hex: hex.into(),
        }
    }
}

/// Flat set of color definitions, unique by id
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct Palette {
    colors: Vec<ColorDefinition>,
}

impl Palette {
    /// Create an empty palette
    pub fn empty() -> Self {
        Self { colors: Vec::new() }
    }

    pub fn colors(&self) -> &[ColorDefinition] {
        &self.colors
    }

    /// Find a color by id (exact match)
    pub fn find(&self, id: &str) -> Option<&ColorDefinition> {
        self.colors.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Resolve a color code written in notation.
    ///
    /// Codes are matched upper-cased. Returns `None` for unknown codes and for
    /// the reserved "none" id.
    pub fn resolve_code(&self, code: &str) -> Option<&ColorDefinition> {
        let upper = code.trim().to_uppercase();
        if upper.eq_ignore_ascii_case(NO_COLOR) {
            return None;
        }
        self.find(&upper)
    }

    /// Lookup-or-default: the definition a cell's color id refers to, if any
    pub fn lookup(&self, color_id: Option<&str>) -> Option<&ColorDefinition> {
        match color_id {
            Some(id) if id != NO_COLOR => self.find(id),
            _ => None,
        }
    }

    /// Add a color, replacing any existing definition with the same id.
    /// Returns `false` for the reserved "none" id.
    pub fn add(&mut self, color: ColorDefinition) -> bool {
        if color.id == NO_COLOR {
            log::warn!("Color id \"{}\" is reserved", NO_COLOR);
            return false;
        }
        match self.colors.iter_mut().find(|c| c.id == color.id) {
            Some(existing) => *existing = color,
            None => self.colors.push(color),
        }
        true
    }

    /// Remove a color by id. Cells still referencing it are left alone.
    pub fn remove(&mut self, id: &str) -> Option<ColorDefinition> {
        let index = self.colors.iter().position(|c| c.id == id)?;
        Some(self.colors.remove(index))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for Palette {
    /// Main color plus six contrast colors
    fn default() -> Self {
        Self {
            colors: vec![
                ColorDefinition::new("MC", "Main Color", "#4A90E2"),
                ColorDefinition::new("CC1", "Contrast Color 1", "#E63946"),
                ColorDefinition::new("CC2", "Contrast Color 2", "#F1C40F"),
                ColorDefinition::new("CC3", "Contrast Color 3", "#2ECC71"),
                ColorDefinition::new("CC4", "Contrast Color 4", "#9B59B6"),
                ColorDefinition::new("CC5", "Contrast Color 5", "#E67E22"),
                ColorDefinition::new("CC6", "Contrast Color 6", "#34495E"),
            ],
        }
    }
}

/// Normalize an optional color id: blank and "none" both mean no color
pub fn normalize_color_id(color_id: Option<&str>) -> Option<String> {
    match color_id.map(str::trim) {
        None | Some("") => None,
        Some(id) if id.eq_ignore_ascii_case(NO_COLOR) => None,
        Some(id) => Some(id.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_code_upper_cases() {
        let palette = Palette::default();
        assert_eq!(palette.resolve_code("cc1").map(|c| c.id.as_str()), Some("CC1"));
        assert!(palette.resolve_code("none").is_none());
        assert!(palette.resolve_code("CC9").is_none());
    }

    #[test]
    fn test_removed_color_becomes_dangling_reference() {
        let mut palette = Palette::default();
        assert!(palette.remove("CC2").is_some());
        assert!(palette.lookup(Some("CC2")).is_none());
        assert!(palette.lookup(Some("MC")).is_some());
    }

    #[test]
    fn test_reserved_id_cannot_be_added() {
        let mut palette = Palette::empty();
        assert!(!palette.add(ColorDefinition::new("none", "Nothing", "#000000")));
        assert!(palette.is_empty());
    }

    #[test]
    fn test_normalize_color_id() {
        assert_eq!(normalize_color_id(Some("none")), None);
        assert_eq!(normalize_color_id(Some("")), None);
        assert_eq!(normalize_color_id(Some("MC")), Some("MC".to_string()));
    }
}
