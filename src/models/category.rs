//! Category model
//!
//! Categories belong to the transaction backend. Goals only keep a display
//! snapshot of them (`CategorySnapshot`), which is allowed to go stale.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

pub const DEFAULT_ICON: &str = "tag";
pub const DEFAULT_COLOR: &str = "#808080";

/// A spending category as served by the category source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Category {
    /// Create a new category with the default icon and color
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            icon: default_icon(),
            color: default_color(),
        }
    }

    pub fn with_style(mut self, icon: impl Into<String>, color: impl Into<String>) -> Self {
        self.icon = icon.into();
        self.color = color.into();
        self
    }

    /// Capture the display fields a goal keeps
    pub fn snapshot(&self) -> CategorySnapshot {
        CategorySnapshot {
            name: self.name.clone(),
            icon: self.icon.clone(),
            color: self.color.clone(),
        }
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }
        if name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(name.len()));
        }
        if !is_hex_color(&self.color) {
            return Err(CategoryValidationError::InvalidColor(self.color.clone()));
        }
        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Denormalized category display fields stored on a goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySnapshot {
    pub name: String,
    pub icon: String,
    pub color: String,
}

fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::InvalidColor(c) => write!(f, "Invalid color '{}', expected #rgb or #rrggbb", c),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category_defaults() {
        let cat = Category::new("Food");
        assert_eq!(cat.icon, "tag");
        assert_eq!(cat.color, "#808080");
        assert!(cat.validate().is_ok());
    }

    #[test]
    fn test_snapshot_copies_display_fields() {
        let cat = Category::new("Food").with_style("utensils", "#ff8800");
        let snap = cat.snapshot();
        assert_eq!(snap.name, "Food");
        assert_eq!(snap.icon, "utensils");
        assert_eq!(snap.color, "#ff8800");
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            Category::new("  ").validate(),
            Err(CategoryValidationError::EmptyName)
        );
        assert!(matches!(
            Category::new("x".repeat(51)).validate(),
            Err(CategoryValidationError::NameTooLong(51))
        ));
        assert!(Category::new("Food").with_style("tag", "red").validate().is_err());
        assert!(Category::new("Food").with_style("tag", "#abc").validate().is_ok());
    }

    #[test]
    fn test_missing_style_fields_use_defaults() {
        let json = r#"{"id":"550e8400-e29b-41d4-a716-446655440000","name":"Rent"}"#;
        let cat: Category = serde_json::from_str(json).unwrap();
        assert_eq!(cat.icon, DEFAULT_ICON);
        assert_eq!(cat.color, DEFAULT_COLOR);
    }
}
