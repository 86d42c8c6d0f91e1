//! Consistent styling utilities for CLI output.
//!
//! Provides color and formatting helpers using owo-colors. Every helper
//! returns the plain text when colors are disabled.

use owo_colors::{OwoColorize, Style as Paint};
use std::fmt::Display;

use crate::output;

/// Styles for different semantic elements.
pub struct Style;

impl Style {
    fn paint<T: Display>(text: T, paint: Paint) -> String {
        if output::is_no_color() {
            text.to_string()
        } else {
            format!("{}", text.style(paint))
        }
    }

    /// Section headers (e.g. "Capabilities").
    pub fn header<T: Display>(text: T) -> String {
        Self::paint(text, Paint::new().bold())
    }

    /// Labels and keys (e.g. "offline", "online").
    pub fn label<T: Display>(text: T) -> String {
        Self::paint(text, Paint::new().dimmed())
    }

    /// Primary values such as provider and model names.
    pub fn value<T: Display>(text: T) -> String {
        Self::paint(text, Paint::new().cyan())
    }

    /// Secondary info such as endpoints.
    pub fn secondary<T: Display>(text: T) -> String {
        Self::paint(text, Paint::new().dimmed())
    }

    /// File paths in status lines.
    pub fn path<T: Display>(text: T) -> String {
        Self::paint(text, Paint::new().underline())
    }

    pub fn success<T: Display>(text: T) -> String {
        Self::paint(text, Paint::new().green())
    }

    pub fn error<T: Display>(text: T) -> String {
        Self::paint(text, Paint::new().red().bold())
    }

    pub fn warning<T: Display>(text: T) -> String {
        Self::paint(text, Paint::new().yellow())
    }

    pub fn hint<T: Display>(text: T) -> String {
        Self::paint(text, Paint::new().dimmed().italic())
    }
}
