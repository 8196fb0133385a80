//! UI Theme - Design system constants
//!
//! Colors and icons used by the terminal reporter.

use crossterm::style::Color;

/// Default theme for condarepo output
#[derive(Debug, Clone, Default)]
pub struct Theme {
    /// Colors for different UI elements
    pub colors: ColorScheme,
    /// Status icons
    pub icons: Icons,
}

/// Color scheme for UI elements
#[derive(Debug, Clone)]
pub struct ColorScheme {
    /// Channel names
    pub channel: Color,
    /// Subdir (platform) names
    pub subdir: Color,
    /// Paths and secondary info
    pub secondary: Color,
    /// Success states
    pub success: Color,
    /// Warning states
    pub warning: Color,
    /// Interrupted runs
    pub error: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            channel: Color::Cyan,
            subdir: Color::White,
            secondary: Color::DarkGrey,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
        }
    }
}

/// Status icons for different states
#[derive(Debug, Clone)]
pub struct Icons {
    /// Placed (✓)
    pub success: &'static str,
    /// Not copied: dry run, or already in place (○)
    pub pending: &'static str,
    /// Skipped (⚠)
    pub warning: &'static str,
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            success: "✓",
            pending: "○",
            warning: "⚠",
        }
    }
}
