//! Core configuration types for diagram generation
//!
//! Diagram behaviour flags, page orientation and the font choice handed to
//! the serializer.

use std::fmt;

/// Rank direction of the generated graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Orientation {
    /// Wide layout, supertypes to the left (`rankdir=RL`)
    #[default]
    Landscape,
    /// Tall layout, supertypes on top (`rankdir=BT`)
    Portrait,
}

impl Orientation {
    /// Graphviz `rankdir` value
    pub fn rankdir(&self) -> &'static str {
        match self {
            Orientation::Landscape => "RL",
            Orientation::Portrait => "BT",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Landscape => write!(f, "landscape"),
            Orientation::Portrait => write!(f, "portrait"),
        }
    }
}

/// Font families used in the graph description
///
/// The italic variant labels abstract classes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontConfig {
    pub normal: String,
    pub italic: String,
}

impl FontConfig {
    pub fn new(normal: impl Into<String>, italic: impl Into<String>) -> Self {
        Self {
            normal: normal.into(),
            italic: italic.into(),
        }
    }

    /// Pick the fonts Graphviz is likely to find on the current host.
    ///
    /// Windows installs ship Arial under the `arial`/`ariali` file names;
    /// everything else gets the PostScript Helvetica names.
    pub fn detect() -> Self {
        if cfg!(windows) {
            Self::new("arial", "ariali")
        } else {
            Self::new("Helvetica", "Helvetica-Oblique")
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self::new("Helvetica", "Helvetica-Oblique")
    }
}

/// Serializer configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderConfig {
    pub font: FontConfig,
}

impl RenderConfig {
    pub fn new(font: FontConfig) -> Self {
        Self { font }
    }
}

/// Behaviour flags for one diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagramOptions {
    pub orientation: Orientation,
    /// Highlight entities tagged `landmark` as they are registered
    pub auto_landmark: bool,
    /// Dim types outside the active package prefix as they are registered
    pub auto_dimout: bool,
    /// Derive "see also" edges from cross references
    pub use_see_tags: bool,
}

impl DiagramOptions {
    /// All packages of the documentation set
    pub fn overview() -> Self {
        Self {
            orientation: Orientation::Landscape,
            auto_landmark: true,
            auto_dimout: true,
            use_see_tags: false,
        }
    }

    /// Every class of one package
    pub fn package_summary() -> Self {
        Self::overview()
    }

    /// One class and its direct neighbourhood
    pub fn class_diagram() -> Self {
        Self {
            orientation: Orientation::Portrait,
            auto_landmark: false,
            auto_dimout: true,
            use_see_tags: true,
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_auto_landmark(mut self, enabled: bool) -> Self {
        self.auto_landmark = enabled;
        self
    }

    pub fn with_auto_dimout(mut self, enabled: bool) -> Self {
        self.auto_dimout = enabled;
        self
    }

    pub fn with_see_tags(mut self, enabled: bool) -> Self {
        self.use_see_tags = enabled;
        self
    }
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self::overview()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_rankdir() {
        assert_eq!(Orientation::Landscape.rankdir(), "RL");
        assert_eq!(Orientation::Portrait.rankdir(), "BT");
        assert_eq!(Orientation::default(), Orientation::Landscape);
    }

    #[test]
    fn test_orientation_display() {
        assert_eq!(Orientation::Landscape.to_string(), "landscape");
        assert_eq!(Orientation::Portrait.to_string(), "portrait");
    }

    #[test]
    fn test_font_detect_matches_platform() {
        let font = FontConfig::detect();
        if cfg!(windows) {
            assert_eq!(font.normal, "arial");
        } else {
            assert_eq!(font, FontConfig::default());
        }
    }

    #[test]
    fn test_option_presets() {
        let overview = DiagramOptions::overview();
        assert!(overview.auto_landmark);
        assert!(overview.auto_dimout);
        assert!(!overview.use_see_tags);
        assert_eq!(DiagramOptions::package_summary(), overview);

        let class = DiagramOptions::class_diagram();
        assert_eq!(class.orientation, Orientation::Portrait);
        assert!(!class.auto_landmark);
        assert!(class.use_see_tags);
    }

    #[test]
    fn test_option_builders() {
        let options = DiagramOptions::overview()
            .with_auto_dimout(false)
            .with_see_tags(true)
            .with_orientation(Orientation::Portrait);
        assert!(!options.auto_dimout);
        assert!(options.use_see_tags);
        assert_eq!(options.orientation, Orientation::Portrait);
    }
}
