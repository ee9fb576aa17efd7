//! Export options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Level type advertised to the scene-description generator.
///
/// Only raster drawings are produced; the other kinds are carried through so
/// the generator can create the matching level type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelKind {
    #[default]
    Raster,
    ToonzRaster,
    Vector,
}

impl LevelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raster => "raster",
            Self::ToonzRaster => "toonz_raster",
            Self::Vector => "vector",
        }
    }
}

impl fmt::Display for LevelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LevelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raster" => Ok(Self::Raster),
            "toonz_raster" | "toonzraster" => Ok(Self::ToonzRaster),
            "vector" => Ok(Self::Vector),
            other => Err(format!(
                "Unknown level kind: {other}. Use: raster, toonz_raster, vector"
            )),
        }
    }
}

/// Layer-selection policy and naming for one export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Export hidden layers.
    pub include_invisible: bool,

    /// Export layers carrying the reference color label.
    pub include_reference: bool,

    /// Also export non-animated paint layers, held for the whole range.
    pub include_static: bool,

    /// Export groups containing animation as one composited level.
    pub flatten_groups: bool,

    /// Scene folder/file name; falls back to the document name.
    pub scene_name: Option<String>,

    pub level_kind: LevelKind,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_invisible: false,
            include_reference: false,
            include_static: false,
            flatten_groups: true,
            scene_name: None,
            level_kind: LevelKind::Raster,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_kind_parse() {
        assert_eq!("Raster".parse::<LevelKind>(), Ok(LevelKind::Raster));
        assert_eq!("ToonzRaster".parse::<LevelKind>(), Ok(LevelKind::ToonzRaster));
        assert_eq!("vector".parse::<LevelKind>(), Ok(LevelKind::Vector));
        assert!("bitmap".parse::<LevelKind>().is_err());
    }

    #[test]
    fn test_default_options_flatten_groups() {
        let options = ExportOptions::default();
        assert!(options.flatten_groups);
        assert!(!options.include_static);
        assert!(options.scene_name.is_none());
    }
}
