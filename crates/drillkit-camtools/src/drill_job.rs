//! Drill jobs: the holes of one part, as handed over by geometry extraction.
//!
//! A job file is JSON or TOML:
//!
//! ```toml
//! name = "bracket"
//! origin = [0.0, 0.0]
//!
//! [[holes]]
//! id = "H1"
//! x = 12.5
//! y = 40.0
//! diameter = 6.0
//! face = "front"
//! ```

use crate::error::{CamToolError, CamToolResult};
use drillkit_core::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Side of the part a hole is drilled from
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    #[default]
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl Face {
    /// All faces in machining order
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Left,
        Face::Right,
        Face::Top,
        Face::Bottom,
    ];
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Front => write!(f, "front"),
            Self::Back => write!(f, "back"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Top => write!(f, "top"),
            Self::Bottom => write!(f, "bottom"),
        }
    }
}

/// A single circular feature to drill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    /// Identifier from the source geometry
    pub id: String,
    /// X coordinate of the hole center (mm)
    pub x: f64,
    /// Y coordinate of the hole center (mm)
    pub y: f64,
    /// Finished hole diameter (mm)
    pub diameter: f64,
    /// Face the hole is drilled from
    #[serde(default)]
    pub face: Face,
}

impl Hole {
    pub fn new(id: impl Into<String>, x: f64, y: f64, diameter: f64, face: Face) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            diameter,
            face,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// All holes of one part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillJob {
    /// Job name, usually the part file stem
    #[serde(default)]
    pub name: String,
    /// Holes in extraction order
    pub holes: Vec<Hole>,
    /// When set, each face starts at the hole nearest to this point
    #[serde(default)]
    pub origin: Option<(f64, f64)>,
}

impl DrillJob {
    pub fn new(name: impl Into<String>, holes: Vec<Hole>) -> Self {
        Self {
            name: name.into(),
            holes,
            origin: None,
        }
    }

    pub fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin = Some((x, y));
        self
    }

    /// Load a job from a `.json` or `.toml` file.
    ///
    /// A job without a name takes the file stem.
    pub fn load_from_file(path: &Path) -> CamToolResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let mut job: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(CamToolError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        if job.name.trim().is_empty() {
            if let Some(stem) = path.file_stem() {
                job.name = stem.to_string_lossy().into_owned();
            }
        }

        job.validate()?;
        Ok(job)
    }

    /// Validate hole data
    pub fn validate(&self) -> CamToolResult<()> {
        let mut ids = HashSet::with_capacity(self.holes.len());
        for hole in &self.holes {
            if !hole.x.is_finite() || !hole.y.is_finite() {
                return Err(CamToolError::InvalidJob(format!(
                    "hole '{}' has a non-finite center ({}, {})",
                    hole.id, hole.x, hole.y
                )));
            }
            if !hole.diameter.is_finite() || hole.diameter <= 0.0 {
                return Err(CamToolError::InvalidJob(format!(
                    "hole '{}' has invalid diameter {}",
                    hole.id, hole.diameter
                )));
            }
            if !ids.insert(hole.id.as_str()) {
                return Err(CamToolError::InvalidJob(format!(
                    "duplicate hole id '{}'",
                    hole.id
                )));
            }
        }
        if let Some((x, y)) = self.origin {
            if !x.is_finite() || !y.is_finite() {
                return Err(CamToolError::InvalidJob(format!(
                    "origin ({x}, {y}) is not finite"
                )));
            }
        }
        Ok(())
    }

    /// Faces that have at least one hole, in machining order
    pub fn faces(&self) -> Vec<Face> {
        Face::ALL
            .into_iter()
            .filter(|face| self.holes.iter().any(|h| h.face == *face))
            .collect()
    }

    /// Holes on one face, in extraction order
    pub fn holes_on(&self, face: Face) -> Vec<&Hole> {
        self.holes.iter().filter(|h| h.face == face).collect()
    }
}
