use crate::error::{CamToolError, CamToolResult, ParameterError, ParameterResult};
use crate::sequencer::DrillPlan;
use crate::Hole;
use serde::{Deserialize, Serialize};

/// Most plunges or helix turns allowed per hole
pub const MAX_DEPTH_STEPS: usize = 10_000;

/// Helix pitch when no peck depth is set (mm)
const DEFAULT_HELIX_PITCH: f64 = 1.0;

/// Parameters for drilling a sequenced job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillPressParameters {
    /// Diameter of the tool being used (mm)
    pub tool_diameter: f64,
    /// Z coordinate of the material surface (mm)
    pub top_z: f64,
    /// Final depth of the holes (mm)
    pub bottom_z: f64,
    /// Maximum depth of each plunge (mm). Set to 0 for no pecking.
    pub peck_depth: f64,
    /// Feed rate for vertical movement (mm/min)
    pub plunge_rate: f64,
    /// Feed rate for horizontal movement during helical cycles (mm/min)
    pub feed_rate: f64,
    /// Spindle speed (RPM)
    pub spindle_speed: f64,
    /// Height for safe travel between locations (mm)
    pub safe_z: f64,
}

impl Default for DrillPressParameters {
    fn default() -> Self {
        Self {
            tool_diameter: 5.0,
            top_z: 0.0,
            bottom_z: -10.0,
            peck_depth: 0.0,
            plunge_rate: 100.0,
            feed_rate: 500.0,
            spindle_speed: 1000.0,
            safe_z: 5.0,
        }
    }
}

impl DrillPressParameters {
    /// Validate parameters
    pub fn validate(&self) -> ParameterResult<()> {
        let positive = [
            ("tool_diameter", self.tool_diameter),
            ("plunge_rate", self.plunge_rate),
            ("feed_rate", self.feed_rate),
            ("spindle_speed", self.spindle_speed),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParameterError::InvalidValue {
                    name: name.to_string(),
                    reason: format!("must be > 0, got {value}"),
                });
            }
        }

        for (name, value) in [
            ("top_z", self.top_z),
            ("bottom_z", self.bottom_z),
            ("safe_z", self.safe_z),
        ] {
            if !value.is_finite() {
                return Err(ParameterError::InvalidValue {
                    name: name.to_string(),
                    reason: "must be finite".to_string(),
                });
            }
        }

        if !self.peck_depth.is_finite() || self.peck_depth < 0.0 {
            return Err(ParameterError::InvalidValue {
                name: "peck_depth".to_string(),
                reason: format!("must be >= 0, got {}", self.peck_depth),
            });
        }
        if self.bottom_z >= self.top_z {
            return Err(ParameterError::Incompatible(format!(
                "bottom_z {:.3} must be below top_z {:.3}",
                self.bottom_z, self.top_z
            )));
        }
        if self.safe_z <= self.top_z {
            return Err(ParameterError::Incompatible(format!(
                "safe_z {:.3} must be above top_z {:.3}",
                self.safe_z, self.top_z
            )));
        }

        let steps = ((self.top_z - self.bottom_z) / self.depth_pitch()).ceil();
        if !steps.is_finite() || steps > MAX_DEPTH_STEPS as f64 {
            return Err(ParameterError::InvalidValue {
                name: "peck_depth".to_string(),
                reason: format!(
                    "{:.3} mm deep in steps of {} mm needs more than {} plunges",
                    self.top_z - self.bottom_z,
                    self.depth_pitch(),
                    MAX_DEPTH_STEPS
                ),
            });
        }
        Ok(())
    }

    /// Depth per plunge or helix turn
    fn depth_pitch(&self) -> f64 {
        if self.peck_depth > 0.0 {
            self.peck_depth
        } else {
            DEFAULT_HELIX_PITCH
        }
    }

    /// Z levels reached by successive plunges, ending at `bottom_z`.
    /// Only meaningful on validated parameters.
    fn depth_levels(&self) -> impl Iterator<Item = f64> + '_ {
        let pitch = self.depth_pitch();
        let steps = ((self.top_z - self.bottom_z) / pitch).ceil() as usize;
        (1..=steps).map(move |k| (self.top_z - k as f64 * pitch).max(self.bottom_z))
    }
}

/// Generator for drilling G-Code over a sequenced plan
pub struct DrillProgramGenerator {
    params: DrillPressParameters,
}

impl DrillProgramGenerator {
    /// Create a new generator with the given parameters
    pub fn new(params: DrillPressParameters) -> Self {
        Self { params }
    }

    /// Generate one program visiting every hole of `plan` in order
    pub fn generate(&self, plan: &DrillPlan) -> CamToolResult<String> {
        self.params.validate()?;
        if plan.total_holes() == 0 {
            return Err(CamToolError::GenerationFailed(format!(
                "plan '{}' has no holes",
                plan.job_name
            )));
        }

        let mut gcode = String::new();
        let p = &self.params;

        // Header
        gcode.push_str("; DrillKit drilling program\n");
        gcode.push_str(&format!("; Job: {}\n", plan.job_name));
        gcode.push_str(&format!("; Holes: {}\n", plan.total_holes()));
        gcode.push_str(&format!("; Tool Diameter: {:.3} mm\n", p.tool_diameter));
        gcode.push_str(&format!(
            "; Depth: {:.3} to {:.3} mm\n",
            p.top_z, p.bottom_z
        ));
        gcode.push_str(&format!(
            "; Travel: {:.3} mm (nearest neighbor {:.3} mm)\n",
            plan.total_length(),
            plan.initial_length()
        ));

        // Initialization
        gcode.push_str("G21 ; Set units to millimeters\n");
        gcode.push_str("G90 ; Absolute positioning\n");
        gcode.push_str(&format!("M3 S{:.0} ; Start spindle\n", p.spindle_speed));
        gcode.push_str(&format!("G0 Z{:.3} ; Move to safe height\n", p.safe_z));

        for (index, face) in plan.faces.iter().enumerate() {
            if index > 0 {
                // Operator has to re-fixture the part
                gcode.push_str("M5 ; Stop spindle\n");
                gcode.push_str(&format!("M0 ; Reposition part for {} face\n", face.face));
                gcode.push_str(&format!("M3 S{:.0} ; Start spindle\n", p.spindle_speed));
            }
            gcode.push_str(&format!(
                "; Face: {} ({} holes)\n",
                face.face,
                face.holes.len()
            ));
            for hole in &face.holes {
                self.generate_hole(&mut gcode, hole);
            }
        }

        // Retract and end
        gcode.push_str(&format!("G0 Z{:.3} ; Retract to safe height\n", p.safe_z));
        gcode.push_str("M5 ; Stop spindle\n");
        gcode.push_str("M30 ; End program\n");

        Ok(gcode)
    }

    fn generate_hole(&self, gcode: &mut String, hole: &Hole) {
        let p = &self.params;
        gcode.push_str(&format!("; Hole {} D{:.3}\n", hole.id, hole.diameter));
        gcode.push_str(&format!("G0 Z{:.3}\n", p.safe_z));
        gcode.push_str(&format!("G0 X{:.3} Y{:.3}\n", hole.x, hole.y));

        if p.tool_diameter >= hole.diameter {
            self.generate_drilling(gcode);
        } else {
            self.generate_helical(gcode, hole);
        }
    }

    /// Generate standard or peck drilling G-Code
    fn generate_drilling(&self, gcode: &mut String) {
        let p = &self.params;
        let target_z = p.bottom_z;
        let start_z = p.top_z;

        if p.peck_depth <= 0.0 {
            gcode.push_str(&format!("G1 Z{:.3} F{:.1}\n", target_z, p.plunge_rate));
        } else {
            for current_z in p.depth_levels() {
                gcode.push_str(&format!("G1 Z{:.3} F{:.1}\n", current_z, p.plunge_rate));
                gcode.push_str(&format!("G0 Z{:.3} ; Retract to clear chips\n", start_z));
                if current_z > target_z {
                    // Rapid back to just above last cut (0.5mm clearance)
                    gcode.push_str(&format!("G0 Z{:.3}\n", current_z + 0.5));
                }
            }
        }
        gcode.push_str(&format!("G0 Z{:.3}\n", p.safe_z));
    }

    /// Generate helical interpolation G-Code for holes larger than the tool
    fn generate_helical(&self, gcode: &mut String, hole: &Hole) {
        let p = &self.params;
        let radius = (hole.diameter - p.tool_diameter) / 2.0;
        let start_z = p.top_z;

        gcode.push_str(&format!("G0 X{:.3} Y{:.3}\n", hole.x + radius, hole.y));
        gcode.push_str(&format!("G1 Z{:.3} F{:.1}\n", start_z, p.plunge_rate));

        // peck_depth doubles as the helix pitch
        for current_z in p.depth_levels() {
            // I is relative to the helix start (X+radius, Y)
            gcode.push_str(&format!(
                "G2 X{:.3} Y{:.3} I{:.3} J0.0 Z{:.3} F{:.1}\n",
                hole.x + radius,
                hole.y,
                -radius,
                current_z,
                p.feed_rate
            ));
        }

        // Clean-up circle at full depth
        gcode.push_str(&format!(
            "G2 X{:.3} Y{:.3} I{:.3} J0.0 F{:.1}\n",
            hole.x + radius,
            hole.y,
            -radius,
            p.feed_rate
        ));
        gcode.push_str(&format!(
            "G1 X{:.3} Y{:.3} F{:.1}\n",
            hole.x, hole.y, p.feed_rate
        ));
        gcode.push_str(&format!("G0 Z{:.3}\n", p.safe_z));
    }
}
