use drillkit_camtools::drill_press::{DrillPressParameters, DrillProgramGenerator};
use drillkit_camtools::{CamToolError, DrillJob, DrillSequencer, Face, Hole, ParameterError};

fn params() -> DrillPressParameters {
    DrillPressParameters {
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

fn plan_for(holes: Vec<Hole>) -> drillkit_camtools::DrillPlan {
    DrillSequencer::default()
        .sequence(&DrillJob::new("test", holes))
        .unwrap()
}

#[test]
fn test_simple_drilling() {
    let plan = plan_for(vec![Hole::new("H1", 10.0, 20.0, 5.0, Face::Front)]);
    let gcode = DrillProgramGenerator::new(params()).generate(&plan).unwrap();

    assert!(gcode.contains("G1 Z-10.000 F100.0"));
    assert!(gcode.contains("M3 S1000"));
    assert!(gcode.contains("G0 X10.000 Y20.000"));
    assert!(gcode.contains("; Hole H1 D5.000"));
    assert!(gcode.ends_with("M30 ; End program\n"));
}

#[test]
fn test_peck_drilling() {
    let plan = plan_for(vec![Hole::new("H1", 0.0, 0.0, 5.0, Face::Front)]);
    let gcode = DrillProgramGenerator::new(DrillPressParameters {
        bottom_z: -5.0,
        peck_depth: 2.0,
        ..params()
    })
    .generate(&plan)
    .unwrap();

    // Should have multiple plunges
    assert!(gcode.contains("G1 Z-2.000 F100.0"));
    assert!(gcode.contains("G1 Z-4.000 F100.0"));
    assert!(gcode.contains("G1 Z-5.000 F100.0"));
    // Should have retractions
    assert!(gcode.contains("G0 Z0.000 ; Retract to clear chips"));
}

#[test]
fn test_helical_drilling() {
    let plan = plan_for(vec![Hole::new("H1", 0.0, 0.0, 10.0, Face::Front)]);
    let gcode = DrillProgramGenerator::new(DrillPressParameters {
        tool_diameter: 6.0,
        bottom_z: -5.0,
        peck_depth: 2.0,
        ..params()
    })
    .generate(&plan)
    .unwrap();

    // Radius = (10 - 6) / 2 = 2.0
    assert!(gcode.contains("G0 X2.000 Y0.000"));
    assert!(gcode.contains("G2 X2.000 Y0.000 I-2.000 J0.0 Z-2.000 F500.0"));
    assert!(gcode.contains("G2 X2.000 Y0.000 I-2.000 J0.0 Z-4.000 F500.0"));
    assert!(gcode.contains("G2 X2.000 Y0.000 I-2.000 J0.0 Z-5.000 F500.0"));
    // Final circle
    assert!(gcode.contains("G2 X2.000 Y0.000 I-2.000 J0.0 F500.0"));
    // Return to center
    assert!(gcode.contains("G1 X0.000 Y0.000 F500.0"));
}

#[test]
fn test_holes_emitted_in_plan_order() {
    let plan = plan_for(vec![
        Hole::new("A", 0.0, 0.0, 5.0, Face::Front),
        Hole::new("C", 20.0, 0.0, 5.0, Face::Front),
        Hole::new("B", 10.0, 0.0, 5.0, Face::Front),
    ]);
    let gcode = DrillProgramGenerator::new(params()).generate(&plan).unwrap();

    let a = gcode.find("; Hole A").unwrap();
    let b = gcode.find("; Hole B").unwrap();
    let c = gcode.find("; Hole C").unwrap();
    assert!(a < b && b < c);
}

#[test]
fn test_face_change_pauses_for_operator() {
    let plan = plan_for(vec![
        Hole::new("F1", 0.0, 0.0, 5.0, Face::Front),
        Hole::new("B1", 0.0, 0.0, 5.0, Face::Back),
    ]);
    let gcode = DrillProgramGenerator::new(params()).generate(&plan).unwrap();

    assert!(gcode.contains("; Face: front (1 holes)"));
    assert!(gcode.contains("M0 ; Reposition part for back face"));
    assert!(gcode.find("; Hole F1").unwrap() < gcode.find("M0 ;").unwrap());
}

#[test]
fn test_invalid_parameters_rejected() {
    let plan = plan_for(vec![Hole::new("H1", 0.0, 0.0, 5.0, Face::Front)]);

    let err = DrillProgramGenerator::new(DrillPressParameters {
        bottom_z: 1.0,
        ..params()
    })
    .generate(&plan)
    .unwrap_err();
    assert!(matches!(
        err,
        CamToolError::Parameter(ParameterError::Incompatible(_))
    ));

    let err = DrillProgramGenerator::new(DrillPressParameters {
        tool_diameter: 0.0,
        ..params()
    })
    .generate(&plan)
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid value for 'tool_diameter': must be > 0, got 0"
    );
    // Message is carried once, not repeated through the source chain
    assert!(std::error::Error::source(&err).is_none());

    let err = DrillProgramGenerator::new(DrillPressParameters {
        safe_z: -1.0,
        ..params()
    })
    .generate(&plan)
    .unwrap_err();
    assert!(matches!(err, CamToolError::Parameter(_)));
}

#[test]
fn test_depth_step_count_is_bounded() {
    // Subtracting 1 from 1e17 does not change it
    let far_above = DrillPressParameters {
        top_z: 1e17,
        bottom_z: 0.0,
        safe_z: 2e17,
        peck_depth: 1.0,
        ..params()
    };
    assert!(matches!(
        far_above.validate(),
        Err(ParameterError::InvalidValue { ref name, .. }) if name == "peck_depth"
    ));
    let plan = plan_for(vec![Hole::new("H1", 0.0, 0.0, 5.0, Face::Front)]);
    assert!(DrillProgramGenerator::new(far_above).generate(&plan).is_err());

    let tiny_pecks = DrillPressParameters {
        peck_depth: 1e-9,
        ..params()
    };
    assert!(tiny_pecks.validate().is_err());

    // Helical holes fall back to a 1 mm pitch without pecking
    let deep_helix = DrillPressParameters {
        bottom_z: -1e6,
        ..params()
    };
    assert!(deep_helix.validate().is_err());
}

#[test]
fn test_peck_levels_reach_bottom_exactly_once() {
    let plan = plan_for(vec![Hole::new("H1", 0.0, 0.0, 5.0, Face::Front)]);
    let gcode = DrillProgramGenerator::new(DrillPressParameters {
        bottom_z: -10.0,
        peck_depth: 3.0,
        ..params()
    })
    .generate(&plan)
    .unwrap();

    let plunges: Vec<&str> = gcode.lines().filter(|l| l.starts_with("G1 Z")).collect();
    assert_eq!(
        plunges,
        vec![
            "G1 Z-3.000 F100.0",
            "G1 Z-6.000 F100.0",
            "G1 Z-9.000 F100.0",
            "G1 Z-10.000 F100.0",
        ]
    );
}
