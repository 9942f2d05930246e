//! Design parser tests — the accept cases for the shipped designs and
//! the reject cases the validation must catch eagerly, before any
//! optimization work starts.

use topoform::design::{
    parse_design, parse_design_str, DesignArguments, Objective, ProblemKind, Side,
};
use topoform::types::TopoformError;

fn expect_config_error(json: &str) -> String {
    match parse_design_str("bad", json) {
        Err(TopoformError::Config(msg)) => msg,
        Err(other) => panic!("expected Config error, got {other:?}"),
        Ok(_) => panic!("expected Config error, design parsed"),
    }
}

// ─────────────────────────────────────────────────────────────
//  Accept: shipped designs
// ─────────────────────────────────────────────────────────────

#[test]
fn parses_triangle_design() {
    let design = parse_design("designs/triangle.json").unwrap();

    assert_eq!(design.name, "triangle");
    assert_eq!(design.parameters.problem, ProblemKind::Elasticity);
    assert_eq!(design.parameters.objective, Objective::MinimizeCompliance);
    assert_eq!(design.parameters.fraction, 0.5);

    let DesignArguments::Elasticity(args) = &design.arguments else {
        panic!("triangle must parse as an elasticity design");
    };
    assert_eq!(args.fixed_sides, vec![Side::Bottom]);
    assert!(args.tractions.is_empty());

    let force = args.force_region.as_ref().unwrap();
    assert_eq!(force.center, (0.5, 0.5));
    assert_eq!(force.value, (0.0, -10.0));
    assert_eq!(force.radius, 0.05);
}

#[test]
fn parses_bridge_design() {
    let design = parse_design("designs/bridge.json").unwrap();

    assert_eq!(design.parameters.width, 6.0);
    let DesignArguments::Elasticity(args) = &design.arguments else {
        panic!("bridge must parse as an elasticity design");
    };
    assert_eq!(args.fixed_sides, vec![Side::Left, Side::Right]);
    assert_eq!(args.tractions.len(), 1);
    assert_eq!(args.tractions[0].side, Side::Top);
    assert_eq!(args.tractions[0].value, (0.0, -0.1));
}

#[test]
fn parses_pipe_bend_design() {
    let design = parse_design("designs/pipe_bend.json").unwrap();

    assert_eq!(design.parameters.problem, ProblemKind::Fluid);
    assert_eq!(design.parameters.objective, Objective::MinimizePower);

    let DesignArguments::Fluid(args) = &design.arguments else {
        panic!("pipe_bend must parse as a fluid design");
    };
    assert_eq!(args.flows.len(), 2);
    assert_eq!(args.flows[0].side, Side::Left);
    assert_eq!(args.flows[1].rate, -1.0);
    assert_eq!(args.no_slip.as_deref(), Some(&[Side::Top, Side::Right][..]));
    assert!(args.zero_pressure.is_none());
    assert!(args.max_region.is_none());
}

// ─────────────────────────────────────────────────────────────
//  Reject: malformed designs
// ─────────────────────────────────────────────────────────────

#[test]
fn rejects_unknown_objective() {
    let msg = expect_config_error(
        r#"{
            "problem": "elasticity", "objective": "minimize_everything",
            "width": 1.0, "height": 1.0, "fraction": 0.5,
            "fixed_sides": ["left"]
        }"#,
    );
    assert!(msg.contains("minimize_everything"), "message was: {msg}");
}

#[test]
fn rejects_unknown_problem_kind() {
    expect_config_error(
        r#"{
            "problem": "thermal", "objective": "minimize_power",
            "width": 1.0, "height": 1.0, "fraction": 0.5,
            "flows": []
        }"#,
    );
}

#[test]
fn rejects_malformed_side() {
    let msg = expect_config_error(
        r#"{
            "problem": "elasticity", "objective": "minimize_compliance",
            "width": 1.0, "height": 1.0, "fraction": 0.5,
            "fixed_sides": ["north"]
        }"#,
    );
    assert!(msg.contains("north"), "message was: {msg}");
}

#[test]
fn rejects_wrong_length_tuple() {
    let msg = expect_config_error(
        r#"{
            "problem": "elasticity", "objective": "minimize_compliance",
            "width": 1.0, "height": 1.0, "fraction": 0.5,
            "fixed_sides": ["bottom"],
            "tractions": [
                {"side": "top", "center": 0.5, "length": 0.2, "value": [0.0, -1.0, 3.0]}
            ]
        }"#,
    );
    assert!(msg.contains("2 elements"), "message was: {msg}");
}

#[test]
fn rejects_out_of_range_fraction() {
    for fraction in ["0.0", "1.0", "1.2", "-0.1"] {
        expect_config_error(&format!(
            r#"{{
                "problem": "elasticity", "objective": "minimize_compliance",
                "width": 1.0, "height": 1.0, "fraction": {fraction},
                "fixed_sides": ["left"]
            }}"#,
        ));
    }
}

#[test]
fn rejects_nonpositive_domain() {
    expect_config_error(
        r#"{
            "problem": "elasticity", "objective": "minimize_compliance",
            "width": 0.0, "height": 1.0, "fraction": 0.5,
            "fixed_sides": ["left"]
        }"#,
    );
}

// ─────────────────────────────────────────────────────────────
//  Fluid boundary-condition consistency
// ─────────────────────────────────────────────────────────────

/// Without a pressure outlet, an incompressible domain cannot absorb a
/// net influx: unbalanced flows must be rejected.
#[test]
fn rejects_unbalanced_flow_without_zero_pressure() {
    let msg = expect_config_error(
        r#"{
            "problem": "fluid", "objective": "minimize_power",
            "width": 1.0, "height": 1.0, "fraction": 0.3,
            "flows": [
                {"side": "left", "center": 0.5, "length": 0.2, "rate": 1.0}
            ]
        }"#,
    );
    assert!(msg.contains("total flow"), "message was: {msg}");
}

/// The same unbalanced flows are fine once a zero-pressure boundary can
/// absorb the excess.
#[test]
fn accepts_unbalanced_flow_with_zero_pressure() {
    let design = parse_design_str(
        "outlet",
        r#"{
            "problem": "fluid", "objective": "minimize_power",
            "width": 1.0, "height": 1.0, "fraction": 0.3,
            "flows": [
                {"side": "left", "center": 0.5, "length": 0.2, "rate": 1.0}
            ],
            "zero_pressure": ["right"]
        }"#,
    )
    .unwrap();

    let DesignArguments::Fluid(args) = &design.arguments else {
        panic!("expected a fluid design");
    };
    assert_eq!(args.zero_pressure.as_deref(), Some(&[Side::Right][..]));
}

#[test]
fn rejects_maximize_flow_without_max_region() {
    let msg = expect_config_error(
        r#"{
            "problem": "fluid", "objective": "maximize_flow",
            "width": 1.0, "height": 1.0, "fraction": 0.3,
            "flows": [
                {"side": "left", "center": 0.5, "length": 0.2, "rate": 1.0},
                {"side": "right", "center": 0.5, "length": 0.2, "rate": -1.0}
            ]
        }"#,
    );
    assert!(msg.contains("max region"), "message was: {msg}");
}

#[test]
fn accepts_maximize_flow_with_max_region() {
    let design = parse_design_str(
        "mechanism",
        r#"{
            "problem": "fluid", "objective": "maximize_flow",
            "width": 1.0, "height": 1.0, "fraction": 0.3,
            "flows": [
                {"side": "left", "center": 0.5, "length": 0.2, "rate": 1.0},
                {"side": "right", "center": 0.5, "length": 0.2, "rate": -1.0}
            ],
            "max_region": {"center": [0.5, 0.5], "size": [0.2, 0.2]}
        }"#,
    )
    .unwrap();

    let DesignArguments::Fluid(args) = &design.arguments else {
        panic!("expected a fluid design");
    };
    let region = args.max_region.as_ref().unwrap();
    assert_eq!(region.center, (0.5, 0.5));
    assert_eq!(region.size, (0.2, 0.2));
}
