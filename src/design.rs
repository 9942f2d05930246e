//! Design-file data model and JSON parsing.
//!
//! A design file describes one optimization problem: the physical problem
//! kind, the objective, the domain rectangle and volume fraction, and the
//! problem-specific geometry (fixed sides and tractions for elasticity,
//! flow boundary conditions for fluid). Parsing is eager and strict —
//! a design that fails validation never reaches the optimizer.

use crate::types::TopoformError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

// ─────────────────────────────────────────────────────────────
//  Typed design model
// ─────────────────────────────────────────────────────────────

/// One side of the rectangular domain boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    fn from_name(name: &str) -> Result<Self, TopoformError> {
        match name {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            other => Err(TopoformError::Config(format!(
                "malformed side: '{other}' (legal sides are 'left', 'right', 'top' or 'bottom')"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
    Elasticity,
    Fluid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    MinimizePower,
    MaximizeFlow,
    MinimizeCompliance,
}

impl Objective {
    fn from_name(name: &str) -> Result<Self, TopoformError> {
        match name {
            "minimize_power" => Ok(Self::MinimizePower),
            "maximize_flow" => Ok(Self::MaximizeFlow),
            "minimize_compliance" => Ok(Self::MinimizeCompliance),
            other => Err(TopoformError::Config(format!(
                "got design with malformed objective: '{other}' (legal objectives are: \
                 minimize_power, maximize_flow, minimize_compliance)"
            ))),
        }
    }
}

/// Solver-level parameters shared by every problem kind.
#[derive(Debug, Clone)]
pub struct SolverParameters {
    pub problem: ProblemKind,
    pub objective: Objective,
    pub width: f64,
    pub height: f64,
    /// Target proportion of the domain to fill with material, in (0, 1).
    pub fraction: f64,
}

/// Prescribed in/outflow across a segment of one boundary side.
#[derive(Debug, Clone)]
pub struct Flow {
    pub side: Side,
    pub center: f64,
    pub length: f64,
    pub rate: f64,
}

/// Surface traction applied to a segment of one boundary side.
#[derive(Debug, Clone)]
pub struct Traction {
    pub side: Side,
    pub center: f64,
    pub length: f64,
    pub value: (f64, f64),
}

/// Circular region carrying a body force.
#[derive(Debug, Clone)]
pub struct ForceRegion {
    pub radius: f64,
    pub center: (f64, f64),
    pub value: (f64, f64),
}

/// Axis-aligned rectangular region given by center and size.
#[derive(Debug, Clone)]
pub struct Region {
    pub center: (f64, f64),
    pub size: (f64, f64),
}

/// Geometry arguments for an elasticity design.
#[derive(Debug, Clone)]
pub struct ElasticityDesign {
    pub force_region: Option<ForceRegion>,
    pub fixed_sides: Vec<Side>,
    pub tractions: Vec<Traction>,
}

/// Geometry arguments for a fluid design.
#[derive(Debug, Clone)]
pub struct FluidDesign {
    pub flows: Vec<Flow>,
    pub no_slip: Option<Vec<Side>>,
    pub zero_pressure: Option<Vec<Side>>,
    pub max_region: Option<Region>,
}

/// Problem-specific half of a parsed design.
#[derive(Debug, Clone)]
pub enum DesignArguments {
    Elasticity(ElasticityDesign),
    Fluid(FluidDesign),
}

/// A fully parsed and validated design.
#[derive(Debug, Clone)]
pub struct Design {
    /// File stem of the design file; names the snapshot directory.
    pub name: String,
    pub parameters: SolverParameters,
    pub arguments: DesignArguments,
}

// ─────────────────────────────────────────────────────────────
//  Raw file schema (serde)
// ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawDesign {
    problem: String,
    objective: String,
    width: f64,
    height: f64,
    fraction: f64,
    // elasticity
    force_region: Option<RawForceRegion>,
    fixed_sides: Option<Vec<String>>,
    tractions: Option<Vec<RawTraction>>,
    // fluid
    flows: Option<Vec<RawFlow>>,
    no_slip: Option<Vec<String>>,
    zero_pressure: Option<Vec<String>>,
    max_region: Option<RawRegion>,
}

#[derive(Deserialize)]
struct RawFlow {
    side: String,
    center: f64,
    length: f64,
    rate: f64,
}

#[derive(Deserialize)]
struct RawTraction {
    side: String,
    center: f64,
    length: f64,
    value: Vec<f64>,
}

#[derive(Deserialize)]
struct RawForceRegion {
    radius: f64,
    center: Vec<f64>,
    value: Vec<f64>,
}

#[derive(Deserialize)]
struct RawRegion {
    center: Vec<f64>,
    size: Vec<f64>,
}

/// Fixed-length pair extraction; rejects any other length.
fn to_pair(ray: &[f64]) -> Result<(f64, f64), TopoformError> {
    match ray {
        [a, b] => Ok((*a, *b)),
        _ => Err(TopoformError::Config(format!(
            "got array that should have had 2 elements, but had {} instead: {ray:?}",
            ray.len()
        ))),
    }
}

fn to_sides(names: &[String]) -> Result<Vec<Side>, TopoformError> {
    names.iter().map(|s| Side::from_name(s)).collect()
}

// ─────────────────────────────────────────────────────────────
//  Parsing & validation
// ─────────────────────────────────────────────────────────────

/// Parse a design from a JSON file. The design name is the file stem.
pub fn parse_design(path: impl AsRef<Path>) -> Result<Design, TopoformError> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| TopoformError::Config(format!("bad design path: {}", path.display())))?
        .to_string();
    let contents = fs::read_to_string(path)?;
    parse_design_str(&name, &contents)
}

/// Parse a design from a JSON string.
pub fn parse_design_str(name: &str, json: &str) -> Result<Design, TopoformError> {
    let raw: RawDesign = serde_json::from_str(json)?;

    let problem = match raw.problem.as_str() {
        "elasticity" => ProblemKind::Elasticity,
        "fluid" => ProblemKind::Fluid,
        other => {
            return Err(TopoformError::Config(format!(
                "unknown problem kind: '{other}' (legal kinds are 'elasticity' or 'fluid')"
            )))
        }
    };
    let objective = Objective::from_name(&raw.objective)?;

    if !(raw.width > 0.0) || !(raw.height > 0.0) {
        return Err(TopoformError::Config(format!(
            "domain dimensions must be positive, got {} x {}",
            raw.width, raw.height
        )));
    }
    if !(raw.fraction > 0.0 && raw.fraction < 1.0) {
        return Err(TopoformError::Config(format!(
            "volume fraction must lie strictly between 0 and 1, got {}",
            raw.fraction
        )));
    }

    let parameters = SolverParameters {
        problem,
        objective,
        width: raw.width,
        height: raw.height,
        fraction: raw.fraction,
    };

    let arguments = match problem {
        ProblemKind::Elasticity => DesignArguments::Elasticity(elasticity_arguments(&raw)?),
        ProblemKind::Fluid => DesignArguments::Fluid(fluid_arguments(&raw)?),
    };

    Ok(Design { name: name.to_string(), parameters, arguments })
}

fn elasticity_arguments(raw: &RawDesign) -> Result<ElasticityDesign, TopoformError> {
    let force_region = match &raw.force_region {
        Some(region) => Some(ForceRegion {
            radius: region.radius,
            center: to_pair(&region.center)?,
            value: to_pair(&region.value)?,
        }),
        None => None,
    };

    let fixed_sides = to_sides(raw.fixed_sides.as_deref().ok_or_else(|| {
        TopoformError::Config("elasticity design is missing 'fixed_sides'".into())
    })?)?;

    let mut tractions = Vec::new();
    if let Some(raw_tractions) = &raw.tractions {
        for traction in raw_tractions {
            tractions.push(Traction {
                side: Side::from_name(&traction.side)?,
                center: traction.center,
                length: traction.length,
                value: to_pair(&traction.value)?,
            });
        }
    }

    Ok(ElasticityDesign { force_region, fixed_sides, tractions })
}

fn fluid_arguments(raw: &RawDesign) -> Result<FluidDesign, TopoformError> {
    let mut flows = Vec::new();
    for flow in raw
        .flows
        .as_deref()
        .ok_or_else(|| TopoformError::Config("fluid design is missing 'flows'".into()))?
    {
        flows.push(Flow {
            side: Side::from_name(&flow.side)?,
            center: flow.center,
            length: flow.length,
            rate: flow.rate,
        });
    }

    let zero_pressure = match &raw.zero_pressure {
        Some(sides) if !sides.is_empty() => Some(to_sides(sides)?),
        _ => None,
    };

    // Incompressible flow needs either balanced flux or a pressure outlet;
    // the net-flow check therefore only applies without a zero-pressure
    // boundary.
    if zero_pressure.is_none() {
        let total_flow: f64 = flows.iter().map(|f| f.rate * f.length).sum();
        if total_flow.abs() > 1e-14 {
            return Err(TopoformError::Config(format!(
                "illegal design: total flow is {total_flow}, not 0"
            )));
        }
    }

    let no_slip = match &raw.no_slip {
        Some(sides) if !sides.is_empty() => Some(to_sides(sides)?),
        _ => None,
    };

    let max_region = match &raw.max_region {
        Some(region) => Some(Region {
            center: to_pair(&region.center)?,
            size: to_pair(&region.size)?,
        }),
        None => {
            if raw.objective == "maximize_flow" {
                return Err(TopoformError::Config(
                    "got maximize flow objective with no max region".into(),
                ));
            }
            None
        }
    };

    Ok(FluidDesign { flows, no_slip, zero_pressure, max_region })
}
