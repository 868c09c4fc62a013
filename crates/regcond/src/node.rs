//! Graph node registry and the input validation layer.
//!
//! Each operation is exposed to a node graph under a stable type name with a
//! display name, a category, and typed inputs carrying defaults and bounds.
//! The bounds are enforced here, never in the builders or the resolver: a
//! graph front end calls [`NodeInputs::validate`] before building anything.

use serde::Serialize;

use regcond_core::geometry::Canvas;

use crate::error::{Result, ValidationError};
use crate::region::{PercentageRegion, PixelRegion};

/// Category every region node is listed under.
pub const CATEGORY: &str = "Region Conditioning";

/// Output type of the two builder nodes and input type of merge slots.
pub const REGION_SPEC_TYPE: &str = "REGION_SPEC";

/// Output type of the merge node.
pub const CONDITIONING_TYPE: &str = "CONDITIONING";

/// Value kind and domain of a node input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputKind {
    Conditioning,
    Int {
        default: i64,
        min: i64,
        max: i64,
    },
    Float {
        default: f64,
        min: f64,
        max: f64,
        step: f64,
    },
}

/// One named node input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InputSpec {
    pub name: &'static str,
    #[serde(flatten)]
    pub kind: InputKind,
}

impl InputSpec {
    const fn float(name: &'static str, default: f64, min: f64, max: f64, step: f64) -> Self {
        Self {
            name,
            kind: InputKind::Float {
                default,
                min,
                max,
                step,
            },
        }
    }

    const fn int(name: &'static str, default: i64, min: i64, max: i64) -> Self {
        Self {
            name,
            kind: InputKind::Int { default, min, max },
        }
    }

    const fn conditioning() -> Self {
        Self {
            name: "conditioning",
            kind: InputKind::Conditioning,
        }
    }

    /// Numeric default, if the input has one.
    pub fn default_value(&self) -> Option<f64> {
        match self.kind {
            InputKind::Conditioning => None,
            InputKind::Int { default, .. } => Some(default as f64),
            InputKind::Float { default, .. } => Some(default),
        }
    }

    /// Check `value` against this input's bounds.
    pub fn check(&self, node: &'static str, value: f64) -> Result<()> {
        let (min, max) = match self.kind {
            InputKind::Conditioning => return Ok(()),
            InputKind::Int { min, max, .. } => (min as f64, max as f64),
            InputKind::Float { min, max, .. } => (min, max),
        };
        if !value.is_finite() {
            return Err(ValidationError::NotFinite {
                node,
                input: self.name,
                value,
            });
        }
        if value < min || value > max {
            return Err(ValidationError::OutOfRange {
                node,
                input: self.name,
                value,
                min,
                max,
            });
        }
        Ok(())
    }
}

const STRENGTH: InputSpec = InputSpec::float("strength", 1.0, 0.0, 10.0, 0.01);

const PCT_INPUTS: [InputSpec; 6] = [
    InputSpec::conditioning(),
    InputSpec::float("x", 0.0, 0.0, 100.0, 1.0),
    InputSpec::float("y", 0.0, 0.0, 100.0, 1.0),
    InputSpec::float("width", 100.0, 0.0, 100.0, 1.0),
    InputSpec::float("height", 100.0, 0.0, 100.0, 1.0),
    STRENGTH,
];

const PX_INPUTS: [InputSpec; 6] = [
    InputSpec::conditioning(),
    InputSpec::int("x", 0, 0, 8192),
    InputSpec::int("y", 0, 0, 8192),
    InputSpec::int("width", 512, 1, 8192),
    InputSpec::int("height", 512, 1, 8192),
    STRENGTH,
];

const MERGE_INPUTS: [InputSpec; 2] = [
    InputSpec::int("width", 512, 64, 8192),
    InputSpec::int("height", 512, 64, 8192),
];

/// The registered graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    RegionSpecPct,
    RegionSpecPx,
    RegionMerge,
}

impl NodeKind {
    /// Every node, in registration order.
    pub const ALL: [NodeKind; 3] = [Self::RegionSpecPct, Self::RegionSpecPx, Self::RegionMerge];

    pub const fn type_name(self) -> &'static str {
        match self {
            Self::RegionSpecPct => "RegionConditionSpecPct",
            Self::RegionSpecPx => "RegionConditionSpecPx",
            Self::RegionMerge => "RegionConditionMerge",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::RegionSpecPct => "Region Condition Spec (Percentage)",
            Self::RegionSpecPx => "Region Condition Spec (Pixels)",
            Self::RegionMerge => "Region Condition Merge",
        }
    }

    pub const fn category(self) -> &'static str {
        CATEGORY
    }

    pub const fn output_type(self) -> &'static str {
        match self {
            Self::RegionSpecPct | Self::RegionSpecPx => REGION_SPEC_TYPE,
            Self::RegionMerge => CONDITIONING_TYPE,
        }
    }

    /// Fixed inputs. The merge node's region slots are dynamic and listed
    /// separately by [`crate::slots::RegionSlots`].
    pub fn inputs(self) -> &'static [InputSpec] {
        match self {
            Self::RegionSpecPct => &PCT_INPUTS,
            Self::RegionSpecPx => &PX_INPUTS,
            Self::RegionMerge => &MERGE_INPUTS,
        }
    }

    pub fn input(self, name: &str) -> Result<&'static InputSpec> {
        self.inputs()
            .iter()
            .find(|spec| spec.name == name)
            .ok_or_else(|| ValidationError::UnknownInput {
                node: self.type_name(),
                input: name.to_owned(),
            })
    }

    pub fn from_type_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.type_name() == name)
            .ok_or_else(|| ValidationError::UnknownNode(name.to_owned()))
    }

    /// Check a named numeric input against its bounds.
    pub fn check(self, input: &str, value: f64) -> Result<()> {
        self.input(input)?.check(self.type_name(), value)
    }

    pub fn info(self) -> NodeInfo {
        NodeInfo {
            type_name: self.type_name(),
            display_name: self.display_name(),
            category: self.category(),
            output_type: self.output_type(),
            inputs: self.inputs(),
        }
    }
}

/// Serializable description of a registered node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeInfo {
    pub type_name: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub output_type: &'static str,
    pub inputs: &'static [InputSpec],
}

/// All registered nodes, in registration order.
pub fn registry() -> Vec<NodeInfo> {
    NodeKind::ALL.into_iter().map(NodeKind::info).collect()
}

/// Node inputs that can be checked against a node's declared bounds.
pub trait NodeInputs {
    const KIND: NodeKind;

    /// Numeric inputs by name.
    fn values(&self) -> Vec<(&'static str, f64)>;

    /// Reject the first value outside its declared bounds.
    fn validate(&self) -> Result<()> {
        for (name, value) in self.values() {
            Self::KIND.check(name, value)?;
        }
        Ok(())
    }
}

impl NodeInputs for PercentageRegion {
    const KIND: NodeKind = NodeKind::RegionSpecPct;

    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
            ("strength", f64::from(self.strength)),
        ]
    }
}

impl NodeInputs for PixelRegion {
    const KIND: NodeKind = NodeKind::RegionSpecPx;

    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("x", f64::from(self.x)),
            ("y", f64::from(self.y)),
            ("width", f64::from(self.width)),
            ("height", f64::from(self.height)),
            ("strength", f64::from(self.strength)),
        ]
    }
}

impl NodeInputs for Canvas {
    const KIND: NodeKind = NodeKind::RegionMerge;

    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("width", f64::from(self.width)),
            ("height", f64::from(self.height)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lists_nodes_in_order() {
        let names: Vec<_> = registry().iter().map(|n| n.type_name).collect();
        assert_eq!(
            names,
            [
                "RegionConditionSpecPct",
                "RegionConditionSpecPx",
                "RegionConditionMerge"
            ]
        );
        assert!(registry().iter().all(|n| n.category == CATEGORY));
    }

    #[test]
    fn type_names_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_type_name(kind.type_name()), Ok(kind));
        }
        assert_eq!(
            NodeKind::from_type_name("LoadImageFolder"),
            Err(ValidationError::UnknownNode("LoadImageFolder".into()))
        );
    }

    #[test]
    fn defaults_are_within_bounds() {
        for kind in NodeKind::ALL {
            for spec in kind.inputs() {
                if let Some(default) = spec.default_value() {
                    assert_eq!(spec.check(kind.type_name(), default), Ok(()), "{}", spec.name);
                }
            }
        }
        assert_eq!(PercentageRegion::default().validate(), Ok(()));
        assert_eq!(PixelRegion::default().validate(), Ok(()));
        assert_eq!(Canvas::new(512, 512).validate(), Ok(()));
    }

    #[test]
    fn percentage_over_hundred_is_rejected() {
        let region = PercentageRegion {
            width: 120.0,
            ..PercentageRegion::default()
        };
        let err = region.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "RegionConditionSpecPct.width = 120 is outside [0, 100]"
        );
    }

    #[test]
    fn zero_pixel_width_is_rejected() {
        let region = PixelRegion {
            width: 0,
            ..PixelRegion::default()
        };
        assert!(matches!(
            region.validate(),
            Err(ValidationError::OutOfRange { input: "width", .. })
        ));
    }

    #[test]
    fn small_canvas_is_rejected() {
        assert!(matches!(
            Canvas::new(32, 512).validate(),
            Err(ValidationError::OutOfRange { node: "RegionConditionMerge", input: "width", .. })
        ));
    }

    #[test]
    fn nan_strength_is_not_finite() {
        let region = PercentageRegion {
            strength: f32::NAN,
            ..PercentageRegion::default()
        };
        assert!(matches!(
            region.validate(),
            Err(ValidationError::NotFinite { input: "strength", .. })
        ));
    }

    #[test]
    fn unknown_input_is_reported() {
        assert_eq!(
            NodeKind::RegionMerge.check("depth", 1.0),
            Err(ValidationError::UnknownInput {
                node: "RegionConditionMerge",
                input: "depth".into()
            })
        );
    }
}
