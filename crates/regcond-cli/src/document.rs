//! Graph documents: the JSON form of one merge node and its connected regions.
//!
//! ```json
//! {
//!   "width": 512,
//!   "height": 512,
//!   "regions": [
//!     { "mode": "pct", "width": 50, "conditioning": [{ "embedding": "sky" }] },
//!     null,
//!     { "mode": "px", "x": 256, "y": 0, "width": 256, "height": 512,
//!       "strength": 0.8, "conditioning": [{ "embedding": [0.1, 0.2] }] }
//!   ]
//! }
//! ```
//!
//! Missing numeric inputs take the node defaults. `null` entries are
//! disconnected slots. Embeddings are kept as opaque JSON values.

use std::fs;
use std::path::Path;

use regcond::node::NodeInputs;
use regcond::{
    AttributeValue, Attributes, Canvas, ConditioningEntry, ConditioningSet, PercentageRegion,
    PixelRegion, RegionDescriptor,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{CliError, Result};

/// Default canvas edge when a document omits it.
pub const DEFAULT_CANVAS_EDGE: u32 = 512;

/// Embedding type carried through the CLI.
pub type Embedding = Value;

/// Descriptor slots ready for the resolver.
pub type Slots = Vec<Option<RegionDescriptor<Embedding>>>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphDocument {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub regions: Vec<Option<RegionInput>>,
}

/// One region node's inputs, tagged by coordinate mode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RegionInput {
    Pct {
        x: Option<f64>,
        y: Option<f64>,
        width: Option<f64>,
        height: Option<f64>,
        strength: Option<f32>,
        #[serde(default)]
        conditioning: Vec<EntryInput>,
    },
    Px {
        x: Option<u32>,
        y: Option<u32>,
        width: Option<u32>,
        height: Option<u32>,
        strength: Option<f32>,
        #[serde(default)]
        conditioning: Vec<EntryInput>,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryInput {
    pub embedding: Value,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl EntryInput {
    fn to_entry(&self) -> ConditioningEntry<Embedding> {
        let attributes: Attributes = self
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), AttributeValue::from_json(v.clone())))
            .collect();
        ConditioningEntry::with_attributes(self.embedding.clone(), attributes)
    }
}

/// A region with node defaults applied, before it is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegionParams {
    Pct(PercentageRegion),
    Px(PixelRegion),
}

impl RegionParams {
    pub fn validate(&self) -> regcond::Result<()> {
        match self {
            Self::Pct(region) => region.validate(),
            Self::Px(region) => region.validate(),
        }
    }

    pub fn build(&self, conditioning: ConditioningSet<Embedding>) -> RegionDescriptor<Embedding> {
        match self {
            Self::Pct(region) => region.build(conditioning),
            Self::Px(region) => region.build(conditioning),
        }
    }
}

impl RegionInput {
    /// Fill missing inputs with the node defaults.
    pub fn params(&self) -> RegionParams {
        match *self {
            Self::Pct {
                x,
                y,
                width,
                height,
                strength,
                ..
            } => {
                let d = PercentageRegion::default();
                RegionParams::Pct(PercentageRegion {
                    x: x.unwrap_or(d.x),
                    y: y.unwrap_or(d.y),
                    width: width.unwrap_or(d.width),
                    height: height.unwrap_or(d.height),
                    strength: strength.unwrap_or(d.strength),
                })
            }
            Self::Px {
                x,
                y,
                width,
                height,
                strength,
                ..
            } => {
                let d = PixelRegion::default();
                RegionParams::Px(PixelRegion {
                    x: x.unwrap_or(d.x),
                    y: y.unwrap_or(d.y),
                    width: width.unwrap_or(d.width),
                    height: height.unwrap_or(d.height),
                    strength: strength.unwrap_or(d.strength),
                })
            }
        }
    }

    pub fn conditioning(&self) -> ConditioningSet<Embedding> {
        let (Self::Pct { conditioning, .. } | Self::Px { conditioning, .. }) = self;
        conditioning.iter().map(EntryInput::to_entry).collect()
    }
}

impl GraphDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| CliError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(
            self.width.unwrap_or(DEFAULT_CANVAS_EDGE),
            self.height.unwrap_or(DEFAULT_CANVAS_EDGE),
        )
    }

    /// Check the canvas and every connected region against node bounds.
    /// Slots are numbered from 1, matching `region_spec{n}`.
    pub fn validate(&self) -> Result<()> {
        self.canvas().validate().map_err(CliError::InvalidCanvas)?;
        for (i, region) in self.regions.iter().enumerate() {
            if let Some(region) = region {
                region
                    .params()
                    .validate()
                    .map_err(|source| CliError::InvalidRegion { slot: i + 1, source })?;
            }
        }
        Ok(())
    }

    /// Validate, then build descriptor slots in document order.
    pub fn build(&self) -> Result<(Canvas, Slots)> {
        self.validate()?;
        let slots = self
            .regions
            .iter()
            .map(|region| {
                region
                    .as_ref()
                    .map(|r| r.params().build(r.conditioning()))
            })
            .collect();

        tracing::debug!(regions = self.regions.len(), "built graph document");

        Ok((self.canvas(), slots))
    }
}
