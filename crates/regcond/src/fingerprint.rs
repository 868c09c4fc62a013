//! Change-detection fingerprints for merge inputs.
//!
//! The resolver is a pure function of `(canvas, slots)`, so a stable digest
//! of those inputs is enough to decide whether a graph needs to re-run the
//! merge. Every field that influences the output feeds the digest: canvas
//! size, slot presence and order, geometry variant and raw values, strength,
//! and each entry's embedding and attributes. Floats are hashed by bit
//! pattern, so `0.0` and `-0.0` differ.

use std::fmt;

use serde::Serialize;

use regcond_core::geometry::Canvas;

use crate::conditioning::{AttributeValue, Attributes, ConditioningEntry};
use crate::region::{RegionDescriptor, RegionGeometry};

const DOMAIN: &[u8] = b"regcond.merge.v1";

/// A 256-bit digest of merge inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Digest everything that affects [`merge_regions`](crate::merge_regions).
///
/// Embeddings are serialized with `serde_json`; serialization failures are
/// returned rather than skipped so two different embeddings never collide
/// on an empty digest.
pub fn merge_fingerprint<E: Serialize>(
    canvas: Canvas,
    slots: &[Option<RegionDescriptor<E>>],
) -> Result<Fingerprint, serde_json::Error> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(DOMAIN);
    hasher.update(&canvas.width.to_le_bytes());
    hasher.update(&canvas.height.to_le_bytes());
    write_len(&mut hasher, slots.len());

    for slot in slots {
        match slot {
            None => {
                hasher.update(&[0]);
            }
            Some(region) => {
                hasher.update(&[1]);
                hash_region(&mut hasher, region)?;
            }
        }
    }

    Ok(Fingerprint(*hasher.finalize().as_bytes()))
}

fn hash_region<E: Serialize>(
    hasher: &mut blake3::Hasher,
    region: &RegionDescriptor<E>,
) -> Result<(), serde_json::Error> {
    match region.geometry {
        RegionGeometry::Normalized { x, y, w, h } => {
            hasher.update(&[b'n']);
            for v in [x, y, w, h] {
                hasher.update(&v.to_bits().to_le_bytes());
            }
        }
        RegionGeometry::Absolute { x, y, w, h } => {
            hasher.update(&[b'a']);
            for v in [x, y, w, h] {
                hasher.update(&v.to_le_bytes());
            }
        }
    }
    hasher.update(&region.strength.to_bits().to_le_bytes());

    write_len(hasher, region.conditioning.len());
    for entry in &region.conditioning {
        hash_entry(hasher, entry)?;
    }
    Ok(())
}

fn hash_entry<E: Serialize>(
    hasher: &mut blake3::Hasher,
    entry: &ConditioningEntry<E>,
) -> Result<(), serde_json::Error> {
    write_bytes(hasher, &serde_json::to_vec(entry.embedding())?);
    hash_attributes(hasher, entry.attributes())
}

fn hash_attributes(
    hasher: &mut blake3::Hasher,
    attributes: &Attributes,
) -> Result<(), serde_json::Error> {
    write_len(hasher, attributes.len());
    for (key, value) in attributes.iter() {
        write_bytes(hasher, key.as_bytes());
        match value {
            AttributeValue::Mask(mask) => {
                hasher.update(&[b'm']);
                hasher.update(&mask.width().to_le_bytes());
                hasher.update(&mask.height().to_le_bytes());
                for v in mask.values() {
                    hasher.update(&v.to_bits().to_le_bytes());
                }
            }
            AttributeValue::Bool(b) => {
                hasher.update(&[b'b', u8::from(*b)]);
            }
            AttributeValue::Int(i) => {
                hasher.update(&[b'i']);
                hasher.update(&i.to_le_bytes());
            }
            AttributeValue::Float(f) => {
                hasher.update(&[b'f']);
                hasher.update(&f.to_bits().to_le_bytes());
            }
            AttributeValue::Text(s) => {
                hasher.update(&[b's']);
                write_bytes(hasher, s.as_bytes());
            }
            AttributeValue::Json(v) => {
                hasher.update(&[b'j']);
                write_bytes(hasher, &serde_json::to_vec(v)?);
            }
        }
    }
    Ok(())
}

fn write_len(hasher: &mut blake3::Hasher, len: usize) {
    hasher.update(&(len as u64).to_le_bytes());
}

fn write_bytes(hasher: &mut blake3::Hasher, bytes: &[u8]) {
    write_len(hasher, bytes.len());
    hasher.update(bytes);
}
