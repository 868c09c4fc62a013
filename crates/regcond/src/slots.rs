//! Dynamic region inputs of the merge node.
//!
//! A fresh merge node exposes a single `region_spec1` slot. Whenever every
//! slot from `region_spec1` up to the last one is connected, a new empty slot
//! is appended so there is always room for one more region. Slots are never
//! removed; a disconnected slot simply reads as absent and the resolver skips
//! it.

use regcond_core::geometry::Canvas;

use crate::conditioning::ConditioningSet;
use crate::error::{Result, ValidationError};
use crate::merge::merge_regions;
use crate::node::NodeKind;
use crate::region::RegionDescriptor;

/// Name prefix of the merge node's region slots.
pub const SLOT_PREFIX: &str = "region_spec";

/// Name of the 1-based slot `index`.
pub fn slot_name(index: usize) -> String {
    format!("{SLOT_PREFIX}{index}")
}

/// Ordered, growable region slots of one merge node.
#[derive(Debug)]
pub struct RegionSlots<E> {
    slots: Vec<Option<RegionDescriptor<E>>>,
}

impl<E> Default for RegionSlots<E> {
    fn default() -> Self {
        Self { slots: vec![None] }
    }
}

impl<E> RegionSlots<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots, connected or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of connected slots.
    pub fn connected(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn names(&self) -> Vec<String> {
        (1..=self.slots.len()).map(slot_name).collect()
    }

    /// Slot contents in slot order, ready for [`merge_regions`].
    pub fn descriptors(&self) -> &[Option<RegionDescriptor<E>>] {
        &self.slots
    }

    /// Connect `descriptor` to the named slot, replacing any previous one.
    pub fn connect(&mut self, name: &str, descriptor: RegionDescriptor<E>) -> Result<()> {
        let index = self.index_of(name)?;
        self.slots[index] = Some(descriptor);
        self.grow();
        Ok(())
    }

    /// Disconnect the named slot, returning what was connected.
    pub fn disconnect(&mut self, name: &str) -> Result<Option<RegionDescriptor<E>>> {
        let index = self.index_of(name)?;
        let previous = self.slots[index].take();
        self.grow();
        Ok(previous)
    }

    /// Connect to the first free slot and return its name.
    pub fn push(&mut self, descriptor: RegionDescriptor<E>) -> String {
        let index = match self.slots.iter().position(Option::is_none) {
            Some(index) => index,
            None => {
                self.slots.push(None);
                self.slots.len() - 1
            }
        };
        self.slots[index] = Some(descriptor);
        self.grow();
        slot_name(index + 1)
    }

    /// Merge every connected region on `canvas`.
    pub fn merge(&self, canvas: Canvas) -> ConditioningSet<E> {
        merge_regions(canvas, &self.slots)
    }

    fn grow(&mut self) {
        let leading = self.slots.iter().take_while(|s| s.is_some()).count();
        if leading == self.slots.len() {
            self.slots.push(None);
        }
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        name.strip_prefix(SLOT_PREFIX)
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|&n| n >= 1 && n <= self.slots.len())
            .map(|n| n - 1)
            .ok_or_else(|| ValidationError::UnknownInput {
                node: NodeKind::RegionMerge.type_name(),
                input: name.to_owned(),
            })
    }
}

impl<E> FromIterator<RegionDescriptor<E>> for RegionSlots<E> {
    fn from_iter<I: IntoIterator<Item = RegionDescriptor<E>>>(iter: I) -> Self {
        let mut slots = Self::new();
        for descriptor in iter {
            slots.push(descriptor);
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditioning::ConditioningEntry;

    fn region(label: &'static str) -> RegionDescriptor<&'static str> {
        RegionDescriptor::percentage(
            vec![ConditioningEntry::new(label)].into(),
            0.0,
            0.0,
            100.0,
            100.0,
            1.0,
        )
    }

    #[test]
    fn fresh_node_has_one_slot() {
        let slots: RegionSlots<&str> = RegionSlots::new();
        assert_eq!(slots.names(), ["region_spec1"]);
        assert_eq!(slots.connected(), 0);
    }

    #[test]
    fn connecting_last_slot_appends_one() {
        let mut slots = RegionSlots::new();
        slots.connect("region_spec1", region("a")).unwrap();
        assert_eq!(slots.names(), ["region_spec1", "region_spec2"]);
        slots.connect("region_spec2", region("b")).unwrap();
        assert_eq!(slots.len(), 3);
    }

    #[test]
    fn disconnect_keeps_slots() {
        let mut slots = RegionSlots::new();
        slots.connect("region_spec1", region("a")).unwrap();
        slots.connect("region_spec2", region("b")).unwrap();
        assert!(slots.disconnect("region_spec1").unwrap().is_some());
        assert_eq!(slots.len(), 3);
        assert_eq!(slots.connected(), 1);

        // Reconnecting the gap does not add a slot: region_spec3 is still free.
        slots.connect("region_spec1", region("c")).unwrap();
        assert_eq!(slots.len(), 3);
    }

    #[test]
    fn gaps_are_skipped_in_merge_order() {
        let mut slots = RegionSlots::new();
        slots.connect("region_spec1", region("a")).unwrap();
        slots.connect("region_spec2", region("b")).unwrap();
        slots.connect("region_spec3", region("c")).unwrap();
        slots.disconnect("region_spec2").unwrap();

        let merged = slots.merge(Canvas::new(8, 8));
        let labels: Vec<_> = merged.iter().map(|e| *e.embedding()).collect();
        assert_eq!(labels, ["a", "c"]);
    }

    #[test]
    fn push_fills_first_gap() {
        let mut slots: RegionSlots<_> = [region("a"), region("b")].into_iter().collect();
        slots.disconnect("region_spec1").unwrap();
        assert_eq!(slots.push(region("c")), "region_spec1");
        assert_eq!(slots.push(region("d")), "region_spec3");
        assert_eq!(slots.len(), 4);
    }

    #[test]
    fn unknown_slot_is_rejected() {
        let mut slots = RegionSlots::new();
        for bad in ["region_spec0", "region_spec2", "region", "mask1"] {
            assert!(matches!(
                slots.connect(bad, region("a")),
                Err(ValidationError::UnknownInput { .. })
            ));
        }
    }
}
