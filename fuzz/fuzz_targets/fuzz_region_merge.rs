#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use regcond::{Canvas, ConditioningEntry, ConditioningSet, RegionDescriptor, merge_regions};

#[derive(Debug, Arbitrary)]
enum Geometry {
    Pct { x: f64, y: f64, w: f64, h: f64 },
    Px { x: u32, y: u32, w: u32, h: u32 },
}

#[derive(Debug, Arbitrary)]
struct Region {
    geometry: Geometry,
    strength: f32,
    entries: u8,
}

#[derive(Debug, Arbitrary)]
struct Input {
    width: u8,
    height: u8,
    regions: Vec<Option<Region>>,
}

fuzz_target!(|input: Input| {
    // Keep canvases small: 1..=256 on each side.
    let canvas = Canvas::new(u32::from(input.width) + 1, u32::from(input.height) + 1);

    let slots: Vec<Option<RegionDescriptor<u32>>> = input
        .regions
        .iter()
        .take(16)
        .enumerate()
        .map(|(i, region)| {
            region.as_ref().map(|r| {
                let cond: ConditioningSet<u32> = (0..u32::from(r.entries % 4))
                    .map(|j| ConditioningEntry::new(i as u32 * 4 + j))
                    .collect();
                match r.geometry {
                    Geometry::Pct { x, y, w, h } => {
                        RegionDescriptor::percentage(cond, x, y, w, h, r.strength)
                    }
                    Geometry::Px { x, y, w, h } => {
                        RegionDescriptor::pixels(cond, x, y, w, h, r.strength)
                    }
                }
            })
        })
        .collect();

    let merged = merge_regions(canvas, &slots);

    let expected: usize = slots.iter().flatten().map(|r| r.conditioning.len()).sum();
    assert_eq!(merged.len(), expected, "entry count changed");

    let bounds = canvas.bounds();
    let mut owners = slots
        .iter()
        .flatten()
        .flat_map(|r| std::iter::repeat_n(r, r.conditioning.len()));
    for entry in merged.iter() {
        let region = owners.next().expect("one owner per entry");
        let mask = entry.mask().expect("every merged entry carries a mask");
        assert_eq!(mask.width(), canvas.width, "mask width");
        assert_eq!(mask.height(), canvas.height, "mask height");
        assert_eq!(entry.set_area_to_bounds(), Some(false));

        let painted = region.geometry.resolve(canvas).intersection_opt(&bounds);
        for (y, row) in mask.view().outer_iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                let inside = painted.is_some_and(|r| r.contains(x as i64, y as i64));
                if inside {
                    assert!(
                        v.to_bits() == region.strength.to_bits(),
                        "painted value differs from strength"
                    );
                } else {
                    assert_eq!(v, 0.0, "value outside the region");
                }
            }
        }
    }
});
