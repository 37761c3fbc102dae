//! Assigning spaces to the rooms that contain them, and merging
//! touching floor segments into shared floors.

use anyhow::{Context, Result};
use crate::base::HasIdentifier;
use crate::geom::point::Point;
use crate::geom::polygon::merge::try_merge;
use crate::geom::polygon::Polygon;
use crate::geom::solid::Solid;
use crate::model::Room;
use crate::space::floor::Floor;
use crate::space::segment::FloorSegment;
use crate::space::Space;

/// How far above the floor plane reference points are lifted before
/// the containment test, so points on a room's bottom face land
/// clearly inside the solid.
pub const DEFAULT_OFFSET_DIST: f64 = 0.1;

/// Result of a hosting pass. Spaces that matched no room are returned,
/// never dropped.
#[derive(Debug, Clone)]
pub struct HostingOutcome {
    pub hosted: Vec<Space>,
    pub unhosted: Vec<Space>,
}

/// Assigns each space to the first room whose solid contains any of
/// the space's lifted floor-segment reference points.
///
/// Lifting happens along the world Z axis by `offset_dist`. Each space
/// is assigned at most once; rooms are tried in the given order.
pub fn host_spaces_in_rooms(
    rooms: &[Room],
    spaces: Vec<Space>,
    offset_dist: f64,
) -> Result<HostingOutcome> {
    let lift = crate::geom::vector::Vector::new(0.0, 0.0, offset_dist);
    let solids: Vec<(&Room, Solid)> = rooms
        .iter()
        .map(|room| {
            let solid = room
                .solid()
                .with_context(|| format!("room {} has no valid solid", room.identifier()))?;
            Ok((room, solid))
        })
        .collect::<Result<_>>()?;

    let mut hosted = Vec::new();
    let mut unhosted = Vec::new();
    'spaces: for mut space in spaces {
        let probes: Vec<Point> = space
            .reference_points()
            .into_iter()
            .map(|p| p + lift)
            .collect();
        for (room, solid) in &solids {
            if probes.iter().any(|p| solid.is_point_inside(*p)) {
                space.host = Some(room.identifier().to_string());
                hosted.push(space);
                continue 'spaces;
            }
        }
        space.host = None;
        unhosted.push(space);
    }
    Ok(HostingOutcome { hosted, unhosted })
}

/// A pair of segment polygons that should have merged but could not.
/// Both polygons are returned so a caller can preview the offenders.
#[derive(Debug, Clone)]
pub struct MergeFailure {
    pub first: Polygon,
    pub second: Polygon,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct FloorGrouping {
    pub floors: Vec<Floor>,
    pub failures: Vec<MergeFailure>,
}

struct MergeClass {
    segments: Vec<FloorSegment>,
    outline: Option<Polygon>,
}

/// Groups floor segments into floors by merging polygons that share
/// an edge run in the same plane.
///
/// Merge errors (overlapping or self-intersecting outlines) are
/// collected, not fatal: the offending segment falls back to its own
/// single-segment floor and the pair is reported in `failures`.
pub fn group_floor_segments(segments: Vec<FloorSegment>) -> FloorGrouping {
    let mut classes: Vec<MergeClass> = Vec::new();
    let mut failures: Vec<MergeFailure> = Vec::new();

    'segments: for segment in segments {
        let Some(geometry) = segment.geometry.clone() else {
            classes.push(MergeClass {
                segments: vec![segment],
                outline: None,
            });
            continue;
        };
        for class in classes.iter_mut() {
            let Some(outline) = class.outline.as_ref() else {
                continue;
            };
            match try_merge(outline, &geometry) {
                Ok(Some(union)) => {
                    class.segments.push(segment);
                    class.outline = Some(union);
                    consolidate(&mut classes);
                    continue 'segments;
                }
                Ok(None) => {}
                Err(err) => {
                    failures.push(MergeFailure {
                        first: outline.clone(),
                        second: geometry.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        classes.push(MergeClass {
            segments: vec![segment],
            outline: Some(geometry),
        });
    }

    let floors = classes
        .into_iter()
        .map(|class| {
            let name = class
                .segments
                .first()
                .map(|s| s.base.display_name.clone())
                .unwrap_or_default();
            let mut floor = Floor::new(&name);
            floor.geometry = class.outline;
            for segment in class.segments {
                floor.add_floor_segment(segment);
            }
            floor
        })
        .collect();
    FloorGrouping { floors, failures }
}

/// Re-merges classes that became adjacent after a union grew. Pairs
/// that error here were already reported on insertion and stay apart.
fn consolidate(classes: &mut Vec<MergeClass>) {
    loop {
        let mut absorbed: Option<(usize, usize, Polygon)> = None;
        'scan: for i in 0..classes.len() {
            for j in (i + 1)..classes.len() {
                let (Some(a), Some(b)) = (classes[i].outline.as_ref(), classes[j].outline.as_ref())
                else {
                    continue;
                };
                if let Ok(Some(union)) = try_merge(a, b) {
                    absorbed = Some((i, j, union));
                    break 'scan;
                }
            }
        }
        match absorbed {
            Some((i, j, union)) => {
                let taken = classes.remove(j);
                classes[i].segments.extend(taken.segments);
                classes[i].outline = Some(union);
            }
            None => break,
        }
    }
}
