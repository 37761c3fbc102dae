//! PHPP-style shading dimensions solved from window and context
//! geometry.
//!
//! For every aperture the solver derives up to three obstruction pairs
//! used downstream to index shading tables: horizon (`d_hori`,
//! `h_hori`), overhang (`d_over`, `o_over`) and side reveal
//! (`d_reveal`, `o_reveal`). Obstructions are the model's orphaned
//! shades; the building envelope itself does not shade its own windows
//! and self-shading recesses are represented by the glazing inset
//! instead.

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::envelope::WindowFrameElement;
use crate::geom::polygon::Polygon;
use crate::geom::segment::{segment_crosses_polygon, LineSegment};
use crate::geom::EPS;
use crate::model::{Aperture, Model};
use crate::properties::PhModel;
use crate::{Point, Vector};

/// How far the glazing sits behind the aperture plane, in model units.
pub const DEFAULT_INSET_DIST: f64 = 0.1;

/// Reach of each probe surface. Obstructions beyond this distance are
/// ignored.
const PROBE_EXTENT: f64 = 1000.0;

/// Solved PHPP shading inputs for one aperture. `None` in a pair means
/// no obstruction was found in that direction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShadingDimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d_hori: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h_hori: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d_over: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o_over: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d_reveal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o_reveal: Option<f64>,
}

impl ShadingDimensions {
    pub fn is_unshaded(&self) -> bool {
        self.d_hori.is_none()
            && self.h_hori.is_none()
            && self.d_over.is_none()
            && self.o_over.is_none()
            && self.d_reveal.is_none()
            && self.o_reveal.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeClass {
    Top,
    Bottom,
    Left,
    Right,
}

/// One casting setup: a quarter-plane anchored at `origin`, spanned by
/// the `depth` ray (toward the outside) and the `across` ray (up for
/// horizon/overhang probes, laterally outboard for reveal probes).
#[derive(Debug, Clone, Copy)]
struct Probe {
    origin: Point,
    depth: Vector,
    across: Vector,
}

#[derive(Debug, Clone, Copy)]
enum AngleFrom {
    DepthRay,
    AcrossRay,
}

struct PreparedAperture {
    aperture_id: String,
    horizon: Option<Probe>,
    overhang: Option<Probe>,
    reveal: Option<Probe>,
}

/// Solves shading dimensions for every aperture and stores them on the
/// aperture property bags. `cpus` is accepted for signature
/// compatibility; the thread pool is managed internally.
pub fn add_shading_dimensions(
    ph_model: &mut PhModel,
    inset_dist: f64,
    _cpus: Option<usize>,
) -> Result<()> {
    let solved = solve_shading_dimensions(&ph_model.model, inset_dist)?;
    for (aperture_id, dims) in solved {
        ph_model.ph.aperture_ph(&aperture_id).shading_dimensions = Some(dims);
    }
    Ok(())
}

/// Solves shading dimensions for every aperture in the model, in model
/// iteration order. Ray casting fans out across apertures.
pub fn solve_shading_dimensions(
    model: &Model,
    inset_dist: f64,
) -> Result<Vec<(String, ShadingDimensions)>> {
    let context: Vec<&Polygon> = model.orphaned_shades.iter().map(|s| &s.geometry).collect();

    let mut prepared = Vec::new();
    for room in &model.rooms {
        for face in &room.faces {
            for aperture in &face.apertures {
                prepared.push(prepare_aperture(model, aperture, inset_dist)?);
            }
        }
    }

    Ok(prepared
        .par_iter()
        .map(|prep| (prep.aperture_id.clone(), solve_prepared(prep, &context)))
        .collect())
}

/// Builds the three probes for one aperture: glazing polygon from the
/// per-edge frame inset plus the plane offset, probe origins from the
/// glazing's bottom, top and left edge midpoints.
///
/// Apertures without a horizontal normal component (skylights) carry
/// no probes and stay unshaded.
fn prepare_aperture(
    model: &Model,
    aperture: &Aperture,
    inset_dist: f64,
) -> Result<PreparedAperture> {
    let mut prep = PreparedAperture {
        aperture_id: aperture.base.identifier.clone(),
        horizon: None,
        overhang: None,
        reveal: None,
    };

    let normal = aperture.geometry.normal();
    let flat = Vector::new(normal.dx, normal.dy, 0.0);
    if flat.length() < EPS {
        return Ok(prep);
    }
    let depth = flat.normalize()?;
    let up = Vector::new(0.0, 0.0, 1.0);
    let up_plane = up - normal * up.dot(&normal);
    if up_plane.length() < EPS {
        return Ok(prep);
    }
    let up_plane = up_plane.normalize()?;
    let left = normal.cross(&up_plane).normalize()?;

    let classes = classify_edges(&aperture.geometry, &up_plane, &left);
    let frame = aperture
        .construction
        .as_deref()
        .and_then(|c| model.window_construction(c))
        .map(|wc| &wc.frame);
    let default_width = WindowFrameElement::default().width;
    let widths: Vec<f64> = classes
        .iter()
        .map(|class| match frame {
            Some(f) => match class {
                EdgeClass::Top => f.top.width,
                EdgeClass::Bottom => f.bottom.width,
                EdgeClass::Left => f.left.width,
                EdgeClass::Right => f.right.width,
            },
            None => default_width,
        })
        .collect();
    let glazing = aperture
        .geometry
        .inset_edges(&widths)
        .with_context(|| {
            format!(
                "failed to inset aperture {} by its frame widths",
                aperture.base.display_name
            )
        })?
        .translate(&(normal * -inset_dist));

    let centroid = glazing.centroid();
    let mids: Vec<Point> = glazing
        .edges()
        .into_iter()
        .map(|(a, b)| LineSegment::new(a, b).midpoint())
        .collect();

    let bottom = probe_origin(&mids, &classes, EdgeClass::Bottom, centroid, &up_plane, -1.0);
    let top = probe_origin(&mids, &classes, EdgeClass::Top, centroid, &up_plane, 1.0);
    let left_mid = probe_origin(&mids, &classes, EdgeClass::Left, centroid, &left, 1.0);

    prep.horizon = bottom.map(|origin| Probe {
        origin,
        depth,
        across: up,
    });
    prep.overhang = top.map(|origin| Probe {
        origin,
        depth,
        across: up,
    });
    // Reveals on the two sides may differ; only the left one is
    // reported. The lateral ray points outboard, away from the glazing
    // center.
    prep.reveal = left_mid.and_then(|origin| {
        let lateral = Vector::new(origin.x - centroid.x, origin.y - centroid.y, 0.0);
        lateral
            .normalize()
            .ok()
            .map(|across| Probe { origin, depth, across })
    });
    Ok(prep)
}

/// Tags each polygon edge as top, bottom, left or right. Edges running
/// mostly sideways split by midpoint height; the rest split by side.
fn classify_edges(polygon: &Polygon, up: &Vector, left: &Vector) -> Vec<EdgeClass> {
    let centroid = polygon.centroid();
    polygon
        .edges()
        .into_iter()
        .map(|(a, b)| {
            let dir = b - a;
            let rel = LineSegment::new(a, b).midpoint() - centroid;
            if dir.dot(left).abs() >= dir.dot(up).abs() {
                if rel.dot(up) >= 0.0 {
                    EdgeClass::Top
                } else {
                    EdgeClass::Bottom
                }
            } else if rel.dot(left) >= 0.0 {
                EdgeClass::Left
            } else {
                EdgeClass::Right
            }
        })
        .collect()
}

/// Midpoint of the outermost edge in the wanted class, judged along
/// `axis` with the given sign.
fn probe_origin(
    mids: &[Point],
    classes: &[EdgeClass],
    wanted: EdgeClass,
    centroid: Point,
    axis: &Vector,
    sign: f64,
) -> Option<Point> {
    mids.iter()
        .zip(classes)
        .filter(|(_, class)| **class == wanted)
        .map(|(mid, _)| (*mid, (*mid - centroid).dot(axis) * sign))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(mid, _)| mid)
}

fn solve_prepared(prep: &PreparedAperture, context: &[&Polygon]) -> ShadingDimensions {
    let mut dims = ShadingDimensions::default();
    if let Some(probe) = &prep.horizon {
        if let Some((d, h)) = most_obstructing(probe, context, AngleFrom::DepthRay) {
            let slant = (d * d + h * h).sqrt();
            dims.h_hori = Some(h);
            dims.d_hori = Some((slant * slant - h * h).max(0.0).sqrt());
        }
    }
    if let Some(probe) = &prep.overhang {
        if let Some((d, o)) = most_obstructing(probe, context, AngleFrom::AcrossRay) {
            dims.d_over = Some(d);
            dims.o_over = Some(o);
        }
    }
    if let Some(probe) = &prep.reveal {
        if let Some((d, o)) = most_obstructing(probe, context, AngleFrom::AcrossRay) {
            dims.d_reveal = Some(d);
            dims.o_reveal = Some(o);
        }
    }
    dims
}

/// Intersects the probe surface with every context polygon and returns
/// the (depth, across) coordinates of the most obstructing sample.
///
/// Samples are the crossing points between the polygon boundaries and
/// the probe quad; along any straight intersection segment the viewing
/// angle is monotonic, so its extremes lie at those crossings. The
/// most obstructing sample maximizes the angle away from the ray that
/// points toward the unobstructed view.
fn most_obstructing(
    probe: &Probe,
    context: &[&Polygon],
    measure: AngleFrom,
) -> Option<(f64, f64)> {
    let origin = probe.origin;
    let quad = Polygon::new(vec![
        origin,
        origin + probe.depth * PROBE_EXTENT,
        origin + probe.depth * PROBE_EXTENT + probe.across * PROBE_EXTENT,
        origin + probe.across * PROBE_EXTENT,
    ])
    .ok()?;

    let mut best: Option<(f64, (f64, f64))> = None;
    let mut consider = |sample: Point| {
        let rel = sample - origin;
        let d = rel.dot(&probe.depth);
        let across = rel.dot(&probe.across);
        // Samples in the glazing plane itself cannot obstruct.
        if d < EPS {
            return;
        }
        let angle = match measure {
            AngleFrom::DepthRay => across.atan2(d),
            AngleFrom::AcrossRay => d.atan2(across),
        };
        if best.map_or(true, |(top, _)| angle > top) {
            best = Some((angle, (d, across)));
        }
    };

    for polygon in context {
        for (a, b) in polygon.edges() {
            if let Some(sample) = segment_crosses_polygon(a, b, &quad) {
                consider(sample);
            }
        }
        for (a, b) in quad.edges() {
            if let Some(sample) = segment_crosses_polygon(a, b, polygon) {
                consider(sample);
            }
        }
    }
    best.map(|(_, coords)| coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::solid::Solid;
    use crate::model::{Room, Shade, WindowConstruction};

    fn model_with_window() -> (Model, String) {
        let mut model = Model::new("m");
        let mut room =
            Room::from_solid("room", Solid::from_box(10.0, 8.0, 3.0, None).unwrap()).unwrap();
        // South wall window, outward normal -Y.
        let window = Polygon::new(vec![
            Point::new(4.0, 0.0, 1.0),
            Point::new(6.0, 0.0, 1.0),
            Point::new(6.0, 0.0, 2.0),
            Point::new(4.0, 0.0, 2.0),
        ])
        .unwrap();
        let aperture = Aperture::new("win", window);
        let aperture_id = aperture.base.identifier.clone();
        room.faces[1].add_aperture(aperture);
        model.rooms.push(room);
        (model, aperture_id)
    }

    fn shade(pts: [(f64, f64, f64); 4]) -> Shade {
        let polygon = Polygon::new(
            pts.iter()
                .map(|(x, y, z)| Point::new(*x, *y, *z))
                .collect(),
        )
        .unwrap();
        Shade::new("context", polygon)
    }

    fn dims_for(model: &Model, aperture_id: &str) -> ShadingDimensions {
        let solved = solve_shading_dimensions(model, DEFAULT_INSET_DIST).unwrap();
        solved
            .into_iter()
            .find(|(id, _)| id == aperture_id)
            .map(|(_, dims)| dims)
            .unwrap()
    }

    #[test]
    fn test_unshaded_window_reports_none() {
        let (model, aperture_id) = model_with_window();
        let dims = dims_for(&model, &aperture_id);
        assert!(dims.is_unshaded());
    }

    #[test]
    fn test_horizon_from_facing_wall() {
        let (mut model, aperture_id) = model_with_window();
        // A 4 m tall wall 5 m in front of the facade.
        model.orphaned_shades.push(shade([
            (0.0, -5.0, 0.0),
            (10.0, -5.0, 0.0),
            (10.0, -5.0, 4.0),
            (0.0, -5.0, 4.0),
        ]));
        let dims = dims_for(&model, &aperture_id);
        // Glazing bottom midpoint sits at (5, 0.1, 1.1): 5.1 m back
        // from the wall, 2.9 m below its top edge.
        assert!((dims.d_hori.unwrap() - 5.1).abs() < 1e-9);
        assert!((dims.h_hori.unwrap() - 2.9).abs() < 1e-9);
        assert!(dims.d_over.is_none());
    }

    #[test]
    fn test_overhang_from_canopy() {
        let (mut model, aperture_id) = model_with_window();
        // A 1 m deep canopy 0.5 m above the window head.
        model.orphaned_shades.push(shade([
            (3.0, -1.0, 2.5),
            (7.0, -1.0, 2.5),
            (7.0, 0.0, 2.5),
            (3.0, 0.0, 2.5),
        ]));
        let dims = dims_for(&model, &aperture_id);
        // Most obstructing sample is the canopy's outer edge: 1.1 m
        // out from the glazing plane, 0.6 m above the glazing top.
        assert!((dims.d_over.unwrap() - 1.1).abs() < 1e-9);
        assert!((dims.o_over.unwrap() - 0.6).abs() < 1e-9);
        assert!(dims.d_hori.is_none());
    }

    #[test]
    fn test_left_reveal_from_fin() {
        let (mut model, aperture_id) = model_with_window();
        // A fin wall perpendicular to the facade, left of the window.
        model.orphaned_shades.push(shade([
            (3.6, 0.0, 0.0),
            (3.6, -0.5, 0.0),
            (3.6, -0.5, 3.0),
            (3.6, 0.0, 3.0),
        ]));
        let dims = dims_for(&model, &aperture_id);
        assert!((dims.d_reveal.unwrap() - 0.6).abs() < 1e-9);
        assert!((dims.o_reveal.unwrap() - 0.5).abs() < 1e-9);
        assert!(dims.d_hori.is_none());
        assert!(dims.d_over.is_none());
    }

    #[test]
    fn test_right_side_fin_is_discarded() {
        let (mut model, aperture_id) = model_with_window();
        model.orphaned_shades.push(shade([
            (6.4, 0.0, 0.0),
            (6.4, -0.5, 0.0),
            (6.4, -0.5, 3.0),
            (6.4, 0.0, 3.0),
        ]));
        let dims = dims_for(&model, &aperture_id);
        assert!(dims.is_unshaded());
    }

    #[test]
    fn test_skylight_carries_no_probes() {
        let mut model = Model::new("m");
        let mut room =
            Room::from_solid("room", Solid::from_box(10.0, 8.0, 3.0, None).unwrap()).unwrap();
        let skylight = Polygon::new(vec![
            Point::new(2.0, 2.0, 3.0),
            Point::new(8.0, 2.0, 3.0),
            Point::new(8.0, 6.0, 3.0),
            Point::new(2.0, 6.0, 3.0),
        ])
        .unwrap();
        let aperture = Aperture::new("roof_win", skylight);
        let aperture_id = aperture.base.identifier.clone();
        room.faces[5].add_aperture(aperture);
        model.rooms.push(room);
        model.orphaned_shades.push(shade([
            (0.0, -5.0, 0.0),
            (10.0, -5.0, 0.0),
            (10.0, -5.0, 4.0),
            (0.0, -5.0, 4.0),
        ]));

        let dims = dims_for(&model, &aperture_id);
        assert!(dims.is_unshaded());
    }

    #[test]
    fn test_frame_width_moves_probe_origin() {
        let (mut model, aperture_id) = model_with_window();
        let mut construction = WindowConstruction::new("wc");
        construction.frame.bottom.width = 0.3;
        let construction_id = construction.base.identifier.clone();
        model.rooms[0].faces[1].apertures[0].construction = Some(construction_id);
        model.window_constructions.push(construction);
        model.orphaned_shades.push(shade([
            (0.0, -5.0, 0.0),
            (10.0, -5.0, 0.0),
            (10.0, -5.0, 4.0),
            (0.0, -5.0, 4.0),
        ]));

        let dims = dims_for(&model, &aperture_id);
        // A taller sill frame lifts the glazing bottom to z = 1.3.
        assert!((dims.d_hori.unwrap() - 5.1).abs() < 1e-9);
        assert!((dims.h_hori.unwrap() - 2.7).abs() < 1e-9);
    }

    #[test]
    fn test_add_writes_aperture_bags() {
        let (mut model, aperture_id) = model_with_window();
        model.orphaned_shades.push(shade([
            (0.0, -5.0, 0.0),
            (10.0, -5.0, 0.0),
            (10.0, -5.0, 4.0),
            (0.0, -5.0, 4.0),
        ]));
        let mut ph_model = PhModel::new(model);
        add_shading_dimensions(&mut ph_model, DEFAULT_INSET_DIST, Some(4)).unwrap();

        let bag = ph_model.ph.get_aperture_ph(&aperture_id).unwrap();
        let dims = bag.shading_dimensions.unwrap();
        assert!((dims.d_hori.unwrap() - 5.1).abs() < 1e-9);
    }
}
