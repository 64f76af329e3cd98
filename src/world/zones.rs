use crate::error::Result;
use crate::geometry::{Envelope, Polygon, Segment};

use super::WorldParams;

const EPS: f64 = 1e-3;

/// Builds building zones along the roads.
///
/// Widened road envelopes are unioned; each long enough border edge is cut
/// into building-sized supports separated by `spacing`, and each support
/// becomes a rectangular zone. Zones are kept first-come-first-served: a
/// zone is dropped if it touches a road or comes within `spacing` of a zone
/// kept before it.
pub(super) fn building_zones(
    skeletons: &[Segment],
    roads: &[Envelope],
    params: &WorldParams,
) -> Result<Vec<Polygon>> {
    let guide_width = params.zone_guide_width();
    let wide = skeletons
        .iter()
        .map(|s| Envelope::new(*s, guide_width, params.road_roundness))
        .collect::<Result<Vec<_>>>()?;

    let guides: Vec<Segment> = Polygon::union(wide.iter().map(Envelope::polys))
        .into_iter()
        .filter(|g| g.length() >= params.building_zone_min_length)
        .collect();

    let mut supports = Vec::new();
    for guide in &guides {
        supports.extend(subdivide(guide, params)?);
    }

    let mut kept: Vec<Polygon> = Vec::new();
    for support in supports {
        let env = Envelope::new(support, params.building_zone_width, 1)?;
        let Some(zone) = env.polys().first().cloned() else {
            continue;
        };
        if touches_road(&zone, roads) {
            continue;
        }
        let crowded = kept.iter().any(|k| {
            k.intersects_poly(&zone)
                || k.distance_to_poly(&zone).min(zone.distance_to_poly(k)) < params.spacing - EPS
        });
        if !crowded {
            kept.push(zone);
        }
    }
    Ok(kept)
}

/// Cuts `guide` into equal supports of at least the minimum zone length,
/// separated by `spacing`.
fn subdivide(guide: &Segment, params: &WorldParams) -> Result<Vec<Segment>> {
    let len = guide.length() + params.spacing;
    let slot = params.building_zone_min_length + params.spacing;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = (len / slot).floor() as u32;
    if count == 0 {
        return Ok(Vec::new());
    }
    let building_len = len / f64::from(count) - params.spacing;
    let dir = guide.direction_vector()?;

    let mut supports = Vec::with_capacity(count as usize);
    let mut q1 = guide.p1;
    for _ in 0..count {
        let q2 = q1.offset_by(&(dir * building_len));
        supports.push(Segment::new(q1, q2));
        q1 = q2.offset_by(&(dir * params.spacing));
    }
    Ok(supports)
}

fn touches_road(zone: &Polygon, roads: &[Envelope]) -> bool {
    roads.iter().flat_map(Envelope::polys).any(|road| {
        road.intersects_poly(zone)
            || zone.points().iter().any(|p| road.contains_point(p))
            || road.points().iter().any(|p| zone.contains_point(p))
    })
}
