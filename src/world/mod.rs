mod params;
mod trees;
mod zones;

pub use params::WorldParams;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::error::Result;
use crate::geometry::{Envelope, Point, Polygon, Segment};
use crate::graph::Graph;
use crate::math::TOLERANCE;

/// Geometry derived from a road graph.
///
/// Everything here is rebuilt from scratch whenever the graph changes;
/// nothing is updated incrementally.
#[derive(Debug, Clone)]
pub struct World {
    params: WorldParams,
    envelopes: Vec<Envelope>,
    road_borders: Vec<Segment>,
    building_zones: Vec<Polygon>,
    trees: Vec<Point>,
    lane_guides: Vec<Segment>,
    graph_hash: Option<String>,
}

impl World {
    /// Creates an empty world.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidParameter` if `params` fail validation.
    pub fn new(params: WorldParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            envelopes: Vec::new(),
            road_borders: Vec::new(),
            building_zones: Vec::new(),
            trees: Vec::new(),
            lane_guides: Vec::new(),
            graph_hash: None,
        })
    }

    /// The generation parameters.
    #[must_use]
    pub fn params(&self) -> &WorldParams {
        &self.params
    }

    /// One road envelope per graph segment.
    #[must_use]
    pub fn envelopes(&self) -> &[Envelope] {
        &self.envelopes
    }

    /// Outer border of all road envelopes.
    #[must_use]
    pub fn road_borders(&self) -> &[Segment] {
        &self.road_borders
    }

    /// Building zones along the roads.
    #[must_use]
    pub fn building_zones(&self) -> &[Polygon] {
        &self.building_zones
    }

    /// Tree positions.
    #[must_use]
    pub fn trees(&self) -> &[Point] {
        &self.trees
    }

    /// Outer border of the narrowed road envelopes.
    #[must_use]
    pub fn lane_guides(&self) -> &[Segment] {
        &self.lane_guides
    }

    /// Regenerates if the graph changed since the last generation.
    ///
    /// Returns whether a regeneration happened.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails.
    pub fn update(&mut self, graph: &Graph) -> Result<bool> {
        let hash = graph.hash();
        if self.graph_hash.as_deref() == Some(hash.as_str()) {
            return Ok(false);
        }
        self.generate(graph)?;
        self.graph_hash = Some(hash);
        Ok(true)
    }

    /// Rebuilds all derived geometry from `graph`, seeding tree placement
    /// from the parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if an envelope cannot be built.
    pub fn generate(&mut self, graph: &Graph) -> Result<()> {
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        self.generate_with_rng(graph, &mut rng)
    }

    /// Rebuilds all derived geometry from `graph` using `rng` for trees.
    ///
    /// # Errors
    ///
    /// Returns an error if an envelope cannot be built.
    pub fn generate_with_rng<R: Rng + ?Sized>(&mut self, graph: &Graph, rng: &mut R) -> Result<()> {
        let p = self.params;
        let skeletons: Vec<Segment> = graph
            .segments()
            .map(|(_, s)| s)
            .filter(|s| {
                let ok = s.length() >= TOLERANCE;
                if !ok {
                    warn!(x = s.p1.x, y = s.p1.y, "skipping zero-length segment");
                }
                ok
            })
            .collect();

        let envelopes = build_envelopes(&skeletons, p.road_width, p.road_roundness)?;
        let road_borders = Polygon::union(envelopes.iter().map(Envelope::polys));
        let building_zones = zones::building_zones(&skeletons, &envelopes, &p)?;

        let lanes = build_envelopes(&skeletons, p.lane_guide_width(), p.road_roundness)?;
        let lane_guides = Polygon::union(lanes.iter().map(Envelope::polys));

        let obstacles: Vec<&Polygon> = building_zones
            .iter()
            .chain(envelopes.iter().flat_map(Envelope::polys))
            .collect();
        let trees = trees::place_trees(rng, &road_borders, &obstacles, &p);

        debug!(
            envelopes = envelopes.len(),
            borders = road_borders.len(),
            zones = building_zones.len(),
            lanes = lane_guides.len(),
            trees = trees.len(),
            "world generated"
        );

        self.envelopes = envelopes;
        self.road_borders = road_borders;
        self.building_zones = building_zones;
        self.lane_guides = lane_guides;
        self.trees = trees;
        self.graph_hash = None;
        Ok(())
    }
}

fn build_envelopes(skeletons: &[Segment], width: f64, roundness: u32) -> Result<Vec<Envelope>> {
    skeletons
        .iter()
        .map(|s| Envelope::new(*s, width, roundness))
        .collect()
}
