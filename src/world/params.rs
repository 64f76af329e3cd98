use crate::error::{GeometryError, Result};

/// Tunable parameters for world generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldParams {
    /// Width of a road envelope.
    pub road_width: f64,
    /// Angular steps per half-turn on road end caps.
    pub road_roundness: u32,
    /// Depth of a building zone, measured away from the road.
    pub building_zone_width: f64,
    /// Minimum length of a building zone along the road.
    pub building_zone_min_length: f64,
    /// Gap kept between zones and between zones and roads.
    pub spacing: f64,
    /// Tree diameter; trees keep this far apart.
    pub tree_size: f64,
    /// Upper bound on the number of trees placed.
    pub max_trees: usize,
    /// Consecutive rejected samples after which tree placement stops.
    pub max_tree_misses: usize,
    /// Seed for tree placement.
    pub seed: u64,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            road_width: 100.0,
            road_roundness: 10,
            building_zone_width: 150.0,
            building_zone_min_length: 150.0,
            spacing: 50.0,
            tree_size: 160.0,
            max_trees: 200,
            max_tree_misses: 100,
            seed: 0,
        }
    }
}

impl WorldParams {
    /// Checks that every size is usable.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidParameter` naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("road_width", self.road_width),
            ("building_zone_width", self.building_zone_width),
            ("building_zone_min_length", self.building_zone_min_length),
            ("tree_size", self.tree_size),
        ];
        for (parameter, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(GeometryError::InvalidParameter { parameter, value }.into());
            }
        }
        if self.spacing.is_nan() || self.spacing < 0.0 {
            return Err(GeometryError::InvalidParameter {
                parameter: "spacing",
                value: self.spacing,
            }
            .into());
        }
        Ok(())
    }

    /// Width of the widened envelopes whose border guides building zones.
    #[must_use]
    pub fn zone_guide_width(&self) -> f64 {
        self.road_width * 1.5 + self.building_zone_width + self.spacing * 2.0
    }

    /// Width of the envelopes whose border forms the lane guides.
    #[must_use]
    pub fn lane_guide_width(&self) -> f64 {
        self.road_width * 0.85
    }
}
