//! Radar: nearest eligible target inside the caster's detection region.
//!
//! Distances are compared squared; ordering is unchanged and no square
//! root is taken.

use glam::DVec2;
use hecs::{Entity, World};

use gemfire_core::components::Target;
use gemfire_core::enums::CategoryMask;
use gemfire_core::types::{Circle, Position};

/// Detection region centered on the caster.
#[derive(Debug, Clone, Copy, Default)]
pub struct Radar {
    region: Circle,
}

impl Radar {
    pub fn new(region: Circle) -> Self {
        Self { region }
    }

    pub fn region(&self) -> Circle {
        self.region
    }

    pub fn set_region(&mut self, region: Circle) {
        self.region = region;
    }

    /// Every live target inside the region whose category is in `mask`.
    pub fn candidates(&self, world: &World, mask: CategoryMask) -> Vec<(Entity, DVec2)> {
        let mut query = world.query::<(&Position, &Target)>();
        query
            .iter()
            .filter(|(_, (pos, target))| {
                mask.contains(target.category)
                    && target.health > 0.0
                    && self.region.contains(pos.0)
            })
            .map(|(entity, (pos, _))| (entity, pos.0))
            .collect()
    }

    /// Nearest eligible target to `reference`, or `None` when the region
    /// holds no candidates.
    pub fn nearest_target(
        &self,
        world: &World,
        mask: CategoryMask,
        reference: DVec2,
    ) -> Option<(Entity, DVec2)> {
        nearest(self.candidates(world, mask), reference)
    }
}

/// Candidate with the smallest squared distance to `reference`.
/// Ties keep the earliest candidate.
pub fn nearest<T>(
    candidates: impl IntoIterator<Item = (T, DVec2)>,
    reference: DVec2,
) -> Option<(T, DVec2)> {
    candidates.into_iter().min_by(|(_, a), (_, b)| {
        a.distance_squared(reference)
            .total_cmp(&b.distance_squared(reference))
    })
}
