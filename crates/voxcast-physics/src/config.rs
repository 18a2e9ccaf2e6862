//! Ray cast configuration.

/// Default cap on DDA steps per ray.
pub const DEFAULT_MAX_RAY_STEPS: usize = 4096;

/// Per-cast settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayCastConfig {
    /// Height of one voxel in world units.
    pub ceiling_scale: f64,
    /// Whether entity billboards can be hit.
    pub include_entities: bool,
    /// Voxels visited after the first before the cast gives up.
    pub max_steps: usize,
}

impl Default for RayCastConfig {
    fn default() -> Self {
        Self {
            ceiling_scale: 1.0,
            include_entities: true,
            max_steps: DEFAULT_MAX_RAY_STEPS,
        }
    }
}

impl RayCastConfig {
    /// Whether casts can run with these settings: the voxel height must be
    /// positive and finite.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.ceiling_scale.is_finite() && self.ceiling_scale > 0.0
    }

    #[must_use]
    pub const fn with_ceiling_scale(mut self, ceiling_scale: f64) -> Self {
        self.ceiling_scale = ceiling_scale;
        self
    }

    #[must_use]
    pub const fn with_entities(mut self, include_entities: bool) -> Self {
        self.include_entities = include_entities;
        self
    }

    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}
