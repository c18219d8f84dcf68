/// World tuning: streaming geometry, quest goals, actor size.
#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// Side length of one square terrain chunk, world units.
    pub chunk_size: f32,
    /// Chebyshev radius of the loaded square around the actor, in chunks.
    pub chunk_radius: i64,
    /// Lanterns that must be lit at once to finish the lantern quest.
    pub lantern_goal: u32,
    /// Herbs that must be gathered to finish the herb quest.
    pub herb_goal: u32,
    /// Collision radius of the actor.
    pub actor_radius: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: 40.0,
            chunk_radius: 2,
            lantern_goal: 3,
            herb_goal: 5,
            actor_radius: 0.6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = WorldConfig::default();
        assert_eq!(config.chunk_size, 40.0);
        assert_eq!(config.chunk_radius, 2);
        assert_eq!(config.lantern_goal, 3);
        assert_eq!(config.herb_goal, 5);
        assert_eq!(config.actor_radius, 0.6);
    }
}
