use crate::entrance::EntranceStyle;

/// Options for configuring a [`crate::HierarchicalMap`].
///
/// Default options:
/// ```
/// # use hpa_grid_pathfinding::{HierarchicalMapConfig, EntranceStyle};
/// assert_eq!(
///     HierarchicalMapConfig {
///         cluster_size: 8,
///         entrance_style: EntranceStyle::Middle,
///         a_star_fallback: true,
///     },
///     Default::default()
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HierarchicalMapConfig {
    /// edge length of a cluster, in tiles (defaults to `8`)
    pub cluster_size: usize,
    /// how many transitions a long border run is split into (defaults to
    /// [`EntranceStyle::Middle`])
    pub entrance_style: EntranceStyle,
    /// `true` (default): when a refined path's length is under
    /// `2 * cluster_size`, replace it with a direct concrete A* search. Short
    /// HPA* paths otherwise take visibly suboptimal detours around cluster
    /// borders.
    pub a_star_fallback: bool,
}

impl HierarchicalMapConfig {
    /// an example config with options set to reduce memory usage
    ///
    /// Values:
    /// ```
    /// # use hpa_grid_pathfinding::{HierarchicalMapConfig, EntranceStyle};
    /// assert_eq!(
    ///     HierarchicalMapConfig {
    ///         cluster_size: 16,
    ///         entrance_style: EntranceStyle::Middle,
    ///         a_star_fallback: true,
    ///     },
    ///     HierarchicalMapConfig::LOW_MEM
    /// );
    /// ```
    pub const LOW_MEM: HierarchicalMapConfig = HierarchicalMapConfig {
        cluster_size: 16,
        entrance_style: EntranceStyle::Middle,
        a_star_fallback: true,
    };

    /// an example config with options set to improve path optimality at the
    /// cost of more transition nodes per cluster
    ///
    /// Values:
    /// ```
    /// # use hpa_grid_pathfinding::{HierarchicalMapConfig, EntranceStyle};
    /// assert_eq!(
    ///     HierarchicalMapConfig {
    ///         cluster_size: 8,
    ///         entrance_style: EntranceStyle::End,
    ///         a_star_fallback: true,
    ///     },
    ///     HierarchicalMapConfig::HIGH_PERFORMANCE
    /// );
    /// ```
    pub const HIGH_PERFORMANCE: HierarchicalMapConfig = HierarchicalMapConfig {
        cluster_size: 8,
        entrance_style: EntranceStyle::End,
        a_star_fallback: true,
    };
}

impl Default for HierarchicalMapConfig {
    fn default() -> HierarchicalMapConfig {
        HierarchicalMapConfig {
            cluster_size: 8,
            entrance_style: EntranceStyle::Middle,
            a_star_fallback: true,
        }
    }
}
