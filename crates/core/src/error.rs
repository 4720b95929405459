use thiserror::Error;

/// Errors surfaced by [`crate::generate_map`]. Everything else is repaired internally.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MapGenError {
    #[error("invalid map dimensions {width}x{height} (both must be positive, at most {max_cells} cells)", max_cells = crate::MAX_MAP_CELLS)]
    InvalidDimensions { width: usize, height: usize },
    #[error("unknown climate {0:?} (expected desert, temperate, arctic or volcanic)")]
    UnknownClimate(String),
}

/// A WFC propagation emptied the domain of a cell. Recovered by the classic pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("wave function collapse contradiction at ({x}, {y})")]
pub struct WfcContradiction {
    pub x: usize,
    pub y: usize,
}
