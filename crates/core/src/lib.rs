pub mod error;
pub mod mapgen;
pub mod types;

pub use error::MapGenError;
pub use mapgen::*;
pub use types::*;
