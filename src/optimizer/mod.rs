pub mod dp;
pub mod grid;
pub mod model;
pub mod params;
pub mod types;

pub use dp::*;
pub use grid::*;
pub use model::*;
pub use params::*;
pub use types::*;
