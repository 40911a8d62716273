pub mod geodesy;
pub mod mercator;
pub mod precision;

pub use geodesy::*;
pub use mercator::*;
pub use precision::*;
