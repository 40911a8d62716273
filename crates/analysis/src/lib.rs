pub mod cross_section;
pub mod error;
pub mod gate;
pub mod grid;
pub mod merge;
pub mod request;
pub mod sightline;
pub mod viewshed;

pub use cross_section::*;
pub use error::*;
pub use request::*;
pub use viewshed::*;
