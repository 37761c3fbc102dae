pub mod base;
pub mod certification;
pub mod climate;
pub mod envelope;
pub mod geom;
pub mod hvac;
mod id;
pub mod model;
pub mod properties;
pub mod shading;
pub mod space;
pub mod wufi;

// Prelude
pub use geom::point::Point;
pub use geom::polygon::Polygon;
pub use geom::solid::Solid;
pub use geom::vector::Vector;
use id::random_id;
