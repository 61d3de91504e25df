//! Value objects

mod geo_location;
mod units;

pub use geo_location::GeoLocation;
pub use units::Units;
