//! Core data models for query resolution.

pub mod admin;
pub mod place;

pub use admin::{AddressCategory, AddressComponent};
pub use place::{GeoBbox, GeoPoint, OsmType, Place, PlaceId, PlaceRecord};
