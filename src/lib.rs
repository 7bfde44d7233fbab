//! Cypress search - geocoding query resolution and ranking.
//!
//! Turns a free-text or coordinate query into a ranked, filtered, deduplicated
//! list of places, with address hierarchies and geometry attached on request.
//! Places are read through the [`store::PlaceStore`] trait.

pub mod address;
pub mod config;
pub mod error;
pub mod geometry;
pub mod models;
pub mod search;
pub mod store;
pub mod text;

pub use config::SearchConfig;
pub use error::{DataIntegrityFault, SearchError, StoreError};
pub use models::{OsmType, Place, PlaceId, PlaceRecord};
pub use search::{QuerySpec, SearchRequest, SearchResult, Searcher};
pub use store::{MemoryPlaceStore, PlaceStore};
