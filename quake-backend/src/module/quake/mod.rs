///! USGS earthquake feed module
///!
///! Fetches recent earthquakes from the USGS FDSN event service, parses
///! the GeoJSON response into list records, and caches the latest
///! successful result in memory.

pub mod fetcher;
pub mod parser;
pub mod loader;

pub use fetcher::{EarthquakeSource, UsgsFetcher};
pub use parser::{EarthquakeParser, MissingProperties};
pub use loader::{CacheView, EarthquakeLoader, Earthquakes};
