//! Data layer: symbol source, historical-data provider, bar cleaning.

pub mod clean;
pub mod nse;
pub mod provider;
pub mod universe;
pub mod yahoo;

pub use clean::{clean_bars, CleanedSeries};
pub use nse::{parse_constituents, resolve_universe, IndexSymbolSource};
pub use provider::{DataError, DataProvider, FetchResult, RawBar};
pub use universe::{Universe, UniverseOrigin};
pub use yahoo::YahooProvider;
