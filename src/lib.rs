pub mod annotate;
pub mod any_network;
pub mod apis;
pub mod config;
pub mod error;
pub mod kegg;
pub mod logging;
pub mod network;
pub mod parser;
pub mod profile;
pub mod sga;
pub mod species;
pub mod stats;

pub use error::{ProwlerError, Result};
pub use network::{InteractionRecord, NetworkTable, Side};
pub use profile::{Presence, Profile, Symbols};
pub use species::SpeciesUniverse;
pub use stats::{NetworkStats, Selector, SelectorKind};
