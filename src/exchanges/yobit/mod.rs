pub mod conversions;
pub mod errors;
pub mod markets;
pub mod signer;
pub mod types;

pub mod builder;
pub mod connector;
pub mod rest;

// Re-export main components
pub use builder::{build_connector, YobitBuilder, YobitOptions};
pub use connector::{Account, MarketData, Trading, YobitConnector};
pub use rest::{ApiSection, YobitRest};
pub use signer::YobitSigner;
