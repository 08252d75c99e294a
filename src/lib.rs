pub use client::{HltvClient, RequestConfig};
pub use error::{HltvError, Result};

mod client;
pub mod error;
pub(crate) mod hltv;
pub mod model;
