//! Upstream provider clients and payload handling

pub mod client;
pub mod cobalt;
pub mod formats;
pub mod provider;
pub mod tikwm;

pub use client::*;
pub use cobalt::*;
pub use formats::*;
pub use provider::*;
pub use tikwm::*;
