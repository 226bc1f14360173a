//! Media delivery to callers

pub mod proxy;

pub use proxy::{ProxiedMedia, ProxyStream, StreamProxy};
