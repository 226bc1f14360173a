//! # quickdl - social-media media resolver
//!
//! Turns TikTok, Instagram, Facebook and YouTube page links into direct media
//! URLs and re-serves those files as forced downloads.
//!
//! ## Features
//!
//! - Platform detection from the URL alone
//! - TikTok lookups through TikWM with metadata and audio track
//! - Ordered fallback across community Cobalt mirrors
//! - MP4-preferring selection over heterogeneous mirror payloads
//! - Pull-driven streaming proxy with attachment headers
//!
//! ## Example
//!
//! ```rust,no_run
//! use quickdl::{Resolver, ResolverOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = Resolver::new(&ResolverOptions::default())?;
//!
//!     let media = resolver.resolve("https://www.tiktok.com/@user/video/123").await?;
//!     println!("{} by {}: {:?}", media.title, media.author, media.video);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;
pub mod download;
pub mod error;
pub mod platform;
pub mod server;
pub mod utils;

// Re-export main types
pub use crate::core::{AssetKind, Platform, ResolvedMedia, Resolver, ResolverOptions, StreamRequest};
pub use crate::download::StreamProxy;
pub use crate::error::QuickdlError;

/// Result type alias for quickdl operations
pub type Result<T> = std::result::Result<T, QuickdlError>;
