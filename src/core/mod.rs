//! Core resolution types and orchestration

pub mod media;
pub mod resolver;

pub use media::*;
pub use resolver::*;
