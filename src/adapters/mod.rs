// Adapters layer: concrete implementations of the domain ports.

pub mod html;
pub mod storage;
