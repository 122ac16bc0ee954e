pub mod engine;
pub mod loader;
pub mod renderer;
pub mod resolver;

pub use crate::domain::model::{DisplayPoint, FriendRecord, MapGeometry};
pub use crate::domain::ports::{ConfigProvider, MapDataSource, RenderPort, Storage};
pub use crate::utils::error::Result;
