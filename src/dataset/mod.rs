//! 数据集模块
//!
//! 发布记录的数据模型、可插拔的加载器和发布组名称整理。

pub mod curation;
pub mod loader;
pub mod record;

pub use curation::{CuratedLoader, GroupCuration};
pub use loader::{InMemoryLoader, JsonLoader, RecordLoader};
pub use record::{Codec, ReleaseRecord};
