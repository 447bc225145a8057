pub mod checksum;
pub mod dates;
pub mod etl;
pub mod identifier;
pub mod parser;
pub mod pipeline;

pub use crate::domain::model::{ScanInput, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
