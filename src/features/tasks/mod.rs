//! Study task capture and storage.

pub mod quickadd;
pub mod storage;
pub mod task;

pub use quickadd::{parse_capture, ParsedCapture};
pub use storage::TaskStorage;
pub use task::Task;
