//! 構造化ロギング（コンソール + ローテーションする JSON 配列ファイル）

pub mod fields;
pub mod json_array;
pub mod layer;
pub mod logger;
pub mod record;

pub use fields::{Level, LogFields};
pub use json_array::{JsonArrayWriter, RotationPolicy, backup_path};
pub use layer::{ConsoleFormat, JsonArrayLayer, SharedWriter};
pub use logger::{DEFAULT_MODULE, LogGuard, LogSettings, Logger, init};
pub use record::LogRecord;
