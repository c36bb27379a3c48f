pub mod json;
pub mod parquet;

pub use self::json::write_json;
pub use self::parquet::write_parquet;
