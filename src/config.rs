use std::path::PathBuf;

/// Explicit run configuration for the cleaning pipeline.
///
/// The defaults are the values a plain run uses: `data.json` in,
/// `new_table`/`original_table`/`output` out, the `records` JSON
/// orientation, and the demonstration lookup tags.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Newline-delimited JSON input file.
    pub input_path: PathBuf,
    /// Output name stem for the location lookup table (Parquet).
    pub lookup_output: String,
    /// Output name stem for the cleaned record table (Parquet).
    pub table_output: String,
    /// Output name stem for the JSON rendition of the record table.
    pub json_output: String,
    /// JSON orientation passed to the JSON writer.
    pub json_format: String,
    /// Location whose ids the run reports, demonstrating the lookup.
    pub location_filter: String,
    /// Encoded email tag the run decodes, demonstrating recovery.
    pub email_tag: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data.json"),
            lookup_output: "new_table".to_string(),
            table_output: "original_table".to_string(),
            json_output: "output".to_string(),
            json_format: "records".to_string(),
            location_filter: "China".to_string(),
            email_tag: "Z2dvbHN3b3J0aHlybEBpcy5nZA==".to_string(),
        }
    }
}
