use anyhow::{Context, Result};

use record_cleaner::{anonymize, dedup, flatten, lookup, rank, reader, writer};
use record_cleaner::PipelineConfig;

fn main() -> Result<()> {
    env_logger::init();

    let config = PipelineConfig::default();
    run(&config)
}

fn run(config: &PipelineConfig) -> Result<()> {
    println!("Reading {}", config.input_path.display());
    let table = reader::read_ndjson(&config.input_path)
        .with_context(|| format!("Failed to read {}", config.input_path.display()))?;
    println!("Loaded {} rows, {} columns", table.height(), table.width());

    let mut table =
        dedup::remove_duplicates(&table).context("Failed to remove duplicate records")?;
    println!(
        "{} rows after dropping repeated (id, created_at) pairs",
        table.height()
    );

    rank::add_sub_group_rank(&mut table).context("Failed to rank scores within age groups")?;

    let mut table = flatten::flatten_widgets(&table).context("Failed to flatten widget lists")?;
    println!("{} rows after flattening widget lists", table.height());

    anonymize::encode_emails(&mut table).context("Failed to anonymize emails")?;

    // Demonstrate recovery of a single anonymized email.
    let recovered =
        anonymize::decode_one(&config.email_tag, &table).context("Failed to decode email tag")?;
    println!(
        "Tag {} matches {} row(s)",
        config.email_tag,
        recovered.len()
    );
    log::debug!("recovered emails: {:?}", recovered);

    let location_lookup =
        lookup::location_table(&table).context("Failed to build the location table")?;
    let ids = lookup::get_ids(&config.location_filter, &location_lookup)
        .context("Failed to query the location table")?;
    println!(
        "{} id(s) recorded for location '{}'",
        ids.len(),
        config.location_filter
    );

    let path = writer::write_parquet(&location_lookup, &config.lookup_output)
        .context("Failed to write the location table")?;
    println!("Wrote {}", path.display());

    let path = writer::write_parquet(&table, &config.table_output)
        .context("Failed to write the record table")?;
    println!("Wrote {}", path.display());

    let path = writer::write_json(&table, &config.json_format, &config.json_output)
        .context("Failed to write the JSON output")?;
    println!("Wrote {}", path.display());

    println!("Done!");
    Ok(())
}
