// Import reference data (produtos / grupos / meses) from a directory of CSV files.
//
// Usage:
//   cargo run --bin import_reference_data -- <csv_dir> [db_path]
//
// Missing files are skipped; rows are upserted so the import can be repeated.

use sop_forecast::app::get_default_db_path;
use sop_forecast::db::{init_schema, open_sqlite_connection};
use sop_forecast::importer::ReferenceImporter;
use sop_forecast::logging;
use sop_forecast::repository::{GroupRepository, MonthConfigRepository, ProductRepository};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let dir = args
        .next()
        .map(PathBuf::from)
        .ok_or("usage: import_reference_data <csv_dir> [db_path]")?;
    let db_path = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(get_default_db_path);

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    let importer = ReferenceImporter::new(
        Arc::new(ProductRepository::new(conn.clone())),
        Arc::new(GroupRepository::new(conn.clone())),
        Arc::new(MonthConfigRepository::new(conn)),
    );
    let summary = importer.import_dir(&dir)?;

    println!(
        "db={} produtos={} grupos={} meses={}",
        db_path, summary.produtos, summary.grupos, summary.meses
    );
    Ok(())
}
