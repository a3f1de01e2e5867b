//! Example: exporting a catalog resource to CSV
//!
//! Downloads the "Référentiel des familles de métier" resource of the `bmo`
//! package into `ref_fap.csv`, printing progress every 100 rows.
//!
//! # Setup
//!
//! Put the partner credentials in the environment (or a `.env` file):
//!
//! ```bash
//! export EMPLOI_STORE_CLIENT_ID=...
//! export EMPLOI_STORE_CLIENT_SECRET=...
//! cargo run --example download_resource
//! ```

use emploistore_core::with_progress;
use emploistore_infra::{EmploiStoreClient, ExportOptions, ResourceQuery};
use tracing_subscriber::EnvFilter;

const PACKAGE: &str = "bmo";
const RESOURCE: &str = "Référentiel des familles de métier";
const OUTPUT: &str = "ref_fap.csv";

fn main() -> emploistore_domain::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let client = EmploiStoreClient::new(None, None)?;
    let package = client.get_package(PACKAGE)?;
    println!("Package {} ({})", package.name(), package.id());

    let resource = package.get_resource(&ResourceQuery::by_name(RESOURCE))?;
    println!("Resource {} ({})", resource.name().unwrap_or(RESOURCE), resource.id());

    let rows = resource.to_csv_with(OUTPUT, &ExportOptions::default(), |records| {
        with_progress(records, |done, total| {
            if done % 100 == 0 {
                match total {
                    Some(total) => println!("  {done}/{total} rows"),
                    None => println!("  {done} rows"),
                }
            }
        })
    })?;

    println!("Wrote {rows} rows to {OUTPUT}");
    Ok(())
}
