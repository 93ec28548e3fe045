pub mod ingest;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
	version = reel_cli::VERSION,
	rename_all = "kebab",
	styles = reel_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// CSV file with the columns title, description, type, rating, image,
	/// genre, and year.
	#[arg(long, value_name = "FILE")]
	pub csv: PathBuf,
	/// Drop and recreate the collection before uploading.
	#[arg(long)]
	pub recreate: bool,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = reel_config::load(&args.config)?;
	let filter = EnvFilter::new(config.service.log_level.clone());
	tracing_subscriber::fmt().with_env_filter(filter).init();

	let store = reel_storage::qdrant::CatalogStore::new(&config.storage.qdrant)?;

	ingest::run_ingest(&config, &store, &args.csv, args.recreate).await
}
