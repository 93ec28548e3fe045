use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = reel_ingest::Args::parse();
	reel_ingest::run(args).await
}
