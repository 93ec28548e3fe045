use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = reel_api::Args::parse();
	reel_api::run(args).await
}
