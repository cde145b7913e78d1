use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = snrt_api::Args::parse();

	snrt_api::run(args).await
}
