use color_eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = gatekeeper_tui::tracing_setup::init_tracing();
    gatekeeper_tui::try_main().await
}
