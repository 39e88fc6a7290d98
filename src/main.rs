use anyhow::Context;
use docent::{api::ChatClient, config::initialize_config, logging::init_logging, ui::run_ui, App};
use dotenv::dotenv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = initialize_config().context("Failed to load configuration")?;
    let _logger = init_logging(&config).context("Failed to initialize logging")?;

    let client = ChatClient::new(config.chat_endpoint());
    log::info!("Starting docent against {}", client.endpoint());

    let transcript_dir =
        std::env::current_dir().context("Failed to determine working directory")?;
    let app = App::new(client.endpoint(), transcript_dir);

    run_ui(client, app)
        .await
        .context("Terminal UI failed")?;

    Ok(())
}
