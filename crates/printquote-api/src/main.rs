use printquote_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    let (_state, router) = printquote_api::setup::initialize_app(config.clone()).await?;

    printquote_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
