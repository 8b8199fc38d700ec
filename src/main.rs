use magazine_subscriptions::{
    configuration::get_configuration,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber(
        "magazine_subscriptions".into(),
        "info".into(),
        std::io::stdout,
    );
    init_subscriber(subscriber)?;

    let config = get_configuration()?;
    let app = Application::build(config).await?;
    app.run_until_stopped().await?;

    Ok(())
}
