use apiserver_source::configuration::get_configuration;
use apiserver_source::startup::run;
use apiserver_source::telemetry::{get_subscriber, init_subscriber};
use std::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("apiserver-source".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration()?;
    tracing::info!(
        name = %configuration.name,
        adapter_image = %configuration.adapter.image,
        "starting receive adapter renderer"
    );

    // Bound to the configured host, `0.0.0.0` in production so the
    // controller can reach it from other pods.
    let address = format!(
        "{}:{}",
        configuration.application.host,
        configuration.application.port
    );
    let listener = TcpListener::bind(address)?;
    run(listener, configuration.adapter)?.await?;

    Ok(())
}
