use std::net::TcpListener;

use apiserver_source::configuration::AdapterSettings;
use apiserver_source::telemetry::{get_subscriber, init_subscriber};
use once_cell::sync::Lazy;

#[allow(dead_code)]
pub const TEST_IMAGE: &str = "adapter:test";

// Logs are only printed with `TEST_LOG=true`, the subscriber is set up once
// for all tests of a binary.
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

// Launch our application in the background on a random port
pub fn spawn_app() -> String {
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind address");
    let port = listener.local_addr().unwrap().port();
    let adapter = AdapterSettings {
        image: TEST_IMAGE.to_owned(),
    };
    let server = apiserver_source::startup::run(listener, adapter).expect("Failed to bind address");

    let _ = tokio::spawn(server);

    format!("http://127.0.0.1:{}", port)
}
