use crate::configuration::AdapterSettings;
use crate::routes::{build_version, health_check, render_receive_adapter};
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;
use actix_web::dev::{ServiceResponse, ServiceRequest};
use tracing_actix_web::{TracingLogger, DefaultRootSpanBuilder, RootSpanBuilder, Level};
use actix_web::Error;
use tracing::Span;

/// Health probes are logged at DEBUG, everything else at INFO.
pub struct CustomLevelRootSpanBuilder;

impl RootSpanBuilder for CustomLevelRootSpanBuilder {
    fn on_request_start(request: &ServiceRequest) -> Span {
        let level = if request.path() == "/healthz" {
            Level::DEBUG
        } else {
            Level::INFO
        };
        tracing_actix_web::root_span!(level = level, request)
    }

    fn on_request_end<B: actix_web::body::MessageBody>(
        span: Span,
        outcome: &Result<ServiceResponse<B>, Error>,
    ) {
        DefaultRootSpanBuilder::on_request_end(span, outcome);
    }
}

pub fn run(listener: TcpListener, adapter: AdapterSettings) -> Result<Server, std::io::Error> {
    let adapter = web::Data::new(adapter);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::<CustomLevelRootSpanBuilder>::new())
            .app_data(adapter.clone())
            .service(build_version)
            .service(render_receive_adapter)
            .route("/healthz", web::get().to(health_check))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
