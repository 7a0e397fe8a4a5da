use std::sync::Arc;

use anyhow::Result;

use super::parse_serve_flags;
use crate::core::spacelift::SpaceliftService;
use crate::core::terminal::{self, GuideSection};
use crate::core::config;
use crate::interfaces::web::ApiServer;

pub async fn run(args: &[String]) -> Result<()> {
    let flags = parse_serve_flags(args, 2);
    let config = config::load(flags.config.as_deref())?;
    let host = flags.host.unwrap_or(config.server.host);
    let port = flags.port.unwrap_or(config.server.port);

    let log_tx = crate::logging::init();
    let service = Arc::new(SpaceliftService::new(&config.spacelift));

    terminal::print_banner();
    GuideSection::new("Gateway")
        .status("Spacelift endpoint", service.api_url())
        .status("Bind address", &format!("{}:{}", host, port))
        .print();
    terminal::print_link("Gateway API", &format!("http://{}:{}", host, port));

    ApiServer::new(service, log_tx, host, port).serve().await
}
