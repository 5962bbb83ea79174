//! Tracing bootstrap shared by the Staffdesk binaries.

use anyhow::{Result, anyhow};
use once_cell::sync::OnceCell;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{self as sdk, Resource};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: OnceCell<()> = OnceCell::new();

/// How the subscriber stack is assembled. Span export only happens when an
/// OTLP endpoint is configured here or via `OTLP_ENDPOINT`.
#[derive(Clone, Debug)]
pub struct ObsConfig {
    pub service_name: &'static str,
    pub env_filter: Option<String>,
    pub otlp_endpoint: Option<String>,
}

impl Default for ObsConfig {
    fn default() -> Self {
        Self {
            service_name: "staffdesk-server",
            env_filter: None,
            otlp_endpoint: None,
        }
    }
}

/// Install the global tracing subscriber. Safe to call more than once; only
/// the first call wins.
pub fn init_tracing(config: ObsConfig) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let directives = config
        .env_filter
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info,tower_http=warn".to_string());
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_new(directives)?)
        .with(tracing_subscriber::fmt::layer().with_target(false));

    let endpoint = config
        .otlp_endpoint
        .or_else(|| std::env::var("OTLP_ENDPOINT").ok());
    match endpoint {
        Some(endpoint) => {
            let provider = otlp_provider(config.service_name, &endpoint)?;
            let tracer = provider.tracer(config.service_name);
            registry
                .with(tracing_opentelemetry::layer().with_tracer(tracer))
                .try_init()?;
        }
        None => registry.try_init()?,
    }

    INIT.set(())
        .map_err(|_| anyhow!("tracing already initialized"))?;
    Ok(())
}

fn otlp_provider(
    service_name: &'static str,
    endpoint: &str,
) -> Result<sdk::trace::SdkTracerProvider> {
    let exporter = SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(endpoint)
        .build()?;
    let resource = Resource::builder().with_service_name(service_name).build();
    Ok(sdk::trace::SdkTracerProvider::builder()
        .with_resource(resource)
        .with_batch_exporter(exporter)
        .build())
}
