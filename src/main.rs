#[cfg(feature = "http")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use folio::app::App;
    use folio::config::Config;
    use folio::sections::FetchOutcome;
    use opentelemetry_configuration::OtelSdkBuilder;

    let _guard = OtelSdkBuilder::new()
        .service_name(env!("CARGO_PKG_NAME"))
        .service_version(env!("CARGO_PKG_VERSION"))
        .resource_attribute("vcs.ref.head.revision", env!("VCS_REF_HEAD_REVISION"))
        .resource_attribute("vcs.ref.head.name", env!("VCS_REF_HEAD_NAME"))
        .resource_attribute("vcs.ref.head.type", "branch")
        .endpoint("http://127.0.0.1:4318")
        .with_standard_env()
        .build()
        .expect("failed to initialise OpenTelemetry");

    let config = Config::load()?;
    tracing::info!(mode = %config.mode, owner = ?config.owner, "starting repository refresh");

    let app = App::bootstrap(config).await?;

    match app.projects.fetch_external().await? {
        FetchOutcome::Replaced { count, persisted } => {
            tracing::info!(count, ?persisted, "repositories refreshed");
        }
        FetchOutcome::Failed { rate_limited } => {
            tracing::warn!(rate_limited, "repository refresh failed");
        }
        FetchOutcome::Superseded => {}
    }

    for toast in app.toasts.current() {
        tracing::info!(kind = ?toast.kind, message = %toast.message, "notification");
    }

    Ok(())
}

#[cfg(not(feature = "http"))]
pub fn main() {
    // the refresh binary needs the HTTP services; see lib.rs for the library
}
