use anyhow::Context;
use survey::{CatalogConfig, RestCatalog};
use survey_ratatui_form::{SurveyTui, TuiError};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> anyhow::Result<()> {
    // The form owns the terminal, so logs only go out when asked for.
    if std::env::var_os("RUST_LOG").is_some() {
        fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .init();
    }

    let config = CatalogConfig::from_env().context("Catalog misconfigured")?;
    let catalog = RestCatalog::new(config).context("Failed to build catalog client")?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;

    match SurveyTui::new().run(&catalog, &runtime) {
        Ok(page) => {
            if let Some(response) = page.response() {
                println!("Stored response {}", response.id);
            } else if let Some(error) = page.error() {
                eprintln!("{error}");
            }
            Ok(())
        }
        Err(TuiError::Cancelled) => {
            eprintln!("Cancelled, nothing was submitted.");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
