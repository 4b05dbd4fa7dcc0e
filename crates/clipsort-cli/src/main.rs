use std::io::Write;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use clipsort_core::auth::{self, AuthForm, AuthMode};
use clipsort_core::{
    Availability, Category, CategoryCatalog, ClassificationApi, ClassificationSubmitter,
    CoreError, FileId, HttpApi, SessionContext, config_file,
};

mod output;

use output::ColorMode;

/// clipsort - review and classify audio recordings from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the classification service
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe the service health endpoint
    Health,

    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        /// Password (falls back to CLIPSORT_PASSWORD)
        #[arg(long)]
        password: Option<String>,
    },

    /// Create a reviewer account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },

    /// Forget the stored session token
    Logout,

    /// Fetch the next unclassified file
    Next,

    /// Classify a file (category label or v/s/a/u shortcut)
    Classify { id: FileId, category: String },

    /// Show classification history
    History {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        size: Option<usize>,
    },

    /// List the categories a file can be classified as
    Categories,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let settings = config_file::load_config().resolve();
    let base_url = cli
        .api_url
        .or_else(|| std::env::var("CLIPSORT_API_URL").ok())
        .unwrap_or(settings.base_url);
    let color = ColorMode(!cli.no_color);

    let context = Arc::new(match SessionContext::default_path() {
        Some(path) => SessionContext::load(path),
        None => SessionContext::in_memory(),
    });
    let api = HttpApi::new(base_url, context.clone());
    let mut out = std::io::stdout().lock();

    match cli.command {
        Command::Health => {
            let availability = Availability::from_probe(&api.health().await);
            output::print_health(&mut out, api.base_url(), availability, color)?;
            if availability != Availability::Available {
                anyhow::bail!("service is {}", availability.label());
            }
        }
        Command::Login { email, password } => {
            let password = password
                .or_else(|| std::env::var("CLIPSORT_PASSWORD").ok())
                .ok_or_else(|| anyhow::anyhow!("--password or CLIPSORT_PASSWORD is required"))?;
            let form = AuthForm {
                mode: AuthMode::Login,
                email,
                password,
                ..AuthForm::default()
            };
            let outcome = authenticate(&api, &context, form).await?;
            output::print_auth(&mut out, &outcome, color)?;
        }
        Command::Register {
            email,
            password,
            confirm,
        } => {
            let form = AuthForm {
                mode: AuthMode::Register,
                email,
                password,
                confirm,
                ..AuthForm::default()
            };
            let outcome = authenticate(&api, &context, form).await?;
            output::print_auth(&mut out, &outcome, color)?;
        }
        Command::Logout => {
            context.sign_out().map_err(explain)?;
            writeln!(out, "Signed out")?;
        }
        Command::Next => {
            let file = api.random_file().await.map_err(explain)?;
            output::print_file(&mut out, &file, color)?;
        }
        Command::Classify { id, category } => {
            let category = parse_category(&category);
            let submitter = ClassificationSubmitter::new(Arc::new(api));
            submitter
                .submit(id, category.clone())
                .await
                .map_err(explain)?;
            output::print_classified(&mut out, id, &category, color)?;
        }
        Command::History { page, size } => {
            let size = size.unwrap_or(settings.page_size).max(1);
            let page = api
                .history(page.saturating_sub(1), size)
                .await
                .map_err(explain)?;
            output::print_history(&mut out, &page, color)?;
        }
        Command::Categories => {
            // The built-ins are always offered, even without the catalog.
            let entries = match api.categories().await {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(error = %e, "category catalog unavailable");
                    Vec::new()
                }
            };
            output::print_categories(&mut out, &CategoryCatalog::from_entries(&entries), color)?;
        }
    }

    Ok(())
}

/// Validate the form the same way the TUI does, then submit it.
async fn authenticate(
    api: &HttpApi,
    context: &SessionContext,
    mut form: AuthForm,
) -> anyhow::Result<auth::AuthOutcome> {
    let availability = Availability::from_probe(&api.health().await);
    let request = form.prepare(availability).map_err(explain)?;
    let result = auth::submit(api, context, request).await;
    form.finish(&result);
    match result {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            let message = form.error.unwrap_or_else(|| e.user_message());
            Err(anyhow::Error::new(e).context(message))
        }
    }
}

fn parse_category(input: &str) -> Category {
    let mut chars = input.chars();
    if let (Some(c), None) = (chars.next(), chars.next())
        && let Some(category) = Category::from_shortcut(c)
    {
        return category;
    }
    Category::from_label(input)
}

fn explain(e: CoreError) -> anyhow::Error {
    let message = e.user_message();
    anyhow::Error::new(e).context(message)
}
