use std::path::PathBuf;
use std::sync::Arc;

use brandsite::config::{ApiConfig, ConfigError};
use brandsite::net::ApiClient;
use brandsite::net::error::ApiError;
use brandsite::net::types::{ClientMessage, LoginCredentials, SignupCredentials};
use brandsite::session::{FileSession, SessionStore};
use brandsite::state::auth::AuthController;
use brandsite::state::contact::{ContactForm, ContactStatus};
use brandsite::state::dashboard::{
    CheckoutState, DashboardState, Section, average_rating, page_views_ranked, referrers_ranked, reviews_newest_first,
    star_bar, total_page_views,
};
use brandsite::state::user::UserResolver;
use brandsite::util::scope::ViewScope;
use clap::{Parser, Subcommand};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("environment file error: {0}")]
    DotEnv(#[from] dotenvy::Error),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("not logged in; run `brandsite login` first")]
    NotLoggedIn,
    #[error("{0}")]
    Failed(String),
}

#[derive(Parser, Debug)]
#[command(name = "brandsite", about = "Studio site client: auth, dashboard data, checkout, contact")]
struct Cli {
    /// Where the session token is kept between runs.
    #[arg(long, env = "BRANDSITE_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BRANDSITE_PASSWORD")]
        password: String,
        /// Site path to continue at after login.
        #[arg(long)]
        redirect: Option<String>,
    },
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BRANDSITE_PASSWORD")]
        password: String,
        #[arg(long)]
        name: Option<String>,
    },
    Logout,
    Whoami,
    Dashboard,
    Messages,
    Checkout,
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        product: String,
        #[arg(long)]
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded environment file"),
        Err(err) if err.not_found() => {}
        Err(err) => return Err(err.into()),
    }

    let cli = Cli::parse();
    let config = ApiConfig::from_env()?;
    let session_path = cli.session_file.unwrap_or_else(FileSession::default_path);
    let session: Arc<dyn SessionStore> = Arc::new(FileSession::new(session_path));
    let api = ApiClient::new(config, session)?;

    match cli.command {
        Command::Login { email, password, redirect } => run_login(api, email, password, redirect).await,
        Command::Signup { email, password, name } => run_signup(api, email, password, name).await,
        Command::Logout => {
            let redirect = AuthController::new(api).logout();
            println!("Logged out. Continue at {}", redirect.target);
            Ok(())
        }
        Command::Whoami => run_whoami(api).await,
        Command::Dashboard => run_dashboard(&api).await,
        Command::Messages => run_messages(&api).await,
        Command::Checkout => run_checkout(&api).await,
        Command::Contact { name, email, product, message } => {
            let mut form = ContactForm { name, email, product, message, status: ContactStatus::Idle };
            match form.submit(&api).await {
                ContactStatus::Failed(message) => Err(CliError::Failed(message.clone())),
                _ => {
                    println!("Message sent.");
                    Ok(())
                }
            }
        }
    }
}

async fn run_login(api: ApiClient, email: String, password: String, redirect: Option<String>) -> Result<(), CliError> {
    let mut auth = AuthController::new(api);
    let redirect = auth.login(&LoginCredentials { email, password }, redirect.as_deref()).await?;
    println!("Logged in. Continue at {}", redirect.target);
    Ok(())
}

async fn run_signup(api: ApiClient, email: String, password: String, name: Option<String>) -> Result<(), CliError> {
    let mut auth = AuthController::new(api);
    let redirect = auth.signup(&SignupCredentials { email, password, name }).await?;
    println!("Account created. Continue at {}", redirect.target);
    Ok(())
}

async fn run_whoami(api: ApiClient) -> Result<(), CliError> {
    if !api.session().is_authenticated() {
        return Err(CliError::NotLoggedIn);
    }
    let scope = ViewScope::new();
    let mut resolver = UserResolver::new(api);
    resolver.activate(&scope.guard()).await;
    if let Some(error) = resolver.error() {
        return Err(CliError::Failed(error.to_owned()));
    }
    match resolver.user() {
        Some(user) => {
            println!("{}", user.display_name());
            if let Some(email) = user.email.as_deref() {
                println!("  email: {email}");
            }
            if let Some(id) = &user.id {
                println!("  id:    {id}");
            }
            Ok(())
        }
        None => Err(CliError::NotLoggedIn),
    }
}

async fn run_dashboard(api: &ApiClient) -> Result<(), CliError> {
    let scope = ViewScope::new();
    let mut dashboard = DashboardState::new();
    dashboard.load(api, &scope.guard()).await;

    println!("== Client messages ==");
    print_section(&dashboard.messages, |messages| print_messages(messages));

    println!();
    println!("== Analytics ==");
    print_section(&dashboard.analytics, |snapshot| {
        println!("unique visits: {}", snapshot.unique_visits);
        println!("page views:    {}", total_page_views(snapshot));
        for (path, views) in page_views_ranked(snapshot) {
            println!("  {views:>6}  {path}");
        }
        println!("top referrers:");
        for referrer in referrers_ranked(snapshot) {
            println!("  {:>6}  {}", referrer.count, referrer.label());
        }
    });

    println!();
    println!("== Reviews ==");
    print_section(&dashboard.reviews, |reviews| {
        if let Some(average) = average_rating(reviews) {
            println!("average: {average:.1} {}", star_bar(average));
        }
        for review in reviews_newest_first(reviews) {
            let when = review.created_at.as_ref().map(|t| t.display()).unwrap_or_default();
            println!("  {} {when}", star_bar(review.rating()));
            println!("    {}", review.message_text());
        }
    });

    if let Some(message) = dashboard.selected_message() {
        println!();
        println!("Review request draft for message {}:", message.id);
        println!("{}", dashboard.draft.message);
    }
    Ok(())
}

async fn run_messages(api: &ApiClient) -> Result<(), CliError> {
    let messages = api.client_messages().await?;
    print_messages(&messages);
    Ok(())
}

async fn run_checkout(api: &ApiClient) -> Result<(), CliError> {
    let scope = ViewScope::new();
    let mut checkout = CheckoutState::default();
    match checkout.begin(api, &scope.guard()).await {
        Some(redirect) => {
            println!("{}", redirect.target);
            Ok(())
        }
        None => Err(CliError::Failed(checkout.error.unwrap_or_default())),
    }
}

fn print_section<T>(section: &Section<T>, render: impl FnOnce(&T)) {
    match &section.error {
        Some(error) => println!("error: {error}"),
        None => render(&section.data),
    }
}

fn print_messages(messages: &[ClientMessage]) {
    if messages.is_empty() {
        println!("(none)");
    }
    for message in messages {
        println!("[{}] {}", message.id, message.message);
    }
}
