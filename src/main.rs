use anyhow::{Context, Result, ensure};
use blog_gateway_rs::Gateway;
use blog_gateway_rs::auth::{SupabaseAuth, TokenOutcome};
use blog_gateway_rs::config::{ConfigOverrides, GatewayConfig, LogFormat, StoreKind};
use blog_gateway_rs::store::{MemoryStore, PostStore, SupabaseStore, sample_posts};
use blog_gateway_rs::telemetry;
use blog_gateway_rs::trophy::TrophyClient;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "blog-gateway",
    version,
    about = "GraphQL gateway for a Supabase-backed blog"
)]
struct Cli {
    /// Configuration file (defaults to ./blog-gateway.toml when present)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[arg(long, value_name = "HOST", global = true)]
    host: Option<String>,

    #[arg(short, long, value_name = "PORT", global = true)]
    port: Option<u16>,

    /// Post store backend
    #[arg(long, value_enum, global = true)]
    store: Option<StoreKind>,

    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve HTTP requests (default)
    Serve,
    /// Insert the sample posts into the configured store
    Seed {
        /// Bearer token used for the inserts; the anon key when omitted
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,
    },
    /// Sign in (or sign up) with Supabase Auth and print a user access token
    Token {
        #[arg(value_name = "EMAIL")]
        email: String,
        #[arg(value_name = "PASSWORD")]
        password: String,
    },
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            store: self.store,
            log_format: self.log_format,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = GatewayConfig::load(cli.config.as_deref(), &cli.overrides())
        .context("failed to load gateway configuration")?;
    telemetry::init(config.log_format);

    let client = reqwest::Client::builder()
        .build()
        .context("failed to build HTTP client")?;
    let store = build_store(&config, client.clone());

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, store, client).await,
        Command::Seed { token } => seed(&config, store.as_ref(), token).await,
        Command::Token { email, password } => token(&config, client, &email, &password).await,
    }
}

fn build_store(config: &GatewayConfig, client: reqwest::Client) -> Arc<dyn PostStore> {
    match config.store {
        StoreKind::Supabase => Arc::new(SupabaseStore::new(
            client,
            &config.supabase_url,
            config.supabase_anon_key.clone(),
        )),
        StoreKind::Memory => {
            warn!("using the in-memory post store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    }
}

async fn serve(
    config: GatewayConfig,
    store: Arc<dyn PostStore>,
    client: reqwest::Client,
) -> Result<()> {
    let options = config
        .cors_options()
        .context("invalid allowed origin list")?;
    let trophies = Arc::new(TrophyClient::new(client, config.trophy_url.clone()));
    let gateway = Gateway::build(options, store, trophies, &config.base_url)
        .context("failed to build gateway")?;

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(%address, store = ?config.store, "Server running on http://{address}");

    gateway.serve(listener).await.context("server error")
}

async fn seed(config: &GatewayConfig, store: &dyn PostStore, token: Option<String>) -> Result<()> {
    let token = token.unwrap_or_else(|| config.supabase_anon_key.clone());
    for post in sample_posts() {
        let title = post.title.clone();
        let created = store
            .create_post(post, &token)
            .await
            .with_context(|| format!("failed to insert sample post {title:?}"))?;
        info!(id = %created.id, title = %created.title, "inserted sample post");
    }
    info!("sample data inserted");
    Ok(())
}

async fn token(
    config: &GatewayConfig,
    client: reqwest::Client,
    email: &str,
    password: &str,
) -> Result<()> {
    ensure!(
        !config.supabase_url.trim().is_empty() && !config.supabase_anon_key.trim().is_empty(),
        "Missing SUPABASE_URL or SUPABASE_ANON_KEY"
    );
    let auth = SupabaseAuth::new(client, &config.supabase_url, config.supabase_anon_key.clone());
    info!(email, "requesting access token");

    let outcome = match auth.acquire_token(email, password).await {
        Ok(outcome) => outcome,
        Err(err) => {
            if let Some(hint) = err.hint() {
                eprintln!("{hint}");
            }
            return Err(err).context("failed to obtain an access token");
        }
    };

    match &outcome {
        TokenOutcome::SignedIn { .. } => println!("Successfully signed in (user already exists)!"),
        TokenOutcome::SignedUp { .. } => {
            println!("User created successfully and confirmed automatically!")
        }
        TokenOutcome::ConfirmationRequired { user_id } => {
            println!("User created successfully!");
            if let Some(user_id) = user_id {
                println!("User ID: {user_id}");
            }
            println!("\nEmail confirmation required!");
            println!("Please check your email inbox and click the confirmation link.");
            println!("After confirming, run this command again with the same credentials.");
            println!("\nTo skip email confirmation for testing, disable it in:");
            println!("Supabase Dashboard > Authentication > Providers > Email > 'Confirm email'");
        }
    }
    if let Some(access_token) = outcome.access_token() {
        print_token(access_token, config.port);
    }
    Ok(())
}

fn print_token(access_token: &str, port: u16) {
    let rule = "-".repeat(80);
    let preview = access_token.get(..50).unwrap_or(access_token);
    println!("\nYour JWT token:");
    println!("{rule}");
    println!("{access_token}");
    println!("{rule}");
    println!("\nUse it in the Authorization header:");
    println!("Authorization: Bearer {preview}...");
    println!("\nTry it with curl:");
    println!("curl -X POST http://localhost:{port}/graphql \\");
    println!("  -H \"Content-Type: application/json\" \\");
    println!("  -H \"Authorization: Bearer {access_token}\" \\");
    println!(
        "  -d '{{\"query\":\"mutation {{ createPost(title: \\\"Test Post\\\", content: \\\"Content\\\", author: \\\"Test Author\\\") {{ id title }} }}\"}}'"
    );
    println!("\nThis token expires in 1 hour. Run this command again to get a new one.");
}
