//! Entry point for the `ctbot` continuous-testing bot binary.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use ctbot_runtime::{run_continuous_testing_bot, ContinuousTestingRuntimeConfig};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

#[derive(Debug, Parser)]
#[command(
    name = "ctbot",
    about = "GitHub App bot that mirrors continuous-testing results onto labeled pull requests",
    version
)]
struct Cli {
    #[arg(
        long = "app-id",
        env = "APP_ID",
        help = "GitHub App identifier, used as the JWT issuer"
    )]
    app_id: String,

    #[arg(
        long = "private-key",
        env = "PRIVATE_KEY",
        hide_env_values = true,
        help = "PEM-encoded RSA private key of the GitHub App"
    )]
    private_key: String,

    #[arg(
        long = "artifact-base-url",
        env = "CTBOT_ARTIFACT_BASE_URL",
        help = "Base URL of the artifact store publishing {commit}.json test reports"
    )]
    artifact_base_url: String,

    #[arg(
        long = "required-label",
        env = "CTBOT_REQUIRED_LABEL",
        default_value = "continuous-testing",
        help = "Pull request label that opts a PR into result comments"
    )]
    required_label: String,

    #[arg(
        long = "poll-interval-seconds",
        env = "CTBOT_POLL_INTERVAL_SECONDS",
        default_value_t = 60,
        help = "Seconds to sleep between poll cycles"
    )]
    poll_interval_seconds: u64,

    #[arg(
        long = "max-pull-requests",
        env = "CTBOT_MAX_PULL_REQUESTS",
        default_value_t = 40,
        help = "Maximum open pull requests scanned per repository each cycle"
    )]
    max_pull_requests: usize,

    #[arg(
        long = "github-api-base",
        env = "CTBOT_GITHUB_API_BASE",
        default_value = "https://api.github.com",
        help = "GitHub API base URL"
    )]
    github_api_base: String,

    #[arg(
        long = "bot-login",
        env = "CTBOT_BOT_LOGIN",
        help = "Bot login used to find the canonical comment; resolved from the app slug when omitted"
    )]
    bot_login: Option<String>,

    #[arg(
        long = "request-timeout-ms",
        env = "CTBOT_REQUEST_TIMEOUT_MS",
        default_value_t = 30_000,
        help = "Per-request timeout for GitHub and artifact-store calls"
    )]
    request_timeout_ms: u64,

    #[arg(
        long = "poll-once",
        default_value_t = false,
        help = "Run exactly one poll cycle and exit"
    )]
    poll_once: bool,
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run_continuous_testing_bot(ContinuousTestingRuntimeConfig {
        app_id: cli.app_id,
        private_key_pem: cli.private_key,
        api_base: cli.github_api_base,
        artifact_base_url: cli.artifact_base_url,
        required_label: cli.required_label,
        bot_login: cli.bot_login,
        poll_interval: Duration::from_secs(cli.poll_interval_seconds),
        poll_once: cli.poll_once,
        max_pull_requests: cli.max_pull_requests,
        request_timeout_ms: cli.request_timeout_ms,
    })
    .await
}
