//! Command-line arguments.

use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use iamctl_lib::auth::DEFAULT_TIMEOUT;

#[derive(Parser, Debug)]
#[command(name = "iamctl", author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding iamctl.json and server_details.json
    #[arg(long, global = true, env = "IAMCTL_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Save the service provider's client credentials
    Init(InitArgs),
    /// Exchange a username and password for tokens and store them
    Login(LoginArgs),
    /// Show the stored server and tokens
    Status,
    /// Delete the stored tokens
    Logout,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// OAuth client ID of the service provider
    #[arg(long, env = "IAMCTL_CLIENT_ID")]
    pub client_id: String,

    /// OAuth client secret of the service provider
    #[arg(long, env = "IAMCTL_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,

    /// Tenant domain the service provider is registered in
    #[arg(long, env = "IAMCTL_TENANT_DOMAIN", default_value = "carbon.super")]
    pub tenant_domain: String,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Identity server base URL, e.g. https://localhost:9443
    #[arg(short, long, env = "IAMCTL_SERVER")]
    pub server: String,

    /// Username to log in as
    #[arg(short, long, env = "IAMCTL_USERNAME")]
    pub username: String,

    /// Password for the user
    #[arg(short, long, env = "IAMCTL_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Skip TLS certificate verification (self-signed test servers only)
    #[arg(long)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Also send `user=<clientId>:<clientSecret>` in the form body
    #[arg(long)]
    pub legacy_user_field: bool,
}
