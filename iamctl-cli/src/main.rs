mod cli;

use std::fs::File;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use iamctl_lib::LoginRequest;
use iamctl_lib::auth::FlowOptions;
use iamctl_lib::config::ClientCredentials;
use iamctl_lib::error::Error;
use iamctl_lib::login;
use iamctl_lib::paths;
use iamctl_lib::paths::Paths;
use iamctl_lib::store::FileTokenStore;
use iamctl_lib::store::TokenStore;
use simplelog::ColorChoice;
use simplelog::CombinedLogger;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::SharedLogger;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

use crate::cli::Cli;
use crate::cli::Command;
use crate::cli::InitArgs;
use crate::cli::LoginArgs;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("Exiting with error: {:?}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Warnings go to stderr (everything with `-v`); the log file always gets debug.
fn init_logging(verbose: bool) {
    let term_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    let mut rotation = Ok(());
    if let Some(log_path) = paths::log_file() {
        if let Some(dir) = log_path.parent() {
            rotation = std::fs::create_dir_all(dir).and_then(|()| paths::rotate_logs(dir));
        }
        if let Ok(file) = File::create(&log_path) {
            loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file));
        }
    }

    let _ = CombinedLogger::init(loggers);

    if let Err(e) = rotation {
        log::warn!("Failed to rotate old logs: {}", e);
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let paths = Paths::resolve(cli.config_dir.as_deref())?;
    log::debug!("Using {:?}", paths);

    match cli.command {
        Command::Init(args) => init(&paths, args).await,
        Command::Login(args) => login_cmd(&paths, args).await,
        Command::Status => status(&paths).await,
        Command::Logout => logout(&paths).await,
    }
}

async fn init(paths: &Paths, args: InitArgs) -> Result<(), Error> {
    let credentials = ClientCredentials::new(args.client_id, args.client_secret, args.tenant_domain);
    credentials.save(&paths.config_file).await?;

    println!("Client configuration saved to {}", paths.config_file.display());
    Ok(())
}

async fn login_cmd(paths: &Paths, args: LoginArgs) -> Result<(), Error> {
    let credentials = ClientCredentials::load(&paths.config_file).await?;
    let options = FlowOptions::default()
        .with_timeout(Duration::from_secs(args.timeout))
        .with_insecure(args.insecure)
        .with_legacy_user_field(args.legacy_user_field);
    let store = FileTokenStore::new(&paths.server_details_file);
    let request = LoginRequest::new(args.server, args.username, args.password);

    let details = login(&request, &credentials, options, &store).await?;

    println!("Logged in to {}", details.server);
    if let Some(expires_at) = details.expires_at {
        println!("Access token expires at {}", expires_at.with_timezone(&chrono::Local));
    }
    Ok(())
}

async fn status(paths: &Paths) -> Result<(), Error> {
    let store = FileTokenStore::new(&paths.server_details_file);
    let Some(details) = store.load().await? else {
        println!("Not logged in");
        return Ok(());
    };

    println!("Server:        {}", details.server);
    println!("Access token:  {}", details.masked_access_token());
    println!("Refresh token: {}", details.masked_refresh_token());
    println!("Logged in at:  {}", details.saved_at.with_timezone(&chrono::Local));
    match details.expires_at {
        Some(exp) if details.is_expired() => {
            println!("Expired at:    {}", exp.with_timezone(&chrono::Local))
        }
        Some(exp) => println!("Expires at:    {}", exp.with_timezone(&chrono::Local)),
        None => println!("Expires at:    unknown"),
    }
    Ok(())
}

async fn logout(paths: &Paths) -> Result<(), Error> {
    FileTokenStore::new(&paths.server_details_file).clear().await?;
    println!("Removed stored tokens");
    Ok(())
}
