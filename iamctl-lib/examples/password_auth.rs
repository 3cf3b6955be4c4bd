//! Password authentication example.
//!
//! Run with: cargo run --example password_auth
//!
//! Requires .env file with:
//! - IAMCTL_CLIENT_ID
//! - IAMCTL_CLIENT_SECRET
//! - IAMCTL_TENANT_DOMAIN
//! - IAMCTL_SERVER
//! - IAMCTL_USERNAME
//! - IAMCTL_PASSWORD
//!
//! Set IAMCTL_INSECURE=1 to talk to a server with a self-signed certificate.

use std::env;

use iamctl_lib::auth::FlowOptions;
use iamctl_lib::auth::PasswordFlow;
use iamctl_lib::config::ClientCredentials;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let credentials = ClientCredentials::new(
        env::var("IAMCTL_CLIENT_ID").expect("IAMCTL_CLIENT_ID not set"),
        env::var("IAMCTL_CLIENT_SECRET").expect("IAMCTL_CLIENT_SECRET not set"),
        env::var("IAMCTL_TENANT_DOMAIN").expect("IAMCTL_TENANT_DOMAIN not set"),
    );
    let server = env::var("IAMCTL_SERVER").expect("IAMCTL_SERVER not set");
    let username = env::var("IAMCTL_USERNAME").expect("IAMCTL_USERNAME not set");
    let password = env::var("IAMCTL_PASSWORD").expect("IAMCTL_PASSWORD not set");
    let insecure = env::var("IAMCTL_INSECURE").is_ok_and(|v| v == "1");

    let options = FlowOptions::default().with_insecure(insecure);
    let flow = PasswordFlow::with_options(credentials, &username, &password, options)?;

    println!("Authenticating...\n");

    let token = flow.authenticate(&server).await?;

    println!("Authentication successful!");
    println!("Token type: {:?}", token.token_type);
    println!("Token expires at: {:?}", token.expires_at);
    println!("Granted scopes:");
    for scope in token.scopes() {
        println!("  {scope}");
    }

    Ok(())
}
