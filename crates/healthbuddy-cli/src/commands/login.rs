use clap::Args;
use healthbuddy_core::{Authenticator, Config, Credentials, DemoAuthenticator};

#[derive(Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(long, default_value = "")]
    pub email: String,
    /// Account password
    #[arg(long, default_value = "")]
    pub password: String,
}

pub fn run(args: LoginArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let auth = DemoAuthenticator::new(config.demo_credentials());

    let session = auth.authenticate(&Credentials::new(args.email, args.password))?;
    println!("{}", serde_json::to_string_pretty(&session)?);
    Ok(())
}
