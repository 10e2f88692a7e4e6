//! Dashboard sign-in and sign-out.

use clap::Args;

use serenity_admin::AuthSession;
use serenity_core::validation::{LoginForm, RegisterForm};
use serenity_storefront::AppState;

use crate::output;

// No `Debug`: these hold passwords.

#[derive(Args)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub email: String,

    #[arg(long, env = "SERENITY_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(short, long)]
    pub name: String,

    #[arg(short, long)]
    pub email: String,

    #[arg(long, env = "SERENITY_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Defaults to the password
    #[arg(long)]
    pub password_confirmation: Option<String>,
}

pub async fn login(state: &AppState, args: LoginArgs) -> Result<(), Box<dyn std::error::Error>> {
    let form = LoginForm {
        email: args.email,
        password: args.password,
    };
    AuthSession::new(state).login(&form).await?;
    output::line(format!("Signed in as {}", form.email));
    Ok(())
}

pub async fn register(state: &AppState, args: RegisterArgs) -> Result<(), Box<dyn std::error::Error>> {
    let form = RegisterForm {
        name: args.name,
        email: args.email,
        password_confirmation: args.password_confirmation.unwrap_or_else(|| args.password.clone()),
        password: args.password,
    };
    let session = AuthSession::new(state);
    session.register(&form).await?;
    if session.is_authenticated() {
        output::line(format!("Registered and signed in as {}", form.email));
    } else {
        output::line(format!("Registered {}; sign in to continue", form.email));
    }
    Ok(())
}

pub async fn logout(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    AuthSession::new(state).logout().await?;
    output::line("Signed out");
    Ok(())
}
