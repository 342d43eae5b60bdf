//! User management command handlers

use crate::config::Config;
use crate::db::{NewUser, Store};
use crate::domain::{Role, validate_email, validate_username};

pub async fn cmd_user_create(
    config: &Config,
    username: &str,
    email: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<()> {
    validate_username(username).map_err(anyhow::Error::msg)?;
    validate_email(email).map_err(anyhow::Error::msg)?;

    let min = config.security.min_password_length;
    if password.chars().count() < min {
        anyhow::bail!("Password must be at least {min} characters");
    }

    let store = Store::new(&config.general.database_path).await?;

    if store
        .is_username_or_email_taken(Some(username), Some(email), None)
        .await?
    {
        println!("Username or email already registered.");
        return Ok(());
    }

    let user = store
        .create_user(
            NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                role,
            },
            &config.security,
        )
        .await?;

    println!("Created {} '{}' (ID: {})", user.role, user.username, user.id);
    println!("API key: {}", user.api_key);

    Ok(())
}
