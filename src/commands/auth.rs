use anyhow::{Context, Result};
use gymdesk_core::ApiClient;
use gymdesk_core::models::RegisterRequest;
use owo_colors::OwoColorize;

use crate::render::Render;
use crate::utils::tui::{self, prompt_password, text_or_prompt};

pub async fn login(client: &ApiClient, email: Option<String>, password: Option<String>) -> Result<()> {
    let email = text_or_prompt(email, "Email")?;
    let password = match password {
        Some(p) => p,
        None => prompt_password("Password")?,
    };

    let spinner = tui::create_spinner(format!("Signing in to {}", client.base_url()));
    let result = client.login(&email, &password).await;
    spinner.finish_and_clear();

    let response = result.context("Login failed")?;
    println!(
        "{} Signed in as {} ({})",
        "✓".green(),
        response.user.display_name().bold(),
        response.user.role
    );
    Ok(())
}

pub async fn register(
    client: &ApiClient,
    name: Option<String>,
    email: Option<String>,
) -> Result<()> {
    let name = text_or_prompt(name, "Name")?;
    let email = text_or_prompt(email, "Email")?;
    let password = prompt_password("Password")?;
    let confirm = prompt_password("Confirm password")?;

    if password != confirm {
        anyhow::bail!("Passwords do not match");
    }

    let request = RegisterRequest {
        email,
        password,
        name,
    };
    let response = client.register(&request).await.context("Registration failed")?;

    println!(
        "{} Account created for {}",
        "✓".green(),
        response.user.display_name().bold()
    );
    Ok(())
}

pub async fn logout(client: &ApiClient) -> Result<()> {
    client.logout().await?;
    println!("Signed out");
    Ok(())
}

pub async fn me(client: &ApiClient) -> Result<()> {
    let user = client.me().await?;
    println!("{}", user.render());
    if !user.assigned_club_ids.is_empty() {
        println!("   clubs: {}", user.assigned_club_ids.join(", ").dimmed());
    }
    Ok(())
}

pub async fn change_password(client: &ApiClient) -> Result<()> {
    let current = prompt_password("Current password")?;
    let new = prompt_password("New password")?;
    let confirm = prompt_password("Confirm new password")?;

    if new != confirm {
        anyhow::bail!("New passwords do not match");
    }

    client.change_password(&current, &new).await?;
    println!("{} Password changed", "✓".green());
    Ok(())
}
