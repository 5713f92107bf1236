// ABOUTME: Account commands: login, logout, signup, whoami and password recovery
// ABOUTME: Prompts for anything not given as an argument and never echoes passwords

use anyhow::Result;
use colored::*;
use inquire::{Confirm, Password, Text};
use storyloom_cli::App;
use storyloom_core::{LoginRequest, PasswordRecovery, PasswordReset, UserRegister};

use super::value_or_prompt;

fn prompt_password(prompt: &str) -> Result<String> {
    Ok(Password::new(prompt).without_confirmation().prompt()?)
}

pub async fn login(app: &App, email: Option<String>) -> Result<()> {
    let email = value_or_prompt(email, "Email:")?;
    let password = prompt_password("Password:")?;

    let user = app.mutations.login(LoginRequest { email, password }).await?;
    println!(
        "{} Signed in as {}",
        "✓".green(),
        user.display_name().cyan()
    );
    Ok(())
}

pub fn logout(app: &App) -> Result<()> {
    app.mutations.logout()?;
    println!("{} Signed out", "✓".green());
    Ok(())
}

pub async fn signup(app: &App, email: Option<String>, name: Option<String>) -> Result<()> {
    println!("{}", "Create a Storyloom account".blue().bold());
    println!();

    let email = value_or_prompt(email, "Email:")?;
    let name = match name {
        Some(name) => Some(name),
        None => {
            let name = Text::new("Full name (optional):").prompt()?;
            if name.trim().is_empty() {
                None
            } else {
                Some(name)
            }
        }
    };
    let password = prompt_password("Password:")?;
    let password_confirm = prompt_password("Confirm password:")?;

    let user = app
        .mutations
        .register(UserRegister {
            email,
            password,
            password_confirm,
            name,
        })
        .await?;
    println!("{} Account created for {}", "✓".green(), user.email.cyan());
    println!("{}", "Use 'storyloom login' to sign in".dimmed());
    Ok(())
}

pub async fn whoami(app: &App) -> Result<()> {
    let user = app.require_user().await?;
    println!("{} ({})", user.display_name().cyan().bold(), user.email);
    println!("{:<10} {}", "ID:".bold(), user.id);
    if !user.verified {
        println!("{}", "Email address not verified".yellow());
    }
    Ok(())
}

pub async fn recover_password(app: &App, email: Option<String>) -> Result<()> {
    let email = value_or_prompt(email, "Email:")?;
    app.services
        .auth
        .recover_password(PasswordRecovery { email })
        .await?;
    println!("{} Password recovery email sent", "✓".green());
    Ok(())
}

pub async fn reset_password(app: &App, token: Option<String>) -> Result<()> {
    let token = value_or_prompt(token, "Reset token:")?;
    let password = prompt_password("New password:")?;
    let password_confirm = prompt_password("Confirm new password:")?;

    app.services
        .auth
        .reset_password(PasswordReset {
            token,
            password,
            password_confirm,
        })
        .await?;
    println!("{} Password updated", "✓".green());
    Ok(())
}

pub async fn delete_account(app: &App, yes: bool) -> Result<()> {
    let user = app.require_user().await?;
    if !yes {
        println!(
            "{}",
            "All your projects, user stories and test cases will be permanently deleted.".yellow()
        );
        let confirmed = Confirm::new(&format!("Delete the account {}?", user.email))
            .with_default(false)
            .prompt()?;
        if !confirmed {
            println!("{}", "Deletion cancelled".yellow());
            return Ok(());
        }
    }

    app.mutations.delete_account().await?;
    println!("{} Account deleted", "✓".green());
    Ok(())
}
