// ABOUTME: Sign-in, sign-out, registration and password commands
// ABOUTME: Credentials are entered through the same form controllers the screens use

use clap::Subcommand;
use colored::*;
use inquire::{Password, PasswordDisplayMode, Text};

use itms_cli::output::{self, print_details};
use itms_cli::{parse_form_assignments, prompt, Tabular};
use itms_client::ItmsClient;
use itms_controllers::forms::{ChangePasswordForm, LoginForm, RegisterForm};
use itms_controllers::{FormController, ProfileForm, Rule};
use itms_core::models::auth::ForgotPasswordRequest;

use super::{apply_assignments, submit_form};

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ProfileCommands {
    /// Show your profile
    Show,
    /// Change profile fields, e.g. --set phoneNumber=010-1234-5678
    Update {
        #[arg(long = "set", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },
}

pub async fn login(client: &ItmsClient, email: Option<String>) -> anyhow::Result<()> {
    let form = FormController::new(LoginForm);
    match email {
        Some(email) => {
            form.set_value("email", email)?;
            let password = Password::new("Password:")
                .with_display_mode(PasswordDisplayMode::Masked)
                .without_confirmation()
                .prompt()?;
            form.set_value("password", password)?;
        }
        None => prompt::fill_form(&form)?,
    }

    let auth = client.auth();
    let response =
        submit_form(&form, move |request| async move { auth.login(&request).await }).await?;
    println!(
        "Signed in as {} <{}>",
        response.user.name.bold(),
        response.user.email
    );
    Ok(())
}

pub async fn logout(client: &ItmsClient) -> anyhow::Result<()> {
    if let Err(e) = client.auth().logout().await {
        output::warning(&format!("Server sign-out failed: {}", e.user_message()));
    }
    output::success("Signed out");
    Ok(())
}

pub async fn me(client: &ItmsClient) -> anyhow::Result<()> {
    let user = client.auth().me().await?;
    print_details(&user.title(), &user.details());
    Ok(())
}

pub async fn register(client: &ItmsClient) -> anyhow::Result<()> {
    println!("{}", "Create an account".blue().bold());
    println!();

    let form = FormController::new(RegisterForm);
    prompt::fill_form(&form)?;

    let auth = client.auth();
    submit_form(&form, move |request| async move { auth.register(&request).await }).await?;
    println!("{}", "Next: itms login".dimmed());
    Ok(())
}

pub async fn change_password(client: &ItmsClient) -> anyhow::Result<()> {
    let form = FormController::new(ChangePasswordForm);
    prompt::fill_form(&form)?;

    let auth = client.auth();
    submit_form(&form, move |request| async move {
        auth.change_password(&request).await
    })
    .await?;

    // The old tokens belong to the old password
    client.auth_context().clear().await?;
    println!("{}", "Next: itms login".dimmed());
    Ok(())
}

pub async fn forgot_password(client: &ItmsClient, email: Option<String>) -> anyhow::Result<()> {
    let email = match email {
        Some(email) => email,
        None => Text::new("Email:").prompt()?,
    };
    Rule::Required.check("Email", &email)?;
    Rule::email().check("Email", &email)?;

    client
        .auth()
        .forgot_password(&ForgotPasswordRequest {
            email: email.trim().to_string(),
        })
        .await?;
    output::success("If the address is registered, a reset link is on its way");
    Ok(())
}

pub async fn profile(client: &ItmsClient, command: ProfileCommands) -> anyhow::Result<()> {
    match command {
        ProfileCommands::Show => {
            let user = client.profile().get().await?;
            print_details(&user.title(), &user.details());
        }
        ProfileCommands::Update { fields } => {
            let assignments = parse_form_assignments(&fields)?;
            let profile = client.profile();
            let form = FormController::new(ProfileForm::new(&profile.get().await?));
            apply_assignments(&form, assignments)?;

            let user =
                submit_form(&form, move |request| async move { profile.update(&request).await })
                    .await?;
            println!();
            print_details(&user.title(), &user.details());
        }
    }
    Ok(())
}
