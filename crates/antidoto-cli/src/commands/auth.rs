use antidoto_core::auth;
use antidoto_core::storage::Database;
use antidoto_core::Event;
use chrono::Utc;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in with an allow-listed email
    Login {
        /// Email address
        email: String,
    },
    /// Clear the current session
    Logout,
    /// Show whether a session is present
    Status,
    /// Manage the sign-in allow-list
    Allow {
        #[command(subcommand)]
        action: AllowAction,
    },
}

#[derive(Subcommand)]
pub enum AllowAction {
    /// Add an email to the allow-list
    Add { email: String },
    /// Remove an email from the allow-list
    Remove { email: String },
    /// List allowed emails
    List,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        AuthAction::Login { email } => {
            let session = auth::sign_in(&db, &email)?;
            let event = Event::SignedIn {
                email: session.user.email.clone(),
                at: Utc::now(),
            };
            println!("{}", serde_json::to_string_pretty(&event)?);
            println!("Olá, {}", session.display_name());
        }
        AuthAction::Logout => {
            auth::sign_out(&db)?;
            let event = Event::SignedOut { at: Utc::now() };
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        AuthAction::Status => match auth::current_session(&db)? {
            Some(session) => println!("conectado como {}", session.user.email),
            None => println!("não conectado"),
        },
        AuthAction::Allow { action } => match action {
            AllowAction::Add { email } => {
                let email = auth::normalize_email(&email);
                db.allow_email(&email)?;
                println!("permitido: {email}");
            }
            AllowAction::Remove { email } => {
                let email = auth::normalize_email(&email);
                if db.revoke_email(&email)? {
                    println!("removido: {email}");
                } else {
                    println!("não estava na lista: {email}");
                }
            }
            AllowAction::List => {
                for email in db.list_allowed_emails()? {
                    println!("{email}");
                }
            }
        },
    }
    Ok(())
}
