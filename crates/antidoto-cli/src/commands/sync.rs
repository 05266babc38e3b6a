//! Sync subcommand for the remote row store.
//!
//! `push` uploads the local diary entries as keyed upserts; `pull`
//! fetches the remote collection and upserts it locally. Meditation rows
//! are append-only with no natural key and are not bulk-synced.

use antidoto_core::error::CoreError;
use antidoto_core::remote::RemoteClient;
use antidoto_core::storage::{Config, Database};
use antidoto_core::auth;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum SyncAction {
    /// Upload local diary entries to the remote store
    Push,
    /// Fetch remote diary entries and upsert them locally
    Pull,
    /// Show local and remote row counts
    Status,
}

pub fn run(action: SyncAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let session = auth::require_session(&db)?;
    let config = Config::load_or_default();
    let client = RemoteClient::from_config(&config.remote)?;
    let runtime = tokio::runtime::Runtime::new()?;

    match action {
        SyncAction::Push => {
            let entries = db.list_entries(&session.user.id)?;
            runtime.block_on(async {
                for entry in &entries {
                    client.upsert_entry(&session.user.id, entry).await?;
                }
                Ok::<(), CoreError>(())
            })?;
            println!("enviadas: {} entradas", entries.len());
        }
        SyncAction::Pull => {
            let remote_entries = runtime.block_on(client.fetch_entries(&session.user.id))?;
            for entry in &remote_entries {
                db.upsert_entry(&session.user.id, entry)?;
            }
            println!("recebidas: {} entradas", remote_entries.len());
        }
        SyncAction::Status => {
            let local_entries = db.list_entries(&session.user.id)?.len();
            let remote_entries = runtime
                .block_on(client.fetch_entries(&session.user.id))?
                .len();
            let remote_meditations = runtime
                .block_on(client.fetch_meditations(&session.user.id))?
                .len();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "local_entries": local_entries,
                    "remote_entries": remote_entries,
                    "remote_meditations": remote_meditations,
                }))?
            );
        }
    }
    Ok(())
}
