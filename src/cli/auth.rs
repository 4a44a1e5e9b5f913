use anyhow::{Result, anyhow};

use crate::core::{AppConfig, CredentialStore};

#[derive(clap::ValueEnum, Clone)]
pub enum AuthAction {
    /// Store an API key and optionally a model preference
    Set,
    /// Print the current credential status
    Show,
    /// Remove the stored API key
    Clear,
}

pub async fn run(
    config: &AppConfig,
    action: AuthAction,
    api_key: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let store = CredentialStore::open(&format!("{}/settings.db", config.storage_path)).await?;

    match action {
        AuthAction::Set => {
            let api_key = api_key.ok_or(anyhow!("--api-key is required with --action set"))?;
            store.set_api_key(&api_key).await?;
            if let Some(model) = model {
                store.set_model(&model).await?;
            }
            println!("Credential saved.");
        }
        AuthAction::Show => {
            match store.api_key().await? {
                Some(_) => println!("API key: set"),
                None => println!("API key: not set"),
            }
            let model = match store.model().await? {
                Some(model) => model,
                None => format!("{} (default)", config.model),
            };
            println!("Model: {}", model);
        }
        AuthAction::Clear => {
            store.clear_api_key().await?;
            println!("Credential removed.");
        }
    }

    Ok(())
}
