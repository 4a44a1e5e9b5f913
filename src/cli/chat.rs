use std::sync::Arc;

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::chat::{ChatRole, ChatSession};
use crate::core::{AppConfig, CredentialStore};
use crate::relay::{HttpRelay, Relay};
use crate::tools::page_tools;

pub async fn run(config: &AppConfig) -> Result<()> {
    let store = CredentialStore::open(&format!("{}/settings.db", config.storage_path)).await?;

    // The stored credential wins over the environment
    let api_key = match store.api_key().await? {
        Some(key) => key,
        None => config.api_key.clone(),
    };
    if api_key.is_empty() {
        println!("No API key configured. Run `webpilot auth --action set --api-key <KEY>` first.");
        return Ok(());
    }
    let model = match store.model().await? {
        Some(model) => model,
        None => config.model.clone(),
    };

    let relay: Arc<dyn Relay> = Arc::new(HttpRelay::new(&config.page_api_url));
    let tools = page_tools(relay);

    let mut session = ChatSession::builder(&config.api_hostname, &api_key, &model)
        .system_prompt(&config.system_message)
        .tools(tools)
        .build();

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                if line.trim() == "/clear" {
                    session.clear_messages();
                    println!("Conversation cleared.");
                    continue;
                }

                let seen = session.messages().len();
                session.submit_user_turn(&line).await;

                for msg in &session.messages()[seen..] {
                    match msg.role {
                        ChatRole::User => {}
                        ChatRole::Assistant => println!("{}", msg.content),
                        ChatRole::ToolResult => println!("[tool] {}", msg.content),
                    }
                }
                if let Some(err) = session.error() {
                    println!("Error: {}", err);
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
