//! Stored conversation listing and inspection.

use clap::{Parser, Subcommand};

use crate::cli::CommandContext;
use crate::error::CliError;
use atelier_api::ConversationClient;
use atelier_common_core::ConversationId;

/// Inspect stored conversations.
#[derive(Debug, Parser)]
pub struct ConversationsCommand {
    #[command(subcommand)]
    pub action: ConversationsAction,
}

#[derive(Debug, Subcommand)]
pub enum ConversationsAction {
    /// List stored conversations
    List,
    /// Print the messages of one conversation
    Show {
        /// Conversation id
        id: i64,
    },
}

impl ConversationsCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let client = ConversationClient::new(ctx.api.clone());

        match &self.action {
            ConversationsAction::List => {
                let conversations = client.list().await?;
                if conversations.is_empty() {
                    println!("No stored conversations.");
                    return Ok(());
                }
                for conversation in conversations {
                    println!(
                        "{:>6}  {:<40} {:>4} msgs  {}  {}",
                        conversation.id.as_i64(),
                        conversation.title,
                        conversation.message_count,
                        conversation.date,
                        conversation.status
                    );
                }
            }
            ConversationsAction::Show { id } => {
                let messages = client.messages(ConversationId::new(*id)).await?;
                for message in messages {
                    let model = message
                        .model
                        .as_deref()
                        .map(|m| format!(" [{m}]"))
                        .unwrap_or_default();
                    println!("{}{}: {}", message.sender, model, message.content);
                }
            }
        }
        Ok(())
    }
}
