//! Interactive conversation curation.

use clap::Parser;
use std::io::{self, Write};

use crate::cli::CommandContext;
use crate::error::CliError;
use atelier_api::ConversationClient;
use atelier_common_core::{ConversationId, EntryId};
use atelier_conversation::{Entry, EntryKind};
use atelier_workbench::{ChatSession, SessionConfig};

/// Curate a conversation: send prompts, compare candidates, select or
/// reject, critique rejected turns.
#[derive(Debug, Parser)]
pub struct ChatCommand {
    /// Resume a stored conversation instead of starting a new one
    #[arg(short, long)]
    pub resume: Option<i64>,

    /// Override the primary model
    #[arg(long)]
    pub model: Option<String>,

    /// Override the secondary model
    #[arg(long)]
    pub secondary: Option<String>,
}

impl ChatCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let primary = self
            .model
            .clone()
            .unwrap_or_else(|| ctx.config.models.primary.clone());
        let secondary = self
            .secondary
            .clone()
            .unwrap_or_else(|| ctx.config.models.secondary.clone());
        if primary == secondary {
            return Err(CliError::InvalidInput(
                "primary and secondary model must differ".to_string(),
            ));
        }

        let session_config = SessionConfig {
            title: format!("Conversation {}", chrono::Local::now().format("%Y-%m-%d %H:%M")),
            models: vec![primary.clone(), secondary.clone()],
        };
        let session = ChatSession::new(ConversationClient::new(ctx.api.clone()), session_config);

        if let Some(raw) = self.resume {
            session.load(ConversationId::new(raw)).await?;
            println!("Resumed conversation {raw}.");
            print_log(&session.entries().await);
        }

        println!("Curating with {primary} + {secondary}.");
        println!("Commands: :select <n>, :reject, :log, :quit. Anything else is sent.\n");

        loop {
            let line = prompt("> ")?;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            match line {
                ":quit" | ":q" => break,
                ":log" => {
                    print_log(&session.entries().await);
                }
                ":reject" => {
                    self.reject_current_turn(&session).await?;
                }
                _ if line.starts_with(":select") => {
                    self.select_candidate(&session, line).await?;
                }
                _ if line.starts_with(':') => {
                    println!("Unknown command: {line}");
                }
                _ => {
                    self.send(&session, line).await;
                }
            }
        }

        Ok(())
    }

    async fn send(&self, session: &ChatSession<ConversationClient>, content: &str) {
        match session.send(content).await {
            Ok(candidates) => {
                let entries = session.entries().await;
                for (index, id) in candidates.iter().enumerate() {
                    if let Some(entry) = entries.iter().find(|e| e.id == *id) {
                        println!(
                            "[{}] {}: {}",
                            index + 1,
                            entry.model.as_deref().unwrap_or("?"),
                            entry.content
                        );
                        if let Some(reasoning) = &entry.reasoning {
                            println!("    ({reasoning})");
                        }
                    }
                }
            }
            Err(err) => {
                // The session already logged a system notice.
                tracing::debug!(error = %err, "send failed");
                if let Some(entry) = session.entries().await.last() {
                    println!("{}", entry.content);
                }
            }
        }
    }

    async fn select_candidate(
        &self,
        session: &ChatSession<ConversationClient>,
        line: &str,
    ) -> Result<(), CliError> {
        let index: usize = line
            .trim_start_matches(":select")
            .trim()
            .parse()
            .map_err(|_| CliError::InvalidInput("usage: :select <number>".to_string()))?;
        if index == 0 {
            println!("Candidates are numbered from 1.");
            return Ok(());
        }

        let Some(user_id) = last_user_entry(&session.entries().await) else {
            println!("Nothing to select yet.");
            return Ok(());
        };
        let candidates = session.turn_candidates(user_id).await;
        let Some(target) = candidates.get(index - 1) else {
            println!("No candidate #{index} in the current turn.");
            return Ok(());
        };

        match session.select(target.id).await {
            Ok(()) => println!(
                "Selected [{}] {}.",
                index,
                target.model.as_deref().unwrap_or("?")
            ),
            Err(err) => {
                tracing::debug!(error = %err, "selection not persisted");
                println!("Selection kept locally, but the backend did not store it.");
            }
        }
        Ok(())
    }

    async fn reject_current_turn(
        &self,
        session: &ChatSession<ConversationClient>,
    ) -> Result<(), CliError> {
        let Some(user_id) = last_user_entry(&session.entries().await) else {
            println!("Nothing to reject yet.");
            return Ok(());
        };

        let removed = session.reject(user_id).await?;
        println!("Rejected {} candidate(s). Critique mode.", removed.len());

        let critique = prompt("Critique (why were the responses unsatisfactory?): ")?;
        if critique.trim().is_empty() {
            session.cancel_critique().await;
            println!("Critique cancelled.");
            return Ok(());
        }
        let suggestion = prompt("Suggested better response: ")?;
        if suggestion.trim().is_empty() {
            session.cancel_critique().await;
            println!("Critique cancelled.");
            return Ok(());
        }

        session.set_critique_text(critique.trim()).await;
        session.set_suggestion_text(suggestion.trim()).await;

        match session.submit_critique().await {
            Ok(_) => println!("Critique and suggestion recorded."),
            Err(err) => {
                tracing::debug!(error = %err, "critique submission failed");
                println!("Critique not stored; your draft is kept. Try :reject again or keep chatting.");
            }
        }
        Ok(())
    }
}

fn last_user_entry(entries: &[Entry]) -> Option<EntryId> {
    entries
        .iter()
        .rev()
        .find(|e| e.kind == EntryKind::User)
        .map(|e| e.id)
}

fn print_log(entries: &[Entry]) {
    for entry in entries {
        let tag = match entry.kind {
            EntryKind::User => "you",
            EntryKind::AiResponse => entry.model.as_deref().unwrap_or("ai"),
            EntryKind::Critique => "critique",
            EntryKind::Suggestion => "suggestion",
            EntryKind::System => "system",
        };
        let mark = if entry.selected { " *" } else { "" };
        println!("{tag}{mark}: {}", entry.content);
    }
}

fn prompt(text: &str) -> Result<String, CliError> {
    print!("{text}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
