//! Knowledge-base management and sample generation.

use clap::{Parser, Subcommand};
use std::time::Duration;

use crate::cli::CommandContext;
use crate::error::CliError;
use atelier_api::KnowledgeBaseClient;
use atelier_common_core::JobStatus;
use atelier_workbench::{run_generation, GenerationRequest, PollConfig};

/// Manage knowledge bases of generated samples.
#[derive(Debug, Parser)]
pub struct KbCommand {
    #[command(subcommand)]
    pub action: KbAction,
}

#[derive(Debug, Subcommand)]
pub enum KbAction {
    /// List knowledge bases
    List,
    /// Create a knowledge base and generate samples into it
    Generate {
        /// Knowledge base name
        name: String,

        /// Number of samples to generate
        #[arg(short = 'n', long)]
        samples: Option<u32>,

        /// Model used for generation
        #[arg(short, long)]
        model: Option<String>,
    },
}

impl KbCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let client = KnowledgeBaseClient::new(ctx.api.clone());

        match &self.action {
            KbAction::List => {
                let bases = client.list().await?;
                if bases.is_empty() {
                    println!("No knowledge bases.");
                    return Ok(());
                }
                for base in bases {
                    println!(
                        "{:>6}  {:<40} {:>5} samples  {}",
                        base.id.as_i64(),
                        base.name,
                        base.samples,
                        base.last_updated
                    );
                }
            }
            KbAction::Generate {
                name,
                samples,
                model,
            } => {
                let samples = samples.unwrap_or(ctx.config.generation.total_samples);
                let model = model
                    .clone()
                    .unwrap_or_else(|| ctx.config.models.primary.clone());
                let poll = PollConfig::every(Duration::from_millis(
                    ctx.config.generation.poll_interval_ms,
                ));

                println!("Generating {samples} samples into \"{name}\" with {model}...");
                let request = GenerationRequest::for_knowledge_base(name, samples, &model, poll);
                let report = run_generation(&client, request, |status| {
                    println!(
                        "  {}/{} samples ({})",
                        status.samples_generated, status.total_samples, status.status
                    );
                })
                .await?;

                match report.final_status.job_status() {
                    JobStatus::Completed => println!(
                        "Done: knowledge base {} now holds {} samples.",
                        report.knowledge_base_id, report.final_status.samples_generated
                    ),
                    other => println!(
                        "Generation job {} ended with status {:?}.",
                        report.job_id, other
                    ),
                }
            }
        }
        Ok(())
    }
}
