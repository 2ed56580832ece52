//! Training sessions and checkpoint evaluation.

use clap::{Parser, Subcommand};
use std::time::Duration;

use crate::cli::CommandContext;
use crate::error::CliError;
use atelier_api::training::{KnowledgeBaseShare, StartTrainingRequest, TestCheckpointRequest};
use atelier_api::TrainingClient;
use atelier_common_core::{CheckpointId, JobStatus, KnowledgeBaseId};
use atelier_workbench::{run_training, PollConfig};

/// Manage model training sessions.
#[derive(Debug, Parser)]
pub struct TrainCommand {
    #[command(subcommand)]
    pub action: TrainAction,
}

#[derive(Debug, Subcommand)]
pub enum TrainAction {
    /// List past training sessions
    Sessions,
    /// List tracked evaluation metrics
    Metrics,
    /// Start a training session and follow its progress
    Start {
        /// Base model to train from
        #[arg(long)]
        base_model: Option<String>,

        /// Checkpoint to resume from
        #[arg(long)]
        checkpoint: Option<String>,

        /// Knowledge bases in the mix, as `id` or `id=weight`
        #[arg(long = "kb", required = true)]
        knowledge_bases: Vec<String>,
    },
    /// Send a test message to a trained checkpoint
    Test {
        /// Checkpoint name
        checkpoint: String,

        /// Message to send
        message: String,
    },
}

impl TrainCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let client = TrainingClient::new(ctx.api.clone());

        match &self.action {
            TrainAction::Sessions => {
                for session in client.sessions().await? {
                    println!(
                        "{:>6}  {}  {}  base={}  acc={:.2}  loss={:.2}  f1={:.2}  [{}]",
                        session.id.as_i64(),
                        session.date,
                        session.duration,
                        session.base_model,
                        session.metrics.accuracy,
                        session.metrics.loss,
                        session.metrics.f1_score,
                        session.knowledge_bases.join(", ")
                    );
                }
            }
            TrainAction::Metrics => {
                for metric in client.metrics().await? {
                    let sign = if metric.change >= 0.0 { "+" } else { "" };
                    println!(
                        "{:<24} {:>8.3} ({sign}{:.3})  {}  {}",
                        metric.name, metric.value, metric.change, metric.checkpoint, metric.date
                    );
                }
            }
            TrainAction::Start {
                base_model,
                checkpoint,
                knowledge_bases,
            } => {
                let shares = parse_shares(knowledge_bases)?;
                let request = StartTrainingRequest {
                    base_model: base_model
                        .clone()
                        .unwrap_or_else(|| ctx.config.training.base_model.clone()),
                    use_checkpoint: checkpoint.is_some(),
                    checkpoint_id: checkpoint.clone().unwrap_or_default(),
                    knowledge_bases: shares,
                };
                let poll = PollConfig::every(Duration::from_millis(
                    ctx.config.training.poll_interval_ms,
                ));

                println!("Training {} ...", request.base_model);
                let report = run_training(&client, &request, poll, |progress| {
                    println!(
                        "  {:.0}% ({}, {} remaining)",
                        progress.progress, progress.status, progress.time_remaining
                    );
                })
                .await?;

                match report.final_progress.job_status() {
                    JobStatus::Completed => {
                        println!("Training session {} completed.", report.session_id)
                    }
                    other => println!(
                        "Training session {} ended with status {:?}.",
                        report.session_id, other
                    ),
                }
            }
            TrainAction::Test {
                checkpoint,
                message,
            } => {
                let reply = client
                    .test_checkpoint(
                        &CheckpointId::new(checkpoint.clone()),
                        &TestCheckpointRequest {
                            message: message.clone(),
                        },
                    )
                    .await?;
                println!("{}", reply.response);
                println!(
                    "  checkpoint={}  confidence={:.2}  time={}",
                    reply.checkpoint, reply.metrics.confidence, reply.metrics.response_time
                );
            }
        }
        Ok(())
    }
}

/// Parse `--kb` values: `3` or `3=0.6`. Bare ids share the remaining
/// weight evenly.
fn parse_shares(raw: &[String]) -> Result<Vec<KnowledgeBaseShare>, CliError> {
    let mut explicit = Vec::new();
    let mut bare = Vec::new();

    for item in raw {
        match item.split_once('=') {
            Some((id, weight)) => {
                let id: i64 = id.trim().parse().map_err(|_| bad_share(item))?;
                let weight: f64 = weight.trim().parse().map_err(|_| bad_share(item))?;
                if !(0.0..=1.0).contains(&weight) {
                    return Err(bad_share(item));
                }
                explicit.push(KnowledgeBaseShare {
                    id: KnowledgeBaseId::new(id),
                    distribution: weight,
                });
            }
            None => {
                let id: i64 = item.trim().parse().map_err(|_| bad_share(item))?;
                bare.push(KnowledgeBaseId::new(id));
            }
        }
    }

    let used: f64 = explicit.iter().map(|s| s.distribution).sum();
    if used > 1.0 + f64::EPSILON {
        return Err(CliError::InvalidInput(
            "knowledge base weights exceed 1.0".to_string(),
        ));
    }

    if !bare.is_empty() {
        let each = (1.0 - used) / bare.len() as f64;
        explicit.extend(bare.into_iter().map(|id| KnowledgeBaseShare {
            id,
            distribution: each,
        }));
    }

    Ok(explicit)
}

fn bad_share(item: &str) -> CliError {
    CliError::InvalidInput(format!("invalid --kb value: {item} (expected id or id=weight)"))
}
