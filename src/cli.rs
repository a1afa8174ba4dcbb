use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::config::Config;
use crate::insights::ActivityReport;
use crate::models::{FeedbackKind, FeedbackResult, Granularity, Repository};
use crate::providers::gemini::GeminiClient;
use crate::providers::github::{GitHubClient, Paging};

#[derive(Parser)]
#[command(name = "commitlens")]
#[command(author, version, about = "GitHub commit activity and AI feedback", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Env file holding GITHUB_ACCESS_TOKEN and GEMINI_API_TOKEN
    #[arg(short, long, global = true, env = "COMMITLENS_ENV_FILE", default_value = ".env")]
    env_file: PathBuf,

    /// Output file path (defaults to stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Pretty print JSON output
    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,

    /// Items per GitHub page (1-100)
    #[arg(long, global = true, default_value_t = 30)]
    per_page: u32,

    /// Follow GitHub pagination links instead of reading only the first page
    #[arg(long, global = true, default_value_t = false)]
    all_pages: bool,

    /// Upper bound on pages read with --all-pages
    #[arg(long, global = true, default_value_t = 10)]
    max_pages: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the account the access token belongs to
    Whoami,

    /// List repositories
    Repos {
        /// GitHub login (defaults to the token owner, private repositories included)
        #[arg(short, long)]
        user: Option<String>,
    },

    /// List commits of a repository
    Commits {
        /// Repository as owner/name
        #[arg(short, long)]
        repo: String,
    },

    /// Count commits per day, month and year
    Activity {
        /// Repository as owner/name
        #[arg(short, long)]
        repo: String,

        /// Only report this granularity
        #[arg(short, long, value_enum)]
        granularity: Option<Granularity>,
    },

    /// Get AI feedback on a commit message or on a repository's latest commits
    Critique {
        /// Commit message to critique
        #[arg(short, long, conflicts_with = "repo", required_unless_present = "repo")]
        message: Option<String>,

        /// Repository as owner/name
        #[arg(short, long)]
        repo: Option<String>,

        /// Number of latest commits to critique (with --repo)
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },

    /// Summarize commit habits across a repository's history
    Review {
        /// Repository as owner/name
        #[arg(short, long)]
        repo: String,
    },

    /// Rewrite a commit message as a Conventional Commit
    Rewrite {
        /// Commit message to rewrite
        #[arg(short, long)]
        message: String,
    },

    /// Write a commit message from a description or from old/new code
    Compose {
        /// Description of the changes
        #[arg(
            short,
            long,
            conflicts_with_all = ["old", "new"],
            required_unless_present_all = ["old", "new"]
        )]
        description: Option<String>,

        /// File with the code before the change
        #[arg(long, requires = "new")]
        old: Option<PathBuf>,

        /// File with the code after the change
        #[arg(long, requires = "old")]
        new: Option<PathBuf>,
    },
}

impl Cli {
    fn paging(&self) -> Paging {
        if self.all_pages {
            Paging::follow(self.per_page, self.max_pages)
        } else {
            Paging::first_page(self.per_page)
        }
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(&self.env_file)?;

        let github = GitHubClient::new(&config.github_api_url, config.github_token)?
            .with_paging(self.paging());
        let gemini = GeminiClient::new(
            &config.gemini_api_url,
            &config.gemini_model,
            config.gemini_api_key,
        )?;

        match &self.command {
            Commands::Whoami => {
                let profile = github.authenticated_user().await?;
                self.emit(&profile)
            }
            Commands::Repos { user } => {
                let repositories = match user {
                    Some(user) => github.list_repositories(user).await?,
                    None => github.list_own_repositories().await?,
                };
                info!("Found {} repositories", repositories.len());
                self.emit(&repositories)
            }
            Commands::Commits { repo } => {
                let repository = Repository::parse(repo)?;
                let commits = github.list_commits(&repository).await?;
                info!("Found {} commits", commits.len());
                self.emit(&commits)
            }
            Commands::Activity { repo, granularity } => {
                let repository = Repository::parse(repo)?;
                let commits = github.list_commits(&repository).await?;
                let granularities = match granularity {
                    Some(granularity) => vec![*granularity],
                    None => Granularity::ALL.to_vec(),
                };
                let report = ActivityReport::build(&repository, &commits, &granularities);
                self.emit(&report)
            }
            Commands::Critique {
                message,
                repo,
                limit,
            } => {
                let results = match (message, repo) {
                    (Some(message), _) => vec![FeedbackResult {
                        kind: FeedbackKind::Critique,
                        source: None,
                        feedback: gemini.critique(message).await?,
                    }],
                    (None, Some(repo)) => {
                        let repository = Repository::parse(repo)?;
                        let commits = github.list_commits(&repository).await?;
                        let latest = &commits[..commits.len().min(*limit)];
                        gemini.critique_commits(latest).await?
                    }
                    (None, None) => anyhow::bail!("Either --message or --repo is required"),
                };
                self.emit(&results)
            }
            Commands::Review { repo } => {
                let repository = Repository::parse(repo)?;
                let commits = github.list_commits(&repository).await?;
                let feedback = gemini.review_history(&commits).await?;
                self.emit(&FeedbackResult {
                    kind: FeedbackKind::Review,
                    source: Some(repository.full_name()),
                    feedback,
                })
            }
            Commands::Rewrite { message } => {
                let feedback = gemini.rewrite(message).await?;
                self.emit(&FeedbackResult {
                    kind: FeedbackKind::Rewrite,
                    source: None,
                    feedback,
                })
            }
            Commands::Compose {
                description,
                old,
                new,
            } => {
                let feedback = match (description, old, new) {
                    (Some(description), _, _) => gemini.compose(description).await?,
                    (None, Some(old), Some(new)) => {
                        let old_code = std::fs::read_to_string(old)?;
                        let new_code = std::fs::read_to_string(new)?;
                        gemini.compose_from_diff(&old_code, &new_code).await?
                    }
                    _ => anyhow::bail!("Either --description or both --old and --new are required"),
                };
                self.emit(&FeedbackResult {
                    kind: FeedbackKind::Compose,
                    source: None,
                    feedback,
                })
            }
        }
    }

    fn emit<T: Serialize>(&self, value: &T) -> Result<()> {
        let json_output = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, json_output)?;
            info!("Output written to: {}", output_path.display());
        } else {
            println!("{json_output}");
        }

        Ok(())
    }
}
