//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use skillpipe_core::url::OPENAI_API_URL;
use skillpipe_core::{
    BingSearch, ClientConfig, GitHubSearch, MailConfig, Mailbox, OpenAiConfig, OpenAiResponse,
    OpenAiSearch, Outgoing, Pipeline, PipelineResult, Result, Skill, SkillClient, YouTubeApiSearch,
    YouTubeSearch, download,
};
use tracing::debug;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// skillpipe: search, ask, download and mail from the command line.
#[derive(Parser, Debug)]
#[command(
    name = "skillpipe",
    version,
    about = "Fetch a remote resource, extract what matters and save it as a file.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Deadline for each network operation, in seconds.
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Search the web through Bing.
    SearchBing {
        query: String,
        /// Output file (defaults to search-bing/<slug>.md).
        output: Option<PathBuf>,
    },

    /// Search GitHub repositories.
    SearchGithub {
        query: String,
        /// Output file (defaults to search-github/<slug>.md).
        output: Option<PathBuf>,
    },

    /// Search YouTube videos.
    SearchYoutube {
        query: String,
        /// Output file (defaults to search-youtube/<slug>.md).
        output: Option<PathBuf>,

        /// Use the YouTube Data API instead of the result page.
        #[arg(long)]
        api: bool,

        /// YouTube Data API key, required with --api.
        #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
        youtube_api_key: Option<String>,
    },

    /// Ask a web-grounded question through OpenAI Chat Completions.
    SearchOpenai {
        query: String,
        /// Output file (defaults to search-openai/<slug>.md).
        output: Option<PathBuf>,

        #[command(flatten)]
        openai: OpenAiArgs,
    },

    /// Get a response from the OpenAI Responses API.
    RespondOpenai {
        prompt: String,
        /// Output file (defaults to responses-openai/<slug>.md).
        output: Option<PathBuf>,

        /// Continue the conversation of an earlier response.
        #[arg(long)]
        previous_response_id: Option<String>,

        #[command(flatten)]
        openai: OpenAiArgs,
    },

    /// Download a file.
    Download {
        url: String,
        /// Output file (defaults to download/<slug>).
        output: Option<PathBuf>,
    },

    /// Register a disposable mail.tm mailbox.
    RegisterEmail {
        /// Account file (defaults to register-email/<user>.json).
        output: Option<PathBuf>,
    },

    /// Send a message from a registered mailbox.
    SendMail {
        /// Account file written by register-email.
        account: PathBuf,
        /// Recipient (defaults to the account itself).
        to: Option<String>,
        subject: Option<String>,
        text: Option<String>,
    },

    /// Save the messages of a registered mailbox.
    CheckMail {
        /// Account file written by register-email.
        account: PathBuf,
        /// Output file (defaults to check-mail/<user>.json).
        output: Option<PathBuf>,
    },
}

/// OpenAI connection settings.
#[derive(Args, Debug)]
pub(crate) struct OpenAiArgs {
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = OPENAI_API_URL)]
    pub base_url: String,

    /// Model override.
    #[arg(long, env = "DEFAULT_MODEL")]
    pub model: Option<String>,
}

impl OpenAiArgs {
    fn into_config(self) -> OpenAiConfig {
        OpenAiConfig {
            api_key: self.api_key.unwrap_or_default(),
            base_url: self.base_url,
            model: self.model.filter(|model| !model.trim().is_empty()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "warn",
        1 => "warn,skillpipe=info,skillpipe_core=info",
        _ => "warn,skillpipe=debug,skillpipe_core=debug",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command and return the summary line.
pub(crate) async fn run(cli: Cli) -> Result<String> {
    let client_config = ClientConfig {
        timeout_secs: cli.timeout,
        ..ClientConfig::default()
    };
    debug!(timeout_secs = cli.timeout, "dispatching");

    match cli.command {
        Command::SearchBing { query, output } => {
            run_skill(client_config, &BingSearch::new()?, &query, output).await
        }
        Command::SearchGithub { query, output } => {
            run_skill(client_config, &GitHubSearch::new(), &query, output).await
        }
        Command::SearchYoutube {
            query,
            output,
            api,
            youtube_api_key,
        } => {
            if api {
                let skill = YouTubeApiSearch::new(youtube_api_key.unwrap_or_default());
                run_skill(client_config, &skill, &query, output).await
            } else {
                run_skill(client_config, &YouTubeSearch::new()?, &query, output).await
            }
        }
        Command::SearchOpenai {
            query,
            output,
            openai,
        } => {
            let skill = OpenAiSearch::new(openai.into_config());
            run_skill(client_config, &skill, &query, output).await
        }
        Command::RespondOpenai {
            prompt,
            output,
            previous_response_id,
            openai,
        } => {
            let mut skill = OpenAiResponse::new(openai.into_config());
            if let Some(id) = previous_response_id {
                skill = skill.with_previous_response(id);
            }
            run_skill(client_config, &skill, &prompt, output).await
        }
        Command::Download { url, output } => {
            let client = SkillClient::with_config(client_config)?;
            let result = download(&client, &url, output.as_deref(), None).await?;
            Ok(format!(
                "Saved {} to {} ({} bytes)",
                result.url,
                result.output_file.display(),
                result.bytes
            ))
        }
        Command::RegisterEmail { output } => {
            let registration = mailbox(client_config)?.register(output.as_deref()).await?;
            Ok(format!(
                "Registered {}, credentials saved to {}",
                registration.account.address,
                registration.output_file.display()
            ))
        }
        Command::SendMail {
            account,
            to,
            subject,
            text,
        } => {
            let outgoing = Outgoing { to, subject, text };
            let receipt = mailbox(client_config)?.send(&account, outgoing).await?;
            Ok(format!(
                "Message sent: {}, receipt saved to {}",
                receipt.message_id,
                receipt.output_file.display()
            ))
        }
        Command::CheckMail { account, output } => {
            let inbox = mailbox(client_config)?
                .check(&account, output.as_deref())
                .await?;
            Ok(format!(
                "Saved {} messages to {}",
                inbox.messages.len(),
                inbox.output_file.display()
            ))
        }
    }
}

async fn run_skill<S: Skill>(
    config: ClientConfig,
    skill: &S,
    input: &str,
    output: Option<PathBuf>,
) -> Result<String> {
    let pipeline = Pipeline::with_config(config)?;
    let result = pipeline.run(skill, input, output.as_deref()).await?;
    Ok(summary(&result))
}

fn mailbox(config: ClientConfig) -> Result<Mailbox> {
    Ok(Mailbox::with_client(
        SkillClient::with_config(config)?,
        MailConfig::default(),
    ))
}

fn summary(result: &PipelineResult) -> String {
    let path = result.output_file.display();
    match &result.answer {
        Some(answer) => match &answer.response_id {
            Some(id) => format!("Saved response to {} (response id: {})", path, id),
            None => format!("Saved response to {}", path),
        },
        None => format!("Saved {} results to {}", result.records.len(), path),
    }
}
