// Command-line front end. Configuration comes from the environment (and a
// `.env` file if present); see `ClientConfig::from_env`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gptlite::{ApiResponse, ClientConfig, ConversationId, GptClient, preparse_voice, save_tokens};

#[derive(Parser, Debug)]
#[command(author, version, about = "Chat and completion requests from the terminal", long_about = None)]
struct Cli {
    /// Compact outgoing text with save_tokens before sending
    #[arg(long, global = true)]
    save_tokens: bool,

    /// Strip code blocks and script delimiters from the reply
    #[arg(long, global = true)]
    voice: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a chat message, optionally within a stored conversation
    Chat {
        message: String,

        #[arg(
            long,
            env = "GPTLITE_SYSTEM_MESSAGE",
            default_value = "You are a helpful assistant."
        )]
        system: String,

        /// Conversation id returned by `new-conversation`
        #[arg(long)]
        conversation: Option<String>,
    },
    /// Send a single prompt to the completions endpoint
    Complete { prompt: String },
    /// Create an empty stored conversation and print its id
    NewConversation,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    gptlite::setup_logging();

    let cli = Cli::parse();
    let config = ClientConfig::from_env().context("loading configuration")?;
    let client = GptClient::new(config).context("building client")?;

    let prepare = |text: &str| {
        if cli.save_tokens {
            save_tokens(text)
        } else {
            text.to_string()
        }
    };

    let response = match &cli.command {
        Command::NewConversation => {
            let id = client.create_conversation()?;
            println!("{id}");
            return Ok(());
        }
        Command::Chat {
            message,
            system,
            conversation,
        } => {
            let conversation = conversation
                .as_deref()
                .map(ConversationId::parse)
                .transpose()?;
            client.chat(&prepare(system), &prepare(message), conversation.as_ref())?
        }
        Command::Complete { prompt } => client.completion(&prepare(prompt))?,
    };

    match response {
        ApiResponse::Success { content, .. } => {
            if cli.voice {
                println!("{}", preparse_voice(&content));
            } else {
                println!("{content}");
            }
        }
        ApiResponse::ApiError { message, .. } => {
            anyhow::bail!("API error: {message}");
        }
        ApiResponse::Unrecognized(raw) => {
            println!("{}", serde_json::to_string_pretty(&raw)?);
        }
        ApiResponse::Undecodable(body) => {
            anyhow::bail!("response was not JSON: {body}");
        }
    }

    Ok(())
}
