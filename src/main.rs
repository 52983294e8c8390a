use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use gemini_explorer::{
    Config, Explorer, GeminiClient, Outcome, UploadedImage, about, session,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gemini-explorer", version, about = about::TITLE, long_about = about::INSTRUCTIONS)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send a text prompt to Gemini Pro
    Text { prompt: String },
    /// Send an image and a prompt to Gemini Pro Vision
    Vision {
        /// Image to attach (png, jpg, jpeg, img, webp)
        #[arg(short, long)]
        image: Option<PathBuf>,
        #[arg(default_value = "")]
        prompt: String,
    },
    /// Interactive session with text and vision modes
    Session,
    /// Show usage instructions and about text
    About,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let client = GeminiClient::new(&cli.config);
    let explorer = Explorer::new(client, &cli.config);

    match cli.command {
        Command::Text { prompt } => {
            let text = explorer.submit_text(&prompt).await?;
            println!("{text}");
        }
        Command::Vision { image, prompt } => {
            let upload = image.map(UploadedImage::open).transpose()?;
            match explorer.submit_vision(&prompt, upload.as_ref()).await? {
                Outcome::Response(text) => println!("{text}"),
                Outcome::Rejected(rejection) => {
                    eprintln!("error: {rejection}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Session => {
            info!(
                text_model = %cli.config.text_model,
                vision_model = %cli.config.vision_model,
                "starting session"
            );
            let history = dirs::home_dir().map(|home| home.join(".gemini-explorer").join("history"));
            session::run_interactive(&explorer, history.as_deref()).await?;
        }
        Command::About => print!("{}", about::sidebar()),
    }

    Ok(ExitCode::SUCCESS)
}
