//! Interactive line session.
//!
//! Each input line is either a `/command` or a prompt submitted in the
//! current mode. One request is in flight at a time. [`run`] drives a
//! session over any async reader/writer, [`run_interactive`] over the
//! terminal through rustyline.

use std::path::Path;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{error, warn};

use crate::about;
use crate::error::Result;
use crate::gemini::ContentGenerator;
use crate::handler::{Explorer, Mode, Outcome};
use crate::upload::UploadedImage;

pub const HELP: &str = "\
Commands:
  /text           switch to Gemini Pro (text prompts)
  /vision         switch to Gemini Pro Vision (image + prompt)
  /image <path>   attach an image (png, jpg, jpeg, img, webp)
  /clear          detach the current image
  /about          show usage and about text
  /help           show this help
  /quit           leave the session
Any other line is sent as a prompt in the current mode.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command<'a> {
    Switch(Mode),
    Image(&'a str),
    Clear,
    About,
    Help,
    Quit,
    Unknown(&'a str),
    Prompt(&'a str),
}

fn parse(line: &str) -> Command<'_> {
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Prompt(line);
    };
    let (name, arg) = rest
        .split_once(char::is_whitespace)
        .map(|(n, a)| (n, a.trim()))
        .unwrap_or((rest.trim(), ""));

    match name {
        "text" => Command::Switch(Mode::Text),
        "vision" => Command::Switch(Mode::Vision),
        "image" => Command::Image(arg),
        "clear" => Command::Clear,
        "about" => Command::About,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(name),
    }
}

/// What a line asks the caller to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Reply(String),
    Quit,
}

/// Current mode and attached image, carried across lines.
#[derive(Debug, Default)]
pub struct Session {
    mode: Mode,
    image: Option<UploadedImage>,
}

impl Session {
    pub fn prompt(&self) -> String {
        format!("[{}]> ", self.mode)
    }

    /// Handles one input line. Service failures are turned into a reply so
    /// they end only the request that caused them.
    pub async fn handle<G: ContentGenerator>(
        &mut self,
        explorer: &Explorer<G>,
        line: &str,
    ) -> Step {
        let reply = match parse(line) {
            Command::Quit => return Step::Quit,
            Command::Switch(next) => {
                self.mode = next;
                format!("mode: {next}\n")
            }
            Command::Image("") => "error: /image needs a path\n".to_string(),
            Command::Image(path) => match UploadedImage::open(path) {
                Ok(upload) => {
                    let (w, h) = upload.dimensions();
                    let reply = format!(
                        "image: {} ({:?}, {w}x{h})\n",
                        upload.name(),
                        upload.format()
                    );
                    self.image = Some(upload);
                    reply
                }
                Err(e) => {
                    warn!(error = %e, "image upload failed");
                    format!("error: {e}\n")
                }
            },
            Command::Clear => {
                self.image = None;
                "image cleared\n".to_string()
            }
            Command::About => about::sidebar(),
            Command::Help => format!("{HELP}\n"),
            Command::Unknown(name) => format!("error: unknown command /{name}\n"),
            Command::Prompt(prompt) => {
                match explorer.submit(self.mode, prompt, self.image.as_ref()).await {
                    Ok(Outcome::Response(text)) => format!("{text}\n"),
                    Ok(Outcome::Rejected(rejection)) => format!("error: {rejection}\n"),
                    Err(e) => {
                        error!(error = %e, "request failed");
                        format!("error: {e}\n")
                    }
                }
            }
        };
        Step::Reply(reply)
    }
}

/// Runs a session over arbitrary async I/O until `/quit` or end of input.
/// I/O errors on `input`/`output` end the session.
pub async fn run<G, R, W>(explorer: &Explorer<G>, input: R, mut output: W) -> Result<()>
where
    G: ContentGenerator,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut session = Session::default();

    write(&mut output, &format!("{}\n{HELP}\n", about::TITLE)).await?;
    write(&mut output, &session.prompt()).await?;

    while let Some(line) = lines.next_line().await? {
        match session.handle(explorer, &line).await {
            Step::Quit => break,
            Step::Reply(reply) => write(&mut output, &reply).await?,
        }
        write(&mut output, &session.prompt()).await?;
    }

    output.flush().await?;
    Ok(())
}

/// Terminal session with line editing and history.
///
/// Ctrl-C abandons the current line, Ctrl-D leaves. History is loaded from
/// and saved to `history_path` when one is given.
pub async fn run_interactive<G: ContentGenerator>(
    explorer: &Explorer<G>,
    history_path: Option<&Path>,
) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    if let Some(path) = history_path {
        let _ = editor.load_history(path);
    }

    println!("{}\n{HELP}\n", about::TITLE);
    let mut session = Session::default();

    loop {
        match editor.readline(&session.prompt()) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    editor.add_history_entry(line.as_str())?;
                }
                match session.handle(explorer, &line).await {
                    Step::Quit => break,
                    Step::Reply(reply) => print!("{reply}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    if let Some(path) = history_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = editor.save_history(path) {
            warn!(error = %e, "could not save history");
        }
    }
    Ok(())
}

async fn write<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}
