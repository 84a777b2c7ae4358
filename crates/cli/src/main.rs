//! Interactive chat tool for creating and editing slide decks.

use anyhow::{Context, Result};
use clap::Parser;
use deck_core::normalize::suggested_file_name;
use deck_core::{
    Assistant, AssistantConfig, DeckExtractor, DeckFormat, DeckRenderer, MarkdownRenderer,
    TextGenerator,
};
use deck_pptx::PptxExtractor;
use std::fs::File;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Chat with an assistant to build and edit a slide deck.
#[derive(Parser, Debug)]
#[command(name = "deck-chat")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Shell command that reads a prompt on stdin and prints generated text
    #[arg(short, long)]
    generator: Option<String>,

    /// Deck to start from (.pptx or .md)
    #[arg(short, long)]
    open: Option<PathBuf>,

    /// Write the Markdown rendering here after every change
    #[arg(short, long)]
    save: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the default slide count
    #[arg(long)]
    default_slides: Option<usize>,

    /// Override the largest slide count a request may ask for
    #[arg(long)]
    max_slides: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config = load_config(&args)?;

    let generator: Box<dyn TextGenerator> = match &args.generator {
        Some(command) => Box::new(CommandGenerator::new(command.clone())),
        None => {
            log::warn!("No --generator given; only viewing commands will work");
            Box::new(OfflineGenerator)
        }
    };

    let mut assistant = Assistant::with_config(generator, config);

    if let Some(path) = &args.open {
        open_deck(&mut assistant, path)?;
        println!("{}", assistant.overview());
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    prompt_marker(&mut stdout)?;

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let text = line.trim();

        match text {
            "" => {}
            "/quit" | "/exit" => break,
            "/summary" => println!("{}", assistant.overview()),
            "/save" => {
                if let Err(e) = save_deck(&assistant, args.save.as_deref()) {
                    eprintln!("Error saving presentation: {:#}", e);
                }
            }
            _ => {
                let outcome = assistant.handle_turn(text);
                println!("{}", outcome);

                if outcome.mutated() && args.save.is_some() {
                    if let Err(e) = save_deck(&assistant, args.save.as_deref()) {
                        eprintln!("Error saving presentation: {:#}", e);
                    }
                }
            }
        }

        prompt_marker(&mut stdout)?;
    }

    Ok(())
}

fn prompt_marker(stdout: &mut io::Stdout) -> Result<()> {
    write!(stdout, "> ")?;
    stdout.flush()?;
    Ok(())
}

/// Load the config file, then apply flag overrides.
fn load_config(args: &Args) -> Result<AssistantConfig> {
    let mut config = match &args.config {
        Some(path) => AssistantConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AssistantConfig::default(),
    };

    if let Some(count) = args.default_slides {
        config.default_slide_count = count;
    }
    if let Some(count) = args.max_slides {
        config.max_slide_count = count;
    }

    config.validate()?;
    Ok(config)
}

/// Open a stored deck into the assistant's session.
fn open_deck<G: TextGenerator>(assistant: &mut Assistant<G>, path: &Path) -> Result<()> {
    let mut bytes = Vec::new();
    File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?
        .read_to_end(&mut bytes)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let format = DeckFormat::from_magic(&bytes)
        .or_else(|| {
            path.extension()
                .and_then(|e| e.to_str())
                .and_then(DeckFormat::from_extension)
        })
        .ok_or_else(|| anyhow::anyhow!("Could not detect deck format of {}", path.display()))?;

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let pptx = PptxExtractor::new();
    let markdown = MarkdownRenderer::new();
    let extractor: &dyn DeckExtractor = match format {
        DeckFormat::Pptx => {
            log::debug!("Opening as PPTX");
            &pptx
        }
        DeckFormat::Markdown => {
            log::debug!("Opening as Markdown");
            &markdown
        }
    };

    assistant
        .session_mut()
        .open_with(extractor, &bytes, name)
        .with_context(|| format!("Failed to extract slides from {}", path.display()))?;
    Ok(())
}

/// Render the current deck as Markdown and write it.
///
/// Without an explicit path the file is named after the deck title and
/// written to the working directory.
fn save_deck<G: TextGenerator>(assistant: &Assistant<G>, path: Option<&Path>) -> Result<()> {
    let document = assistant.session().document()?;
    let renderer = MarkdownRenderer::new();

    let path = match path {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(suggested_file_name(
            &document.deck_title,
            renderer.format().extension(),
        )),
    };

    let bytes = renderer.render(document)?;
    let mut file =
        File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(&bytes)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    eprintln!("Saved presentation to {}", path.display());
    Ok(())
}

/// Generator that pipes each prompt into a shell command.
struct CommandGenerator {
    command: String,
}

impl CommandGenerator {
    fn new(command: String) -> Self {
        Self { command }
    }

    fn shell(&self) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&self.command);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(&self.command);
            cmd
        }
    }
}

impl TextGenerator for CommandGenerator {
    fn generate(&mut self, prompt: &str) -> deck_core::Result<String> {
        let generation_error = |message: String| deck_core::Error::Generation(message);

        let mut child = self
            .shell()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| generation_error(format!("failed to start '{}': {}", self.command, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.as_bytes())
                .map_err(|e| generation_error(format!("failed to send prompt: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| generation_error(format!("generator did not finish: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(generation_error(format!(
                "generator exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        log::debug!("Generator returned {} bytes", output.stdout.len());
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Stand-in used when no generator command is configured.
struct OfflineGenerator;

impl TextGenerator for OfflineGenerator {
    fn generate(&mut self, _prompt: &str) -> deck_core::Result<String> {
        Err(deck_core::Error::Generation(
            "no text generator configured (pass --generator)".to_string(),
        ))
    }
}
