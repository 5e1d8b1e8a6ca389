// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use pdf_summarize::utils::logging::{
    format_error, format_heading, format_info, format_success, format_warning, init_logger,
};
use pdf_summarize::config::API_KEY_ENV;
use pdf_summarize::{
    ChunkSplitter, CombineStrategy, Config, ExportFormat, ModelError, PdfExtractor,
    ProgressTracker, PromptTemplate, SourceDocument, SummarizeError, Summarizer,
    SummaryExporter, Validator,
};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "pdf_summarize")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Summarize a PDF according to your own instruction with Gemini")]
#[command(long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a PDF following an instruction
    Summarize {
        /// PDF file, or `-` to read the document from stdin
        input: PathBuf,

        /// Instruction shaping the summary
        #[arg(short, long, conflicts_with = "instruction_file")]
        instruction: Option<String>,

        /// Read the instruction from a file
        #[arg(long, value_name = "FILE")]
        instruction_file: Option<PathBuf>,

        #[command(flatten)]
        chunking: ChunkingArgs,

        #[arg(long, env = "PDF_SUMMARIZE_MODEL")]
        model: Option<String>,

        #[arg(long)]
        temperature: Option<f32>,

        /// How per-chunk outputs are combined: concatenate or reduce
        #[arg(long)]
        strategy: Option<CombineStrategy>,

        /// Number of chunk requests in flight
        #[arg(long, value_name = "NUM")]
        concurrency: Option<usize>,

        /// Write the summary to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: ExportFormat,

        #[arg(long, action = ArgAction::SetTrue)]
        no_progress: bool,
    },

    /// Show how a PDF would be split into chunks, without calling the model
    Chunks {
        /// PDF file, or `-` to read the document from stdin
        input: PathBuf,

        #[command(flatten)]
        chunking: ChunkingArgs,

        /// Characters of each chunk to preview
        #[arg(long, default_value_t = 80)]
        preview: usize,
    },
}

#[derive(Args)]
struct ChunkingArgs {
    /// Maximum chunk size in characters
    #[arg(long, value_name = "CHARS")]
    max_chunk_size: Option<usize>,

    /// Characters repeated from the end of the previous chunk
    #[arg(long, value_name = "CHARS")]
    overlap: Option<usize>,
}

impl ChunkingArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(max) = self.max_chunk_size {
            config.chunking.max_chunk_size = max;
        }
        if let Some(overlap) = self.overlap {
            config.chunking.overlap_size = overlap;
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logger(cli.color, cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{}", report(&e));
        std::process::exit(1);
    }
}

/// Formats the single message shown for a failed run. Rejected input is a
/// warning; authentication failures name where the key is read from.
fn report(error: &anyhow::Error) -> String {
    let message = describe(error);

    match error.downcast_ref::<SummarizeError>() {
        Some(SummarizeError::Validation(_)) => format_warning(&message),
        Some(e) if matches!(e.model_error(), Some(ModelError::Authentication(_))) => {
            format_error(&format!("{} (check {} or model.api_key)", message, API_KEY_ENV))
        }
        _ => format_error(&message),
    }
}

/// Joins the error chain, skipping causes a wrapper already quotes.
fn describe(error: &anyhow::Error) -> String {
    let mut message = String::new();
    for cause in error.chain() {
        let text = cause.to_string();
        if message.ends_with(&text) {
            continue;
        }
        if !message.is_empty() {
            message.push_str(": ");
        }
        message.push_str(&text);
    }
    message
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Summarize {
            input,
            instruction,
            instruction_file,
            chunking,
            model,
            temperature,
            strategy,
            concurrency,
            output,
            format,
            no_progress,
        } => {
            chunking.apply(&mut config);
            if let Some(model) = model {
                config.model.model = model;
            }
            if let Some(temperature) = temperature {
                config.model.temperature = temperature;
            }
            if let Some(strategy) = strategy {
                config.summary.strategy = strategy;
            }
            if let Some(concurrency) = concurrency {
                config.summary.concurrency = concurrency;
            }
            config.validate()?;

            let instruction = resolve_instruction(instruction, instruction_file.as_deref())?;
            let progress = !no_progress && std::io::stderr().is_terminal();

            cmd_summarize(
                &config,
                &input,
                &instruction,
                output.as_deref(),
                format,
                progress && cli.color,
                progress,
            )
            .await
        }
        Commands::Chunks {
            input,
            chunking,
            preview,
        } => {
            chunking.apply(&mut config);
            config.validate()?;
            cmd_chunks(&config, &input, preview).await
        }
    }
}

fn resolve_instruction(inline: Option<String>, file: Option<&Path>) -> Result<String> {
    let instruction = match (inline, file) {
        (Some(text), _) => text,
        (None, Some(path)) => Validator::read_instruction_file(path)
            .with_context(|| format!("Failed to read instruction from {}", path.display()))?,
        (None, None) => String::new(),
    };

    PromptTemplate::validate_instruction(&instruction)?;
    Ok(instruction)
}

fn read_input(input: &Path) -> Result<SourceDocument> {
    if input == Path::new("-") {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read PDF from stdin")?;
        return Ok(SourceDocument::new("stdin", bytes));
    }

    Validator::validate_file_path(input)?;
    if let Err(e) = Validator::validate_pdf_extension(input) {
        warn!("{}", e);
    }

    Ok(PdfExtractor::load_source(input)?)
}

async fn cmd_summarize(
    config: &Config,
    input: &Path,
    instruction: &str,
    output: Option<&Path>,
    format: ExportFormat,
    colored: bool,
    show_progress: bool,
) -> Result<()> {
    let mut summarizer = Summarizer::from_config(config)?;

    if show_progress {
        summarizer = summarizer.with_progress(Arc::new(ProgressTracker::new(colored)));
    }

    let document = read_input(input)?;
    info!("Loaded {} ({} bytes)", document.name, document.size());

    let summary = summarizer
        .summarize_document(document, instruction)
        .await
        .context("Summarization failed")?;

    let exporter = SummaryExporter::new(format);

    match output {
        Some(path) => {
            exporter.write(&summary, path)?;
            eprintln!(
                "{}",
                format_success(&format!(
                    "Summary of {} written to {} ({} chunk(s), {} model call(s), {:.1}% of input)",
                    summary.source_name,
                    path.display(),
                    summary.stats.chunks,
                    summary.stats.model_calls,
                    summary.stats.compression_ratio() * 100.0
                ))
            );
        }
        None => {
            println!("{}", exporter.render(&summary)?);
        }
    }

    Ok(())
}

async fn cmd_chunks(config: &Config, input: &Path, preview: usize) -> Result<()> {
    let splitter = ChunkSplitter::from_config(&config.chunking)?;
    let document = read_input(input)?;
    let name = document.name.clone();

    let segments = tokio::task::spawn_blocking(move || PdfExtractor::new().extract(&document))
        .await
        .context("Extraction task failed")??;

    let chunks = splitter.split(&segments);
    let total_chars: usize = chunks.iter().map(|c| c.fresh_text().chars().count()).sum();

    println!(
        "{}",
        format_heading(&format!(
            "{}: {} page(s), {} chars, {} chunk(s) (max {}, overlap {})",
            name,
            segments.len(),
            total_chars,
            chunks.len(),
            splitter.max_chunk_size(),
            splitter.overlap_size()
        ))
    );

    if chunks.is_empty() {
        println!("{}", format_warning("No extractable text found"));
        return Ok(());
    }

    for chunk in &chunks {
        println!(
            "{:>4}  {:<10} {:>7} chars  overlap {:>5}  {}",
            chunk.index + 1,
            chunk.page_span(),
            chunk.char_len(),
            chunk.overlap,
            Validator::preview(chunk.fresh_text(), preview)
        );
        if chunk.overlap > 0 {
            println!(
                "{:>18} repeats \"{}\"",
                "",
                Validator::preview(chunk.overlap_text(), preview / 2)
            );
        }
    }

    println!(
        "{}",
        format_info(&format!(
            "{} model call(s) would be made with the concatenate strategy",
            chunks.len()
        ))
    );

    Ok(())
}
