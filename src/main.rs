//! txtepub - Plain-text novel to EPUB converter

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use txtepub::{Book, Section, StructureConfig, convert_file, read_book};

#[derive(Parser)]
#[command(name = "txtepub")]
#[command(version, about = "Convert plain-text novels to EPUB", long_about = None)]
#[command(after_help = "EXAMPLES:
    txtepub novel.txt                 Write novel.epub next to the input
    txtepub novel.txt -o out.epub     Choose the output path
    txtepub -i novel.txt              Show the recovered structure
    txtepub -i --json novel.txt       Dump the recovered structure as JSON")]
struct Cli {
    /// Input text file (UTF-8, UTF-16 or GBK)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output EPUB file [default: INPUT with .epub extension]
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// JSON file overriding structure recovery settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show the recovered structure without converting
    #[arg(short, long)]
    info: bool,

    /// With --info, print the structure as JSON
    #[arg(long, requires = "info")]
    json: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> txtepub::Result<()> {
    let config = match cli.config {
        Some(ref path) => load_config(path)?,
        None => StructureConfig::default(),
    };

    if cli.info {
        let book = read_book(&cli.input, &config)?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&book)?);
        } else {
            show_info(&cli.input, &book);
        }
        return Ok(());
    }

    let output = convert_file(&cli.input, cli.output.as_deref(), &config)?;
    if !cli.quiet {
        println!("EPUB saved to: {}", output.display());
    }
    Ok(())
}

fn load_config(path: &Path) -> txtepub::Result<StructureConfig> {
    let json = std::fs::read_to_string(path)?;
    StructureConfig::from_json(&json)
}

fn show_info(path: &Path, book: &Book) {
    println!("File: {}", path.display());
    println!("Title: {}", book.title);
    if let Some(ref author) = book.author {
        println!("Author: {author}");
    }
    if let Some(ref intro) = book.intro {
        let intro = intro.replace('\n', " ");
        let mut chars = intro.chars();
        let head: String = chars.by_ref().take(100).collect();
        if chars.next().is_some() {
            println!("Intro: {head}...");
        } else {
            println!("Intro: {head}");
        }
    }
    println!("Volumes: {}", book.volumes.len());
    println!("Chapters: {}", book.chapter_count());
    println!();

    for section in book.sections() {
        match section {
            Section::Volume(volume) => {
                println!("{} ({} chapters)", volume.title, volume.chapters.len());
            }
            Section::Chapter(chapter) => {
                let indent = if chapter.volume.is_some() { "  " } else { "" };
                println!("{indent}{} ({} lines)", chapter.title, chapter.lines.len());
            }
        }
    }
}
