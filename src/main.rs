//! # chatlog CLI
//!
//! Command-line interface for the chatlog library.

use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use chatlog::archive::{extract_archive, find_transcript};
use chatlog::cli::{Args, InputKind};
use chatlog::format::write_to_format;
use chatlog::parser::TranscriptParser;
use chatlog::{ChatlogError, Result};

#[tokio::main]
async fn main() {
    let args = <Args as ClapParser>::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args).await {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

/// Diagnostics go to stderr; `RUST_LOG` wins unless `--verbose` is given.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("chatlog=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chatlog=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: &Args) -> Result<()> {
    let total_start = Instant::now();

    // Fail on a bad hash before touching the filesystem
    args.identity_hash()?;
    let input = InputKind::detect(&args.input)?;
    let output_path = args.output_file();

    println!("📦 chatlog v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📖 Input:   {} ({})", args.input.display(), input);
    println!("💾 Output:  {}", output_path.display());
    println!("📄 Format:  {}", args.format);
    if args.group {
        println!("👥 Group chat");
    }
    if args.convert_opus {
        println!("🎵 Converting OPUS to MP3");
    }
    if args.no_media {
        println!("🚫 Media excluded");
    }
    println!();

    std::fs::create_dir_all(&args.output)?;
    let transcript_path = locate_transcript(&input, &args.output)?;
    println!("📝 Found chat transcript: {}", transcript_path.display());

    let media_dir = match transcript_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let parser = TranscriptParser::new(args.parse_options(media_dir)?)?.with_tools(args.tools_config());

    println!("⏳ Parsing...");
    let parse_start = Instant::now();
    let transcript = parser.parse_file(&transcript_path).await?;
    println!(
        "   Found {} events ({:.2}s)",
        transcript.len(),
        parse_start.elapsed().as_secs_f64()
    );

    println!("💾 Writing {}...", args.format);
    write_to_format(
        &transcript,
        &output_path,
        args.format.into(),
        &args.output_config(),
    )?;

    println!();
    println!("✅ Done! Output saved to {}", output_path.display());

    let media_total = transcript.media_events().count();
    let media_degraded = transcript
        .media_events()
        .filter(|e| e.has_degraded_media())
        .count();

    println!();
    println!("📊 Summary:");
    println!("   Chat:      {}", transcript.title);
    println!("   Events:    {}", transcript.len());
    println!("   Messages:  {}", transcript.messages().count());
    println!("   Media:     {}", media_total);
    if media_degraded > 0 {
        println!("   ⚠️  {} attachments missing or unconverted", media_degraded);
    }
    println!("   Hash:      {}", transcript.content_digest);
    println!();
    println!(
        "⚡ Total time: {:.2}s",
        total_start.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Transcript file for the given input, extracting archives into `output`.
fn locate_transcript(input: &InputKind, output: &Path) -> Result<PathBuf> {
    let dir = match input {
        InputKind::Transcript(path) => return Ok(path.clone()),
        InputKind::Directory(dir) => dir.as_path(),
        InputKind::Archive(zip) => {
            println!("📂 Extracting {}...", zip.display());
            let written = extract_archive(zip, output)?;
            println!("   {} files extracted", written);
            output
        }
    };

    find_transcript(dir)?.ok_or_else(|| ChatlogError::transcript_not_found(dir))
}
