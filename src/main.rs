//! PicWords - picture vocabulary drill
//!
//! Terminal front end: shows each picture as a text card, reads typed answers
//! and commands from stdin, prints the feedback.

use anyhow::Result;
use clap::{Parser, Subcommand};
use picwords::catalog::Catalog;
use picwords::config::{self, Config};
use picwords::gallery::Gallery;
use picwords::picture::Picture;
use picwords::practice::{Collaborators, Feedback, PracticeSession, Tone};
use picwords::session::Mode;
use picwords::tts;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Brightness ramp for the picture preview, dark to light
const RAMP: &[u8] = b"@%#*+=-:. ";
const PREVIEW_COLUMNS: u32 = 48;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the assets directory
    #[arg(long, global = true)]
    assets: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show configured categories and how many pictures each has
    Categories,
    /// List the eligible pictures of a category
    List { category: String },
    /// Practice a category
    Practice {
        category: String,
        /// phonics or spelling
        #[arg(short, long, default_value = "spelling")]
        mode: Mode,
    },
    /// Browse a category and hear words spelled out
    Gallery { category: String },
    /// Write the default config file
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let mut config = Config::load_from(&config_path)?;
    if let Some(assets) = &args.assets {
        config.assets_dir = assets.to_string_lossy().to_string();
    }

    // Setup logging
    let default_level = if args.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("🖍️ PicWords v{} starting...", env!("CARGO_PKG_VERSION"));
    debug!("Config: {}", config_path.display());

    let catalog = Catalog::from_config(&config);
    match args.command {
        Command::Categories => show_categories(&catalog),
        Command::List { category } => list_category(&catalog, &category),
        Command::Practice { category, mode } => {
            run_practice(&config, &catalog, &category, mode).await?
        }
        Command::Gallery { category } => run_gallery(&config, &catalog, &category).await?,
        Command::InitConfig => {
            config.save_to(&config_path)?;
            println!("Wrote {}", config_path.display());
        }
    }

    Ok(())
}

fn show_categories(catalog: &Catalog) {
    println!("Assets: {}", catalog.root().display());
    for name in catalog.categories() {
        match catalog.load(name) {
            Ok(items) => println!("  {:<12} {} pictures", name, items.len()),
            Err(e) => println!("  {:<12} ⚠️ {}", name, e),
        }
    }
}

fn list_category(catalog: &Catalog, category: &str) {
    let listing = catalog.list_items(category);
    match &listing.dir {
        None => println!("Unknown category: {}", category),
        Some(dir) if listing.files.is_empty() => {
            println!("No images found in {}", dir.display())
        }
        Some(dir) => {
            println!("{}:", dir.display());
            for file in &listing.files {
                println!("  {:<24} {}", file, picwords::core::normalize(file));
            }
        }
    }
}

async fn run_practice(
    config: &Config,
    catalog: &Catalog,
    category: &str,
    mode: Mode,
) -> Result<()> {
    let collaborators = Collaborators::from_config(config);
    let (mut practice, feedback) =
        match PracticeSession::start_session(catalog, category, mode, collaborators) {
            Ok(started) => started,
            Err(e) => {
                render(&Feedback::from_error(&e));
                return Ok(());
            }
        };

    println!("== {} ==", practice.title());
    print_help(mode);
    let mut shown = show_card(&practice, 0);
    render(&feedback);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let feedback = match line.trim() {
            "" => continue,
            ":quit" | ":q" => break,
            ":help" => {
                print_help(mode);
                continue;
            }
            ":hear" => {
                practice.hear_name().await;
                continue;
            }
            ":spell" => {
                practice.spell_current().await;
                continue;
            }
            ":next" | ":n" => practice.advance().await,
            ":speak" | ":s" => practice.submit_spoken_answer().await,
            ":ok" => practice.dismiss_feedback().await,
            answer => practice.submit_typed_answer(answer).await,
        };
        render(&feedback);

        if mode == Mode::Spelling && practice.session().is_gate_open() {
            if let Some(ms) = config.spelling_auto_advance_ms {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                let next = practice.advance().await;
                render(&next);
            }
        }

        shown = show_card(&practice, shown);
    }

    info!("👋 Leaving {}", practice.title());
    Ok(())
}

async fn run_gallery(config: &Config, catalog: &Catalog, category: &str) -> Result<()> {
    let gallery = match Gallery::open(catalog, category) {
        Ok(gallery) => gallery,
        Err(e) => {
            render(&Feedback::from_error(&e));
            return Ok(());
        }
    };
    let engine = tts::create_engine(config);

    println!("== {} ==", gallery.category().to_uppercase());
    for entry in gallery.entries() {
        let letters = &entry.spelling[..entry.spelling.len().saturating_sub(1)];
        println!("  {:<14} {}", entry.word, letters.join("-"));
    }
    println!("Type a word to hear it spelled, :quit to leave.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            ":quit" | ":q" => break,
            word => {
                if !gallery.spell_aloud(engine.as_ref(), word).await {
                    println!("'{}' is not in {}", word, gallery.category());
                }
            }
        }
    }
    Ok(())
}

fn print_help(mode: Mode) {
    match mode {
        Mode::Phonics => println!(
            "Type the word or :speak to say it. :next skips, :ok closes a wrong-answer screen, :quit leaves."
        ),
        Mode::Spelling => println!(
            "Type the word. :hear says it, :spell spells it, :next moves on once correct, :quit leaves."
        ),
    }
}

/// Print the picture card after every new draw, repeats included
fn show_card(practice: &PracticeSession, last_draw: u64) -> u64 {
    let session = practice.session();
    if session.draws() == last_draw {
        return last_draw;
    }

    if let Some(picture) = session.picture() {
        println!("{}", preview(picture, PREVIEW_COLUMNS));
    }
    if let Some(caption) = session.caption() {
        println!("{:^width$}", caption, width = PREVIEW_COLUMNS as usize);
    }
    session.draws()
}

fn render(feedback: &Feedback) {
    let marker = match feedback.tone {
        Tone::Prompt => "👉",
        Tone::Success => "✅",
        Tone::Failure => "❌",
        Tone::Notice => "ℹ️",
        Tone::Error => "⚠️",
    };
    println!("{} {}: {}", marker, feedback.title, feedback.message);
    if let Some(alert) = &feedback.followed_by {
        println!("⚠️ {}: {}", alert.title, alert.message);
    }
    if feedback.needs_dismissal {
        println!("   (type :ok to continue)");
    }
}

/// Character-cell rendering of a picture
fn preview(picture: &Picture, columns: u32) -> String {
    if picture.width == 0 || picture.height == 0 {
        return String::new();
    }
    // Terminal cells are about twice as tall as wide
    let rows = (columns * picture.height / picture.width / 2).max(1);
    let mut out = String::new();
    for row in 0..rows {
        for col in 0..columns {
            let x = col * picture.width / columns;
            let y = row * picture.height / rows;
            let idx = ((y * picture.width + x) * 4) as usize;
            let px = &picture.rgba[idx..idx + 3];
            let luma = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
            let level = (luma / 256.0 * RAMP.len() as f32) as usize;
            out.push(RAMP[level.min(RAMP.len() - 1)] as char);
        }
        out.push('\n');
    }
    out
}
