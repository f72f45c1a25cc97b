//! chordshift - transpose chord lists and chord charts from the command line

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chordshift::{
    find_origin_key, transpose_chart, transpose_chord_list, BassPolicy, EnharmonicPreference, Section,
    Session, SessionMode, TransposeError, TranspositionRequest,
};
use clap::{Args, Parser, Subcommand};
use tracing::Level;

/// chordshift - move chord charts to a new key
#[derive(Parser)]
#[command(name = "chordshift")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Session file holding last-used keys and song sections (YAML)
    #[arg(long, global = true)]
    session: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transpose whitespace-separated chords; other tokens are left alone
    List {
        /// Chords to transpose (read from stdin when omitted)
        chords: Vec<String>,

        #[command(flatten)]
        keys: KeyArgs,
    },

    /// Transpose a full chart with lyrics, keeping its layout
    Chart {
        /// Chart file, or "-" for stdin
        #[arg(default_value = "-")]
        input: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        keys: KeyArgs,
    },

    /// Print the origin key inferred from a chord sequence
    Key {
        /// Chord tokens (read from stdin when omitted)
        tokens: Vec<String>,
    },

    /// Transpose the song sections stored in the session file
    Sections {
        /// Add a section with this name (requires --chords)
        #[arg(long, requires = "chords")]
        add: Option<String>,

        /// Chords for the section given by --add or --set
        #[arg(long)]
        chords: Option<String>,

        /// Replace the chords of an existing section (requires --chords)
        #[arg(long, requires = "chords", conflicts_with = "add")]
        set: Option<String>,

        /// Remove the section with this name
        #[arg(long)]
        remove: Option<String>,

        #[command(flatten)]
        keys: KeyArgs,
    },
}

#[derive(Args)]
struct KeyArgs {
    /// Origin key (note name, minor key like "F#m", or index 0-11); inferred when omitted
    #[arg(short, long)]
    from: Option<String>,

    /// Destination key
    #[arg(short, long)]
    to: Option<String>,

    /// Enharmonic spelling for the result: sharp or flat
    #[arg(short, long)]
    prefer: Option<String>,

    /// Also transpose slash bass notes (G/B -> A/C#)
    #[arg(long)]
    transpose_bass: bool,
}

impl KeyArgs {
    /// Merge flags with the parameters last used in the same mode.
    fn request(&self, last: Option<&TranspositionRequest>) -> Result<TranspositionRequest, TransposeError> {
        let origin = match (&self.from, last) {
            (Some(from), _) => from.clone(),
            (None, Some(last)) => last.origin.into(),
            (None, None) => String::new(),
        };
        let destination = match (&self.to, last) {
            (Some(to), _) => to.clone(),
            (None, Some(last)) => last.destination.to_string(),
            (None, None) => String::new(),
        };
        let preference = match (&self.prefer, last) {
            (Some(prefer), _) => prefer.clone(),
            (None, Some(last)) => last.preference.to_string(),
            (None, None) => EnharmonicPreference::default().to_string(),
        };

        let bass = if self.transpose_bass {
            BassPolicy::Transpose
        } else {
            last.map(|l| l.bass).unwrap_or_default()
        };
        Ok(TranspositionRequest::parse(&origin, &destination, &preference)?.with_bass(bass))
    }

    fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none() && self.prefer.is_none() && !self.transpose_bass
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Error reading from stdin")?;
    Ok(buffer)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        return read_stdin();
    }
    fs::read_to_string(input).with_context(|| format!("Error reading file '{}'", input))
}

fn load_session(path: Option<&Path>) -> Result<Session> {
    match path {
        Some(path) => Session::load(path).with_context(|| format!("Error loading session '{}'", path.display())),
        None => Ok(Session::default()),
    }
}

fn save_session(path: Option<&Path>, session: &Session) -> Result<()> {
    if let Some(path) = path {
        session
            .save(path)
            .with_context(|| format!("Error saving session '{}'", path.display()))?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let session_path = cli.session.as_deref();
    let mut session = load_session(session_path)?;

    match cli.command {
        Commands::List { chords, keys } => {
            let text = if chords.is_empty() {
                read_stdin()?
            } else {
                chords.join(" ")
            };
            let last = session.last(SessionMode::List).map(|l| l.request);
            let request = keys.request(last.as_ref())?;
            let transposed = transpose_chord_list(text.trim(), &request)?;
            println!("{}", transposed);

            session.remember(SessionMode::List, text.trim(), request);
            save_session(session_path, &session)?;
        }

        Commands::Chart { input, output, keys } => {
            let text = read_input(&input)?;
            let last = session.last(SessionMode::Chart).map(|l| l.request);
            let request = keys.request(last.as_ref())?;
            let transposed = transpose_chart(&text, &request)?;

            match output {
                Some(path) => {
                    fs::write(&path, &transposed)
                        .with_context(|| format!("Error writing to '{}'", path.display()))?;
                    eprintln!("Wrote transposed chart to {}", path.display());
                }
                None => print!("{}", transposed),
            }

            session.remember(SessionMode::Chart, text, request);
            save_session(session_path, &session)?;
        }

        Commands::Key { tokens } => {
            let tokens: Vec<String> = if tokens.is_empty() {
                read_stdin()?.split_whitespace().map(str::to_string).collect()
            } else {
                tokens
            };
            let key = find_origin_key(&tokens).ok_or(TransposeError::OriginKeyNotIdentifiable)?;
            println!("{}", key);
        }

        Commands::Sections {
            add,
            chords,
            set,
            remove,
            keys,
        } => {
            if session_path.is_none() {
                anyhow::bail!("The sections command needs --session <FILE>");
            }

            if let (Some(name), Some(chords)) = (add, chords.clone()) {
                session.add_section(Section::new(name, chords));
            }
            if let (Some(name), Some(chords)) = (set, chords) {
                let section = session
                    .section_mut(&name)
                    .with_context(|| format!("No section named '{}'", name))?;
                section.chords = chords;
            }
            if let Some(name) = remove {
                let index = session
                    .sections
                    .iter()
                    .position(|s| s.name == name)
                    .with_context(|| format!("No section named '{}'", name))?;
                session.remove_section(index);
            }

            let last = session.last(SessionMode::Sections).map(|l| l.request);
            if last.is_some() || !keys.is_empty() {
                let request = keys.request(last.as_ref())?;
                session.transpose_sections(&request)?;
            }

            for section in &session.sections {
                println!("[{}]", section.name);
                println!("  {}", section.chords);
                if !section.transposed.is_empty() {
                    println!("  {}", section.transposed);
                }
            }
            save_session(session_path, &session)?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
