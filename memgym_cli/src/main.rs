use chrono::Utc;
use clap::{Parser, Subcommand};
use memgym_core::*;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "memgym")]
#[command(about = "Flashcard memorization trainer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the card library from the starter deck
    Init,

    /// List subjects with their card counts
    Subjects,

    /// Add a new subject
    AddSubject {
        name: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Add a flashcard to a subject
    Add {
        /// Subject name
        subject: String,
        /// Prompt text
        front: String,
        /// Canonical answer text
        back: String,
    },

    /// Run a training session (default)
    Drill {
        /// Subject name (defaults to the first subject)
        subject: Option<String>,

        /// Drill cards at this mastery level instead of due cards
        #[arg(long)]
        level: Option<u8>,

        /// Comma-separated scripted answers (non-interactive, for testing)
        #[arg(long)]
        answers: Option<String>,
    },

    /// Show recent study results
    History {
        /// How many days back to look
        #[arg(long, default_value_t = 7)]
        days: i64,
    },

    /// Roll up WAL study records to CSV
    Rollup {
        /// Clean up processed WAL files after rollup
        #[arg(long)]
        cleanup: bool,
    },
}

struct DataPaths {
    library: PathBuf,
    wal: PathBuf,
    csv: PathBuf,
    wal_dir: PathBuf,
}

impl DataPaths {
    fn new(data_dir: &Path) -> Self {
        let wal_dir = data_dir.join("wal");
        Self {
            library: data_dir.join("library.json"),
            wal: wal_dir.join("study_records.wal"),
            csv: data_dir.join("results.csv"),
            wal_dir,
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    memgym_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let paths = DataPaths::new(&data_dir);

    match cli.command {
        Some(Commands::Init) => cmd_init(&paths),
        Some(Commands::Subjects) => cmd_subjects(&paths),
        Some(Commands::AddSubject { name, description }) => {
            cmd_add_subject(&paths, name, description)
        }
        Some(Commands::Add {
            subject,
            front,
            back,
        }) => cmd_add(&paths, subject, front, back),
        Some(Commands::Drill {
            subject,
            level,
            answers,
        }) => cmd_drill(&paths, subject, level, answers, &config),
        Some(Commands::History { days }) => cmd_history(&paths, days),
        Some(Commands::Rollup { cleanup }) => cmd_rollup(&paths, cleanup),
        None => {
            // Default to "drill"
            cmd_drill(&paths, None, None, None, &config)
        }
    }
}

fn cmd_init(paths: &DataPaths) -> Result<()> {
    if paths.library.exists() {
        println!("Library already exists at {}", paths.library.display());
        return Ok(());
    }

    let library = build_starter_library();
    library.save(&paths.library)?;

    println!(
        "✓ Created library with {} subject(s) and {} card(s)",
        library.subjects.len(),
        library.cards.len()
    );
    println!("  {}", paths.library.display());
    Ok(())
}

fn cmd_subjects(paths: &DataPaths) -> Result<()> {
    let library = Library::load(&paths.library)?;

    if library.subjects.is_empty() {
        println!("No subjects yet. Run `memgym init` or `memgym add-subject <name>`.");
        return Ok(());
    }

    for subject in &library.subjects {
        // Counts come from the member set, never a stored value
        let count = library.card_count(subject.id);
        match &subject.description {
            Some(description) => {
                println!("{}  ({} cards) — {}", subject.name, count, description)
            }
            None => println!("{}  ({} cards)", subject.name, count),
        }
    }
    Ok(())
}

fn cmd_add_subject(paths: &DataPaths, name: String, description: Option<String>) -> Result<()> {
    Library::update(&paths.library, |library| {
        if library.find_subject_by_name(&name).is_some() {
            return Err(Error::Other(format!("Subject '{}' already exists", name)));
        }
        library.add_subject(name.clone(), description.clone())?;
        Ok(())
    })?;

    println!("✓ Added subject '{}'", name);
    Ok(())
}

fn cmd_add(paths: &DataPaths, subject: String, front: String, back: String) -> Result<()> {
    Library::update(&paths.library, |library| {
        let subject_id = library
            .find_subject_by_name(&subject)
            .map(|s| s.id)
            .ok_or_else(|| Error::Other(format!("No subject named '{}'", subject)))?;
        library.add_card(subject_id, front.clone(), back.clone())?;
        Ok(())
    })?;

    println!("✓ Added card to '{}': {} → {}", subject, front, back);
    Ok(())
}

fn cmd_drill(
    paths: &DataPaths,
    subject: Option<String>,
    level: Option<u8>,
    answers: Option<String>,
    config: &Config,
) -> Result<()> {
    let library = Library::load(&paths.library)?;
    let errors = library.validate();
    if !errors.is_empty() {
        eprintln!("Library validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Other("Invalid library".into()));
    }

    if library.subjects.is_empty() {
        println!("No subjects yet. Run `memgym init` to get the starter deck.");
        return Ok(());
    }

    let subject = match subject {
        Some(name) => library
            .find_subject_by_name(&name)
            .cloned()
            .ok_or_else(|| Error::Other(format!("No subject named '{}'", name)))?,
        None => library.subjects[0].clone(),
    };

    let mode = match level {
        Some(level) if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) => {
            return Err(Error::Other(format!(
                "Level must be between {} and {}",
                MIN_LEVEL, MAX_LEVEL
            )));
        }
        Some(level) => SelectionMode::Level(level),
        None => SelectionMode::Due,
    };

    let intervals = config.review.intervals()?;
    let pool = library.cards_for_subject(subject.id);
    let queue = select(&pool, mode, Utc::now());

    if queue.is_empty() {
        // A zero-card subject and "cards exist but none eligible" look the
        // same to the selector; tell them apart here.
        if pool.is_empty() {
            println!("Subject '{}' has no cards yet.", subject.name);
        } else {
            match mode {
                SelectionMode::Due => println!(
                    "Nothing due in '{}' right now — come back later.",
                    subject.name
                ),
                SelectionMode::Level(level) => {
                    println!("No cards at level {} in '{}'.", level, subject.name)
                }
            }
        }
        return Ok(());
    }

    let mut scripted: Option<VecDeque<String>> = answers
        .map(|a| a.split(',').map(|s| s.trim().to_string()).collect());
    let interactive = scripted.is_none();

    let mut store = JsonStore::new(&paths.library);
    let mut session = TrainingSession::new(queue);
    let total = session.len();

    println!(
        "\nDrilling '{}' ({} question{})",
        subject.name,
        total,
        if total == 1 { "" } else { "s" }
    );

    while session.phase() != Phase::Completed {
        let front = session
            .current_card()
            .map(|c| c.front.clone())
            .ok_or_else(|| Error::Other("Session ran out of cards".into()))?;

        println!("\n[{}/{}] {}", session.position() + 1, total, front);

        let answer = match scripted.as_mut() {
            Some(queue) => {
                let answer = queue.pop_front().unwrap_or_default();
                println!("> {}", answer);
                answer
            }
            None => prompt_answer()?,
        };

        let outcome = session.submit_answer(&answer, Utc::now(), &intervals)?;

        // Each graded card is written back immediately; a failed write
        // must not stop the session.
        if let Err(e) = store.persist_card(&outcome.card) {
            tracing::warn!("Failed to persist card {}: {}", outcome.card.id, e);
        }

        if outcome.correct {
            println!("  ✓ Correct!");
        } else {
            println!("  ✗ Incorrect — the answer is '{}'", outcome.canonical);
        }

        if interactive {
            wait_for_enter()?;
        }
        session.advance()?;
    }

    let result = session
        .result()
        .cloned()
        .ok_or_else(|| Error::Other("Completed session has no result".into()))?;

    display_result(&subject, mode, &result);

    let record = StudyRecord::from_result(subject.id, mode.to_string(), &result, Utc::now());
    let mut sink = JsonlSink::new(&paths.wal);
    sink.append(&record)?;
    println!("✓ Session logged!");

    Ok(())
}

fn cmd_history(paths: &DataPaths, days: i64) -> Result<()> {
    let library = Library::load(&paths.library)?;
    let records = load_recent_records(&paths.wal, &paths.csv, days)?;

    if records.is_empty() {
        println!("No study sessions in the last {} days.", days);
        return Ok(());
    }

    for record in records {
        let subject_name = library
            .subjects
            .iter()
            .find(|s| s.id == record.subject_id)
            .map(|s| s.name.as_str())
            .unwrap_or("(deleted subject)");

        println!(
            "{}  {:<20} {:>7}  {}/{}  {:.1}%  {}",
            record.completed_at.format("%Y-%m-%d %H:%M"),
            subject_name,
            record.mode,
            record.correct_answers,
            record.total_questions,
            record.accuracy_percent,
            record.grade
        );
    }
    Ok(())
}

fn cmd_rollup(paths: &DataPaths, cleanup: bool) -> Result<()> {
    if !paths.wal.exists() {
        println!("No WAL file found - nothing to roll up.");
        return Ok(());
    }

    let count = memgym_core::rollup::wal_to_csv_and_archive(&paths.wal, &paths.csv)?;

    println!("✓ Rolled up {} study records to CSV", count);
    println!("  CSV: {}", paths.csv.display());

    if cleanup {
        let cleaned = memgym_core::rollup::cleanup_processed_wals(&paths.wal_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed WAL files", cleaned);
        }
    }

    Ok(())
}

fn display_result(subject: &Subject, mode: SelectionMode, result: &SessionResult) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  TRAINING COMPLETE                      │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {} ({})", subject.name, mode);
    println!();

    if result.total_questions == 0 {
        // Nothing was asked; an F here would be misleading
        println!("  No questions to drill this time.");
        println!();
        return;
    }

    println!(
        "  Accuracy: {:.1}%  —  Grade {}",
        result.accuracy_percent, result.grade
    );
    println!("  Correct:   {}", result.correct_answers);
    println!(
        "  Incorrect: {}",
        result.total_questions - result.correct_answers
    );
    println!();
    println!("  {}", encouragement(result.grade));
    println!();
}

fn encouragement(grade: Grade) -> &'static str {
    match grade {
        Grade::APlus => "Perfect recall! 🎉",
        Grade::A => "Excellent work! 👏",
        Grade::BPlus => "Nice job! 💪",
        Grade::B => "Good progress — keep at it! 📚",
        Grade::C => "Getting there, keep practicing! 🔥",
        Grade::F => "Tough round — try again soon! 💪",
    }
}

fn prompt_answer() -> Result<String> {
    print!("> ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

fn wait_for_enter() -> Result<()> {
    print!("  Press Enter to continue");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(())
}
