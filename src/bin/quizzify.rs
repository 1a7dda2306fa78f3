use anyhow::{bail, Context};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use quizzify::clients::{ClaudeConfig, ClientType, DeepSeekConfig, FlexibleClient, MockResponse};
use quizzify::config::{GeneratorConfig, ValidationMode};
use quizzify::error::SessionError;
use quizzify::interceptors::{FileInterceptor, Interceptor};
use quizzify::retrieval::{load_documents, PassageStore, TextSplitter};
use quizzify::session::{Direction, SessionState};
use quizzify::{Question, QuizGenerator};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Quizzify: multiple-choice quizzes from your own documents",
    long_about = None
)]
#[command(after_help = "ENVIRONMENT VARIABLES:
    ANTHROPIC_API_KEY  API key for the Claude client
    DEEPSEEK_API_KEY   API key for the DeepSeek client
    RUST_LOG           Log filter, e.g. quizzify=debug

KEYS DURING THE QUIZ:
    a-d  answer    n  next    p  previous    g  generate again    q  quit

EXAMPLES:
    quizzify --docs notes/ --topic \"photosynthesis\" --count 5
    quizzify --docs book.txt --client deepseek --strict
    quizzify --docs notes.md --client mock --mock-file replies.json")]
struct Args {
    /// Topic for the quiz [default: General Knowledge]
    #[arg(short, long)]
    topic: Option<String>,

    /// Number of questions to attempt (1-10)
    #[arg(
        short = 'n',
        long,
        default_value_t = 3,
        value_parser = clap::value_parser!(u8).range(1..=10)
    )]
    count: u8,

    /// Text or markdown files, or directories containing them
    #[arg(short, long, num_args = 1.., required_unless_present = "print_schema")]
    docs: Vec<PathBuf>,

    /// Model provider [default: first one with an API key, else mock]
    #[arg(short, long, value_enum)]
    client: Option<ClientType>,

    /// Model name for the chosen provider, e.g. claude-3-5-sonnet-latest
    #[arg(short, long)]
    model: Option<String>,

    /// JSON array of scripted replies for the mock client
    #[arg(long)]
    mock_file: Option<PathBuf>,

    /// Also require choices A-D and an answer naming one of them
    #[arg(long)]
    strict: bool,

    /// Seconds to wait for each model reply
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Save every prompt and raw reply under this directory
    #[arg(long)]
    transcript_dir: Option<PathBuf>,

    /// Print the JSON schema of a question record and exit
    #[arg(long)]
    print_schema: bool,
}

enum Action {
    Regenerate,
    Quit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env first so RUST_LOG in .env is seen
    let _ = dotenvy::dotenv();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();

    let args = Args::parse();

    if args.print_schema {
        println!("{}", Question::json_schema_pretty());
        return Ok(());
    }

    let documents = load_documents(&args.docs).await.context("Failed to load documents")?;
    let store = Arc::new(PassageStore::from_documents(&documents, &TextSplitter::default()));
    if store.is_empty() {
        bail!("Failed to split documents into chunks");
    }
    println!("Loaded {} document(s) into {} chunk(s)", documents.len(), store.len());

    let client = build_client(&args).await?;
    let interceptor: Option<Arc<dyn Interceptor>> = args
        .transcript_dir
        .clone()
        .map(|dir| Arc::new(FileInterceptor::new(dir)) as Arc<dyn Interceptor>);

    let config = GeneratorConfig::default()
        .with_timeout(Duration::from_secs(args.timeout_secs))
        .with_validation(if args.strict {
            ValidationMode::Strict
        } else {
            ValidationMode::Lenient
        });

    let mut session = SessionState::new();
    loop {
        session.begin_round();

        let mut generator = QuizGenerator::with_config(
            args.topic.as_deref(),
            usize::from(args.count),
            Some(Box::new(store.clone())),
            config.clone(),
        )?
        .with_client(client.clone());
        if let Some(interceptor) = &interceptor {
            generator = generator.with_interceptor(interceptor.clone());
        }

        println!(
            "Generating {} question(s) for topic: {}",
            generator.num_questions(),
            generator.topic()
        );
        let report = generator.generate_quiz_report().await?;
        info!(
            attempts = report.attempts(),
            accepted = report.accepted(),
            "Generation round complete"
        );

        match session.install_bank(report.bank) {
            Ok(()) => {}
            Err(SessionError::EmptyBank) => {
                println!(
                    "No valid questions were generated. \
                     Please try again with a different topic or input."
                );
                return Ok(());
            }
        }

        match run_quiz(&mut session)? {
            Action::Regenerate => continue,
            Action::Quit => break,
        }
    }

    Ok(())
}

async fn build_client(args: &Args) -> anyhow::Result<FlexibleClient> {
    let client_type = args.client.unwrap_or_default();
    info!(client = %client_type, "Using model client");
    match (client_type, &args.model) {
        (ClientType::Claude, Some(model)) => {
            return Ok(FlexibleClient::claude(ClaudeConfig::default().with_model(model)));
        }
        (ClientType::DeepSeek, Some(model)) => {
            return Ok(FlexibleClient::deepseek(DeepSeekConfig::default().with_model(model)));
        }
        (ClientType::Mock, _) => {}
        (other, None) => return Ok(FlexibleClient::from_type(other)),
    }

    let Some(path) = &args.mock_file else {
        bail!("The mock client needs --mock-file (no ANTHROPIC_API_KEY or DEEPSEEK_API_KEY found)");
    };
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let replies: Vec<serde_json::Value> =
        serde_json::from_str(&content).context("Mock file must contain a JSON array")?;
    let responses = replies
        .into_iter()
        .map(|reply| match reply {
            serde_json::Value::String(text) => MockResponse::Text(text),
            other => MockResponse::Text(other.to_string()),
        })
        .collect();
    Ok(FlexibleClient::mock_with_responses(responses).0)
}

fn run_quiz(session: &mut SessionState) -> anyhow::Result<Action> {
    render_current(session)?;
    loop {
        match read_key()? {
            KeyCode::Char(c) if ('a'..='d').contains(&c.to_ascii_lowercase()) => {
                let feedback = session.submit_answer(&c.to_string())?;
                if feedback.correct {
                    println!("Correct!");
                } else {
                    println!("Incorrect! The answer is {}.", feedback.answer);
                }
                println!("Explanation: {}", feedback.explanation);
            }
            KeyCode::Char('n') | KeyCode::Right => {
                session.advance(Direction::Next)?;
                render_current(session)?;
            }
            KeyCode::Char('p') | KeyCode::Left => {
                session.advance(Direction::Previous)?;
                render_current(session)?;
            }
            KeyCode::Char('g') => return Ok(Action::Regenerate),
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Action::Quit),
            _ => {}
        }
    }
}

fn render_current(session: &SessionState) -> anyhow::Result<()> {
    let question = session.current()?;
    println!();
    println!("{}/{}. {}", session.position() + 1, session.len(), question.question);
    for choice in &question.choices {
        println!("   {}", choice);
    }
    println!("[a-d] answer  [n]ext  [p]revious  [g]enerate again  [q]uit");
    Ok(())
}

/// Read a single keystroke, falling back to a line of input when the terminal
/// cannot enter raw mode.
fn read_key() -> anyhow::Result<KeyCode> {
    io::stdout().flush()?;
    match read_single_key() {
        Ok(code) => Ok(code),
        Err(_) => {
            let mut input = String::new();
            if io::stdin().read_line(&mut input)? == 0 {
                return Ok(KeyCode::Char('q'));
            }
            Ok(input
                .trim()
                .chars()
                .next()
                .map(KeyCode::Char)
                .unwrap_or(KeyCode::Null))
        }
    }
}

fn read_single_key() -> io::Result<KeyCode> {
    terminal::enable_raw_mode()?;
    let result = loop {
        match event::read() {
            Ok(Event::Key(KeyEvent { code, modifiers, kind, .. })) => {
                if kind != event::KeyEventKind::Press {
                    continue;
                }
                if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
                    break Ok(KeyCode::Esc);
                }
                break Ok(code);
            }
            Ok(_) => continue,
            Err(e) => break Err(e),
        }
    };
    terminal::disable_raw_mode()?;
    result
}
