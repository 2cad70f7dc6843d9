use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use log::info;
use quiz_core::model::QuizId;
use services::{AppServices, BackendConfig, QuizSource};
use ui::{App, DesktopLinkOpener, LinkOpenerRef, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidQuizId { raw: String },
    MissingQuizId,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidQuizId { raw } => write!(f, "invalid --quiz-id value: {raw}"),
            ArgsError::MissingQuizId => write!(f, "--quiz-id (or QUIZ_ID) is required"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn services(&self) -> AppServices {
        self.services.clone()
    }

    fn link_opener(&self) -> LinkOpenerRef {
        Arc::new(DesktopLinkOpener)
    }
}

struct Args {
    quiz_id: QuizId,
    base_url: Option<String>,
    source: QuizSource,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui    --quiz-id <id> [--base-url <url>] [--inline]");
    eprintln!("  cargo run -p app -- check --quiz-id <id> [--base-url <url>] [--inline]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --base-url http://127.0.0.1:8000");
    eprintln!("  quiz loaded from /api/quiz/<id>/ (use --inline for the take-quiz page)");
    eprintln!();
    eprintln!("Environment (.env is read if present):");
    eprintln!("  QUIZ_ID, QUIZ_BASE_URL, QUIZ_CSRF_TOKEN, QUIZ_COOKIE,");
    eprintln!("  QUIZ_REQUEST_TIMEOUT_SECS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Check,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "check" => Some(Self::Check),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut quiz_id = match std::env::var("QUIZ_ID") {
            Ok(raw) => Some(parse_quiz_id(raw)?),
            Err(_) => None,
        };
        let mut base_url = None;
        let mut source = QuizSource::Api;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--quiz-id" => {
                    let value = require_value(args, "--quiz-id")?;
                    quiz_id = Some(parse_quiz_id(value)?);
                }
                "--base-url" => {
                    base_url = Some(require_value(args, "--base-url")?);
                }
                "--inline" => source = QuizSource::InlinePage,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            quiz_id: quiz_id.ok_or(ArgsError::MissingQuizId)?,
            base_url,
            source,
        })
    }
}

fn parse_quiz_id(raw: String) -> Result<QuizId, ArgsError> {
    raw.parse::<QuizId>()
        .map_err(|_| ArgsError::InvalidQuizId { raw })
}

fn backend_config(args: &Args) -> Result<BackendConfig, Box<dyn std::error::Error>> {
    let config = BackendConfig::from_env()?;
    let Some(base_url) = args.base_url.as_deref() else {
        return Ok(config);
    };
    let overridden = BackendConfig::new(base_url)?;
    Ok(BackendConfig {
        base_url: overridden.base_url,
        ..config
    })
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let config = backend_config(&parsed)?;
    info!(
        "quiz {} from {} ({:?})",
        parsed.quiz_id, config.base_url, parsed.source
    );
    let has_csrf = config.csrf_token.is_some() || config.cookie.is_some();
    let services = AppServices::new_http(config, parsed.quiz_id, parsed.source)?;

    match cmd {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Quiz")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Check => {
            let loaded = services.load_quiz().await?;
            let quiz = &loaded.quiz;
            println!(
                "{} (#{}): {} questions, {} marks, {} minutes",
                quiz.title(),
                quiz.id(),
                quiz.question_count(),
                quiz.total_marks(),
                quiz.duration_minutes()
            );
            if let Some(attempt_id) = loaded.attempt_id {
                println!("attempt: {attempt_id}");
            }
            if let Some(resume) = loaded.resume.as_ref() {
                println!(
                    "resume: {} answers, {} flagged",
                    resume.answers.len(),
                    resume.flagged.len()
                );
            }
            if !has_csrf && parsed.source == QuizSource::Api {
                println!("warning: no CSRF token or cookie configured; submissions will fail");
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
