use crate::{
    config::Config,
    request::{self, JobSubmissionRequest, ResolveInputs},
    submit::{self, HttpTransport, JobSubmitter, Transport},
    util::ensure_dir,
};
use anyhow::{Result, anyhow};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "resume-submit", version)]
#[command(about = "Submit a resume + job description to the resume compilation service")]
pub struct Args {
    /// Path to resume JSON (required).
    #[arg(long)]
    pub resume: Option<PathBuf>,

    /// Job description URL.
    #[arg(long)]
    pub jd: Option<String>,

    /// Path to file containing job description text.
    #[arg(long = "jdText")]
    pub jd_text: Option<PathBuf>,

    /// API base URL. Defaults to http.api_base from config (http://localhost:3001).
    #[arg(long)]
    pub api: Option<String>,

    /// Path to config TOML. If omitted, uses ./resume-submit.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override the request timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Print the request payload instead of sending it.
    #[arg(long)]
    pub dry_run: bool,
}

impl Args {
    pub fn inputs(&self) -> ResolveInputs {
        ResolveInputs {
            resume: self.resume.clone(),
            jd_url: self.jd.clone(),
            jd_text: self.jd_text.clone(),
        }
    }
}

pub fn dispatch(args: Args) -> Result<()> {
    let mut cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    if let Some(api) = &args.api {
        cfg.http.api_base = api.clone();
    }
    if let Some(secs) = args.timeout_secs {
        cfg.http.timeout_seconds = secs;
    }

    let log_path = resolve_log_path(&cfg);
    let _guard = init_logging(&args, &cfg, log_path.as_deref())?;

    let req = request::resolve(&args.inputs())?;
    let mut stdout = std::io::stdout().lock();

    if args.dry_run {
        info!("dry run; not contacting {}", cfg.http.api_base);
        stdout.write_all(&submit::encode(&req)?)?;
        stdout.flush()?;
        return Ok(());
    }

    let transport = HttpTransport::new(&cfg.http)?;
    let submitter = JobSubmitter::new(&cfg.http.api_base, transport);
    info!("submitting {} job description to {}", req.jd.kind(), submitter.endpoint());
    submit_and_print(&req, &submitter, &mut stdout)
}

/// Sends `req` and writes the accepted response body verbatim to `out`.
pub fn submit_and_print<T: Transport>(
    req: &JobSubmissionRequest,
    submitter: &JobSubmitter<T>,
    out: &mut dyn Write,
) -> Result<()> {
    let body = submitter.submit(req)?.into_result()?;
    out.write_all(&body)?;
    out.flush()?;
    Ok(())
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("resume-submit.toml");
    default.exists().then_some(default)
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the response body only.
    let console_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| anyhow!("open log file {}: {e}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }

    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }

    Some(PathBuf::from("resume-submit.log"))
}
