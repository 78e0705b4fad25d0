use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop a submission. All variants are terminal.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("missing required argument: --{0}")]
    MissingArgument(&'static str),

    #[error("conflicting arguments: provide only one of --jd or --jdText ({0})")]
    ConflictingArguments(&'static str),

    #[error("reading {}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("resume file is not valid JSON: {}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("calling API: {0}")]
    Transport(String),

    #[error("API error ({status}): {}", one_line(body))]
    Service { status: u16, body: String },
}

/// Keeps a service error on a single diagnostic line.
fn one_line(body: &str) -> String {
    body.split(['\r', '\n'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl SubmitError {
    pub(crate) fn file_read(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.to_path_buf(),
            source,
        }
    }
}
