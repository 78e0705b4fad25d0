use crate::error::SubmitError;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The payload POSTed to `<api>/jobs`.
#[derive(Debug, Clone, Serialize)]
pub struct JobSubmissionRequest {
    pub resume: ResumeDocument,
    pub jd: JobDescription,
    pub prefs: Preferences,
}

/// A resume file's contents, validated as JSON but never re-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeDocument(String);

impl ResumeDocument {
    /// Validates `bytes` as JSON and keeps them as-is.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, serde_json::Error> {
        serde_json::from_slice::<serde::de::IgnoredAny>(&bytes)?;
        let text = String::from_utf8(bytes).map_err(serde_json::Error::custom)?;
        Ok(Self(text))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Serialize for ResumeDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw: &RawValue = serde_json::from_str(&self.0).map_err(S::Error::custom)?;
        raw.serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum JobDescription {
    /// The service fetches the posting itself.
    #[serde(rename = "url")]
    UrlReference { url: String },
    #[serde(rename = "text")]
    InlineText { text: String },
}

impl JobDescription {
    pub fn kind(&self) -> &'static str {
        match self {
            JobDescription::UrlReference { .. } => "url",
            JobDescription::InlineText { .. } => "text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub template: Template,
    pub scoring_model: ScoringModel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Template {
    #[default]
    #[serde(rename = "one_page_v1")]
    OnePageV1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ScoringModel {
    #[default]
    #[serde(rename = "keyword_alignment_v1")]
    KeywordAlignmentV1,
}

/// Raw flag values as they come off the command line.
#[derive(Debug, Clone, Default)]
pub struct ResolveInputs {
    pub resume: Option<PathBuf>,
    pub jd_url: Option<String>,
    pub jd_text: Option<PathBuf>,
}

enum JdSource<'a> {
    Url(&'a str),
    TextFile(&'a Path),
}

/// Turns flag values into a request, reading and checking files along the way.
///
/// Nothing touches the network here. The first failure wins and no partial
/// request is returned.
pub fn resolve(inputs: &ResolveInputs) -> Result<JobSubmissionRequest, SubmitError> {
    let resume_path = inputs
        .resume
        .as_deref()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or(SubmitError::MissingArgument("resume"))?;

    let jd_url = inputs.jd_url.as_deref().filter(|s| !s.is_empty());
    let jd_text = inputs
        .jd_text
        .as_deref()
        .filter(|p| !p.as_os_str().is_empty());
    let source = match (jd_url, jd_text) {
        (None, None) => return Err(SubmitError::MissingArgument("jd")),
        (Some(_), Some(_)) => return Err(SubmitError::ConflictingArguments("jd")),
        (Some(url), None) => JdSource::Url(url),
        (None, Some(path)) => JdSource::TextFile(path),
    };

    let resume_bytes =
        std::fs::read(resume_path).map_err(|e| SubmitError::file_read(resume_path, e))?;
    debug!(
        "resume {} bytes from {}",
        resume_bytes.len(),
        resume_path.display()
    );
    let resume =
        ResumeDocument::from_bytes(resume_bytes).map_err(|source| SubmitError::InvalidJson {
            path: resume_path.to_path_buf(),
            source,
        })?;

    let jd = match source {
        JdSource::Url(url) => JobDescription::UrlReference {
            url: url.to_string(),
        },
        JdSource::TextFile(path) => {
            let bytes = std::fs::read(path).map_err(|e| SubmitError::file_read(path, e))?;
            JobDescription::InlineText {
                text: String::from_utf8_lossy(&bytes).into_owned(),
            }
        }
    };
    debug!("job description mode={}", jd.kind());

    Ok(JobSubmissionRequest {
        resume,
        jd,
        prefs: Preferences::default(),
    })
}
