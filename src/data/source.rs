use std::convert::Infallible;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Source – where a dataset is read from
// ---------------------------------------------------------------------------

/// A local file or an `http(s)://` URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

impl Source {
    /// Anything starting with `http://` or `https://` is a URL, the rest a path.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        let scheme = s.split_once("://").map(|(scheme, _)| scheme.to_ascii_lowercase());
        match scheme.as_deref() {
            Some("http" | "https") => Source::Url(s.to_string()),
            _ => Source::File(PathBuf::from(s)),
        }
    }

    /// Lower-cased extension of the file name, or of the last URL path segment.
    pub fn extension(&self) -> Option<String> {
        let name = match self {
            Source::File(path) => path.file_name()?.to_str()?.to_string(),
            Source::Url(url) => {
                let url = reqwest::Url::parse(url).ok()?;
                url.path_segments()?.last()?.to_string()
            }
        };
        Path::new(&name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    }

    /// Short label for the top bar: the file name or the URL's last segment.
    pub fn display_name(&self) -> String {
        match self {
            Source::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Source::Url(url) => reqwest::Url::parse(url)
                .ok()
                .and_then(|u| {
                    let last = u.path_segments()?.last()?.to_string();
                    let host = u.host_str()?.to_string();
                    Some(if last.is_empty() {
                        host
                    } else {
                        format!("{host}/…/{last}")
                    })
                })
                .unwrap_or_else(|| url.clone()),
        }
    }
}

impl FromStr for Source {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Source::parse(s))
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::File(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::File(path.to_path_buf())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Url(url) => f.write_str(url),
        }
    }
}

// ---------------------------------------------------------------------------
// Format – which reader decodes the bytes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
    Parquet,
}

impl Format {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Format::Csv),
            "json" => Some(Format::Json),
            "parquet" | "pq" => Some(Format::Parquet),
            _ => None,
        }
    }

    /// Map an HTTP `Content-Type` header value, ignoring parameters.
    pub fn from_content_type(value: &str) -> Option<Self> {
        let mime = value.split(';').next().unwrap_or_default().trim();
        match mime.to_ascii_lowercase().as_str() {
            "text/csv" | "application/csv" => Some(Format::Csv),
            "application/json" => Some(Format::Json),
            "application/vnd.apache.parquet" | "application/x-parquet" => Some(Format::Parquet),
            _ => None,
        }
    }
}
