use std::io::{self, Write};
use std::path::Path;

use log::info;
use tempfile::NamedTempFile;

use crate::document::UnifiedDocument;
use crate::error::WriteError;

/// Serialization format of the unified document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    /// `.json` selects JSON; anything else is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Yaml,
        }
    }
}

/// Render the document. Keys keep their insertion order.
pub fn render(document: &UnifiedDocument, format: OutputFormat) -> Result<String, WriteError> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml_ng::to_string(document)?),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(document)?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Write the document to `path`, replacing any existing file atomically.
pub fn write_output(path: &Path, document: &UnifiedDocument) -> Result<(), WriteError> {
    info!("writing output to file: {}", path.display());
    let content = render(document, OutputFormat::from_path(path))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.is_dir() {
        return Err(WriteError::MissingDirectory {
            path: path.to_path_buf(),
        });
    }

    let classify = |err: io::Error| classify_io_error(path, err);
    let mut tmp = NamedTempFile::new_in(dir).map_err(classify)?;
    tmp.write_all(content.as_bytes()).map_err(classify)?;
    tmp.as_file().sync_all().map_err(classify)?;
    set_readable(&tmp).map_err(classify)?;
    tmp.persist(path).map_err(|e| classify(e.error))?;

    info!("successfully wrote output to {}", path.display());
    Ok(())
}

fn classify_io_error(path: &Path, err: io::Error) -> WriteError {
    let path = path.to_path_buf();
    match err.kind() {
        io::ErrorKind::NotFound => WriteError::MissingDirectory { path },
        io::ErrorKind::PermissionDenied => WriteError::PermissionDenied { path },
        _ => WriteError::Io { path, source: err },
    }
}

/// Temporary files are created owner-only; the output is a regular document.
#[cfg(unix)]
fn set_readable(tmp: &NamedTempFile) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tmp.as_file()
        .set_permissions(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_readable(_tmp: &NamedTempFile) -> io::Result<()> {
    Ok(())
}
