use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::document::{self, Node, ServiceDocument, ServiceSet};
use crate::error::{LoadError, ParseError};

/// File extensions picked up from an input directory.
pub const SPEC_EXTENSIONS: [&str; 3] = ["yml", "yaml", "json"];

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

fn parse_error(path: &Path) -> impl FnOnce(ParseError) -> LoadError + '_ {
    move |source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    }
}

/// Load one service document. `.json` files are read as JSON, all others as YAML.
pub fn load_file(path: &Path) -> Result<ServiceDocument, LoadError> {
    let content = read(path)?;
    let parsed = if is_json(path) {
        document::from_json(&content)
    } else {
        document::from_yaml(&content)
    };
    parsed.map_err(parse_error(path))
}

/// Load any document as a generic value, without shape checks.
pub fn load_value(path: &Path) -> Result<Node, LoadError> {
    let content = read(path)?;
    let parsed = if is_json(path) {
        document::node_from_json(&content)
    } else {
        document::node_from_yaml(&content)
    };
    parsed.map_err(parse_error(path))
}

/// Service name of a spec file: its file name without extension.
pub fn service_name(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

fn is_spec_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .is_none_or(|n| n.as_encoded_bytes().starts_with(b"."));
    let known = path
        .extension()
        .is_some_and(|e| SPEC_EXTENSIONS.iter().any(|known| e == *known));
    !hidden && known && path.is_file()
}

/// Load every spec file directly inside `dir`, ordered by file name.
///
/// Any unreadable or unparseable file fails the whole load.
pub fn load_directory(dir: &Path) -> Result<ServiceSet, LoadError> {
    let io_error = |source: std::io::Error| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if is_spec_file(&path) {
            files.push(path);
        }
    }
    files.sort();

    let mut services = ServiceSet::new();
    let mut origins: HashMap<String, PathBuf> = HashMap::new();
    for path in files {
        let Some(name) = service_name(&path) else {
            return Err(LoadError::InvalidServiceName { path });
        };
        if let Some(first) = origins.get(&name) {
            return Err(LoadError::DuplicateService {
                service: name,
                first: first.clone(),
                second: path,
            });
        }
        info!("loading file: {}", path.display());
        let service = load_file(&path)?;
        services.insert(name.clone(), service);
        origins.insert(name, path);
    }

    info!("loaded {} OpenAPI files", services.len());
    Ok(services)
}
