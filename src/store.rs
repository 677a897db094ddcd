//! One JSON file per model inside a directory.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::codec;
use crate::config::LensConfig;
use crate::error::{
    DeserializeError, DeserializeErrorKind, JsonPath, NotFoundError, SerializeError, StoreError,
};
use crate::model::Model;

/// Extension of model files.
pub const MODEL_EXTENSION: &str = "json";

/// Loads and saves models, and tracks the model currently being worked on.
#[derive(Debug)]
pub struct ModelStore {
    directory: PathBuf,
    current: Option<Model>,
}

impl ModelStore {
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            current: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &LensConfig) -> Self {
        Self::new(config.data_directory())
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File stem for `name`. `[A-Za-z0-9_-]` and non-leading `.` are kept;
    /// every other byte is written as `%XX`. Distinct names never share a
    /// stem, and no stem starts with `.`.
    #[must_use]
    pub fn file_stem(name: &str) -> String {
        let mut stem = String::with_capacity(name.len());
        for (i, byte) in name.bytes().enumerate() {
            let kept = byte.is_ascii_alphanumeric()
                || matches!(byte, b'_' | b'-')
                || (byte == b'.' && i > 0);
            if kept {
                stem.push(char::from(byte));
            } else {
                stem.push_str(&format!("%{byte:02X}"));
            }
        }
        stem
    }

    /// Inverse of [`Self::file_stem`]. `None` for stems it never produces.
    fn name_from_stem(stem: &str) -> Option<String> {
        let mut bytes = Vec::with_capacity(stem.len());
        let mut rest = stem.as_bytes();
        while let Some((&byte, tail)) = rest.split_first() {
            if byte == b'%' {
                let hex = std::str::from_utf8(tail.get(..2)?).ok()?;
                bytes.push(u8::from_str_radix(hex, 16).ok()?);
                rest = &tail[2..];
            } else {
                bytes.push(byte);
                rest = tail;
            }
        }
        let name = String::from_utf8(bytes).ok()?;
        (Self::file_stem(&name) == stem).then_some(name)
    }

    /// File backing `name`, see [`Self::file_stem`].
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.directory
            .join(format!("{}.{MODEL_EXTENSION}", Self::file_stem(name)))
    }

    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Reads a model without changing the current selection.
    pub fn read(&self, name: &str) -> Result<Model, StoreError> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(NotFoundError::Model {
                name: name.to_string(),
                path,
            }
            .into());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| DeserializeError::new(JsonPath::root(), DeserializeErrorKind::Read(e)))?;
        let model = codec::from_json_str(&content)?;
        if model.id() != name {
            return Err(DeserializeError::new(
                JsonPath::root().field("model_id"),
                DeserializeErrorKind::IdMismatch {
                    expected: name.to_string(),
                    found: model.id().to_string(),
                },
            )
            .into());
        }
        tracing::info!(
            model = %model.id(),
            elements = model.len(),
            path = %path.display(),
            "loaded model"
        );
        Ok(model)
    }

    /// Reads a model and makes it current. On failure the current model is
    /// cleared.
    pub fn load(&mut self, name: &str) -> Result<&Model, StoreError> {
        self.current = None;
        match self.read(name) {
            Ok(model) => Ok(&*self.current.insert(model)),
            Err(err) => {
                tracing::error!(model = name, error = %err, "failed to load model");
                Err(err)
            }
        }
    }

    /// Writes `model` under its id. The previous file is replaced atomically:
    /// the new content goes to a temporary file in the same directory first.
    pub fn save(&self, model: &Model) -> Result<PathBuf, StoreError> {
        let path = self.path_for(model.id());
        let content = codec::to_json_string(model)?;

        fs::create_dir_all(&self.directory).map_err(|source| SerializeError::CreateDirectory {
            path: self.directory.clone(),
            source,
        })?;

        let write_error = |source| SerializeError::Write {
            path: path.clone(),
            source,
        };
        let mut temp = tempfile::Builder::new()
            .prefix(".archlens-")
            .suffix(".tmp")
            .tempfile_in(&self.directory)
            .map_err(write_error)?;
        temp.write_all(content.as_bytes()).map_err(write_error)?;
        temp.as_file().sync_all().map_err(write_error)?;
        temp.persist(&path)
            .map_err(|e| SerializeError::Persist {
                path: path.clone(),
                source: e.error,
            })?;

        tracing::info!(
            model = %model.id(),
            elements = model.len(),
            path = %path.display(),
            "saved model"
        );
        Ok(path)
    }

    /// Deletes the file backing `name`.
    pub fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(NotFoundError::Model {
                name: name.to_string(),
                path,
            }
            .into());
        }
        fs::remove_file(&path).map_err(|source| SerializeError::Write {
            path: path.clone(),
            source,
        })?;
        if self.current.as_ref().is_some_and(|m| self.path_for(m.id()) == path) {
            self.current = None;
        }
        tracing::info!(model = name, "removed model");
        Ok(())
    }

    /// Sorted names of the stored models. A missing directory holds none.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(
                    DeserializeError::new(JsonPath::root(), DeserializeErrorKind::Read(e)).into(),
                )
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|e| e.to_str()) == Some(MODEL_EXTENSION)
            })
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .and_then(Self::name_from_stem)
            })
            .collect();
        names.sort();
        Ok(names)
    }

    #[must_use]
    pub fn current(&self) -> Option<&Model> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Model> {
        self.current.as_mut()
    }

    pub fn take_current(&mut self) -> Option<Model> {
        self.current.take()
    }
}
