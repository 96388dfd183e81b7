use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use medimind_types::{Message, Role};
use tracing::debug;

use crate::error::StorageError;

/// File name of the persisted chat log inside the data directory
pub const CHAT_LOG_FILE: &str = "ChatLog.json";

/// Persists the chat log as a JSON array of `{role, content}` objects.
///
/// Every save is a full rewrite through a temporary file and a rename, so a
/// crash mid-write leaves either the old log or the new one on disk.
#[derive(Debug, Clone)]
pub struct ChatLogStore {
    path: PathBuf,
}

impl ChatLogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `{data_dir}/ChatLog.json`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(CHAT_LOG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Read the log. A missing file is initialized to an empty log.
    pub fn load(&self) -> Result<Vec<Message>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "chat log missing, initializing");
                self.save(&[])?;
                Ok(Vec::new())
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Overwrite the log with `messages`
    pub fn save(&self, messages: &[Message]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(messages)
            .map_err(|e| self.io_error(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), messages = messages.len(), "chat log saved");
        Ok(())
    }

    /// Replace the log with an empty one
    pub fn reset(&self) -> Result<(), StorageError> {
        self.save(&[])
    }
}

/// Plain-text transcript, one blank-line separated block per message
pub fn render_transcript(messages: &[Message], assistant_name: &str) -> String {
    let mut out = String::new();
    for message in messages {
        let label = match message.role {
            Role::User => "User",
            Role::Assistant | Role::System => assistant_name,
        };
        out.push_str(&format!("{}: {}\n\n", label, message.content));
    }
    out
}

/// Write [`render_transcript`] output to `path`
pub fn write_transcript(
    messages: &[Message],
    assistant_name: &str,
    path: &Path,
) -> Result<(), StorageError> {
    fs::write(path, render_transcript(messages, assistant_name)).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_log() -> Vec<Message> {
        vec![
            Message::user("I have a sore throat"),
            Message::assistant("Gargle with warm salt water.\nRest your voice."),
            Message::user("Anything else? \"quotes\" and ünïcödé"),
        ]
    }

    #[test]
    fn test_load_missing_initializes_empty_file() {
        let dir = TempDir::new().unwrap();
        let store = ChatLogStore::in_dir(&dir.path().join("Data"));

        assert!(store.load().unwrap().is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap().trim(), "[]");
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = ChatLogStore::in_dir(dir.path());

        store.save(&sample_log()).unwrap();
        assert_eq!(store.load().unwrap(), sample_log());

        store.save(&[]).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_is_full_rewrite_without_temp_leftovers() {
        let dir = TempDir::new().unwrap();
        let store = ChatLogStore::in_dir(dir.path());

        store.save(&sample_log()).unwrap();
        store.save(&sample_log()[..1]).unwrap();

        assert_eq!(store.load().unwrap(), vec![Message::user("I have a sore throat")]);
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![CHAT_LOG_FILE.to_string()]);
    }

    #[test]
    fn test_reset_empties_log() {
        let dir = TempDir::new().unwrap();
        let store = ChatLogStore::in_dir(dir.path());
        store.save(&sample_log()).unwrap();

        store.reset().unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_log_is_reported_and_left_alone() {
        let dir = TempDir::new().unwrap();
        let store = ChatLogStore::in_dir(dir.path());
        fs::write(store.path(), "[{\"role\": \"user\", \"content\": ").unwrap();

        assert!(matches!(store.load(), Err(StorageError::Corrupt { .. })));
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "[{\"role\": \"user\", \"content\": "
        );
    }

    #[test]
    fn test_unreadable_log_is_io_error() {
        let dir = TempDir::new().unwrap();
        // a directory where the file should be
        let store = ChatLogStore::new(dir.path());
        assert!(matches!(store.load(), Err(StorageError::Io { .. })));
    }

    #[test]
    fn test_transcript_labels() {
        let text = render_transcript(&sample_log()[..2], "MediMind AI");
        assert_eq!(
            text,
            "User: I have a sore throat\n\nMediMind AI: Gargle with warm salt water.\nRest your voice.\n\n"
        );
    }

    #[test]
    fn test_write_transcript() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat.txt");
        write_transcript(&sample_log(), "Doc", &path).unwrap();
        assert!(fs::read_to_string(&path)
            .unwrap()
            .starts_with("User: I have a sore throat\n\nDoc: "));
    }
}
