//! Message file discovery and parsing.
//!
//! Every `*.json` file under the messages directory is one message. Its
//! name is the path relative to that directory, without the extension and
//! with `/` separators (`example/example-chat`).

use std::path::{Path, PathBuf};

use herald_core::config::HeraldConfig;
use herald_core::error::{HeraldError, Result};
use herald_core::types::Message;

/// Bundled example templates, written into `<messages_dir>/example/`.
const EXAMPLES: &[(&str, &str)] = &[
    ("example.json", include_str!("../assets/messages/example.json")),
    ("example-chat.json", include_str!("../assets/messages/example-chat.json")),
    (
        "example-notification.json",
        include_str!("../assets/messages/example-notification.json"),
    ),
    ("example-title.json", include_str!("../assets/messages/example-title.json")),
    ("example-sound.json", include_str!("../assets/messages/example-sound.json")),
    ("example-all.json", include_str!("../assets/messages/example-all.json")),
    (
        "example-no-center.json",
        include_str!("../assets/messages/example-no-center.json"),
    ),
];

const EXAMPLE_DIR: &str = "example";

/// Reads message files from one directory tree.
#[derive(Debug, Clone)]
pub struct MessageLoader {
    dir: PathBuf,
}

impl MessageLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &HeraldConfig) -> Self {
        Self::new(config.messages_path())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load every message file, in sorted path order. A file that cannot be
    /// read or parsed is logged and skipped. Disabled messages are returned
    /// too; the store filters them.
    pub fn load_all(&self) -> Result<Vec<Message>> {
        self.ensure_dir()?;

        let mut messages = Vec::new();
        for path in self.message_files() {
            let Some(name) = self.name_for(&path) else {
                continue;
            };
            match Self::read(&name, &path) {
                Ok(message) => {
                    tracing::debug!("Loaded message: {name}");
                    messages.push(message);
                }
                Err(e) => tracing::warn!("Failed to load message {name}: {e}"),
            }
        }

        tracing::info!("Loaded {} message file(s) from {}", messages.len(), self.dir.display());
        Ok(messages)
    }

    /// Load a single message by name. A trailing `.json` is accepted.
    pub fn load_one(&self, name: &str) -> Result<Message> {
        let name = name.strip_suffix(".json").unwrap_or(name);
        if name.is_empty() || name.split('/').any(|part| part == "..") {
            return Err(HeraldError::MessageNotFound(name.to_string()));
        }
        let path = self.dir.join(format!("{name}.json"));
        if !path.is_file() {
            return Err(HeraldError::MessageNotFound(name.to_string()));
        }
        Self::read(name, &path)
    }

    /// Names of every message file, without parsing them.
    pub fn message_names(&self) -> Vec<String> {
        self.message_files()
            .iter()
            .filter_map(|path| self.name_for(path))
            .collect()
    }

    /// Write the bundled examples that are missing. Existing files are never
    /// overwritten. Returns the number of files written.
    pub fn create_examples(&self) -> Result<usize> {
        let example_dir = self.dir.join(EXAMPLE_DIR);
        std::fs::create_dir_all(&example_dir).map_err(|e| {
            HeraldError::loader(format!(
                "cannot create {}: {e}",
                example_dir.display()
            ))
        })?;

        let mut written = 0;
        for (file_name, content) in EXAMPLES {
            let path = example_dir.join(file_name);
            if path.exists() {
                continue;
            }
            match std::fs::write(&path, content) {
                Ok(()) => {
                    tracing::info!("Created example message: {}", path.display());
                    written += 1;
                }
                Err(e) => tracing::warn!("Failed to create example {file_name}: {e}"),
            }
        }
        Ok(written)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)?;
            tracing::info!("Created messages directory: {}", self.dir.display());
        }
        Ok(())
    }

    fn read(name: &str, path: &Path) -> Result<Message> {
        let content = std::fs::read_to_string(path)?;
        Message::from_json(name, &content)
    }

    fn message_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        walk_recursive(&self.dir, &mut files);
        files.retain(|p| is_json(p));
        files.sort();
        files
    }

    fn name_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.dir).ok()?.with_extension("");
        let parts: Vec<&str> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<_>>()?;
        Some(parts.join("/"))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Collect regular files below `dir`, skipping hidden entries.
fn walk_recursive(dir: &Path, result: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'))
        {
            continue;
        }
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        // Symlinked directories are not followed, so a link cycle cannot recurse.
        if file_type.is_dir() {
            walk_recursive(&path, result);
        } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
            result.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_all_recursive_sorted() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "b.json", r#"{"ChatMessages": ["b"]}"#);
        write(tmp.path(), "a.json", r#"{"ChatMessages": ["a"]}"#);
        write(tmp.path(), "sub/c.JSON", r#"{"ChatMessages": ["c"], "Priority": 2}"#);
        write(tmp.path(), "notes.txt", "ignored");
        write(tmp.path(), ".hidden/d.json", r#"{"ChatMessages": ["d"]}"#);

        let loader = MessageLoader::new(tmp.path());
        let names: Vec<String> = loader.load_all().unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["a", "b", "sub/c"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_dirs_are_not_followed() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.json", r#"{"ChatMessages": ["a"]}"#);
        write(tmp.path(), "sub/b.json", r#"{"ChatMessages": ["b"]}"#);
        std::os::unix::fs::symlink(tmp.path(), tmp.path().join("sub/loop")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("a.json"), tmp.path().join("alias.json")).unwrap();

        let loader = MessageLoader::new(tmp.path());
        let names: Vec<String> = loader.load_all().unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["a", "alias", "sub/b"]);
    }

    #[test]
    fn test_broken_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "good.json", r#"{"ChatMessages": ["ok"]}"#);
        write(tmp.path(), "broken.json", "{ not json");
        write(tmp.path(), "empty.json", "   ");

        let messages = MessageLoader::new(tmp.path()).load_all().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].name, "good");
    }

    #[test]
    fn test_missing_dir_is_created() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested/messages");
        let loader = MessageLoader::new(&dir);
        assert!(loader.load_all().unwrap().is_empty());
        assert!(dir.is_dir());
    }

    #[test]
    fn test_load_one() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "promo/sale.json", r#"{"ChatMessages": ["&6Sale!"], "Priority": 3}"#);
        let loader = MessageLoader::new(tmp.path());

        let msg = loader.load_one("promo/sale").unwrap();
        assert_eq!(msg.name, "promo/sale");
        assert_eq!(msg.priority, 3);
        assert_eq!(loader.load_one("promo/sale.json").unwrap().name, "promo/sale");

        assert!(matches!(loader.load_one("missing"), Err(HeraldError::MessageNotFound(_))));
        assert!(matches!(loader.load_one("../escape"), Err(HeraldError::MessageNotFound(_))));
    }

    #[test]
    fn test_create_examples_never_overwrites() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "example/example.json", r#"{"ChatMessages": ["mine"]}"#);
        let loader = MessageLoader::new(tmp.path());

        assert_eq!(loader.create_examples().unwrap(), EXAMPLES.len() - 1);
        assert_eq!(loader.create_examples().unwrap(), 0);

        let kept = loader.load_one("example/example").unwrap();
        assert_eq!(kept.chat_lines, vec!["mine"]);
        assert_eq!(loader.message_names().len(), EXAMPLES.len());
    }

    #[test]
    fn test_bundled_examples_parse() {
        for (file_name, content) in EXAMPLES {
            let msg = Message::from_json(*file_name, content)
                .unwrap_or_else(|e| panic!("{file_name}: {e}"));
            assert!(msg.has_payload(), "{file_name} is empty");
        }
    }
}
