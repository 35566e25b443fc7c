//! Shortcut commands: named prompts the client can run against the chat or
//! image gateway. Persisted as a single JSON file under the data directory —
//! the whole list is small and rewritten atomically enough for one process.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod handlers;

const STORE_FILE: &str = "shortcuts.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortcutMode {
    Chat,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortcutCommand {
    pub id: Uuid,
    pub name: String,
    pub prompt: String,
    pub mode: ShortcutMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

pub struct ShortcutStore {
    path: PathBuf,
    commands: Mutex<Vec<ShortcutCommand>>,
}

impl ShortcutStore {
    /// Loads the store from `data_dir`. A missing file is an empty store; a
    /// file that exists but cannot be read or parsed is an error.
    pub fn load(data_dir: &std::path::Path) -> Result<Self> {
        let path = data_dir.join(STORE_FILE);
        let commands = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            Vec::new()
        };
        Ok(Self {
            path,
            commands: Mutex::new(commands),
        })
    }

    pub fn list(&self) -> Vec<ShortcutCommand> {
        self.commands
            .lock()
            .expect("shortcut store lock poisoned")
            .clone()
    }

    /// Replaces the command with the same id, or appends it.
    pub fn upsert(&self, command: ShortcutCommand) -> Result<ShortcutCommand> {
        let mut commands = self.commands.lock().expect("shortcut store lock poisoned");
        match commands.iter_mut().find(|c| c.id == command.id) {
            Some(existing) => *existing = command.clone(),
            None => commands.push(command.clone()),
        }
        self.persist(&commands)?;
        Ok(command)
    }

    /// Removes the command with `id`, returning whether it existed.
    pub fn remove(&self, id: Uuid) -> Result<bool> {
        let mut commands = self.commands.lock().expect("shortcut store lock poisoned");
        let before = commands.len();
        commands.retain(|c| c.id != id);
        if commands.len() == before {
            return Ok(false);
        }
        self.persist(&commands)?;
        Ok(true)
    }

    fn persist(&self, commands: &[ShortcutCommand]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(commands)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_command(name: &str) -> ShortcutCommand {
        ShortcutCommand {
            id: Uuid::new_v4(),
            name: name.to_string(),
            prompt: "润色这段文字".to_string(),
            mode: ShortcutMode::Chat,
            model: None,
        }
    }

    #[test]
    fn test_load_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = ShortcutStore::load(dir.path()).unwrap();
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_upsert_persists_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = ShortcutStore::load(dir.path()).unwrap();
        let command = store.upsert(make_command("润色")).unwrap();

        let reloaded = ShortcutStore::load(dir.path()).unwrap();
        assert_eq!(reloaded.list(), vec![command]);
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = ShortcutStore::load(dir.path()).unwrap();
        let mut command = store.upsert(make_command("润色")).unwrap();
        command.name = "精修".to_string();
        store.upsert(command.clone()).unwrap();

        let commands = store.list();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].name, "精修");
    }

    #[test]
    fn test_remove_reports_whether_command_existed() {
        let dir = tempfile::tempdir().unwrap();
        let store = ShortcutStore::load(dir.path()).unwrap();
        let command = store.upsert(make_command("润色")).unwrap();

        assert!(store.remove(command.id).unwrap());
        assert!(!store.remove(command.id).unwrap());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_load_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(STORE_FILE), "not json").unwrap();
        assert!(ShortcutStore::load(dir.path()).is_err());
    }
}
