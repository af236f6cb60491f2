use crate::output::{Output, OutputFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use serde_json::json;
use std::path::{Path, PathBuf};
use watchbot_config::{Config, PathManager};
use watchbot_models::{MediaKind, WatchedEntry};
use watchbot_store::Database;

/// Print one user's watched list straight from the database, newest first.
pub fn show_history(config_path: &Path, user_id: i64, output: &Output) -> Result<()> {
    let db_path = resolve_database(config_path);
    if !db_path.exists() {
        output.warn(format!("No database found at {}", db_path.display()));
        return Ok(());
    }

    let store = Database::open(&db_path).map_err(|e| eyre!("{:#}", e))?;
    let entries = store
        .list_by_user(user_id)
        .map_err(|e| eyre!("Failed to read history for user {}: {}", user_id, e))?;

    render(&entries, user_id, output);
    Ok(())
}

// History only needs the database location, so a missing or incomplete config is fine
fn resolve_database(config_path: &Path) -> PathBuf {
    let paths = PathManager::default();
    match Config::load_from_file(config_path) {
        Ok(config) => config.database_path(&paths),
        Err(_) => paths.database_file(),
    }
}

fn render(entries: &[WatchedEntry], user_id: i64, output: &Output) {
    match output.format() {
        OutputFormat::Human => {
            if entries.is_empty() {
                output.info(format!("No watched entries for user {}", user_id));
                return;
            }
            if output.is_quiet() {
                return;
            }
            println!("{}", history_table(entries));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "user_id": user_id,
                "entries": entries,
            }));
        }
    }
}

fn history_table(entries: &[WatchedEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("#").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Title").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Type").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Episode").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("TMDB id").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Watched").add_attribute(comfy_table::Attribute::Bold),
    ]);

    for (i, entry) in entries.iter().enumerate() {
        let episode = match entry.kind {
            MediaKind::Show => entry.current_episode.to_string(),
            MediaKind::Movie => "-".to_string(),
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&entry.title),
            Cell::new(entry.kind),
            Cell::new(episode),
            Cell::new(entry.catalog_id),
            Cell::new(entry.watched_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchbot_models::NewWatchedEntry;

    #[test]
    fn test_database_path_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        let db_path = dir.path().join("custom.db");

        let mut config = Config::new("123:abc".to_string(), "key".to_string());
        config.storage.database = Some(db_path.clone());
        config.save_to_file(&config_path).unwrap();

        assert_eq!(resolve_database(&config_path), db_path);
    }

    #[test]
    fn test_table_lists_entries() {
        let store = Database::open_in_memory().unwrap();
        store
            .record(&NewWatchedEntry::show(1, 1396, "Breaking Bad".to_string(), 7))
            .unwrap();
        store
            .record(&NewWatchedEntry::movie(1, 27205, "Inception".to_string()))
            .unwrap();

        let entries = store.list_by_user(1).unwrap();
        let rendered = history_table(&entries).to_string();
        assert!(rendered.contains("Breaking Bad"));
        assert!(rendered.contains("Inception"));
        assert!(rendered.contains("1396"));
    }

    #[test]
    fn test_missing_database_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        let mut config = Config::new("123:abc".to_string(), "key".to_string());
        config.storage.database = Some(dir.path().join("absent.db"));
        config.save_to_file(&config_path).unwrap();

        show_history(&config_path, 1, &Output::new(OutputFormat::Human, true)).unwrap();
        assert!(!dir.path().join("absent.db").exists());
    }
}
