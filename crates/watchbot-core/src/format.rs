//! User-facing reply texts. All texts use Telegram's legacy Markdown, so
//! anything coming from users or the catalog is escaped before it is embedded.

use std::fmt::Write;
use watchbot_models::{CatalogItem, MediaKind, WatchedEntry};

pub const OVERVIEW_LIMIT: usize = 100;

pub const HELP: &str = "Welcome to Watchbot!\n\
Commands:\n\
/add <title> - Record a movie or show you watched\n\
/list - Show your watched list\n\
/search <title> - Find a movie or show\n\
/top - Top 20 movies and shows this week\n\
/update <title> <episode> - Update the episode number of a show";

pub const UNKNOWN_COMMAND: &str = "Unknown command. Use /add, /list, /search, /top or /update";
pub const ADD_USAGE: &str = "Specify a movie or show title: /add <title>";
pub const SEARCH_USAGE: &str = "Specify a search query: /search <title>";
pub const UPDATE_USAGE: &str = "Specify the show title and episode number: /update <title> <episode>";
pub const UPDATE_INVALID_EPISODE: &str = "Specify a valid episode number (a whole number, e.g. 5)";
pub const INVALID_EPISODE: &str = "That is not a valid episode number.";

pub const SAVE_FAILED: &str = "Could not save to the database";
pub const LIST_FAILED: &str = "Could not load your watched list";
pub const UPDATE_FAILED: &str = "Could not update the episode number";
pub const LIST_EMPTY: &str = "Your watched list is empty";
pub const NOT_A_SHOW: &str = "This is not a show. Use /update only for shows";

pub const TOP_MOVIES_FAILED: &str = "Could not fetch the top movies";
pub const TOP_SHOWS_FAILED: &str = "Could not fetch the top shows";
pub const TOP_EMPTY: &str = "No top movies or shows found";

fn is_markdown_special(c: char) -> bool {
    matches!(c, '_' | '*' | '`' | '[')
}

/// Escape the characters legacy Markdown treats as entity delimiters.
/// Only valid outside entities; use [`bold`] for emphasised text.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if is_markdown_special(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Render `text` in bold. Escapes are not allowed inside an entity, so the
/// entity is closed before each special character and reopened after it:
/// `S_H` becomes `*S*\_*H*`.
pub fn bold(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut run = String::new();
    for c in text.chars() {
        if is_markdown_special(c) {
            push_bold_run(&mut out, &mut run);
            out.push('\\');
            out.push(c);
        } else {
            run.push(c);
        }
    }
    push_bold_run(&mut out, &mut run);
    out
}

fn push_bold_run(out: &mut String, run: &mut String) {
    if !run.is_empty() {
        out.push('*');
        out.push_str(run);
        out.push('*');
        run.clear();
    }
}

/// Cut `text` to `limit` characters, appending "..." when anything was dropped.
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

pub fn nothing_found(query: &str) -> String {
    format!("Nothing found for: {}", escape_markdown(query))
}

pub fn episode_prompt(title: &str) -> String {
    format!(
        "You are adding the show {}. Reply with the number of the last episode you watched (e.g. 5):",
        bold(title)
    )
}

/// Re-issued after an unparseable episode answer; ends with the same prompt.
pub fn invalid_episode(title: &str) -> String {
    format!("{}\n{}", INVALID_EPISODE, episode_prompt(title))
}

pub fn added_movie(title: &str) -> String {
    format!("Added {} (movie) to your watched list!", bold(title))
}

pub fn added_show(title: &str, episode: u32) -> String {
    format!(
        "Added {} (show, episode {}) to your watched list!",
        bold(title),
        episode
    )
}

pub fn episode_updated(title: &str, episode: u32) -> String {
    format!("Updated: {} (show, episode {})", bold(title), episode)
}

pub fn not_in_list(title: &str) -> String {
    format!("{} was not found in your watched list", bold(title))
}

/// Numbered history, newest first. Callers handle the empty case.
pub fn watched_list(entries: &[WatchedEntry]) -> String {
    let mut out = String::from("Your watched list:\n");
    for (i, entry) in entries.iter().enumerate() {
        let date = entry.watched_at.format("%Y-%m-%d");
        let title = bold(&entry.title);
        let _ = match entry.kind {
            MediaKind::Show => writeln!(
                out,
                "{}. {} (show, episode {}) - watched {}",
                i + 1,
                title,
                entry.current_episode,
                date
            ),
            MediaKind::Movie => writeln!(out, "{}. {} (movie) - watched {}", i + 1, title, date),
        };
    }
    out
}

/// One line describing a catalog result, used for both /search and /top.
pub fn catalog_caption(rank: usize, item: &CatalogItem) -> String {
    let details = if item.date.is_empty() {
        item.kind.to_string()
    } else {
        format!("{}, {}", item.kind, item.date)
    };

    format!(
        "{}. {} ({}) - {}",
        rank,
        bold(&item.title),
        details,
        escape_markdown(&truncate(&item.overview, OVERVIEW_LIMIT))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 100), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("abc", 3), "abc");
        // Multi-byte characters are never split
        assert_eq!(truncate("Пример текста", 6), "Пример...");
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("a_b*c"), "a\\_b\\*c");
        assert_eq!(escape_markdown("[REC]"), "\\[REC]");
        assert_eq!(escape_markdown("Plain"), "Plain");
    }

    #[test]
    fn test_bold_keeps_escapes_outside_entities() {
        assert_eq!(bold("Inception"), "*Inception*");
        assert_eq!(bold("S_H_I_E_L_D"), "*S*\\_*H*\\_*I*\\_*E*\\_*L*\\_*D*");
        assert_eq!(bold("[REC]"), "\\[*REC]*");
        assert_eq!(bold("*batteries* not included"), "\\**batteries*\\** not included*");
        assert_eq!(bold(""), "");
    }

    #[test]
    fn test_titles_with_markup_characters() {
        assert_eq!(
            added_movie("Marvel's Agents of S_H"),
            "Added *Marvel's Agents of S*\\_*H* (movie) to your watched list!"
        );
        assert_eq!(not_in_list("[REC]"), "\\[*REC]* was not found in your watched list");
    }

    #[test]
    fn test_watched_list() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 21, 0, 0).unwrap();
        let entries = vec![
            WatchedEntry {
                id: 2,
                title: "Breaking Bad".to_string(),
                kind: MediaKind::Show,
                catalog_id: 1396,
                user_id: 1,
                watched_at: at,
                current_episode: 7,
            },
            WatchedEntry {
                id: 1,
                title: "Inception".to_string(),
                kind: MediaKind::Movie,
                catalog_id: 27205,
                user_id: 1,
                watched_at: at,
                current_episode: 0,
            },
        ];

        let text = watched_list(&entries);
        assert_eq!(
            text,
            "Your watched list:\n\
             1. *Breaking Bad* (show, episode 7) - watched 2024-03-09\n\
             2. *Inception* (movie) - watched 2024-03-09\n"
        );
    }

    #[test]
    fn test_catalog_caption() {
        let mut item = CatalogItem {
            id: 27205,
            title: "Inception".to_string(),
            kind: MediaKind::Movie,
            date: "2010-07-15".to_string(),
            overview: "x".repeat(150),
            poster_path: None,
            popularity: 1.0,
        };
        let caption = catalog_caption(1, &item);
        assert!(caption.starts_with("1. *Inception* (movie, 2010-07-15) - "));
        assert!(caption.ends_with(&format!("{}...", "x".repeat(100))));

        item.date.clear();
        item.overview = "Dreams.".to_string();
        assert_eq!(catalog_caption(3, &item), "3. *Inception* (movie) - Dreams.");
    }

    #[test]
    fn test_invalid_episode_repeats_prompt() {
        let text = invalid_episode("Dark");
        assert!(text.ends_with(&episode_prompt("Dark")));
    }
}
