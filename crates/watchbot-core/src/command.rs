/// A chat command, recognised by its leading keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start` or `/help`
    Start,
    /// `/add <query>`; the query may be empty
    Add(String),
    /// `/list`
    List,
    /// `/search <query>`; the query may be empty
    Search(String),
    /// `/top`
    Top,
    /// `/update <title> <episode>`, arguments unparsed
    Update(String),
    /// Anything else, including free text
    Unknown(String),
}

impl Command {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let (keyword, rest) = match text.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (text, ""),
        };

        // In group chats Telegram appends the bot name: /add@watchbot
        let keyword = keyword.split('@').next().unwrap_or(keyword);

        match keyword {
            "/start" | "/help" => Command::Start,
            "/add" => Command::Add(rest.to_string()),
            "/list" => Command::List,
            "/search" => Command::Search(rest.to_string()),
            "/top" => Command::Top,
            "/update" => Command::Update(rest.to_string()),
            _ => Command::Unknown(text.to_string()),
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Add(_) => "add",
            Command::List => "list",
            Command::Search(_) => "search",
            Command::Top => "top",
            Command::Update(_) => "update",
            Command::Unknown(_) => "unknown",
        }
    }
}

/// Parse a non-negative episode number. Surrounding whitespace is ignored.
pub fn parse_episode(text: &str) -> Option<u32> {
    text.trim().parse::<u32>().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageError {
    MissingArguments,
    InvalidEpisode,
}

/// Arguments of `/update`: everything before the last token is the title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub title: String,
    pub episode: u32,
}

impl UpdateRequest {
    pub fn parse(args: &str) -> Result<Self, UsageError> {
        let parts: Vec<&str> = args.split_whitespace().collect();
        let Some((last, title_parts)) = parts.split_last() else {
            return Err(UsageError::MissingArguments);
        };
        if title_parts.is_empty() {
            return Err(UsageError::MissingArguments);
        }

        let episode = parse_episode(last).ok_or(UsageError::InvalidEpisode)?;
        Ok(Self {
            title: title_parts.join(" "),
            episode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        assert_eq!(Command::parse("/start"), Command::Start);
        assert_eq!(Command::parse("/help"), Command::Start);
        assert_eq!(Command::parse("/list"), Command::List);
        assert_eq!(Command::parse("/top"), Command::Top);
        assert_eq!(Command::parse("/add Inception"), Command::Add("Inception".to_string()));
        assert_eq!(
            Command::parse("/search  The Office  "),
            Command::Search("The Office".to_string())
        );
        assert_eq!(
            Command::parse("/update Breaking Bad 7"),
            Command::Update("Breaking Bad 7".to_string())
        );
    }

    #[test]
    fn test_parse_empty_arguments() {
        assert_eq!(Command::parse("/add"), Command::Add(String::new()));
        assert_eq!(Command::parse("/search   "), Command::Search(String::new()));
    }

    #[test]
    fn test_parse_strips_bot_mention() {
        assert_eq!(Command::parse("/add@watchbot Dune"), Command::Add("Dune".to_string()));
        assert_eq!(Command::parse("/top@watchbot"), Command::Top);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Command::parse("hello"), Command::Unknown("hello".to_string()));
        assert_eq!(Command::parse("/addInception"), Command::Unknown("/addInception".to_string()));
        assert_eq!(Command::parse("/list all"), Command::List);
        assert_eq!(Command::parse(""), Command::Unknown(String::new()));
    }

    #[test]
    fn test_parse_episode() {
        assert_eq!(parse_episode("5"), Some(5));
        assert_eq!(parse_episode(" 12 "), Some(12));
        assert_eq!(parse_episode("0"), Some(0));
        assert_eq!(parse_episode("-1"), None);
        assert_eq!(parse_episode("abc"), None);
        assert_eq!(parse_episode("5.5"), None);
        assert_eq!(parse_episode(""), None);
    }

    #[test]
    fn test_update_request() {
        assert_eq!(
            UpdateRequest::parse("Breaking Bad 7"),
            Ok(UpdateRequest {
                title: "Breaking Bad".to_string(),
                episode: 7
            })
        );
        assert_eq!(
            UpdateRequest::parse("  Dark   3 "),
            Ok(UpdateRequest {
                title: "Dark".to_string(),
                episode: 3
            })
        );
    }

    #[test]
    fn test_update_request_errors() {
        assert_eq!(UpdateRequest::parse(""), Err(UsageError::MissingArguments));
        assert_eq!(UpdateRequest::parse("7"), Err(UsageError::MissingArguments));
        assert_eq!(UpdateRequest::parse("Dark seven"), Err(UsageError::InvalidEpisode));
        assert_eq!(UpdateRequest::parse("Dark -2"), Err(UsageError::InvalidEpisode));
    }
}
