// Console command grammar: a tokenizer plus a static command table.
//
// Each command declares its argument schema here once; parsing, syntax
// errors, and the /help view are all derived from the same table.

// ─── Tokens ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Whitespace-delimited bare word.
    Word(String),
    /// Double-quoted string, quotes stripped.
    Quoted(String),
    /// Word with a leading `-`; the dash is stripped.
    Flag(String),
}

impl Token {
    fn text(&self) -> &str {
        match self {
            Token::Word(s) | Token::Quoted(s) | Token::Flag(s) => s,
        }
    }
}

/// Split one input line into tokens. An unterminated quote runs to the end
/// of the line.
pub fn tokenize(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '"' {
            chars.next();
            let mut buf = String::new();
            for ch in chars.by_ref() {
                if ch == '"' {
                    break;
                }
                buf.push(ch);
            }
            tokens.push(Token::Quoted(buf));
            continue;
        }

        let mut buf = String::new();
        while let Some(&ch) = chars.peek() {
            if ch.is_whitespace() {
                break;
            }
            buf.push(ch);
            chars.next();
        }
        match buf.strip_prefix('-') {
            Some(body) => tokens.push(Token::Flag(body.to_string())),
            None => tokens.push(Token::Word(buf)),
        }
    }

    tokens
}

// ─── Command table ────────────────────────────────────────────────────────────

/// Argument shape of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// No arguments.
    Bare,
    /// Everything after the command word, surrounding quotes stripped.
    Trailing,
    /// `"<url>" -<group>`.
    UrlGroup,
    /// `"<url>" -u|-g|-t <value>`.
    UrlEditFlag,
}

pub struct CommandSpec {
    /// Lowercase command word including the slash.
    pub name: &'static str,
    /// Usage fragment for syntax errors and /help.
    pub usage: &'static str,
    /// One-line /help summary.
    pub summary: &'static str,
    pub schema: Schema,
}

pub const EDIT_USAGE: &str =
    r#"/edit "url.com" -u "new.com", /edit "url.com" -g group, or /edit "url.com" -t "Title""#;

/// Usage shown when the `-u` payload itself is not a URL.
pub const EDIT_URL_USAGE: &str = r#"/edit "url.com" -u "new.com""#;

/// The full console command surface, in /help order.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "/list",
        usage: "/list",
        summary: "Show all links in the terminal",
        schema: Schema::Bare,
    },
    CommandSpec {
        name: "/home",
        usage: "/home",
        summary: "Return to the landing terminal",
        schema: Schema::Bare,
    },
    CommandSpec {
        name: "/weather",
        usage: "/weather",
        summary: "Show next 12 hours and 5-day forecast",
        schema: Schema::Bare,
    },
    CommandSpec {
        name: "/background",
        usage: "/background",
        summary: "Cycle landing backgrounds",
        schema: Schema::Bare,
    },
    CommandSpec {
        name: "/username",
        usage: "/username name",
        summary: "Set prompt username: /username name",
        schema: Schema::Trailing,
    },
    CommandSpec {
        name: "/add",
        usage: r#"/add "url.com" -group"#,
        summary: r#"Add a link: /add "url.com" -group"#,
        schema: Schema::UrlGroup,
    },
    CommandSpec {
        name: "/remove",
        usage: r#"/remove "url.com" -group"#,
        summary: r#"Remove a link: /remove "url.com" -group"#,
        schema: Schema::UrlGroup,
    },
    CommandSpec {
        name: "/edit",
        usage: EDIT_USAGE,
        summary: r#"Edit a link: /edit "url.com" -u "new.com", /edit "url.com" -g group, or /edit "url.com" -t "Title""#,
        schema: Schema::UrlEditFlag,
    },
    CommandSpec {
        name: "/help",
        usage: "/help",
        summary: "Show this command list",
        schema: Schema::Bare,
    },
];

fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}

// ─── Parsed commands ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode {
    Url,
    Group,
    Title,
}

/// A fully parsed console command. URL arguments are raw — normalization
/// happens in the interpreter so that the error message can name the
/// offending command's usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Home,
    Help,
    Background,
    Weather,
    Username { name: String },
    Add { url: String, group: String },
    Remove { url: String, group: String },
    Edit { target: String, mode: EditMode, payload: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input started with `/` but matched no command name.
    UnknownCommand,
    /// Known command, malformed arguments. Carries the usage fragment.
    BadArgs { name: &'static str, usage: &'static str },
}

impl ParseError {
    /// The user-visible error line.
    pub fn message(&self) -> String {
        match self {
            ParseError::UnknownCommand => {
                "Command not found. Use /help for the list of available commands.".to_string()
            }
            ParseError::BadArgs { name, usage } => {
                format!("Invalid {name} syntax. Usage: {usage}")
            }
        }
    }
}

/// Parse a line that starts with `/`. Command names match
/// case-insensitively; argument parsing follows the command's schema.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let trimmed = line.trim();
    let mut tokens = tokenize(trimmed).into_iter();

    let name = match tokens.next() {
        Some(Token::Word(word)) => word.to_lowercase(),
        _ => return Err(ParseError::UnknownCommand),
    };
    let Some(spec) = lookup(&name) else {
        return Err(ParseError::UnknownCommand);
    };
    let rest: Vec<Token> = tokens.collect();

    let bad = || ParseError::BadArgs {
        name: spec.name,
        usage: spec.usage,
    };

    match spec.schema {
        Schema::Bare => {
            if !rest.is_empty() {
                return Err(bad());
            }
            Ok(match spec.name {
                "/list" => Command::List,
                "/home" => Command::Home,
                "/help" => Command::Help,
                "/background" => Command::Background,
                _ => Command::Weather,
            })
        }
        Schema::Trailing => {
            let name = strip_outer_quotes(&join(&rest));
            if name.is_empty() {
                return Err(bad());
            }
            Ok(Command::Username { name })
        }
        Schema::UrlGroup => {
            let (url, group) = parse_url_group(&rest).ok_or_else(bad)?;
            Ok(match spec.name {
                "/add" => Command::Add { url, group },
                _ => Command::Remove { url, group },
            })
        }
        Schema::UrlEditFlag => {
            let (target, mode, payload) = parse_edit(&rest).ok_or_else(bad)?;
            Ok(Command::Edit { target, mode, payload })
        }
    }
}

fn parse_url_group(rest: &[Token]) -> Option<(String, String)> {
    let mut it = rest.iter();
    let Token::Quoted(url) = it.next()? else {
        return None;
    };
    let Token::Flag(flag) = it.next()? else {
        return None;
    };

    let mut parts: Vec<&str> = Vec::new();
    if !flag.is_empty() {
        parts.push(flag.as_str());
    }
    parts.extend(it.map(Token::text));

    let url = url.trim().to_string();
    let group = parts.join(" ").trim().to_string();
    if url.is_empty() || group.is_empty() {
        return None;
    }
    Some((url, group))
}

fn parse_edit(rest: &[Token]) -> Option<(String, EditMode, String)> {
    let mut it = rest.iter();
    let Token::Quoted(target) = it.next()? else {
        return None;
    };
    let Token::Flag(flag) = it.next()? else {
        return None;
    };

    let mode = match flag.to_lowercase().as_str() {
        "u" => EditMode::Url,
        "g" => EditMode::Group,
        "t" => EditMode::Title,
        _ => return None,
    };

    let payload = strip_outer_quotes(&join(&it.cloned().collect::<Vec<_>>()));
    let target = target.trim().to_string();
    if target.is_empty() || payload.is_empty() {
        return None;
    }
    Some((target, mode, payload))
}

fn join(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::text)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

fn strip_outer_quotes(value: &str) -> String {
    let trimmed = value.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return trimmed[1..trimmed.len() - 1].trim().to_string();
        }
    }
    trimmed.to_string()
}

// ─── Tests ────────────────────────────────────────────────────────────────────
