//! Line commands of the text console.

use ap_core::navigation::View;

/// One parsed input line. Indexes are 1-based positions in the current
/// screen listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Navigate(View),
    /// Index into the visible post listing, or a raw post id.
    Open(PostRef),
    Back,
    /// `None` selects every category.
    Filter(Option<String>),
    TodoAdd(String),
    TodoToggle(usize),
    TodoRemove(usize),
    /// Open the panel, and search when a query is given.
    Research(Option<String>),
    /// Switch to the history tab, or show entry `n`.
    History(Option<usize>),
    Chart(String),
    Close,
    Topic(String),
    Ideas,
    Idea(usize),
    Title(String),
    Category(String),
    ImageUrl(String),
    Write,
    Image,
    Save,
    Cancel,
    Json,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostRef {
    Index(usize),
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (type `help`)")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("`{0}` is not a valid position")]
    BadIndex(String),

    #[error("unknown todo action `{0}` (add, toggle, rm)")]
    UnknownTodoAction(String),
}

pub const HELP: &str = "\
views:    dashboard | posts | todos | new | back
posts:    open <n|id> | filter [category|all]
todos:    todo add <text> | todo toggle <n> | todo rm <n>
create:   topic <text> | ideas | idea <n> | title <text> | category <text>
          image-url <url> | write | image | save | cancel
research: research [query] | history [n] | close
market:   chart <coin-id> | close
other:    json | help | quit";

impl Command {
    /// Commands that wait on the network or the store.
    pub fn is_async(&self) -> bool {
        matches!(
            self,
            Command::TodoAdd(_)
                | Command::TodoToggle(_)
                | Command::TodoRemove(_)
                | Command::Research(Some(_))
                | Command::Chart(_)
                | Command::Ideas
                | Command::Write
                | Command::Image
                | Command::Save
        )
    }
}

fn required(rest: &str, name: &'static str) -> Result<String, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(name))
    } else {
        Ok(rest.to_string())
    }
}

fn optional(rest: &str) -> Option<String> {
    (!rest.is_empty()).then(|| rest.to_string())
}

fn index(rest: &str, name: &'static str) -> Result<usize, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument(name));
    }
    match rest.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::BadIndex(rest.to_string())),
    }
}

/// Parse one line. Blank input yields `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "dashboard" | "home" => Command::Navigate(View::Dashboard),
        "posts" => Command::Navigate(View::Posts),
        "todos" => Command::Navigate(View::TodoList),
        "new" => Command::Navigate(View::CreatePost),
        "open" => {
            let target = required(rest, "open")?;
            match target.parse::<usize>() {
                Ok(0) => return Err(CommandError::BadIndex(target)),
                Ok(n) => Command::Open(PostRef::Index(n)),
                Err(_) => Command::Open(PostRef::Id(target)),
            }
        }
        "back" => Command::Back,
        "filter" => match optional(rest) {
            Some(name) if name.eq_ignore_ascii_case("all") => Command::Filter(None),
            other => Command::Filter(other),
        },
        "todo" => {
            let (action, arg) = match rest.split_once(char::is_whitespace) {
                Some((action, arg)) => (action, arg.trim()),
                None => (rest, ""),
            };
            match action {
                "add" => Command::TodoAdd(required(arg, "todo add")?),
                "toggle" => Command::TodoToggle(index(arg, "todo toggle")?),
                "rm" | "remove" | "delete" => Command::TodoRemove(index(arg, "todo rm")?),
                "" => return Err(CommandError::MissingArgument("todo")),
                other => return Err(CommandError::UnknownTodoAction(other.to_string())),
            }
        }
        "research" => Command::Research(optional(rest)),
        "history" => Command::History(if rest.is_empty() {
            None
        } else {
            Some(index(rest, "history")?)
        }),
        "chart" => Command::Chart(required(rest, "chart")?.to_ascii_lowercase()),
        "close" => Command::Close,
        "topic" => Command::Topic(rest.to_string()),
        "ideas" => Command::Ideas,
        "idea" => Command::Idea(index(rest, "idea")?),
        "title" => Command::Title(rest.to_string()),
        "category" => Command::Category(rest.to_string()),
        "image-url" => Command::ImageUrl(rest.to_string()),
        "write" => Command::Write,
        "image" => Command::Image,
        "save" => Command::Save,
        "cancel" => Command::Cancel,
        "json" => Command::Json,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}
