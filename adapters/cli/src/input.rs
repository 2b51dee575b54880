//! Line-based player input.

/// Player intent parsed from one input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    /// Deal a fresh round, from the landing screen or mid-game.
    Start,
    /// Show the how-to-play screen.
    Manual,
    /// Show the study bank.
    Bank,
    /// Leave the current screen.
    Back,
    /// Dismiss the decoded diagnosis card.
    Confirm,
    /// Toggle the listed tiles, numbered from one.
    Toggle(Vec<usize>),
    /// Submit the current selection.
    Submit,
    /// Empty the selection.
    Clear,
    /// Abandon the round and return to the landing screen.
    Abort,
    /// Leave the game.
    Quit,
}

/// Reasons an input line could not be understood.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum InputError {
    /// The word is not a known command.
    #[error("unknown command `{0}`; type `how` for the manual")]
    UnknownCommand(String),
    /// Tile zero was requested.
    #[error("tiles are numbered from 1")]
    ZeroTile,
    /// Tile numbers were mixed with other words.
    #[error("`{0}` is not a tile number")]
    NotATile(String),
}

/// Parses a line into an action. Blank lines yield `None`.
pub(crate) fn parse(line: &str) -> Result<Option<Action>, InputError> {
    let mut tokens = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .peekable();
    let Some(first) = tokens.peek().copied() else {
        return Ok(None);
    };

    if first.starts_with(|c: char| c.is_ascii_digit()) {
        let tiles = tokens.map(parse_tile).collect::<Result<Vec<_>, _>>()?;
        return Ok(Some(Action::Toggle(tiles)));
    }

    let action = match first.to_ascii_lowercase().as_str() {
        "start" | "play" | "restart" => Action::Start,
        "how" | "manual" | "help" | "?" => Action::Manual,
        "bank" | "study" => Action::Bank,
        "back" => Action::Back,
        "ok" | "confirm" => Action::Confirm,
        "go" | "submit" | "sequence" => Action::Submit,
        "clear" => Action::Clear,
        "abort" => Action::Abort,
        "quit" | "exit" | "q" => Action::Quit,
        _ => return Err(InputError::UnknownCommand(first.to_owned())),
    };
    Ok(Some(action))
}

fn parse_tile(token: &str) -> Result<usize, InputError> {
    match token.parse::<usize>() {
        Ok(0) => Err(InputError::ZeroTile),
        Ok(number) => Ok(number),
        Err(_) => Err(InputError::NotATile(token.to_owned())),
    }
}
