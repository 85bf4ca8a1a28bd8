use blackjack_table::msg::ExecuteMsg;

/// One line typed at the `play` prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Execute(ExecuteMsg),
    Status,
    Help,
    Quit,
}

pub const HELP: &str =
    "commands: deal <bet> | hit | stand | borrow <amount> | repay [amount] | status | quit";

/// Parse a prompt line. Amounts must be whole chip counts; anything else is
/// refused here so the table never sees it.
pub fn parse_line(line: &str) -> Result<ReplCommand, String> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(ReplCommand::Help);
    };
    let arg = words.next();
    if words.next().is_some() {
        return Err(format!("Too many arguments for '{word}'"));
    }

    let name = word.to_ascii_lowercase();
    let command = match (name.as_str(), arg) {
        ("deal" | "bet", Some(bet)) => ReplCommand::Execute(ExecuteMsg::StartRound {
            bet: parse_chips(bet)?,
        }),
        ("deal" | "bet", None) => return Err("Usage: deal <bet>".to_string()),
        ("hit" | "h", None) => ReplCommand::Execute(ExecuteMsg::Hit {}),
        ("stand" | "s", None) => ReplCommand::Execute(ExecuteMsg::Stand {}),
        ("borrow", Some(amount)) => ReplCommand::Execute(ExecuteMsg::Borrow {
            amount: parse_chips(amount)?,
        }),
        ("borrow", None) => return Err("Usage: borrow <amount>".to_string()),
        ("repay", amount) => ReplCommand::Execute(ExecuteMsg::Repay {
            amount: amount.map(parse_chips).transpose()?,
        }),
        ("status", None) => ReplCommand::Status,
        ("help" | "?", None) => ReplCommand::Help,
        ("quit" | "exit" | "q", None) => ReplCommand::Quit,
        (name, Some(_)) if takes_no_arguments(name) => {
            return Err(format!("'{name}' takes no arguments"))
        }
        _ => return Err(format!("Unknown command '{word}'. {HELP}")),
    };
    Ok(command)
}

fn takes_no_arguments(name: &str) -> bool {
    matches!(name, "hit" | "h" | "stand" | "s" | "status" | "help" | "?" | "quit" | "exit" | "q")
}

fn parse_chips(raw: &str) -> Result<u64, String> {
    raw.parse::<u64>()
        .map_err(|_| format!("'{raw}' is not a whole number of chips"))
}
