//! Parsing of the interactive `run` commands and duration arguments.

/// One line typed into a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Reset,
    Set { work_secs: u64, break_secs: u64 },
    Default,
    Status,
    Clock,
    Lofi(LofiAction),
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LofiAction {
    Play,
    Pause,
    Resume,
    Restart,
}

pub const HELP: &str = "\
commands:
  start                 start or continue the countdown
  pause                 pause the countdown
  reset                 rewind the current phase
  set <work> <break>    new durations (25, 25m, 90s, 1h), back to work
  default               25 minute work / 5 minute break
  status                show the current phase
  clock                 show the wall clock
  lofi play|pause|resume|restart
  help                  this text
  quit                  leave";

/// Parse one input line. Blank lines parse to `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("start" | "s", []) => Command::Start,
        ("pause" | "p", []) => Command::Pause,
        ("reset" | "r", []) => Command::Reset,
        ("set", [work, brk]) => Command::Set {
            work_secs: parse_duration(work)?,
            break_secs: parse_duration(brk)?,
        },
        ("set", _) => return Err("usage: set <work> <break>".to_string()),
        ("default", []) => Command::Default,
        ("status", []) => Command::Status,
        ("clock", []) => Command::Clock,
        ("lofi", [action]) => Command::Lofi(parse_lofi_action(action)?),
        ("lofi", _) => return Err("usage: lofi play|pause|resume|restart".to_string()),
        ("help" | "?", []) => Command::Help,
        ("quit" | "exit" | "q", []) => Command::Quit,
        (other, []) => return Err(format!("unknown command: {other} (try 'help')")),
        (other, _) => return Err(format!("'{other}' takes no arguments")),
    };
    Ok(Some(command))
}

fn parse_lofi_action(word: &str) -> Result<LofiAction, String> {
    match word.to_ascii_lowercase().as_str() {
        "play" => Ok(LofiAction::Play),
        "pause" => Ok(LofiAction::Pause),
        "resume" => Ok(LofiAction::Resume),
        "restart" => Ok(LofiAction::Restart),
        other => Err(format!("unknown lofi action: {other}")),
    }
}

/// Parse a whole-number duration into seconds.
///
/// A bare number is minutes, matching the custom-timer dialog; `s`, `m` and
/// `h` suffixes pick the unit explicitly. Range checks (zero, too long) are
/// left to the session controller.
pub fn parse_duration(input: &str) -> Result<u64, String> {
    let s = input.trim().to_ascii_lowercase();
    let (digits, unit) = match s.char_indices().last() {
        Some((i, 's')) => (&s[..i], 1),
        Some((i, 'm')) => (&s[..i], 60),
        Some((i, 'h')) => (&s[..i], 3600),
        _ => (s.as_str(), 60),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid duration '{input}': expected a whole number"));
    }
    let value: u64 = digits
        .parse()
        .map_err(|e| format!("invalid duration '{input}': {e}"))?;
    value
        .checked_mul(unit)
        .ok_or_else(|| format!("invalid duration '{input}': too large"))
}
