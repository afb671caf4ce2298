//! Line commands of the interactive session.

use reelscout_search::MediaKind;

/// One parsed line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Plain text: submit as a new query
    Search(String),
    /// `:page N`
    Page(u32),
    /// `:next`
    Next,
    /// `:prev`
    Prev,
    /// `:type movie|series|any`
    Kind(Option<MediaKind>),
    /// `:year N|any`
    Year(Option<u16>),
    /// `:show`
    Show,
    /// `:help`
    Help,
    /// `:quit`
    Quit,
}

pub const HELP: &str = "\
Type a title and press Enter to search.
  :page N              jump to page N
  :next / :prev        move one page
  :type movie|series|any
  :year YYYY|any
  :show                print the current results again
  :quit                leave";

/// Parses one input line.
pub fn parse_line(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();

    let Some(directive) = line.strip_prefix(':') else {
        return Ok(ReplCommand::Search(line.to_string()));
    };

    let mut parts = directive.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    match (name, arg) {
        ("page" | "p", Some(n)) => n
            .parse()
            .map(ReplCommand::Page)
            .map_err(|_| format!("Not a page number: {n}")),
        ("next" | "n", None) => Ok(ReplCommand::Next),
        ("prev" | "previous", None) => Ok(ReplCommand::Prev),
        ("type" | "t", Some("any")) => Ok(ReplCommand::Kind(None)),
        ("type" | "t", Some(kind)) => kind.parse().map(|k| ReplCommand::Kind(Some(k))),
        ("year" | "y", Some("any")) => Ok(ReplCommand::Year(None)),
        ("year" | "y", Some(year)) => year
            .parse()
            .map(|y| ReplCommand::Year(Some(y)))
            .map_err(|_| format!("Not a year: {year}")),
        ("show", None) => Ok(ReplCommand::Show),
        ("help" | "h", None) => Ok(ReplCommand::Help),
        ("quit" | "q" | "exit", None) => Ok(ReplCommand::Quit),
        _ => Err(format!("Unknown command ':{directive}'. Try :help")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_search() {
        assert_eq!(
            parse_line("  the matrix \n"),
            Ok(ReplCommand::Search("the matrix".to_string()))
        );
        assert_eq!(parse_line(""), Ok(ReplCommand::Search(String::new())));
    }

    #[test]
    fn test_directives() {
        assert_eq!(parse_line(":page 3"), Ok(ReplCommand::Page(3)));
        assert_eq!(parse_line(":next"), Ok(ReplCommand::Next));
        assert_eq!(parse_line(":prev"), Ok(ReplCommand::Prev));
        assert_eq!(
            parse_line(":type series"),
            Ok(ReplCommand::Kind(Some(MediaKind::Series)))
        );
        assert_eq!(parse_line(":type any"), Ok(ReplCommand::Kind(None)));
        assert_eq!(parse_line(":year 1999"), Ok(ReplCommand::Year(Some(1999))));
        assert_eq!(parse_line(":year any"), Ok(ReplCommand::Year(None)));
        assert_eq!(parse_line(":q"), Ok(ReplCommand::Quit));
    }

    #[test]
    fn test_bad_directives() {
        assert!(parse_line(":page two").is_err());
        assert!(parse_line(":type episode").is_err());
        assert!(parse_line(":year 19999999").is_err());
        assert!(parse_line(":dance").is_err());
    }
}
