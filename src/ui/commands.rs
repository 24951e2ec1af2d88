use thiserror::Error;

use crate::models::{FilterAction, FilterError, FilterField};

/// 终端输入命令
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// 修改一个筛选字段（对应输入控件的 onChange）
    Set { field: String, value: String },
    Action(FilterAction),
    Show,
    Query,
    Help,
    Quit,
    /// 空行
    Noop,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command: {0} (type `help` for the list of commands)")]
    Unknown(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

pub const HELP_TEXT: &str = "\
Commands:
  set <field> <value>   change a filter (fields: page, pageSize, title, genre, rating, year, director, actor)
  clear <field>         reset one filter to its default
  next | prev           move to the next / previous page
  reset                 reset all filters
  show                  render the page again
  query                 print the current query string
  help                  show this help
  quit | exit           leave";

/// 解析一行输入
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let (name, rest) = split_word(line.trim_start());

    let command = match name.to_ascii_lowercase().as_str() {
        "" => Command::Noop,
        "set" => {
            let (field, value) = split_word(rest.trim_start());
            if field.is_empty() {
                return Err(CommandError::MissingArgument("field"));
            }
            // 先校验字段名，值的校验交给 reducer
            let field: FilterField = field.parse()?;
            Command::Set {
                field: field.as_str().to_string(),
                value: value.trim().to_string(),
            }
        }
        "clear" => {
            let (field, _) = split_word(rest.trim_start());
            if field.is_empty() {
                return Err(CommandError::MissingArgument("field"));
            }
            Command::Action(FilterAction::Clear(field.parse()?))
        }
        "next" => Command::Action(FilterAction::NextPage),
        "prev" | "previous" => Command::Action(FilterAction::PrevPage),
        "reset" => Command::Action(FilterAction::Reset),
        "show" => Command::Show,
        "query" => Command::Query,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(command)
}

/// 读取输入时可以跳过的错误（单行内容无法解码），其余错误应当终止
pub fn is_recoverable_read_error(err: &std::io::Error) -> bool {
    err.kind() == std::io::ErrorKind::InvalidData
}

fn split_word(input: &str) -> (&str, &str) {
    match input.find(char::is_whitespace) {
        Some(idx) => (&input[..idx], &input[idx..]),
        None => (input, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_keeps_spaces_in_value() {
        assert_eq!(
            parse_command("set title  Star Wars ").unwrap(),
            Command::Set {
                field: "title".to_string(),
                value: "Star Wars".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_set_without_value_clears() {
        assert_eq!(
            parse_command("set director").unwrap(),
            Command::Set {
                field: "director".to_string(),
                value: String::new(),
            }
        );
    }

    #[test]
    fn test_parse_set_normalizes_field_name() {
        assert_eq!(
            parse_command("set page_size 25").unwrap(),
            Command::Set {
                field: "pageSize".to_string(),
                value: "25".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_command("set").unwrap_err(),
            CommandError::MissingArgument("field")
        );
        assert_eq!(
            parse_command("set studio x").unwrap_err(),
            CommandError::Filter(FilterError::UnknownField("studio".to_string()))
        );
        assert!(matches!(
            parse_command("sort title"),
            Err(CommandError::Unknown(_))
        ));
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("").unwrap(), Command::Noop);
        assert_eq!(
            parse_command("next").unwrap(),
            Command::Action(FilterAction::NextPage)
        );
        assert_eq!(
            parse_command("clear genre").unwrap(),
            Command::Action(FilterAction::Clear(FilterField::Genre))
        );
        assert_eq!(parse_command("RESET").unwrap(), Command::Action(FilterAction::Reset));
        assert_eq!(parse_command("exit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_invalid_utf8_line_is_recoverable() {
        let err = std::str::from_utf8(&[0x66, 0xff, 0x6f])
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            .unwrap_err();
        assert!(is_recoverable_read_error(&err));

        let closed = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdin closed");
        assert!(!is_recoverable_read_error(&closed));
    }

    #[tokio::test]
    async fn test_reader_continues_after_invalid_line() {
        use tokio::io::AsyncBufReadExt;

        let input: &[u8] = b"set title A\n\xff\xfe\nquit\n";
        let mut lines = tokio::io::BufReader::new(input).lines();

        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("set title A"));
        let err = lines.next_line().await.unwrap_err();
        assert!(is_recoverable_read_error(&err));
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("quit"));
    }
}
