use crate::error::FsError;

/// One parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mkdir(String),
    Cd(String),
    Ls(Option<String>),
    Pwd,
    Grep { pattern: String, path: String },
    Cat(String),
    Touch(String),
    Echo { content: String, path: String },
    Mv { source: String, destination: String },
    Cp { source: String, destination: String },
    Rm(String),
    Save(String),
    Load(String),
    Exit,
    /// Blank line.
    Noop,
}

impl Command {
    /// Parse a raw command line into a `Command`.
    ///
    /// The first word names the operation. Wrong argument counts are
    /// `InvalidArgument`, unknown operations are `InvalidCommand`.
    pub fn parse(line: &str) -> Result<Self, FsError> {
        let mut words = tokenize(line)?;
        if words.is_empty() {
            return Ok(Self::Noop);
        }
        let name = words.remove(0);
        let args = words;

        let command = match name.as_str() {
            "mkdir" => Self::Mkdir(one(&name, args)?),
            "cd" => Self::Cd(one(&name, args)?),
            "ls" => match <[String; 0]>::try_from(args) {
                Ok([]) => Self::Ls(None),
                Err(args) => Self::Ls(Some(one(&name, args)?)),
            },
            "pwd" => {
                none(&name, &args)?;
                Self::Pwd
            }
            "grep" => {
                let (pattern, path) = text_and_path(&name, args)?;
                Self::Grep { pattern, path }
            }
            "cat" => Self::Cat(one(&name, args)?),
            "touch" => Self::Touch(one(&name, args)?),
            "echo" => {
                let (content, path) = text_and_path(&name, args)?;
                Self::Echo { content, path }
            }
            "mv" => {
                let [source, destination] = two(&name, args)?;
                Self::Mv {
                    source,
                    destination,
                }
            }
            "cp" => {
                let [source, destination] = two(&name, args)?;
                Self::Cp {
                    source,
                    destination,
                }
            }
            "rm" => Self::Rm(one(&name, args)?),
            "save" => Self::Save(one(&name, args)?),
            "load" => Self::Load(one(&name, args)?),
            "exit" => {
                none(&name, &args)?;
                Self::Exit
            }
            _ => return Err(FsError::InvalidCommand(name)),
        };
        Ok(command)
    }
}

// ── Arity helpers ───────────────────────────────────────────────────────────

fn none(name: &str, args: &[String]) -> Result<(), FsError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(FsError::InvalidArgument(format!("{} takes no arguments", name)))
    }
}

fn one(name: &str, args: Vec<String>) -> Result<String, FsError> {
    let [arg] = <[String; 1]>::try_from(args).map_err(|_| {
        FsError::InvalidArgument(format!("{} expects exactly one path", name))
    })?;
    Ok(arg)
}

fn two(name: &str, args: Vec<String>) -> Result<[String; 2], FsError> {
    <[String; 2]>::try_from(args).map_err(|_| {
        FsError::InvalidArgument(format!("{} expects a source and a destination", name))
    })
}

/// The last word is the path; the words before it, joined by single spaces,
/// are the free text.
fn text_and_path(name: &str, mut args: Vec<String>) -> Result<(String, String), FsError> {
    if args.len() < 2 {
        return Err(FsError::InvalidArgument(format!(
            "{} expects text followed by a path",
            name
        )));
    }
    let path = args.pop().unwrap_or_default();
    Ok((args.join(" "), path))
}

// ── Tokenizer ───────────────────────────────────────────────────────────────

/// Split a line into words on whitespace. Single or double quotes group
/// characters (whitespace included) into one word and are stripped.
pub fn tokenize(line: &str) -> Result<Vec<String>, FsError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(FsError::InvalidArgument(format!("unterminated {} quote", q)));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<String> {
        tokenize(line).unwrap()
    }

    #[test]
    fn test_tokenize_plain_words() {
        assert_eq!(words("  mv  /a   /b "), vec!["mv", "/a", "/b"]);
        assert!(words("   ").is_empty());
    }

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(words(r#"echo "hello world" f"#), vec!["echo", "hello world", "f"]);
        assert_eq!(words("echo 'a \"b\"' f"), vec!["echo", "a \"b\"", "f"]);
        assert_eq!(words(r#"echo "" f"#), vec!["echo", "", "f"]);
        assert_eq!(words(r#"echo pre"fix" f"#), vec!["echo", "prefix", "f"]);
    }

    #[test]
    fn test_tokenize_unterminated_quote() {
        let err = tokenize(r#"echo "oops f"#).unwrap_err();
        assert!(matches!(err, FsError::InvalidArgument(_)));
    }

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(Command::parse("pwd").unwrap(), Command::Pwd);
        assert_eq!(Command::parse("exit").unwrap(), Command::Exit);
        assert_eq!(Command::parse("ls").unwrap(), Command::Ls(None));
        assert_eq!(Command::parse("").unwrap(), Command::Noop);
    }

    #[test]
    fn test_parse_commands_with_args() {
        assert_eq!(
            Command::parse("mkdir /docs").unwrap(),
            Command::Mkdir("/docs".to_string())
        );
        assert_eq!(
            Command::parse("ls /docs").unwrap(),
            Command::Ls(Some("/docs".to_string()))
        );
        assert_eq!(
            Command::parse("cp /a/f /b").unwrap(),
            Command::Cp {
                source: "/a/f".to_string(),
                destination: "/b".to_string(),
            }
        );
        assert_eq!(
            Command::parse("save /tmp/state.json").unwrap(),
            Command::Save("/tmp/state.json".to_string())
        );
    }

    #[test]
    fn test_parse_echo_and_grep() {
        assert_eq!(
            Command::parse(r#"echo "hello" /docs/readme"#).unwrap(),
            Command::Echo {
                content: "hello".to_string(),
                path: "/docs/readme".to_string(),
            }
        );
        assert_eq!(
            Command::parse("echo two words f").unwrap(),
            Command::Echo {
                content: "two words".to_string(),
                path: "f".to_string(),
            }
        );
        assert_eq!(
            Command::parse(r#"grep "ell" readme"#).unwrap(),
            Command::Grep {
                pattern: "ell".to_string(),
                path: "readme".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_wrong_arity() {
        for line in ["mkdir", "cd a b", "ls a b", "pwd x", "echo f", "mv a", "cp a b c", "rm", "exit now"] {
            let err = Command::parse(line).unwrap_err();
            assert!(matches!(err, FsError::InvalidArgument(_)), "{}", line);
        }
    }

    #[test]
    fn test_parse_unknown_command() {
        let err = Command::parse("format /").unwrap_err();
        assert_eq!(err.to_string(), "Invalid command: format");
        assert!(matches!(
            Command::parse("MKDIR /a").unwrap_err(),
            FsError::InvalidCommand(_)
        ));
    }
}
