//! Turning one input line into a command plan.
//!
//! Two passes, in this order:
//! 1. Split on `>`. Exactly two fields make a redirected command: the first is
//!    the command, the second is the output path, used verbatim (surrounding
//!    spaces included). The command part is not checked for `|`.
//! 2. Otherwise split on `|`. One field is a plain command; two or more make a
//!    pipeline of the first two. Further stages are dropped.

use crate::builtin::Builtin;
use crate::tokenizer::{self, ARG_DELIMITER, PIPE_DELIMITER, REDIRECT_DELIMITER};
use tracing::debug;

/// What to do with one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Nothing to run: the line was empty or only spaces.
    Empty,
    Exit,
    Builtin {
        builtin: Builtin,
        args: Vec<String>,
    },
    External {
        argv: Vec<String>,
        output: Option<String>,
    },
    /// `left | right`. Either side may be empty, a built-in or a program.
    Piped {
        left: Vec<String>,
        right: Vec<String>,
    },
}

/// Build the plan for `line`.
pub fn build(line: &str) -> Plan {
    let redirect = tokenizer::split(line, REDIRECT_DELIMITER);
    if let [command, target] = &*redirect {
        return classify(command_argv(command), Some(target.clone()));
    }

    let stages = tokenizer::split(line, PIPE_DELIMITER);
    match &*stages {
        [] => Plan::Empty,
        [single] => classify(command_argv(single), None),
        [left, right, rest @ ..] => {
            if !rest.is_empty() {
                debug!(discarded = rest.len(), "only two pipeline stages are run");
            }
            Plan::Piped {
                left: command_argv(left),
                right: command_argv(right),
            }
        }
    }
}

/// Space-split fields of one command, starting at the program name.
///
/// Leading empty fields (spaces before the name) are skipped; empty fields
/// after the name are kept as empty arguments.
pub fn command_argv(segment: &str) -> Vec<String> {
    tokenizer::split(segment, ARG_DELIMITER)
        .into_iter()
        .skip_while(String::is_empty)
        .collect()
}

fn classify(mut argv: Vec<String>, output: Option<String>) -> Plan {
    let Some(name) = argv.first() else {
        return Plan::Empty;
    };
    match Builtin::from_name(name) {
        Some(Builtin::Exit) => Plan::Exit,
        Some(builtin) => {
            if let Some(output) = output {
                debug!(%output, builtin = builtin.name(), "built-ins ignore output redirection");
            }
            Plan::Builtin {
                builtin,
                args: argv.split_off(1),
            }
        }
        None => Plan::External { argv, output },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn strings(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_plain_command() {
        assert_eq!(
            build("ls -la /tmp"),
            Plan::External {
                argv: strings(&["ls", "-la", "/tmp"]),
                output: None
            }
        );
    }

    #[test]
    fn test_doubled_space_is_empty_argument() {
        assert_eq!(
            build("echo a  b"),
            Plan::External {
                argv: strings(&["echo", "a", "", "b"]),
                output: None
            }
        );
    }

    #[test]
    fn test_blank_lines_are_empty() {
        assert_eq!(build(""), Plan::Empty);
        assert_eq!(build(" "), Plan::Empty);
        assert_eq!(build("     "), Plan::Empty);
    }

    #[test]
    fn test_leading_spaces_before_program() {
        assert_eq!(
            build("  pwd"),
            Plan::External {
                argv: strings(&["pwd"]),
                output: None
            }
        );
    }

    #[test]
    fn test_redirect_keeps_target_verbatim() {
        assert_eq!(
            build("echo hi > out.txt"),
            Plan::External {
                argv: strings(&["echo", "hi"]),
                output: Some(" out.txt".into())
            }
        );
        assert_eq!(
            build("echo hi >out.txt"),
            Plan::External {
                argv: strings(&["echo", "hi"]),
                output: Some("out.txt".into())
            }
        );
    }

    #[test]
    fn test_redirect_wins_over_pipe() {
        assert_eq!(
            build("ls | wc >count"),
            Plan::External {
                argv: strings(&["ls", "|", "wc"]),
                output: Some("count".into())
            }
        );
    }

    #[test]
    fn test_double_redirect_is_not_a_redirect() {
        assert_eq!(
            build("echo a >>log"),
            Plan::External {
                argv: strings(&["echo", "a", ">>log"]),
                output: None
            }
        );
    }

    #[test]
    fn test_trailing_redirect_without_target() {
        assert_eq!(
            build("echo a >"),
            Plan::External {
                argv: strings(&["echo", "a", ">"]),
                output: None
            }
        );
    }

    #[test]
    fn test_redirect_without_command_is_empty() {
        assert_eq!(build(">out"), Plan::Empty);
    }

    #[test]
    fn test_two_stage_pipeline() {
        assert_eq!(
            build("echo hi | wc -l"),
            Plan::Piped {
                left: strings(&["echo", "hi"]),
                right: strings(&["wc", "-l"])
            }
        );
    }

    #[test]
    fn test_extra_stages_are_dropped() {
        assert_eq!(
            build("a|b|c|d"),
            Plan::Piped {
                left: strings(&["a"]),
                right: strings(&["b"])
            }
        );
    }

    #[test]
    fn test_pipeline_with_empty_stage() {
        assert_eq!(
            build("| wc"),
            Plan::Piped {
                left: vec![],
                right: strings(&["wc"])
            }
        );
        assert_eq!(
            build("ls||wc"),
            Plan::Piped {
                left: strings(&["ls"]),
                right: vec![]
            }
        );
    }

    #[test]
    fn test_trailing_pipe_is_single_command() {
        assert_eq!(
            build("ls |"),
            Plan::External {
                argv: strings(&["ls"]),
                output: None
            }
        );
    }

    #[test]
    fn test_builtins() {
        assert_eq!(
            build("cd /tmp"),
            Plan::Builtin {
                builtin: Builtin::Cd,
                args: strings(&["/tmp"])
            }
        );
        assert_eq!(
            build("history"),
            Plan::Builtin {
                builtin: Builtin::History,
                args: vec![]
            }
        );
        assert_eq!(
            build("mkdir  foo"),
            Plan::Builtin {
                builtin: Builtin::Mkdir,
                args: strings(&["", "foo"])
            }
        );
    }

    #[test]
    fn test_builtin_ignores_redirect() {
        assert_eq!(
            build("history >h.txt"),
            Plan::Builtin {
                builtin: Builtin::History,
                args: vec![]
            }
        );
    }

    #[test]
    fn test_exit() {
        assert_eq!(build("exit"), Plan::Exit);
        assert_eq!(build("exit 3"), Plan::Exit);
        assert_eq!(build("exit >file"), Plan::Exit);
        assert_eq!(
            build("Exit"),
            Plan::External {
                argv: strings(&["Exit"]),
                output: None
            }
        );
    }

    #[test]
    fn test_builtins_inside_pipelines_stay_plain_fields() {
        assert_eq!(
            build("history | wc -l"),
            Plan::Piped {
                left: strings(&["history"]),
                right: strings(&["wc", "-l"])
            }
        );
    }

    proptest! {
        #[test]
        fn plain_lines_are_one_command(line in "[a-z0-9 ./-]{0,32}") {
            let argv = command_argv(&line);
            let expected = match argv.first() {
                None => Plan::Empty,
                Some(name) => match Builtin::from_name(name) {
                    Some(Builtin::Exit) => Plan::Exit,
                    Some(builtin) => Plan::Builtin { builtin, args: argv[1..].to_vec() },
                    None => Plan::External { argv: argv.clone(), output: None },
                },
            };
            prop_assert_eq!(build(&line), expected);
        }

        #[test]
        fn command_argv_is_space_split_without_leading_blanks(line in "[a-z ]{0,32}") {
            let split: Vec<String> = tokenizer::split(&line, ' ').into_vec();
            let skipped = split.iter().take_while(|f| f.is_empty()).count();
            prop_assert_eq!(command_argv(&line), split[skipped..].to_vec());
        }
    }
}
