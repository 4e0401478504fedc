//! Workspace scripts
//!
//! A script is one command per line, run against a [`Workspace`]:
//!
//! | Command | Effect |
//! |---------|--------|
//! | `go N` | select slot N |
//! | `ld NAME` | load a document into the current slot; its body follows up to `eod` |
//! | `add LINK` | insert link text such as `faq(3)` |
//! | `get I` / `rem I` | show / remove the link at position I |
//! | `remall REF` | remove every link to REF |
//! | `index REF` | position of the first link to REF, or -1 |
//! | `has REF` | whether a link to REF exists |
//! | `size` | number of links |
//! | `show` / `reverse` | render the document forward / backward |
//! | `clear` | drop all links |
//! | `addl N` | merge the links of slot N into the current slot |
//! | `ha` | stop |
//!
//! Blank lines and lines starting with `#` are skipped. A failing command
//! reports an error and the script carries on.

use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use serde::Serialize;
use thiserror::Error;

use super::output::Output;
use crate::domain::{Workspace, WorkspaceError};
use crate::storage::{self, Config};

#[derive(Debug, Error, PartialEq)]
pub enum ScriptError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing argument for '{0}'")]
    MissingArgument(String),

    #[error("Invalid number for '{command}': {value}")]
    InvalidNumber { command: String, value: String },
}

/// A parsed script line
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Select(usize),
    Load(String),
    Add(String),
    Get(i64),
    Remove(i64),
    RemoveAll(String),
    Index(String),
    Has(String),
    Size,
    Show,
    Reverse,
    Clear,
    MergeFrom(usize),
    Halt,
}

impl FromStr for ScriptCommand {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let keyword = words.next().unwrap_or_default();
        let argument = words.next();

        let text = || {
            argument
                .map(str::to_string)
                .ok_or_else(|| ScriptError::MissingArgument(keyword.to_string()))
        };
        let number = |value: &str| ScriptError::InvalidNumber {
            command: keyword.to_string(),
            value: value.to_string(),
        };
        let slot = || -> Result<usize, ScriptError> {
            let value = text()?;
            value.parse().map_err(|_| number(&value))
        };
        let position = || -> Result<i64, ScriptError> {
            let value = text()?;
            value.parse().map_err(|_| number(&value))
        };

        match keyword.to_lowercase().as_str() {
            "go" => Ok(ScriptCommand::Select(slot()?)),
            "ld" => Ok(ScriptCommand::Load(text()?)),
            "add" => Ok(ScriptCommand::Add(text()?)),
            "get" => Ok(ScriptCommand::Get(position()?)),
            "rem" => Ok(ScriptCommand::Remove(position()?)),
            "remall" => Ok(ScriptCommand::RemoveAll(text()?)),
            "index" => Ok(ScriptCommand::Index(text()?)),
            "has" => Ok(ScriptCommand::Has(text()?)),
            "size" => Ok(ScriptCommand::Size),
            "show" => Ok(ScriptCommand::Show),
            "reverse" => Ok(ScriptCommand::Reverse),
            "clear" => Ok(ScriptCommand::Clear),
            "addl" => Ok(ScriptCommand::MergeFrom(slot()?)),
            "ha" => Ok(ScriptCommand::Halt),
            _ => Err(ScriptError::UnknownCommand(keyword.to_string())),
        }
    }
}

/// One executed command and what it produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub command: String,
    pub output: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run a script file (or stdin) and print the transcript
pub fn run(output: &Output, config: &Config, path: Option<&Path>) -> Result<()> {
    let lines = storage::read_lines(path)?;
    output.verbose_ctx("run", &format!("Read {} script lines", lines.len()));

    let mut workspace = Workspace::new(config.slots);
    let steps = execute(output, config, &mut workspace, &lines);

    if output.is_json() {
        output.data(&steps);
    } else {
        for step in &steps {
            println!("!{}", step.command);
            for line in &step.output {
                println!("{}", line);
            }
            if let Some(error) = &step.error {
                println!("error: {}", error);
            }
        }
    }

    Ok(())
}

/// Executes script lines against a workspace, collecting one step per command
pub fn execute<S: AsRef<str>>(
    output: &Output,
    config: &Config,
    workspace: &mut Workspace,
    lines: &[S],
) -> Vec<Step> {
    let mut lines = lines.iter().map(S::as_ref);
    let mut steps = Vec::new();

    while let Some(line) = lines.next() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut step = Step {
            command: line.to_string(),
            output: Vec::new(),
            error: None,
        };

        match line.parse::<ScriptCommand>() {
            Ok(ScriptCommand::Halt) => {
                steps.push(step);
                break;
            }
            Ok(command) => match apply(output, config, workspace, command, &mut lines) {
                Ok(produced) => step.output = produced,
                Err(e) => step.error = Some(e.to_string()),
            },
            Err(e) => {
                // The body of a nameless `ld` is still a body, not commands
                if matches!(
                    &e,
                    ScriptError::MissingArgument(kw) if kw.eq_ignore_ascii_case("ld")
                ) {
                    let terminator = config.terminator.as_str();
                    let _ = lines.by_ref().find(|body| *body == terminator);
                }
                step.error = Some(e.to_string());
            }
        }

        if let Some(error) = &step.error {
            output.verbose_ctx("run", &format!("'{}' failed: {}", line, error));
        }
        steps.push(step);
    }

    steps
}

fn apply<'a>(
    output: &Output,
    config: &Config,
    workspace: &mut Workspace,
    command: ScriptCommand,
    lines: &mut impl Iterator<Item = &'a str>,
) -> Result<Vec<String>, WorkspaceError> {
    let produced = match command {
        ScriptCommand::Select(slot) => {
            workspace.select(slot)?;
            vec![]
        }
        ScriptCommand::Load(name) => {
            let report = workspace.load(&name, &mut *lines, &config.terminator);
            output.verbose_ctx(
                "run",
                &format!(
                    "Loaded '{}' into slot {}: {} links, {} skipped",
                    name,
                    workspace.current_slot(),
                    report.accepted,
                    report.skipped.len()
                ),
            );
            vec![]
        }
        ScriptCommand::Add(text) => vec![workspace.add_link(&text)?.to_string()],
        ScriptCommand::Get(index) => vec![workspace.get(index)?.to_string()],
        ScriptCommand::Remove(index) => vec![workspace.remove_at(index)?.to_string()],
        ScriptCommand::RemoveAll(reference) => vec![workspace.remove_all(&reference)?.to_string()],
        ScriptCommand::Index(reference) => {
            let index = workspace
                .index_of(&reference)?
                .map_or_else(|| "-1".to_string(), |i| i.to_string());
            vec![index]
        }
        ScriptCommand::Has(reference) => vec![workspace.contains(&reference)?.to_string()],
        ScriptCommand::Size => vec![workspace.size()?.to_string()],
        ScriptCommand::Show => lines_of(&workspace.document()?.render(config.links_per_line)),
        ScriptCommand::Reverse => {
            lines_of(&workspace.document()?.render_reverse(config.links_per_line))
        }
        ScriptCommand::Clear => {
            workspace.clear()?;
            vec![]
        }
        ScriptCommand::MergeFrom(slot) => {
            workspace.merge_from(slot)?;
            vec![]
        }
        ScriptCommand::Halt => vec![],
    };
    Ok(produced)
}

fn lines_of(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::output::OutputFormat;

    fn run_script(script: &str) -> Vec<Step> {
        let output = Output::new(OutputFormat::Text, false);
        let config = Config::default();
        let mut workspace = Workspace::new(config.slots);
        let lines: Vec<_> = script.lines().collect();
        execute(&output, &config, &mut workspace, &lines)
    }

    fn outputs(steps: &[Step]) -> Vec<(String, Vec<String>, Option<String>)> {
        steps
            .iter()
            .map(|s| (s.command.clone(), s.output.clone(), s.error.clone()))
            .collect()
    }

    #[test]
    fn parse_commands() {
        assert_eq!("go 3".parse::<ScriptCommand>(), Ok(ScriptCommand::Select(3)));
        assert_eq!("ld Home".parse::<ScriptCommand>(), Ok(ScriptCommand::Load("Home".to_string())));
        assert_eq!("get -1".parse::<ScriptCommand>(), Ok(ScriptCommand::Get(-1)));
        assert_eq!("SIZE".parse::<ScriptCommand>(), Ok(ScriptCommand::Size));
        assert_eq!("addl 2".parse::<ScriptCommand>(), Ok(ScriptCommand::MergeFrom(2)));
        assert_eq!("ha".parse::<ScriptCommand>(), Ok(ScriptCommand::Halt));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "jump 1".parse::<ScriptCommand>(),
            Err(ScriptError::UnknownCommand("jump".to_string()))
        );
        assert_eq!(
            "get".parse::<ScriptCommand>(),
            Err(ScriptError::MissingArgument("get".to_string()))
        );
        assert_eq!(
            "go -1".parse::<ScriptCommand>(),
            Err(ScriptError::InvalidNumber {
                command: "go".to_string(),
                value: "-1".to_string()
            })
        );
    }

    #[test]
    fn load_then_query() {
        let steps = run_script(
            "ld Home\n\
             text link=c link=A(2) link=_bad\n\
             link=b\n\
             eod\n\
             size\n\
             show\n\
             reverse\n\
             get 1\n\
             index b\n\
             index zz\n\
             has c",
        );

        let got = outputs(&steps);
        assert_eq!(got[0], ("ld Home".to_string(), vec![], None));
        assert_eq!(got[1].1, vec!["3"]);
        assert_eq!(got[2].1, vec!["Document: home", "a(2) b(1) c(1)"]);
        assert_eq!(got[3].1, vec!["Document: home", "c(1) b(1) a(2)"]);
        assert_eq!(got[4].1, vec!["b(1)"]);
        assert_eq!(got[5].1, vec!["1"]);
        assert_eq!(got[6].1, vec!["-1"]);
        assert_eq!(got[7].1, vec!["true"]);
    }

    #[test]
    fn errors_do_not_stop_the_script() {
        let steps = run_script("size\nget -1\nbogus\nld d\neod\nget 0\nadd x(0)\nsize");

        assert!(steps[0].error.as_deref().unwrap().contains("holds no document"));
        assert!(steps[1].error.is_some());
        assert!(steps[2].error.as_deref().unwrap().contains("Unknown command"));
        assert!(steps[4].error.as_deref().unwrap().contains("out of range"));
        assert!(steps[5].error.as_deref().unwrap().contains("positive"));
        assert_eq!(steps[6].output, vec!["0"]);
    }

    #[test]
    fn remove_and_clear() {
        let steps = run_script(
            "ld d\nlink=x(3) link=a link=x(7)\neod\nrem 0\nremall X\nsize\nadd q\nclear\nsize",
        );

        assert_eq!(steps[1].output, vec!["a(1)"]);
        assert_eq!(steps[2].output, vec!["2"]);
        assert_eq!(steps[3].output, vec!["0"]);
        assert_eq!(steps[4].output, vec!["q(1)"]);
        assert_eq!(steps[6].output, vec!["0"]);
    }

    #[test]
    fn merge_between_slots() {
        let steps = run_script(
            "ld first\nlink=a link=c\neod\n\
             go 1\nld second\nlink=b link=d\neod\n\
             go 0\naddl 1\naddl 0\nshow\ngo 1\nsize",
        );

        let show = steps.iter().find(|s| s.command == "show").unwrap();
        assert_eq!(show.output, vec!["Document: first", "a(1) b(1) c(1) d(1)"]);
        assert_eq!(steps.last().unwrap().output, vec!["0"]);
        assert!(steps.iter().all(|s| s.error.is_none()));
    }

    #[test]
    fn nameless_load_skips_its_body() {
        let steps = run_script("ld\nlink=a link=b\neod\nsize\nld d\nlink=c\neod\nsize");

        assert_eq!(steps.len(), 4);
        assert_eq!(
            steps[0].error.as_deref(),
            Some("Missing argument for 'ld'")
        );
        assert_eq!(steps[1].command, "size");
        assert!(steps[1].error.as_deref().unwrap().contains("holds no document"));
        assert_eq!(steps[3].output, vec!["1"]);
    }

    #[test]
    fn halt_skips_the_rest() {
        let steps = run_script("# comment\n\nha\nsize");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].command, "ha");
    }

    #[test]
    fn slot_out_of_range() {
        let steps = run_script("go 10");
        assert!(steps[0].error.as_deref().unwrap().contains("out of range"));
    }
}
