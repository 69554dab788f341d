//! Command execution logic.
//!
//! Contains `execute_command`, which runs a parsed [`Command`] against the
//! virtual filesystem and environment and returns an [`ExecutionResult`].

use std::sync::LazyLock;

use regex::Regex;

use crate::config::{DEFAULT_USER, HELP_TEXT};
use crate::core::VirtualFs;
use crate::core::env::{Environment, is_valid_var_name};
use crate::core::error::{FsError, ShellError};
use crate::models::OutputLine;

use super::{Command, ExecutionResult, PathArg, ShellContext};

/// Matches a whole `$word` or `${word}` token; the word is checked with
/// [`is_valid_var_name`].
static VAR_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$(?:([^${}]+)|\{([^${}]+)\})$")
        .expect("variable token pattern is valid")
});

/// Hint printed after an unknown command.
const HELP_HINT: &str = "Type 'help' to see available commands.";

/// Execute a parsed command.
///
/// Only `export` and `unset` mutate state (the environment). A directory
/// change is returned in the result, not applied.
pub fn execute_command(cmd: Command, ctx: ShellContext<'_>) -> ExecutionResult {
    let ShellContext {
        cwd,
        env,
        fs,
        history,
    } = ctx;

    match cmd {
        Command::Empty => ExecutionResult::empty(),
        Command::Ls(path) => execute_ls(path, fs, env, cwd),
        Command::Cd(path) => execute_cd(path, fs, env, cwd),
        Command::Pwd => ExecutionResult::output(vec![OutputLine::text(cwd)]),
        Command::Cat(files) => execute_cat(&files, fs, env, cwd),
        Command::Echo(args) => execute_echo(&args, env),
        Command::Env => ExecutionResult::output(format_env(env)),
        Command::Export(args) => execute_export(&args, env),
        Command::Unset(names) => {
            for name in &names {
                env.unset(name);
            }
            ExecutionResult::empty()
        }
        Command::History => ExecutionResult::output(
            history
                .iter()
                .enumerate()
                .map(|(i, cmd)| OutputLine::text(format!("{:>5}  {}", i + 1, cmd)))
                .collect(),
        ),
        Command::Clear => ExecutionResult {
            clear_screen: true,
            ..ExecutionResult::empty()
        },
        Command::Whoami => ExecutionResult::output(vec![OutputLine::text(
            env.get("USER").unwrap_or(DEFAULT_USER),
        )]),
        Command::Date => ExecutionResult::output(vec![OutputLine::text(
            chrono::Local::now()
                .format("%a %b %e %H:%M:%S %Y")
                .to_string(),
        )]),
        Command::Help => ExecutionResult::output(HELP_TEXT.lines().map(OutputLine::text).collect()),
        Command::Exit => ExecutionResult {
            output: vec![OutputLine::text("logout")],
            exit: true,
            ..ExecutionResult::empty()
        },
        Command::Invalid(err) => ExecutionResult::output(vec![OutputLine::error(err.to_string())]),
        Command::Unknown(name) => ExecutionResult::output(vec![
            OutputLine::error(ShellError::UnknownCommand(name).to_string()),
            OutputLine::info(HELP_HINT),
        ]),
    }
}

/// Turn a user-typed path into a canonical one (`~` expands to `$HOME`).
fn resolve_arg(path: &PathArg, env: &Environment, cwd: &str) -> String {
    let home = env.get("HOME").unwrap_or("/");
    let expanded = VirtualFs::expand_home(path.as_str(), home);
    VirtualFs::canonicalize(cwd, &expanded)
}

/// Execute `ls` command.
fn execute_ls(
    path: Option<PathArg>,
    fs: &VirtualFs,
    env: &Environment,
    cwd: &str,
) -> ExecutionResult {
    let target = match &path {
        Some(p) => resolve_arg(p, env, cwd),
        None => cwd.to_string(),
    };
    let shown = path.as_ref().map(PathArg::as_str).unwrap_or(".");

    match fs.list(&target) {
        Ok(entries) => ExecutionResult::output(
            entries
                .into_iter()
                .map(|entry| {
                    if entry.is_dir {
                        OutputLine::dir_entry(entry.name)
                    } else {
                        OutputLine::file_entry(entry.name)
                    }
                })
                .collect(),
        ),
        Err(FsError::NotADirectory) => ExecutionResult::output(vec![OutputLine::file_entry(
            VirtualFs::basename(&target),
        )]),
        Err(e) => ExecutionResult::output(vec![OutputLine::error(format!(
            "ls: cannot access '{}': {}",
            shown, e
        ))]),
    }
}

/// Execute `cd` command.
fn execute_cd(
    path: Option<PathArg>,
    fs: &VirtualFs,
    env: &Environment,
    cwd: &str,
) -> ExecutionResult {
    let Some(path) = path else {
        let home = env.get("HOME").unwrap_or("/");
        let target = VirtualFs::canonicalize("/", home);
        return if fs.is_directory(&target) {
            ExecutionResult::navigate(target)
        } else {
            ExecutionResult::output(vec![OutputLine::error(format!(
                "cd: {}: {}",
                home,
                FsError::NotFound
            ))])
        };
    };

    let target = resolve_arg(&path, env, cwd);
    match fs.resolve(&target) {
        Some(entry) if entry.is_directory() => ExecutionResult::navigate(target),
        Some(_) => ExecutionResult::output(vec![OutputLine::error(format!(
            "cd: {}: {}",
            path,
            FsError::NotADirectory
        ))]),
        None => ExecutionResult::output(vec![OutputLine::error(format!(
            "cd: {}: {}",
            path,
            FsError::NotFound
        ))]),
    }
}

/// Execute `cat` command. Each operand yields its content or an error line.
fn execute_cat(files: &[PathArg], fs: &VirtualFs, env: &Environment, cwd: &str) -> ExecutionResult {
    let output = files
        .iter()
        .map(|file| match fs.read(&resolve_arg(file, env, cwd)) {
            Ok(content) => OutputLine::text(content),
            Err(e) => OutputLine::error(format!("cat: {}: {}", file, e)),
        })
        .collect();
    ExecutionResult::output(output)
}

/// Execute `echo`, substituting whole `$NAME` tokens.
fn execute_echo(args: &[String], env: &Environment) -> ExecutionResult {
    let words: Vec<&str> = args
        .iter()
        .map(|arg| match VAR_TOKEN.captures(arg) {
            Some(caps) => match caps.get(1).or_else(|| caps.get(2)) {
                Some(name) if is_valid_var_name(name.as_str()) => {
                    env.get(name.as_str()).unwrap_or("")
                }
                _ => arg.as_str(),
            },
            None => arg.as_str(),
        })
        .collect();
    ExecutionResult::output(vec![OutputLine::text(words.join(" "))])
}

/// Execute `export`. Each `NAME=value` operand is split on its first `=`;
/// operands without `=` are ignored.
fn execute_export(args: &[String], env: &mut Environment) -> ExecutionResult {
    if args.is_empty() {
        return ExecutionResult::output(format_env(env));
    }

    let mut errors = Vec::new();
    for assignment in args {
        let Some((key, value)) = assignment.split_once('=') else {
            continue;
        };
        if let Err(e) = env.set(key, value) {
            errors.push(OutputLine::error(format!("export: `{}': {}", assignment, e)));
        }
    }
    ExecutionResult::output(errors)
}

/// Format the environment as `NAME=value` lines.
fn format_env(env: &Environment) -> Vec<OutputLine> {
    env.all()
        .map(|(key, value)| OutputLine::text(format!("{}={}", key, value)))
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::execute;
    use crate::models::FsEntry;

    struct Fixture {
        fs: VirtualFs,
        env: Environment,
        history: Vec<String>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                fs: VirtualFs::default(),
                env: Environment::seeded("user", "shellpane", "/home/user", "/project/workspace"),
                history: Vec::new(),
            }
        }

        fn run(&mut self, cwd: &str, line: &str) -> ExecutionResult {
            execute(
                line,
                ShellContext {
                    cwd,
                    env: &mut self.env,
                    fs: &self.fs,
                    history: &self.history,
                },
            )
        }
    }

    const WS: &str = "/project/workspace";

    #[test]
    fn test_pwd() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run(WS, "pwd").text(), WS);
    }

    #[test]
    fn test_cat_file() {
        let mut fx = Fixture::new();
        let expected = fx.fs.read("/project/workspace/README.md").unwrap().to_string();
        assert_eq!(fx.run(WS, "cat README.md").text(), expected);
    }

    #[test]
    fn test_cat_errors() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.run(WS, "cat missing.txt").text(),
            "cat: missing.txt: No such file or directory"
        );
        assert_eq!(fx.run(WS, "cat src").text(), "cat: src: Is a directory");
        assert_eq!(fx.run(WS, "cat").text(), "cat: missing file operand");
    }

    #[test]
    fn test_cat_multiple() {
        let mut fx = Fixture::new();
        let result = fx.run(WS, "cat /etc/hostname nope");
        assert_eq!(
            result.output,
            vec![
                OutputLine::text("shellpane\n"),
                OutputLine::error("cat: nope: No such file or directory"),
            ]
        );
    }

    #[test]
    fn test_ls_default_cwd() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run(WS, "ls").text(), "Cargo.toml\nREADME.md\nsrc/");
    }

    #[test]
    fn test_ls_path_and_file() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run(WS, "ls src").text(), "lib.rs\nmain.rs");
        assert_eq!(fx.run(WS, "ls src/main.rs").text(), "main.rs");
        assert_eq!(fx.run("/", "ls ~").text(), ".profile");
    }

    #[test]
    fn test_ls_missing() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.run(WS, "ls nope").text(),
            "ls: cannot access 'nope': No such file or directory"
        );
    }

    #[test]
    fn test_ls_completeness() {
        let names = ["a", "b", "c.txt", "d", ".hidden"];
        let mut fx = Fixture::new();
        fx.fs = VirtualFs::from_root(FsEntry::dir_with(names.iter().map(|n| {
            let entry = if n.contains('.') {
                FsEntry::file("")
            } else {
                FsEntry::dir()
            };
            (*n, entry)
        })))
        .unwrap();

        let result = fx.run("/", "ls /");
        let mut listed: Vec<String> = result
            .output
            .iter()
            .map(|line| line.to_string().trim_end_matches('/').to_string())
            .collect();
        listed.sort();
        let mut expected: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        expected.sort();
        assert_eq!(listed, expected);
    }

    #[test]
    fn test_cd_success() {
        let mut fx = Fixture::new();
        let result = fx.run(WS, "cd src");
        assert_eq!(result.new_cwd.as_deref(), Some("/project/workspace/src"));
        assert!(result.output.is_empty());

        assert_eq!(fx.run(WS, "cd ..").new_cwd.as_deref(), Some("/project"));
        assert_eq!(fx.run(WS, "cd ~").new_cwd.as_deref(), Some("/home/user"));
        assert_eq!(fx.run(WS, "cd /").new_cwd.as_deref(), Some("/"));
    }

    #[test]
    fn test_cd_home_without_args() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run(WS, "cd").new_cwd.as_deref(), Some("/home/user"));

        fx.env.set("HOME", "/nowhere").unwrap();
        let result = fx.run(WS, "cd");
        assert!(result.new_cwd.is_none());
        assert_eq!(result.text(), "cd: /nowhere: No such file or directory");
    }

    #[test]
    fn test_cd_errors() {
        let mut fx = Fixture::new();
        let result = fx.run(WS, "cd nope");
        assert!(result.new_cwd.is_none());
        assert_eq!(result.text(), "cd: nope: No such file or directory");

        let result = fx.run(WS, "cd README.md");
        assert!(result.new_cwd.is_none());
        assert_eq!(result.text(), "cd: README.md: Not a directory");
    }

    #[test]
    fn test_echo_substitution() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run(WS, "echo hi $USER").text(), "hi user");
        assert_eq!(fx.run(WS, "echo ${USER}!").text(), "${USER}!");
        assert_eq!(fx.run(WS, "echo ${HOME}").text(), "/home/user");
        assert_eq!(fx.run(WS, "echo [$UNSET]").text(), "[$UNSET]");
        assert_eq!(fx.run(WS, "echo a $UNSET b").text(), "a  b");
        assert_eq!(fx.run(WS, "echo $ $1x cost$5").text(), "$ $1x cost$5");
        assert_eq!(fx.run(WS, "echo $A-B ${9} ${}").text(), "$A-B ${9} ${}");
        assert_eq!(fx.run(WS, "echo").text(), "");
    }

    #[test]
    fn test_export_and_env() {
        let mut fx = Fixture::new();
        assert!(fx.run(WS, "export GREETING=hello=world").output.is_empty());
        assert_eq!(fx.env.get("GREETING"), Some("hello=world"));

        // No '=' is a no-op
        fx.run(WS, "export LONELY");
        assert_eq!(fx.env.get("LONELY"), None);

        let env_out = fx.run(WS, "env").text();
        assert!(env_out.lines().any(|l| l == "GREETING=hello=world"));
        assert_eq!(fx.run(WS, "export").text(), env_out);

        // Lexicographic order
        let keys: Vec<_> = env_out.lines().map(|l| l.split('=').next().unwrap()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_export_empty_name() {
        let mut fx = Fixture::new();
        let result = fx.run(WS, "export =x");
        assert_eq!(
            result.text(),
            "export: `=x': variable name must not be empty"
        );
    }

    #[test]
    fn test_unset() {
        let mut fx = Fixture::new();
        fx.run(WS, "export A=1 B=2");
        fx.run(WS, "unset A B MISSING");
        assert_eq!(fx.env.get("A"), None);
        assert_eq!(fx.env.get("B"), None);
        assert_eq!(fx.run(WS, "unset").text(), "unset: missing variable name operand");
    }

    #[test]
    fn test_history_listing() {
        let mut fx = Fixture::new();
        fx.history = vec!["ls".into(), "pwd".into()];
        assert_eq!(fx.run(WS, "history").text(), "    1  ls\n    2  pwd");
    }

    #[test]
    fn test_fixed_responses() {
        let mut fx = Fixture::new();

        let clear = fx.run(WS, "clear");
        assert!(clear.clear_screen);
        assert!(clear.output.is_empty());

        assert_eq!(fx.run(WS, "whoami").text(), "user");
        assert!(!fx.run(WS, "date").text().is_empty());
        assert_eq!(fx.run(WS, "help").text(), HELP_TEXT.trim_end());

        let exit = fx.run(WS, "exit");
        assert!(exit.exit);
        assert_eq!(exit.text(), "logout");

        assert_eq!(fx.run(WS, "   ").text(), "");
    }

    #[test]
    fn test_unknown_command() {
        let mut fx = Fixture::new();
        let before = fx.env.clone();
        let result = fx.run(WS, "frobnicate --now");
        assert_eq!(
            result.output,
            vec![
                OutputLine::error("frobnicate: command not found"),
                OutputLine::info(HELP_HINT),
            ]
        );
        assert!(result.new_cwd.is_none());
        assert_eq!(fx.env, before);
    }
}
