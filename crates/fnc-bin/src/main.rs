//! fncomment entrypoint: toggle comments on the PHP function at a cursor position.
use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use core_actions::{CommentAction, CommentStyle, FunctionCommenter, ToggleOptions, ToggleOutcome};
use core_config::{Config, StyleSetting, load_from};
use core_state::{EditorState, normalize_line_endings};
use core_syntax::PhpStructure;
use core_text::Buffer;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Once;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser, Debug)]
#[command(
    name = "fncomment",
    version,
    about = "Comment or uncomment the PHP function under a cursor position"
)]
struct Args {
    /// PHP source file (UTF-8).
    pub path: PathBuf,
    /// 1-based cursor line.
    #[arg(long)]
    pub line: usize,
    /// 1-based cursor column, clamped to the line length.
    #[arg(long, default_value_t = 1)]
    pub column: usize,
    #[arg(long, value_enum, default_value_t = ActionArg::Toggle)]
    pub action: ActionArg,
    /// Only report whether the action would apply; never modifies anything.
    #[arg(long)]
    pub check: bool,
    /// Rewrite the file in place instead of printing the result.
    #[arg(long, conflicts_with = "check")]
    pub write: bool,
    /// Configuration file path (overrides discovery of `fncomment.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Write logs to this file instead of stderr.
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ActionArg {
    Toggle,
    Single,
    Block,
}

impl From<ActionArg> for CommentAction {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Toggle => CommentAction::Toggle,
            ActionArg::Single => CommentAction::SingleLine,
            ActionArg::Block => CommentAction::MultiLine,
        }
    }
}

/// How a run ended, mapped to the process exit code by `main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunStatus {
    Done,
    NothingToDo,
}

fn toggle_options(config: &Config) -> ToggleOptions {
    let preferred_style = match config.preferred_style() {
        StyleSetting::Single => CommentStyle::SingleLine,
        StyleSetting::Block => CommentStyle::MultiLine,
    };
    ToggleOptions { preferred_style }
}

fn configure_logging(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map_or_else(|| "fncomment.log".into(), |n| n.to_os_string());
            let file_appender = tracing_appender::rolling::never(dir, name);
            let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(nb_writer)
                .try_init()
                .ok()
                .map(|_| guard)
        }
        None => {
            // Already-installed subscriber is fine; keep going with it.
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
            None
        }
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn load_editor_state(path: &Path) -> Result<EditorState> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let norm = normalize_line_endings(&content);
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("file");
    debug!(target: "io", file = %path.display(), size_bytes = content.len(), "file_read_ok");
    let mut state = EditorState::new(Buffer::from_str(name, &norm.normalized)?);
    state.original_line_ending = norm.original;
    if norm.mixed {
        warn!(target: "io", file = %path.display(), "mixed_line_endings_detected");
    }
    Ok(state)
}

/// Char offset of a 1-based (line, column) pair.
fn cursor_offset(buffer: &Buffer, line: usize, column: usize) -> Result<usize> {
    if line == 0 || line > buffer.line_count() {
        bail!("line {line} is outside 1..={}", buffer.line_count());
    }
    if column == 0 {
        bail!("column is 1-based");
    }
    Ok(buffer.offset_at(line - 1, column - 1))
}

fn run(args: &Args, out: &mut dyn Write) -> Result<RunStatus> {
    let config = load_from(args.config.clone())?;
    let commenter = FunctionCommenter::new(PhpStructure::new()?, toggle_options(&config));
    let mut state = load_editor_state(&args.path)?;
    let offset = cursor_offset(state.buffer(), args.line, args.column)?;
    state.cursor = offset;

    if args.check {
        let applicable = commenter.is_applicable(state.buffer(), offset);
        info!(target: "runtime", offset, applicable, "check");
        writeln!(out, "{}", if applicable { "applicable" } else { "no target" })?;
        return Ok(if applicable {
            RunStatus::Done
        } else {
            RunStatus::NothingToDo
        });
    }

    let outcome = commenter.apply(&mut state, offset, args.action.into())?;
    info!(target: "runtime", offset, action = ?args.action, outcome = ?outcome, "toggle_complete");
    match outcome {
        ToggleOutcome::NoTarget | ToggleOutcome::MalformedMarkers => {
            return Ok(RunStatus::NothingToDo);
        }
        ToggleOutcome::Commented(_) | ToggleOutcome::Uncommented(_) => {}
    }

    let text = state.text_for_save();
    if args.write {
        std::fs::write(&args.path, &text)
            .with_context(|| format!("writing {}", args.path.display()))?;
        debug!(target: "io", file = %args.path.display(), size_bytes = text.len(), "file_write_ok");
    } else {
        out.write_all(text.as_bytes())?;
    }
    Ok(RunStatus::Done)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let _log_guard = configure_logging(args.log_file.as_deref());
    install_panic_hook();

    let stdout = std::io::stdout();
    let status = run(&args, &mut stdout.lock())?;
    Ok(match status {
        RunStatus::Done => ExitCode::SUCCESS,
        RunStatus::NothingToDo => {
            eprintln!("fncomment: no function at {}:{}", args.line, args.column);
            ExitCode::from(1)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "<?php\n\nfunction foo() {\n    return 1;\n}\n";

    fn source_file(content: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::Builder::new().suffix(".php").tempfile().unwrap();
        std::fs::write(tmp.path(), content).unwrap();
        tmp
    }

    fn args(path: &Path, extra: &[&str]) -> Args {
        let mut argv = vec!["fncomment".to_string(), path.display().to_string()];
        argv.extend(extra.iter().map(|s| s.to_string()));
        // Point at a config path that does not exist so the host machine's file is ignored.
        argv.push("--config".into());
        argv.push(path.with_extension("missing.toml").display().to_string());
        Args::try_parse_from(argv).unwrap()
    }

    fn run_to_string(args: &Args) -> (RunStatus, String) {
        let mut out = Vec::new();
        let status = run(args, &mut out).unwrap();
        (status, String::from_utf8(out).unwrap())
    }

    #[test]
    fn prints_block_commented_function() {
        let file = source_file(SOURCE);
        let (status, out) = run_to_string(&args(file.path(), &["--line", "4", "--column", "5"]));
        assert_eq!(status, RunStatus::Done);
        assert_eq!(out, "<?php\n\n/* function foo() {\n    return 1;\n} */\n");
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), SOURCE);
    }

    #[test]
    fn write_flag_rewrites_file_and_keeps_crlf() {
        let file = source_file(&SOURCE.replace('\n', "\r\n"));
        let a = args(
            file.path(),
            &["--line", "4", "--column", "5", "--action", "single", "--write"],
        );
        let (status, out) = run_to_string(&a);
        assert_eq!(status, RunStatus::Done);
        assert!(out.is_empty());
        assert_eq!(
            std::fs::read_to_string(file.path()).unwrap(),
            "<?php\r\n\r\n// function foo() {\r\n//     return 1;\r\n// }\r\n"
        );
    }

    #[test]
    fn check_reports_without_modifying() {
        let file = source_file(SOURCE);
        let (status, out) = run_to_string(&args(file.path(), &["--line", "4", "--check"]));
        assert_eq!(status, RunStatus::Done);
        assert_eq!(out, "applicable\n");

        let (status, out) = run_to_string(&args(file.path(), &["--line", "1", "--check"]));
        assert_eq!(status, RunStatus::NothingToDo);
        assert_eq!(out, "no target\n");
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), SOURCE);
    }

    #[test]
    fn no_target_prints_nothing() {
        let file = source_file("<?php\n$x = 1;\n");
        let (status, out) = run_to_string(&args(file.path(), &["--line", "2"]));
        assert_eq!(status, RunStatus::NothingToDo);
        assert!(out.is_empty());
    }

    #[test]
    fn config_preferred_style_drives_toggle() {
        let file = source_file(SOURCE);
        let cfg = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(cfg.path(), "[toggle]\npreferred_style = \"single\"\n").unwrap();
        let argv = [
            "fncomment",
            file.path().to_str().unwrap(),
            "--line",
            "4",
            "--config",
            cfg.path().to_str().unwrap(),
        ];
        let (status, out) = run_to_string(&Args::try_parse_from(argv).unwrap());
        assert_eq!(status, RunStatus::Done);
        assert_eq!(out, "<?php\n\n// function foo() {\n//     return 1;\n// }\n");
    }

    #[test]
    fn cursor_offset_validates_line() {
        let buffer = Buffer::from_str("t", "ab\ncd").unwrap();
        assert_eq!(cursor_offset(&buffer, 2, 2).unwrap(), 4);
        assert_eq!(cursor_offset(&buffer, 1, 99).unwrap(), 2);
        assert!(cursor_offset(&buffer, 0, 1).is_err());
        assert!(cursor_offset(&buffer, 3, 1).is_err());
        assert!(cursor_offset(&buffer, 1, 0).is_err());
    }

    #[test]
    fn write_conflicts_with_check() {
        let argv = ["fncomment", "a.php", "--line", "1", "--check", "--write"];
        assert!(Args::try_parse_from(argv).is_err());
    }
}
