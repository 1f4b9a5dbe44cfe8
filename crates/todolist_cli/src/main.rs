use clap::{CommandFactory, Parser};
use std::io::{self, BufRead, Write};
use todolist_cli::cli::Cli;
use todolist_cli::logging::init_tracing;
use todolist_cli::render;
use todolist_cli::session::Session;
use todolist_core::error::AppError;
use todolist_core::intro::IntroGate;
use todolist_core::storage::json_store::JsonFileStore;

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            quoted = true;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() || quoted {
                args.push(std::mem::take(&mut current));
                quoted = false;
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

enum Step {
    Continue,
    Exit,
}

fn run_line(session: &mut Session<JsonFileStore>, line: &str) -> Step {
    let expanded = session.config.expand_alias(line);
    let line = expanded.as_deref().unwrap_or(line).trim();
    if line.is_empty() {
        return Step::Continue;
    }

    if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        return Step::Exit;
    }

    if line == "help" || line == "?" {
        print_help();
        return Step::Continue;
    }

    let args = match split_command_line(line) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            return Step::Continue;
        }
    };

    if args.is_empty() {
        return Step::Continue;
    }

    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push("todolist".to_string());
    argv.extend(args);

    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            return Step::Continue;
        }
    };

    let mut stdout = io::stdout().lock();
    if let Err(err) = session.execute(cli.command, cli.json, &mut stdout) {
        eprintln!("ERROR: {}", err);
    }
    Step::Continue
}

fn run_interactive() -> Result<(), AppError> {
    init_tracing(0, 0)?;

    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    let mut started = false;
    {
        let mut gate = IntroGate::new(|| started = true);
        print!("{}", render::intro(gate.screen()));
        io::stdout().flush()?;

        if stdin_lock.read_line(&mut input)? > 0 {
            gate.activate();
        }
    }
    if !started {
        return Ok(());
    }

    let mut session = Session::open(&[])?;
    print!("{}", session.render_view());

    // The line that dismissed the intro may already carry a command.
    let mut pending = Some(input.clone());
    loop {
        let line = match pending.take() {
            Some(line) => line,
            None => {
                input.clear();
                if stdin_lock.read_line(&mut input)? == 0 {
                    break;
                }
                input.clone()
            }
        };

        if let Step::Exit = run_line(&mut session, &line) {
            break;
        }
    }

    Ok(())
}

fn run_once(cli: Cli) -> Result<(), AppError> {
    init_tracing(cli.verbose, cli.quiet)?;
    let mut session = Session::open(&cli.config_override)?;
    let mut stdout = io::stdout().lock();
    session.execute(cli.command, cli.json, &mut stdout)
}

fn main() {
    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive() {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            let _ = err.print();
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_once(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::split_command_line;

    #[test]
    fn split_respects_quotes() {
        let args = split_command_line(r#"add "buy milk" now"#).unwrap();
        assert_eq!(args, ["add", "buy milk", "now"]);
    }

    #[test]
    fn split_keeps_escaped_quote() {
        let args = split_command_line(r#"edit 1 "say \"hi\"""#).unwrap();
        assert_eq!(args, ["edit", "1", "say \"hi\""]);
    }

    #[test]
    fn split_keeps_empty_quoted_argument() {
        let args = split_command_line(r#"edit 1 """#).unwrap();
        assert_eq!(args, ["edit", "1", ""]);

        let args = split_command_line(r#"edit 1 "" "#).unwrap();
        assert_eq!(args, ["edit", "1", ""]);
    }

    #[test]
    fn split_rejects_unterminated_quote() {
        let err = split_command_line(r#"add "oops"#).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }
}
