use argh::FromArgs;
use minishell::Interpreter;

#[derive(FromArgs)]
/// A small interactive shell with POSIX-like quoting and PATH lookup.
struct Args {
    #[argh(option, short = 'c')]
    /// run a single command line and exit with its status.
    command: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();
    let mut sh = Interpreter::default();

    match args.command {
        Some(line) => {
            let code = sh.run_line(&line)?;
            std::process::exit(code);
        }
        None => sh.repl(),
    }
}
