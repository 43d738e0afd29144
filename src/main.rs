use getopts::Options;
use kilo::{
    terminal_output, window_size, Editor, Error, InputSequences, Result, StdinRawMode,
    TerminationWatcher, TextBuffer, VERSION,
};
use std::env;
use std::io::{self, Write};
use std::process::exit;

fn print_help(program: &str, opts: Options) {
    let description = format!(
        "{prog}: A minimal terminal text viewer

Usage:

  {prog} [options] [FILE]

Move the cursor with arrow keys, PAGE UP/PAGE DOWN and HOME/END. Ctrl-Q quits.

Set KILO_LOG environment variable (e.g. KILO_LOG=debug) and redirect stderr to enable logging.",
        prog = program
    );
    println!("{}", opts.usage(&description));
}

fn edit(raw: &mut StdinRawMode, watcher: TerminationWatcher, buf: TextBuffer) -> Result<()> {
    let mut output = terminal_output()?;
    let size = window_size(term_size::dimensions_stdout(), raw, &mut output)?;

    let mut editor = Editor::new(InputSequences::new(raw), output, size, buf);
    editor.watch_termination(watcher);
    editor.edit()
}

fn run(file: Option<String>) -> Result<()> {
    let buf = match file {
        Some(path) => TextBuffer::open(path)?,
        None => TextBuffer::empty(),
    };

    // Handlers are in place before the terminal enters raw mode so that a signal arriving
    // in between cannot kill the process with the terminal left raw
    let watcher = TerminationWatcher::new()?;
    let mut raw = StdinRawMode::new()?;
    let result = edit(&mut raw, watcher, buf);
    if let Err(err) = &result {
        if !matches!(err, Error::Terminated) {
            // Do not leave a half drawn screen behind the error message
            let mut stdout = io::stdout();
            if stdout.write_all(b"\x1b[2J\x1b[H").and_then(|_| stdout.flush()).is_err() {
                log::debug!("Could not clear screen on error");
            }
        }
    }
    // Terminal must be restored before reporting any error
    let restored = raw.disable();
    result.and(restored)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("KILO_LOG", "off")).init();

    let mut argv = env::args();
    let program = argv.next().unwrap_or_else(|| "kilo".to_string());

    let mut opts = Options::new();
    opts.optflag("v", "version", "Print version");
    opts.optflag("h", "help", "Print this help");

    let matches = match opts.parse(argv) {
        Ok(m) => m,
        Err(fail) => {
            eprintln!("{}", Error::Usage(fail.to_string()));
            exit(1);
        }
    };

    if matches.opt_present("v") {
        println!("{}", VERSION);
        return;
    }

    if matches.opt_present("h") {
        print_help(&program, opts);
        return;
    }

    if matches.free.len() > 1 {
        eprintln!(
            "{}",
            Error::Usage(format!("Only one file can be opened but got {}", matches.free.len()))
        );
        exit(1);
    }

    let file = matches.free.into_iter().next();
    if let Err(err) = run(file) {
        log::error!("{}", err);
        eprintln!("{}: {}", program, err);
        exit(1);
    }

    log::debug!("Exited normally");
}
