use std::ffi::OsString;

use wmisc::{BufferSizes, CommandLine, DebugSink, HexDump};

fn main() {
    // Log lines go to the debugger on Windows, stderr elsewhere.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(DebugSink::system)
        .init();

    match run() {
        Ok(()) => {}
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let sizes = BufferSizes::default();

    let args = CommandLine::current()?;
    for (i, arg) in args.iter().enumerate() {
        println!("argv[{}] = {}", i, arg.to_string_lossy());
    }

    let module = wmisc::module::current_file_path()?;
    tracing::info!(path = %module.display(), "resolved module path");
    println!("module: {}", module.display());

    let name = args.get(1).map(OsString::from).unwrap_or_else(|| "PATH".into());
    let probed = wmisc::env::var(&name)?;
    let guessed = wmisc::env::var_speculative(&name, sizes.environment)?;

    println!(
        "{}: {} units, strategies {}",
        name.to_string_lossy(),
        probed.len(),
        if probed == guessed { "agree" } else { "DISAGREE" }
    );

    let bytes = probed.to_string_lossy().into_owned().into_bytes();
    print!("{}", HexDump::new(&bytes));

    Ok(())
}
