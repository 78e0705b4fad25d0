use clap::Parser;
use resume_submit::cli;

fn main() {
    let args = match cli::Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // A failed write to stderr leaves nothing else to report to.
            let _ = err.print();
            // Not err.exit(): usage errors exit 1 like every other failure, not clap's 2.
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };
    if let Err(err) = cli::dispatch(args) {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}
