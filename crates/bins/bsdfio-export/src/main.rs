//! `bsdfio`: generates, converts and reduces tabular BRDF files.

mod cli;

fn main() {
    let (args, launch_time) = base::cli::parse_args::<cli::CliArgs>("bsdfio");

    base::cli::setup_logging(
        args.common.log_timestamp.then_some(launch_time),
        args.common.effective_log_level(),
        &[],
    );

    std::process::exit(match cli::run(args) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("{} {}", cli::ansi::RED_EXCLAMATION, err);
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  {} {}", cli::ansi::CYAN_MINUS, cause);
                source = cause.source();
            }
            1
        }
    })
}
