/// High-level command line app
mod app;
/// Definition of command-line args
mod args;
/// Job submission
mod exec;
/// Filesystem operations
mod fs;
/// Collecting the results of a finished sweep
mod post;
/// Structs for preparing the run directories of a sweep
mod prep;
/// Parallel efficiency reports
mod report;
/// Interpreted command-line settings
mod settings;
/// Text UI
mod ui;

// exported for tests:
pub use app::App;
pub use args::{Args, Command, PostArgs, RunArgs};
pub use settings::Settings;

/// Run the command-line app.
pub fn run() -> Result<(), anyhow::Error> {
    use clap::Parser;
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    simple_logging::log_to_stderr(log_level);

    // INTERPRET SETTINGS ///////////////
    let settings: Settings = args.try_into()?;

    // RUN THE THING /////////////////
    let app = App::new(settings);
    app.run()?;

    Ok(())
}
