pub mod cli;
pub mod error;
pub mod grid;
pub mod search;

/// dimensional analysis types
pub type Value = i32;
pub type Objective = f32;

/// initialize terminal logging. quiet mode suppresses the
/// per-depth statistics but keeps warnings and errors.
pub fn init(quiet: bool) {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let level = if quiet {
        log::LevelFilter::Warn
    } else {
        log::LevelFilter::Info
    };
    simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .expect("initialize logger");
}
