pub mod args;
pub mod session;
pub mod terminal;

mod commands;
pub use commands::run;

#[cfg(test)]
mod testing;

include!(concat!(env!("OUT_DIR"), "/", "version.rs"));

pub fn version() -> String {
    format!(
        "{} {} on branch '{}' (built on {})",
        env!("CARGO_PKG_VERSION"),
        GIT_REVISION,
        GIT_BRANCH,
        BUILD_TIME
    )
}
