//! Configuration for the boolean expression compiler
//!
//! Two tiers: compile-time limits generated by `build.rs` from
//! `config/<profile>.toml`, and runtime preferences read from
//! `BOOLEXPR_*` environment variables.

// Generated at build time; provides `compile_time`, `BUILD_PROFILE`, `CONFIG_SOURCE`
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::RuntimeConfig;

/// Build information and configuration metadata
pub mod build_info {
    /// Profile the limits were generated from
    pub fn profile() -> &'static str {
        super::BUILD_PROFILE
    }

    /// TOML file the limits were generated from
    pub fn config_source() -> &'static str {
        super::CONFIG_SOURCE
    }

    pub fn source_info() -> String {
        format!("Generated from {} (profile: {})", config_source(), profile())
    }
}
