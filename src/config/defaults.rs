//! Default configuration values

/// Build tool invoked for each recipe
pub const DEFAULT_BUILD_TOOL: &str = "abuild";

/// Arguments passed to the build tool: install deps, no colors
pub const BUILD_TOOL_ARGS: &[&str] = &["-r", "-m"];

/// Environment variable telling the build tool where repositories live
pub const REPODEST_ENV: &str = "REPODEST";

/// Recipe definition file inside each recipe directory
pub const RECIPE_FILE: &str = "APKBUILD";

/// Staging directory left behind by an unfinished build
pub const STAGING_DIR: &str = "src";

/// Packaged artifact suffix
pub const ARTIFACT_SUFFIX: &str = ".apk";

/// Log file suffix
pub const LOG_SUFFIX: &str = ".log";

/// Program that writes the repository index
pub const INDEX_TOOL: &str = "apk";

/// Program that signs the repository index
pub const SIGN_TOOL: &str = "abuild-sign";

/// Repository index file name
pub const INDEX_FILE: &str = "APKINDEX.tar.gz";

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;

/// Map a Rust target architecture to the Alpine architecture name
pub fn alpine_arch(rust_arch: &str) -> &str {
    match rust_arch {
        "arm" => "armv7",
        "powerpc64" => "ppc64le",
        "loongarch64" => "loongarch64",
        other => other,
    }
}

/// Alpine architecture of the host
pub fn host_arch() -> &'static str {
    alpine_arch(std::env::consts::ARCH)
}
