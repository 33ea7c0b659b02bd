use log::debug;
use serde::Serialize;

#[derive(Serialize)]
struct BuildInfo {
    version: &'static str,
    timestamp: &'static str,
    opt_level: &'static str,
    target_triple: &'static str,
    rustc: &'static str,
}

pub fn emit_build_information() {
    let build_info = BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        timestamp: env!("VERGEN_BUILD_TIMESTAMP"),
        opt_level: env!("VERGEN_CARGO_OPT_LEVEL"),
        target_triple: env!("VERGEN_CARGO_TARGET_TRIPLE"),
        rustc: env!("VERGEN_RUSTC_SEMVER"),
    };
    match serde_yaml::to_string(&build_info) {
        Ok(text) => debug!("Build information:\n{}", text),
        Err(e) => debug!("Could not serialize build information: {}", e),
    }
}
