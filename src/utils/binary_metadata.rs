use crate::defaults::SUPERVISOR_NAME;

pub(crate) const RUST_VERSION: &str = env!("CARGO_PKG_RUST_VERSION");
pub(crate) const VERSION: &str = konst::option::unwrap_or!(
    option_env!("BACKEND_SUPERVISOR_VERSION"),
    env!("CARGO_PKG_VERSION")
);
pub(crate) const GIT_COMMIT: &str =
    konst::option::unwrap_or!(option_env!("GIT_COMMIT"), "development");

pub fn binary_metadata() -> String {
    format!("{SUPERVISOR_NAME} Version: {VERSION}, Rust Version: {RUST_VERSION}, GitCommit: {GIT_COMMIT}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_contains_versions() {
        let metadata = binary_metadata();
        assert!(metadata.starts_with("backend-supervisor Version: "));
        assert!(metadata.contains(VERSION));
        assert!(metadata.contains(GIT_COMMIT));
    }
}
