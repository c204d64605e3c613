//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// One-line version banner, e.g. `wasteland 0.1.0 (2026-10-18 a1b2c3d)`.
pub fn version_line() -> String {
    let mut line = format!(
        "{} {} ({} {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        BUILD_DATE,
        BUILD_COMMIT
    );
    if BUILD_PROFILE != "release" {
        line.push_str(&format!(" [{}]", BUILD_PROFILE));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_commit_format() {
        // 7 chars or "unknown"
        assert!(BUILD_COMMIT == "unknown" || BUILD_COMMIT.len() == 7);
    }

    #[test]
    fn test_version_line_names_package() {
        let line = version_line();
        assert!(line.starts_with("wasteland "));
        assert!(line.contains(BUILD_DATE));
    }
}
