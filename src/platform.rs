//! Host operating system detection.

use crate::error::{BuildError, Result};
use once_cell::sync::OnceCell;
use std::fmt;

/// The operating system family the orchestrator is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
}

impl Platform {
    pub fn is_linux(self) -> bool {
        self == Platform::Linux
    }

    pub fn is_macos(self) -> bool {
        self == Platform::MacOs
    }

    pub fn is_windows(self) -> bool {
        self == Platform::Windows
    }

    /// Linux and macOS share the native build and packaging path.
    pub fn is_unix(self) -> bool {
        !self.is_windows()
    }

    /// Extension of the shared library produced by the native build.
    pub fn shared_library_extension(self) -> &'static str {
        match self {
            Platform::Linux => "so",
            Platform::MacOs => "dylib",
            Platform::Windows => "dll",
        }
    }

    pub fn executable_suffix(self) -> &'static str {
        if self.is_windows() {
            ".exe"
        } else {
            ""
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Linux => "Linux",
            Platform::MacOs => "macOS",
            Platform::Windows => "Windows",
        };
        f.write_str(name)
    }
}

/// Why the OS query could not name the OS family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The query mechanism itself does not exist on this runtime.
    Unavailable,
    /// The query ran but reported a family we do not build for.
    Unsupported(String),
}

/// Source of the OS family identifier.
pub trait OsQuery {
    fn os_family(&self) -> std::result::Result<&str, QueryError>;
}

/// Reports the OS the binary was compiled for.
pub struct HostOs;

impl OsQuery for HostOs {
    fn os_family(&self) -> std::result::Result<&str, QueryError> {
        Ok(std::env::consts::OS)
    }
}

static PLATFORM: OnceCell<Platform> = OnceCell::new();

/// Detect the host platform, caching the result for the rest of the process.
pub fn detect() -> Result<Platform> {
    PLATFORM.get_or_try_init(|| detect_with(&HostOs)).copied()
}

/// Uncached detection through an explicit OS query.
///
/// An unavailable OS query falls back to Windows: the only runtimes lacking the
/// query are legacy Windows-only ones. Every other failure is returned.
pub fn detect_with(query: &dyn OsQuery) -> Result<Platform> {
    match query.os_family() {
        Ok("linux") => Ok(Platform::Linux),
        Ok("macos") => Ok(Platform::MacOs),
        Ok("windows") => Ok(Platform::Windows),
        Ok(other) => Err(BuildError::UnsupportedOs(other.to_string())),
        Err(QueryError::Unavailable) => Ok(Platform::Windows),
        Err(QueryError::Unsupported(name)) => Err(BuildError::UnsupportedOs(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(std::result::Result<&'static str, QueryError>);

    impl OsQuery for Fixed {
        fn os_family(&self) -> std::result::Result<&str, QueryError> {
            self.0.clone()
        }
    }

    fn flags(p: Platform) -> [bool; 3] {
        [p.is_linux(), p.is_macos(), p.is_windows()]
    }

    #[test]
    fn every_family_sets_exactly_one_flag() {
        for (name, expected) in [
            ("linux", Platform::Linux),
            ("macos", Platform::MacOs),
            ("windows", Platform::Windows),
        ] {
            let platform = detect_with(&Fixed(Ok(name))).unwrap();
            assert_eq!(platform, expected);
            assert_eq!(flags(platform).iter().filter(|f| **f).count(), 1);
        }
    }

    #[test]
    fn unavailable_os_query_falls_back_to_windows() {
        let platform = detect_with(&Fixed(Err(QueryError::Unavailable))).unwrap();
        assert!(platform.is_windows());
        assert!(!platform.is_unix());
    }

    #[test]
    fn unsupported_family_propagates() {
        let err = detect_with(&Fixed(Ok("freebsd"))).unwrap_err();
        assert!(matches!(err, BuildError::UnsupportedOs(ref os) if os == "freebsd"));

        let err = detect_with(&Fixed(Err(QueryError::Unsupported("haiku".into())))).unwrap_err();
        assert!(err.to_string().contains("haiku"));
    }

    #[test]
    fn detect_is_stable_across_calls() {
        if let Ok(first) = detect() {
            for _ in 0..3 {
                assert_eq!(detect().unwrap(), first);
            }
        }
    }

    #[test]
    fn library_extension_follows_family() {
        assert_eq!(Platform::Linux.shared_library_extension(), "so");
        assert_eq!(Platform::MacOs.shared_library_extension(), "dylib");
    }
}
