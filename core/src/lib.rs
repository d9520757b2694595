use std::time::Duration;

pub mod api;
pub mod config;
pub mod draft;
pub mod entity;
pub mod errors;
pub mod field;
pub mod listing;
pub mod logger;
pub mod selection;
pub mod session;
pub mod slug;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

/// Get the config directory for distro.
///
/// | Platform | Value                                                      |
/// | -------- | ---------------------------------------------------------- |
/// | Linux    | `$XDG_CONFIG_HOME/distro` or `$HOME/.config/distro`        |
/// | macOS    | `$HOME/Library/Application Support/distro`                 |
/// | Windows  | `{FOLDERID_RoamingAppData}\distro\config`                  |
///
/// # Errors
///
/// This function will return an error if the config directory cannot be found.
pub fn get_config_dir() -> Result<std::path::PathBuf, errors::DirectoryError> {
    directories::ProjectDirs::from("", "", "distro")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(errors::DirectoryError::Config)
}

/// Get the data directory for distro, where logs are written by default.
///
/// | Platform | Value                                                      |
/// | -------- | ---------------------------------------------------------- |
/// | Linux    | `$XDG_DATA_HOME/distro` or `$HOME/.local/share/distro`     |
/// | macOS    | `$HOME/Library/Application Support/distro`                 |
/// | Windows  | `{FOLDERID_RoamingAppData}\distro\data`                    |
///
/// # Errors
///
/// This function will return an error if the data directory cannot be found.
pub fn get_data_dir() -> Result<std::path::PathBuf, errors::DirectoryError> {
    directories::ProjectDirs::from("", "", "distro")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(errors::DirectoryError::Data)
}

/// Format a duration as `hh:mm:ss.mmm`, used to timestamp log lines.
#[must_use]
pub fn format_duration(duration: &Duration) -> String {
    let total_millis = duration.as_millis();
    let millis = total_millis % 1000;
    let seconds = (total_millis / 1000) % 60;
    let minutes = (total_millis / 60_000) % 60;
    let hours = total_millis / 3_600_000;

    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Duration::from_secs(0), "00:00:00.000")]
    #[case(Duration::from_millis(1_234), "00:00:01.234")]
    #[case(Duration::from_secs(61), "00:01:01.000")]
    #[case(Duration::from_secs(3_600 + 59 * 60 + 59), "01:59:59.000")]
    #[case(Duration::from_secs(100 * 3_600), "100:00:00.000")]
    fn test_format_duration(#[case] duration: Duration, #[case] expected: &str) {
        assert_eq!(format_duration(&duration), expected);
    }

    #[test]
    fn test_dirs_are_namespaced() {
        // not every CI box has a home directory, only check what we can find
        if let Ok(dir) = get_config_dir() {
            assert!(dir.to_string_lossy().contains("distro"));
        }
        if let Ok(dir) = get_data_dir() {
            assert!(dir.to_string_lossy().contains("distro"));
        }
    }
}
