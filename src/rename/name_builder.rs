/// Series prefix used when none is configured
pub const DEFAULT_SERIES_PREFIX: &str = "Detective Conan";

/// Zero-pad an episode number to at least three digits
pub fn format_episode_number(number: u32) -> String {
    format!("{:03}", number)
}

/// Build the destination file name:
/// `<prefix> <NNN> - <title><extension>`.
///
/// `extension` is appended verbatim, dot included, so `.MKV` stays `.MKV`.
/// `title` is expected to be normalized already.
pub fn build_episode_name(prefix: &str, number: u32, title: &str, extension: &str) -> String {
    let prefix = prefix.trim();
    let number = format_episode_number(number);

    if prefix.is_empty() {
        format!("{} - {}{}", number, title, extension)
    } else {
        format!("{} {} - {}{}", prefix, number, title, extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_episode_number() {
        assert_eq!(format_episode_number(1), "001");
        assert_eq!(format_episode_number(42), "042");
        assert_eq!(format_episode_number(999), "999");
        assert_eq!(format_episode_number(1032), "1032");
    }

    #[test]
    fn test_build_episode_name() {
        assert_eq!(
            build_episode_name(
                DEFAULT_SERIES_PREFIX,
                1,
                "Tantei wa Mou, Shindeiru - Part 1",
                ".mkv"
            ),
            "Detective Conan 001 - Tantei wa Mou, Shindeiru - Part 1.mkv"
        );
    }

    #[test]
    fn test_extension_is_verbatim() {
        assert_eq!(
            build_episode_name("Conan", 12, "Title", ".MP4"),
            "Conan 012 - Title.MP4"
        );
        assert_eq!(build_episode_name("Conan", 12, "Title", ""), "Conan 012 - Title");
    }

    #[test]
    fn test_empty_prefix() {
        assert_eq!(build_episode_name("  ", 7, "Title", ".mkv"), "007 - Title.mkv");
    }
}
