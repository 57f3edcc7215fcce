use semver::Version;
use std::cmp::Ordering;

/// Whether `release` is strictly newer than `installed`.
///
/// Plugin headers often carry short versions (`1.2`, `3`); those are padded
/// with zeros before comparing. A leading `v` is ignored. Versions with more
/// than three numeric parts (`1.0.0.1`) are compared part by part, the
/// shorter side padded with zeros. A version that cannot be read on either
/// side never yields an update.
#[must_use]
pub fn is_newer_version(release: &str, installed: &str) -> bool {
    let release = normalize(release);
    let installed = normalize(installed);
    if let (Some(release), Some(installed)) = (parse_semver(release), parse_semver(installed)) {
        return release > installed;
    }
    match (numeric_parts(release), numeric_parts(installed)) {
        (Some(release), Some(installed)) => compare_parts(&release, &installed).is_gt(),
        _ => false,
    }
}

/// Numeric dot-separated parts of a version, ignoring any `-`/`+` suffix.
fn numeric_parts(version: &str) -> Option<Vec<u64>> {
    let (core, _) = split_core_and_suffix(version);
    core.split('.').map(|part| part.parse::<u64>().ok()).collect()
}

fn compare_parts(left: &[u64], right: &[u64]) -> Ordering {
    let len = left.len().max(right.len());
    (0..len)
        .map(|idx| {
            let left = left.get(idx).copied().unwrap_or(0);
            let right = right.get(idx).copied().unwrap_or(0);
            left.cmp(&right)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn normalize(version: &str) -> &str {
    let trimmed = version.trim();
    trimmed.strip_prefix('v').unwrap_or(trimmed)
}

fn parse_semver(version: &str) -> Option<Version> {
    if let Ok(parsed) = Version::parse(version) {
        return Some(parsed);
    }

    let (core, suffix) = split_core_and_suffix(version);
    let mut parts = core.split('.');
    let major = parts.next()?.parse::<u64>().ok()?;
    let minor = parts.next().map(str::parse::<u64>).transpose().ok()?;
    let patch = parts.next().map(str::parse::<u64>).transpose().ok()?;

    if parts.next().is_some() {
        return None;
    }

    let normalized = format!(
        "{major}.{}.{}{suffix}",
        minor.unwrap_or(0),
        patch.unwrap_or(0)
    );
    Version::parse(&normalized).ok()
}

fn split_core_and_suffix(version: &str) -> (&str, &str) {
    let suffix_idx = version.find(['-', '+']).unwrap_or(version.len());
    (&version[..suffix_idx], &version[suffix_idx..])
}

#[cfg(test)]
mod tests {
    use super::is_newer_version;

    #[test]
    fn same_version_is_not_an_update() {
        assert!(!is_newer_version("1.0.0", "1.0.0"));
        assert!(!is_newer_version("2.3", "2.3.0"));
        assert!(!is_newer_version("v1.4.2", "1.4.2"));
    }

    #[test]
    fn newer_release_is_an_update() {
        assert!(is_newer_version("1.0.1", "1.0.0"));
        assert!(is_newer_version("1.10.0", "1.9.9"));
        assert!(is_newer_version("2", "1.99.99"));
        assert!(is_newer_version("1.0.0", "1.0.0-beta.3"));
    }

    #[test]
    fn comparison_is_numeric_not_lexical() {
        assert!(is_newer_version("1.10.0", "1.2.0"));
        assert!(!is_newer_version("1.2.0", "1.10.0"));
    }

    #[test]
    fn older_release_is_not_an_update() {
        assert!(!is_newer_version("0.9.0", "1.0.0"));
        assert!(!is_newer_version("1.0.0-rc.1", "1.0.0"));
    }

    #[test]
    fn four_part_versions_compare_numerically() {
        assert!(is_newer_version("1.0.0.2", "1.0.0.1"));
        assert!(is_newer_version("1.0.1", "1.0.0.9"));
        assert!(!is_newer_version("1.0.0.1", "1.0.0.2"));
        assert!(!is_newer_version("1.0.0.9", "1.0.1"));
    }

    #[test]
    fn differently_padded_equal_versions_are_not_an_update() {
        assert!(!is_newer_version("1.0", "1.0.0.0"));
        assert!(!is_newer_version("2.1.0.0", "2.1"));
    }

    #[test]
    fn unreadable_versions_never_offer_an_update() {
        assert!(!is_newer_version("beta", "2.0.0"));
        assert!(!is_newer_version("1.0.0", ""));
        assert!(!is_newer_version("", "1.0.0"));
        assert!(!is_newer_version("custom", "custom"));
    }
}
