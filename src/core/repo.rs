//! Repository entry helpers

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::core::config::RepoEntry;

static ENV_VAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))")
        .expect("hardcoded regex must be valid")
});

/// Expand a configured clone URL into something git can use.
///
/// `$VAR` and `${VAR}` are replaced from the environment (unknown variables
/// are left as written), a leading `~` becomes the home directory, and
/// Windows backslashes are turned into forward slashes.
pub fn expand_url(url: &str) -> String {
    expand_url_with(url, |name| std::env::var(name).ok(), dirs::home_dir())
}

fn expand_url_with<F>(url: &str, lookup: F, home: Option<PathBuf>) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let expanded = ENV_VAR.replace_all(url, |caps: &regex::Captures| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        lookup(name).unwrap_or_else(|| caps[0].to_string())
    });

    let mut url = expanded.into_owned();
    if let Some(rest) = url.strip_prefix('~') {
        if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') {
            if let Some(home) = home {
                url = format!("{}{}", home.display(), rest);
            }
        }
    }

    url.replace("\\\\", "\\").replace('\\', "/")
}

/// Absolute working copy path of an entry under `top_dir`
pub fn repo_path(top_dir: &Path, entry: &RepoEntry) -> PathBuf {
    top_dir.join(entry.dir_name())
}

/// Effective directory names of the enabled entries, in config order
pub fn enabled_dir_names<'a, I>(repos: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a RepoEntry>,
{
    repos
        .into_iter()
        .filter(|r| r.enable)
        .map(|r| r.dir_name().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_plain_urls_unchanged() {
        let url = "https://github.com/sarnold/pyserv.git";
        assert_eq!(expand_url_with(url, no_env, None), url);
        let path = "/home/user/src/repolite/tests/testdata/porky";
        assert_eq!(expand_url_with(path, no_env, None), path);
    }

    #[test]
    fn test_backslashes_normalized() {
        let url = "D:\\a\\repolite\\repolite\\tests\\testdata\\daffy";
        assert_eq!(
            expand_url_with(url, no_env, None),
            "D:/a/repolite/repolite/tests/testdata/daffy"
        );
    }

    #[test]
    fn test_env_vars_expanded() {
        let lookup = |name: &str| match name {
            "SRC" => Some("/srv/git".to_string()),
            _ => None,
        };
        assert_eq!(
            expand_url_with("$SRC/daffy.git", lookup, None),
            "/srv/git/daffy.git"
        );
        assert_eq!(
            expand_url_with("${SRC}/porky.git", lookup, None),
            "/srv/git/porky.git"
        );
        assert_eq!(
            expand_url_with("$NOPE/porky.git", lookup, None),
            "$NOPE/porky.git"
        );
    }

    #[test]
    fn test_home_expanded() {
        let home = Some(PathBuf::from("/home/user"));
        assert_eq!(
            expand_url_with("~/src/daffy", no_env, home.clone()),
            "/home/user/src/daffy"
        );
        // ~user forms are left alone
        assert_eq!(expand_url_with("~other/daffy", no_env, home), "~other/daffy");
    }

    #[test]
    fn test_enabled_dir_names() {
        let mut porky = RepoEntry::new("porky", "porky");
        porky.alias = Some("pig".to_string());
        let mut elmer = RepoEntry::new("elmer", "elmer");
        elmer.enable = false;
        let repos = vec![RepoEntry::new("daffy", "daffy"), porky, elmer];
        assert_eq!(enabled_dir_names(&repos), vec!["daffy", "pig"]);
        assert_eq!(
            repo_path(Path::new("/ext"), &repos[1]),
            PathBuf::from("/ext/pig")
        );
    }
}
