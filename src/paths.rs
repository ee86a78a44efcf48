//! Pure path helpers for grouping changed files and naming the temp
//! revisions of an open diff.

use std::path::PathBuf;

/// Prefix for the left ("previous") revision temp file.
const LEFT_DIFF_PREFIX: &str = "version2";
/// Prefix for the right ("changeset") revision temp file.
const RIGHT_DIFF_PREFIX: &str = "version1";

/// Longest shared slash-delimited directory prefix across all paths, with a
/// trailing slash per matched segment.
///
/// The first path drives the iteration and its last segment (the file name)
/// is never part of the prefix, so a single input yields its directory. An
/// empty input or mismatched first segments yield `""`.
pub fn common_prefix(paths: &[String]) -> String {
    let mut common = String::new();

    let folders: Vec<Vec<&str>> = paths.iter().map(|p| p.split('/').collect()).collect();
    let Some(first) = folders.first() else {
        return common;
    };

    for (index, segment) in first.iter().take(first.len().saturating_sub(1)).enumerate() {
        let all_matched = folders
            .iter()
            .all(|f| f.get(index).is_some_and(|s| s == segment));
        if !all_matched {
            break;
        }
        common.push_str(segment);
        common.push('/');
    }

    common
}

/// The set of first slash-delimited segments, taken only from paths with
/// more than one segment. Files sitting directly at the root contribute
/// nothing. Insertion order of first appearance is preserved.
pub fn distinct_first_segments(paths: &[String]) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();

    for path in paths {
        let mut split = path.split('/');
        if let (Some(first), Some(_)) = (split.next(), split.next())
            && !segments.iter().any(|s| s == first)
        {
            segments.push(first.to_string());
        }
    }

    segments
}

/// The final slash-delimited fragment of a path or ref name.
pub fn last_path_fragment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Temp path for the left ("previous") revision of a file diff.
pub fn left_diff_path(file_name_fragment: &str) -> PathBuf {
    left_diff_path_in(&std::env::temp_dir(), file_name_fragment)
}

/// Temp path for the right ("changeset") revision of a file diff.
pub fn right_diff_path(file_name_fragment: &str) -> PathBuf {
    right_diff_path_in(&std::env::temp_dir(), file_name_fragment)
}

pub fn left_diff_path_in(base: &std::path::Path, file_name_fragment: &str) -> PathBuf {
    base.join(format!("{LEFT_DIFF_PREFIX}{file_name_fragment}"))
}

pub fn right_diff_path_in(base: &std::path::Path, file_name_fragment: &str) -> PathBuf {
    base.join(format!("{RIGHT_DIFF_PREFIX}{file_name_fragment}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    mod common_prefix_tests {
        use super::*;

        #[test]
        fn shared_directory_is_returned_with_trailing_slash() {
            let prefix = common_prefix(&paths(&["src/a.ts", "src/b/c.ts"]));
            assert_eq!(prefix, "src/");
        }

        #[test]
        fn prefix_is_maximal_across_all_inputs() {
            let inputs = paths(&[
                "services/api/handlers/get.rs",
                "services/api/handlers/post.rs",
                "services/api/routes.rs",
            ]);
            assert_eq!(common_prefix(&inputs), "services/api/");
        }

        #[test]
        fn mismatched_first_segments_return_empty() {
            let prefix = common_prefix(&paths(&["src/a.ts", "docs/readme.md"]));
            assert_eq!(prefix, "");
        }

        #[test]
        fn single_path_returns_all_but_last_segment() {
            let prefix = common_prefix(&paths(&["src/util/math.ts"]));
            assert_eq!(prefix, "src/util/");
        }

        #[test]
        fn empty_input_returns_empty() {
            assert_eq!(common_prefix(&[]), "");
        }

        #[test]
        fn prefix_is_a_leading_substring_of_every_input() {
            let inputs = paths(&["a/b/c/d.rs", "a/b/x.rs", "a/b/c/e.rs"]);
            let prefix = common_prefix(&inputs);
            assert_eq!(prefix, "a/b/");
            for input in &inputs {
                assert!(input.starts_with(&prefix));
            }
        }

        #[test]
        fn shorter_path_bounds_the_prefix() {
            let inputs = paths(&["a/b/c/d.rs", "a/e.rs"]);
            assert_eq!(common_prefix(&inputs), "a/");
        }
    }

    mod distinct_first_segments_tests {
        use super::*;

        #[test]
        fn collects_unique_leading_directories() {
            let segments = distinct_first_segments(&paths(&[
                "src/a.ts",
                "src/b/c.ts",
                "docs/readme.md",
            ]));
            assert_eq!(segments, vec!["src".to_string(), "docs".to_string()]);
        }

        #[test]
        fn root_level_files_contribute_nothing() {
            let segments = distinct_first_segments(&paths(&["a.ts", "src/b.ts"]));
            assert_eq!(segments, vec!["src".to_string()]);
        }

        #[test]
        fn empty_input_yields_empty_set() {
            assert!(distinct_first_segments(&[]).is_empty());
        }
    }

    mod diff_path_tests {
        use super::*;
        use std::path::Path;

        #[test]
        fn left_and_right_paths_never_collide_for_same_fragment() {
            let base = Path::new("/tmp");
            let left = left_diff_path_in(base, "math.ts");
            let right = right_diff_path_in(base, "math.ts");
            assert_ne!(left, right);
            assert_eq!(left, PathBuf::from("/tmp/version2math.ts"));
            assert_eq!(right, PathBuf::from("/tmp/version1math.ts"));
        }

        #[test]
        fn default_paths_live_in_the_temp_dir() {
            let left = left_diff_path("a.rs");
            assert!(left.starts_with(std::env::temp_dir()));
        }
    }

    #[test]
    fn last_path_fragment_takes_the_leaf() {
        assert_eq!(last_path_fragment("refs/heads/feature/login"), "login");
        assert_eq!(last_path_fragment("main"), "main");
    }
}
