//! Output-location containment.
//!
//! Containment is decided on resolved absolute paths compared component by
//! component, so `/out-evil/x.json` is not inside `/out`. Paths are resolved
//! one component at a time: every prefix that exists on disk is
//! canonicalized before the next component is applied, so a `..` after a
//! symlink climbs out of the link's target exactly as the filesystem would.
//! Components past the last existing directory are applied lexically.

use std::path::{Component, Path, PathBuf};

/// Resolve `path` to an absolute form without requiring it to exist.
pub fn resolve(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `out` is canonical wherever it exists, so this is the real parent.
                // `..` at the root stays at the root.
                out.pop();
            }
            other => {
                out.push(other.as_os_str());
                if let Ok(canonical) = out.canonicalize() {
                    out = canonical;
                }
            }
        }
    }
    out
}

/// True if `target` lies strictly inside `dir` once both are resolved.
pub fn is_within(target: &Path, dir: &Path) -> bool {
    let target = resolve(target);
    let dir = resolve(dir);
    target != dir && target.starts_with(&dir)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{is_within, resolve};

    #[test]
    fn file_directly_inside_is_within() {
        assert!(is_within(Path::new("/out/a_analysis.json"), Path::new("/out")));
        assert!(is_within(Path::new("/out/sub/a_analysis.json"), Path::new("/out/")));
    }

    #[test]
    fn sibling_with_shared_prefix_is_outside() {
        assert!(!is_within(Path::new("/out-evil/a.json"), Path::new("/out")));
        assert!(!is_within(Path::new("/outputs/a.json"), Path::new("/out")));
    }

    #[test]
    fn traversal_is_resolved_before_comparison() {
        assert!(!is_within(Path::new("/out/../etc/a.json"), Path::new("/out")));
        assert!(is_within(Path::new("/out/./x/../a.json"), Path::new("/out")));
    }

    #[test]
    fn the_directory_itself_is_not_inside() {
        assert!(!is_within(Path::new("/out"), Path::new("/out")));
    }

    #[test]
    fn relative_paths_resolve_against_cwd() {
        let cwd = std::env::current_dir().unwrap().canonicalize().unwrap();
        assert_eq!(resolve(Path::new("a/b.json")), cwd.join("a/b.json"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_output_dir_matches_real_target() {
        let tmp = tempfile::tempdir().unwrap();
        let real = tmp.path().join("real");
        std::fs::create_dir(&real).unwrap();
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        assert!(is_within(&real.join("a_analysis.json"), &link));
        assert!(is_within(&link.join("a_analysis.json"), &real));
    }

    /// `link/..` climbs out of the link's target, not back to the link's parent.
    #[cfg(unix)]
    #[test]
    fn parent_of_symlink_resolves_through_link_target() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        let deep = tmp.path().join("elsewhere").join("deep");
        std::fs::create_dir(&out).unwrap();
        std::fs::create_dir_all(&deep).unwrap();
        std::os::unix::fs::symlink(&deep, out.join("link")).unwrap();

        let escape = out.join("link").join("..").join("x_analysis.json");
        assert!(!is_within(&escape, &out));
        assert_eq!(
            resolve(&escape),
            tmp.path().canonicalize().unwrap().join("elsewhere").join("x_analysis.json")
        );

        let detour = out
            .join("missing")
            .join("..")
            .join("link")
            .join("..")
            .join("y_analysis.json");
        assert!(!is_within(&detour, &out));

        assert!(is_within(&out.join("link").join("z_analysis.json"), tmp.path()));
        assert!(is_within(&out.join("sub").join("..").join("a_analysis.json"), &out));
    }
}
