//! Path filtering applied to patch pairs before they enter history.

use crate::patch::{Patch, PatchPair, PathKey};

fn has_prefix(prefix: &[PathKey], path: &[PathKey]) -> bool {
    prefix.len() <= path.len() && prefix.iter().zip(path).all(|(a, b)| a == b)
}

/// Whether a patch at `path` should be recorded.
///
/// A path under any `exclude` prefix is dropped. When `include` is given,
/// the path must additionally sit under one of its prefixes.
pub fn is_path_included(
    path: &[PathKey],
    exclude: &[Vec<PathKey>],
    include: Option<&[Vec<PathKey>]>,
) -> bool {
    if exclude.iter().any(|prefix| has_prefix(prefix, path)) {
        return false;
    }

    match include {
        Some(prefixes) => prefixes.iter().any(|prefix| has_prefix(prefix, path)),
        None => true,
    }
}

/// Filter both lists of a pair independently.
pub fn filter_patches<V>(
    pair: PatchPair<V>,
    exclude: &[Vec<PathKey>],
    include: Option<&[Vec<PathKey>]>,
) -> PatchPair<V> {
    if exclude.is_empty() && include.is_none() {
        return pair;
    }

    let keep = |patch: &Patch<V>| is_path_included(&patch.path, exclude, include);
    PatchPair {
        forward: pair.forward.into_iter().filter(|p| keep(p)).collect(),
        inverse: pair.inverse.into_iter().filter(|p| keep(p)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    #[test]
    fn test_exclude_prefix_drops_nested_paths() {
        let exclude = vec![path!["selection"]];
        assert!(!is_path_included(&path!["selection", "id"], &exclude, None));
        assert!(!is_path_included(&path!["selection"], &exclude, None));
        assert!(is_path_included(&path!["pages", 0usize], &exclude, None));
    }

    #[test]
    fn test_longer_exclude_does_not_match_shorter_path() {
        let exclude = vec![path!["pages", 0usize, "layout"]];
        assert!(is_path_included(&path!["pages", 0usize], &exclude, None));
    }

    #[test]
    fn test_include_restricts_to_listed_prefixes() {
        let include = vec![path!["pages"]];
        assert!(is_path_included(
            &path!["pages", 1usize, "body", "x"],
            &[],
            Some(&include)
        ));
        assert!(!is_path_included(&path!["config"], &[], Some(&include)));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let include = vec![path!["pages"]];
        let exclude = vec![path!["pages", 0usize, "layout"]];
        assert!(!is_path_included(
            &path!["pages", 0usize, "layout"],
            &exclude,
            Some(&include)
        ));
    }

    #[test]
    fn test_filter_patches_filters_each_list_on_its_own() {
        let pair = PatchPair::new(
            vec![
                Patch::replace(path!["currentPageIndex"], 1u32),
                Patch::add(path!["pages", 1usize], 7),
            ],
            vec![Patch::replace(path!["currentPageIndex"], 0u32)],
        );
        let filtered = filter_patches(pair, &[path!["currentPageIndex"]], None);
        assert_eq!(filtered.forward.len(), 1);
        assert_eq!(filtered.forward[0].path, path!["pages", 1usize]);
        assert!(filtered.inverse.is_empty());
    }
}
