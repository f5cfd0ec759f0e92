//! Directory listing and group partitioning.
//!
//! Files are sorted byte-lexicographically by name, filtered to `.pdf`,
//! and partitioned into maximal runs of consecutive entries sharing a
//! group name. The group name is the first two space-separated tokens of
//! the file name. Grouping is by adjacency, not a full partition-by-key:
//! same-named runs separated by another group stay separate groups.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File extension that participates in grouping.
const PDF_SUFFIX: &str = ".pdf";

/// A qualifying file from the scanned directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Full path to the file.
    pub path: PathBuf,
    /// Base file name.
    pub file_name: String,
    /// Derived group key: the first two space-separated tokens.
    pub group_name: String,
}

impl FileEntry {
    /// Builds an entry for a file name inside `dir`.
    #[must_use]
    pub fn new(dir: &Path, file_name: String) -> Self {
        let group_name = group_name_of(&file_name);
        Self {
            path: dir.join(&file_name),
            file_name,
            group_name,
        }
    }
}

/// Derives the group key from a file name: the first two tokens split on
/// a single space, re-joined with one space. A name without a space
/// groups under the whole name.
#[must_use]
pub fn group_name_of(file_name: &str) -> String {
    file_name.split(' ').take(2).collect::<Vec<_>>().join(" ")
}

/// An ordered, non-empty run of files sharing a group name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroup {
    /// Shared group name of the members.
    pub name: String,
    /// Members, in sorted listing order.
    pub files: Vec<FileEntry>,
}

/// Lists `dir`, sorts by name, filters to `.pdf`, and partitions into
/// contiguous groups.
///
/// Entries with non-UTF-8 names are skipped with a warning. An empty
/// directory (or one with no qualifying files) yields an empty vec.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if the directory cannot be read.
pub fn scan_groups(dir: impl AsRef<Path>) -> Result<Vec<FileGroup>> {
    let dir = dir.as_ref();

    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!(name = ?raw, "Skipping non-UTF-8 file name"),
        }
    }
    names.sort_unstable();

    let entries: Vec<FileEntry> = names
        .into_iter()
        .filter(|name| name.ends_with(PDF_SUFFIX))
        .map(|name| FileEntry::new(dir, name))
        .collect();

    let groups = group_entries(entries);
    debug!(dir = %dir.display(), groups = groups.len(), "Scanned directory");
    Ok(groups)
}

/// Partitions sorted entries into maximal runs of equal group names.
#[must_use]
pub fn group_entries(entries: Vec<FileEntry>) -> Vec<FileGroup> {
    let mut groups: Vec<FileGroup> = Vec::new();

    for entry in entries {
        match groups.last_mut() {
            Some(group) if group.name == entry.group_name => group.files.push(entry),
            _ => groups.push(FileGroup {
                name: entry.group_name.clone(),
                files: vec![entry],
            }),
        }
    }

    groups
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::fs::File;

    fn entries(names: &[&str]) -> Vec<FileEntry> {
        let dir = Path::new("/data/pdf");
        names
            .iter()
            .map(|n| FileEntry::new(dir, (*n).to_string()))
            .collect()
    }

    #[test]
    fn test_group_name_two_tokens() {
        assert_eq!(group_name_of("Team Alpha p1.pdf"), "Team Alpha");
    }

    #[test]
    fn test_group_name_single_token() {
        assert_eq!(group_name_of("report.pdf"), "report.pdf");
    }

    #[test]
    fn test_group_name_double_space_kept() {
        // Split is on single spaces, so a doubled space yields an empty
        // second token, matching the source behavior
        assert_eq!(group_name_of("Team  Alpha.pdf"), "Team ");
    }

    #[test]
    fn test_group_entries_contiguous_runs() {
        let groups = group_entries(entries(&[
            "Team Alpha p1.pdf",
            "Team Alpha p2.pdf",
            "Team Beta p1.pdf",
        ]));

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Team Alpha");
        assert_eq!(groups[0].files.len(), 2);
        assert_eq!(groups[1].name, "Team Beta");
        assert_eq!(groups[1].files.len(), 1);
    }

    #[test]
    fn test_non_contiguous_same_name_stays_split() {
        // Partitioning is by adjacency only: equal keys separated by a
        // different key are never merged back together
        let groups = group_entries(entries(&[
            "A report 1.pdf",
            "A x 1.pdf",
            "A report 2.pdf",
        ]));

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].name, "A report");
        assert_eq!(groups[1].name, "A x");
        assert_eq!(groups[2].name, "A report");
    }

    #[test]
    fn test_single_file_single_group() {
        let groups = group_entries(entries(&["Team Alpha p1.pdf"]));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].files.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_entries(Vec::new()).is_empty());
    }

    #[test]
    fn test_scan_groups_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "Team Beta p1.pdf",
            "Team Alpha p2.pdf",
            "Team Alpha p1.pdf",
            "notes.txt",
        ] {
            File::create(dir.path().join(name)).unwrap();
        }

        let groups = scan_groups(dir.path()).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Team Alpha");
        assert_eq!(
            groups[0]
                .files
                .iter()
                .map(|f| f.file_name.as_str())
                .collect::<Vec<_>>(),
            vec!["Team Alpha p1.pdf", "Team Alpha p2.pdf"]
        );
        assert_eq!(groups[1].name, "Team Beta");

        // The .txt file is invisible to grouping
        let all: Vec<_> = groups
            .iter()
            .flat_map(|g| g.files.iter())
            .map(|f| f.file_name.as_str())
            .collect();
        assert!(!all.contains(&"notes.txt"));
    }

    #[test]
    fn test_scan_groups_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_groups(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_scan_groups_non_pdf_does_not_break_adjacency() {
        // A .txt sorting between two same-group PDFs must not split the run
        let dir = tempfile::tempdir().unwrap();
        for name in ["Team Alpha a.pdf", "Team Alpha m.txt", "Team Alpha z.pdf"] {
            File::create(dir.path().join(name)).unwrap();
        }

        let groups = scan_groups(dir.path()).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].files.len(), 2);
    }

    fn arb_file_name() -> impl Strategy<Value = String> {
        let token = prop::sample::select(vec!["Team", "Dept", "A", "B"]);
        let second = prop::sample::select(vec!["Alpha", "Beta", "Gamma"]);
        let page = 1u8..6;
        let ext = prop::sample::select(vec![".pdf", ".txt"]);
        (token, second, page, ext).prop_map(|(t, s, p, e)| format!("{t} {s} p{p}{e}"))
    }

    proptest! {
        #[test]
        fn prop_concatenation_equals_filtered_sorted_input(
            names in prop::collection::vec(arb_file_name(), 0..20)
        ) {
            let mut sorted = names;
            sorted.sort_unstable();
            sorted.dedup();

            let filtered: Vec<FileEntry> = sorted
                .iter()
                .filter(|n| n.ends_with(".pdf"))
                .map(|n| FileEntry::new(Path::new("/p"), n.clone()))
                .collect();

            let groups = group_entries(filtered.clone());

            let flattened: Vec<FileEntry> =
                groups.iter().flat_map(|g| g.files.clone()).collect();
            prop_assert_eq!(flattened, filtered);
        }

        #[test]
        fn prop_groups_nonempty_and_adjacent_differ(
            names in prop::collection::vec(arb_file_name(), 0..20)
        ) {
            let mut sorted = names;
            sorted.sort_unstable();

            let filtered: Vec<FileEntry> = sorted
                .iter()
                .filter(|n| n.ends_with(".pdf"))
                .map(|n| FileEntry::new(Path::new("/p"), n.clone()))
                .collect();

            let groups = group_entries(filtered);

            for group in &groups {
                prop_assert!(!group.files.is_empty());
                for file in &group.files {
                    prop_assert_eq!(&file.group_name, &group.name);
                }
            }
            for pair in groups.windows(2) {
                prop_assert_ne!(&pair[0].name, &pair[1].name);
            }
        }
    }
}
