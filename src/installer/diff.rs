use std::collections::HashSet;
use std::hash::Hash;

use crate::models::manifest::ManifestEntry;
use crate::models::mod_ref::ModReference;

/// Entries whose key appears in exactly one of `a` and `b`.
///
/// Keys only in `a` come first in `a`'s order, then keys only in `b` in `b`'s
/// order. Each key is emitted once, represented by its first entry.
pub fn symmetric_difference<T, K, F>(a: &[T], b: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let keys_a: HashSet<K> = a.iter().map(&key).collect();
    let keys_b: HashSet<K> = b.iter().map(&key).collect();
    let mut emitted = HashSet::new();

    let only_a = a.iter().filter(|item| !keys_b.contains(&key(*item)));
    let only_b = b.iter().filter(|item| !keys_a.contains(&key(*item)));

    only_a
        .chain(only_b)
        .filter(|item| emitted.insert(key(*item)))
        .cloned()
        .collect()
}

/// Modlists are compared by display name.
pub fn diff_modlists(a: &[ModReference], b: &[ModReference]) -> Vec<ModReference> {
    symmetric_difference(a, b, |m| m.display_name.clone())
}

/// Manifests are compared by file id, so a version bump of a mod shows up as
/// both the old and the new file.
pub fn diff_manifests(a: &[ManifestEntry], b: &[ManifestEntry]) -> Vec<ManifestEntry> {
    symmetric_difference(a, b, |f| f.file_id)
}

/// A mod jar file name split into a mod name and a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jar {
    pub mod_name: String,
    pub version: String,
}

impl Jar {
    /// Lower-cases `file_name`, drops everything from the last `.jar`, and
    /// splits at the first `-`, else the first space, else the first `_`.
    /// Without a separator the whole stem is both name and version.
    pub fn parse(file_name: &str) -> Self {
        let lower = file_name.to_lowercase();
        let stem = match lower.rfind(".jar") {
            Some(end) => &lower[..end],
            None => lower.as_str(),
        };
        let separator = stem.find('-').or_else(|| stem.find(' ')).or_else(|| stem.find('_'));
        match separator {
            Some(at) => Self {
                mod_name: stem[..at].to_string(),
                version: stem[at + 1..].to_string(),
            },
            None => Self {
                mod_name: stem.to_string(),
                version: stem.to_string(),
            },
        }
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.mod_name, self.version)
    }
}

/// A jar of the first directory with no identical jar in the second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JarMismatch {
    pub jar: Jar,
    /// The last jar of the second directory whose name prefixes this one.
    pub candidate: Option<Jar>,
}

/// Jars of `a` that have no jar in `b` with the same name and version.
///
/// A jar of `b` is a candidate when its name is a prefix of the jar's name.
pub fn compare_jars(a: &[Jar], b: &[Jar]) -> Vec<JarMismatch> {
    let mut mismatches = Vec::new();
    'jars: for jar in a {
        let mut candidate = None;
        for other in b.iter().filter(|other| jar.mod_name.starts_with(&other.mod_name)) {
            if other == jar {
                continue 'jars;
            }
            candidate = Some(other.clone());
        }
        mismatches.push(JarMismatch {
            jar: jar.clone(),
            candidate,
        });
    }
    mismatches
}
