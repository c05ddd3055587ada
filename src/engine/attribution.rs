//! File attribution: derives the file axis from the commit stream.
//!
//! Commits bucket by hunk file path; a deleted/added hunk pair inside one
//! commit whose signed line signatures coincide is a rename, merging the
//! old bucket into the new one without comparing text (renames often
//! rewrite includes). Surviving buckets become file-path definitions
//! whose connections mirror their member commits, sorted into a stable
//! one-dimensional axis by mutual cosine similarity. Each symbol
//! definition then records the axis positions it is referenced from and
//! collapses them into its `file_vector` center of mass.

use std::collections::{HashMap, HashSet};

use crate::core::{ChangeKind, Cluster, Connection, Definition, Member};
use crate::engine::ingest::connection_weight;
use crate::engine::similarity::cosine;
use crate::engine::ClusterEngine;

struct FileBucket {
    path: String,
    commit_indices: Vec<usize>,
    history: Vec<String>,
}

impl ClusterEngine {
    /// Link each commit to the summary sharing its id
    pub(crate) fn link_commits(&mut self) {
        let by_id: HashMap<&str, usize> = self
            .summaries
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.as_str(), i))
            .collect();

        for commit in self.commits.iter_mut() {
            commit.summary_index = by_id.get(commit.id.as_str()).copied();
        }
    }

    pub(crate) fn attribute_files(&mut self) {
        let mut buckets: Vec<Option<FileBucket>> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        // Bucket commits by file path, first-seen order
        for (ci, commit) in self.commits.iter().enumerate() {
            for hunk in &commit.hunks {
                let slot = index.get(&hunk.file).copied().unwrap_or_else(|| {
                    let slot = buckets.len();
                    buckets.push(Some(FileBucket {
                        path: hunk.file.clone(),
                        commit_indices: Vec::new(),
                        history: Vec::new(),
                    }));
                    index.insert(hunk.file.clone(), slot);
                    slot
                });
                if let Some(bucket) = buckets[slot].as_mut() {
                    if bucket.commit_indices.last() != Some(&ci) {
                        bucket.commit_indices.push(ci);
                    }
                }
            }
        }

        // Rename detection inside each commit: a deleted hunk whose
        // pre-image signature equals an added hunk's post-image signature
        for commit in &self.commits {
            let deleted: Vec<&crate::core::Hunk> = commit
                .hunks
                .iter()
                .filter(|h| h.change == ChangeKind::Deleted)
                .collect();
            let added: Vec<&crate::core::Hunk> = commit
                .hunks
                .iter()
                .filter(|h| h.change == ChangeKind::Added)
                .collect();

            let mut claimed = vec![false; added.len()];
            for removed in &deleted {
                for (ai, appeared) in added.iter().enumerate() {
                    if claimed[ai] || appeared.file == removed.file {
                        continue;
                    }
                    if removed.old_signature() != appeared.new_signature() {
                        continue;
                    }
                    claimed[ai] = true;
                    merge_rename(&mut buckets, &mut index, &removed.file, &appeared.file);
                    break;
                }
            }
        }

        // Build file definitions from the surviving buckets
        let total = self.summaries.len();
        let mut files: Vec<Definition> = Vec::new();
        let mut summary_sets: Vec<HashSet<usize>> = Vec::new();
        for bucket in buckets.into_iter().flatten() {
            let mut def = Definition::new(&bucket.path);
            def.history = bucket.history;

            let mut touched = HashSet::new();
            for &ci in &bucket.commit_indices {
                let Some(si) = self.commits.get(ci).and_then(|c| c.summary_index) else {
                    continue;
                };
                touched.insert(si);
                let weight = connection_weight(si, total);
                match def.connections.iter_mut().find(|c| c.index == si) {
                    Some(existing) => existing.weight += weight,
                    None => def.connections.push(Connection { index: si, weight }),
                }
            }

            files.push(def);
            summary_sets.push(touched);
        }

        self.sort_file_axis(&mut files, &mut summary_sets);

        self.file_index = files
            .iter()
            .enumerate()
            .map(|(i, f)| (f.symbol.clone(), i))
            .collect();

        // Attribute symbols to axis positions and collapse them into the
        // file-vector center of mass
        let axis_span = files.len().saturating_sub(1) as f64;
        for def in self.defs.iter_mut().flatten() {
            def.referenced.clear();
            for (file_idx, touched) in summary_sets.iter().enumerate() {
                if def.connections.iter().any(|c| touched.contains(&c.index)) {
                    def.referenced.push(file_idx);
                }
            }
            def.file_vector = if def.referenced.is_empty() || axis_span == 0.0 {
                0.0
            } else {
                let mean = def.referenced.iter().sum::<usize>() as f64
                    / def.referenced.len() as f64;
                mean / axis_span
            };
        }

        self.files = files;
    }

    /// Order the file list so related files sit adjacently: ascending by
    /// each file's average cosine similarity to every other file
    fn sort_file_axis(&self, files: &mut Vec<Definition>, summary_sets: &mut Vec<HashSet<usize>>) {
        if files.len() < 2 {
            return;
        }

        let weight_vectors: Vec<Vec<f64>> =
            files.iter().map(|f| self.connection_weights(f)).collect();
        let mut keyed: Vec<(f64, usize)> = (0..files.len())
            .map(|i| {
                let total: f64 = (0..files.len())
                    .filter(|j| *j != i)
                    .map(|j| cosine(&weight_vectors[i], &weight_vectors[j]))
                    .sum();
                (total / (files.len() - 1) as f64, i)
            })
            .collect();
        keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let order: Vec<usize> = keyed.into_iter().map(|(_, i)| i).collect();
        let mut sorted_files = Vec::with_capacity(files.len());
        let mut sorted_sets = Vec::with_capacity(summary_sets.len());
        for &i in &order {
            sorted_files.push(std::mem::replace(&mut files[i], Definition::new("")));
            sorted_sets.push(std::mem::take(&mut summary_sets[i]));
        }
        *files = sorted_files;
        *summary_sets = sorted_sets;
    }

    /// Emit a CONTEXT cluster per file, holding the definitions the file
    /// axis attributed to it
    pub(crate) fn build_file_clusters(&mut self) {
        for file_idx in 0..self.files.len() {
            let path = self.files[file_idx].symbol.clone();
            let members: Vec<Member> = self
                .definitions()
                .filter(|(_, d)| d.referenced.contains(&file_idx))
                .map(|(id, _)| Member::Definition(id))
                .collect();
            if members.is_empty() {
                continue;
            }

            let mut cluster = Cluster::context(path);
            cluster.members = members;
            self.push_top(cluster);
        }
    }
}

/// Merge the bucket for `old_path` into the bucket for `new_path`,
/// recording the rename chain on the surviving bucket
fn merge_rename(
    buckets: &mut [Option<FileBucket>],
    index: &mut HashMap<String, usize>,
    old_path: &str,
    new_path: &str,
) {
    let (Some(&src), Some(&dst)) = (index.get(old_path), index.get(new_path)) else {
        return;
    };
    if src == dst {
        return;
    }
    let Some(old_bucket) = buckets[src].take() else {
        return;
    };
    index.remove(old_path);

    if let Some(new_bucket) = buckets[dst].as_mut() {
        for ci in old_bucket.commit_indices {
            if !new_bucket.commit_indices.contains(&ci) {
                new_bucket.commit_indices.push(ci);
            }
        }
        new_bucket.history.push(old_bucket.path);
        new_bucket.history.extend(old_bucket.history);
    }
}
