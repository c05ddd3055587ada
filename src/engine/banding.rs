//! One-dimensional band clustering over a sorted scalar axis.
//!
//! The walk visits adjacent pairs of the sorted sequence. A gap above the
//! mean adjacent gap closes the current band; otherwise the left element
//! of the pair joins it and widens the band radius. The final sorted
//! element is never appended by the walk; whether the trailing open band
//! is emitted is governed by [`BandTail`].

use crate::config::BandTail;
use crate::core::{ClusterKind, Cluster, DefId, Definition, Member};
use crate::engine::ClusterEngine;

/// One contiguous run produced by the adaptive walk: positions into the
/// sorted sequence plus the widest in-band gap observed
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Band {
    pub members: Vec<usize>,
    pub radius: f64,
}

/// Walk a sorted scalar sequence, grouping adjacent entries whose gap
/// does not exceed the mean adjacent gap. Returns the non-empty bands.
pub(crate) fn adaptive_bands(values: &[f64], tail: BandTail) -> Vec<Band> {
    if values.len() < 2 {
        return Vec::new();
    }

    let gaps: Vec<f64> = values.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    let threshold = gaps.iter().sum::<f64>() / gaps.len() as f64;

    let mut bands = Vec::new();
    let mut current = Band {
        members: Vec::new(),
        radius: 0.0,
    };

    for (i, &gap) in gaps.iter().enumerate() {
        if gap > threshold {
            if !current.members.is_empty() {
                bands.push(current);
            }
            current = Band {
                members: Vec::new(),
                radius: 0.0,
            };
        } else {
            current.members.push(i);
            if current.radius < gap {
                current.radius = gap;
            }
        }
    }

    if tail == BandTail::Flush && !current.members.is_empty() {
        bands.push(current);
    }
    bands
}

impl ClusterEngine {
    /// Band the live definitions along one scalar feature and emit the
    /// resulting clusters; each membership bumps the definition's cluster
    /// frequency.
    pub(crate) fn band_pass(&mut self, kind: ClusterKind, key: fn(&Definition) -> f64) {
        let mut entries: Vec<(DefId, f64)> = self
            .definitions()
            .map(|(id, def)| (id, key(def)))
            .collect();
        entries.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let values: Vec<f64> = entries.iter().map(|(_, v)| v).copied().collect();
        for band in adaptive_bands(&values, self.config.band_tail) {
            let mut cluster = Cluster::new(kind);
            cluster.radius = band.radius;
            for position in band.members {
                let (id, _) = entries[position];
                cluster.members.push(Member::Definition(id));
                if let Some(def) = self.defs[id.0].as_mut() {
                    def.cluster_frequency += 1.0;
                }
            }
            self.push_top(cluster);
        }
    }

    /// Scale raw band-membership counts down to [0, 1] by the number of
    /// band clusters emitted; runs before the hub passes read any feature
    /// vector.
    pub(crate) fn normalize_cluster_frequencies(&mut self) {
        let band_count = self
            .clusters()
            .filter(|(_, c)| matches!(c.kind, ClusterKind::Chronic | ClusterKind::Occurrence))
            .count();
        if band_count == 0 {
            return;
        }

        for def in self.defs.iter_mut().flatten() {
            def.cluster_frequency = (def.cluster_frequency / band_count as f64).min(1.0);
        }
    }
}
