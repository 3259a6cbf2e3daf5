use crate::core::roles::RolePartition;
use crate::error::{MatchingError, MatchingResult};
use crate::models::{CompatibilityMatrix, Role};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// A participant's counterparts, most preferred first
///
/// Built once and never reordered. Rejection progress is tracked outside the
/// list (see [`crate::core::gale_shapley`]), so the full ranking stays
/// available to the stability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceList {
    owner: usize,
    ranked: Vec<usize>,
    ranks: HashMap<usize, usize>,
}

impl PreferenceList {
    pub fn new(owner: usize, ranked: Vec<usize>) -> Self {
        let ranks = ranked.iter().enumerate().map(|(rank, &id)| (id, rank)).collect();
        Self { owner, ranked, ranks }
    }

    pub fn owner(&self) -> usize {
        self.owner
    }

    pub fn ranked(&self) -> &[usize] {
        &self.ranked
    }

    /// Counterpart at position `index`, if any
    #[inline]
    pub fn get(&self, index: usize) -> Option<usize> {
        self.ranked.get(index).copied()
    }

    /// Rank of `id` (0 = most preferred); `None` if `id` is unacceptable
    #[inline]
    pub fn rank_of(&self, id: usize) -> Option<usize> {
        self.ranks.get(&id).copied()
    }

    /// True if `a` is ranked and strictly ahead of `b`; an unranked `b` loses to any ranked `a`
    #[inline]
    pub fn prefers(&self, a: usize, b: usize) -> bool {
        match (self.rank_of(a), self.rank_of(b)) {
            (Some(ra), Some(rb)) => ra < rb,
            (Some(_), None) => true,
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Preference lists for both sides of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceTable {
    proposers: BTreeMap<usize, PreferenceList>,
    receivers: BTreeMap<usize, PreferenceList>,
}

impl PreferenceTable {
    pub fn proposer(&self, id: usize) -> Option<&PreferenceList> {
        self.proposers.get(&id)
    }

    pub fn receiver(&self, id: usize) -> Option<&PreferenceList> {
        self.receivers.get(&id)
    }

    /// Proposer ids in ascending order
    pub fn proposer_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.proposers.keys().copied()
    }

    pub fn receiver_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.receivers.keys().copied()
    }

    pub fn proposer_lists(&self) -> impl Iterator<Item = &PreferenceList> {
        self.proposers.values()
    }

    pub fn receiver_lists(&self) -> impl Iterator<Item = &PreferenceList> {
        self.receivers.values()
    }

    /// Sum of all proposer list lengths; bounds the number of proposals
    pub fn total_proposer_entries(&self) -> usize {
        self.proposers.values().map(PreferenceList::len).sum()
    }

    /// Build lists from explicitly ranked counterpart ids
    ///
    /// Both sides must be disjoint and every list may only name ids from the
    /// other side, each at most once. A one-sided listing is allowed: the
    /// pair is treated as unacceptable to the side that omits it.
    pub fn from_explicit(preferences: &ExplicitPreferences) -> MatchingResult<Self> {
        let proposer_ids: HashSet<usize> = preferences.proposers.keys().copied().collect();
        let receiver_ids: HashSet<usize> = preferences.receivers.keys().copied().collect();

        if let Some(id) = proposer_ids.intersection(&receiver_ids).min() {
            return Err(MatchingError::InvalidPreferences(format!(
                "participant {id} is listed as both proposer and receiver"
            )));
        }

        let proposers = build_side(&preferences.proposers, &receiver_ids, "proposer")?;
        let receivers = build_side(&preferences.receivers, &proposer_ids, "receiver")?;

        Ok(Self { proposers, receivers })
    }
}

fn build_side(
    lists: &BTreeMap<usize, Vec<usize>>,
    counterparts: &HashSet<usize>,
    side: &str,
) -> MatchingResult<BTreeMap<usize, PreferenceList>> {
    let mut built = BTreeMap::new();
    for (&owner, ranked) in lists {
        let mut seen = HashSet::with_capacity(ranked.len());
        for &id in ranked {
            if !counterparts.contains(&id) {
                return Err(MatchingError::InvalidPreferences(format!(
                    "{side} {owner} ranks {id}, which is not on the opposite side"
                )));
            }
            if !seen.insert(id) {
                return Err(MatchingError::InvalidPreferences(format!(
                    "{side} {owner} ranks {id} more than once"
                )));
            }
        }
        built.insert(owner, PreferenceList::new(owner, ranked.clone()));
    }
    Ok(built)
}

/// Explicitly ranked preferences, keyed by participant id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplicitPreferences {
    pub proposers: BTreeMap<usize, Vec<usize>>,
    pub receivers: BTreeMap<usize, Vec<usize>>,
}

/// Rank opposite-role counterparts of `owner` by descending score
///
/// Zero-score counterparts are dropped. Equal scores are ordered by ascending
/// id so results are reproducible.
pub fn rank_row(matrix: &CompatibilityMatrix, owner: usize, candidates: &[usize]) -> Vec<usize> {
    let row = matrix.row(owner);
    let mut scored: Vec<(usize, f64)> = candidates
        .iter()
        .filter(|&&id| id != owner && row[id] > 0.0)
        .map(|&id| (id, row[id]))
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    scored.into_iter().map(|(id, _)| id).collect()
}

/// Build every participant's preference list against the opposite role
pub fn rank_preferences(
    matrix: &CompatibilityMatrix,
    partition: &RolePartition,
) -> MatchingResult<PreferenceTable> {
    if partition.len() != matrix.len() {
        return Err(MatchingError::LengthMismatch {
            field: "roles",
            expected: matrix.len(),
            actual: partition.len(),
        });
    }

    let build = |ids: &[usize], role: Role| -> BTreeMap<usize, PreferenceList> {
        ids.iter()
            .map(|&id| {
                let ranked = rank_row(matrix, id, partition.opposite(role));
                (id, PreferenceList::new(id, ranked))
            })
            .collect()
    };

    let table = PreferenceTable {
        proposers: build(partition.proposers(), Role::Proposer),
        receivers: build(partition.receivers(), Role::Receiver),
    };

    let empty = table
        .proposer_lists()
        .chain(table.receiver_lists())
        .filter(|list| list.is_empty())
        .count();
    tracing::debug!(
        "Ranked {} proposers and {} receivers ({} with no compatible counterpart)",
        table.proposers.len(),
        table.receivers.len(),
        empty
    );

    Ok(table)
}
