use crate::core::ranking::PreferenceTable;
use crate::models::Matching;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A reason a matching fails verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Violation {
    /// `proposer` and `receiver` both prefer each other to their assignments
    BlockingPair {
        proposer: usize,
        receiver: usize,
        proposer_partner: Option<usize>,
        receiver_partner: Option<usize>,
    },
    /// A participant appears in more than one pair
    DuplicateParticipant { id: usize },
    /// A matched pair is not mutually acceptable (or not a proposer/receiver pair)
    UnacceptablePair { proposer: usize, receiver: usize },
}

/// Verdict of [`verify_stability`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilityReport {
    pub violations: Vec<Violation>,
}

impl StabilityReport {
    pub fn is_stable(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn blocking_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.violations.iter().filter_map(|v| match v {
            Violation::BlockingPair { proposer, receiver, .. } => Some((*proposer, *receiver)),
            _ => None,
        })
    }
}

/// Check a matching against the full, original preference lists
///
/// Works from the matching alone and shares no state with the matcher.
/// Besides blocking pairs it reports pairs that are not a valid partial
/// injection or not mutually acceptable. Every proposer is checked, including
/// unmatched ones, which prefer any acceptable receiver to staying single.
pub fn verify_stability(matching: &Matching, table: &PreferenceTable) -> StabilityReport {
    let mut violations = Vec::new();
    let mut receiver_of: HashMap<usize, usize> = HashMap::new();
    let mut holder_of: HashMap<usize, usize> = HashMap::new();

    for pair in matching.pairs() {
        let duplicate_proposer = receiver_of.insert(pair.proposer, pair.receiver).is_some()
            || holder_of.contains_key(&pair.proposer);
        if duplicate_proposer {
            violations.push(Violation::DuplicateParticipant { id: pair.proposer });
        }
        let duplicate_receiver = holder_of.insert(pair.receiver, pair.proposer).is_some()
            || receiver_of.contains_key(&pair.receiver);
        if duplicate_receiver {
            violations.push(Violation::DuplicateParticipant { id: pair.receiver });
        }

        let acceptable = table
            .proposer(pair.proposer)
            .is_some_and(|list| list.rank_of(pair.receiver).is_some())
            && table
                .receiver(pair.receiver)
                .is_some_and(|list| list.rank_of(pair.proposer).is_some());
        if !acceptable {
            violations.push(Violation::UnacceptablePair {
                proposer: pair.proposer,
                receiver: pair.receiver,
            });
        }
    }

    for list in table.proposer_lists() {
        let proposer = list.owner();
        let current = receiver_of.get(&proposer).copied();

        // only receivers ranked strictly above the current partner can block
        let better = match current.and_then(|r| list.rank_of(r)) {
            Some(rank) => &list.ranked()[..rank],
            None => list.ranked(),
        };

        for &receiver in better {
            let Some(receiver_list) = table.receiver(receiver) else {
                continue;
            };
            let holder = holder_of.get(&receiver).copied();
            let receiver_prefers = match holder {
                Some(holder) => receiver_list.prefers(proposer, holder),
                None => receiver_list.rank_of(proposer).is_some(),
            };
            if receiver_prefers {
                violations.push(Violation::BlockingPair {
                    proposer,
                    receiver,
                    proposer_partner: current,
                    receiver_partner: holder,
                });
            }
        }
    }

    if violations.is_empty() {
        tracing::debug!("Matching of {} pairs verified stable", matching.len());
    } else {
        tracing::error!(
            "Matching failed verification with {} violation(s): {:?}",
            violations.len(),
            violations
        );
    }

    StabilityReport { violations }
}
