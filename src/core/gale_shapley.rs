use crate::core::ranking::PreferenceTable;
use crate::models::{MatchedPair, Matching};
use std::collections::{HashMap, VecDeque};

/// Outcome of a single proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The receiver was unassigned and now holds the proposer
    Accepted { proposer: usize, receiver: usize },
    /// The receiver traded up; `displaced` is free again
    Displaced {
        proposer: usize,
        receiver: usize,
        displaced: usize,
    },
    /// The receiver kept its holder (or finds the proposer unacceptable)
    Rejected { proposer: usize, receiver: usize },
}

/// Mutable state of one deferred-acceptance run
///
/// Each proposer's progress is a cursor into its immutable preference list:
/// everything before the cursor has rejected it.
#[derive(Debug, Clone, Default)]
pub struct MatchingState {
    holders: HashMap<usize, usize>,
    free: VecDeque<usize>,
    cursors: HashMap<usize, usize>,
}

impl MatchingState {
    /// Proposer currently held by `receiver`
    pub fn holder_of(&self, receiver: usize) -> Option<usize> {
        self.holders.get(&receiver).copied()
    }

    /// Number of receivers that have rejected `proposer` so far
    pub fn cursor_of(&self, proposer: usize) -> usize {
        self.cursors.get(&proposer).copied().unwrap_or(0)
    }

    /// Proposers waiting to propose, in queue order
    pub fn free_proposers(&self) -> impl Iterator<Item = usize> + '_ {
        self.free.iter().copied()
    }

    pub fn held_count(&self) -> usize {
        self.holders.len()
    }
}

/// Result of running deferred acceptance to convergence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub matching: Matching,
    /// Total proposals made (accepted, displacing or rejected)
    pub proposals: usize,
    /// Participants of either role left without a partner, ascending
    pub unmatched: Vec<usize>,
}

/// Proposer-optimal deferred acceptance over a [`PreferenceTable`]
///
/// Receivers only hold or reject and never become unassigned once they hold
/// someone. A displaced proposer is treated as rejected by that receiver and
/// continues from its next choice, so every proposal consumes one list entry
/// and the number of proposals never exceeds
/// [`PreferenceTable::total_proposer_entries`].
pub struct DeferredAcceptance<'a> {
    table: &'a PreferenceTable,
    state: MatchingState,
    proposals: usize,
}

impl<'a> DeferredAcceptance<'a> {
    /// Start with every proposer free, queued in ascending id order
    pub fn new(table: &'a PreferenceTable) -> Self {
        let state = MatchingState {
            holders: HashMap::new(),
            free: table.proposer_ids().collect(),
            cursors: table.proposer_ids().map(|id| (id, 0)).collect(),
        };
        Self {
            table,
            state,
            proposals: 0,
        }
    }

    pub fn state(&self) -> &MatchingState {
        &self.state
    }

    pub fn proposals(&self) -> usize {
        self.proposals
    }

    /// Receivers `proposer` has not been rejected by yet, best first
    pub fn remaining(&self, proposer: usize) -> &[usize] {
        match self.table.proposer(proposer) {
            Some(list) => {
                let cursor = self.state.cursor_of(proposer).min(list.len());
                &list.ranked()[cursor..]
            }
            None => &[],
        }
    }

    /// Perform one proposal, or `None` once no free proposer has a candidate left
    pub fn step(&mut self) -> Option<Transition> {
        let (proposer, receiver) = loop {
            let proposer = self.state.free.pop_front()?;
            match self.remaining(proposer).first() {
                Some(&receiver) => break (proposer, receiver),
                None => {
                    tracing::trace!("Proposer {} exhausted its preferences", proposer);
                }
            }
        };

        self.proposals += 1;

        let table = self.table;
        let receiver_prefs = table.receiver(receiver);
        let transition = match self.state.holder_of(receiver) {
            None if receiver_prefs.is_some_and(|list| list.rank_of(proposer).is_some()) => {
                self.state.holders.insert(receiver, proposer);
                Transition::Accepted { proposer, receiver }
            }
            Some(current)
                if receiver_prefs.is_some_and(|list| list.prefers(proposer, current)) =>
            {
                self.state.holders.insert(receiver, proposer);
                self.reject(current);
                self.state.free.push_back(current);
                Transition::Displaced {
                    proposer,
                    receiver,
                    displaced: current,
                }
            }
            _ => {
                self.reject(proposer);
                self.state.free.push_front(proposer);
                Transition::Rejected { proposer, receiver }
            }
        };

        tracing::trace!("{:?}", transition);
        Some(transition)
    }

    fn reject(&mut self, proposer: usize) {
        *self.state.cursors.entry(proposer).or_insert(0) += 1;
    }

    /// Run to convergence and snapshot the final matching
    pub fn run(mut self) -> MatchOutcome {
        while self.step().is_some() {}

        let pairs: Vec<MatchedPair> = self
            .state
            .holders
            .iter()
            .map(|(&receiver, &proposer)| MatchedPair { proposer, receiver })
            .collect();
        let matching = Matching::new(pairs);

        let mut unmatched: Vec<usize> = self
            .table
            .proposer_ids()
            .chain(self.table.receiver_ids())
            .filter(|&id| matching.partner_of(id).is_none())
            .collect();
        unmatched.sort_unstable();

        tracing::debug!(
            "Deferred acceptance converged: {} pairs, {} proposals, {} unmatched",
            matching.len(),
            self.proposals,
            unmatched.len()
        );

        MatchOutcome {
            matching,
            proposals: self.proposals,
            unmatched,
        }
    }
}

/// Run deferred acceptance over `table`
pub fn stable_match(table: &PreferenceTable) -> MatchOutcome {
    DeferredAcceptance::new(table).run()
}
