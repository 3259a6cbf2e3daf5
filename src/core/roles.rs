use crate::error::{MatchingError, MatchingResult};
use crate::models::Role;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// How participants are split into proposers and receivers
///
/// Role never depends on gender; it only drives the deferred-acceptance
/// asymmetry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum RoleStrategy {
    /// Random split from a seeded ChaCha8 shuffle
    Seeded(u64),
    /// The lowest `ceil(N/2)` ids propose
    Balanced,
    /// Externally supplied role per participant
    Explicit(Vec<Role>),
}

impl Default for RoleStrategy {
    fn default() -> Self {
        Self::Balanced
    }
}

/// Disjoint split of all participant ids into proposers and receivers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePartition {
    proposers: Vec<usize>,
    receivers: Vec<usize>,
    roles: Vec<Role>,
}

impl RolePartition {
    /// Assign roles for `n` participants
    ///
    /// Generated splits put `ceil(n/2)` participants on the proposer side.
    pub fn assign(n: usize, strategy: &RoleStrategy) -> MatchingResult<Self> {
        match strategy {
            RoleStrategy::Seeded(seed) => Ok(Self::seeded(n, *seed)),
            RoleStrategy::Balanced => Ok(Self::balanced(n)),
            RoleStrategy::Explicit(roles) => {
                if roles.len() != n {
                    return Err(MatchingError::LengthMismatch {
                        field: "roles",
                        expected: n,
                        actual: roles.len(),
                    });
                }
                Ok(Self::from_roles(roles.clone()))
            }
        }
    }

    pub fn balanced(n: usize) -> Self {
        let proposer_count = n.div_ceil(2);
        Self::from_roles(
            (0..n)
                .map(|id| if id < proposer_count { Role::Proposer } else { Role::Receiver })
                .collect(),
        )
    }

    pub fn seeded(n: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut ids: Vec<usize> = (0..n).collect();
        ids.shuffle(&mut rng);

        let mut roles = vec![Role::Receiver; n];
        for &id in ids.iter().take(n.div_ceil(2)) {
            roles[id] = Role::Proposer;
        }
        Self::from_roles(roles)
    }

    pub fn from_roles(roles: Vec<Role>) -> Self {
        let mut proposers = Vec::new();
        let mut receivers = Vec::new();
        for (id, role) in roles.iter().enumerate() {
            match role {
                Role::Proposer => proposers.push(id),
                Role::Receiver => receivers.push(id),
            }
        }
        Self { proposers, receivers, roles }
    }

    /// Build from an explicit proposer id list; every other id receives
    pub fn from_proposers(n: usize, proposers: &[usize]) -> MatchingResult<Self> {
        let mut roles = vec![Role::Receiver; n];
        for &id in proposers {
            let slot = roles.get_mut(id).ok_or_else(|| {
                MatchingError::InvalidPartition(format!("proposer id {id} out of range 0..{n}"))
            })?;
            if *slot == Role::Proposer {
                return Err(MatchingError::InvalidPartition(format!(
                    "proposer id {id} listed twice"
                )));
            }
            *slot = Role::Proposer;
        }
        Ok(Self::from_roles(roles))
    }

    /// Proposer ids in ascending order
    pub fn proposers(&self) -> &[usize] {
        &self.proposers
    }

    /// Receiver ids in ascending order
    pub fn receivers(&self) -> &[usize] {
        &self.receivers
    }

    pub fn role_of(&self, id: usize) -> Option<Role> {
        self.roles.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Ids on the other side of `role`
    pub fn opposite(&self, role: Role) -> &[usize] {
        match role {
            Role::Proposer => &self.receivers,
            Role::Receiver => &self.proposers,
        }
    }
}
