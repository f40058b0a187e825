//! Random gift assignment without fixed points.
//!
//! Givers keep their list order. Receivers are a uniformly shuffled copy of
//! the same list, redrawn until no position pairs a participant with their
//! own email. Rejection sampling keeps the result uniform over all
//! derangements; the attempt ceiling turns a run of unlucky draws into an
//! explicit [`AssignmentError::Exhausted`] instead of a hang.

use rand::{Rng, seq::SliceRandom};

use crate::{
  error::AssignmentError,
  participant::{Participant, ParticipantList},
};

/// Default draw ceiling.
///
/// For large lists a single draw is a derangement with probability ~1/e, so
/// 100 draws fail with probability below 1e-19.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

// ─── Types ───────────────────────────────────────────────────────────────────

/// `giver` buys a gift for `receiver`. The two never share an email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
  pub giver:    Participant,
  pub receiver: Participant,
}

/// One assignment per participant, in the input list's giver order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentSet(Vec<Assignment>);

impl AssignmentSet {
  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn as_slice(&self) -> &[Assignment] { &self.0 }

  pub fn iter(&self) -> std::slice::Iter<'_, Assignment> { self.0.iter() }
}

impl IntoIterator for AssignmentSet {
  type Item = Assignment;
  type IntoIter = std::vec::IntoIter<Assignment>;

  fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}

// ─── Assigner ────────────────────────────────────────────────────────────────

/// Shuffle-and-retry derangement generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assigner {
  max_attempts: u32,
}

impl Default for Assigner {
  fn default() -> Self { Self::new(DEFAULT_MAX_ATTEMPTS) }
}

impl Assigner {
  /// A ceiling of zero never draws and always reports exhaustion.
  pub fn new(max_attempts: u32) -> Self { Self { max_attempts } }

  pub fn max_attempts(&self) -> u32 { self.max_attempts }

  /// Pair every participant with someone else.
  ///
  /// Pure apart from consuming randomness from `rng`.
  pub fn assign<R>(
    &self,
    list: &ParticipantList,
    rng: &mut R,
  ) -> Result<AssignmentSet, AssignmentError>
  where
    R: Rng + ?Sized,
  {
    let givers = list.as_slice();
    if givers.len() < 2 {
      return Err(AssignmentError::TooFewParticipants);
    }

    let mut receivers: Vec<usize> = (0..givers.len()).collect();

    for attempt in 1..=self.max_attempts {
      receivers.shuffle(rng);

      let deranged = receivers
        .iter()
        .enumerate()
        .all(|(i, &r)| givers[i].email != givers[r].email);

      if deranged {
        tracing::debug!(attempt, participants = givers.len(), "derangement found");
        let pairs = receivers
          .iter()
          .enumerate()
          .map(|(i, &r)| Assignment {
            giver:    givers[i].clone(),
            receiver: givers[r].clone(),
          })
          .collect();
        return Ok(AssignmentSet(pairs));
      }
    }

    Err(AssignmentError::Exhausted { attempts: self.max_attempts })
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use proptest::prelude::*;
  use rand::{SeedableRng, rngs::StdRng};
  use serde_json::{Value, json};

  use super::*;
  use crate::participant::validate;

  fn list_of(n: usize) -> ParticipantList {
    let raw: Vec<Value> = (0..n)
      .map(|i| json!({ "name": format!("Person {i}"), "email": format!("p{i}@example.com") }))
      .collect();
    validate(&Value::Array(raw)).unwrap()
  }

  fn check_invariants(list: &ParticipantList, set: &AssignmentSet) {
    assert_eq!(set.len(), list.len());

    let givers: Vec<_> = set.iter().map(|a| a.giver.clone()).collect();
    assert_eq!(givers.as_slice(), list.as_slice(), "giver order must match input");

    let mut receivers: Vec<_> = set.iter().map(|a| a.receiver.email.clone()).collect();
    let mut expected: Vec<_> = list.iter().map(|p| p.email.clone()).collect();
    receivers.sort();
    expected.sort();
    assert_eq!(receivers, expected, "receivers must be a permutation of givers");

    for a in set.iter() {
      assert_ne!(a.giver.email, a.receiver.email);
    }
  }

  #[test]
  fn two_participants_swap() {
    let list = list_of(2);
    let set = Assigner::default()
      .assign(&list, &mut StdRng::seed_from_u64(7))
      .unwrap();
    check_invariants(&list, &set);
    assert_eq!(set.as_slice()[0].receiver, list.as_slice()[1]);
    assert_eq!(set.as_slice()[1].receiver, list.as_slice()[0]);
  }

  #[test]
  fn pairs_never_stall_across_seeds() {
    let list = list_of(2);
    let assigner = Assigner::default();
    for seed in 0..1_000 {
      let set = assigner
        .assign(&list, &mut StdRng::seed_from_u64(seed))
        .unwrap_or_else(|e| panic!("seed {seed}: {e}"));
      check_invariants(&list, &set);
    }
  }

  #[test]
  fn shared_names_are_not_conflated() {
    let list = validate(&json!([
      { "name": "Sam", "email": "sam@a.com" },
      { "name": "Sam", "email": "sam@b.com" },
      { "name": "Sam", "email": "sam@c.com" },
    ]))
    .unwrap();
    let set = Assigner::default()
      .assign(&list, &mut StdRng::seed_from_u64(1))
      .unwrap();
    check_invariants(&list, &set);
  }

  #[test]
  fn zero_ceiling_is_exhausted() {
    let result = Assigner::new(0).assign(&list_of(3), &mut StdRng::seed_from_u64(0));
    assert_eq!(result, Err(AssignmentError::Exhausted { attempts: 0 }));
  }

  #[test]
  fn single_draw_ceiling_sometimes_exhausts() {
    // With two people exactly half of all shuffles are the identity.
    let list = list_of(2);
    let assigner = Assigner::new(1);
    let mut exhausted = 0;
    let mut assigned = 0;
    for seed in 0..200 {
      match assigner.assign(&list, &mut StdRng::seed_from_u64(seed)) {
        Ok(set) => {
          check_invariants(&list, &set);
          assigned += 1;
        }
        Err(AssignmentError::Exhausted { attempts: 1 }) => exhausted += 1,
        Err(e) => panic!("unexpected error: {e}"),
      }
    }
    assert!(exhausted > 0);
    assert!(assigned > 0);
  }

  #[test]
  fn both_three_cycles_are_reachable_evenly() {
    // n = 3 has exactly two derangements: (1 2 0) and (2 0 1).
    let list = list_of(3);
    let assigner = Assigner::default();
    let mut rng = StdRng::seed_from_u64(2024);
    let mut counts: HashMap<String, u32> = HashMap::new();

    for _ in 0..2_000 {
      let set = assigner.assign(&list, &mut rng).unwrap();
      let first = set.as_slice()[0].receiver.email.clone();
      *counts.entry(first).or_default() += 1;
    }

    assert_eq!(counts.len(), 2, "{counts:?}");
    for (email, count) in &counts {
      assert!((800..=1_200).contains(count), "{email}: {count}");
    }
  }

  proptest! {
    #[test]
    fn assignment_is_a_derangement(n in 2usize..60, seed in any::<u64>()) {
      let list = list_of(n);
      let set = Assigner::default()
        .assign(&list, &mut StdRng::seed_from_u64(seed))
        .unwrap();
      check_invariants(&list, &set);
    }
  }
}
