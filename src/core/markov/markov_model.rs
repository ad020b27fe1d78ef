// Word-level Markov chain.
//
// States are the sentence start, every word seen, and the sentence end.
// Each state keeps a weighted set of successors; weights only ever grow.
// No Discord types here, just words in and words out.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum State {
    Start,
    Word(String),
    End,
}

/// Snapshot of model size, for the stats command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkovStats {
    pub words: usize,
    pub transitions: usize,
    pub lines: u64,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct MarkovModel {
    // BTreeMap keeps successor order stable so a seeded RNG gives repeatable walks.
    transitions: HashMap<State, BTreeMap<State, u64>>,
    lines: u64,
}

impl MarkovModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Incorporate one line of (already sanitized) text.
    ///
    /// Words are split on whitespace. Blank lines are ignored.
    pub fn add_line(&mut self, text: &str) {
        let mut words = text.split_whitespace().peekable();
        if words.peek().is_none() {
            return;
        }

        let mut previous = State::Start;
        for word in words {
            let next = State::Word(word.to_string());
            self.reinforce(previous, next.clone());
            previous = next;
        }
        self.reinforce(previous, State::End);
        self.lines += 1;
    }

    /// Generate one sentence by a weighted random walk.
    ///
    /// When `seed` is a known word the walk starts there and the seed is the
    /// first word of the result. Otherwise it starts at the sentence start.
    /// The walk stops at the sentence end or after `max_words` words, which
    /// also bounds walks around cycles. An empty model produces `""`.
    pub fn generate_sentence<R: Rng + ?Sized>(
        &self,
        seed: Option<&str>,
        max_words: usize,
        rng: &mut R,
    ) -> String {
        if max_words == 0 {
            return String::new();
        }

        let seeded = seed.and_then(|word| {
            self.transitions
                .get_key_value(&State::Word(word.to_string()))
        });
        let mut current = match seeded.or_else(|| self.transitions.get_key_value(&State::Start)) {
            Some((state, _)) => state,
            None => return String::new(),
        };

        let mut words: Vec<&str> = Vec::new();
        if let State::Word(word) = current {
            words.push(word);
        }

        while words.len() < max_words {
            let Some(next) = self
                .transitions
                .get(current)
                .and_then(|successors| pick_weighted(successors, rng))
            else {
                break;
            };

            match next {
                State::Word(word) => {
                    words.push(word);
                    current = next;
                }
                State::Start | State::End => break,
            }
        }

        words.join(" ")
    }

    pub fn stats(&self) -> MarkovStats {
        MarkovStats {
            words: self
                .transitions
                .keys()
                .filter(|state| matches!(state, State::Word(_)))
                .count(),
            transitions: self.transitions.values().map(BTreeMap::len).sum(),
            lines: self.lines,
        }
    }

    /// Fold another model into this one. Weights add up, nothing is removed.
    pub fn merge(&mut self, other: MarkovModel) {
        for (from, successors) in other.transitions {
            let target = self.transitions.entry(from).or_default();
            for (to, weight) in successors {
                *target.entry(to).or_insert(0) += weight;
            }
        }
        self.lines += other.lines;
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    fn reinforce(&mut self, from: State, to: State) {
        *self
            .transitions
            .entry(from)
            .or_default()
            .entry(to)
            .or_insert(0) += 1;
    }
}

fn pick_weighted<'a, R: Rng + ?Sized>(
    successors: &'a BTreeMap<State, u64>,
    rng: &mut R,
) -> Option<&'a State> {
    let dist = WeightedIndex::new(successors.values()).ok()?;
    successors.keys().nth(dist.sample(rng))
}
