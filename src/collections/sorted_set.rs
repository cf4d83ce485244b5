use std::{
    cmp::Ordering,
    collections::{BTreeSet, HashMap},
};

/// A member paired with its score, ordered by score then member.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMember {
    pub score: f64,
    pub member: String,
}

impl Eq for ScoredMember {}

impl Ord for ScoredMember {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.member.cmp(&other.member))
    }
}

impl PartialOrd for ScoredMember {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Unique members kept in ascending score order.
///
/// `by_member` answers score lookups, `ordered` answers rank queries. Both are
/// updated together so they always hold the same members.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortedSet {
    by_member: HashMap<String, f64>,
    ordered: BTreeSet<ScoredMember>,
}

impl SortedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a member or updates its score. Returns `true` if the member is new.
    pub fn insert(&mut self, member: &str, score: f64) -> bool {
        match self.by_member.insert(member.to_string(), score) {
            Some(old_score) => {
                self.ordered.remove(&ScoredMember {
                    score: old_score,
                    member: member.to_string(),
                });
                self.ordered.insert(ScoredMember {
                    score,
                    member: member.to_string(),
                });
                false
            }
            None => {
                self.ordered.insert(ScoredMember {
                    score,
                    member: member.to_string(),
                });
                true
            }
        }
    }

    pub fn remove(&mut self, member: &str) -> bool {
        let Some(score) = self.by_member.remove(member) else {
            return false;
        };

        self.ordered.remove(&ScoredMember {
            score,
            member: member.to_string(),
        });
        true
    }

    pub fn score(&self, member: &str) -> Option<f64> {
        self.by_member.get(member).copied()
    }

    pub fn len(&self) -> usize {
        self.by_member.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_member.is_empty()
    }

    /// Iterates members in ascending score order.
    pub fn iter(&self) -> impl Iterator<Item = &ScoredMember> {
        self.ordered.iter()
    }

    /// Returns the members at ranks `start..=end` (already normalized).
    pub fn range(&self, start: usize, end: usize) -> Vec<&ScoredMember> {
        self.ordered
            .iter()
            .skip(start)
            .take(end.saturating_sub(start) + 1)
            .collect()
    }
}

/// Formats a score the way Redis prints doubles: integral values without a
/// fractional part, everything else with the shortest round-tripping form.
pub fn format_score(score: f64) -> String {
    if score.is_infinite() {
        return if score > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    if score.fract() == 0.0 && score.abs() < 1e17 {
        format!("{}", score as i64)
    } else {
        format!("{}", score)
    }
}

/// Parses a score argument, accepting `inf`, `+inf` and `-inf`.
pub fn parse_score(input: &str) -> Option<f64> {
    match input.to_lowercase().as_str() {
        "inf" | "+inf" => Some(f64::INFINITY),
        "-inf" => Some(f64::NEG_INFINITY),
        other => other.parse::<f64>().ok().filter(|score| !score.is_nan()),
    }
}
