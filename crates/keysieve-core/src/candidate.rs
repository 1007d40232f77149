use std::vec;

/// Single-pass, front-to-back sequence of candidate passphrases.
///
/// A fresh source has to be built from the list to search again.
#[derive(Debug)]
pub struct CandidateSource {
    inner: vec::IntoIter<String>,
    total: usize,
    next_index: usize,
}

impl CandidateSource {
    pub fn new(candidates: Vec<String>) -> Self {
        let total = candidates.len();
        Self {
            inner: candidates.into_iter(),
            total,
            next_index: 0,
        }
    }

    /// Number of candidates the source started with.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of candidates already handed out.
    pub fn consumed(&self) -> usize {
        self.next_index
    }

    /// Pull the next candidate together with its position in the list.
    pub fn next_indexed(&mut self) -> Option<(usize, String)> {
        let candidate = self.inner.next()?;
        let index = self.next_index;
        self.next_index += 1;
        Some((index, candidate))
    }
}

impl Iterator for CandidateSource {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.next_indexed().map(|(_, candidate)| candidate)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for CandidateSource {}

impl FromIterator<String> for CandidateSource {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<String>> for CandidateSource {
    fn from(candidates: Vec<String>) -> Self {
        Self::new(candidates)
    }
}
