// ============================================================================
// Prime Candidates
// Lazily generated ascending primes for fraction reduction
// ============================================================================

/// Iterator over the primes 2, 3, 5, 7, ... found by trial division
/// against the primes already produced.
#[derive(Debug, Clone, Default)]
pub struct Primes {
    found: Vec<u64>,
}

impl Primes {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_prime(&self, candidate: u64) -> bool {
        self.found
            .iter()
            .take_while(|&&p| p.saturating_mul(p) <= candidate)
            .all(|&p| candidate % p != 0)
    }
}

impl Iterator for Primes {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let mut candidate = match self.found.last() {
            None => 2,
            Some(2) => 3,
            Some(&last) => last.checked_add(2)?,
        };
        while !self.is_prime(candidate) {
            candidate = candidate.checked_add(2)?;
        }
        self.found.push(candidate);
        Some(candidate)
    }
}
