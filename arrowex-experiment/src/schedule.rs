use rand::seq::SliceRandom;
use rand::Rng;

/// Motion percent of every round, in play order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    percents: Vec<u8>,
}

impl Schedule {
    /// Every option repeated `repetitions` times, shuffled once.
    pub fn shuffled<R: Rng + ?Sized>(options: &[u8], repetitions: usize, rng: &mut R) -> Self {
        let mut percents: Vec<u8> = std::iter::repeat(options)
            .take(repetitions)
            .flatten()
            .copied()
            .collect();
        percents.shuffle(rng);
        Self { percents }
    }

    pub fn fixed(percents: Vec<u8>) -> Self {
        Self { percents }
    }

    pub fn len(&self) -> usize {
        self.percents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.percents.is_empty()
    }

    pub fn get(&self, round: usize) -> Option<u8> {
        self.percents.get(round).copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.percents
    }
}
