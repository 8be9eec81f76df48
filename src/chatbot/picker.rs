use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};


pub trait ResponsePicker: Send + Sync {
    /// Index in `0..len`; never called with `len == 0`.
    fn pick_index(&self, len: usize) -> usize;
}

pub fn choose<'a, T>(picker: &dyn ResponsePicker, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(picker.pick_index(items.len()).min(items.len() - 1))
}


pub struct SeededPicker {
    rng: Mutex<StdRng>,
}

impl SeededPicker {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl ResponsePicker for SeededPicker {
    fn pick_index(&self, len: usize) -> usize {
        self.rng.lock().gen_range(0..len)
    }
}

/// Always the same slot, clamped to the slice.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPicker(pub usize);

impl ResponsePicker for FixedPicker {
    fn pick_index(&self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}
