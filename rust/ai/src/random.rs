//! Uniformly random opponent, mostly useful as a floor in simulations.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{legal_moves, AIOpponent, Move};
use fivepiles_engine::view::GameView;

#[derive(Debug)]
pub struct RandomAI {
    rng: Mutex<StdRng>,
}

impl RandomAI {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Same seed and same views give the same moves.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomAI {
    fn default() -> Self {
        Self::new()
    }
}

impl AIOpponent for RandomAI {
    fn choose(&self, view: &GameView) -> Option<Move> {
        let moves = legal_moves(view);
        if moves.is_empty() {
            return None;
        }
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let idx = rng.random_range(0..moves.len());
        Some(moves[idx])
    }

    fn name(&self) -> &str {
        "RandomAI"
    }
}
