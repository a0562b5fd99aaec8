//! Weighted random choice for spawn attributes (heirloom odds, cultivar mix).
use rand::Rng as RngCore;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::garden::cultivar::Cultivar;
use crate::sampling::rand01;

/// Picks an item with probability proportional to its weight. Items with
/// non-positive weight are never picked; `None` when no item is pickable.
pub fn pick_weighted<'a, T>(items: &'a [(T, f32)], rng: &mut dyn RngCore) -> Option<&'a T> {
    let placeable: Vec<_> = items
        .iter()
        .filter(|(_, w)| w.is_finite() && *w > 0.0)
        .collect();
    if placeable.is_empty() {
        return None;
    }

    let total_weight: f32 = placeable.iter().map(|(_, w)| *w).sum();
    let mut roll = rand01(rng) * total_weight;
    for entry in placeable.iter().copied() {
        roll -= entry.1;
        if roll <= 0.0 {
            return Some(&entry.0);
        }
    }

    placeable.last().copied().map(|entry| &entry.0)
}

/// Odds of a plant being an heirloom, as `heirloom : regular` weights.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeirloomOdds {
    pub heirloom: f32,
    pub regular: f32,
}

impl HeirloomOdds {
    pub fn new(heirloom: f32, regular: f32) -> Self {
        Self { heirloom, regular }
    }

    pub fn roll(&self, rng: &mut dyn RngCore) -> bool {
        pick_weighted(&[(true, self.heirloom), (false, self.regular)], rng)
            .copied()
            .unwrap_or(false)
    }

    /// Probability of rolling an heirloom.
    pub fn probability(&self) -> f32 {
        let total = self.heirloom.max(0.0) + self.regular.max(0.0);
        if total <= 0.0 {
            0.0
        } else {
            self.heirloom.max(0.0) / total
        }
    }
}

impl Default for HeirloomOdds {
    /// One in five.
    fn default() -> Self {
        Self::new(1.0, 4.0)
    }
}

/// Relative weights for each cultivar at spawn time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CultivarMix {
    pub weights: Vec<(Cultivar, f32)>,
}

impl CultivarMix {
    pub fn new(weights: Vec<(Cultivar, f32)>) -> Self {
        Self { weights }
    }

    /// Every cultivar with weight 1, plus `extra` on the default cultivar.
    pub fn favoring_default(extra: f32) -> Self {
        let weights = Cultivar::ALL
            .iter()
            .map(|&c| {
                let w = if c == Cultivar::default() {
                    1.0 + extra
                } else {
                    1.0
                };
                (c, w)
            })
            .collect();
        Self { weights }
    }

    pub fn roll(&self, rng: &mut dyn RngCore) -> Cultivar {
        pick_weighted(&self.weights, rng)
            .copied()
            .unwrap_or_default()
    }

    pub fn is_pickable(&self) -> bool {
        self.weights.iter().any(|(_, w)| w.is_finite() && *w > 0.0)
    }
}

impl Default for CultivarMix {
    /// The default cultivar listed four times as often as any other.
    fn default() -> Self {
        Self::favoring_default(3.0)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::tests::FixedRng;

    #[test]
    fn weighted_pick_selects_by_roll() {
        let items = [("a", 0.7), ("b", 0.3)];

        let mut first = FixedRng { value: 0 };
        assert_eq!(pick_weighted(&items, &mut first), Some(&"a"));

        let mut second = FixedRng {
            value: (0.8 * u32::MAX as f32) as u32,
        };
        assert_eq!(pick_weighted(&items, &mut second), Some(&"b"));
    }

    #[test]
    fn weighted_pick_skips_non_positive_weights() {
        let items = [("never", 0.0), ("neg", -1.0), ("only", 2.0)];
        let mut rng = FixedRng { value: 0 };
        assert_eq!(pick_weighted(&items, &mut rng), Some(&"only"));

        let blocked = [("x", 0.0)];
        assert_eq!(pick_weighted(&blocked, &mut rng), None);
    }

    #[test]
    fn default_heirloom_odds_are_one_in_five() {
        let odds = HeirloomOdds::default();
        assert!((odds.probability() - 0.2).abs() < 1e-6);

        let mut rng = StdRng::seed_from_u64(11);
        let n = 10_000;
        let hits = (0..n).filter(|_| odds.roll(&mut rng)).count();
        let rate = hits as f32 / n as f32;
        assert!((rate - 0.2).abs() < 0.02, "heirloom rate {rate}");
    }

    #[test]
    fn default_mix_favors_default_cultivar() {
        let mix = CultivarMix::default();
        let weight_of = |c: Cultivar| {
            mix.weights
                .iter()
                .find(|(k, _)| *k == c)
                .map(|(_, w)| *w)
                .unwrap_or(0.0)
        };
        assert_eq!(weight_of(Cultivar::Vulgare), 4.0);
        assert_eq!(weight_of(Cultivar::Hirtum), 1.0);
        assert_eq!(mix.weights.len(), Cultivar::ALL.len());
    }

    #[test]
    fn empty_mix_rolls_default() {
        let mix = CultivarMix::new(Vec::new());
        let mut rng = FixedRng { value: 42 };
        assert!(!mix.is_pickable());
        assert_eq!(mix.roll(&mut rng), Cultivar::default());
    }
}
