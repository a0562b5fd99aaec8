//! Oregano cultivars grown in the field.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cultivar of a plant. Carried as a label for presentation and scoring; growth
/// never depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Cultivar {
    #[default]
    Vulgare,
    Hirtum,
    Aureum,
    Compactum,
    KentBeauty,
    Syriacum,
    Majorana,
}

impl Cultivar {
    /// Every cultivar, in declaration order.
    pub const ALL: [Cultivar; 7] = [
        Cultivar::Vulgare,
        Cultivar::Hirtum,
        Cultivar::Aureum,
        Cultivar::Compactum,
        Cultivar::KentBeauty,
        Cultivar::Syriacum,
        Cultivar::Majorana,
    ];

    /// Botanical label, e.g. `"vulgare"` for *Origanum vulgare*.
    pub fn label(self) -> &'static str {
        match self {
            Cultivar::Vulgare => "vulgare",
            Cultivar::Hirtum => "hirtum",
            Cultivar::Aureum => "aureum",
            Cultivar::Compactum => "compactum",
            Cultivar::KentBeauty => "rotundifolium 'Kent Beauty'",
            Cultivar::Syriacum => "syriacum",
            Cultivar::Majorana => "majorana",
        }
    }

    /// Hover text shown next to a leaf, e.g. `"Origanum hirtum (heirloom variety)"`.
    pub fn title(self, heirloom: bool) -> String {
        if heirloom {
            format!("Origanum {} (heirloom variety)", self.label())
        } else {
            format!("Origanum {}", self.label())
        }
    }
}

impl std::fmt::Display for Cultivar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
