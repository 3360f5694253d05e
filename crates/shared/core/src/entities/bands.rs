//! Band classifications
//!
//! Bands are declared least to most severe so the derived ordering is the
//! severity ordering.

use super::labels::labelled_enum;

/// A band with a severity ladder of up to four rungs
pub trait Band: Copy + Ord + std::fmt::Display {
    /// Position on the severity ladder (0 = least severe)
    fn level(&self) -> u8;

    /// Band at a ladder position, saturating at the top rung
    fn from_level(level: u8) -> Self;

    /// Lowest rung that is only reachable in a pressure regime
    fn gated_from() -> u8;

    /// Whether this band is restricted to pressure regimes
    fn is_gated(&self) -> bool {
        self.level() >= Self::gated_from()
    }
}

macro_rules! impl_band {
    ($name:ident, gated_from = $gated:expr) => {
        impl Band for $name {
            fn level(&self) -> u8 {
                *self as u8
            }

            fn from_level(level: u8) -> Self {
                let idx = (level as usize).min($name::ALL.len() - 1);
                $name::ALL[idx]
            }

            fn gated_from() -> u8 {
                $gated
            }
        }
    };
}

labelled_enum! {
    /// Chain tension band
    pub enum CtiBand {
        Relaxed => "relaxed",
        Directional => "directional",
        Coil => "coil",
        Break => "break",
    }
}
impl_band!(CtiBand, gated_from = 3);

labelled_enum! {
    /// Miner threshold band
    pub enum MtiBand {
        Normal => "normal",
        Strained => "strained",
        Forced => "forced",
    }
}
impl_band!(MtiBand, gated_from = 2);

labelled_enum! {
    /// Difficulty-epoch tension band
    pub enum EtiBand {
        Relaxed => "relaxed",
        Balanced => "balanced",
        Overclocked => "overclocked",
    }
}
impl_band!(EtiBand, gated_from = 3);

labelled_enum! {
    /// Irreversibility band
    pub enum IrqBand {
        Reversible => "reversible",
        Primed => "primed",
        Irreversible => "irreversible",
        ProtocolFloor => "protocol-floor",
    }
}
impl_band!(IrqBand, gated_from = 2);

labelled_enum! {
    /// Resolution-proximity band
    pub enum ReiBand {
        Dormant => "dormant",
        Charged => "charged",
        Imminent => "imminent",
        Triggered => "triggered",
    }
}
impl_band!(ReiBand, gated_from = 2);

labelled_enum! {
    /// Remaining-futures band
    pub enum UqiBand {
        Open => "open",
        Narrowing => "narrowing",
        Thin => "thin",
        Terminal => "terminal",
    }
}
impl_band!(UqiBand, gated_from = 2);

labelled_enum! {
    /// Miner stress band used on the hashrate field
    pub enum HashrateBand {
        Calm => "calm",
        Strained => "strained",
        Distress => "distress",
    }
}
