//! Context states derived alongside the pressure indices

use super::labels::labelled_enum;

labelled_enum! {
    /// Seven-day block entropy drift
    pub enum EntropyState {
        Falling => "falling",
        Flat => "flat",
        Rising => "rising",
    }
}

labelled_enum! {
    /// Structural price corridor (derived from custody, entropy and tension
    /// only; never from a quoted price)
    pub enum PriceCorridor {
        Permitted => "permitted",
        Fragile => "fragile",
        Forbidden => "forbidden",
    }
}

labelled_enum! {
    /// Coarse mempool intent bucket
    pub enum IntentState {
        Purge => "PURGE",
        Bleeding => "BLEEDING",
        Neutral => "NEUTRAL",
        Elevating => "ELEVATING",
        Surging => "SURGING",
    }
}

impl IntentState {
    /// Intent is draining out of the queue
    pub fn is_draining(&self) -> bool {
        matches!(self, IntentState::Bleeding | IntentState::Purge)
    }
}
