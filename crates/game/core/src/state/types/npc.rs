//! Merchant NPC records.

/// An item an NPC trades, with its price in gold. `None` means the NPC does
/// not trade the item in that direction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcOffer {
    pub code: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub buy_price: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sell_price: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcDefinition {
    pub code: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub offers: Vec<NpcOffer>,
}

impl NpcDefinition {
    /// Price the NPC charges for one unit of `code`.
    pub fn buy_price(&self, code: &str) -> Option<u32> {
        self.offers
            .iter()
            .find(|offer| offer.code == code)
            .and_then(|offer| offer.buy_price)
    }

    /// Price the NPC pays for one unit of `code`.
    pub fn sell_price(&self, code: &str) -> Option<u32> {
        self.offers
            .iter()
            .find(|offer| offer.code == code)
            .and_then(|offer| offer.sell_price)
    }
}
