//! The unit prices for each load size.

/// Maps a unit volume tier (e.g. "10 cubic meter") to the price of one load.
///
/// Tiers keep the order they were added in, which is the order forms list them.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceList {
    tiers: Vec<(String, f64)>,
}

impl PriceList {
    /// Create a price list from `(unit_volume, price)` pairs.
    ///
    /// If a unit volume appears more than once, the last price wins.
    pub fn new<S: Into<String>>(tiers: impl IntoIterator<Item = (S, f64)>) -> Self {
        let mut price_list = Self { tiers: Vec::new() };

        for (unit_volume, price) in tiers {
            let unit_volume = unit_volume.into();

            match price_list
                .tiers
                .iter_mut()
                .find(|(existing, _)| *existing == unit_volume)
            {
                Some((_, existing_price)) => *existing_price = price,
                None => price_list.tiers.push((unit_volume, price)),
            }
        }

        price_list
    }

    /// The price of one load of `unit_volume`, or `None` if the tier is not priced.
    pub fn price_of(&self, unit_volume: &str) -> Option<f64> {
        self.tiers
            .iter()
            .find(|(tier, _)| tier == unit_volume)
            .map(|(_, price)| *price)
    }

    /// The `(unit_volume, price)` pairs in display order.
    pub fn tiers(&self) -> &[(String, f64)] {
        &self.tiers
    }
}

impl Default for PriceList {
    fn default() -> Self {
        Self::new([("10 cubic meter", 1650.0), ("15 cubic meter", 2400.0)])
    }
}
