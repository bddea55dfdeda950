//! Squad inventory and the load-penalty snapshot derived from it.
//!
//! Only the forward locker travels with the squad; base storage never counts
//! toward load. Totals are compared against the capacity tier to produce the
//! [`LoadPenalties`] the battle engine reads at setup.

use tactics_core::LoadPenalties;

/// Transport capacity class, from smallest (`E`) to largest (`S`).
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CapacityTier {
    #[default]
    E,
    D,
    C,
    B,
    A,
    S,
}

/// Capacity limits of a tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capacity {
    pub mass_kg: u32,
    pub bulk_bu: u32,
    pub power_w: u32,
}

impl CapacityTier {
    pub fn capacity(self) -> Capacity {
        let (mass_kg, bulk_bu, power_w) = match self {
            CapacityTier::E => (100, 70, 300),
            CapacityTier::D => (150, 100, 450),
            CapacityTier::C => (200, 130, 600),
            CapacityTier::B => (260, 170, 800),
            CapacityTier::A => (330, 220, 1000),
            CapacityTier::S => (400, 300, 1300),
        };
        Capacity {
            mass_kg,
            bulk_bu,
            power_w,
        }
    }

    /// Next tier up, or `None` at `S`.
    pub fn upgraded(self) -> Option<Self> {
        match self {
            CapacityTier::E => Some(CapacityTier::D),
            CapacityTier::D => Some(CapacityTier::C),
            CapacityTier::C => Some(CapacityTier::B),
            CapacityTier::B => Some(CapacityTier::A),
            CapacityTier::A => Some(CapacityTier::S),
            CapacityTier::S => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryItem {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mass_kg: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bulk_bu: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub power_w: f64,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub quantity: u32,
    /// Stackable entries merge their quantity when transferred onto an entry
    /// with the same id.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stackable: bool,
}

#[cfg(feature = "serde")]
fn one() -> u32 {
    1
}

impl InventoryItem {
    pub fn new(id: impl Into<String>, mass_kg: f64, bulk_bu: f64, power_w: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            mass_kg,
            bulk_bu,
            power_w,
            quantity: 1,
            stackable: false,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn stackable(mut self) -> Self {
        self.stackable = true;
        self
    }
}

/// Summed load of the forward locker.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Load {
    pub mass_kg: f64,
    pub bulk_bu: f64,
    pub power_w: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum InventoryBin {
    ForwardLocker,
    BaseStorage,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("item {item} is not in the {bin}")]
    ItemNotFound { item: String, bin: InventoryBin },

    #[error("tier {0} is already the largest")]
    MaxTier(CapacityTier),
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryManifest {
    #[cfg_attr(feature = "serde", serde(default))]
    pub tier: CapacityTier,
    #[cfg_attr(feature = "serde", serde(default))]
    pub forward_locker: Vec<InventoryItem>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_storage: Vec<InventoryItem>,
}

impl InventoryManifest {
    pub fn new(tier: CapacityTier) -> Self {
        Self {
            tier,
            ..Self::default()
        }
    }

    pub fn with_forward(mut self, items: impl IntoIterator<Item = InventoryItem>) -> Self {
        self.forward_locker.extend(items);
        self
    }

    pub fn load(&self) -> Load {
        self.forward_locker
            .iter()
            .fold(Load::default(), |total, item| {
                let quantity = f64::from(item.quantity);
                Load {
                    mass_kg: total.mass_kg + item.mass_kg * quantity,
                    bulk_bu: total.bulk_bu + item.bulk_bu * quantity,
                    power_w: total.power_w + item.power_w * quantity,
                }
            })
    }

    /// Load divided by tier capacity per dimension; a flag is raised for
    /// each ratio above 1.
    pub fn load_penalties(&self) -> LoadPenalties {
        let load = self.load();
        let capacity = self.tier.capacity();
        LoadPenalties::from_ratios(
            load.mass_kg / f64::from(capacity.mass_kg),
            load.bulk_bu / f64::from(capacity.bulk_bu),
            load.power_w / f64::from(capacity.power_w),
        )
    }

    fn bin_mut(&mut self, bin: InventoryBin) -> &mut Vec<InventoryItem> {
        match bin {
            InventoryBin::ForwardLocker => &mut self.forward_locker,
            InventoryBin::BaseStorage => &mut self.base_storage,
        }
    }

    /// Moves the first entry with `item_id` between bins. Moving within the
    /// same bin does nothing.
    pub fn transfer(
        &mut self,
        from: InventoryBin,
        to: InventoryBin,
        item_id: &str,
    ) -> Result<(), InventoryError> {
        if from == to {
            return Ok(());
        }
        let source = self.bin_mut(from);
        let index = source
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| InventoryError::ItemNotFound {
                item: item_id.to_owned(),
                bin: from,
            })?;
        let entry = source.remove(index);

        let target = self.bin_mut(to);
        match target
            .iter_mut()
            .find(|existing| entry.stackable && existing.id == entry.id)
        {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(entry.quantity);
            }
            None => target.push(entry),
        }
        tracing::debug!(item = item_id, %from, %to, "inventory transfer");
        Ok(())
    }

    pub fn upgrade_tier(&mut self) -> Result<CapacityTier, InventoryError> {
        let next = self
            .tier
            .upgraded()
            .ok_or(InventoryError::MaxTier(self.tier))?;
        self.tier = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_table_matches_capacity_classes() {
        assert_eq!(
            CapacityTier::E.capacity(),
            Capacity {
                mass_kg: 100,
                bulk_bu: 70,
                power_w: 300
            }
        );
        assert_eq!(CapacityTier::S.capacity().power_w, 1300);
        assert_eq!(CapacityTier::B.upgraded(), Some(CapacityTier::A));
        assert_eq!(CapacityTier::S.upgraded(), None);

        use strum::IntoEnumIterator;
        let tiers: Vec<_> = CapacityTier::iter().collect();
        for pair in tiers.windows(2) {
            assert_eq!(pair[0].upgraded(), Some(pair[1]));
            assert!(pair[0].capacity().mass_kg < pair[1].capacity().mass_kg);
        }
    }

    #[test]
    fn only_forward_locker_counts_toward_load() {
        let mut manifest = InventoryManifest::new(CapacityTier::E).with_forward([
            InventoryItem::new("plate", 40.0, 30.0, 0.0).with_quantity(2),
            InventoryItem::new("lamp", 1.0, 1.0, 50.0),
        ]);
        manifest
            .base_storage
            .push(InventoryItem::new("crate", 500.0, 500.0, 0.0));

        let load = manifest.load();
        assert_eq!(load.mass_kg, 81.0);
        assert_eq!(load.bulk_bu, 61.0);

        let penalties = manifest.load_penalties();
        assert!(!penalties.any());
    }

    #[test]
    fn overloaded_bulk_raises_flag() {
        let manifest = InventoryManifest::new(CapacityTier::E)
            .with_forward([InventoryItem::new("crate", 10.0, 91.0, 0.0)]);
        let penalties = manifest.load_penalties();
        assert!(penalties.bulk_over);
        assert!(!penalties.mass_over);
        assert!((penalties.bulk_ratio - 1.3).abs() < 1e-9);
    }

    #[test]
    fn transfer_merges_stackables() {
        let mut manifest = InventoryManifest::new(CapacityTier::C);
        manifest
            .forward_locker
            .push(InventoryItem::new("cell", 1.0, 1.0, 10.0).stackable());
        manifest.base_storage.push(
            InventoryItem::new("cell", 1.0, 1.0, 10.0)
                .stackable()
                .with_quantity(3),
        );

        manifest
            .transfer(InventoryBin::BaseStorage, InventoryBin::ForwardLocker, "cell")
            .unwrap();
        assert_eq!(manifest.forward_locker.len(), 1);
        assert_eq!(manifest.forward_locker[0].quantity, 4);
        assert!(manifest.base_storage.is_empty());

        let err = manifest
            .transfer(InventoryBin::BaseStorage, InventoryBin::ForwardLocker, "cell")
            .unwrap_err();
        assert!(matches!(err, InventoryError::ItemNotFound { .. }));
    }

    #[test]
    fn merged_stacks_cap_at_the_counter_limit() {
        let mut manifest = InventoryManifest::new(CapacityTier::C);
        manifest.forward_locker.push(
            InventoryItem::new("cell", 1.0, 1.0, 10.0)
                .stackable()
                .with_quantity(u32::MAX - 1),
        );
        manifest.base_storage.push(
            InventoryItem::new("cell", 1.0, 1.0, 10.0)
                .stackable()
                .with_quantity(5),
        );

        manifest
            .transfer(InventoryBin::BaseStorage, InventoryBin::ForwardLocker, "cell")
            .unwrap();
        assert_eq!(manifest.forward_locker.len(), 1);
        assert_eq!(manifest.forward_locker[0].quantity, u32::MAX);
    }

    #[test]
    fn upgrade_stops_at_top_tier() {
        let mut manifest = InventoryManifest::new(CapacityTier::A);
        assert_eq!(manifest.upgrade_tier(), Ok(CapacityTier::S));
        assert_eq!(
            manifest.upgrade_tier(),
            Err(InventoryError::MaxTier(CapacityTier::S))
        );
    }
}
