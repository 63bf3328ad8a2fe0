//! Integration hooks for the host's equipment code.
//!
//! The host reports raw facts (a weapon went into a slot, a thing left the
//! inventory, the draft toggle flipped). These hooks turn them into
//! [`SidearmEvent`]s, filtering out the notifications weapon memories do
//! not care about.

use sidearms_core::host::WeaponCatalog;
use sidearms_core::types::WeaponIdentity;

use crate::events::SidearmEvent;

/// Where an added item ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipSlot {
    /// The primary (wielded) slot.
    Primary,
    /// The inventory, carried as a sidearm.
    Inventory,
}

/// A thing was added to the character's equipment or inventory.
///
/// Items the catalog does not know as weapons produce no event.
#[must_use]
pub fn on_item_added(
    item: WeaponIdentity,
    slot: EquipSlot,
    catalog: &dyn WeaponCatalog,
) -> Option<SidearmEvent> {
    if !catalog.resolves(&item) {
        return None;
    }
    Some(match slot {
        EquipSlot::Primary => SidearmEvent::PrimaryEquipped { weapon: item },
        EquipSlot::Inventory => SidearmEvent::SidearmPickedUp { weapon: item },
    })
}

/// A weapon left the inventory.
///
/// `intentional` is true for player-ordered drops and false when the weapon
/// was destroyed, stolen, or consumed.
#[must_use]
pub fn on_item_removed(item: WeaponIdentity, intentional: bool) -> SidearmEvent {
    SidearmEvent::SidearmDropped {
        weapon: item,
        intentional,
    }
}

/// The draft toggle changed.
#[must_use]
pub fn on_draft_changed(was_drafted: bool, now_drafted: bool) -> Option<SidearmEvent> {
    (was_drafted && !now_drafted).then_some(SidearmEvent::Undrafted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sidearms_core::catalog::DefCatalog;
    use sidearms_core::types::WeaponKind;

    fn catalog() -> DefCatalog {
        DefCatalog::new().with_weapon("Gun_Revolver", WeaponKind::Ranged, Vec::<String>::new())
    }

    #[test]
    fn known_weapon_maps_to_slot_event() {
        let revolver = WeaponIdentity::new("Gun_Revolver");
        assert_eq!(
            on_item_added(revolver.clone(), EquipSlot::Primary, &catalog()),
            Some(SidearmEvent::PrimaryEquipped { weapon: revolver.clone() })
        );
        assert_eq!(
            on_item_added(revolver.clone(), EquipSlot::Inventory, &catalog()),
            Some(SidearmEvent::SidearmPickedUp { weapon: revolver })
        );
    }

    #[test]
    fn non_weapon_items_are_ignored() {
        let meal = WeaponIdentity::new("MealSimple");
        assert!(on_item_added(meal, EquipSlot::Inventory, &catalog()).is_none());
    }

    #[test]
    fn only_leaving_draft_is_reported() {
        assert_eq!(on_draft_changed(true, false), Some(SidearmEvent::Undrafted));
        assert!(on_draft_changed(false, true).is_none());
        assert!(on_draft_changed(true, true).is_none());
        assert!(on_draft_changed(false, false).is_none());
    }
}
