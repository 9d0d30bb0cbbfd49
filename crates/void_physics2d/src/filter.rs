//! Collision filtering with category/mask bits and group indices
//!
//! The rules are the Box2D ones PhysicsEditor exports for:
//!
//! - two fixtures sharing a non-zero group index always collide when the
//!   index is positive and never collide when it is negative;
//! - otherwise each fixture's category must be accepted by the other's mask.
//!
//! Rapier only knows membership/filter groups, so category and mask map onto
//! [`rapier::InteractionGroups`] and the group index is enforced by
//! [`GroupIndexHooks`] during the narrow phase.

use rapier2d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Category/mask/group filter of a single collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionFilter {
    /// Which categories this collider belongs to
    pub category_bits: u16,
    /// Which categories this collider accepts contacts with
    pub mask_bits: u16,
    /// Group override (0 = none)
    pub group_index: i16,
}

impl CollisionFilter {
    /// Filter that collides with everything
    pub const ALL: Self = Self {
        category_bits: 0x0001,
        mask_bits: 0xFFFF,
        group_index: 0,
    };

    /// Create a filter from raw 16-bit values
    pub fn new(category_bits: u16, mask_bits: u16, group_index: i16) -> Self {
        Self {
            category_bits,
            mask_bits,
            group_index,
        }
    }

    /// Create a filter from the signed values found in editor exports
    pub fn from_signed(category_bits: i16, mask_bits: i16, group_index: i16) -> Self {
        Self::new(category_bits as u16, mask_bits as u16, group_index)
    }

    /// Check if two filters allow a contact between their colliders
    pub fn should_collide(&self, other: &CollisionFilter) -> bool {
        if self.group_index == other.group_index && self.group_index != 0 {
            return self.group_index > 0;
        }
        (self.mask_bits & other.category_bits) != 0 && (self.category_bits & other.mask_bits) != 0
    }

    /// Whether the narrow phase has to consult [`GroupIndexHooks`]
    pub fn needs_hooks(&self) -> bool {
        self.group_index != 0
    }

    /// Rapier interaction groups for this filter.
    ///
    /// Colliders with a group index accept everything here; the hooks make
    /// the final decision for them.
    pub fn to_interaction_groups(&self) -> rapier::InteractionGroups {
        if self.needs_hooks() {
            return rapier::InteractionGroups::all();
        }
        rapier::InteractionGroups::new(
            rapier::Group::from_bits_truncate(u32::from(self.category_bits)),
            rapier::Group::from_bits_truncate(u32::from(self.mask_bits)),
        )
    }

    /// Pack into collider user data
    pub fn to_user_data(&self) -> u128 {
        u128::from(self.category_bits)
            | (u128::from(self.mask_bits) << 16)
            | (u128::from(self.group_index as u16) << 32)
    }

    /// Unpack from collider user data
    pub fn from_user_data(data: u128) -> Self {
        Self {
            category_bits: (data & 0xFFFF) as u16,
            mask_bits: ((data >> 16) & 0xFFFF) as u16,
            group_index: ((data >> 32) & 0xFFFF) as u16 as i16,
        }
    }
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self::ALL
    }
}

/// Physics hooks applying group-index rules to contact and sensor pairs
#[derive(Debug, Default, Clone, Copy)]
pub struct GroupIndexHooks;

impl GroupIndexHooks {
    fn allows(&self, context: &rapier::PairFilterContext) -> bool {
        let (Some(c1), Some(c2)) = (
            context.colliders.get(context.collider1),
            context.colliders.get(context.collider2),
        ) else {
            return true;
        };
        let f1 = CollisionFilter::from_user_data(c1.user_data);
        let f2 = CollisionFilter::from_user_data(c2.user_data);
        f1.should_collide(&f2)
    }
}

impl rapier::PhysicsHooks for GroupIndexHooks {
    fn filter_contact_pair(&self, context: &rapier::PairFilterContext) -> Option<rapier::SolverFlags> {
        if self.allows(context) {
            Some(rapier::SolverFlags::COMPUTE_IMPULSES)
        } else {
            None
        }
    }

    fn filter_intersection_pair(&self, context: &rapier::PairFilterContext) -> bool {
        self.allows(context)
    }
}
