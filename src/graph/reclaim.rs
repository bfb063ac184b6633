//! Revocable singleton caching.
//!
//! Weak and soft singletons publish through a [`ReclaimableSlot`] rather than
//! a plain slot. The weak policy mirrors a weak reference: the graph never
//! keeps the instance alive, so the slot empties as soon as the last
//! external holder drops. The soft policy keeps the instance alive until an
//! explicit memory-pressure signal
//! ([`Graph::trim_memory`]( crate::Graph::trim_memory )) revokes it; without
//! a garbage collector this is the closest rendition of runtime-reclaimed
//! references.

use std::any::Any ;
use std::sync::{ Arc, PoisonError, RwLock, Weak };

use crate::blueprint::Instance ;



type WeakInstance = Weak<dyn Any + Send + Sync>;

/// Which reclamation rule empties the slot.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub(crate) enum ReclaimPolicy {
    /// Reclaimed once no external strong holder remains.
    Weak,
    /// Reclaimed only on an explicit memory-pressure signal.
    Soft,
}

/// A cache slot whose value can disappear between resolutions.
///
/// Readers take a shared lock only; publication and revocation take the
/// exclusive lock briefly. No user code ever runs under either.
#[derive( Debug )]
pub(crate) struct ReclaimableSlot {
    policy: ReclaimPolicy,
    state: RwLock<SlotState>,
}

#[derive( Debug )]
enum SlotState {
    Empty,
    Weak( WeakInstance ),
    Soft( Instance ),
}

impl ReclaimableSlot {

    pub(crate) fn new( policy: ReclaimPolicy ) -> Self {
        Self { policy, state: RwLock::new( SlotState::Empty ) }
    }

    /// Returns the instance if something still keeps it alive.
    pub(crate) fn get( &self ) -> Option<Instance> {
        match &*self.state.read().unwrap_or_else( PoisonError::into_inner ) {
            SlotState::Empty => None,
            SlotState::Weak( reference ) => reference.upgrade(),
            SlotState::Soft( instance ) => Some( instance.clone() ),
        }
    }

    pub(crate) fn publish( &self, instance: &Instance ) {
        let mut state = self.state.write().unwrap_or_else( PoisonError::into_inner );
        *state = match self.policy {
            ReclaimPolicy::Weak => SlotState::Weak( Arc::downgrade( instance )),
            ReclaimPolicy::Soft => SlotState::Soft( instance.clone() ),
        };
    }

    /// Revokes a soft-held value. Weak slots are reclaimed by their holders
    /// dropping, not by this call.
    pub(crate) fn reclaim( &self ) {
        if self.policy == ReclaimPolicy::Soft {
            let mut state = self.state.write().unwrap_or_else( PoisonError::into_inner );
            *state = SlotState::Empty ;
        }
    }

}



#[cfg( test )]
mod tests {
    use super::* ;

    fn instance_of( value: u32 ) -> Instance {
        Arc::new( value )
    }

    #[test]
    fn weak_slot_empties_once_holders_drop() {
        let slot = ReclaimableSlot::new( ReclaimPolicy::Weak );
        let held = instance_of( 1 );
        slot.publish( &held );
        assert!( slot.get().is_some() );

        drop( held );
        assert!( slot.get().is_none() );
    }

    #[test]
    fn soft_slot_survives_holders_but_not_reclaim() {
        let slot = ReclaimableSlot::new( ReclaimPolicy::Soft );
        slot.publish( &instance_of( 2 ));
        assert!( slot.get().is_some() );

        slot.reclaim();
        assert!( slot.get().is_none() );
    }

    #[test]
    fn reclaim_is_a_no_op_for_weak_slots() {
        let slot = ReclaimableSlot::new( ReclaimPolicy::Weak );
        let held = instance_of( 3 );
        slot.publish( &held );
        slot.reclaim();
        assert!( slot.get().is_some() );
    }

}
