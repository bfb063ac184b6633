//! Per-graph runtime services implementing the scope policies.
//!
//! A [`BoundService`] is the runtime side of one binding in one graph:
//! whatever cached state its scope requires, plus the construct-and-publish
//! protocol around the factory. One bound service exists per resolved
//! binding per graph, owned exclusively by that graph.

use std::collections::HashMap ;
use std::sync::{ Arc, Mutex, PoisonError, RwLock };

use tracing::trace ;

use crate::argument::Argument ;
use crate::blueprint::{ BindingDefinition, Instance };
use crate::graph::{ Graph, GraphError };
use crate::scope::Scope ;
use super::reclaim::{ ReclaimPolicy, ReclaimableSlot };



pub(crate) struct BoundService {
    definition: Arc<BindingDefinition>,
    state: ServiceState,
}

enum ServiceState {
    /// Prototype and factory scopes: nothing to cache.
    Transient,
    /// Double-checked locking: the slot is read under a shared lock; the
    /// `init` mutex serialises first-time construction. User code (factory
    /// and hooks) runs under `init` only, never under the slot lock.
    Singleton {
        slot: RwLock<Option<Instance>>,
        init: Mutex<()>,
    },
    /// Same protocol as `Singleton` with a revocable slot; reconstruction
    /// after a reclaim is serialised by the same `init` mutex.
    Reclaimable {
        slot: ReclaimableSlot,
        init: Mutex<()>,
    },
    /// One instance per distinct argument. The lock is held across
    /// construction so the factory runs at most once per argument.
    Multiton {
        instances: Mutex<HashMap<Argument, Instance>>,
    },
}

impl BoundService {

    pub(crate) fn new( definition: Arc<BindingDefinition> ) -> Self {
        let state = match definition.scope() {
            Scope::Prototype | Scope::Factory => ServiceState::Transient,
            Scope::Singleton => ServiceState::Singleton {
                slot: RwLock::new( None ),
                init: Mutex::new(()),
            },
            Scope::WeakSingleton => ServiceState::Reclaimable {
                slot: ReclaimableSlot::new( ReclaimPolicy::Weak ),
                init: Mutex::new(()),
            },
            Scope::SoftSingleton => ServiceState::Reclaimable {
                slot: ReclaimableSlot::new( ReclaimPolicy::Soft ),
                init: Mutex::new(()),
            },
            Scope::MultitonFactory => ServiceState::Multiton {
                instances: Mutex::new( HashMap::new() ),
            },
        };
        Self { definition, state }
    }

    /// Returns the cached instance or constructs one according to the scope
    /// policy. A failed construction publishes nothing, so a later call
    /// retries.
    ///
    /// Lock poisoning can only come from a panic in user code run under
    /// `init`; recovering the guard is sound because the slot is still
    /// unpublished at that point.
    pub(crate) fn instance( &self, owner: &Graph, argument: &Argument ) -> Result<Instance, GraphError> {
        match &self.state {
            ServiceState::Transient => self.construct( owner, argument ),
            ServiceState::Singleton { slot, init } => {
                if let Some( instance ) = &*slot.read().unwrap_or_else( PoisonError::into_inner ) {
                    return Ok( instance.clone() );
                }
                let _init = init.lock().unwrap_or_else( PoisonError::into_inner );
                if let Some( instance ) = &*slot.read().unwrap_or_else( PoisonError::into_inner ) {
                    return Ok( instance.clone() );
                }
                let instance = self.construct( owner, argument )?;
                *slot.write().unwrap_or_else( PoisonError::into_inner ) = Some( instance.clone() );
                Ok( instance )
            }
            ServiceState::Reclaimable { slot, init } => {
                if let Some( instance ) = slot.get() {
                    return Ok( instance );
                }
                let _init = init.lock().unwrap_or_else( PoisonError::into_inner );
                if let Some( instance ) = slot.get() {
                    return Ok( instance );
                }
                let instance = self.construct( owner, argument )?;
                slot.publish( &instance );
                Ok( instance )
            }
            ServiceState::Multiton { instances } => {
                let mut instances = instances.lock().unwrap_or_else( PoisonError::into_inner );
                if let Some( instance ) = instances.get( argument ) {
                    return Ok( instance.clone() );
                }
                let instance = self.construct( owner, argument )?;
                instances.insert( argument.clone(), instance.clone() );
                Ok( instance )
            }
        }
    }

    /// Runs the factory, then the binding's own post-construct hook, then
    /// every registered plugin observer in registration order. Nothing is
    /// published until all of them succeed.
    fn construct( &self, owner: &Graph, argument: &Argument ) -> Result<Instance, GraphError> {
        let instance = ( self.definition.factory() )( owner, argument )?;
        trace!( key = %self.definition.key(), scope = %self.definition.scope(), "constructed instance" );
        if let Some( hook ) = self.definition.post_construct() {
            hook( owner, argument, &instance )?;
        }
        owner.plugins().run_post_construct( owner, self.definition.scope(), argument, &instance )?;
        Ok( instance )
    }

    /// Runs the dispose hook for every instance this service still caches,
    /// collecting failures instead of stopping at the first one.
    pub(crate) fn dispose( &self, owner: &Graph, failures: &mut Vec<GraphError> ) {
        let Some( hook ) = self.definition.dispose() else { return };
        match &self.state {
            ServiceState::Transient => {}
            ServiceState::Singleton { slot, .. } => {
                let cached = slot.read().unwrap_or_else( PoisonError::into_inner ).clone();
                if let Some( instance ) = cached {
                    if let Err( failure ) = hook( owner, &Argument::none(), &instance ) {
                        failures.push( failure );
                    }
                }
            }
            ServiceState::Reclaimable { slot, .. } => {
                if let Some( instance ) = slot.get() {
                    if let Err( failure ) = hook( owner, &Argument::none(), &instance ) {
                        failures.push( failure );
                    }
                }
            }
            ServiceState::Multiton { instances } => {
                let instances = instances.lock().unwrap_or_else( PoisonError::into_inner );
                for ( argument, instance ) in instances.iter() {
                    if let Err( failure ) = hook( owner, argument, instance ) {
                        failures.push( failure );
                    }
                }
            }
        }
    }

    /// Releases soft-held instances; every other state is untouched.
    pub(crate) fn trim_memory( &self ) {
        if let ServiceState::Reclaimable { slot, .. } = &self.state {
            slot.reclaim();
        }
    }

}
