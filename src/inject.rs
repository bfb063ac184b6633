//! Member injection for host-managed objects.
//!
//! Some objects are constructed by a host framework rather than by a graph;
//! for those, generated injector callbacks assign their dependencies after
//! the fact. The registry stores one callback per concrete type, keyed by
//! type identity, and [`Graph::inject`] dispatches to it. The callbacks are
//! opaque here; producing them is the job of an external code generator.

use std::any::{ Any, TypeId };
use std::collections::HashMap ;
use std::fmt ;
use std::sync::Arc ;

use crate::blueprint::HookError ;
use crate::graph::Graph ;



/// A type-erased member-injection callback.
pub type MemberInjector = Arc<dyn Fn( &Graph, &mut dyn Any ) -> Result<(), HookError> + Send + Sync>;



/// Injector callbacks keyed by target type, populated before any graph is
/// activated.
#[derive( Clone, Default )]
pub struct InjectorRegistry {
    injectors: HashMap<TypeId, MemberInjector>,
}

impl InjectorRegistry {

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the injector for targets of type `T`, replacing any
    /// previous registration for `T`.
    pub fn register<T, F>( &mut self, inject: F ) -> &mut Self
    where
        T: Any,
        F: Fn( &Graph, &mut T ) -> Result<(), HookError> + Send + Sync + 'static,
    {
        let erased: MemberInjector = Arc::new( move | graph, target | {
            match target.downcast_mut::<T>() {
                Some( target ) => inject( graph, target ),
                // Unreachable through Graph::inject, which dispatches by the
                // same TypeId this entry is keyed under.
                None => Err( format!(
                    "member injector for `{}` received a mismatched target",
                    std::any::type_name::<T>(),
                ).into() ),
            }
        });
        self.injectors.insert( TypeId::of::<T>(), erased );
        self
    }

    pub(crate) fn get( &self, type_id: TypeId ) -> Option<&MemberInjector> {
        self.injectors.get( &type_id )
    }

    #[inline] #[must_use] pub fn len( &self ) -> usize { self.injectors.len() }

    #[inline] #[must_use] pub fn is_empty( &self ) -> bool { self.injectors.is_empty() }

}

impl fmt::Debug for InjectorRegistry {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
        f.debug_struct( "InjectorRegistry" )
            .field( "injectors", &self.injectors.len() )
            .finish()
    }
}
