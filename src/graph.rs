//! Activated object graphs.
//!
//! A [`Graph`] is a [`Blueprint`] brought to life: it lazily creates one
//! [`BoundService`]( service ) per resolved binding, delegates bindings it
//! does not define to its parent graph and rejects everything once disposed.
//!
//! Resolution is synchronous and thread-safe. First-time construction of a
//! cached scope happens under a per-service lock; later readers take no
//! exclusive lock. Re-entrant construction of the same key on one call path
//! is detected and fails with [`GraphError::CyclicDependency`] instead of
//! deadlocking.

mod call_stack ;
mod reclaim ;
mod service ;

use std::any::{ Any, TypeId };
use std::collections::HashMap ;
use std::fmt ;
use std::hash::Hash ;
use std::sync::atomic::{ AtomicBool, Ordering };
use std::sync::{ Arc, PoisonError, RwLock };

use nonempty_collections::NEVec ;
use thiserror::Error ;
use tracing::{ debug, warn };

use crate::application::AppServices ;
use crate::argument::Argument ;
use crate::blueprint::{ BindingDefinition, Blueprint, HookError, Instance };
use crate::key::TypeKey ;
use crate::plugins::PluginRegistry ;
use crate::qualifier::Qualifier ;
use service::BoundService ;



/// Errors from graph resolution, injection and lifecycle hooks.
#[derive( Debug, Error )]
pub enum GraphError {

    /// No definition for the key exists in this graph or anywhere up the
    /// parent chain.
    #[error( "No binding found for {key}" )]
    UnresolvedBinding { key: TypeKey },

    /// A definition for the type exists somewhere in the chain, but not for
    /// the requested qualifier or argument shape.
    #[error( "A binding for the type in {key} exists, but not for this qualifier or argument shape" )]
    UnsuitableKey { key: TypeKey },

    /// Construction of the key re-entered itself on the same resolution
    /// call path.
    #[error( "Cyclic dependency detected while constructing {key}" )]
    CyclicDependency { key: TypeKey },

    /// The graph was disposed; it accepts no further operations.
    #[error( "Graph `{qualifier}` is already disposed" )]
    AlreadyDisposed { qualifier: Qualifier },

    /// No member injector was registered for the target type.
    #[error( "No member injector registered for type `{type_name}`" )]
    NoInjector { type_name: &'static str },

    /// A user-supplied factory failed. The bound service stays unpublished,
    /// so a later resolution retries.
    #[error( "Factory for {key} failed" )]
    Factory { key: TypeKey, #[source] source: HookError },

    /// A post-construct hook failed. The instance is dropped unpublished.
    #[error( "Post-construct hook for {key} failed" )]
    PostConstruct { key: TypeKey, #[source] source: HookError },

    /// A dispose hook failed; reported through [`DisposalError`].
    #[error( "Dispose hook for {key} failed" )]
    Dispose { key: TypeKey, #[source] source: HookError },

    /// A plugin observer failed.
    #[error( "Plugin hook failed" )]
    Plugin { #[source] source: HookError },

    /// A registered member injector failed.
    #[error( "Member injection for type `{type_name}` failed" )]
    Injection { type_name: &'static str, #[source] source: HookError },

}

impl GraphError {

    /// Wraps a factory failure, except that graph errors surfacing through
    /// user factories (an unresolved dependency, a detected cycle) propagate
    /// as themselves.
    pub(crate) fn factory_failure( key: TypeKey, failure: HookError ) -> Self {
        match failure.downcast::<GraphError>() {
            Ok( nested ) => *nested,
            Err( failure ) => Self::Factory { key, source: failure },
        }
    }

    pub(crate) fn post_construct_failure( key: TypeKey, failure: HookError ) -> Self {
        match failure.downcast::<GraphError>() {
            Ok( nested ) => *nested,
            Err( failure ) => Self::PostConstruct { key, source: failure },
        }
    }

    pub(crate) fn dispose_failure( key: TypeKey, failure: HookError ) -> Self {
        match failure.downcast::<GraphError>() {
            Ok( nested ) => *nested,
            Err( failure ) => Self::Dispose { key, source: failure },
        }
    }

}



/// Aggregated dispose-hook failures from disposing a graph (or a tree
/// subtree). Disposal itself always completes; this reports what failed
/// along the way.
#[derive( Debug )]
pub struct DisposalError {
    failures: NEVec<GraphError>,
}

impl DisposalError {

    pub(crate) fn from_failures( collected: Vec<GraphError> ) -> Option<Self> {
        let mut collected = collected.into_iter();
        let first = collected.next()?;
        let mut failures = NEVec::new( first );
        for failure in collected {
            failures.push( failure );
        }
        Some( Self { failures } )
    }

    /// Every dispose-hook failure, in disposal order.
    #[inline] pub fn failures( &self ) -> &NEVec<GraphError> { &self.failures }

}

impl fmt::Display for DisposalError {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
        write!(
            f,
            "{} dispose hook(s) failed; first: {}",
            self.failures.len(),
            self.failures.first(),
        )
    }
}

impl std::error::Error for DisposalError {
    fn source( &self ) -> Option<&( dyn std::error::Error + 'static )> {
        Some( self.failures.first() )
    }
}



/// An activated blueprint: a live, cacheable, disposable object graph.
///
/// `Graph` is a cheap clonable handle; clones address the same graph. A
/// child graph keeps its parent handle alive for delegation, but disposal
/// responsibility stays with whoever opened the graphs - the
/// [`Tree`]( crate::Tree ) always closes descendants before their parent.
#[derive( Clone )]
pub struct Graph {
    inner: Arc<GraphInner>,
}

struct GraphInner {
    blueprint: Blueprint,
    parent: Option<Graph>,
    services: RwLock<HashMap<TypeKey, Arc<BoundService>>>,
    disposed: AtomicBool,
    shared: Arc<AppServices>,
}

impl Graph {

    pub(crate) fn activate( blueprint: Blueprint, parent: Option<Graph>, shared: Arc<AppServices> ) -> Self {
        debug!( qualifier = %blueprint.qualifier(), "activating graph" );
        Self {
            inner: Arc::new( GraphInner {
                blueprint,
                parent,
                services: RwLock::new( HashMap::new() ),
                disposed: AtomicBool::new( false ),
                shared,
            }),
        }
    }

    /// The qualifier of the blueprint this graph was activated from.
    #[inline] pub fn qualifier( &self ) -> &Qualifier { self.inner.blueprint.qualifier() }

    /// The blueprint snapshot this graph resolves against.
    #[inline] pub fn blueprint( &self ) -> &Blueprint { &self.inner.blueprint }

    /// The parent graph this one delegates unresolved bindings to.
    #[inline] pub fn parent( &self ) -> Option<&Graph> { self.inner.parent.as_ref() }

    /// Whether the graph has been disposed. A disposed graph rejects all
    /// further resolution and cannot be revived.
    #[inline]
    pub fn is_disposed( &self ) -> bool {
        self.inner.disposed.load( Ordering::Acquire )
    }

    pub(crate) fn plugins( &self ) -> &PluginRegistry {
        &self.inner.shared.plugins
    }

    /// A per-activation identity, distinguishing same-keyed bindings that
    /// live in different graphs on one resolution call path.
    pub(crate) fn identity( &self ) -> usize {
        Arc::as_ptr( &self.inner ) as usize
    }

    /// Core type-erased resolution. The typed surface
    /// ([`instance`]( Self::instance ) and friends) is a thin wrapper over
    /// this.
    ///
    /// # Errors
    ///
    /// [`GraphError::AlreadyDisposed`] on a disposed graph;
    /// [`GraphError::UnresolvedBinding`] / [`GraphError::UnsuitableKey`]
    /// when no definition matches; [`GraphError::CyclicDependency`] on
    /// re-entrant construction; factory and hook failures as recorded.
    pub fn resolve( &self, key: &TypeKey, argument: &Argument ) -> Result<Instance, GraphError> {
        if self.is_disposed() {
            return Err( GraphError::AlreadyDisposed { qualifier: self.qualifier().clone() } );
        }
        let Some(( owner, service )) = self.locate( key ) else {
            return Err( if self.chain_contains_type( key.type_id() ) {
                GraphError::UnsuitableKey { key: key.clone() }
            } else {
                GraphError::UnresolvedBinding { key: key.clone() }
            });
        };
        // The cycle frame must be entered before the service takes its
        // construction lock, otherwise a self-dependency would deadlock
        // instead of failing.
        let _frame = call_stack::Frame::enter( owner.identity(), key )?;
        service.instance( &owner, argument )
    }

    /// Resolves the unqualified binding for `T`.
    pub fn instance<T>( &self ) -> Result<Arc<T>, GraphError>
    where
        T: Send + Sync + 'static,
    {
        self.typed( &TypeKey::of::<T>(), &Argument::none() )
    }

    /// Resolves the binding for `T` under `qualifier`.
    pub fn instance_qualified<T>( &self, qualifier: impl Into<Qualifier> ) -> Result<Arc<T>, GraphError>
    where
        T: Send + Sync + 'static,
    {
        self.typed( &TypeKey::of_qualified::<T>( qualifier ), &Argument::none() )
    }

    /// Like [`instance`]( Self::instance ) but resolves to `None` instead of
    /// failing when no suitable binding exists anywhere in the chain.
    pub fn instance_or_none<T>( &self ) -> Result<Option<Arc<T>>, GraphError>
    where
        T: Send + Sync + 'static,
    {
        Self::optional( self.instance::<T>() )
    }

    /// Qualified variant of [`instance_or_none`]( Self::instance_or_none ).
    pub fn instance_or_none_qualified<T>( &self, qualifier: impl Into<Qualifier> ) -> Result<Option<Arc<T>>, GraphError>
    where
        T: Send + Sync + 'static,
    {
        Self::optional( self.instance_qualified::<T>( qualifier ))
    }

    /// Resolves the unqualified factory binding producing `T` from an `A`.
    pub fn instance_with<A, T>( &self, argument: A ) -> Result<Arc<T>, GraphError>
    where
        A: Hash + Eq + Clone + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.typed( &TypeKey::of_factory::<A, T>(), &Argument::of( argument ))
    }

    /// Qualified variant of [`instance_with`]( Self::instance_with ).
    pub fn instance_with_qualified<A, T>( &self, qualifier: impl Into<Qualifier>, argument: A ) -> Result<Arc<T>, GraphError>
    where
        A: Hash + Eq + Clone + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.typed( &TypeKey::of_factory_qualified::<A, T>( qualifier ), &Argument::of( argument ))
    }

    /// Dispatches the registered member-injector callback for `T` against
    /// `target`. Injectors come from an external code generator; the core
    /// only stores and calls them.
    ///
    /// # Errors
    ///
    /// [`GraphError::NoInjector`] when no callback is registered for `T`.
    pub fn inject<T: Any>( &self, target: &mut T ) -> Result<(), GraphError> {
        if self.is_disposed() {
            return Err( GraphError::AlreadyDisposed { qualifier: self.qualifier().clone() } );
        }
        let Some( injector ) = self.inner.shared.injectors.get( TypeId::of::<T>() ) else {
            return Err( GraphError::NoInjector { type_name: std::any::type_name::<T>() } );
        };
        injector( self, target ).map_err( | failure | GraphError::Injection {
            type_name: std::any::type_name::<T>(),
            source: failure,
        })
    }

    /// Marks the graph disposed, then best-effort-disposes every initialised
    /// bound service. Idempotent: disposing twice is a no-op.
    ///
    /// # Errors
    ///
    /// A failing dispose hook never stops disposal of the remaining
    /// services; all failures are aggregated into the returned
    /// [`DisposalError`].
    pub fn dispose( &self ) -> Result<(), DisposalError> {
        let mut failures = Vec::new();
        self.dispose_collect( &mut failures );
        DisposalError::from_failures( failures ).map_or( Ok(()), Err )
    }

    pub(crate) fn dispose_collect( &self, failures: &mut Vec<GraphError> ) {
        if self.inner.disposed.swap( true, Ordering::AcqRel ) {
            return ;
        }
        debug!( qualifier = %self.qualifier(), "disposing graph" );
        let collected_before = failures.len();

        self.plugins().run_graph_dispose( self, failures );

        // Take the services out so dispose hooks never run under the map lock.
        let services: Vec<Arc<BoundService>> = {
            let mut services = self.inner.services.write().unwrap_or_else( PoisonError::into_inner );
            services.drain().map( |( _, service )| service ).collect()
        };
        for service in &services {
            service.dispose( self, failures );
        }

        let failed = failures.len() - collected_before ;
        if failed > 0 {
            warn!( qualifier = %self.qualifier(), failed, "dispose hooks failed" );
        }
    }

    /// Signals memory pressure: releases every soft-singleton instance this
    /// graph caches. The next resolution of an affected binding constructs a
    /// fresh instance.
    pub fn trim_memory( &self ) {
        let services = self.inner.services.read().unwrap_or_else( PoisonError::into_inner );
        for service in services.values() {
            service.trim_memory();
        }
    }

    /// Walks the chain for the definition of `key`, returning the owning
    /// graph and its (created-on-demand) bound service. The bound service of
    /// a delegated binding lives in the graph that defines it, so parent
    /// scopes are shared between all children.
    fn locate( &self, key: &TypeKey ) -> Option<( Graph, Arc<BoundService> )> {
        match self.inner.blueprint.binding( key ) {
            Some( definition ) => Some(( self.clone(), self.bound_service( key, definition.clone() ))),
            None => self.inner.parent.as_ref().and_then( | parent | parent.locate( key )),
        }
    }

    fn chain_contains_type( &self, type_id: TypeId ) -> bool {
        self.inner.blueprint.contains_type( type_id )
            || self.inner.parent.as_ref().is_some_and( | parent | parent.chain_contains_type( type_id ))
    }

    fn bound_service( &self, key: &TypeKey, definition: Arc<BindingDefinition> ) -> Arc<BoundService> {
        if let Some( service ) = self.inner.services.read().unwrap_or_else( PoisonError::into_inner ).get( key ) {
            return service.clone();
        }
        let mut services = self.inner.services.write().unwrap_or_else( PoisonError::into_inner );
        services
            .entry( key.clone() )
            .or_insert_with( || Arc::new( BoundService::new( definition )))
            .clone()
    }

    fn typed<T>( &self, key: &TypeKey, argument: &Argument ) -> Result<Arc<T>, GraphError>
    where
        T: Send + Sync + 'static,
    {
        self.resolve( key, argument )?
            .downcast::<T>()
            .map_err( | _ | GraphError::UnsuitableKey { key: key.clone() } )
    }

    fn optional<T>( resolved: Result<Arc<T>, GraphError> ) -> Result<Option<Arc<T>>, GraphError> {
        match resolved {
            Ok( instance ) => Ok( Some( instance )),
            Err( GraphError::UnresolvedBinding { .. } | GraphError::UnsuitableKey { .. } ) => Ok( None ),
            Err( error ) => Err( error ),
        }
    }

}

impl fmt::Debug for Graph {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
        f.debug_struct( "Graph" )
            .field( "qualifier", self.qualifier() )
            .field( "disposed", &self.is_disposed() )
            .field( "has_parent", &self.inner.parent.is_some() )
            .finish_non_exhaustive()
    }
}
