//! Binding recipes.

use std::any::Any ;
use std::fmt ;
use std::sync::Arc ;

use crate::argument::Argument ;
use crate::graph::{ Graph, GraphError };
use crate::key::TypeKey ;
use crate::scope::Scope ;



/// Error type user-supplied factories and lifecycle hooks fail with.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A constructed, type-erased instance as held by graph caches.
pub type Instance = Arc<dyn Any + Send + Sync>;

pub(crate) type ErasedFactory =
    Arc<dyn Fn( &Graph, &Argument ) -> Result<Instance, GraphError> + Send + Sync>;

pub(crate) type ErasedHook =
    Arc<dyn Fn( &Graph, &Argument, &Instance ) -> Result<(), GraphError> + Send + Sync>;



/// An immutable recipe for one binding: scope, factory and optional lifecycle
/// hooks, keyed by a [`TypeKey`].
///
/// Definitions are sealed inside a [`Blueprint`]( crate::Blueprint ); the
/// typed registration surface lives on
/// [`BlueprintBuilder`]( crate::BlueprintBuilder ).
#[derive( Clone )]
pub struct BindingDefinition {
    key: TypeKey,
    scope: Scope,
    factory: ErasedFactory,
    post_construct: Option<ErasedHook>,
    dispose: Option<ErasedHook>,
}

impl BindingDefinition {

    pub(crate) fn new( key: TypeKey, scope: Scope, factory: ErasedFactory ) -> Self {
        Self { key, scope, factory, post_construct: None, dispose: None }
    }

    /// The identity of this binding within its blueprint level.
    #[inline] pub fn key( &self ) -> &TypeKey { &self.key }

    /// The caching policy graphs apply to this binding.
    #[inline] pub fn scope( &self ) -> Scope { self.scope }

    pub(crate) fn factory( &self ) -> &ErasedFactory { &self.factory }

    pub(crate) fn post_construct( &self ) -> Option<&ErasedHook> { self.post_construct.as_ref() }

    pub(crate) fn dispose( &self ) -> Option<&ErasedHook> { self.dispose.as_ref() }

    pub(crate) fn set_post_construct( &mut self, hook: ErasedHook ) {
        self.post_construct = Some( hook );
    }

    pub(crate) fn set_dispose( &mut self, hook: ErasedHook ) {
        self.dispose = Some( hook );
    }

}

impl fmt::Debug for BindingDefinition {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
        f.debug_struct( "BindingDefinition" )
            .field( "key", &self.key )
            .field( "scope", &self.scope )
            .field( "post_construct", &self.post_construct.is_some() )
            .field( "dispose", &self.dispose.is_some() )
            .finish_non_exhaustive()
    }
}
