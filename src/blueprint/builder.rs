//! Accumulating builder for blueprints.
//!
//! The builder is the only way bindings come into existence: each scope gets
//! a typed registration method that erases the factory into the shared
//! [`BindingDefinition`] shape. Duplicate keys at one level are recorded and
//! reported by [`BlueprintBuilder::build`].

use std::any::Any ;
use std::hash::Hash ;
use std::marker::PhantomData ;
use std::sync::Arc ;

use crate::argument::Argument ;
use crate::graph::{ Graph, GraphError };
use crate::key::TypeKey ;
use crate::qualifier::Qualifier ;
use crate::scope::Scope ;
use super::binding::{ BindingDefinition, ErasedFactory, ErasedHook, HookError, Instance };
use super::{ Blueprint, BlueprintError };



/// A builder block applied to a blueprint at the moment a graph for it is
/// opened. Bindings declared in the block shadow same-keyed bindings of the
/// underlying blueprint.
pub type OverlayBlock = Box<dyn FnOnce( &mut BlueprintBuilder )>;



/// Accumulates binding definitions and nested subcomponent blueprints.
///
/// Obtained from [`Blueprint::builder`]. Registration methods return a
/// declaration handle for attaching lifecycle hooks:
///
/// ```
/// use trellis::Blueprint ;
///
/// # fn main() -> Result<(), trellis::BlueprintError> {
/// let mut builder = Blueprint::builder( "app" );
/// builder
/// 	.singleton( | _graph | Ok( vec![ 0u8; 16 ] ))
/// 	.on_dispose( | _graph, buffer | {
/// 		assert_eq!( buffer.len(), 16 );
/// 		Ok(())
/// 	});
/// let blueprint = builder.build()?;
/// assert_eq!( blueprint.qualifier().as_str(), "app" );
/// # Ok(())
/// # }
/// ```
pub struct BlueprintBuilder {
    qualifier: Qualifier,
    bindings: std::collections::HashMap<TypeKey, Arc<BindingDefinition>>,
    subcomponents: std::collections::HashMap<Qualifier, Blueprint>,
    overlay: bool,
    error: Option<BlueprintError>,
}

impl BlueprintBuilder {

    pub(crate) fn new( qualifier: Qualifier ) -> Self {
        Self {
            qualifier,
            bindings: std::collections::HashMap::new(),
            subcomponents: std::collections::HashMap::new(),
            overlay: false,
            error: None,
        }
    }

    /// Builder seeded with an existing blueprint; registrations replace
    /// instead of conflicting.
    pub(crate) fn overlay_of( blueprint: &Blueprint ) -> Self {
        Self {
            qualifier: blueprint.qualifier().clone(),
            bindings: blueprint.bindings().clone(),
            subcomponents: blueprint.subcomponents().clone(),
            overlay: true,
            error: None,
        }
    }

    /// The qualifier of the blueprint under construction.
    #[inline] pub fn qualifier( &self ) -> &Qualifier { &self.qualifier }

    /// Registers an unqualified prototype binding.
    pub fn prototype<T, F>( &mut self, factory: F ) -> DeclaredBinding<'_, T>
    where
        T: Send + Sync + 'static,
        F: Fn( &Graph ) -> Result<T, HookError> + Send + Sync + 'static,
    {
        self.unit_binding( Scope::Prototype, None, factory )
    }

    /// Registers a qualified prototype binding.
    pub fn prototype_qualified<T, F>( &mut self, qualifier: impl Into<Qualifier>, factory: F ) -> DeclaredBinding<'_, T>
    where
        T: Send + Sync + 'static,
        F: Fn( &Graph ) -> Result<T, HookError> + Send + Sync + 'static,
    {
        self.unit_binding( Scope::Prototype, Some( qualifier.into() ), factory )
    }

    /// Registers an unqualified singleton binding.
    pub fn singleton<T, F>( &mut self, factory: F ) -> DeclaredBinding<'_, T>
    where
        T: Send + Sync + 'static,
        F: Fn( &Graph ) -> Result<T, HookError> + Send + Sync + 'static,
    {
        self.unit_binding( Scope::Singleton, None, factory )
    }

    /// Registers a qualified singleton binding.
    pub fn singleton_qualified<T, F>( &mut self, qualifier: impl Into<Qualifier>, factory: F ) -> DeclaredBinding<'_, T>
    where
        T: Send + Sync + 'static,
        F: Fn( &Graph ) -> Result<T, HookError> + Send + Sync + 'static,
    {
        self.unit_binding( Scope::Singleton, Some( qualifier.into() ), factory )
    }

    /// Registers an unqualified weak singleton binding.
    pub fn weak_singleton<T, F>( &mut self, factory: F ) -> DeclaredBinding<'_, T>
    where
        T: Send + Sync + 'static,
        F: Fn( &Graph ) -> Result<T, HookError> + Send + Sync + 'static,
    {
        self.unit_binding( Scope::WeakSingleton, None, factory )
    }

    /// Registers a qualified weak singleton binding.
    pub fn weak_singleton_qualified<T, F>( &mut self, qualifier: impl Into<Qualifier>, factory: F ) -> DeclaredBinding<'_, T>
    where
        T: Send + Sync + 'static,
        F: Fn( &Graph ) -> Result<T, HookError> + Send + Sync + 'static,
    {
        self.unit_binding( Scope::WeakSingleton, Some( qualifier.into() ), factory )
    }

    /// Registers an unqualified soft singleton binding.
    pub fn soft_singleton<T, F>( &mut self, factory: F ) -> DeclaredBinding<'_, T>
    where
        T: Send + Sync + 'static,
        F: Fn( &Graph ) -> Result<T, HookError> + Send + Sync + 'static,
    {
        self.unit_binding( Scope::SoftSingleton, None, factory )
    }

    /// Registers a qualified soft singleton binding.
    pub fn soft_singleton_qualified<T, F>( &mut self, qualifier: impl Into<Qualifier>, factory: F ) -> DeclaredBinding<'_, T>
    where
        T: Send + Sync + 'static,
        F: Fn( &Graph ) -> Result<T, HookError> + Send + Sync + 'static,
    {
        self.unit_binding( Scope::SoftSingleton, Some( qualifier.into() ), factory )
    }

    /// Registers a singleton binding for a prebuilt value. All graphs
    /// activated from this blueprint share the same instance.
    pub fn constant<T>( &mut self, value: T ) -> DeclaredBinding<'_, T>
    where
        T: Send + Sync + 'static,
    {
        self.constant_binding( None, value )
    }

    /// Registers a qualified singleton binding for a prebuilt value.
    pub fn constant_qualified<T>( &mut self, qualifier: impl Into<Qualifier>, value: T ) -> DeclaredBinding<'_, T>
    where
        T: Send + Sync + 'static,
    {
        self.constant_binding( Some( qualifier.into() ), value )
    }

    /// Registers an unqualified argument-taking factory binding.
    pub fn factory<A, T, F>( &mut self, factory: F ) -> DeclaredFactoryBinding<'_, A, T>
    where
        A: Hash + Eq + Clone + Send + Sync + 'static,
        T: Send + Sync + 'static,
        F: Fn( &Graph, &A ) -> Result<T, HookError> + Send + Sync + 'static,
    {
        self.argument_binding( Scope::Factory, None, factory )
    }

    /// Registers a qualified argument-taking factory binding.
    pub fn factory_qualified<A, T, F>( &mut self, qualifier: impl Into<Qualifier>, factory: F ) -> DeclaredFactoryBinding<'_, A, T>
    where
        A: Hash + Eq + Clone + Send + Sync + 'static,
        T: Send + Sync + 'static,
        F: Fn( &Graph, &A ) -> Result<T, HookError> + Send + Sync + 'static,
    {
        self.argument_binding( Scope::Factory, Some( qualifier.into() ), factory )
    }

    /// Registers an unqualified multiton factory binding: at most one
    /// instance per distinct argument per graph.
    pub fn multiton_factory<A, T, F>( &mut self, factory: F ) -> DeclaredFactoryBinding<'_, A, T>
    where
        A: Hash + Eq + Clone + Send + Sync + 'static,
        T: Send + Sync + 'static,
        F: Fn( &Graph, &A ) -> Result<T, HookError> + Send + Sync + 'static,
    {
        self.argument_binding( Scope::MultitonFactory, None, factory )
    }

    /// Registers a qualified multiton factory binding.
    pub fn multiton_factory_qualified<A, T, F>( &mut self, qualifier: impl Into<Qualifier>, factory: F ) -> DeclaredFactoryBinding<'_, A, T>
    where
        A: Hash + Eq + Clone + Send + Sync + 'static,
        T: Send + Sync + 'static,
        F: Fn( &Graph, &A ) -> Result<T, HookError> + Send + Sync + 'static,
    {
        self.argument_binding( Scope::MultitonFactory, Some( qualifier.into() ), factory )
    }

    /// Registers a nested subcomponent blueprint under `qualifier`. Graphs
    /// for it are opened through the tree as children of graphs of this
    /// blueprint.
    pub fn subcomponent( &mut self, qualifier: impl Into<Qualifier>, block: impl FnOnce( &mut BlueprintBuilder )) -> &mut Self {
        let qualifier = qualifier.into();
        let mut builder = BlueprintBuilder::new( qualifier.clone() );
        block( &mut builder );
        match builder.build() {
            Ok( blueprint ) => {
                if !self.overlay && self.subcomponents.contains_key( &qualifier ) {
                    self.record( BlueprintError::DuplicateSubcomponent { qualifier } );
                } else {
                    self.subcomponents.insert( qualifier, blueprint );
                }
            }
            Err( error ) => self.record( error ),
        }
        self
    }

    /// Seals the accumulated definitions into an immutable [`Blueprint`].
    ///
    /// # Errors
    ///
    /// Returns the first [`BlueprintError`] recorded during registration,
    /// including duplicates inside nested subcomponent blocks.
    pub fn build( self ) -> Result<Blueprint, BlueprintError> {
        match self.error {
            Some( error ) => Err( error ),
            None => Ok( self.finish() ),
        }
    }

    pub(crate) fn finish( self ) -> Blueprint {
        Blueprint::from_parts( self.qualifier, self.bindings, self.subcomponents )
    }

    fn unit_binding<T, F>( &mut self, scope: Scope, qualifier: Option<Qualifier>, factory: F ) -> DeclaredBinding<'_, T>
    where
        T: Send + Sync + 'static,
        F: Fn( &Graph ) -> Result<T, HookError> + Send + Sync + 'static,
    {
        let key = match qualifier {
            None => TypeKey::of::<T>(),
            Some( qualifier ) => TypeKey::of_qualified::<T>( qualifier ),
        };
        let erased: ErasedFactory = {
            let key = key.clone();
            Arc::new( move | graph, _argument | {
                factory( graph )
                    .map( | value | Arc::new( value ) as Instance )
                    .map_err( | failure | GraphError::factory_failure( key.clone(), failure ))
            })
        };
        let key = self.insert( BindingDefinition::new( key, scope, erased ));
        DeclaredBinding { builder: self, key, _target: PhantomData }
    }

    fn constant_binding<T>( &mut self, qualifier: Option<Qualifier>, value: T ) -> DeclaredBinding<'_, T>
    where
        T: Send + Sync + 'static,
    {
        let key = match qualifier {
            None => TypeKey::of::<T>(),
            Some( qualifier ) => TypeKey::of_qualified::<T>( qualifier ),
        };
        let instance: Instance = Arc::new( value );
        let erased: ErasedFactory = Arc::new( move | _graph, _argument | Ok( instance.clone() ));
        let key = self.insert( BindingDefinition::new( key, Scope::Singleton, erased ));
        DeclaredBinding { builder: self, key, _target: PhantomData }
    }

    fn argument_binding<A, T, F>( &mut self, scope: Scope, qualifier: Option<Qualifier>, factory: F ) -> DeclaredFactoryBinding<'_, A, T>
    where
        A: Hash + Eq + Clone + Send + Sync + 'static,
        T: Send + Sync + 'static,
        F: Fn( &Graph, &A ) -> Result<T, HookError> + Send + Sync + 'static,
    {
        let key = match qualifier {
            None => TypeKey::of_factory::<A, T>(),
            Some( qualifier ) => TypeKey::of_factory_qualified::<A, T>( qualifier ),
        };
        let erased: ErasedFactory = {
            let key = key.clone();
            Arc::new( move | graph, argument | {
                let Some( argument ) = argument.downcast_ref::<A>() else {
                    return Err( GraphError::UnsuitableKey { key: key.clone() } );
                };
                factory( graph, argument )
                    .map( | value | Arc::new( value ) as Instance )
                    .map_err( | failure | GraphError::factory_failure( key.clone(), failure ))
            })
        };
        let key = self.insert( BindingDefinition::new( key, scope, erased ));
        DeclaredFactoryBinding { builder: self, key, _target: PhantomData }
    }

    fn insert( &mut self, definition: BindingDefinition ) -> TypeKey {
        let key = definition.key().clone();
        if !self.overlay && self.bindings.contains_key( &key ) {
            self.record( BlueprintError::DuplicateBinding { key: key.clone() } );
        } else {
            self.bindings.insert( key.clone(), Arc::new( definition ));
        }
        key
    }

    fn record( &mut self, error: BlueprintError ) {
        // Keep the first error; later ones are usually knock-on effects.
        self.error.get_or_insert( error );
    }

    fn set_post_construct( &mut self, key: &TypeKey, hook: ErasedHook ) {
        if let Some( definition ) = self.bindings.get_mut( key ) {
            Arc::make_mut( definition ).set_post_construct( hook );
        }
    }

    fn set_dispose( &mut self, key: &TypeKey, hook: ErasedHook ) {
        if let Some( definition ) = self.bindings.get_mut( key ) {
            Arc::make_mut( definition ).set_dispose( hook );
        }
    }

}



/// Handle to a just-declared unit-argument binding, for attaching lifecycle
/// hooks.
pub struct DeclaredBinding<'a, T> {
    builder: &'a mut BlueprintBuilder,
    key: TypeKey,
    _target: PhantomData<fn() -> T>,
}

impl<T> DeclaredBinding<'_, T>
where
    T: Send + Sync + 'static,
{

    /// Attaches a hook run right after the factory constructs an instance.
    /// The instance is not published (and not returned to the caller) until
    /// the hook succeeds.
    pub fn on_post_construct<H>( self, hook: H ) -> Self
    where
        H: Fn( &Graph, &T ) -> Result<(), HookError> + Send + Sync + 'static,
    {
        let erased = erase_unit_hook( self.key.clone(), hook, GraphError::post_construct_failure );
        self.builder.set_post_construct( &self.key, erased );
        self
    }

    /// Attaches a hook run when the owning graph is disposed, once per
    /// cached instance. Prototype bindings cache nothing, so the hook never
    /// runs for them.
    pub fn on_dispose<H>( self, hook: H ) -> Self
    where
        H: Fn( &Graph, &T ) -> Result<(), HookError> + Send + Sync + 'static,
    {
        let erased = erase_unit_hook( self.key.clone(), hook, GraphError::dispose_failure );
        self.builder.set_dispose( &self.key, erased );
        self
    }

}

/// Handle to a just-declared argument-taking binding.
pub struct DeclaredFactoryBinding<'a, A, T> {
    builder: &'a mut BlueprintBuilder,
    key: TypeKey,
    _target: PhantomData<fn( A ) -> T>,
}

impl<A, T> DeclaredFactoryBinding<'_, A, T>
where
    A: Any,
    T: Send + Sync + 'static,
{

    /// Attaches a hook run right after the factory constructs an instance
    /// for an argument. The instance is not published until the hook
    /// succeeds.
    pub fn on_post_construct<H>( self, hook: H ) -> Self
    where
        H: Fn( &Graph, &A, &T ) -> Result<(), HookError> + Send + Sync + 'static,
    {
        let erased = erase_argument_hook( self.key.clone(), hook, GraphError::post_construct_failure );
        self.builder.set_post_construct( &self.key, erased );
        self
    }

    /// Attaches a hook run when the owning graph is disposed, once per
    /// cached argument/instance pair. Plain factory bindings cache nothing,
    /// so the hook never runs for them.
    pub fn on_dispose<H>( self, hook: H ) -> Self
    where
        H: Fn( &Graph, &A, &T ) -> Result<(), HookError> + Send + Sync + 'static,
    {
        let erased = erase_argument_hook( self.key.clone(), hook, GraphError::dispose_failure );
        self.builder.set_dispose( &self.key, erased );
        self
    }

}

fn erase_unit_hook<T, H>(
    key: TypeKey,
    hook: H,
    wrap: fn( TypeKey, HookError ) -> GraphError,
) -> ErasedHook
where
    T: Send + Sync + 'static,
    H: Fn( &Graph, &T ) -> Result<(), HookError> + Send + Sync + 'static,
{
    Arc::new( move | graph: &Graph, _argument: &Argument, instance: &Instance | {
        let Some( instance ) = instance.downcast_ref::<T>() else {
            return Err( GraphError::UnsuitableKey { key: key.clone() } );
        };
        hook( graph, instance ).map_err( | failure | wrap( key.clone(), failure ))
    })
}

fn erase_argument_hook<A, T, H>(
    key: TypeKey,
    hook: H,
    wrap: fn( TypeKey, HookError ) -> GraphError,
) -> ErasedHook
where
    A: Any,
    T: Send + Sync + 'static,
    H: Fn( &Graph, &A, &T ) -> Result<(), HookError> + Send + Sync + 'static,
{
    Arc::new( move | graph: &Graph, argument: &Argument, instance: &Instance | {
        let ( Some( argument ), Some( instance )) =
            ( argument.downcast_ref::<A>(), instance.downcast_ref::<T>() )
        else {
            return Err( GraphError::UnsuitableKey { key: key.clone() } );
        };
        hook( graph, argument, instance ).map_err( | failure | wrap( key.clone(), failure ))
    })
}
