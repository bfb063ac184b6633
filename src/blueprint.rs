//! Immutable binding collections.
//!
//! A [`Blueprint`] is the declarative side of the runtime: a qualified set of
//! [`BindingDefinition`]s plus named nested blueprints (subcomponents). It is
//! built once via [`Blueprint::builder`], is immutable afterwards and can be
//! activated into arbitrarily many independent graphs.

mod binding ;
mod builder ;

pub use binding::{ BindingDefinition, HookError, Instance };
pub use builder::{ BlueprintBuilder, DeclaredBinding, DeclaredFactoryBinding, OverlayBlock };

use std::any::TypeId ;
use std::collections::HashMap ;
use std::sync::Arc ;

use thiserror::Error ;

use crate::key::TypeKey ;
use crate::qualifier::Qualifier ;



/// Error that can occur while sealing a [`BlueprintBuilder`].
#[derive( Debug, Error, Clone, PartialEq, Eq )]
pub enum BlueprintError {
    /// Two definitions at the same blueprint level share a [`TypeKey`].
    #[error( "Duplicate binding for {key}" )]
    DuplicateBinding { key: TypeKey },
    /// Two subcomponents at the same blueprint level share a qualifier.
    #[error( "Duplicate subcomponent `{qualifier}`" )]
    DuplicateSubcomponent { qualifier: Qualifier },
}



/// An immutable, qualified collection of binding recipes plus named nested
/// blueprints.
///
/// Cloning is cheap: definitions are shared behind [`Arc`]s. An open-time
/// overlay is expressed through [`extend`]( Self::extend ), which derives a
/// new blueprint instead of mutating this one.
#[derive( Debug, Clone )]
pub struct Blueprint {
    qualifier: Qualifier,
    bindings: HashMap<TypeKey, Arc<BindingDefinition>>,
    subcomponents: HashMap<Qualifier, Blueprint>,
}

impl Blueprint {

    /// Starts an empty builder for a blueprint named `qualifier`.
    pub fn builder( qualifier: impl Into<Qualifier> ) -> BlueprintBuilder {
        BlueprintBuilder::new( qualifier.into() )
    }

    pub(crate) fn from_parts(
        qualifier: Qualifier,
        bindings: HashMap<TypeKey, Arc<BindingDefinition>>,
        subcomponents: HashMap<Qualifier, Blueprint>,
    ) -> Self {
        Self { qualifier, bindings, subcomponents }
    }

    /// The name of this blueprint ("root" conventionally for applications,
    /// the subcomponent qualifier for nested ones).
    #[inline] pub fn qualifier( &self ) -> &Qualifier { &self.qualifier }

    /// The nested blueprint registered under `qualifier`, if any.
    pub fn subcomponent( &self, qualifier: &Qualifier ) -> Option<&Blueprint> {
        self.subcomponents.get( qualifier )
    }

    /// Number of bindings at this level.
    #[inline] pub fn len( &self ) -> usize { self.bindings.len() }

    /// Whether this level declares no bindings.
    #[inline] pub fn is_empty( &self ) -> bool { self.bindings.is_empty() }

    /// Derives a new blueprint with `block` applied on top of this one.
    /// Bindings declared in the block shadow same-keyed bindings of this
    /// blueprint.
    pub fn extend( &self, block: impl FnOnce( &mut BlueprintBuilder )) -> Blueprint {
        let mut builder = BlueprintBuilder::overlay_of( self );
        block( &mut builder );
        builder.finish()
    }

    pub(crate) fn binding( &self, key: &TypeKey ) -> Option<&Arc<BindingDefinition>> {
        self.bindings.get( key )
    }

    pub(crate) fn contains_type( &self, type_id: TypeId ) -> bool {
        self.bindings.keys().any( | key | key.type_id() == type_id )
    }

    pub(crate) fn bindings( &self ) -> &HashMap<TypeKey, Arc<BindingDefinition>> {
        &self.bindings
    }

    pub(crate) fn subcomponents( &self ) -> &HashMap<Qualifier, Blueprint> {
        &self.subcomponents
    }

}
