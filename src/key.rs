//! Binding identity.
//!
//! A [`TypeKey`] identifies one binding within a blueprint level: the declared
//! type, an optional [`Qualifier`] and the argument shape its factory accepts.
//! Keys are explicit values built by the binding author - no runtime
//! reflection is involved anywhere.

use std::any::{ Any, TypeId };
use std::fmt ;
use std::hash::{ Hash, Hasher };

use crate::qualifier::Qualifier ;



/// Identity of a binding: `(declared type, qualifier, argument shape)`.
///
/// Unqualified unit-argument keys are the common case. A parameterised
/// factory for the same target type gets a distinct key because its argument
/// type differs, so `instance::<T>()` and `instance_with::<A, T>( a )` never
/// collide.
///
/// Type names are carried for error messages only; equality and hashing are
/// driven by the [`TypeId`]s and the qualifier.
#[derive( Debug, Clone )]
pub struct TypeKey {
    type_id: TypeId,
    argument_id: TypeId,
    qualifier: Option<Qualifier>,
    type_name: &'static str,
    argument_name: &'static str,
}

impl TypeKey {

    /// Key of the unqualified binding for `T`.
    pub fn of<T: Any>() -> Self {
        Self::build::<T, ()>( None )
    }

    /// Key of the binding for `T` under `qualifier`.
    pub fn of_qualified<T: Any>( qualifier: impl Into<Qualifier> ) -> Self {
        Self::build::<T, ()>( Some( qualifier.into() ))
    }

    /// Key of the unqualified factory binding producing `T` from an `A`.
    pub fn of_factory<A: Any, T: Any>() -> Self {
        Self::build::<T, A>( None )
    }

    /// Key of the factory binding producing `T` from an `A` under `qualifier`.
    pub fn of_factory_qualified<A: Any, T: Any>( qualifier: impl Into<Qualifier> ) -> Self {
        Self::build::<T, A>( Some( qualifier.into() ))
    }

    fn build<T: Any, A: Any>( qualifier: Option<Qualifier> ) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            argument_id: TypeId::of::<A>(),
            qualifier,
            type_name: std::any::type_name::<T>(),
            argument_name: std::any::type_name::<A>(),
        }
    }

    /// The declared type this key binds.
    #[inline] pub fn type_id( &self ) -> TypeId { self.type_id }

    /// The qualifier, if the binding is qualified.
    #[inline] pub fn qualifier( &self ) -> Option<&Qualifier> { self.qualifier.as_ref() }

    /// Whether the factory behind this key takes an argument.
    #[inline] pub fn is_parameterised( &self ) -> bool { self.argument_id != TypeId::of::<()>() }

}

impl PartialEq for TypeKey {
    fn eq( &self, other: &Self ) -> bool {
        self.type_id == other.type_id
            && self.argument_id == other.argument_id
            && self.qualifier == other.qualifier
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>( &self, state: &mut H ) {
        self.type_id.hash( state );
        self.argument_id.hash( state );
        self.qualifier.hash( state );
    }
}

impl fmt::Display for TypeKey {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
        write!( f, "`{}`", self.type_name )?;
        if let Some( qualifier ) = &self.qualifier {
            write!( f, " (qualifier `{qualifier}`)" )?;
        }
        if self.is_parameterised() {
            write!( f, " (argument `{}`)", self.argument_name )?;
        }
        Ok(())
    }
}
