//! Erased factory arguments.
//!
//! Parameterised factories receive their argument through the type-erased
//! resolution path. Multiton caching additionally needs the argument to act
//! as a hash-map key, so the typed call site captures hashing and equality
//! before erasure.

use std::any::{ Any, TypeId };
use std::collections::hash_map::DefaultHasher ;
use std::fmt ;
use std::hash::{ Hash, Hasher };
use std::sync::Arc ;



/// A type-erased factory argument.
///
/// Unit-argument bindings receive [`Argument::none`]. The hash and equality
/// captured at construction make the argument usable as a multiton cache key
/// without the core knowing its concrete type.
#[derive( Clone )]
pub struct Argument {
    value: Arc<dyn Any + Send + Sync>,
    hash: u64,
    eq: Arc<dyn Fn( &( dyn Any + Send + Sync )) -> bool + Send + Sync>,
}

impl Argument {

    /// The unit argument used by all non-parameterised bindings.
    pub fn none() -> Self {
        Self::of( () )
    }

    /// Erases `value`, capturing its hash and equality.
    pub fn of<A>( value: A ) -> Self
    where
        A: Hash + Eq + Clone + Send + Sync + 'static,
    {
        // DefaultHasher::new() uses fixed keys, so equal values hash equally
        // across call sites within one process.
        let mut hasher = DefaultHasher::new();
        TypeId::of::<A>().hash( &mut hasher );
        value.hash( &mut hasher );
        let hash = hasher.finish();

        let probe = value.clone();
        Self {
            value: Arc::new( value ),
            hash,
            eq: Arc::new( move | other | other.downcast_ref::<A>() == Some( &probe )),
        }
    }

    /// Downcasts to the concrete argument type.
    #[inline]
    pub fn downcast_ref<A: Any>( &self ) -> Option<&A> {
        self.value.downcast_ref::<A>()
    }

    /// The erased argument value.
    #[inline] pub fn value( &self ) -> &( dyn Any + Send + Sync ) { self.value.as_ref() }

}

impl PartialEq for Argument {
    fn eq( &self, other: &Self ) -> bool {
        self.hash == other.hash && ( self.eq )( other.value.as_ref() )
    }
}

impl Eq for Argument {}

impl Hash for Argument {
    fn hash<H: Hasher>( &self, state: &mut H ) {
        state.write_u64( self.hash );
    }
}

impl fmt::Debug for Argument {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
        f.debug_struct( "Argument" ).field( "hash", &self.hash ).finish_non_exhaustive()
    }
}
