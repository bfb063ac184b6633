//! Opaque names for bindings and subcomponents.

use std::borrow::Cow ;
use std::fmt ;



/// An opaque name distinguishing same-typed bindings and identifying
/// subcomponent blueprints and tree path segments.
///
/// The default binding of a type carries no qualifier. Cheap to clone;
/// static strings are borrowed rather than copied.
#[derive( Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord )]
pub struct Qualifier( Cow<'static, str> );

impl Qualifier {
    /// The qualifier name.
    #[inline] pub fn as_str( &self ) -> &str { &self.0 }
}

impl From<&'static str> for Qualifier {
    fn from( name: &'static str ) -> Self {
        Self( Cow::Borrowed( name ))
    }
}

impl From<String> for Qualifier {
    fn from( name: String ) -> Self {
        Self( Cow::Owned( name ))
    }
}

impl fmt::Display for Qualifier {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
        f.write_str( &self.0 )
    }
}
