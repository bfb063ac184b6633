//! Dotted paths addressing graphs inside a [`Tree`]( crate::Tree ).

use std::fmt ;

use itertools::Itertools ;

use crate::qualifier::Qualifier ;



/// An ordered sequence of qualifiers addressing one graph in a tree.
///
/// The empty path is the root. Paths display dotted, `presentation.view`,
/// which is also the form error messages use.
#[derive( Debug, Clone, PartialEq, Eq, Hash, Default )]
pub struct GraphPath {
    segments: Vec<Qualifier>,
}

impl GraphPath {

    /// The empty path, addressing the root graph.
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self { segments: Vec::new() }
    }

    #[must_use]
    pub fn new( segments: impl IntoIterator<Item = impl Into<Qualifier>> ) -> Self {
        Self { segments: segments.into_iter().map( Into::into ).collect() }
    }

    #[inline] #[must_use] pub fn is_root( &self ) -> bool { self.segments.is_empty() }

    #[inline] #[must_use] pub fn len( &self ) -> usize { self.segments.len() }

    #[inline] #[must_use] pub fn is_empty( &self ) -> bool { self.segments.is_empty() }

    #[inline] #[must_use] pub fn segments( &self ) -> &[ Qualifier ] { &self.segments }

    /// The final segment, or `None` for the root path.
    #[must_use]
    pub fn last( &self ) -> Option<&Qualifier> {
        self.segments.last()
    }

    /// The path one segment shorter, or `None` for the root path.
    #[must_use]
    pub fn parent( &self ) -> Option<Self> {
        match self.segments.split_last() {
            Some(( _, ancestors )) => Some( Self { segments: ancestors.to_vec() } ),
            None => None,
        }
    }

    /// The path extended by one segment.
    #[must_use]
    pub fn child( &self, segment: impl Into<Qualifier> ) -> Self {
        let mut segments = self.segments.clone();
        segments.push( segment.into() );
        Self { segments }
    }

    /// Every path from the root down to (and excluding) this one, shortest
    /// first.
    pub(crate) fn ancestors( &self ) -> impl Iterator<Item = Self> + '_ {
        ( 0 .. self.segments.len() ).map( | depth | Self { segments: self.segments[ .. depth ].to_vec() } )
    }

    /// Whether `self` is `prefix` itself or lies somewhere below it.
    #[must_use]
    pub fn starts_with( &self, prefix: &Self ) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[ .. prefix.segments.len() ] == prefix.segments[ .. ]
    }

    /// The path with its final segment replaced, used when a graph is
    /// registered under an identifier differing from its subcomponent name.
    /// Must not be called on the root path.
    pub(crate) fn with_last( &self, identifier: Qualifier ) -> Self {
        let mut segments = self.segments.clone();
        if let Some( last ) = segments.last_mut() {
            *last = identifier ;
        }
        Self { segments }
    }

}

impl fmt::Display for GraphPath {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
        if self.is_root() {
            write!( f, "(root)" )
        } else {
            write!( f, "{}", self.segments.iter().map( Qualifier::as_str ).join( "." ))
        }
    }
}

impl<S: Into<Qualifier>> From<Vec<S>> for GraphPath {
    fn from( segments: Vec<S> ) -> Self {
        Self::new( segments )
    }
}

impl<S: Into<Qualifier>> FromIterator<S> for GraphPath {
    fn from_iter<I: IntoIterator<Item = S>>( segments: I ) -> Self {
        Self::new( segments )
    }
}



#[cfg( test )]
mod tests {

    use super::* ;


    #[test]
    fn root_displays_as_a_placeholder() {
        assert_eq!( GraphPath::root().to_string(), "(root)" );
    }


    #[test]
    fn paths_display_dotted() {
        let path = GraphPath::new( [ "presentation", "view" ] );
        assert_eq!( path.to_string(), "presentation.view" );
    }


    #[test]
    fn parent_walks_towards_the_root() {
        let path = GraphPath::new( [ "a", "b" ] );
        let parent = path.parent().unwrap();
        assert_eq!( parent, GraphPath::new( [ "a" ] ));
        assert_eq!( parent.parent().unwrap(), GraphPath::root() );
        assert_eq!( GraphPath::root().parent(), None );
    }


    #[test]
    fn prefix_tests_cover_self_and_descendants() {
        let base = GraphPath::new( [ "a" ] );
        assert!( base.starts_with( &base ));
        assert!( GraphPath::new( [ "a", "b" ] ).starts_with( &base ));
        assert!( GraphPath::new( [ "a", "b", "c" ] ).starts_with( &GraphPath::root() ));
        assert!( ! GraphPath::new( [ "ab" ] ).starts_with( &base ));
        assert!( ! GraphPath::new( [ "b", "a" ] ).starts_with( &base ));
    }


    #[test]
    fn ancestors_run_shortest_first() {
        let path = GraphPath::new( [ "a", "b", "c" ] );
        let ancestors: Vec<_> = path.ancestors().collect();
        assert_eq!( ancestors, vec![
            GraphPath::root(),
            GraphPath::new( [ "a" ] ),
            GraphPath::new( [ "a", "b" ] ),
        ]);
    }

}
