//! Per-call cycle detection.
//!
//! Resolution is synchronous, so the chain of in-progress constructions for
//! one outermost `resolve` call lives entirely on one thread. A thread-local
//! stack of (graph, key) pairs makes re-entrant construction of the same
//! binding detectable without any cross-thread coordination, and the stack
//! empties exactly when the outermost call returns. Frames carry the owning
//! graph's identity because a child may shadow a parent key: the two
//! bindings share a key but are distinct, and a delegation chain passing
//! through both is not a cycle.

use std::cell::RefCell ;

use crate::graph::GraphError ;
use crate::key::TypeKey ;



thread_local! {
    static STACK: RefCell<Vec<( usize, TypeKey )>> = const { RefCell::new( Vec::new() ) };
}

/// RAII frame for one binding on the current resolution call path.
pub(crate) struct Frame ;

impl Frame {

    /// Pushes `key` for the graph identified by `graph`, failing if that
    /// same binding is already being resolved on this call path.
    pub(crate) fn enter( graph: usize, key: &TypeKey ) -> Result<Self, GraphError> {
        STACK.with( | stack | {
            let mut stack = stack.borrow_mut();
            if stack.iter().any( | ( held_graph, held_key ) | *held_graph == graph && held_key == key ) {
                return Err( GraphError::CyclicDependency { key: key.clone() } );
            }
            stack.push(( graph, key.clone() ));
            Ok( Frame )
        })
    }

}

impl Drop for Frame {
    fn drop( &mut self ) {
        // Frames are strictly nested, so popping the top removes this frame's key.
        STACK.with( | stack | {
            stack.borrow_mut().pop();
        });
    }
}



#[cfg( test )]
mod tests {
    use super::* ;

    #[test]
    fn reentering_the_same_key_fails() {
        let key = TypeKey::of::<String>();
        let _outer = Frame::enter( 1, &key ).unwrap();
        assert!( matches!(
            Frame::enter( 1, &key ),
            Err( GraphError::CyclicDependency { .. } )
        ));
    }

    #[test]
    fn dropping_a_frame_releases_its_key() {
        let key = TypeKey::of::<String>();
        {
            let _frame = Frame::enter( 1, &key ).unwrap();
        }
        let _again = Frame::enter( 1, &key ).unwrap();
    }

    #[test]
    fn distinct_keys_nest() {
        let _a = Frame::enter( 1, &TypeKey::of::<String>() ).unwrap();
        let _b = Frame::enter( 1, &TypeKey::of::<u32>() ).unwrap();
        let _c = Frame::enter( 1, &TypeKey::of_qualified::<String>( "other" )).unwrap();
    }

    #[test]
    fn the_same_key_nests_across_distinct_graphs() {
        let key = TypeKey::of::<String>();
        let _outer = Frame::enter( 1, &key ).unwrap();
        let _inner = Frame::enter( 2, &key ).unwrap();
    }

}
