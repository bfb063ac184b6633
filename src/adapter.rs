//! The host-lifecycle adapter seam.
//!
//! Host frameworks construct their own objects (activities, views, request
//! handlers) and signal their lifecycles through callbacks. An
//! [`InjectionAdapter`] maps those host objects to graphs; the core ships
//! only the trivial mapping, [`RootGraphOnlyAdapter`], which sends every
//! host to the root graph. Richer mappings (one graph per screen, per
//! session) are host-integration code and live outside this crate.

use std::any::Any ;
use std::fmt ;
use std::sync::Arc ;

use thiserror::Error ;
use tracing::warn ;

use crate::graph::{ Graph, GraphError };
use crate::tree::{ GraphPath, OpenOptions, Tree, TreeError };



/// Errors surfacing through the adapter seam: either a tree lifecycle
/// precondition or a graph resolution failure, depending on what the
/// adapter had to do.
#[derive( Debug, Error )]
pub enum InjectionError {

    #[error( transparent )]
    Tree( #[from] TreeError ),

    #[error( transparent )]
    Graph( #[from] GraphError ),

}



/// Maps host objects to graphs. The mapping from host categories to tree
/// paths is entirely the adapter's business.
pub trait InjectionAdapter: Send + Sync {

    /// Opens (or otherwise produces) the graph backing `host`.
    fn create_graph( &self, host: &dyn Any, options: OpenOptions ) -> Result<Graph, InjectionError>;

    /// The already-open graph backing `host`.
    fn get_graph( &self, host: &dyn Any ) -> Result<Graph, InjectionError>;

    /// Closes the graph backing `host`.
    fn dispose_graph( &self, host: &dyn Any ) -> Result<(), InjectionError>;

}



/// The entry point host integrations call into, delegating every operation
/// to the configured adapter.
pub struct Injection {
    adapter: Box<dyn InjectionAdapter>,
}

impl Injection {

    #[must_use]
    pub fn new( adapter: impl InjectionAdapter + 'static ) -> Self {
        Self { adapter: Box::new( adapter ) }
    }

    /// An injection facade mapping every host object to the tree's root
    /// graph.
    #[must_use]
    pub fn root_graph_only( tree: Arc<Tree> ) -> Self {
        Self::new( RootGraphOnlyAdapter::new( tree ))
    }

    /// # Errors
    ///
    /// Whatever the adapter reports for opening the host's graph.
    pub fn create_graph( &self, host: &dyn Any ) -> Result<Graph, InjectionError> {
        self.adapter.create_graph( host, OpenOptions::new() )
    }

    /// [`create_graph`]( Self::create_graph ) with an overlay or identifier
    /// for the opened graph.
    ///
    /// # Errors
    ///
    /// Whatever the adapter reports for opening the host's graph.
    pub fn create_graph_with( &self, host: &dyn Any, options: OpenOptions ) -> Result<Graph, InjectionError> {
        self.adapter.create_graph( host, options )
    }

    /// # Errors
    ///
    /// Whatever the adapter reports when no graph backs the host.
    pub fn get_graph( &self, host: &dyn Any ) -> Result<Graph, InjectionError> {
        self.adapter.get_graph( host )
    }

    /// # Errors
    ///
    /// Whatever the adapter reports for closing the host's graph.
    pub fn dispose_graph( &self, host: &dyn Any ) -> Result<(), InjectionError> {
        self.adapter.dispose_graph( host )
    }

    /// Runs the registered member injector for `T` against `target`, using
    /// the graph the adapter maps `target` to.
    ///
    /// # Errors
    ///
    /// Adapter lookup failures, [`GraphError::NoInjector`] when `T` has no
    /// registered injector, and injector failures.
    pub fn inject<T: Any>( &self, target: &mut T ) -> Result<(), InjectionError> {
        let graph = self.adapter.get_graph( target )?;
        graph.inject( target )?;
        Ok(())
    }

}

impl fmt::Debug for Injection {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
        f.debug_struct( "Injection" ).finish_non_exhaustive()
    }
}



/// The default adapter: every host object shares the tree's root graph.
#[derive( Debug )]
pub struct RootGraphOnlyAdapter {
    tree: Arc<Tree>,
}

impl RootGraphOnlyAdapter {

    #[must_use]
    pub fn new( tree: Arc<Tree> ) -> Self {
        Self { tree }
    }

}

impl InjectionAdapter for RootGraphOnlyAdapter {

    fn create_graph( &self, _host: &dyn Any, options: OpenOptions ) -> Result<Graph, InjectionError> {
        Ok( self.tree.open_with( GraphPath::root(), options )? )
    }

    fn get_graph( &self, _host: &dyn Any ) -> Result<Graph, InjectionError> {
        Ok( self.tree.get( &GraphPath::root() )? )
    }

    fn dispose_graph( &self, _host: &dyn Any ) -> Result<(), InjectionError> {
        let ( _, failures ) = self.tree.close( &GraphPath::root() )?;
        if ! failures.is_empty() {
            warn!( failed = failures.len(), "dispose hooks failed while closing the root graph" );
        }
        Ok(())
    }

}
