//! Cross-cutting observers of graph lifecycles.
//!
//! Plugins are registered once, before any graph is activated, and observe
//! every construction and every graph disposal in the application. Typical
//! uses are logging, leak tracking and test instrumentation.

use std::fmt ;
use std::sync::Arc ;

use crate::argument::Argument ;
use crate::blueprint::{ HookError, Instance };
use crate::graph::{ Graph, GraphError };
use crate::scope::Scope ;



/// An observer of graph lifecycles. Both hooks default to no-ops so a
/// plugin implements only what it cares about.
pub trait GraphPlugin: Send + Sync {

    /// Called after an instance is constructed and its own post-construct
    /// hook has run, before the instance is published to other resolvers.
    /// An error fails the resolution and leaves the instance unpublished.
    fn post_construct(
        &self,
        graph: &Graph,
        scope: Scope,
        argument: &Argument,
        instance: &Instance,
    ) -> Result<(), HookError> {
        let _ = ( graph, scope, argument, instance );
        Ok(())
    }

    /// Called when a graph is disposed, before its bound services run their
    /// dispose hooks. Failures are collected into the disposal report; they
    /// never stop the disposal.
    fn graph_dispose( &self, graph: &Graph ) -> Result<(), HookError> {
        let _ = graph ;
        Ok(())
    }

}



/// The ordered set of registered plugins. Hooks run in registration order.
#[derive( Clone, Default )]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn GraphPlugin>>,
}

impl PluginRegistry {

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register( &mut self, plugin: impl GraphPlugin + 'static ) -> &mut Self {
        self.plugins.push( Arc::new( plugin ));
        self
    }

    #[inline] #[must_use] pub fn len( &self ) -> usize { self.plugins.len() }

    #[inline] #[must_use] pub fn is_empty( &self ) -> bool { self.plugins.is_empty() }

    /// Runs every post-construct observer; the first failure aborts the
    /// resolution.
    pub(crate) fn run_post_construct(
        &self,
        graph: &Graph,
        scope: Scope,
        argument: &Argument,
        instance: &Instance,
    ) -> Result<(), GraphError> {
        for plugin in &self.plugins {
            plugin
                .post_construct( graph, scope, argument, instance )
                .map_err( | source | GraphError::Plugin { source } )?;
        }
        Ok(())
    }

    /// Runs every graph-dispose observer, collecting failures.
    pub(crate) fn run_graph_dispose( &self, graph: &Graph, failures: &mut Vec<GraphError> ) {
        for plugin in &self.plugins {
            if let Err( source ) = plugin.graph_dispose( graph ) {
                failures.push( GraphError::Plugin { source } );
            }
        }
    }

}

impl fmt::Debug for PluginRegistry {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
        f.debug_struct( "PluginRegistry" )
            .field( "plugins", &self.plugins.len() )
            .finish()
    }
}
