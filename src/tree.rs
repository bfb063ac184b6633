//! Path-addressed graph lifecycles.
//!
//! A [`Tree`] owns every open [`Graph`] of one application and addresses
//! them by [`GraphPath`]. Each path runs a strict state machine: closed,
//! open, closed again (terminal - reopening means opening a fresh graph at
//! the same path). All preconditions name the exact failing segment so the
//! errors stay debuggable.

mod path ;

use std::collections::HashMap ;
use std::sync::{ Mutex, PoisonError };

use pipe_trait::Pipe ;
use thiserror::Error ;
use tracing::debug ;

use crate::application::Application ;
use crate::blueprint::{ Blueprint, BlueprintBuilder, OverlayBlock };
use crate::graph::{ Graph, GraphError };
use crate::qualifier::Qualifier ;
use crate::utils::PartialSuccess ;
pub use path::GraphPath ;



/// Errors from tree lifecycle preconditions.
#[derive( Debug, Error )]
pub enum TreeError {

    /// A graph is already registered at the target path.
    #[error( "Cannot open `{path}` because it is already open" )]
    AlreadyOpen { path: GraphPath },

    /// A non-root path was opened while the root graph is closed.
    #[error( "Cannot open `{path}` because the root graph is not open" )]
    RootNotOpen { path: GraphPath },

    /// An ancestor of the target path is closed; `parent` names the
    /// shallowest missing one.
    #[error( "Cannot open `{path}` because `{parent}` is not open" )]
    ParentNotOpen { path: GraphPath, parent: GraphPath },

    /// The parent blueprint declares no subcomponent under the final path
    /// segment.
    #[error( "Blueprint `{parent}` has no subcomponent `{qualifier}`" )]
    NoSuchSubcomponent { parent: Qualifier, qualifier: Qualifier },

    /// An identifier override was supplied for the root path, which has no
    /// final segment to override.
    #[error( "An identifier cannot be supplied when opening the root graph" )]
    IdentifierNotAllowed,

    /// No graph is open at the addressed path.
    #[error( "No graph is open at `{path}`" )]
    NotOpen { path: GraphPath },

}



/// Options for [`Tree::open`] and [`Tree::create`]: an identifier override
/// for the final path segment and an overlay block applied to the target
/// blueprint before activation.
#[derive( Default )]
pub struct OpenOptions {
    identifier: Option<Qualifier>,
    overlay: Option<OverlayBlock>,
}

impl OpenOptions {

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the opened graph under `identifier` instead of the final
    /// path segment. The segment still selects the subcomponent blueprint.
    #[must_use]
    pub fn identifier( mut self, identifier: impl Into<Qualifier> ) -> Self {
        self.identifier = Some( identifier.into() );
        self
    }

    /// Applies `block` on top of the target blueprint before activation.
    /// Overlay registrations shadow same-keyed bindings.
    #[must_use]
    pub fn overlay( mut self, block: impl FnOnce( &mut BlueprintBuilder ) + 'static ) -> Self {
        self.overlay = Some( Box::new( block ));
        self
    }

}

impl std::fmt::Debug for OpenOptions {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        f.debug_struct( "OpenOptions" )
            .field( "identifier", &self.identifier )
            .field( "overlay", &self.overlay.is_some() )
            .finish()
    }
}



/// The registry of open graphs, addressed by path.
///
/// Opening the root activates the application blueprint; opening a deeper
/// path activates the subcomponent named by the final segment as a child of
/// the graph at the parent path. Tree mutation takes one coarse lock so the
/// ancestor checks and the path-map update are atomic; it is independent of
/// the per-graph service locks.
#[derive( Debug )]
pub struct Tree {
    application: Application,
    state: Mutex<HashMap<GraphPath, Graph>>,
}

impl Tree {

    #[must_use]
    pub fn new( application: Application ) -> Self {
        Self {
            application,
            state: Mutex::new( HashMap::new() ),
        }
    }

    #[inline] pub fn application( &self ) -> &Application { &self.application }

    /// Opens the graph at `path` with default options.
    ///
    /// # Errors
    ///
    /// See [`open_with`]( Self::open_with ).
    pub fn open( &self, path: impl Into<GraphPath> ) -> Result<Graph, TreeError> {
        self.open_with( path, OpenOptions::new() )
    }

    /// Opens the graph at `path`.
    ///
    /// The root path activates the application blueprint. A non-root path
    /// requires the root and every ancestor segment to be open, activates
    /// the subcomponent blueprint named by the final segment as a child of
    /// the parent graph, and registers it under the identifier override (or
    /// the segment itself).
    ///
    /// # Errors
    ///
    /// [`TreeError::AlreadyOpen`] when the registration path is taken;
    /// [`TreeError::RootNotOpen`] / [`TreeError::ParentNotOpen`] when an
    /// ancestor is closed; [`TreeError::NoSuchSubcomponent`] when the parent
    /// blueprint lacks the segment; [`TreeError::IdentifierNotAllowed`] for
    /// an identifier on the root path.
    pub fn open_with( &self, path: impl Into<GraphPath>, options: OpenOptions ) -> Result<Graph, TreeError> {
        let mut state = self.state.lock().unwrap_or_else( PoisonError::into_inner );
        self.open_locked( &mut state, path.into(), options )
    }

    /// Opens the graph at `path`, first opening every missing ancestor
    /// (including the root) with default options. Unlike
    /// [`open`]( Self::open ) this tolerates already-open ancestors; only an
    /// already-open exact target fails.
    ///
    /// # Errors
    ///
    /// As [`open_with`]( Self::open_with ), for the target or any ancestor
    /// that had to be opened.
    pub fn create( &self, path: impl Into<GraphPath> ) -> Result<Graph, TreeError> {
        self.create_with( path, OpenOptions::new() )
    }

    /// [`create`]( Self::create ) with an identifier override or overlay
    /// for the target.
    ///
    /// # Errors
    ///
    /// As [`open_with`]( Self::open_with ).
    pub fn create_with( &self, path: impl Into<GraphPath>, options: OpenOptions ) -> Result<Graph, TreeError> {
        let path = path.into();
        let mut state = self.state.lock().unwrap_or_else( PoisonError::into_inner );
        for ancestor in path.ancestors().collect::<Vec<_>>() {
            if ! state.contains_key( &ancestor ) {
                self.open_locked( &mut state, ancestor, OpenOptions::new() )?;
            }
        }
        self.open_locked( &mut state, path, options )
    }

    /// The open graph at `path`.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotOpen`] when the path has no open graph.
    pub fn get( &self, path: &GraphPath ) -> Result<Graph, TreeError> {
        self.state.lock().unwrap_or_else( PoisonError::into_inner )
            .get( path )
            .cloned()
            .ok_or_else( || TreeError::NotOpen { path: path.clone() } )
    }

    /// Whether a graph is open at `path`. No side effects.
    #[must_use]
    pub fn has( &self, path: &GraphPath ) -> bool {
        self.state.lock().unwrap_or_else( PoisonError::into_inner ).contains_key( path )
    }

    /// Closes the graph at `path` and, deepest first, every open descendant.
    /// Closing the root closes everything.
    ///
    /// Path entries are always removed, even when user dispose hooks fail;
    /// the partial success carries the number of graphs closed together with
    /// every hook failure collected along the way.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotOpen`] when the path has no open graph. Dispose-hook
    /// failures are never an error here.
    pub fn close( &self, path: &GraphPath ) -> Result<PartialSuccess<usize, GraphError>, TreeError> {
        let doomed = self.evict_subtree( path )?;
        Ok( Self::dispose_evicted( doomed ))
    }

    /// Like [`close`]( Self::close ) but reports an absent path as
    /// `false` instead of an error.
    pub fn close_if_open( &self, path: &GraphPath ) -> PartialSuccess<bool, GraphError> {
        match self.evict_subtree( path ) {
            Ok( doomed ) => dispose_evicted_flagged( doomed ),
            Err( _ ) => ( false, Vec::new() ),
        }
    }

    /// Removes `path` and its descendants from the registry, returning them
    /// deepest first so children are disposed before their parent.
    fn evict_subtree( &self, path: &GraphPath ) -> Result<Vec<( GraphPath, Graph )>, TreeError> {
        let mut state = self.state.lock().unwrap_or_else( PoisonError::into_inner );
        if ! state.contains_key( path ) {
            return Err( TreeError::NotOpen { path: path.clone() } );
        }
        let mut doomed: Vec<( GraphPath, Graph )> = state
            .keys()
            .filter( | open | open.starts_with( path ))
            .cloned()
            .collect::<Vec<_>>()
            .into_iter()
            .filter_map( | open | state.remove( &open ).map( | graph | ( open, graph )))
            .collect();
        doomed.sort_by_key( |( open, _ )| std::cmp::Reverse( open.len() ));
        Ok( doomed )
    }

    fn dispose_evicted( doomed: Vec<( GraphPath, Graph )> ) -> PartialSuccess<usize, GraphError> {
        let closed = doomed.len();
        let mut failures = Vec::new();
        for ( path, graph ) in doomed {
            debug!( %path, "closing graph" );
            graph.dispose_collect( &mut failures );
        }
        ( closed, failures )
    }

    fn open_locked(
        &self,
        state: &mut HashMap<GraphPath, Graph>,
        path: GraphPath,
        options: OpenOptions,
    ) -> Result<Graph, TreeError> {
        if path.is_root() {
            return self.open_root_locked( state, options );
        }

        let registered = match options.identifier {
            Some( identifier ) => path.with_last( identifier ),
            None => path.clone(),
        };
        if state.contains_key( &registered ) {
            return Err( TreeError::AlreadyOpen { path: registered } );
        }
        let missing = path.ancestors().find( | ancestor | ! state.contains_key( ancestor ));
        if let Some( missing ) = missing {
            return Err( if missing.is_root() {
                TreeError::RootNotOpen { path }
            } else {
                TreeError::ParentNotOpen { path, parent: missing }
            });
        }

        // Ancestors are addressed by registered name; the final segment
        // always names the subcomponent blueprint.
        let parent = registered
            .parent()
            .and_then( | parent | state.get( &parent ).cloned() )
            .ok_or( TreeError::RootNotOpen { path: registered.clone() } )?;
        let segment = path.last().cloned().ok_or( TreeError::IdentifierNotAllowed )?;
        let blueprint = parent
            .blueprint()
            .subcomponent( &segment )
            .ok_or_else( || TreeError::NoSuchSubcomponent {
                parent: parent.blueprint().qualifier().clone(),
                qualifier: segment.clone(),
            })?
            .pipe( | blueprint | overlaid( blueprint, options.overlay ));

        debug!( path = %registered, "opening graph" );
        let graph = Graph::activate( blueprint, Some( parent ), self.application.services() );
        state.insert( registered, graph.clone() );
        Ok( graph )
    }

    fn open_root_locked(
        &self,
        state: &mut HashMap<GraphPath, Graph>,
        options: OpenOptions,
    ) -> Result<Graph, TreeError> {
        if options.identifier.is_some() {
            return Err( TreeError::IdentifierNotAllowed );
        }
        if state.contains_key( &GraphPath::root() ) {
            return Err( TreeError::AlreadyOpen { path: GraphPath::root() } );
        }
        let blueprint = overlaid( self.application.blueprint(), options.overlay );
        debug!( "opening root graph" );
        let graph = Graph::activate( blueprint, None, self.application.services() );
        state.insert( GraphPath::root(), graph.clone() );
        Ok( graph )
    }

}


fn overlaid( blueprint: &Blueprint, overlay: Option<OverlayBlock> ) -> Blueprint {
    match overlay {
        Some( block ) => blueprint.extend( block ),
        None => blueprint.clone(),
    }
}


fn dispose_evicted_flagged( doomed: Vec<( GraphPath, Graph )> ) -> PartialSuccess<bool, GraphError> {
    let ( closed, failures ) = Tree::dispose_evicted( doomed );
    ( closed > 0, failures )
}
