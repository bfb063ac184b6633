//! A hierarchical dependency-injection runtime.
//!
//! Object graphs are described up front as immutable [`Blueprint`]s and
//! activated into live [`Graph`]s on demand. Graphs form a hierarchy:
//! a child resolves its own bindings first and delegates everything else to
//! its parent, so long-lived dependencies live near the root while
//! short-lived ones live in child graphs that open and close with their
//! surrounding lifecycle (a session, a screen, a request).
//!
//! # Core Concepts
//!
//! - [`Blueprint`]: An immutable registry of binding definitions plus named
//! 	nested blueprints (subcomponents). Built once through
//! 	[`BlueprintBuilder`], then activated any number of times.
//!
//! - [`Graph`]: An activated blueprint. Resolution is keyed by type identity
//! 	plus an optional [`Qualifier`], is thread-safe, and walks up the parent
//! 	chain for bindings the graph does not define itself.
//!
//! - [`Scope`]: How a binding caches. `prototype` and `factory` construct
//! 	every time; `singleton` caches for the graph's lifetime;
//! 	`weak-singleton` and `soft-singleton` cache reclaimably; and
//! 	`multiton-factory` caches per distinct argument.
//!
//! - [`Tree`]: Path-addressed lifecycle management. `open`/`create` activate
//! 	graphs at dotted paths ([`GraphPath`]), `close` disposes whole subtrees
//! 	deepest-first.
//!
//! - [`GraphPlugin`]: A process-wide observer of instance construction and
//! 	graph disposal, registered on the [`Application`] before any graph
//! 	exists.
//!
//! - [`Injection`]: The host-lifecycle seam. An [`InjectionAdapter`] maps
//! 	host-framework objects to graphs; [`RootGraphOnlyAdapter`] is the
//! 	trivial mapping every application starts with.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc ;
//! use trellis::{ Application, Blueprint, GraphPath, Tree };
//!
//! struct Config { url: String }
//! struct Client { config: Arc<Config> }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let blueprint = {
//! 	let mut builder = Blueprint::builder( "app" );
//! 	builder.singleton( | _graph | Ok( Config { url: "https://example.org".into() } ));
//! 	builder.prototype( | graph | Ok( Client { config: graph.instance::<Config>()? } ));
//! 	// Subcomponents are blueprints for child graphs; this one describes
//! 	// everything scoped to a single session.
//! 	builder.subcomponent( "session", | session | {
//! 		session.singleton( | _graph | Ok( 42_u64 ));
//! 	});
//! 	builder.build()?
//! };
//!
//! let tree = Tree::new( Application::new( blueprint ));
//!
//! // The root graph holds the application-wide singletons.
//! let root = tree.open( GraphPath::root() )?;
//! let client = root.instance::<Client>()?;
//! assert_eq!( client.config.url, "https://example.org" );
//!
//! // Child graphs resolve their own bindings and delegate the rest.
//! let session = tree.open( GraphPath::new([ "session" ]))?;
//! assert_eq!( *session.instance::<u64>()?, 42 );
//! assert!( Arc::ptr_eq( &session.instance::<Config>()?, &client.config ));
//!
//! // Closing a path disposes the whole subtree, deepest first.
//! let ( closed, failures ) = tree.close( &GraphPath::root() )?;
//! assert_eq!( closed, 2 );
//! assert!( failures.is_empty() );
//! # Ok(())
//! # }
//! ```
//!
//! # Parameterised and qualified bindings
//!
//! A `factory` binding takes a caller-supplied argument
//! (`instance_with::<A, T>( argument )`); a `multiton-factory` additionally
//! caches one instance per distinct argument. Qualifiers distinguish
//! multiple bindings of the same type:
//!
//! ```
//! use trellis::Blueprint ;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = Blueprint::builder( "app" );
//! builder.constant_qualified( "primary", String::from( "postgres://primary" ));
//! builder.constant_qualified( "replica", String::from( "postgres://replica" ));
//! builder.multiton_factory( | _graph, prefix: &String | Ok( format!( "{prefix}/api" )));
//! let blueprint = builder.build()?;
//!
//! let graph = trellis::Application::new( blueprint ).activate();
//! assert_eq!( *graph.instance_qualified::<String>( "replica" )?, "postgres://replica" );
//! let url = graph.instance_with::<String, String>( "https://example.org".to_string() )?;
//! assert_eq!( *url, "https://example.org/api" );
//! # graph.dispose()?;
//! # Ok(())
//! # }
//! ```

mod application ;
mod adapter ;
mod argument ;
mod blueprint ;
mod graph ;
mod inject ;
mod key ;
mod plugins ;
mod qualifier ;
mod scope ;
mod tree ;
pub mod utils ;

pub use nonempty_collections::NEVec ;

pub use adapter::{ Injection, InjectionAdapter, InjectionError, RootGraphOnlyAdapter };
pub use application::Application ;
pub use argument::Argument ;
pub use blueprint::{
    Blueprint, BlueprintBuilder, BlueprintError, DeclaredBinding, DeclaredFactoryBinding,
    HookError, Instance, OverlayBlock,
};
pub use graph::{ DisposalError, Graph, GraphError };
pub use inject::{ InjectorRegistry, MemberInjector };
pub use key::TypeKey ;
pub use plugins::{ GraphPlugin, PluginRegistry };
pub use qualifier::Qualifier ;
pub use scope::Scope ;
pub use tree::{ GraphPath, OpenOptions, Tree, TreeError };
