//! Scope kinds.

use std::fmt ;



/// The caching and lifecycle policy of a binding.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub enum Scope {
    /// Every resolution invokes the factory; nothing is cached.
    Prototype,
    /// At most one instance per graph, constructed on first resolution under
    /// double-checked locking.
    Singleton,
    /// Like [`Singleton`]( Self::Singleton ) but the graph holds the instance
    /// weakly; once the last external holder drops it, the next resolution
    /// constructs a fresh one.
    WeakSingleton,
    /// Like [`WeakSingleton`]( Self::WeakSingleton ) but held strongly until a
    /// memory-pressure signal ([`Graph::trim_memory`]( crate::Graph::trim_memory ))
    /// revokes it.
    SoftSingleton,
    /// Argument-taking variant of [`Prototype`]( Self::Prototype ).
    Factory,
    /// At most one instance per distinct argument per graph.
    MultitonFactory,
}

impl fmt::Display for Scope {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
        f.write_str( match self {
            Self::Prototype => "prototype",
            Self::Singleton => "singleton",
            Self::WeakSingleton => "weak singleton",
            Self::SoftSingleton => "soft singleton",
            Self::Factory => "factory",
            Self::MultitonFactory => "multiton factory",
        })
    }
}
