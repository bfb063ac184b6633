//! The application: a root blueprint plus the process-wide registries.
//!
//! Registries are supplied at construction, before any graph exists, so
//! every graph of the application observes the same plugins and injectors.

use std::fmt ;
use std::sync::Arc ;

use crate::blueprint::Blueprint ;
use crate::graph::Graph ;
use crate::inject::InjectorRegistry ;
use crate::plugins::PluginRegistry ;



/// Shared by every graph activated for one application.
pub(crate) struct AppServices {
    pub(crate) plugins: PluginRegistry,
    pub(crate) injectors: InjectorRegistry,
}



/// A root blueprint bundled with the plugin and injector registries that
/// apply to all of its graphs.
#[derive( Clone )]
pub struct Application {
    blueprint: Blueprint,
    services: Arc<AppServices>,
}

impl Application {

    /// An application with empty registries.
    #[must_use]
    pub fn new( blueprint: Blueprint ) -> Self {
        Self::with_registries( blueprint, PluginRegistry::new(), InjectorRegistry::new() )
    }

    #[must_use]
    pub fn with_registries(
        blueprint: Blueprint,
        plugins: PluginRegistry,
        injectors: InjectorRegistry,
    ) -> Self {
        Self {
            blueprint,
            services: Arc::new( AppServices { plugins, injectors } ),
        }
    }

    /// The root blueprint graphs are activated from.
    #[inline] pub fn blueprint( &self ) -> &Blueprint { &self.blueprint }

    /// The registered plugins.
    #[inline] pub fn plugins( &self ) -> &PluginRegistry { &self.services.plugins }

    /// The registered member injectors.
    #[inline] pub fn injectors( &self ) -> &InjectorRegistry { &self.services.injectors }

    /// Activates a standalone root graph outside any tree. Callers own its
    /// lifecycle and must dispose it themselves.
    #[must_use]
    pub fn activate( &self ) -> Graph {
        Graph::activate( self.blueprint.clone(), None, self.services() )
    }

    pub(crate) fn services( &self ) -> Arc<AppServices> {
        self.services.clone()
    }

}

impl fmt::Debug for Application {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
        f.debug_struct( "Application" )
            .field( "qualifier", self.blueprint.qualifier() )
            .field( "plugins", &self.services.plugins.len() )
            .field( "injectors", &self.services.injectors.len() )
            .finish()
    }
}
