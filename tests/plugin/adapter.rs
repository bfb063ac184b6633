use std::sync::Arc ;

use trellis::{
	Application, GraphPath, Injection, InjectionError, InjectorRegistry, PluginRegistry, Tree,
	TreeError,
};

use crate::fixtures::Config ;


struct Activity { config: Option<Arc<Config>> }


fn injection() -> ( Arc<Tree>, Injection ) {
	let mut injectors = InjectorRegistry::new();
	injectors.register::<Activity, _>( | graph, activity | {
		activity.config = Some( graph.instance::<Config>()? );
		Ok(())
	});
	let application = Application::with_registries(
		crate::fixtures::app_blueprint(),
		PluginRegistry::new(),
		injectors,
	);
	let tree = Arc::new( Tree::new( application ));
	let injection = Injection::root_graph_only( tree.clone() );
	( tree, injection )
}


#[test]
fn every_host_object_maps_to_the_root_graph() {

	let ( tree, injection ) = injection();
	let host = Activity { config: None } ;

	let created = injection.create_graph( &host ).unwrap();
	assert!( tree.has( &GraphPath::root() ));

	let fetched = injection.get_graph( &host ).unwrap();
	assert_eq!( created.qualifier(), fetched.qualifier() );

}


#[test]
fn injection_runs_the_member_injector_against_the_mapped_graph() {

	let ( _tree, injection ) = injection();
	let mut activity = Activity { config: None } ;

	injection.create_graph( &activity ).unwrap();
	injection.inject( &mut activity ).unwrap();
	assert_eq!( activity.config.unwrap().url, "https://example.org" );

}


#[test]
fn disposing_a_host_closes_the_root_graph() {

	let ( tree, injection ) = injection();
	let host = Activity { config: None } ;

	injection.create_graph( &host ).unwrap();
	injection.dispose_graph( &host ).unwrap();
	assert!( ! tree.has( &GraphPath::root() ));

	let error = injection.get_graph( &host ).unwrap_err();
	assert!(
		matches!( error, InjectionError::Tree( TreeError::NotOpen { .. } )),
		"{error}",
	);

}
