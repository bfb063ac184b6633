use std::sync::Arc ;

use trellis::{ Application, GraphError, InjectorRegistry, PluginRegistry };

use crate::fixtures::Config ;


#[derive( Default )]
struct Screen { config: Option<Arc<Config>> }


#[test]
fn registered_member_injectors_assign_dependencies() {

	let mut injectors = InjectorRegistry::new();
	injectors.register::<Screen, _>( | graph, screen | {
		screen.config = Some( graph.instance::<Config>()? );
		Ok(())
	});
	let application = Application::with_registries(
		crate::fixtures::app_blueprint(),
		PluginRegistry::new(),
		injectors,
	);
	let graph = application.activate();

	let mut screen = Screen::default();
	graph.inject( &mut screen ).unwrap();
	assert_eq!( screen.config.unwrap().url, "https://example.org" );

}


#[test]
fn missing_injectors_are_reported_by_type_name() {

	let graph = Application::new( crate::fixtures::app_blueprint() ).activate();

	let mut screen = Screen::default();
	let error = graph.inject( &mut screen ).unwrap_err();
	let GraphError::NoInjector { type_name } = error else { panic!( "unexpected error: {error}" ) };
	assert!( type_name.contains( "Screen" ));

}


#[test]
fn injector_failures_carry_the_cause() {

	let mut injectors = InjectorRegistry::new();
	injectors.register::<Screen, _>( | _graph, _screen | Err( "not ready".into() ));
	let application = Application::with_registries(
		crate::fixtures::app_blueprint(),
		PluginRegistry::new(),
		injectors,
	);
	let graph = application.activate();

	let mut screen = Screen::default();
	let error = graph.inject( &mut screen ).unwrap_err();
	assert!( matches!( error, GraphError::Injection { .. } ), "{error}" );

}
