use std::sync::{ Arc, Mutex };
use std::sync::atomic::{ AtomicUsize, Ordering };

use trellis::{
	Application, Argument, Blueprint, Graph, GraphError, GraphPlugin, HookError, Instance,
	InjectorRegistry, PluginRegistry, Scope,
};


struct Recorder {
	name: &'static str,
	log: Arc<Mutex<Vec<String>>>,
}

impl GraphPlugin for Recorder {

	fn post_construct(
		&self,
		_graph: &Graph,
		scope: Scope,
		_argument: &Argument,
		_instance: &Instance,
	) -> Result<(), HookError> {
		self.log.lock().unwrap().push( format!( "{}:{scope}", self.name ));
		Ok(())
	}

}


fn application_with_plugins( log: &Arc<Mutex<Vec<String>>> ) -> Application {
	let mut builder = Blueprint::builder( "app" );
	builder
		.singleton( | _graph | Ok( String::from( "observed" )))
		.on_post_construct({
			let log = log.clone();
			move | _graph, _value | { log.lock().unwrap().push( "binding:singleton".into() ); Ok(()) }
		});

	let mut plugins = PluginRegistry::new();
	plugins.register( Recorder { name: "first", log: log.clone() } );
	plugins.register( Recorder { name: "second", log: log.clone() } );

	Application::with_registries( builder.build().unwrap(), plugins, InjectorRegistry::new() )
}


#[test]
fn the_binding_hook_runs_before_plugins_in_registration_order() {

	let log = Arc::new( Mutex::new( Vec::new() ));
	let graph = application_with_plugins( &log ).activate();

	graph.instance::<String>().unwrap();
	assert_eq!( *log.lock().unwrap(), vec![
		"binding:singleton".to_string(),
		"first:singleton".to_string(),
		"second:singleton".to_string(),
	]);

}


#[test]
fn cached_scopes_notify_plugins_only_on_construction() {

	let log = Arc::new( Mutex::new( Vec::new() ));
	let graph = application_with_plugins( &log ).activate();

	graph.instance::<String>().unwrap();
	graph.instance::<String>().unwrap();
	assert_eq!( log.lock().unwrap().len(), 3 );

}


struct Rejecting ;

impl GraphPlugin for Rejecting {

	fn post_construct(
		&self,
		_graph: &Graph,
		_scope: Scope,
		_argument: &Argument,
		_instance: &Instance,
	) -> Result<(), HookError> {
		Err( "instance rejected".into() )
	}

}


#[test]
fn a_failing_plugin_leaves_the_instance_unpublished() {

	let constructions = Arc::new( AtomicUsize::new( 0 ));
	let mut builder = Blueprint::builder( "app" );
	builder.singleton({
		let constructions = constructions.clone();
		move | _graph | {
			constructions.fetch_add( 1, Ordering::SeqCst );
			Ok( String::from( "never published" ))
		}
	});
	let mut plugins = PluginRegistry::new();
	plugins.register( Rejecting );
	let application = Application::with_registries( builder.build().unwrap(), plugins, InjectorRegistry::new() );
	let graph = application.activate();

	let error = graph.instance::<String>().unwrap_err();
	assert!( matches!( error, GraphError::Plugin { .. } ), "{error}" );

	// The slot stayed empty, so the next resolution constructs again.
	graph.instance::<String>().unwrap_err();
	assert_eq!( constructions.load( Ordering::SeqCst ), 2 );

}
