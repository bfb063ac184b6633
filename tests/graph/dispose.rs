use std::sync::Arc ;

use trellis::{ Application, Blueprint };

use crate::fixtures::Invocations ;


#[test]
fn dispose_hooks_run_once_per_cached_instance() {

	let disposed = Arc::new( Invocations::default() );
	let mut builder = Blueprint::builder( "app" );
	builder
		.singleton( | _graph | Ok( String::from( "held" )))
		.on_dispose({
			let disposed = disposed.clone();
			move | _graph, _value | { disposed.bump(); Ok(()) }
		});
	let graph = Application::new( builder.build().unwrap() ).activate();

	graph.instance::<String>().unwrap();
	graph.instance::<String>().unwrap();
	graph.dispose().unwrap();
	assert_eq!( disposed.count(), 1 );

}


#[test]
fn unresolved_bindings_have_nothing_to_dispose() {

	let disposed = Arc::new( Invocations::default() );
	let mut builder = Blueprint::builder( "app" );
	builder
		.singleton( | _graph | Ok( String::from( "never resolved" )))
		.on_dispose({
			let disposed = disposed.clone();
			move | _graph, _value | { disposed.bump(); Ok(()) }
		});
	let graph = Application::new( builder.build().unwrap() ).activate();

	graph.dispose().unwrap();
	assert_eq!( disposed.count(), 0 );

}


#[test]
fn multiton_dispose_hooks_run_per_argument() {

	let disposed = Arc::new( Invocations::default() );
	let mut builder = Blueprint::builder( "app" );
	builder
		.multiton_factory( | _graph, name: &String | Ok( format!( "session for {name}" )))
		.on_dispose({
			let disposed = disposed.clone();
			move | _graph, _name, _value | { disposed.bump(); Ok(()) }
		});
	let graph = Application::new( builder.build().unwrap() ).activate();

	graph.instance_with::<String, String>( "ada".to_string() ).unwrap();
	graph.instance_with::<String, String>( "grace".to_string() ).unwrap();
	graph.dispose().unwrap();
	assert_eq!( disposed.count(), 2 );

}


#[test]
fn hook_failures_are_aggregated_and_never_stop_disposal() {

	let survivor = Arc::new( Invocations::default() );
	let mut builder = Blueprint::builder( "app" );
	builder
		.constant_qualified( "a", 1_u32 )
		.on_dispose( | _graph, _value | Err( "hook a failed".into() ));
	builder
		.constant_qualified( "b", 2_u32 )
		.on_dispose( | _graph, _value | Err( "hook b failed".into() ));
	builder
		.constant_qualified( "c", 3_u32 )
		.on_dispose({
			let survivor = survivor.clone();
			move | _graph, _value | { survivor.bump(); Ok(()) }
		});
	let graph = Application::new( builder.build().unwrap() ).activate();

	graph.instance_qualified::<u32>( "a" ).unwrap();
	graph.instance_qualified::<u32>( "b" ).unwrap();
	graph.instance_qualified::<u32>( "c" ).unwrap();

	let report = graph.dispose().unwrap_err();
	assert_eq!( report.failures().len().get(), 2 );
	assert_eq!( survivor.count(), 1 );

}


#[test]
fn disposing_twice_is_a_no_op() {

	let disposed = Arc::new( Invocations::default() );
	let mut builder = Blueprint::builder( "app" );
	builder
		.singleton( | _graph | Ok( 9_u64 ))
		.on_dispose({
			let disposed = disposed.clone();
			move | _graph, _value | { disposed.bump(); Ok(()) }
		});
	let graph = Application::new( builder.build().unwrap() ).activate();

	graph.instance::<u64>().unwrap();
	graph.dispose().unwrap();
	graph.dispose().unwrap();
	assert_eq!( disposed.count(), 1 );
	assert!( graph.is_disposed() );

}
