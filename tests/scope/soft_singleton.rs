use std::sync::Arc ;

use trellis::{ Application, Blueprint };

use crate::fixtures::Invocations ;


#[test]
fn the_instance_survives_its_holders() {

	let calls = Arc::new( Invocations::default() );
	let mut builder = Blueprint::builder( "app" );
	builder.soft_singleton({
		let calls = calls.clone();
		move | _graph | { calls.bump(); Ok( String::from( "retained" )) }
	});
	let graph = Application::new( builder.build().unwrap() ).activate();

	drop( graph.instance::<String>().unwrap() );
	graph.instance::<String>().unwrap();
	assert_eq!( calls.count(), 1 );

}


#[test]
fn trim_memory_releases_the_cache() {

	let calls = Arc::new( Invocations::default() );
	let mut builder = Blueprint::builder( "app" );
	builder.soft_singleton({
		let calls = calls.clone();
		move | _graph | { calls.bump(); Ok( String::from( "reclaimable" )) }
	});
	let graph = Application::new( builder.build().unwrap() ).activate();

	graph.instance::<String>().unwrap();
	graph.trim_memory();
	graph.instance::<String>().unwrap();
	assert_eq!( calls.count(), 2 );

}
