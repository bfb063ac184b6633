use std::sync::Arc ;

use trellis::{ Application, Blueprint };

use crate::fixtures::Invocations ;


#[test]
fn every_resolution_constructs_a_fresh_instance() {

	let calls = Arc::new( Invocations::default() );
	let mut builder = Blueprint::builder( "app" );
	builder.prototype({
		let calls = calls.clone();
		move | _graph | { calls.bump(); Ok( vec![ 0_u8; 4 ] ) }
	});
	let graph = Application::new( builder.build().unwrap() ).activate();

	let one = graph.instance::<Vec<u8>>().unwrap();
	let two = graph.instance::<Vec<u8>>().unwrap();
	assert!( ! Arc::ptr_eq( &one, &two ));
	assert_eq!( calls.count(), 2 );

}
