use std::sync::Arc ;

use trellis::{ Application, Blueprint };

use crate::fixtures::Invocations ;


fn multiton_graph( calls: &Arc<Invocations> ) -> trellis::Graph {
	let mut builder = Blueprint::builder( "app" );
	builder.multiton_factory({
		let calls = calls.clone();
		move | _graph, name: &String | { calls.bump(); Ok( format!( "session for {name}" )) }
	});
	Application::new( builder.build().unwrap() ).activate()
}


#[test]
fn equal_arguments_share_one_instance() {

	let calls = Arc::new( Invocations::default() );
	let graph = multiton_graph( &calls );

	let one = graph.instance_with::<String, String>( "ada".to_string() ).unwrap();
	let two = graph.instance_with::<String, String>( "ada".to_string() ).unwrap();
	assert!( Arc::ptr_eq( &one, &two ));
	assert_eq!( calls.count(), 1 );

}


#[test]
fn distinct_arguments_get_distinct_instances() {

	let calls = Arc::new( Invocations::default() );
	let graph = multiton_graph( &calls );

	let ada = graph.instance_with::<String, String>( "ada".to_string() ).unwrap();
	let grace = graph.instance_with::<String, String>( "grace".to_string() ).unwrap();
	assert_eq!( *ada, "session for ada" );
	assert_eq!( *grace, "session for grace" );
	assert_eq!( calls.count(), 2 );

}


#[test]
fn plain_factories_never_cache() {

	let calls = Arc::new( Invocations::default() );
	let mut builder = Blueprint::builder( "app" );
	builder.factory({
		let calls = calls.clone();
		move | _graph, name: &String | { calls.bump(); Ok( format!( "for {name}" )) }
	});
	let graph = Application::new( builder.build().unwrap() ).activate();

	let one = graph.instance_with::<String, String>( "ada".to_string() ).unwrap();
	let two = graph.instance_with::<String, String>( "ada".to_string() ).unwrap();
	assert!( ! Arc::ptr_eq( &one, &two ));
	assert_eq!( calls.count(), 2 );

}
