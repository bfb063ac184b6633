use trellis::{ Application, Blueprint };


fn base_blueprint() -> Blueprint {
	let mut builder = Blueprint::builder( "app" );
	builder.constant( String::from( "base" ));
	builder.build().unwrap()
}


#[test]
fn extend_derives_a_new_blueprint_with_shadowed_bindings() {

	let base = base_blueprint();
	let derived = base.extend( | builder | {
		builder.constant( String::from( "derived" ));
		builder.constant( 42_u32 );
	});

	let graph = Application::new( derived ).activate();
	assert_eq!( *graph.instance::<String>().unwrap(), "derived" );
	assert_eq!( *graph.instance::<u32>().unwrap(), 42 );

}


#[test]
fn the_source_blueprint_is_left_untouched() {

	let base = base_blueprint();
	let _derived = base.extend( | builder | {
		builder.constant( String::from( "derived" ));
	});

	let graph = Application::new( base ).activate();
	assert_eq!( *graph.instance::<String>().unwrap(), "base" );

}
