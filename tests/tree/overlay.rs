use trellis::{ GraphPath, OpenOptions };

use crate::fixtures::Config ;


#[test]
fn overlay_blocks_add_bindings_at_open_time() {

	let tree = crate::fixtures::tree();
	let root = tree
		.open_with( GraphPath::root(), OpenOptions::new().overlay( | builder | {
			builder.constant( 9000_u64 );
		}))
		.unwrap();

	assert_eq!( *root.instance::<u64>().unwrap(), 9000 );
	assert_eq!( root.instance::<Config>().unwrap().url, "https://example.org" );

}


#[test]
fn overlay_bindings_shadow_blueprint_bindings() {

	let tree = crate::fixtures::tree();
	let root = tree
		.open_with( GraphPath::root(), OpenOptions::new().overlay( | builder | {
			builder.singleton( | _graph | Ok( Config { url: "https://staging.example.org".into() } ));
		}))
		.unwrap();

	assert_eq!( root.instance::<Config>().unwrap().url, "https://staging.example.org" );

}


#[test]
fn overlays_never_leak_into_later_activations() {

	let tree = crate::fixtures::tree();
	let overlaid = tree
		.open_with( GraphPath::root(), OpenOptions::new().overlay( | builder | {
			builder.constant( 9000_u64 );
		}))
		.unwrap();
	assert!( overlaid.instance_or_none::<u64>().unwrap().is_some() );

	tree.close( &GraphPath::root() ).unwrap();
	let fresh = tree.open( GraphPath::root() ).unwrap();
	assert!( fresh.instance_or_none::<u64>().unwrap().is_none() );

}


#[test]
fn subcomponents_accept_overlays_too() {

	let tree = crate::fixtures::tree();
	tree.open( GraphPath::root() ).unwrap();

	let session = tree
		.open_with( GraphPath::new( [ "session" ] ), OpenOptions::new().overlay( | builder | {
			builder.singleton( | _graph | Ok( String::from( "overridden-token" )));
		}))
		.unwrap();

	assert_eq!( *session.instance::<String>().unwrap(), "overridden-token" );

}
