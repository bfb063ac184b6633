use trellis::{ GraphPath, TreeError };


#[test]
fn opening_the_root_registers_it_at_the_empty_path() {

	let tree = crate::fixtures::tree();
	assert!( ! tree.has( &GraphPath::root() ));

	let root = tree.open( GraphPath::root() ).unwrap();
	assert!( tree.has( &GraphPath::root() ));
	assert_eq!( root.qualifier().as_str(), "root" );
	assert!( ! root.is_disposed() );

}


#[test]
fn get_returns_the_registered_graph() {

	let tree = crate::fixtures::tree();
	tree.open( GraphPath::root() ).unwrap();
	tree.open( GraphPath::new( [ "session" ] )).unwrap();

	let session = tree.get( &GraphPath::new( [ "session" ] )).unwrap();
	assert_eq!( session.qualifier().as_str(), "session" );

	let error = tree.get( &GraphPath::new( [ "absent" ] )).unwrap_err();
	assert!( matches!( error, TreeError::NotOpen { .. } ), "{error}" );

}


#[test]
fn a_child_cannot_open_before_the_root() {

	let tree = crate::fixtures::tree();

	let error = tree.open( GraphPath::new( [ "session" ] )).unwrap_err();
	assert!( matches!( error, TreeError::RootNotOpen { .. } ), "{error}" );

}


#[test]
fn a_missing_ancestor_is_named_exactly() {

	let tree = crate::fixtures::tree();
	tree.open( GraphPath::root() ).unwrap();

	let error = tree.open( GraphPath::new( [ "session", "view" ] )).unwrap_err();
	let TreeError::ParentNotOpen { parent, .. } = error else { panic!( "unexpected error: {error}" ) };
	assert_eq!( parent.to_string(), "session" );

}


#[test]
fn reopening_an_open_path_fails() {

	let tree = crate::fixtures::tree();
	tree.open( GraphPath::root() ).unwrap();

	let error = tree.open( GraphPath::root() ).unwrap_err();
	assert!( matches!( error, TreeError::AlreadyOpen { .. } ), "{error}" );

	tree.open( GraphPath::new( [ "session" ] )).unwrap();
	let error = tree.open( GraphPath::new( [ "session" ] )).unwrap_err();
	assert!( matches!( error, TreeError::AlreadyOpen { .. } ), "{error}" );

}


#[test]
fn unknown_subcomponents_are_rejected() {

	let tree = crate::fixtures::tree();
	tree.open( GraphPath::root() ).unwrap();

	let error = tree.open( GraphPath::new( [ "settings" ] )).unwrap_err();
	let TreeError::NoSuchSubcomponent { parent, qualifier } = error else { panic!( "unexpected error: {error}" ) };
	assert_eq!( parent.as_str(), "root" );
	assert_eq!( qualifier.as_str(), "settings" );

}
