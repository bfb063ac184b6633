use trellis::{ GraphPath, TreeError };


#[test]
fn create_opens_every_missing_ancestor() {

	let tree = crate::fixtures::tree();

	let view = tree.create( GraphPath::new( [ "session", "view" ] )).unwrap();
	assert_eq!( view.qualifier().as_str(), "view" );
	assert!( tree.has( &GraphPath::root() ));
	assert!( tree.has( &GraphPath::new( [ "session" ] )));
	assert!( tree.has( &GraphPath::new( [ "session", "view" ] )));

}


#[test]
fn create_tolerates_already_open_ancestors() {

	let tree = crate::fixtures::tree();
	tree.open( GraphPath::root() ).unwrap();
	let session = tree.open( GraphPath::new( [ "session" ] )).unwrap();

	let view = tree.create( GraphPath::new( [ "session", "view" ] )).unwrap();
	assert!( view.parent().is_some_and( | parent | parent.qualifier() == session.qualifier() ));

}


#[test]
fn create_still_rejects_an_open_target() {

	let tree = crate::fixtures::tree();
	tree.create( GraphPath::new( [ "session" ] )).unwrap();

	let error = tree.create( GraphPath::new( [ "session" ] )).unwrap_err();
	assert!( matches!( error, TreeError::AlreadyOpen { .. } ), "{error}" );

}
