use std::sync::Arc ;
use std::thread ;
use std::time::Duration ;

use once_cell::sync::Lazy ;
use trellis::{ Application, Blueprint };

use crate::fixtures::Invocations ;


static SINGLETON_CALLS: Lazy<Invocations> = Lazy::new( Invocations::default );

static MULTITON_CALLS: Lazy<Invocations> = Lazy::new( Invocations::default );


#[test]
fn concurrent_resolvers_share_one_singleton_construction() {

	let mut builder = Blueprint::builder( "app" );
	builder.singleton( | _graph | {
		SINGLETON_CALLS.bump();
		// Keep the construction window open long enough for every thread
		// to contend on it.
		thread::sleep( Duration::from_millis( 25 ));
		Ok( String::from( "constructed once" ))
	});
	let graph = Application::new( builder.build().unwrap() ).activate();

	let instances: Vec<Arc<String>> = thread::scope( | scope | {
		( 0 .. 8 )
			.map( | _ | scope.spawn( || graph.instance::<String>().unwrap() ))
			.collect::<Vec<_>>()
			.into_iter()
			.map( | handle | handle.join().unwrap() )
			.collect()
	});

	assert!( instances.windows( 2 ).all( | pair | Arc::ptr_eq( &pair[ 0 ], &pair[ 1 ] )));
	assert_eq!( SINGLETON_CALLS.count(), 1 );

}


#[test]
fn concurrent_multiton_construction_runs_once_per_argument() {

	let mut builder = Blueprint::builder( "app" );
	builder.multiton_factory( | _graph, shard: &u32 | {
		MULTITON_CALLS.bump();
		thread::sleep( Duration::from_millis( 25 ));
		Ok( format!( "shard {shard}" ))
	});
	let graph = Application::new( builder.build().unwrap() ).activate();

	let graph = &graph ;
	let instances: Vec<Arc<String>> = thread::scope( | scope | {
		( 0_u32 .. 8 )
			.map( | thread_index | scope.spawn( move || {
				graph.instance_with::<u32, String>( thread_index % 2 ).unwrap()
			}))
			.collect::<Vec<_>>()
			.into_iter()
			.map( | handle | handle.join().unwrap() )
			.collect()
	});

	assert_eq!( MULTITON_CALLS.count(), 2 );
	for instance in instances {
		assert!( *instance == "shard 0" || *instance == "shard 1" );
	}

}
