use msgwire::{
    register_serializable, registry, HandlerDecl, Message, Protocol, Result, Serializable,
    TypeHandle, WireError,
};

struct Ping;

impl Serializable for Ping {
    fn serialize(&self, _message: &mut Message) -> Result<()> {
        Ok(())
    }

    fn deserialize(_message: &mut Message) -> Result<Self> {
        Ok(Ping)
    }
}

struct Pong;

impl Serializable for Pong {
    fn serialize(&self, _message: &mut Message) -> Result<()> {
        Ok(())
    }

    fn deserialize(_message: &mut Message) -> Result<Self> {
        Ok(Pong)
    }
}

register_serializable!(Pong, 5);
register_serializable!(Ping, 5);

fn expected() -> WireError {
    WireError::DuplicateSerializableId {
        id: 5,
        existing: TypeHandle::of::<Ping>(),
        candidate: TypeHandle::of::<Pong>(),
    }
}

#[test]
fn duplicate_id_refuses_startup() {
    let err = Protocol::prepare([HandlerDecl::client(5, "Net", "on_ping")]).unwrap_err();
    assert_eq!(err, expected());
    assert!(err.is_fatal());
    assert!(err.to_string().ends_with(
        "both declare the same ID 5! Only one type is allowed per ID."
    ));
}

#[test]
fn failed_registry_serves_no_lookups() {
    assert_eq!(registry::initialize().map(|_| ()), Err(expected()));
    assert!(registry::global().get().is_none());
    assert_eq!(registry::resolve_type(5), Err(expected()));
    assert_eq!(registry::id_of::<Ping>(), Err(expected()));
}

#[test]
fn concurrent_callers_share_the_failure() {
    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| registry::initialize().map(|_| ())))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread should not panic"))
            .collect()
    });
    assert!(results.iter().all(|result| result == &Err(expected())));
}
