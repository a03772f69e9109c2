use std::sync::OnceLock;

use msgwire_message::{Result, TypeHandle};

use crate::config::RegistryConfig;
use crate::discovery::{Discovery, LinkedTypes};
use crate::registry::TypeRegistry;

/// A registry built on first use.
///
/// Concurrent first callers block until exactly one of them has run
/// discovery and construction. The outcome, registry or error, is kept for
/// the life of the value and never retried.
pub struct LazyRegistry<D> {
    discovery: D,
    config: RegistryConfig,
    cell: OnceLock<Result<TypeRegistry>>,
}

impl<D> LazyRegistry<D> {
    pub const fn new(discovery: D) -> Self {
        Self::with_config(discovery, RegistryConfig::new())
    }

    pub const fn with_config(discovery: D, config: RegistryConfig) -> Self {
        Self {
            discovery,
            config,
            cell: OnceLock::new(),
        }
    }

    /// The registry, if construction has already completed successfully.
    pub fn get(&self) -> Option<&TypeRegistry> {
        self.cell.get()?.as_ref().ok()
    }

    pub fn is_initialized(&self) -> bool {
        self.get().is_some()
    }
}

impl<D: Discovery> LazyRegistry<D> {
    /// Build the registry if that has not happened yet, and return it.
    ///
    /// Every caller observes the same registry, or a clone of the same
    /// construction error.
    pub fn initialize(&self) -> Result<&TypeRegistry> {
        self.cell
            .get_or_init(|| TypeRegistry::discover(&self.discovery, self.config))
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn resolve_type(&self, id: u16) -> Result<TypeHandle> {
        self.initialize()?.resolve_type(id)
    }

    pub fn resolve_id(&self, handle: TypeHandle) -> Result<u16> {
        self.initialize()?.resolve_id(handle)
    }

    pub fn id_of<T: 'static>(&self) -> Result<u16> {
        self.initialize()?.id_of::<T>()
    }
}

static GLOBAL: LazyRegistry<LinkedTypes> = LazyRegistry::new(LinkedTypes);

/// The process-wide registry over every `register_serializable!` declaration.
pub fn global() -> &'static LazyRegistry<LinkedTypes> {
    &GLOBAL
}

/// Build the process-wide registry now instead of on first lookup.
pub fn initialize() -> Result<&'static TypeRegistry> {
    GLOBAL.initialize()
}

pub fn resolve_type(id: u16) -> Result<TypeHandle> {
    GLOBAL.resolve_type(id)
}

pub fn resolve_id(handle: TypeHandle) -> Result<u16> {
    GLOBAL.resolve_id(handle)
}

pub fn id_of<T: 'static>() -> Result<u16> {
    GLOBAL.id_of::<T>()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::time::Duration;

    use msgwire_message::{Message, Serializable, WireError};

    use super::*;
    use crate::candidate::Candidate;

    struct Heartbeat;

    impl Serializable for Heartbeat {
        fn serialize(&self, _message: &mut Message) -> Result<()> {
            Ok(())
        }

        fn deserialize(_message: &mut Message) -> Result<Self> {
            Ok(Heartbeat)
        }
    }

    struct Kick(u8);

    impl Serializable for Kick {
        fn serialize(&self, message: &mut Message) -> Result<()> {
            message.add(self.0)?;
            Ok(())
        }

        fn deserialize(message: &mut Message) -> Result<Self> {
            Ok(Kick(message.get()?))
        }
    }

    crate::register_serializable!(Heartbeat, 900);

    struct CountingDiscovery {
        calls: AtomicUsize,
        candidates: Vec<Candidate>,
    }

    impl CountingDiscovery {
        fn new(candidates: Vec<Candidate>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                candidates,
            }
        }
    }

    impl Discovery for CountingDiscovery {
        fn discover(&self) -> Vec<Candidate> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            self.candidates.clone()
        }
    }

    fn race_initialize(
        lazy: &LazyRegistry<CountingDiscovery>,
        threads: usize,
    ) -> Vec<Result<usize>> {
        let barrier = Barrier::new(threads);
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..threads)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        lazy.initialize()
                            .map(|registry| std::ptr::from_ref(registry) as usize)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        })
    }

    #[test]
    fn concurrent_first_use_discovers_once() {
        let lazy = LazyRegistry::new(CountingDiscovery::new(vec![
            Candidate::new::<Heartbeat>(1),
            Candidate::new::<Kick>(2),
        ]));
        assert!(!lazy.is_initialized());

        let results = race_initialize(&lazy, 8);

        assert_eq!(lazy.discovery.calls.load(Ordering::SeqCst), 1);
        let first = results[0].clone().unwrap();
        assert!(results.iter().all(|result| result.as_ref() == Ok(&first)));
        assert!(lazy.is_initialized());
        assert_eq!(lazy.id_of::<Kick>().unwrap(), 2);
        assert_eq!(lazy.discovery.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_failure_is_shared_and_not_retried() {
        let lazy = LazyRegistry::new(CountingDiscovery::new(vec![
            Candidate::new::<Heartbeat>(5),
            Candidate::new::<Kick>(5),
        ]));

        let results = race_initialize(&lazy, 6);

        assert_eq!(lazy.discovery.calls.load(Ordering::SeqCst), 1);
        let expected = WireError::DuplicateSerializableId {
            id: 5,
            existing: TypeHandle::of::<Heartbeat>(),
            candidate: TypeHandle::of::<Kick>(),
        };
        assert!(results.iter().all(|result| result == &Err(expected.clone())));

        // No partial registry is exposed: even the first accepted type is unreachable.
        assert!(lazy.get().is_none());
        assert_eq!(lazy.resolve_type(5), Err(expected.clone()));
        assert_eq!(lazy.resolve_id(TypeHandle::of::<Heartbeat>()), Err(expected));
        assert_eq!(lazy.discovery.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn lookups_trigger_construction() {
        let lazy = LazyRegistry::new(CountingDiscovery::new(vec![Candidate::new::<Kick>(3)]));
        assert!(lazy.resolve_type(3).unwrap().is::<Kick>());
        assert_eq!(lazy.discovery.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            lazy.resolve_type(4),
            Err(WireError::InvalidSerializableId { id: 4 })
        );
    }

    #[test]
    fn global_registry_sees_linked_declarations() {
        let registry = initialize().unwrap();
        assert!(std::ptr::eq(registry, global().get().unwrap()));
        assert_eq!(id_of::<Heartbeat>().unwrap(), 900);
        assert!(resolve_type(900).unwrap().is::<Heartbeat>());
        assert_eq!(resolve_id(TypeHandle::of::<Heartbeat>()).unwrap(), 900);
        assert_eq!(registry.descriptor(900).unwrap().origin, module_path!());
        assert_eq!(
            id_of::<Kick>(),
            Err(WireError::InvalidSerializableType {
                handle: TypeHandle::of::<Kick>()
            })
        );
    }
}
