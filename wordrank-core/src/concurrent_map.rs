use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::borrow::Borrow;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// A map partitioned into independently locked shards. A key always
/// lands in the same shard, so mutations to keys in different shards
/// never contend; keys that collide in one shard serialize on that
/// shard's lock only.
#[derive(Debug)]
pub struct ConcurrentMap<K, V> {
    shards: Vec<Mutex<HashMap<K, V>>>,
}

impl<K, V> ConcurrentMap<K, V>
where
    K: Eq + Hash,
    V: Default,
{
    /// Creates a map with a fixed number of shards.
    ///
    /// # Panics
    /// Panics if `shard_count` is zero.
    pub fn new(shard_count: usize) -> Self {
        assert!(shard_count > 0, "shard count must be positive");
        Self {
            shards: (0..shard_count).map(|_| Mutex::new(HashMap::new())).collect(),
        }
    }

    fn shard<Q>(&self, key: &Q) -> &Mutex<HashMap<K, V>>
    where
        Q: Hash + ?Sized,
    {
        // DefaultHasher::new() seeds identically every time, so the
        // shard choice is deterministic for a given key.
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        &self.shards[(hasher.finish() % self.shards.len() as u64) as usize]
    }

    /// Exclusive access to the value under `key`, inserting a default
    /// value if the key is absent. The owning shard stays locked until
    /// the returned guard is dropped.
    pub fn access(&self, key: K) -> MappedMutexGuard<'_, V> {
        let guard = self.shard(&key).lock();
        MutexGuard::map(guard, |shard| shard.entry(key).or_default())
    }

    /// Like [`access`](Self::access), but never inserts; returns `None`
    /// when the key is absent.
    pub fn get<Q>(&self, key: &Q) -> Option<MappedMutexGuard<'_, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let guard = self.shard(key).lock();
        MutexGuard::try_map(guard, |shard| shard.get_mut(key)).ok()
    }

    /// Removes the entry under `key`, locking only the owning shard.
    pub fn erase<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shard(key).lock().remove(key);
    }

    /// Number of entries across all shards, counted one shard at a time.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies every shard into one ordinary map, locking the shards
    /// sequentially. The copy is *not* transaction-consistent: a
    /// writer running concurrently may be observed in one shard's
    /// pre-update state and another shard's post-update state. Treat
    /// the result as recent, not atomic.
    pub fn snapshot(&self) -> HashMap<K, V>
    where
        K: Clone,
        V: Clone,
    {
        let mut result = HashMap::new();
        for shard in &self.shards {
            let guard = shard.lock();
            result.extend(guard.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        result
    }
}
