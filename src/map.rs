use crate::raw::hash::{mmh64, HashFn};
use crate::raw::RawDict;
use crate::Error;

use parking_lot::{Mutex, MutexGuard};

use std::fmt;
use std::marker::PhantomData;

/// The bucket count used by [`DictionaryBuilder`] when none is given.
pub const DEFAULT_BUCKETS: usize = 64;

/// A thread-safe, string-keyed dictionary with O(1) enumeration and removal.
///
/// Lookups resolve collisions through per-bucket chains; a packed mirror of
/// every live key and value makes counting and enumeration independent of the
/// bucket table. All operations take `&self` and serialize through one
/// per-instance lock, so a `Dictionary` can be shared freely across threads.
///
/// The bucket count is fixed when the dictionary is constructed. Chains grow
/// without bound past it, so size the table for the expected load.
///
/// # Examples
///
/// ```
/// use loquat::Dictionary;
///
/// let dict: Dictionary<u32> = Dictionary::with_buckets(16).unwrap();
///
/// dict.insert("one", 1).unwrap();
/// dict.insert("two", 2).unwrap();
///
/// assert_eq!(dict.get("one"), Some(1));
/// assert_eq!(dict.get("three"), None);
/// assert_eq!(dict.len(), 2);
/// ```
pub struct Dictionary<V> {
    raw: Mutex<RawDict<V>>,
}

impl<V> Dictionary<V> {
    /// Creates an empty dictionary with `buckets` hash buckets and the
    /// default hash function.
    ///
    /// Returns [`Error::ZeroBuckets`] if `buckets` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use loquat::Dictionary;
    ///
    /// let dict: Dictionary<&str> = Dictionary::with_buckets(64).unwrap();
    /// assert!(dict.is_empty());
    /// assert!(Dictionary::<&str>::with_buckets(0).is_err());
    /// ```
    pub fn with_buckets(buckets: usize) -> Result<Dictionary<V>, Error> {
        Dictionary::with_buckets_and_hasher(buckets, mmh64)
    }

    /// Creates an empty dictionary with `buckets` hash buckets and an
    /// injected hash function.
    ///
    /// The function must be deterministic for the life of the instance;
    /// beyond that the dictionary makes no assumptions about its quality.
    pub fn with_buckets_and_hasher(buckets: usize, hash_fn: HashFn) -> Result<Dictionary<V>, Error> {
        Ok(Dictionary {
            raw: Mutex::new(RawDict::with_buckets(buckets, hash_fn)?),
        })
    }

    /// Returns a builder for configuring a dictionary.
    ///
    /// # Examples
    ///
    /// ```
    /// use loquat::Dictionary;
    ///
    /// let dict: Dictionary<u32> = Dictionary::builder()
    ///     .buckets(128)
    ///     .hasher(loquat::mmh64)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(dict.bucket_count(), 128);
    /// ```
    pub fn builder() -> DictionaryBuilder<V> {
        DictionaryBuilder {
            buckets: DEFAULT_BUCKETS,
            hash_fn: mmh64,
            _v: PhantomData,
        }
    }

    /// Creates a dictionary from a list of keys, each mapped to
    /// `V::default()`.
    ///
    /// The bucket count equals the number of keys supplied. An empty key
    /// list is rejected with [`Error::ZeroBuckets`], since it would fix the
    /// bucket table at zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use loquat::Dictionary;
    ///
    /// let dict: Dictionary<Option<u32>> = Dictionary::from_keys(["a", "b", "c"]).unwrap();
    ///
    /// assert_eq!(dict.len(), 3);
    /// assert_eq!(dict.get("a"), Some(None));
    /// assert_eq!(dict.get("d"), None);
    /// ```
    pub fn from_keys<I>(keys: I) -> Result<Dictionary<V>, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        V: Default,
    {
        let keys: Vec<I::Item> = keys.into_iter().collect();
        let dict = Dictionary::with_buckets(keys.len())?;

        {
            let mut guard = dict.lock();
            for key in &keys {
                guard.insert(key.as_ref(), V::default())?;
            }
        }

        Ok(dict)
    }

    /// Acquires the dictionary's lock, returning a view that can perform any
    /// number of operations under the one acquisition.
    ///
    /// Borrowed access (`get` returning `&V`, iteration) is only available
    /// through this view, since the lock must be held for as long as the
    /// borrow lives. Other callers block until the view is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use loquat::Dictionary;
    ///
    /// let dict: Dictionary<u32> = Dictionary::with_buckets(16).unwrap();
    ///
    /// let mut guard = dict.lock();
    /// guard.insert("one", 1).unwrap();
    /// guard.insert("two", 2).unwrap();
    /// assert_eq!(guard.iter().count(), 2);
    /// ```
    pub fn lock(&self) -> DictionaryRef<'_, V> {
        DictionaryRef {
            raw: self.raw.lock(),
        }
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if the dictionary holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current bound of the dense enumeration storage.
    ///
    /// The bound doubles as entries are added and halves once occupancy
    /// falls to a quarter; it is always at least the entry count.
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Returns the fixed bucket count chosen at construction.
    pub fn bucket_count(&self) -> usize {
        self.lock().bucket_count()
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// Returns a clone of the value stored for `key`, or `None` if the key
    /// is absent.
    ///
    /// Absence is the normal not-found outcome, not an error. Store
    /// `Arc<T>` values to make the clone a shared reference.
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.lock().get(key).cloned()
    }

    /// Inserts a key/value pair, returning the previous value if the key was
    /// already present.
    ///
    /// An existing key is overwritten in place: the entry count and the
    /// entry's enumeration position are unchanged. The key is copied into
    /// the dictionary on first insertion.
    ///
    /// Returns [`Error::Alloc`] if growing the enumeration storage fails; the
    /// dictionary is left unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use loquat::Dictionary;
    ///
    /// let dict: Dictionary<u32> = Dictionary::with_buckets(16).unwrap();
    ///
    /// assert_eq!(dict.insert("k", 1).unwrap(), None);
    /// assert_eq!(dict.insert("k", 2).unwrap(), Some(1));
    /// assert_eq!(dict.len(), 1);
    /// ```
    pub fn insert(&self, key: &str, value: V) -> Result<Option<V>, Error> {
        self.lock().insert(key, value)
    }

    /// Removes `key`, returning its value, or `None` if the key is absent.
    ///
    /// Removal is O(1) beyond the chain walk: the last entry in enumeration
    /// order is swapped into the vacated position, so enumeration order is
    /// only stable until the first removal.
    ///
    /// # Examples
    ///
    /// ```
    /// use loquat::Dictionary;
    ///
    /// let dict: Dictionary<u32> = Dictionary::with_buckets(16).unwrap();
    /// dict.insert("k", 1).unwrap();
    ///
    /// assert_eq!(dict.remove("k"), Some(1));
    /// assert_eq!(dict.remove("k"), None);
    /// ```
    pub fn remove(&self, key: &str) -> Option<V> {
        self.lock().remove(key)
    }

    /// Returns every live key, in enumeration order.
    ///
    /// The snapshot is index-aligned with [`values`](Dictionary::values)
    /// taken under the same lock acquisition; interleaved mutation from
    /// other threads can reorder the two calls' views of the dictionary.
    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().map(String::from).collect()
    }

    /// Returns a clone of every live value, in enumeration order.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.lock().values().cloned().collect()
    }

    /// Calls `f` once for each live entry, in enumeration order, holding the
    /// lock for the whole traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use loquat::Dictionary;
    ///
    /// let dict: Dictionary<u32> = Dictionary::with_buckets(16).unwrap();
    /// dict.insert("a", 1).unwrap();
    /// dict.insert("b", 2).unwrap();
    ///
    /// let mut total = 0;
    /// dict.for_each(|_key, value| total += value);
    /// assert_eq!(total, 3);
    /// ```
    pub fn for_each(&self, mut f: impl FnMut(&str, &V)) {
        let guard = self.lock();
        for (key, value) in guard.iter() {
            f(key, value);
        }
    }

    /// Removes and drops every entry.
    ///
    /// The bucket count is untouched; the enumeration storage is reset to
    /// its minimal bound. The dictionary remains usable.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Removes every entry, handing each value to `f` before it is dropped.
    ///
    /// The values arrive in enumeration order, each exactly once. Useful
    /// when values are handles whose release the caller manages.
    pub fn clear_with(&self, f: impl FnMut(V)) {
        self.lock().clear_with(f);
    }
}

// A copied dictionary shares nothing with its source: same bucket count,
// same hash function, same keys, values cloned. Cloning `Arc` values yields
// the shallow-copy semantics of sharing one referent between both instances.
impl<V: Clone> Clone for Dictionary<V> {
    fn clone(&self) -> Dictionary<V> {
        Dictionary {
            raw: Mutex::new(self.raw.lock().clone()),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Dictionary<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.lock().iter()).finish()
    }
}

/// A builder for a [`Dictionary`].
///
/// # Examples
///
/// ```
/// use loquat::Dictionary;
///
/// fn byte_sum(data: &[u8]) -> u64 {
///     data.iter().map(|&b| u64::from(b)).sum()
/// }
///
/// let dict: Dictionary<u32> = Dictionary::builder()
///     // Set the bucket count.
///     .buckets(32)
///     // Set the hash function.
///     .hasher(byte_sum)
///     // Construct the dictionary.
///     .build()
///     .unwrap();
/// ```
pub struct DictionaryBuilder<V> {
    buckets: usize,
    hash_fn: HashFn,
    _v: PhantomData<V>,
}

impl<V> DictionaryBuilder<V> {
    /// Sets the bucket count, fixed for the life of the dictionary.
    ///
    /// Defaults to [`DEFAULT_BUCKETS`]. The expected chain length is the
    /// entry count divided by the bucket count, so choose a count on the
    /// order of the expected population.
    pub fn buckets(mut self, buckets: usize) -> DictionaryBuilder<V> {
        self.buckets = buckets;
        self
    }

    /// Sets the hash function used to place keys in buckets.
    ///
    /// Defaults to [`mmh64`](crate::mmh64). The function is not required to
    /// resist adversarial keys; a poor hash degrades chains, never
    /// correctness.
    pub fn hasher(mut self, hash_fn: HashFn) -> DictionaryBuilder<V> {
        self.hash_fn = hash_fn;
        self
    }

    /// Constructs the dictionary.
    pub fn build(self) -> Result<Dictionary<V>, Error> {
        Dictionary::with_buckets_and_hasher(self.buckets, self.hash_fn)
    }
}

/// An exclusive view of a locked [`Dictionary`].
///
/// Produced by [`Dictionary::lock`]. The instance lock is held until the
/// view is dropped, so borrows handed out here (`get`, the iterators) are
/// valid for as long as the view lives, and every other caller blocks.
pub struct DictionaryRef<'dict, V> {
    raw: MutexGuard<'dict, RawDict<V>>,
}

impl<V> DictionaryRef<'_, V> {
    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the dictionary holds no entries.
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Returns the current bound of the dense enumeration storage.
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the fixed bucket count chosen at construction.
    pub fn bucket_count(&self) -> usize {
        self.raw.bucket_count()
    }

    /// Returns a borrow of the value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.raw.get(key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.raw.get(key).is_some()
    }

    /// Inserts a key/value pair, returning the previous value if the key
    /// was already present.
    pub fn insert(&mut self, key: &str, value: V) -> Result<Option<V>, Error> {
        self.raw.insert(key, value)
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.raw.remove(key)
    }

    /// Removes and drops every entry.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Removes every entry, handing each value to `f` before it is dropped.
    pub fn clear_with(&mut self, f: impl FnMut(V)) {
        self.raw.clear_with(f);
    }

    /// Returns an iterator over the live entries, in enumeration order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            keys: self.raw.dense_keys().iter(),
            values: self.raw.dense_values().iter(),
        }
    }

    /// Returns an iterator over the live keys, in enumeration order.
    pub fn keys(&self) -> Keys<'_> {
        Keys {
            inner: self.raw.dense_keys().iter(),
        }
    }

    /// Returns an iterator over the live values, in enumeration order.
    ///
    /// The order is index-aligned with [`keys`](DictionaryRef::keys).
    pub fn values(&self) -> Values<'_, V> {
        Values {
            inner: self.raw.dense_values().iter(),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for DictionaryRef<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V> IntoIterator for &'a DictionaryRef<'_, V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

/// An iterator over a dictionary's entries. See [`DictionaryRef::iter`].
pub struct Iter<'a, V> {
    keys: std::slice::Iter<'a, Box<str>>,
    values: std::slice::Iter<'a, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        Some((&**self.keys.next()?, self.values.next()?))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// An iterator over a dictionary's keys. See [`DictionaryRef::keys`].
pub struct Keys<'a> {
    inner: std::slice::Iter<'a, Box<str>>,
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.inner.next().map(|key| &**key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Keys<'_> {}

/// An iterator over a dictionary's values. See [`DictionaryRef::values`].
pub struct Values<'a, V> {
    inner: std::slice::Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}
