use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use std::fmt::{self, Formatter};
use std::marker::PhantomData;

use crate::{Dictionary, DictionaryRef};

impl<V> Serialize for Dictionary<V>
where
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.lock().serialize(serializer)
    }
}

impl<V> Serialize for DictionaryRef<'_, V>
where
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

impl<'de, V> Deserialize<'de> for Dictionary<V>
where
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(DictVisitor {
            _marker: PhantomData,
        })
    }
}

struct DictVisitor<V> {
    _marker: PhantomData<Dictionary<V>>,
}

impl<'de, V> Visitor<'de> for DictVisitor<V>
where
    V: Deserialize<'de>,
{
    type Value = Dictionary<V>;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a map with string keys")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        // the bucket table is fixed at construction, so the entries are
        // buffered first and the table sized to the final count
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(entry) = access.next_entry::<String, V>()? {
            entries.push(entry);
        }

        let dict = Dictionary::with_buckets(entries.len().max(1)).map_err(serde::de::Error::custom)?;
        {
            let mut guard = dict.lock();
            for (key, value) in entries {
                guard.insert(&key, value).map_err(serde::de::Error::custom)?;
            }
        }

        Ok(dict)
    }
}
