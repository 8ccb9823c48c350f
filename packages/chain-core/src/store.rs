use std::collections::BTreeMap;

use cosmwasm_std::{Order, Record, Storage};

/// The persistent key-value store. A real deployment backs this
/// with an external, atomically-committed store; this in-memory
/// implementation gives the `app` binary and every crate's test suite a
/// deterministic, byte-lexicographically-ordered stand-in with the same
/// `Storage` contract `cw-storage-plus`'s `Item`/`Map` already expect.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.data.get(key).cloned()
    }

    fn range<'a>(
        &'a self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'a> {
        let iter = self
            .data
            .range(bounds(start, end))
            .map(|(k, v)| (k.clone(), v.clone()));
        match order {
            Order::Ascending => Box::new(iter),
            Order::Descending => Box::new(iter.collect::<Vec<_>>().into_iter().rev()),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.data.insert(key.to_vec(), value.to_vec());
    }

    fn remove(&mut self, key: &[u8]) {
        self.data.remove(key);
    }
}

fn bounds(
    start: Option<&[u8]>,
    end: Option<&[u8]>,
) -> (std::ops::Bound<Vec<u8>>, std::ops::Bound<Vec<u8>>) {
    use std::ops::Bound;
    let lower = start.map(|s| Bound::Included(s.to_vec())).unwrap_or(Bound::Unbounded);
    let upper = end.map(|e| Bound::Excluded(e.to_vec())).unwrap_or(Bound::Unbounded);
    (lower, upper)
}

/// Length-prefixes a namespace the way the classic `cosmwasm_storage`
/// prefixed-storage helpers did, so one module's key space can never
/// collide with or become a byte-prefix of another's.
fn namespace_prefix(namespace: &[u8]) -> Vec<u8> {
    let len = namespace.len() as u16;
    let mut out = Vec::with_capacity(2 + namespace.len());
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(namespace);
    out
}

/// Smallest byte string greater than every string with the given prefix,
/// used as an exclusive upper range bound when the caller didn't supply
/// one of their own.
fn prefix_upper_bound(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut out = prefix.to_vec();
    while let Some(last) = out.pop() {
        if last < 0xff {
            out.push(last + 1);
            return Some(out);
        }
    }
    None
}

/// A namespaced view into a shared [`Storage`] implementation. Each module
/// keeper is constructed with one of these rather than a handle to the
/// whole store, so module state can never leak across prefixes.
pub struct PrefixedStore<'a> {
    prefix: Vec<u8>,
    storage: &'a mut dyn Storage,
}

impl<'a> PrefixedStore<'a> {
    pub fn new(storage: &'a mut dyn Storage, namespace: &str) -> Self {
        Self {
            prefix: namespace_prefix(namespace.as_bytes()),
            storage,
        }
    }

    fn prefixed(&self, key: &[u8]) -> Vec<u8> {
        [self.prefix.as_slice(), key].concat()
    }
}

impl<'a> Storage for PrefixedStore<'a> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.storage.get(&self.prefixed(key))
    }

    fn range<'b>(
        &'b self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'b> {
        let lower = match start {
            Some(s) => [self.prefix.as_slice(), s].concat(),
            None => self.prefix.clone(),
        };
        let upper = match end {
            Some(e) => [self.prefix.as_slice(), e].concat(),
            None => prefix_upper_bound(&self.prefix).unwrap_or_else(|| vec![0xff; 32]),
        };
        let prefix_len = self.prefix.len();
        let iter = self
            .storage
            .range(Some(&lower), Some(&upper), order)
            .map(move |(k, v)| (k[prefix_len..].to_vec(), v));
        Box::new(iter)
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        let key = self.prefixed(key);
        self.storage.set(&key, value);
    }

    fn remove(&mut self, key: &[u8]) {
        let key = self.prefixed(key);
        self.storage.remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_stores_do_not_collide() {
        let mut store = MemoryStore::new();
        {
            let mut amm = PrefixedStore::new(&mut store, "amm");
            amm.set(b"k", b"amm-value");
        }
        {
            let mut oracle = PrefixedStore::new(&mut store, "oracle");
            oracle.set(b"k", b"oracle-value");
        }
        let amm = PrefixedStore::new(&mut store, "amm");
        assert_eq!(amm.get(b"k"), Some(b"amm-value".to_vec()));
    }

    #[test]
    fn range_is_scoped_and_lexicographic() {
        let mut store = MemoryStore::new();
        {
            let mut sub = PrefixedStore::new(&mut store, "m");
            sub.set(b"b", b"2");
            sub.set(b"a", b"1");
            sub.set(b"c", b"3");
        }
        {
            let mut other = PrefixedStore::new(&mut store, "n");
            other.set(b"z", b"unused");
        }
        let sub = PrefixedStore::new(&mut store, "m");
        let collected: Vec<_> = sub
            .range(None, None, Order::Ascending)
            .map(|(k, v)| (k, v))
            .collect();
        assert_eq!(
            collected,
            vec![
                (b"a".to_vec(), b"1".to_vec()),
                (b"b".to_vec(), b"2".to_vec()),
                (b"c".to_vec(), b"3".to_vec()),
            ]
        );
    }
}
