//! Interning of record field names.

use std::sync::Arc;

/// Index of a field within its record type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldId(pub(crate) usize);

impl FieldId {
    /// Position of the field in [`crate::registry::TypeDescriptor::fields`].
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Object key, as resolved against the fields of a record type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    /// key that names a field, with the canonical name of the field
    Field(FieldId, Arc<str>),
    /// key that no constructor of the type declares
    Other(String),
}

impl Key {
    /// Return the key as string.
    pub fn name(&self) -> &str {
        match self {
            Self::Field(_, name) => name,
            Self::Other(name) => name,
        }
    }
}

/// Table from the UTF-8 bytes of field names to their canonical names.
///
/// Looking up the same name twice yields the same [`Arc`],
/// so names can be compared with [`Arc::ptr_eq`].
#[derive(Debug, Default)]
pub struct KeyInterner {
    names: Vec<Arc<str>>,
    /// `by_len[n]` holds the fields whose name is `n` bytes long
    by_len: Vec<Vec<FieldId>>,
}

impl KeyInterner {
    /// Create an interner for the given field names, indexed by [`FieldId`].
    pub fn new(names: Vec<Arc<str>>) -> Self {
        let mut by_len: Vec<Vec<FieldId>> = Vec::new();
        for (i, name) in names.iter().enumerate() {
            let len = name.len();
            if by_len.len() <= len {
                by_len.resize_with(len + 1, Vec::new);
            }
            by_len[len].push(FieldId(i));
        }
        Self { names, by_len }
    }

    /// Find the field whose name consists of exactly `bytes`.
    pub fn lookup(&self, bytes: &[u8]) -> Option<(FieldId, &Arc<str>)> {
        let candidates = self.by_len.get(bytes.len())?;
        candidates.iter().find_map(|id| {
            let name = &self.names[id.0];
            (name.as_bytes() == bytes).then_some((*id, name))
        })
    }

    /// Resolve `bytes` to a field, or to a freshly allocated string.
    pub fn intern(&self, bytes: &[u8]) -> Key {
        match self.lookup(bytes) {
            Some((id, name)) => Key::Field(id, name.clone()),
            None => Key::Other(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// Canonical name of the given field.
    pub fn name(&self, id: FieldId) -> &Arc<str> {
        &self.names[id.0]
    }
}
