//! Variable binding (VarBind) type and the VarBindList container.
//!
//! A VarBind pairs an OID with a value; a VarBindList is the ordered
//! sequence of VarBinds carried by every PDU.

use smallvec::SmallVec;

use crate::ber::{Decoder, EncodeBuf};
use crate::config::{ContainerBackend, EngineConfig};
use crate::error::{Error, Result};
use crate::oid::Oid;
use crate::value::Value;

/// Variable binding - an OID-value pair.
#[derive(Debug, Clone, PartialEq)]
pub struct VarBind {
    /// The object identifier.
    pub oid: Oid,
    /// The value.
    pub value: Value,
}

impl VarBind {
    /// Create a new VarBind.
    pub fn new(oid: Oid, value: Value) -> Self {
        Self { oid, value }
    }

    /// Create a VarBind with a NULL value (for GET requests).
    pub fn null(oid: Oid) -> Self {
        Self {
            oid,
            value: Value::Null,
        }
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) -> Result<()> {
        let mut oid_err = None;
        buf.push_sequence(|buf| {
            self.value.encode(buf);
            if let Err(e) = buf.push_oid(&self.oid) {
                oid_err = Some(e);
            }
        });
        match oid_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Returns the exact encoded size of this VarBind in bytes.
    ///
    /// Encodes to a scratch buffer to determine the exact size; useful for
    /// response size estimation while assembling a GetBulkRequest response.
    pub fn encoded_size(&self) -> Result<usize> {
        let mut buf = EncodeBuf::new();
        self.encode(&mut buf)?;
        Ok(buf.len())
    }

    /// Decode from BER.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let mut seq = decoder.read_sequence()?;
        seq.expect_tag(crate::ber::tag::universal::OBJECT_IDENTIFIER)?;
        let oid = seq.read_oid()?;
        let value = Value::decode(&mut seq)?;
        seq.finish("VarBind")?;
        Ok(VarBind { oid, value })
    }
}

impl std::fmt::Display for VarBind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.oid, self.value)
    }
}

/// The ordered list of VarBinds carried by a PDU.
///
/// Backed by a `SmallVec<[VarBind; 6]>`: six is enough to hold a typical
/// GetRequest/Response without spilling to the heap, matching
/// [`crate::config::DEFAULT_CONTAINER_CAPACITY`]. [`VarBindList::push_with`]
/// enforces a caller-chosen capacity ceiling when the caller's
/// [`EngineConfig`] selects [`ContainerBackend::FixedCapacity`]; plain
/// [`VarBindList::push`] always grows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VarBindList(SmallVec<[VarBind; 6]>);

impl VarBindList {
    /// An empty list.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Build a list of NULL-valued VarBinds from a list of OIDs — the shape
    /// a GetRequest/GetNextRequest's query list takes.
    pub fn from_oids_null<I: IntoIterator<Item = Oid>>(oids: I) -> Self {
        Self(oids.into_iter().map(VarBind::null).collect())
    }

    /// Number of VarBinds in the list.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the list has no VarBinds.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the VarBind at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&VarBind> {
        self.0.get(index)
    }

    /// Mutably borrow the VarBind at `index`, if present.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut VarBind> {
        self.0.get_mut(index)
    }

    /// Iterate over the VarBinds by reference.
    pub fn iter(&self) -> std::slice::Iter<'_, VarBind> {
        self.0.iter()
    }

    /// Iterate over the VarBinds by mutable reference.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, VarBind> {
        self.0.iter_mut()
    }

    /// Append a VarBind, always growing past the inline capacity if needed.
    pub fn push(&mut self, vb: VarBind) {
        self.0.push(vb);
    }

    /// Append a VarBind, honoring `config`'s container capacity policy: if
    /// `config.container_backend()` is [`ContainerBackend::FixedCapacity`]
    /// and the list is already at `config.container_capacity()`, returns
    /// [`Error::CapacityExceeded`] instead of growing.
    pub fn push_with(&mut self, vb: VarBind, config: &EngineConfig) -> Result<()> {
        if config.container_backend() == ContainerBackend::FixedCapacity
            && self.0.len() >= config.container_capacity()
        {
            return Err(Error::CapacityExceeded {
                max: config.container_capacity(),
            });
        }
        self.0.push(vb);
        Ok(())
    }

    /// Encode the whole list as a SEQUENCE OF VarBind.
    pub fn encode(&self, buf: &mut EncodeBuf) -> Result<()> {
        let mut first_err = None;
        buf.push_sequence(|buf| {
            // Reverse buffer: encode in reverse order for forward output.
            for vb in self.0.iter().rev() {
                if let Err(e) = vb.encode(buf)
                    && first_err.is_none()
                {
                    first_err = Some(e);
                }
            }
        });
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Decode a SEQUENCE OF VarBind.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let mut seq = decoder.read_sequence()?;
        let mut varbinds = SmallVec::new();
        while !seq.is_empty() {
            varbinds.push(VarBind::decode(&mut seq)?);
        }
        Ok(VarBindList(varbinds))
    }
}

impl FromIterator<VarBind> for VarBindList {
    fn from_iter<I: IntoIterator<Item = VarBind>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for VarBindList {
    type Item = VarBind;
    type IntoIter = smallvec::IntoIter<[VarBind; 6]>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a VarBindList {
    type Item = &'a VarBind;
    type IntoIter = std::slice::Iter<'a, VarBind>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::ops::Index<usize> for VarBindList {
    type Output = VarBind;

    fn index(&self, index: usize) -> &VarBind {
        &self.0[index]
    }
}

impl std::fmt::Display for VarBindList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, vb) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", vb)?;
        }
        Ok(())
    }
}
