//! Entity caches bundled with their document decoder.
//!
//! The synchronization engine only sees raw documents and kind names. A
//! [`Cacher`] is the type-erased face of one entity cache it dispatches to;
//! [`EntityCacher`] implements it for an [`EntityCache`] plus a [`Decoder`].

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use sd_core::{document_id, ChangeEvent, ChangeKind, Entity, PrimaryKey, RawDocument, SdError, SdResult};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::cache::{ApplyOutcome, EntityCache};

/// Decodes a raw document into its primary key and entity.
pub type Decoder<E> = Arc<dyn Fn(&RawDocument) -> SdResult<(PrimaryKey, E)> + Send + Sync>;

/// Decoder for documents whose body deserializes straight into `E`.
///
/// The primary key is read from `_id`, either a plain string or an
/// extended-JSON object id.
pub fn json_decoder<E>() -> Decoder<E>
where
    E: Entity + DeserializeOwned,
{
    Arc::new(|doc: &RawDocument| -> SdResult<(PrimaryKey, E)> {
        let key = document_id(E::KIND, doc)?;
        let value = E::deserialize(doc).map_err(|err| SdError::decode(E::KIND, err))?;
        Ok((key, value))
    })
}

/// Type-erased entity cache as driven by the synchronization engine.
pub trait Cacher: Send + Sync + fmt::Debug {
    /// Entity-kind name.
    fn name(&self) -> &str;

    /// Number of cached entries.
    fn size(&self) -> usize;

    /// Whether a full resync is due.
    fn dirty(&self) -> bool;

    /// Request a full resync.
    fn mark_dirty(&self);

    /// Drop all contents and reset the dirty flag.
    fn clear(&self);

    /// Decode a raw document and apply it as a change of the given kind.
    ///
    /// Updates need a fully decodable document; deletes only need its id.
    /// A document that fails to decode is dropped and nothing is mutated.
    fn apply_document(&self, kind: ChangeKind, doc: &RawDocument) -> SdResult<ApplyOutcome>;

    /// Convert to Any for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// An [`EntityCache`] together with the decoder for its documents.
pub struct EntityCacher<E: Entity> {
    cache: Arc<EntityCache<E>>,
    decoder: Decoder<E>,
}

impl<E: Entity> EntityCacher<E> {
    /// Bundle a cache with its decoder.
    pub fn new(cache: EntityCache<E>, decoder: Decoder<E>) -> Self {
        Self {
            cache: Arc::new(cache),
            decoder,
        }
    }

    /// The typed cache.
    #[inline]
    pub fn cache(&self) -> &Arc<EntityCache<E>> {
        &self.cache
    }

    /// Decode a raw document into a change event of the given kind.
    pub fn decode(&self, kind: ChangeKind, doc: &RawDocument) -> SdResult<ChangeEvent<E>> {
        match kind {
            ChangeKind::Update => {
                let (key, value) = (self.decoder)(doc)?;
                Ok(ChangeEvent::update(key, value))
            }
            ChangeKind::Delete => Ok(ChangeEvent::delete(document_id(self.cache.name(), doc)?)),
        }
    }
}

impl<E: Entity> fmt::Debug for EntityCacher<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityCacher")
            .field("name", &self.cache.name())
            .field("size", &self.cache.size())
            .finish()
    }
}

impl<E: Entity> Cacher for EntityCacher<E> {
    fn name(&self) -> &str {
        self.cache.name()
    }

    fn size(&self) -> usize {
        self.cache.size()
    }

    fn dirty(&self) -> bool {
        self.cache.dirty()
    }

    fn mark_dirty(&self) {
        self.cache.mark_dirty()
    }

    fn clear(&self) {
        self.cache.clear()
    }

    fn apply_document(&self, kind: ChangeKind, doc: &RawDocument) -> SdResult<ApplyOutcome> {
        let event = self.decode(kind, doc).inspect_err(|err| {
            warn!(cache = %self.cache.name(), op = %kind, error = %err, "dropping undecodable document");
        })?;
        Ok(self.cache.apply(event))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
