use bytes::Bytes;
use clipnest_base::DEFAULT_MAX_HISTORY;
use time::OffsetDateTime;

use crate::entry::{Content, Entry, Id, Snapshot};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InsertOutcome {
    Inserted(Id),

    /// A text entry with the same payload already exists, nothing changed.
    Duplicate(Id),
}

impl InsertOutcome {
    #[inline]
    #[must_use]
    pub const fn is_inserted(&self) -> bool { matches!(self, Self::Inserted(_)) }

    #[inline]
    #[must_use]
    pub const fn id(&self) -> Id {
        match self {
            Self::Inserted(id) | Self::Duplicate(id) => *id,
        }
    }
}

/// Ordered, capacity-bounded collection of clipboard entries.
///
/// Storage keeps insertion order (new entries are prepended) and is reshaped
/// into `pinned ++ unpinned` whenever capacity is enforced. Rendering uses the
/// display order instead: pinned entries first, then by descending timestamp.
/// At most `capacity` unpinned entries remain after an insert, pinned entries
/// are unbounded.
#[derive(Clone, Debug)]
pub struct HistoryStore {
    entries: Vec<Entry>,

    capacity: usize,

    next_id: u64,
}

impl Default for HistoryStore {
    fn default() -> Self { Self::with_capacity(DEFAULT_MAX_HISTORY) }
}

impl HistoryStore {
    #[inline]
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// A capacity of zero falls back to [`DEFAULT_MAX_HISTORY`].
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = if capacity == 0 { DEFAULT_MAX_HISTORY } else { capacity };
        Self { entries: Vec::new(), capacity, next_id: 0 }
    }

    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize { self.capacity }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    #[inline]
    #[must_use]
    pub fn pinned_count(&self) -> usize { self.entries.iter().filter(|e| e.is_pinned()).count() }

    #[inline]
    #[must_use]
    pub fn unpinned_count(&self) -> usize { self.len() - self.pinned_count() }

    /// Entries in storage order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Entry> { self.entries.iter() }

    #[inline]
    #[must_use]
    pub fn get(&self, id: Id) -> Option<&Entry> { self.entries.iter().find(|e| e.id() == id) }

    /// Newest text entry, used to seed change detection of the clipboard watcher.
    #[must_use]
    pub fn latest_text(&self) -> Option<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.as_text().is_some())
            .max_by_key(|entry| entry.timestamp())
            .and_then(Entry::as_text)
    }

    pub fn insert_text<S>(&mut self, text: S, now: OffsetDateTime) -> InsertOutcome
    where
        S: Into<String>,
    {
        let text = text.into();
        if let Some(existing) = self.entries.iter().find(|e| e.as_text() == Some(text.as_str())) {
            tracing::trace!("Skip duplicated text (id: {})", existing.id());
            return InsertOutcome::Duplicate(existing.id());
        }

        InsertOutcome::Inserted(self.insert_front(Content::Text(text), now))
    }

    /// Images are never de-duplicated.
    pub fn insert_image<S>(&mut self, data: Bytes, ocr_text: S, now: OffsetDateTime) -> InsertOutcome
    where
        S: Into<String>,
    {
        InsertOutcome::Inserted(self.insert_front(Content::Image { data, ocr_text: ocr_text.into() }, now))
    }

    fn insert_front(&mut self, content: Content, now: OffsetDateTime) -> Id {
        let id = self.allocate_id();
        self.entries.insert(0, Entry::new(id, content, now, false));
        let _evicted = self.enforce_capacity();
        id
    }

    /// Reassembles storage as `pinned ++ unpinned` and drops unpinned entries
    /// past the capacity, counted in storage order. Returns the number of
    /// evicted entries.
    fn enforce_capacity(&mut self) -> usize {
        let (mut pinned, mut unpinned): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.entries).into_iter().partition(Entry::is_pinned);

        let evicted = if unpinned.len() > self.capacity {
            let evicted = unpinned.split_off(self.capacity);
            for entry in &evicted {
                tracing::trace!("Remove old entry (id: {}, timestamp: {})", entry.id(), entry.timestamp());
            }
            evicted.len()
        } else {
            0
        };

        pinned.append(&mut unpinned);
        self.entries = pinned;
        evicted
    }

    /// Flips the pin flag and returns the new state, `None` if `id` is unknown.
    ///
    /// Unpinning does not evict anything by itself: the unpinned tier may
    /// exceed the capacity until the next insert enforces it.
    pub fn toggle_pin(&mut self, id: Id) -> Option<bool> {
        let entry = self.entries.iter_mut().find(|e| e.id() == id)?;
        let pinned = !entry.is_pinned();
        entry.set_pinned(pinned);
        Some(pinned)
    }

    pub fn delete(&mut self, id: Id) -> Option<Entry> {
        let position = self.entries.iter().position(|e| e.id() == id)?;
        Some(self.entries.remove(position))
    }

    #[inline]
    pub fn clear(&mut self) { self.entries.clear(); }

    /// Entries in display order, optionally narrowed by a case-insensitive
    /// substring search over text entries. Image entries always pass the search.
    #[must_use]
    pub fn query(&self, filter: Option<&str>) -> Vec<&Entry> { self.display_view(filter) }

    /// Maps a position of [`Self::query`] with the same `filter` back to the
    /// entry it shows.
    #[must_use]
    pub fn resolve_display_index(&self, display_index: usize, filter: Option<&str>) -> Option<Id> {
        self.display_view(filter).get(display_index).map(|entry| entry.id())
    }

    fn display_view(&self, filter: Option<&str>) -> Vec<&Entry> {
        let needle = filter.map(str::to_lowercase).unwrap_or_default();
        let mut view =
            self.entries.iter().filter(|entry| entry.matches_lowercase(&needle)).collect::<Vec<_>>();
        // stable sort keeps storage order between equal timestamps
        view.sort_by(|a, b| {
            b.is_pinned().cmp(&a.is_pinned()).then_with(|| b.timestamp().cmp(&a.timestamp()))
        });
        view
    }

    /// Replaces the whole collection, keeping the given order as storage order.
    ///
    /// Capacity is not enforced here, the next insert does it.
    pub fn import<I>(&mut self, snapshots: I)
    where
        I: IntoIterator<Item = Snapshot>,
    {
        self.entries.clear();
        for snapshot in snapshots {
            let id = self.allocate_id();
            self.entries.push(Entry::from_snapshot(id, snapshot));
        }
    }

    /// Entries in storage order, ready to be persisted.
    #[must_use]
    pub fn export(&self) -> Vec<Snapshot> { self.entries.iter().map(Entry::snapshot).collect() }

    fn allocate_id(&mut self) -> Id {
        let id = Id::new(self.next_id);
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use time::{Duration, OffsetDateTime};

    use crate::{
        entry::{Content, Snapshot},
        store::{HistoryStore, InsertOutcome},
        Entry,
    };

    fn at(seconds: i64) -> OffsetDateTime { OffsetDateTime::UNIX_EPOCH + Duration::seconds(seconds) }

    fn texts(entries: &[&Entry]) -> Vec<String> {
        entries
            .iter()
            .map(|entry| entry.as_text().map_or_else(|| "<image>".to_string(), str::to_string))
            .collect()
    }

    fn find_text(store: &HistoryStore, text: &str) -> crate::EntryId {
        store.iter().find(|e| e.as_text() == Some(text)).map(Entry::id).unwrap()
    }

    fn png() -> Bytes { Bytes::from_static(b"\x89PNG fake") }

    #[test]
    fn test_construction() {
        let store = HistoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 25);

        assert_eq!(HistoryStore::with_capacity(0).capacity(), 25);
        assert_eq!(HistoryStore::with_capacity(3).capacity(), 3);
    }

    #[test]
    fn test_duplicate_text_is_noop() {
        let mut store = HistoryStore::new();
        let first = store.insert_text("a", at(1));
        let _ = store.insert_text("b", at(2));
        assert!(first.is_inserted());

        let before = store.export();
        let outcome = store.insert_text("a", at(3));
        assert_eq!(outcome, InsertOutcome::Duplicate(first.id()));
        assert_eq!(store.export(), before);

        // also when the existing entry is pinned
        assert_eq!(store.toggle_pin(first.id()), Some(true));
        let before = store.export();
        assert!(!store.insert_text("a", at(4)).is_inserted());
        assert_eq!(store.export(), before);
    }

    #[test]
    fn test_images_are_not_deduplicated() {
        let mut store = HistoryStore::new();
        let a = store.insert_image(png(), "", at(1));
        let b = store.insert_image(png(), "", at(2));
        assert!(a.is_inserted());
        assert!(b.is_inserted());
        assert_ne!(a.id(), b.id());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_unpinned_capacity_is_enforced() {
        let mut store = HistoryStore::with_capacity(25);
        for i in 0..60 {
            let _ = store.insert_text(format!("text-{i}"), at(i));
            assert!(store.unpinned_count() <= 25);
        }
        assert_eq!(store.len(), 25);

        let kept = texts(&store.query(None));
        assert_eq!(kept.first().map(String::as_str), Some("text-59"));
        assert_eq!(kept.last().map(String::as_str), Some("text-35"));
    }

    #[test]
    fn test_pinned_entries_are_unbounded() {
        let mut store = HistoryStore::with_capacity(2);
        for i in 0..5 {
            let id = store.insert_text(format!("pinned-{i}"), at(i)).id();
            let _ = store.toggle_pin(id);
        }
        for i in 5..10 {
            let _ = store.insert_text(format!("plain-{i}"), at(i));
        }
        assert_eq!(store.pinned_count(), 5);
        assert_eq!(store.unpinned_count(), 2);
    }

    #[test]
    fn test_unpin_may_exceed_capacity_until_next_insert() {
        let mut store = HistoryStore::with_capacity(2);
        let pinned = store.insert_text("keep", at(0)).id();
        let _ = store.toggle_pin(pinned);
        let _ = store.insert_text("x", at(1));
        let _ = store.insert_text("y", at(2));
        assert_eq!(store.unpinned_count(), 2);

        assert_eq!(store.toggle_pin(pinned), Some(false));
        assert_eq!(store.unpinned_count(), 3);

        let _ = store.insert_text("z", at(3));
        assert_eq!(store.unpinned_count(), 2);
    }

    #[test]
    fn test_display_order() {
        let mut store = HistoryStore::new();
        let _ = store.insert_text("a", at(1));
        let _ = store.insert_text("b", at(2));
        let _ = store.insert_text("c", at(3));
        assert_eq!(texts(&store.query(None)), ["c", "b", "a"]);

        let a = find_text(&store, "a");
        assert_eq!(store.toggle_pin(a), Some(true));
        assert_eq!(texts(&store.query(None)), ["a", "c", "b"]);
    }

    #[test]
    fn test_display_order_groups_pinned_first_by_descending_timestamp() {
        let mut store = HistoryStore::new();
        for i in 0..8 {
            let id = store.insert_text(format!("t{i}"), at(i)).id();
            if i % 3 == 0 {
                let _ = store.toggle_pin(id);
            }
        }

        let view = store.query(None);
        let first_unpinned = view.iter().position(|e| !e.is_pinned()).unwrap();
        assert!(view[first_unpinned..].iter().all(|e| !e.is_pinned()));
        for group in [&view[..first_unpinned], &view[first_unpinned..]] {
            assert!(group.windows(2).all(|pair| pair[0].timestamp() >= pair[1].timestamp()));
        }
    }

    #[test]
    fn test_scenario_eviction_keeps_pinned() {
        let mut store = HistoryStore::new();
        let _ = store.insert_text("a", at(1));
        let _ = store.insert_text("b", at(2));
        let _ = store.insert_text("c", at(3));
        let a = find_text(&store, "a");
        let _ = store.toggle_pin(a);

        // 23 more fill the unpinned tier: 23 + "c" + "b"
        for i in 0..23 {
            let _ = store.insert_text(format!("more-{i}"), at(10 + i));
        }
        assert_eq!(store.unpinned_count(), 25);
        assert!(store.iter().any(|e| e.as_text() == Some("b")));

        let _ = store.insert_text("more-23", at(40));
        assert_eq!(store.unpinned_count(), 25);
        assert!(store.iter().all(|e| e.as_text() != Some("b")));
        assert!(store.iter().any(|e| e.as_text() == Some("c")));

        let _ = store.insert_text("more-24", at(41));
        assert_eq!(store.unpinned_count(), 25);
        assert!(store.iter().all(|e| e.as_text() != Some("c")));
        assert!(store.get(a).is_some());
        assert!(store.query(None)[0].is_pinned());
    }

    #[test]
    fn test_filter_exempts_images() {
        let mut store = HistoryStore::new();
        let _ = store.insert_text("hello world", at(1));
        let _ = store.insert_text("goodbye", at(2));
        let _ = store.insert_image(png(), "hello", at(3));
        let _ = store.insert_image(png(), "", at(4));

        let view = store.query(Some("HELLO"));
        assert_eq!(texts(&view), ["<image>", "<image>", "hello world"]);

        assert_eq!(store.query(Some("")).len(), 4);
        assert_eq!(store.query(None).len(), 4);
    }

    #[test]
    fn test_resolve_display_index_matches_query() {
        let mut store = HistoryStore::new();
        for (i, text) in ["alpha", "Beta", "gamma", "alphabet", "delta"].iter().enumerate() {
            let id = store.insert_text(*text, at(i64::try_from(i).unwrap())).id();
            if i == 1 {
                let _ = store.toggle_pin(id);
            }
        }
        let _ = store.insert_image(png(), "", at(10));

        for filter in [None, Some("a"), Some("ALPHA"), Some("zzz"), Some("")] {
            let view = store.query(filter);
            for (index, entry) in view.iter().enumerate() {
                let id = store.resolve_display_index(index, filter).unwrap();
                assert_eq!(store.get(id), Some(*entry));
            }
            assert!(store.resolve_display_index(view.len(), filter).is_none());
        }
    }

    #[test]
    fn test_resolve_display_index_differs_from_storage_order() {
        let mut store = HistoryStore::new();
        let a = store.insert_text("a", at(1)).id();
        let _ = store.insert_text("b", at(2));
        let _ = store.toggle_pin(a);
        // storage: [b, a] ; display: [a, b]
        assert_eq!(store.iter().next().and_then(Entry::as_text), Some("b"));
        assert_eq!(store.resolve_display_index(0, None), Some(a));
    }

    #[test]
    fn test_delete() {
        let mut store = HistoryStore::new();
        let a = store.insert_text("needle a", at(1)).id();
        let _ = store.insert_text("needle b", at(2));

        let removed = store.delete(a).unwrap();
        assert_eq!(removed.as_text(), Some("needle a"));
        assert!(store.delete(a).is_none());

        for filter in [None, Some("needle"), Some("a")] {
            assert!(store.query(filter).iter().all(|e| e.id() != a));
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_toggle_pin_unknown_id() {
        let mut store = HistoryStore::new();
        let id = store.insert_text("a", at(1)).id();
        let _ = store.delete(id);
        assert_eq!(store.toggle_pin(id), None);
    }

    #[test]
    fn test_clear_removes_pinned() {
        let mut store = HistoryStore::new();
        let id = store.insert_text("a", at(1)).id();
        let _ = store.toggle_pin(id);
        let _ = store.insert_text("b", at(2));
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_import_export_keeps_storage_order() {
        let snapshots = vec![
            Snapshot { content: Content::Text("pinned".into()), timestamp: at(1), pinned: true },
            Snapshot { content: Content::Text("new".into()), timestamp: at(5), pinned: false },
            Snapshot {
                content: Content::Image { data: png(), ocr_text: "ocr".into() },
                timestamp: at(3),
                pinned: false,
            },
        ];

        let mut store = HistoryStore::new();
        store.import(snapshots.clone());
        assert_eq!(store.export(), snapshots);
        assert_eq!(store.latest_text(), Some("new"));

        let ids = store.iter().map(Entry::id).collect::<std::collections::HashSet<_>>();
        assert_eq!(ids.len(), 3);

        // ids of new entries never collide with imported ones
        let id = store.insert_text("fresh", at(9)).id();
        assert!(!ids.contains(&id));
    }

    #[test]
    fn test_insert_places_new_entry_after_pinned_in_storage() {
        let mut store = HistoryStore::new();
        let a = store.insert_text("a", at(1)).id();
        let _ = store.toggle_pin(a);
        let _ = store.insert_text("b", at(2));
        let storage = store.iter().filter_map(Entry::as_text).collect::<Vec<_>>();
        assert_eq!(storage, ["a", "b"]);
    }
}
