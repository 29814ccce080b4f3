//! A single in-memory table with secondary indexes.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use clerk_mirror_core::error::{MirrorError, MirrorResult};
use clerk_mirror_core::schema::{IndexDefinition, TableDefinition};

/// Separator between the fields of a composite index key.
const KEY_SEPARATOR: char = '\u{1f}';

/// Builds a composite index key.
pub(crate) fn compose(parts: &[&str]) -> String {
    let mut key = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            key.push(KEY_SEPARATOR);
        }
        key.push_str(part);
    }
    key
}

/// A record that can be stored in a [`Table`].
pub(crate) trait Indexed: Clone {
    /// Entity name used in error messages.
    const ENTITY: &'static str;

    /// The local id.
    fn id(&self) -> &str;

    /// The key of this record in the named index, or `None` if the record
    /// does not appear in that index.
    fn index_key(&self, index: &str) -> Option<String>;
}

/// Index entries: key -> (insertion sequence, record id).
type IndexMap = BTreeMap<String, BTreeSet<(u64, String)>>;

/// Rows keyed by local id plus one ordered map per declared index.
#[derive(Debug)]
pub(crate) struct Table<T> {
    definition: TableDefinition,
    rows: HashMap<String, (u64, T)>,
    indexes: HashMap<String, IndexMap>,
    next_seq: u64,
}

impl<T: Indexed> Table<T> {
    /// Creates an empty table with the indexes from its definition.
    pub(crate) fn new(definition: TableDefinition) -> Self {
        let indexes = definition
            .indexes
            .iter()
            .map(|index| (index.name.clone(), IndexMap::new()))
            .collect();
        Self {
            definition,
            rows: HashMap::new(),
            indexes,
            next_seq: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn clear(&mut self) {
        self.rows.clear();
        for entries in self.indexes.values_mut() {
            entries.clear();
        }
    }

    pub(crate) fn get(&self, id: &str) -> Option<T> {
        self.rows.get(id).map(|(_, row)| row.clone())
    }

    /// Returns every row in insertion order.
    pub(crate) fn all(&self) -> Vec<T> {
        let mut rows: Vec<&(u64, T)> = self.rows.values().collect();
        rows.sort_by_key(|(seq, _)| *seq);
        rows.into_iter().map(|(_, row)| row.clone()).collect()
    }

    /// Returns the first row inserted under `key`.
    pub(crate) fn find_one(&self, index: &str, key: &str) -> Option<T> {
        self.entries(index, key)
            .and_then(|entries| entries.iter().next())
            .and_then(|(_, id)| self.get(id))
    }

    /// Returns every row under `key` in insertion order.
    pub(crate) fn find_all(&self, index: &str, key: &str) -> Vec<T> {
        self.entries(index, key)
            .map(|entries| entries.iter().filter_map(|(_, id)| self.get(id)).collect())
            .unwrap_or_default()
    }

    /// Returns up to `limit` rows under `key`, most recently inserted first.
    pub(crate) fn newest(&self, index: &str, key: &str, limit: usize) -> Vec<T> {
        self.entries(index, key)
            .map(|entries| {
                entries
                    .iter()
                    .rev()
                    .take(limit)
                    .filter_map(|(_, id)| self.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns up to `limit` rows ordered by descending index key.
    pub(crate) fn descending(&self, index: &str, limit: usize) -> Vec<T> {
        let Some(entries) = self.indexes.get(index) else {
            return Vec::new();
        };
        entries
            .values()
            .rev()
            .flat_map(|ids| ids.iter().rev())
            .take(limit)
            .filter_map(|(_, id)| self.get(id))
            .collect()
    }

    pub(crate) fn insert(&mut self, row: &T) -> MirrorResult<T> {
        if self.rows.contains_key(row.id()) {
            return Err(MirrorError::duplicate(T::ENTITY, "id", row.id()));
        }
        self.check_unique(row)?;

        let seq = self.next_seq;
        self.next_seq += 1;
        self.index(row, seq);
        self.rows.insert(row.id().to_string(), (seq, row.clone()));
        Ok(row.clone())
    }

    pub(crate) fn update(&mut self, row: &T) -> MirrorResult<T> {
        let Some((seq, previous)) = self.rows.get(row.id()).cloned() else {
            return Err(MirrorError::not_found(T::ENTITY, "id", row.id()));
        };
        self.check_unique(row)?;

        self.unindex(&previous, seq);
        self.index(row, seq);
        self.rows.insert(row.id().to_string(), (seq, row.clone()));
        Ok(row.clone())
    }

    pub(crate) fn delete(&mut self, id: &str) -> MirrorResult<()> {
        let Some((seq, previous)) = self.rows.remove(id) else {
            return Err(MirrorError::not_found(T::ENTITY, "id", id));
        };
        self.unindex(&previous, seq);
        Ok(())
    }

    fn entries(&self, index: &str, key: &str) -> Option<&BTreeSet<(u64, String)>> {
        self.indexes.get(index).and_then(|entries| entries.get(key))
    }

    /// Fails if another row already holds one of this row's unique keys.
    fn check_unique(&self, row: &T) -> MirrorResult<()> {
        for IndexDefinition { name, fields, .. } in
            self.definition.indexes.iter().filter(|index| index.unique)
        {
            let Some(key) = row.index_key(name) else {
                continue;
            };
            let taken = self
                .entries(name, &key)
                .is_some_and(|entries| entries.iter().any(|(_, id)| id != row.id()));
            if taken {
                return Err(MirrorError::duplicate(
                    T::ENTITY,
                    fields.join("+"),
                    key.replace(KEY_SEPARATOR, "+"),
                ));
            }
        }
        Ok(())
    }

    fn index(&mut self, row: &T, seq: u64) {
        for (name, entries) in self.indexes.iter_mut() {
            if let Some(key) = row.index_key(name) {
                entries
                    .entry(key)
                    .or_default()
                    .insert((seq, row.id().to_string()));
            }
        }
    }

    fn unindex(&mut self, row: &T, seq: u64) {
        for (name, entries) in self.indexes.iter_mut() {
            let Some(key) = row.index_key(name) else {
                continue;
            };
            if let Some(ids) = entries.get_mut(&key) {
                ids.remove(&(seq, row.id().to_string()));
                if ids.is_empty() {
                    entries.remove(&key);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        code: String,
        group: String,
    }

    impl Indexed for Row {
        const ENTITY: &'static str = "row";

        fn id(&self) -> &str {
            &self.id
        }

        fn index_key(&self, index: &str) -> Option<String> {
            match index {
                "byCode" => Some(self.code.clone()),
                "byGroup" => Some(self.group.clone()),
                _ => None,
            }
        }
    }

    fn row(id: &str, code: &str, group: &str) -> Row {
        Row {
            id: id.to_string(),
            code: code.to_string(),
            group: group.to_string(),
        }
    }

    fn table() -> Table<Row> {
        Table::new(
            TableDefinition::new("rows")
                .index(IndexDefinition::unique("byCode", &["code"]))
                .index(IndexDefinition::new("byGroup", &["group"])),
        )
    }

    #[test]
    fn test_unique_index_rejects_duplicates() {
        let mut table = table();
        table.insert(&row("1", "a", "g")).unwrap();
        let err = table.insert(&row("2", "a", "g")).unwrap_err();
        assert!(matches!(err, MirrorError::Duplicate { .. }));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_update_moves_index_entries() {
        let mut table = table();
        table.insert(&row("1", "a", "g1")).unwrap();
        table.update(&row("1", "b", "g2")).unwrap();

        assert!(table.find_one("byCode", "a").is_none());
        assert_eq!(table.find_one("byCode", "b").unwrap().id, "1");
        assert!(table.find_all("byGroup", "g1").is_empty());
        assert_eq!(table.find_all("byGroup", "g2").len(), 1);
    }

    #[test]
    fn test_update_may_keep_its_own_unique_key() {
        let mut table = table();
        table.insert(&row("1", "a", "g1")).unwrap();
        assert!(table.update(&row("1", "a", "g2")).is_ok());
    }

    #[test]
    fn test_newest_and_descending_order() {
        let mut table = table();
        table.insert(&row("1", "c", "g")).unwrap();
        table.insert(&row("2", "a", "g")).unwrap();
        table.insert(&row("3", "b", "g")).unwrap();

        let newest: Vec<String> = table.newest("byGroup", "g", 2).into_iter().map(|r| r.id).collect();
        assert_eq!(newest, vec!["3", "2"]);

        let by_code: Vec<String> = table.descending("byCode", 10).into_iter().map(|r| r.id).collect();
        assert_eq!(by_code, vec!["1", "3", "2"]);
    }

    #[test]
    fn test_delete_missing_row() {
        let mut table = table();
        assert!(matches!(table.delete("nope"), Err(MirrorError::NotFound { .. })));
    }

    #[test]
    fn test_compose() {
        assert_eq!(compose(&["a", "b"]), "a\u{1f}b");
        assert_eq!(compose(&["only"]), "only");
    }
}
