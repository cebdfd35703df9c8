// Story and comment ids are UUIDv7 generated app-side. Their embedded
// timestamp makes `id DESC` a stable tie-breaker for rows that share a
// `created_at`, so feeds never reorder between reads.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}

/// Parse a path segment as a story/comment id. Malformed ids are treated
/// exactly like ids that do not exist.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuidv7_is_valid() {
        let id = uuidv7();
        assert_eq!(id.get_version(), Some(uuid::Version::SortRand));
    }

    #[test]
    fn later_ids_sort_after_earlier_ones() {
        let a = uuidv7();
        let b = uuidv7();
        assert!(b >= a);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert!(parse_id("not-a-uuid").is_none());
        assert!(parse_id("").is_none());
        let id = uuidv7();
        assert_eq!(parse_id(&id.to_string()), Some(id));
    }
}
