use uuid::Uuid;

/// Deterministic UUIDv5 for an external document id.
///
/// Vector stores that only accept UUID keys use this, so re-indexing the
/// same id always lands on the same point.
pub fn stable_uuid(id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, id.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_id_same_uuid() {
        assert_eq!(stable_uuid("auth_doc_1"), stable_uuid("auth_doc_1"));
        assert_ne!(stable_uuid("auth_doc_1"), stable_uuid("auth_doc_2"));
        assert_eq!(stable_uuid("x").get_version_num(), 5);
    }
}
