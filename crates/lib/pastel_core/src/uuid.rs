// Account ids generated app-side.
//
// The Postgres store lets the database assign ids (gen_random_uuid, v4).
// Stores without a database default, like the in-memory store, use UUIDv7
// so that ids still sort by creation time.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}

/// Parse an account id from its textual form (e.g. a JWT `sub` claim).
pub fn parse_account_id(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_v7_and_ordered() {
        let ids: Vec<Uuid> = (0..32).map(|_| uuidv7()).collect();
        assert!(ids.iter().all(|id| id.get_version_num() == 7));
        assert!(ids.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn account_id_parsing() {
        let id = uuidv7();
        assert_eq!(parse_account_id(&id.to_string()), Some(id));
        assert_eq!(parse_account_id(&id.hyphenated().to_string().to_uppercase()), Some(id));
        assert_eq!(parse_account_id("not-a-uuid"), None);
        assert_eq!(parse_account_id(""), None);
    }
}
