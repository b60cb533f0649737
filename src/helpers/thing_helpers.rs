use surrealdb::sql::Thing;

/// Extracts the bare id part from either a `table:id` pair or a bare id.
pub fn parse_id_part(id: &str) -> &str {
    if let Some(id_part) = id.split(':').nth(1) {
        id_part
    } else {
        id
    }
}

pub fn create_user_thing(user_id: &str) -> Thing {
    let clean_id = parse_id_part(user_id);
    Thing::from(("user".to_string(), clean_id.to_string()))
}

pub fn create_song_thing(song_id: &str) -> Thing {
    let clean_id = parse_id_part(song_id);
    Thing::from(("song".to_string(), clean_id.to_string()))
}

pub fn thing_to_string(thing: &Thing) -> String {
    format!("{}:{}", thing.tb, thing.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_part() {
        assert_eq!(parse_id_part("user:123"), "123");
        assert_eq!(parse_id_part("123"), "123");
        assert_eq!(parse_id_part("song:abc_def"), "abc_def");
    }

    #[test]
    fn test_create_things() {
        let user_thing = create_user_thing("user:12");
        assert_eq!(user_thing.tb, "user");
        assert_eq!(user_thing.id.to_string(), "⟨12⟩");

        let song_thing = create_song_thing("song:56");
        assert_eq!(song_thing.tb, "song");
        assert_eq!(song_thing.id.to_string(), "⟨56⟩");
    }

    #[test]
    fn test_thing_round_trip() {
        let thing = create_song_thing("56");
        let s = thing_to_string(&thing);
        assert_eq!(parse_id_part(&s), "⟨56⟩");
    }
}
