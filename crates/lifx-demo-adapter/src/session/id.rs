/*
[INPUT]:  Current time and a random source
[OUTPUT]: Session id strings in the format the backend expects
[POS]:    Session layer - id generation
[UPDATE]: When the session id format changes
*/

use chrono::Utc;
use rand::Rng;

const SESSION_PREFIX: &str = "session";
const SEGMENT_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `session_<unix-millis>_<random>`
pub fn generate_session_id() -> String {
    format!(
        "{SESSION_PREFIX}_{}_{}",
        Utc::now().timestamp_millis(),
        random_segment()
    )
}

/// `session_<unix-millis>_<random>_<random>`, used after a forced reset so
/// the server cannot confuse it with an id from the same millisecond
pub fn generate_fresh_session_id() -> String {
    format!(
        "{SESSION_PREFIX}_{}_{}_{}",
        Utc::now().timestamp_millis(),
        random_segment(),
        random_segment()
    )
}

fn random_segment() -> String {
    let mut rng = rand::thread_rng();
    (0..SEGMENT_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_segment(s: &str) -> bool {
        s.len() == SEGMENT_LEN && s.bytes().all(|b| BASE36.contains(&b))
    }

    #[test]
    fn test_session_id_shape() {
        let id = generate_session_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert!(parts[1].parse::<i64>().is_ok());
        assert!(is_segment(parts[2]));
    }

    #[test]
    fn test_fresh_session_id_has_two_segments() {
        let id = generate_fresh_session_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 4);
        assert!(is_segment(parts[2]));
        assert!(is_segment(parts[3]));
    }
}
