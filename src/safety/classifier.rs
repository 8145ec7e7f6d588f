//! Whole-word keyword matching.

use crate::dialect::DialectProfile;

use super::Classification;

/// Words that mark an explicit transaction boundary.
const TRANSACTION_WORDS: &[&str] = &["BEGIN", "START TRANSACTION", "COMMIT", "ROLLBACK"];

/// Keyword classifier bound to one dialect profile.
#[derive(Debug, Clone, Copy)]
pub struct SqlClassifier {
    keywords: &'static [&'static str],
}

impl SqlClassifier {
    /// Creates a classifier using the profile's destructive keyword set.
    pub fn for_profile(profile: &DialectProfile) -> Self {
        Self {
            keywords: profile.destructive_keywords,
        }
    }

    /// Classifies a SQL string. Pure: the same text always yields the same result.
    pub fn classify(&self, sql: &str) -> Classification {
        let haystack = normalize(sql);
        let matches = self
            .keywords
            .iter()
            .copied()
            .filter(|keyword| contains_word(&haystack, keyword))
            .collect();
        Classification::from_matches(matches)
    }
}

/// Convenience function to classify SQL without creating a classifier instance.
pub fn classify(sql: &str, profile: &DialectProfile) -> Classification {
    SqlClassifier::for_profile(profile).classify(sql)
}

/// Returns true if the statement opens or closes a transaction explicitly.
pub fn has_transaction_boundary(sql: &str) -> bool {
    let haystack = normalize(sql);
    TRANSACTION_WORDS
        .iter()
        .any(|word| contains_word(&haystack, word))
}

/// Upper-cases ASCII and collapses whitespace runs to single spaces, so
/// multi-word phrases match however the statement is laid out.
fn normalize(sql: &str) -> String {
    sql.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}

/// Identifier bytes. Non-ASCII counts as identifier so `UPDATEé` is not `UPDATE`.
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Equivalent to matching `\bWORD\b` against the upper-cased text.
fn contains_word(haystack: &str, word: &str) -> bool {
    let bytes = haystack.as_bytes();
    haystack.match_indices(word).any(|(start, _)| {
        let end = start + word.len();
        let before = start == 0 || !is_word_byte(bytes[start - 1]);
        let after = end == bytes.len() || !is_word_byte(bytes[end]);
        before && after
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MYSQL_FAMILY, POSTGRES};
    use crate::safety::SafetyLevel;

    #[test]
    fn test_classify_select_is_safe() {
        let result = classify("SELECT * FROM users", &MYSQL_FAMILY);
        assert_eq!(result.level, SafetyLevel::Safe);
        assert!(result.keywords.is_empty());
    }

    #[test]
    fn test_classify_every_mysql_keyword() {
        for sql in [
            "INSERT INTO t VALUES (1)",
            "UPDATE t SET a = 1",
            "DELETE FROM t",
            "DROP TABLE t",
            "ALTER TABLE t ADD c INT",
            "TRUNCATE t",
            "REPLACE INTO t VALUES (1)",
            "GRANT SELECT ON db.* TO u",
            "REVOKE SELECT ON db.* FROM u",
        ] {
            assert!(classify(sql, &MYSQL_FAMILY).is_destructive(), "{sql}");
        }
    }

    #[test]
    fn test_postgres_keyword_set_is_narrower() {
        assert!(!classify("GRANT SELECT ON t TO u", &POSTGRES).is_destructive());
        assert!(classify("GRANT SELECT ON t TO u", &MYSQL_FAMILY).is_destructive());
        assert!(classify("truncate t", &POSTGRES).is_destructive());
    }

    #[test]
    fn test_case_insensitive() {
        assert!(classify("drop table t", &POSTGRES).is_destructive());
        assert!(classify("DeLeTe from t", &POSTGRES).is_destructive());
    }

    #[test]
    fn test_whole_word_only() {
        assert!(!classify("SELECT update_count FROM stats", &POSTGRES).is_destructive());
        assert!(!classify("SELECT last_update FROM stats", &MYSQL_FAMILY).is_destructive());
        assert!(!classify("SELECT * FROM dropped_items", &MYSQL_FAMILY).is_destructive());
        assert!(!classify("SELECT replacement FROM t", &MYSQL_FAMILY).is_destructive());
    }

    #[test]
    fn test_surrounding_whitespace_and_punctuation() {
        assert!(classify("  \n\tDROP TABLE t  \n", &POSTGRES).is_destructive());
        assert!(classify("SELECT 1;DELETE FROM t", &POSTGRES).is_destructive());
        assert!(classify("(DELETE FROM t)", &POSTGRES).is_destructive());
    }

    #[test]
    fn test_multi_statement_reports_all_keywords() {
        let result = classify("SELECT 1; DROP TABLE a; INSERT INTO b VALUES (1)", &MYSQL_FAMILY);
        assert_eq!(result.keywords, vec!["INSERT", "DROP"]);
    }

    #[test]
    fn test_literals_and_comments_still_trip() {
        assert!(classify("SELECT 'please drop me'", &POSTGRES).is_destructive());
        assert!(classify("SELECT 1 -- delete later", &POSTGRES).is_destructive());
    }

    #[test]
    fn test_classification_is_idempotent() {
        let classifier = SqlClassifier::for_profile(&MYSQL_FAMILY);
        let sql = "UPDATE t SET a = 1 WHERE id = 2";
        assert_eq!(classifier.classify(sql), classifier.classify(sql));
    }

    #[test]
    fn test_transaction_boundary_detection() {
        assert!(has_transaction_boundary("BEGIN; DELETE FROM t; COMMIT;"));
        assert!(has_transaction_boundary("start\n  transaction; DELETE FROM t"));
        assert!(has_transaction_boundary("DELETE FROM t; rollback"));
        assert!(!has_transaction_boundary("DELETE FROM t"));
        assert!(!has_transaction_boundary("SELECT began_at FROM t"));
    }
}
