//! Splitting maintenance scripts into statements.
//!
//! The terminator is `;`, but boundaries come from the SQL tokenizer of the
//! store's dialect rather than from a plain character split. A `;` inside a
//! string literal, a quoted identifier, a comment or a dollar-quoted body does
//! not end a statement. Statement text is sliced from the original script, so
//! literals reach the store exactly as written.

use super::config::StoreKind;
use super::error::{MaintenanceError, Result};
use serde::Serialize;
use sqlparser::dialect::{Dialect, PostgreSqlDialect, SQLiteDialect};
use sqlparser::tokenizer::{Token, Tokenizer};

/// One statement of a script. Ordinals are 1-based and follow script order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaintenanceStatement {
    pub ordinal: usize,
    pub text: String,
}

/// Splits `script` into trimmed, non-empty statements.
///
/// Each statement starts at its first significant token, so comments leading
/// a statement are not part of its text. Fragments holding only whitespace or
/// comments are dropped. A script the
/// tokenizer cannot read, e.g. one with an unterminated literal, is rejected
/// as a whole so that no part of it runs.
pub fn split_statements(script: &str, kind: StoreKind) -> Result<Vec<MaintenanceStatement>> {
    let sqlite = SQLiteDialect {};
    let postgres = PostgreSqlDialect {};
    let dialect: &dyn Dialect = match kind {
        StoreKind::Embedded => &sqlite,
        StoreKind::Networked => &postgres,
    };

    let tokens = Tokenizer::new(dialect, script)
        .tokenize_with_location()
        .map_err(|error| MaintenanceError::Script(error.to_string()))?;

    let lines = LineIndex::new(script);
    let mut statements = Vec::new();
    // Byte offset of the first token that is neither whitespace nor a comment.
    let mut first_content: Option<usize> = None;

    for token in &tokens {
        match token.token {
            Token::SemiColon => {
                let end = lines.byte_offset(token.span.start.line, token.span.start.column);
                if let Some(start) = first_content.take() {
                    push_statement(&mut statements, &script[start..end]);
                }
            }
            Token::Whitespace(_) | Token::EOF => {}
            _ => {
                if first_content.is_none() {
                    first_content = Some(lines.byte_offset(token.span.start.line, token.span.start.column));
                }
            }
        }
    }
    if let Some(start) = first_content {
        push_statement(&mut statements, &script[start..]);
    }

    Ok(statements)
}

fn push_statement(statements: &mut Vec<MaintenanceStatement>, fragment: &str) {
    let text = fragment.trim();
    if !text.is_empty() {
        statements.push(MaintenanceStatement {
            ordinal: statements.len() + 1,
            text: text.to_string(),
        });
    }
}

/// Maps the tokenizer's 1-based line/column locations (columns count
/// characters) back to byte offsets.
struct LineIndex<'a> {
    text: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(text: &'a str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(index, _)| index + 1));
        Self { text, starts }
    }

    fn byte_offset(&self, line: u64, column: u64) -> usize {
        let Some(&line_start) = self.starts.get(line.saturating_sub(1) as usize) else {
            return self.text.len();
        };
        self.text[line_start..]
            .char_indices()
            .nth(column.saturating_sub(1) as usize)
            .map(|(index, _)| line_start + index)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(script: &str, kind: StoreKind) -> Vec<String> {
        split_statements(script, kind).unwrap().into_iter().map(|statement| statement.text).collect()
    }

    #[test]
    fn splits_on_terminator_and_trims() {
        assert_eq!(
            texts("ALTER TABLE x ADD COLUMN y;DELETE FROM x WHERE y IS NULL;", StoreKind::Embedded),
            vec!["ALTER TABLE x ADD COLUMN y", "DELETE FROM x WHERE y IS NULL"]
        );
    }

    #[test]
    fn ordinals_follow_script_order() {
        let statements = split_statements("SELECT 1;\n\nSELECT 2;\nSELECT 3", StoreKind::Embedded).unwrap();
        let ordinals: Vec<usize> = statements.iter().map(|statement| statement.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
        assert_eq!(statements[2].text, "SELECT 3");
    }

    #[test]
    fn terminator_inside_literal_does_not_split() {
        assert_eq!(
            texts("INSERT INTO notes (body) VALUES ('a;b'); DELETE FROM notes WHERE body = 'it''s;'", StoreKind::Embedded),
            vec!["INSERT INTO notes (body) VALUES ('a;b')", "DELETE FROM notes WHERE body = 'it''s;'"]
        );
    }

    #[test]
    fn multibyte_text_is_sliced_on_char_boundaries() {
        assert_eq!(
            texts("UPDATE clients SET city = 'Zürich';\nDELETE FROM payments", StoreKind::Embedded),
            vec!["UPDATE clients SET city = 'Zürich'", "DELETE FROM payments"]
        );
    }

    #[test]
    fn comment_only_fragments_are_dropped() {
        assert!(texts("-- nothing to do; really\n;\n  ;  /* still nothing */ ;", StoreKind::Embedded).is_empty());
    }

    #[test]
    fn leading_comments_are_not_part_of_the_statement() {
        let script = "-- purge nulls\nDELETE FROM x WHERE y IS NULL;\n/* header */ -- and more\nUPDATE x SET y = 1 -- trailing\n;";
        assert_eq!(
            texts(script, StoreKind::Embedded),
            vec!["DELETE FROM x WHERE y IS NULL", "UPDATE x SET y = 1 -- trailing"]
        );
    }

    #[test]
    fn empty_script_has_no_statements() {
        assert!(texts("", StoreKind::Embedded).is_empty());
        assert!(texts("  \n\t ", StoreKind::Networked).is_empty());
    }

    #[test]
    fn dollar_quoted_body_is_one_statement() {
        let script = "CREATE FUNCTION one() RETURNS int AS $$ SELECT 1; $$ LANGUAGE sql; SELECT one();";
        assert_eq!(
            texts(script, StoreKind::Networked),
            vec!["CREATE FUNCTION one() RETURNS int AS $$ SELECT 1; $$ LANGUAGE sql", "SELECT one()"]
        );
    }

    #[test]
    fn unterminated_literal_rejects_script() {
        let result = split_statements("DELETE FROM clients WHERE name = 'oops;", StoreKind::Embedded);
        assert!(matches!(result, Err(MaintenanceError::Script(_))));
    }
}
