use std::sync::LazyLock;

use regex::Regex;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?").expect("placeholder pattern is valid"));

/// Collapse whitespace and rewrite `?` placeholders into Postgres `$n` form.
pub fn sql(query: &str) -> String {
    let cleaned = query.split_whitespace().collect::<Vec<&str>>().join(" ");
    let mut param_index = 0;
    PLACEHOLDER
        .replace_all(&cleaned, |_: &regex::Captures| {
            param_index += 1;
            format!("${}", param_index)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sql_numbers_placeholders_in_order() {
        let query = sql(r#"
            UPDATE team_members
            SET status = ?, joined_at = ?
            WHERE id = ?
        "#);

        assert_eq!(
            query,
            "UPDATE team_members SET status = $1, joined_at = $2 WHERE id = $3"
        );
    }

    #[test]
    fn test_sql_without_placeholders() {
        assert_eq!(sql("SELECT 1"), "SELECT 1");
    }
}
