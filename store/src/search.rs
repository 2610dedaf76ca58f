use crate::types::Category;
use crate::types::Command;
use std::collections::BTreeSet;

/// Rank `commands` against `query`.
///
/// Scores combine token overlap (content, alias, category name) with
/// substring hits on the alias and content. Ties keep store order. A blank
/// query returns everything.
pub fn search<'a>(
    commands: &'a [Command],
    categories: &[Category],
    query: &str,
) -> Vec<&'a Command> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return commands.iter().collect();
    }
    let tokens = tokenize(&needle);
    let mut scored: Vec<(f32, &Command)> = commands
        .iter()
        .filter_map(|cmd| {
            let category_name = categories
                .iter()
                .find(|c| c.id == cmd.category)
                .map(|c| c.name.as_str())
                .unwrap_or("");
            let haystack = format!("{} {} {}", cmd.content, cmd.alias, category_name);
            let mut score = overlap_score(&tokens, &tokenize(&haystack));
            let alias = cmd.alias.to_lowercase();
            if !alias.is_empty() {
                if alias == needle {
                    score += 1.0;
                } else if alias.contains(&needle) {
                    score += 0.5;
                }
            }
            if cmd.content.to_lowercase().contains(&needle) {
                score += 0.25;
            }
            (score > 0.0).then_some((score, cmd))
        })
        .collect();
    // stable: equal scores stay newest-first
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().map(|(_, cmd)| cmd).collect()
}

fn tokenize(s: &str) -> BTreeSet<String> {
    let mut set = BTreeSet::new();
    for w in s.split(|c: char| !c.is_alphanumeric()) {
        if w.is_empty() {
            continue;
        }
        set.insert(w.to_lowercase());
    }
    set
}

fn overlap_score(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let inter = a.intersection(b).count() as f32;
    inter / a.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    fn cmd(id: &str, content: &str, category: &str, alias: &str) -> Command {
        Command {
            id: id.to_string(),
            content: content.to_string(),
            category: category.to_string(),
            alias: alias.to_string(),
            created_at: DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z").unwrap(),
        }
    }

    fn ids(found: Vec<&Command>) -> Vec<&str> {
        found.into_iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn alias_match_ranks_first() {
        let commands = vec![
            cmd("1", "git status --short", "", ""),
            cmd("2", "echo gs", "", ""),
            cmd("3", "git stash", "", "gs"),
        ];
        assert_eq!(ids(search(&commands, &[], "gs")), vec!["3", "2"]);
    }

    #[test]
    fn category_name_is_searchable() {
        let categories = vec![Category {
            id: "c1".to_string(),
            name: "Docker".to_string(),
            color: String::new(),
            created_at: DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z").unwrap(),
        }];
        let commands = vec![cmd("1", "ps aux", "", ""), cmd("2", "compose up -d", "c1", "")];
        assert_eq!(ids(search(&commands, &categories, "docker")), vec!["2"]);
    }

    #[test]
    fn partial_words_match_by_substring() {
        let commands = vec![cmd("1", "kubectl get pods", "", ""), cmd("2", "ls", "", "")];
        assert_eq!(ids(search(&commands, &[], "kubect")), vec!["1"]);
    }

    #[test]
    fn blank_query_returns_all_in_order() {
        let commands = vec![cmd("1", "a", "", ""), cmd("2", "b", "", "")];
        assert_eq!(ids(search(&commands, &[], "   ")), vec!["1", "2"]);
    }
}
