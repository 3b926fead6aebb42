use crate::changelog::sections::ChangelogSection;
use crate::version::Version;
use jiff::civil::Date;
use regex::Regex;
use std::sync::LazyLock;

static CONVENTIONAL_SUBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>[A-Za-z]+)(?:\((?P<scope>[^()]+)\))?(?P<breaking>!)?:[ \t]+(?P<desc>\S.*)$")
        .expect("conventional commit pattern is valid")
});

/// A commit subject parsed according to the conventional commits grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalCommit {
    pub commit_type: String,
    pub scope: Option<String>,
    pub breaking: bool,
    pub description: String,
}

/// Parses `type(scope)!: description`. Returns `None` for free-form subjects.
pub fn parse_conventional_commit(subject: &str) -> Option<ConventionalCommit> {
    let captures = CONVENTIONAL_SUBJECT.captures(subject.trim())?;

    Some(ConventionalCommit {
        commit_type: captures["type"].to_lowercase(),
        scope: captures.name("scope").map(|m| m.as_str().trim().to_string()),
        breaking: captures.name("breaking").is_some(),
        description: captures["desc"].trim_end().to_string(),
    })
}

/// Renders the NEWS entry for one release.
///
/// Breaking changes are listed first, then every visible section that has at
/// least one commit, in table order. Hidden and unknown types are dropped.
pub fn render_entry(
    version: &Version,
    date: Date,
    commits: &[ConventionalCommit],
    sections: &[ChangelogSection],
) -> String {
    let mut entry = format!("## {} ({})", version, date.strftime("%Y-%m-%d"));

    let breaking: Vec<&ConventionalCommit> = commits.iter().filter(|c| c.breaking).collect();
    if !breaking.is_empty() {
        push_section(&mut entry, "⚠ BREAKING CHANGES", &breaking);
    }

    for section in sections.iter().filter(|s| !s.hidden) {
        let listed: Vec<&ConventionalCommit> = commits
            .iter()
            .filter(|c| c.commit_type == section.commit_type)
            .collect();

        if !listed.is_empty() {
            push_section(&mut entry, &section.section, &listed);
        }
    }

    entry
}

fn push_section(entry: &mut String, heading: &str, commits: &[&ConventionalCommit]) {
    entry.push_str(&format!("\n\n### {heading}\n"));
    for commit in commits {
        match &commit.scope {
            Some(scope) => entry.push_str(&format!("\n* **{scope}:** {}", commit.description)),
            None => entry.push_str(&format!("\n* {}", commit.description)),
        }
    }
}
