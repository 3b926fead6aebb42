use crate::changelog::{ChangelogSection, default_sections};
use crate::config::StrategyOptions;
use crate::error::Result;
use crate::repository::RepositoryClient;
use crate::strategy::{BuildUpdatesOptions, ReleaseStrategy};
use crate::update::Update;
use crate::updaters::{DescriptionUpdater, News};
use crate::version::Version;
use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};

pub const DEFAULT_CHANGELOG_PATH: &str = "NEWS.md";
pub const DESCRIPTION_FILE: &str = "DESCRIPTION";

static PACKAGE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^Package:[ \t]*(\S.*?)\s*$").expect("package pattern is valid")
});

/// Release strategy for R packages.
///
/// Releases update `NEWS.md` (created on the first release) and the
/// `Version:` field of `DESCRIPTION` (never created).
pub struct RStrategy {
    options: StrategyOptions,
    changelog_path: String,
    changelog_sections: Vec<ChangelogSection>,
    client: Arc<dyn RepositoryClient>,
}

impl RStrategy {
    pub fn new(options: StrategyOptions, client: Arc<dyn RepositoryClient>) -> Self {
        let changelog_path = options
            .changelog_path
            .clone()
            .unwrap_or_else(|| DEFAULT_CHANGELOG_PATH.to_string());
        let changelog_sections = options
            .changelog_sections
            .clone()
            .unwrap_or_else(default_sections);

        Self {
            options,
            changelog_path,
            changelog_sections,
            client,
        }
    }

    pub fn changelog_path(&self) -> &str {
        &self.changelog_path
    }

    pub fn changelog_sections(&self) -> &[ChangelogSection] {
        &self.changelog_sections
    }

    pub fn target_branch(&self) -> &str {
        &self.options.target_branch
    }

    pub fn build_updates(&self, options: &BuildUpdatesOptions) -> Vec<Update> {
        let version = options.new_version.clone();

        vec![
            Update::new(
                self.options.add_path(&self.changelog_path),
                true,
                News::new(version.clone(), options.changelog_entry.clone()),
            ),
            Update::new(
                self.options.add_path(DESCRIPTION_FILE),
                false,
                DescriptionUpdater::new(version),
            ),
        ]
    }

    /// Reads `Package:` from `DESCRIPTION` on the target branch.
    ///
    /// A missing file or a file without the field yields `Ok(None)`; any other
    /// repository failure is returned as-is.
    pub async fn package_name_from_description(&self) -> Result<Option<String>> {
        let path = self.options.add_path(DESCRIPTION_FILE);

        let contents = match self
            .client
            .file_contents_on_branch(&path, &self.options.target_branch)
            .await
        {
            Ok(contents) => contents,
            Err(e) if e.is_not_found() => {
                if std::env::var(crate::VERBOSE_ENV).is_ok() {
                    eprintln!("[VERBOSE] {e}");
                }
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        Ok(extract_package_name(&contents.parsed_content))
    }

    pub fn initial_release_version(&self) -> Version {
        Version::new(0, 1, 0)
    }
}

#[async_trait]
impl ReleaseStrategy for RStrategy {
    fn build_updates(&self, options: &BuildUpdatesOptions) -> Vec<Update> {
        RStrategy::build_updates(self, options)
    }

    fn initial_release_version(&self) -> Version {
        RStrategy::initial_release_version(self)
    }

    async fn package_name(&self) -> Result<Option<String>> {
        self.package_name_from_description().await
    }
}

/// First `Package:` value in a DESCRIPTION file.
fn extract_package_name(description: &str) -> Option<String> {
    PACKAGE_FIELD
        .captures(description)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;
    use crate::repository::FileContents;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory repository keyed by `(branch, path)`.
    #[derive(Default)]
    struct MockRepository {
        files: HashMap<(String, String), String>,
        failure: Option<fn() -> ReleaseError>,
        requests: Mutex<Vec<(String, String)>>,
    }

    impl MockRepository {
        fn with_file(branch: &str, path: &str, content: &str) -> Self {
            let mut repo = Self::default();
            repo.files
                .insert((branch.to_string(), path.to_string()), content.to_string());
            repo
        }

        fn failing(failure: fn() -> ReleaseError) -> Self {
            Self {
                failure: Some(failure),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl RepositoryClient for MockRepository {
        async fn file_contents_on_branch(&self, path: &str, branch: &str) -> Result<FileContents> {
            self.requests
                .lock()
                .unwrap()
                .push((path.to_string(), branch.to_string()));

            if let Some(failure) = self.failure {
                return Err(failure());
            }

            match self.files.get(&(branch.to_string(), path.to_string())) {
                Some(content) => Ok(FileContents {
                    sha: "abc123".to_string(),
                    content: content.clone(),
                    parsed_content: content.clone(),
                }),
                None => Err(ReleaseError::FileNotFound {
                    path: path.to_string(),
                    branch: branch.to_string(),
                }),
            }
        }
    }

    fn strategy(options: StrategyOptions, repo: MockRepository) -> RStrategy {
        RStrategy::new(options, Arc::new(repo))
    }

    fn release(version: &str, entry: &str) -> BuildUpdatesOptions {
        BuildUpdatesOptions {
            new_version: Version::parse(version).unwrap(),
            changelog_entry: entry.to_string(),
        }
    }

    #[test]
    fn builds_news_then_description() {
        let strategy = strategy(StrategyOptions::default(), MockRepository::default());
        let updates = strategy.build_updates(&release("1.2.3", "## 1.2.3\n\n* fix"));

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].path, "NEWS.md");
        assert!(updates[0].create_if_missing);
        assert_eq!(updates[0].updater.name(), "news");
        assert_eq!(updates[1].path, "DESCRIPTION");
        assert!(!updates[1].create_if_missing);
        assert_eq!(updates[1].updater.name(), "description");
    }

    #[test]
    fn updaters_are_bound_to_release_facts() {
        let strategy = strategy(StrategyOptions::default(), MockRepository::default());
        let updates = strategy.build_updates(&release("2.0.0", "## 2.0.0\n\n* big"));

        let news = updates[0].updater.update_content(None).unwrap();
        assert_eq!(news, "## 2.0.0\n\n* big\n");

        let description = updates[1]
            .updater
            .update_content(Some("Package: libfoo\nVersion: 1.9.0\n"))
            .unwrap();
        assert_eq!(description, "Package: libfoo\nVersion: 2.0.0\n");
    }

    #[test]
    fn nested_package_paths_prefix_every_update() {
        let options = StrategyOptions {
            path: Some("packages/foo".to_string()),
            ..StrategyOptions::default()
        };
        let strategy = strategy(options, MockRepository::default());
        let updates = strategy.build_updates(&release("0.2.0", "## 0.2.0"));

        assert_eq!(updates[0].path, "packages/foo/NEWS.md");
        assert_eq!(updates[1].path, "packages/foo/DESCRIPTION");
    }

    #[test]
    fn custom_changelog_path_overrides_default() {
        let options = StrategyOptions {
            changelog_path: Some("CHANGELOG.md".to_string()),
            ..StrategyOptions::default()
        };
        let strategy = strategy(options, MockRepository::default());
        let updates = strategy.build_updates(&release("0.2.0", "## 0.2.0"));

        assert_eq!(strategy.changelog_path(), "CHANGELOG.md");
        assert_eq!(updates[0].path, "CHANGELOG.md");
        assert_eq!(strategy.changelog_sections(), default_sections().as_slice());
    }

    #[test]
    fn custom_sections_replace_default_table() {
        let custom = vec![ChangelogSection::new("feat", "New")];
        let options = StrategyOptions {
            changelog_sections: Some(custom.clone()),
            ..StrategyOptions::default()
        };
        let strategy = strategy(options, MockRepository::default());

        assert_eq!(strategy.changelog_sections(), custom.as_slice());
        assert_eq!(strategy.changelog_path(), DEFAULT_CHANGELOG_PATH);
    }

    #[test]
    fn empty_custom_sections_are_kept_verbatim() {
        let options = StrategyOptions {
            changelog_sections: Some(Vec::new()),
            ..StrategyOptions::default()
        };
        let strategy = strategy(options, MockRepository::default());
        assert!(strategy.changelog_sections().is_empty());
    }

    #[test]
    fn initial_release_is_zero_one_zero() {
        let strategy = strategy(StrategyOptions::default(), MockRepository::default());
        assert_eq!(strategy.initial_release_version().to_string(), "0.1.0");
    }

    #[tokio::test]
    async fn reads_package_name_from_description() {
        let repo = MockRepository::with_file("main", "DESCRIPTION", "Package: libfoo\nVersion: 0.1.0\n");
        let strategy = strategy(StrategyOptions::default(), repo);
        assert_eq!(
            strategy.package_name_from_description().await.unwrap(),
            Some("libfoo".to_string())
        );
    }

    #[tokio::test]
    async fn strips_trailing_whitespace_from_package_name() {
        let repo = MockRepository::with_file("main", "DESCRIPTION", "Package: libfoo \nVersion: 0.1.0\n");
        let strategy = strategy(StrategyOptions::default(), repo);
        assert_eq!(
            strategy.package_name_from_description().await.unwrap(),
            Some("libfoo".to_string())
        );
    }

    #[tokio::test]
    async fn missing_description_is_absent() {
        let strategy = strategy(StrategyOptions::default(), MockRepository::default());
        assert_eq!(strategy.package_name_from_description().await.unwrap(), None);
    }

    #[tokio::test]
    async fn description_without_package_field_is_absent() {
        let repo = MockRepository::with_file("main", "DESCRIPTION", "Title: Foo\nVersion: 0.1.0\n");
        let strategy = strategy(StrategyOptions::default(), repo);
        assert_eq!(strategy.package_name_from_description().await.unwrap(), None);
    }

    #[tokio::test]
    async fn authorization_failures_propagate() {
        let repo = MockRepository::failing(|| ReleaseError::Unauthorized("bad token".to_string()));
        let strategy = strategy(StrategyOptions::default(), repo);
        let err = strategy.package_name_from_description().await.unwrap_err();
        assert!(matches!(err, ReleaseError::Unauthorized(message) if message == "bad token"));
    }

    #[tokio::test]
    async fn reads_description_under_package_path_on_target_branch() {
        let repo = MockRepository::with_file(
            "release",
            "packages/foo/DESCRIPTION",
            "Package: foo\n",
        );
        let options = StrategyOptions {
            path: Some("packages/foo".to_string()),
            target_branch: "release".to_string(),
            ..StrategyOptions::default()
        };
        let strategy = RStrategy::new(options, Arc::new(repo));

        assert_eq!(strategy.target_branch(), "release");
        assert_eq!(
            strategy.package_name_from_description().await.unwrap(),
            Some("foo".to_string())
        );
    }

    #[tokio::test]
    async fn requests_description_once_with_composed_path() {
        let repo = Arc::new(MockRepository::default());
        let options = StrategyOptions {
            path: Some("pkg".to_string()),
            ..StrategyOptions::default()
        };
        let strategy = RStrategy::new(options, repo.clone());
        strategy.package_name_from_description().await.unwrap();

        let requests = repo.requests.lock().unwrap();
        assert_eq!(
            *requests,
            vec![("pkg/DESCRIPTION".to_string(), "main".to_string())]
        );
    }

    #[test]
    fn first_package_field_wins() {
        assert_eq!(
            extract_package_name("Package: first\nPackage: second\n"),
            Some("first".to_string())
        );
    }

    #[test]
    fn package_field_must_start_the_line() {
        assert_eq!(extract_package_name("Title: Package: nope\n"), None);
        assert_eq!(extract_package_name("Package:   \nVersion: 1.0.0\n"), None);
    }

    #[test]
    fn package_field_tolerates_crlf_and_missing_space() {
        assert_eq!(
            extract_package_name("Package:libfoo\r\nVersion: 1.0.0\r\n"),
            Some("libfoo".to_string())
        );
        assert_eq!(
            extract_package_name("Package: libfoo\u{a0}\u{0c}\nVersion: 1.0.0\n"),
            Some("libfoo".to_string())
        );
    }
}
