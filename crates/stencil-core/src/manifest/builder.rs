//! Build a ProjectManifest from a confirmed answer set

use crate::manifest::schema::{Author, PackageDefaults, ProjectManifest, Repository};
use crate::session::{keys, AnswerSet};

/// Turn confirmed answers into the structured manifest. Pure: no I/O,
/// no re-parsing downstream. The package defaults block comes from the
/// product configuration and is present regardless of user input.
pub fn build_manifest(answers: &AnswerSet, defaults: &PackageDefaults) -> ProjectManifest {
    ProjectManifest {
        name: answers.name_slug().to_string(),
        description: answers.get(keys::DESCRIPTION).map(str::to_string),
        version: answers.get(keys::VERSION).map(str::to_string),
        author: answers.get(keys::AUTHOR).map(Author::parse),
        repository: answers.get(keys::REPOSITORY).map(|url| Repository::Git {
            url: url.to_string(),
        }),
        dependencies: defaults.dependencies.clone(),
        dev_dependencies: defaults.dev_dependencies.clone(),
        scripts: defaults.scripts.clone(),
    }
}
