//! Build version derivation and validation.
//!
//! Every CI run gets a version of the form `0.0.0<ref-suffix>-ci<run>`,
//! where the suffix identifies non-main branches and tags. Release events
//! replace the whole string with the release tag, and manually dispatched
//! runs may carry an explicit override. Whatever the source, the final
//! string must match the release grammar before anything is emitted.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

/// Ref that produces no suffix in default version strings.
const MAIN_REF: &str = "refs/heads/main";
const BRANCH_PREFIX: &str = "refs/heads/";
const TAG_PREFIX: &str = "refs/tags/";

/// Grammar accepted for final version strings: `major.minor.patch` with an
/// optional `-prerelease` suffix limited to `[0-9A-Za-z.-]`.
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+(-[0-9a-zA-Z.-]+)?$").expect("grammar compiles"));

/// Snapshot of the workflow context the resolver consumes.
///
/// Fields are `None` when the variable was unset *or* empty. GitHub passes
/// empty strings for inputs the user left blank, so the two are equivalent.
#[derive(Debug, Clone, Default)]
pub struct CiContext {
    pub event_name: Option<String>,
    pub github_ref: Option<String>,
    pub run_number: Option<String>,
    pub release_version: Option<String>,
    pub dispatch_version: Option<String>,
    pub dispatch_will_publish: Option<String>,
}

/// Outcome of version resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDecision {
    /// Validated version string (leading `v` already stripped).
    pub version: String,
    /// Whether this run publishes a release.
    pub is_release: bool,
}

/// Build the version suffix for a ref.
///
/// `refs/heads/main` yields no suffix. Other refs lose their `refs/heads/`
/// prefix (tags render as `tag-<name>`), have every character outside
/// `[0-9A-Za-z-]` replaced with `-`, and gain a leading `-`.
pub fn ref_suffix(github_ref: &str) -> String {
    if github_ref == MAIN_REF {
        return String::new();
    }

    let name = if let Some(branch) = github_ref.strip_prefix(BRANCH_PREFIX) {
        branch.to_string()
    } else if let Some(tag) = github_ref.strip_prefix(TAG_PREFIX) {
        format!("tag-{}", tag)
    } else {
        github_ref.to_string()
    };

    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();

    format!("-{}", sanitized)
}

/// Default version for a plain CI build: `0.0.0<ref-suffix>-ci<run-number>`.
pub fn default_version(github_ref: &str, run_number: &str) -> String {
    format!("0.0.0{}-ci{}", ref_suffix(github_ref), run_number)
}

/// Check a final version string against the release grammar.
pub fn is_valid_version(version: &str) -> bool {
    VERSION_RE.is_match(version)
}

/// Interpret the boolean-like publish input of a dispatched run.
///
/// Workflow checkbox inputs serialize to the strings `"true"` / `"false"`;
/// only a case-insensitive `"true"` enables publishing, every other value
/// counts as `false`.
pub fn parse_publish_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

/// Resolve the build version and release flag from workflow context.
///
/// Pure: performs no output. Validation problems are collected instead of
/// stopping at the first, so one failed run reports every missing input.
///
/// # Errors
///
/// Returns every accumulated [`ValidationError`]: one `MissingParameter`
/// per absent required input, plus `InvalidVersionFormat` when the final
/// string does not match the release grammar.
pub fn resolve(ctx: &CiContext) -> Result<VersionDecision, Vec<ValidationError>> {
    let mut errors = Vec::new();

    if ctx.event_name.is_none() {
        errors.push(ValidationError::missing("GITHUB_EVENT_NAME"));
    }
    if ctx.github_ref.is_none() {
        errors.push(ValidationError::missing("GITHUB_REF"));
    }
    if ctx.run_number.is_none() {
        errors.push(ValidationError::missing("GITHUB_RUN_NUMBER"));
    }

    let mut version = match (&ctx.github_ref, &ctx.run_number) {
        (Some(github_ref), Some(run_number)) => Some(default_version(github_ref, run_number)),
        _ => None,
    };
    let mut is_release = false;

    // Keep the release-flag rules in sync with the publish job conditions in
    // the workflow definitions.
    match ctx.event_name.as_deref() {
        Some("release") => {
            match &ctx.release_version {
                Some(release_version) => version = Some(release_version.clone()),
                None => errors.push(ValidationError::missing("RELEASE_VERSION")),
            }
            is_release = true;
        }
        Some("workflow_dispatch") => {
            if let Some(dispatch_version) = &ctx.dispatch_version {
                version = Some(dispatch_version.clone());
            }
            match &ctx.dispatch_will_publish {
                Some(flag) => is_release = parse_publish_flag(flag),
                None => {
                    errors.push(ValidationError::missing(
                        "WORKFLOW_DISPATCH_WILL_PUBLISH_PACKAGES",
                    ));
                }
            }
        }
        _ => {}
    }

    // Trim one leading v off the version if present (release tags are
    // usually v-prefixed).
    let version = version.map(|version| match version.strip_prefix('v') {
        Some(stripped) => stripped.to_string(),
        None => version,
    });

    if let Some(version) = &version {
        if !is_valid_version(version) {
            errors.push(ValidationError::InvalidVersionFormat(version.clone()));
        }
    }

    // The version is only absent when a required input error was recorded
    // above, so this always carries at least one error.
    let Some(version) = version else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(VersionDecision { version, is_release })
}
