use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::inheritance::InheritanceMode;
use crate::inheritance::determine_inheritance_mode;

/// The resolved environment allowlist for one command group.
///
/// Constructed once per group per configuration load and never mutated;
/// safe to share read-only across concurrent executions. The effective set
/// is computed eagerly at construction so [`AllowlistResolution::is_allowed`]
/// is a plain set lookup.
///
/// Sets are `BTreeSet`s: the sorted order required for reproducible audit
/// snapshots is structural, not a sort at read time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AllowlistResolution {
    mode: InheritanceMode,
    group_name: String,
    group_set: BTreeSet<String>,
    global_set: BTreeSet<String>,
    effective_set: BTreeSet<String>,
}

impl AllowlistResolution {
    /// Both sets must be supplied, possibly empty. Absence is
    /// unrepresentable here by construction; the configuration-facing entry
    /// point is [`AllowlistResolution::resolve`].
    pub fn new(
        mode: InheritanceMode,
        group_name: impl Into<String>,
        group_set: BTreeSet<String>,
        global_set: BTreeSet<String>,
    ) -> Self {
        let effective_set = match mode {
            InheritanceMode::Inherit => global_set.clone(),
            InheritanceMode::Explicit => group_set.clone(),
            InheritanceMode::Reject => BTreeSet::new(),
        };
        let resolution = Self {
            mode,
            group_name: group_name.into(),
            group_set,
            global_set,
            effective_set,
        };
        tracing::debug!(
            group = %resolution.group_name,
            mode = %resolution.mode,
            effective = resolution.effective_set.len(),
            "resolved environment allowlist"
        );
        resolution
    }

    /// Derives the inheritance mode from the configured shape (via
    /// [`determine_inheritance_mode`]) and builds the resolution. `None`
    /// means the group's allowlist field was absent in configuration.
    pub fn resolve(
        group_name: impl Into<String>,
        group_allowlist: Option<&[String]>,
        global_allowlist: &[String],
    ) -> Self {
        let mode = determine_inheritance_mode(group_allowlist);
        let group_set = group_allowlist
            .unwrap_or_default()
            .iter()
            .cloned()
            .collect();
        let global_set = global_allowlist.iter().cloned().collect();
        Self::new(mode, group_name, group_set, global_set)
    }

    pub fn builder() -> AllowlistResolutionBuilder {
        AllowlistResolutionBuilder::default()
    }

    pub fn mode(&self) -> InheritanceMode {
        self.mode
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// Whether `name` may be forwarded into a child process's environment.
    /// The empty string is never allowed.
    pub fn is_allowed(&self, name: &str) -> bool {
        !name.is_empty() && self.effective_set.contains(name)
    }

    /// Group-level allowlist, sorted lexicographically.
    pub fn group_allowlist(&self) -> Vec<&str> {
        self.group_set.iter().map(String::as_str).collect()
    }

    /// Global allowlist, sorted lexicographically.
    pub fn global_allowlist(&self) -> Vec<&str> {
        self.global_set.iter().map(String::as_str).collect()
    }

    /// The actually-enforced allowlist, sorted lexicographically.
    pub fn effective_list(&self) -> Vec<&str> {
        self.effective_set.iter().map(String::as_str).collect()
    }

    /// Filters an environment map down to the allowed variables.
    pub fn filter_environment(
        &self,
        env: &BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        let filtered: BTreeMap<String, String> = env
            .iter()
            .filter(|(name, _)| self.is_allowed(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        tracing::debug!(
            group = %self.group_name,
            total = env.len(),
            forwarded = filtered.len(),
            "filtered environment variables"
        );
        filtered
    }
}

/// Builder for [`AllowlistResolution`], kept for ergonomic partial setup in
/// tests. Production code goes through [`AllowlistResolution::resolve`].
///
/// `build` panics when the mode or either set was never supplied: an
/// incomplete resolution is a programming defect, and a quiet fallback here
/// would silently widen the trust boundary.
#[derive(Debug, Default)]
pub struct AllowlistResolutionBuilder {
    mode: Option<InheritanceMode>,
    group_name: String,
    group_set: Option<BTreeSet<String>>,
    global_set: Option<BTreeSet<String>>,
}

impl AllowlistResolutionBuilder {
    pub fn mode(mut self, mode: InheritanceMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn group_name(mut self, name: impl Into<String>) -> Self {
        self.group_name = name.into();
        self
    }

    pub fn group_allowlist<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_set = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn global_allowlist<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.global_set = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// # Panics
    ///
    /// Panics when the mode, group allowlist, or global allowlist was never
    /// supplied.
    pub fn build(self) -> AllowlistResolution {
        let Some(mode) = self.mode else {
            panic!("AllowlistResolutionBuilder: mode was never supplied");
        };
        let Some(group_set) = self.group_set else {
            panic!("AllowlistResolutionBuilder: group allowlist was never supplied");
        };
        let Some(global_set) = self.global_set else {
            panic!("AllowlistResolutionBuilder: global allowlist was never supplied");
        };
        AllowlistResolution::new(mode, self.group_name, group_set, global_set)
    }
}
