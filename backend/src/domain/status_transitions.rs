//! Report status transition table.
//!
//! Legal moves between [`ReportStatus`] values are held as data so that
//! tightening the lifecycle never needs new code. The default table lets any
//! status move to any status, itself included.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use super::{DomainError, ReportStatus, ValidationReason};

/// Mapping from a current status to the statuses it may move to.
///
/// # Examples
/// ```
/// use civic_backend::domain::{ReportStatus, StatusTransitions};
///
/// let any = StatusTransitions::default();
/// assert!(any.allows(ReportStatus::Resolved, ReportStatus::Draft));
///
/// let forward = StatusTransitions::forward_only();
/// assert!(!forward.allows(ReportStatus::Resolved, ReportStatus::Submitted));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransitions {
    edges: BTreeMap<ReportStatus, BTreeSet<ReportStatus>>,
}

impl StatusTransitions {
    /// Every status may move to every status.
    #[must_use]
    pub fn permissive() -> Self {
        Self::from_edges(
            ReportStatus::ALL
                .into_iter()
                .flat_map(|from| ReportStatus::ALL.into_iter().map(move |to| (from, to))),
        )
    }

    /// Reports only move forward through review; `Resolved` and `Dismissed`
    /// are terminal.
    #[must_use]
    pub fn forward_only() -> Self {
        use ReportStatus::{Dismissed, Draft, Resolved, Submitted, UnderInvestigation};

        Self::from_edges([
            (Draft, Submitted),
            (Submitted, UnderInvestigation),
            (Submitted, Dismissed),
            (UnderInvestigation, Resolved),
            (UnderInvestigation, Dismissed),
        ])
    }

    /// Build a table from explicit `(current, requested)` edges.
    #[must_use]
    pub fn from_edges(edges: impl IntoIterator<Item = (ReportStatus, ReportStatus)>) -> Self {
        let mut table: BTreeMap<ReportStatus, BTreeSet<ReportStatus>> = BTreeMap::new();
        for (from, to) in edges {
            table.entry(from).or_default().insert(to);
        }
        Self { edges: table }
    }

    /// Whether `current` may move to `requested`.
    #[must_use]
    pub fn allows(&self, current: ReportStatus, requested: ReportStatus) -> bool {
        self.edges
            .get(&current)
            .is_some_and(|targets| targets.contains(&requested))
    }

    /// Statuses reachable in one step from `current`, in lifecycle order.
    pub fn next_states(&self, current: ReportStatus) -> impl Iterator<Item = ReportStatus> + '_ {
        self.edges
            .get(&current)
            .into_iter()
            .flat_map(|targets| targets.iter().copied())
    }

    pub(crate) fn check(
        &self,
        current: ReportStatus,
        requested: ReportStatus,
    ) -> Result<(), DomainError> {
        if self.allows(current, requested) {
            return Ok(());
        }
        Err(DomainError::validation(
            "new_status",
            ValidationReason::TransitionNotAllowed { current, requested },
        ))
    }
}

impl Default for StatusTransitions {
    fn default() -> Self {
        Self::permissive()
    }
}

/// Named transition tables selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// [`StatusTransitions::permissive`].
    #[default]
    Permissive,
    /// [`StatusTransitions::forward_only`].
    ForwardOnly,
}

impl TransitionPolicy {
    /// Configuration spelling of the policy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Permissive => "permissive",
            Self::ForwardOnly => "forward_only",
        }
    }

    /// Materialise the table this policy names.
    #[must_use]
    pub fn table(self) -> StatusTransitions {
        match self {
            Self::Permissive => StatusTransitions::permissive(),
            Self::ForwardOnly => StatusTransitions::forward_only(),
        }
    }
}

impl fmt::Display for TransitionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for [`TransitionPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTransitionPolicyError {
    /// The unrecognised policy name.
    pub input: String,
}

impl fmt::Display for ParseTransitionPolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid status transition policy: {} (expected permissive or forward_only)",
            self.input
        )
    }
}

impl std::error::Error for ParseTransitionPolicyError {}

impl FromStr for TransitionPolicy {
    type Err = ParseTransitionPolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "permissive" => Ok(Self::Permissive),
            "forward_only" => Ok(Self::ForwardOnly),
            _ => Err(ParseTransitionPolicyError {
                input: value.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Covers the built-in tables and policy parsing.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn permissive_table_connects_every_pair() {
        let table = StatusTransitions::permissive();
        for from in ReportStatus::ALL {
            for to in ReportStatus::ALL {
                assert!(table.allows(from, to), "{from} -> {to} should be allowed");
            }
        }
    }

    #[rstest]
    fn default_table_is_permissive() {
        assert_eq!(StatusTransitions::default(), StatusTransitions::permissive());
    }

    #[rstest]
    #[case(ReportStatus::Submitted, ReportStatus::UnderInvestigation, true)]
    #[case(ReportStatus::Submitted, ReportStatus::Dismissed, true)]
    #[case(ReportStatus::UnderInvestigation, ReportStatus::Resolved, true)]
    #[case(ReportStatus::Resolved, ReportStatus::UnderInvestigation, false)]
    #[case(ReportStatus::Dismissed, ReportStatus::Submitted, false)]
    #[case(ReportStatus::Submitted, ReportStatus::Draft, false)]
    #[case(ReportStatus::Submitted, ReportStatus::Submitted, false)]
    fn forward_only_table_blocks_backward_moves(
        #[case] from: ReportStatus,
        #[case] to: ReportStatus,
        #[case] expected: bool,
    ) {
        assert_eq!(StatusTransitions::forward_only().allows(from, to), expected);
    }

    #[rstest]
    fn terminal_statuses_have_no_next_states() {
        let table = StatusTransitions::forward_only();
        assert_eq!(table.next_states(ReportStatus::Resolved).count(), 0);
        assert_eq!(
            table
                .next_states(ReportStatus::Submitted)
                .collect::<Vec<_>>(),
            vec![ReportStatus::UnderInvestigation, ReportStatus::Dismissed]
        );
    }

    #[rstest]
    fn check_names_new_status_when_rejected() {
        let table = StatusTransitions::from_edges([(ReportStatus::Draft, ReportStatus::Submitted)]);
        let error = table
            .check(ReportStatus::Submitted, ReportStatus::Resolved)
            .expect_err("edge missing");
        assert_eq!(error.parameter(), Some("new_status"));
    }

    #[rstest]
    #[case("permissive", TransitionPolicy::Permissive)]
    #[case("forward_only", TransitionPolicy::ForwardOnly)]
    fn policies_parse_from_config_names(#[case] input: &str, #[case] expected: TransitionPolicy) {
        assert_eq!(input.parse::<TransitionPolicy>(), Ok(expected));
        assert_eq!(expected.to_string(), input);
    }

    #[rstest]
    fn unknown_policy_is_rejected() {
        let error = "strict"
            .parse::<TransitionPolicy>()
            .expect_err("unknown policy");
        assert_eq!(error.input, "strict");
    }
}
