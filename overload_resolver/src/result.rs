//! Resolution outcomes: `BindingTarget` and the structured failure
//! taxonomy.
//!
//! Every outcome here is a *value*; the resolver never signals "this call
//! does not match" by error. The payloads carry everything a hosting
//! layer needs to build a user-facing message without re-running
//! resolution or re-inspecting overloads.

use serde::{Deserialize, Serialize};

use crate::candidate::OverloadCandidate;
use crate::narrowing::NarrowingLevel;
use crate::types::Ty;

/// One achievable argument count, reported on arity mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Arity {
    Exact(usize),
    /// A params-array candidate absorbs unboundedly many arguments past
    /// the preceding exact arities.
    Unbounded,
}

/// The outcome of one argument-to-parameter conversion attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub arg_type: Ty,
    pub param_type: Ty,
    pub failed: bool,
}

impl ConversionResult {
    pub fn new(arg_type: Ty, param_type: Ty, failed: bool) -> Self {
        ConversionResult {
            arg_type,
            param_type,
            failed,
        }
    }
}

/// Why a particular candidate was rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CallFailureReason {
    /// At least one argument did not convert; one result per argument.
    ConversionFailure(Vec<ConversionResult>),
    /// Keyword names that match no parameter of the candidate.
    UnassignableKeyword(Vec<String>),
    /// Keyword names that collide with a positional argument or another
    /// keyword.
    DuplicateKeyword(Vec<String>),
    /// Generic type inference produced no consistent type arguments.
    TypeInference,
}

/// One candidate's reason for rejection, tagged with the candidate's
/// signature so messages never need the candidate back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallFailure {
    pub signature: String,
    pub reason: CallFailureReason,
}

impl CallFailure {
    pub fn new(signature: String, reason: CallFailureReason) -> Self {
        CallFailure { signature, reason }
    }
}

/// The classification of a finished resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingOutcome {
    /// An unambiguous best candidate was found.
    Success {
        candidate: OverloadCandidate,
        level: NarrowingLevel,
        /// Per argument: `Some(ty)` pins the argument to its observed
        /// runtime type; `None` means no restriction is needed.
        restricted_args: Vec<Option<Ty>>,
    },
    /// Two or more equally good candidates at the attempted level.
    AmbiguousMatch(Vec<OverloadCandidate>),
    /// No candidate accepts the visible argument count.
    IncorrectArgumentCount(Vec<Arity>),
    /// Candidates existed at the right arity but every one was rejected.
    CallFailure(Vec<CallFailure>),
    /// The actual-argument set could not be constructed at all.
    InvalidArguments,
    /// Nothing was attempted and nothing failed; e.g. every candidate
    /// was excluded before filtering.
    NoCallableMethod,
}

/// The result of `OverloadResolver::resolve_overload`. Immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingTarget {
    pub method_name: String,
    /// Visible argument count of the call, for messages.
    pub actual_arg_count: usize,
    pub outcome: BindingOutcome,
}

impl BindingTarget {
    pub(crate) fn new(method_name: String, actual_arg_count: usize, outcome: BindingOutcome) -> Self {
        BindingTarget {
            method_name,
            actual_arg_count,
            outcome,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, BindingOutcome::Success { .. })
    }

    pub fn chosen_candidate(&self) -> Option<&OverloadCandidate> {
        match &self.outcome {
            BindingOutcome::Success { candidate, .. } => Some(candidate),
            _ => None,
        }
    }

    pub fn narrowing_level(&self) -> Option<NarrowingLevel> {
        match &self.outcome {
            BindingOutcome::Success { level, .. } => Some(*level),
            _ => None,
        }
    }

    pub fn return_type(&self) -> Option<Ty> {
        self.chosen_candidate().map(|c| c.return_type())
    }

    pub fn restricted_args(&self) -> Option<&[Option<Ty>]> {
        match &self.outcome {
            BindingOutcome::Success { restricted_args, .. } => Some(restricted_args),
            _ => None,
        }
    }

    pub fn expected_arg_counts(&self) -> Option<&[Arity]> {
        match &self.outcome {
            BindingOutcome::IncorrectArgumentCount(arities) => Some(arities),
            _ => None,
        }
    }

    pub fn ambiguous_candidates(&self) -> Option<&[OverloadCandidate]> {
        match &self.outcome {
            BindingOutcome::AmbiguousMatch(candidates) => Some(candidates),
            _ => None,
        }
    }

    pub fn call_failures(&self) -> Option<&[CallFailure]> {
        match &self.outcome {
            BindingOutcome::CallFailure(failures) => Some(failures),
            _ => None,
        }
    }

    /// Build the human-readable error message for a failed binding.
    /// Returns `None` for successful bindings.
    pub fn error_message(&self) -> Option<String> {
        match &self.outcome {
            BindingOutcome::Success { .. } => None,
            BindingOutcome::AmbiguousMatch(candidates) => {
                let mut msg = format!(
                    "MethodError: {} call with {} argument(s) is ambiguous. Candidates:\n",
                    self.method_name, self.actual_arg_count
                );
                for c in candidates {
                    msg.push_str(&format!("  {}\n", c.signature()));
                }
                Some(msg)
            }
            BindingOutcome::IncorrectArgumentCount(arities) => {
                let expected: Vec<String> = arities
                    .iter()
                    .map(|a| match a {
                        Arity::Exact(n) => n.to_string(),
                        Arity::Unbounded => "...".to_string(),
                    })
                    .collect();
                Some(format!(
                    "MethodError: {} takes {} argument(s), got {}",
                    self.method_name,
                    expected.join(" or "),
                    self.actual_arg_count
                ))
            }
            BindingOutcome::CallFailure(failures) => {
                Some(Self::call_failure_message(&self.method_name, failures))
            }
            BindingOutcome::InvalidArguments => Some(format!(
                "MethodError: invalid arguments for {}",
                self.method_name
            )),
            BindingOutcome::NoCallableMethod => Some(format!(
                "MethodError: no callable method {}",
                self.method_name
            )),
        }
    }

    fn call_failure_message(name: &str, failures: &[CallFailure]) -> String {
        for failure in failures {
            match &failure.reason {
                CallFailureReason::ConversionFailure(results) => {
                    for r in results {
                        if r.failed {
                            return format!(
                                "MethodError: {}: expected {}, got {}",
                                name, r.param_type, r.arg_type
                            );
                        }
                    }
                }
                CallFailureReason::DuplicateKeyword(names) => {
                    return format!(
                        "MethodError: {}() got multiple values for keyword argument '{}'",
                        name, names[0]
                    );
                }
                CallFailureReason::UnassignableKeyword(names) => {
                    return format!(
                        "MethodError: {}() got an unexpected keyword argument '{}'",
                        name, names[0]
                    );
                }
                CallFailureReason::TypeInference => {
                    return format!(
                        "MethodError: type arguments for {}() cannot be inferred from the usage",
                        name
                    );
                }
            }
        }
        format!("MethodError: no method matching {}", name)
    }
}
